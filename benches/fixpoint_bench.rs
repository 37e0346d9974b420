//! Fixed-point driver benchmarks over chain, ring and fan-out graphs

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use funcore::classification::{Catalog, PuritySession};
use funcore::{ProgramGraph, UnitDecl};
use std::hint::black_box;

fn unit(i: usize) -> UnitDecl {
    UnitDecl::method(format!("app.U{i}"), "f")
}

fn target(i: usize) -> (String, String) {
    (format!("app.U{i}"), format!("app.U{i}.f()"))
}

/// U0 -> U1 -> ... -> Un-1, listed caller-first
fn chain(size: usize) -> ProgramGraph {
    let units = (0..size)
        .map(|i| {
            if i + 1 < size {
                let (owner, name) = target(i + 1);
                unit(i).calls(owner, name)
            } else {
                unit(i)
            }
        })
        .collect();
    ProgramGraph {
        types: Vec::new(),
        units,
    }
}

/// A single call cycle that never resolves
fn ring(size: usize) -> ProgramGraph {
    let units = (0..size)
        .map(|i| {
            let (owner, name) = target((i + 1) % size);
            unit(i).calls(owner, name)
        })
        .collect();
    ProgramGraph {
        types: Vec::new(),
        units,
    }
}

/// One root calling every leaf, leaves split between pure and lazy
fn fan_out(size: usize) -> ProgramGraph {
    let mut root = unit(0);
    let mut units = Vec::with_capacity(size);
    for i in 1..size {
        let (owner, name) = target(i);
        root = root.calls(owner, name);
        let leaf = if i % 2 == 0 {
            unit(i).writes(format!("app.U{i}"), "cache")
        } else {
            unit(i)
        };
        units.push(leaf);
    }
    units.push(root);
    ProgramGraph {
        types: Vec::new(),
        units,
    }
}

fn classify(graph: &ProgramGraph) -> usize {
    let mut session = PuritySession::new(Catalog::standard_purity(), Vec::<String>::new());
    session.load(graph);
    session.run().map(|summary| summary.rounds).unwrap_or(0)
}

fn bench_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixpoint");
    for size in [100, 1_000] {
        let shapes = [
            ("chain", chain(size)),
            ("ring", ring(size)),
            ("fan_out", fan_out(size)),
        ];
        for (name, graph) in &shapes {
            group.bench_with_input(BenchmarkId::new(*name, size), graph, |b, graph| {
                b.iter(|| classify(black_box(graph)));
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_shapes);
criterion_main!(benches);
