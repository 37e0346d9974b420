//! Call-cycle membership, used to explain units that never resolve.

use super::{Program, UnitId};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashSet;

/// Units lying on a call cycle: members of a strongly connected component
/// with more than one unit, or units calling themselves.
pub fn cyclic_units(program: &Program) -> HashSet<UnitId> {
    let mut graph = DiGraph::<UnitId, ()>::with_capacity(program.unit_count(), 0);
    let nodes: Vec<NodeIndex> = program
        .units()
        .iter()
        .map(|unit| graph.add_node(unit.id))
        .collect();

    for unit in program.units() {
        for call in &unit.calls {
            for target in &call.targets {
                graph.add_edge(nodes[unit.id.index()], nodes[target.index()], ());
            }
        }
    }

    let mut cyclic = HashSet::new();
    for component in tarjan_scc(&graph) {
        let on_cycle = component.len() > 1
            || component
                .first()
                .is_some_and(|&node| graph.contains_edge(node, node));
        if on_cycle {
            cyclic.extend(component.into_iter().map(|node| graph[node]));
        }
    }
    cyclic
}
