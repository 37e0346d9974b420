// Shared fixtures for funcore integration tests
#![allow(dead_code)]

use funcore::classification::{Catalog, PuritySession};
use funcore::{ProgramGraph, TypeDecl, UnitDecl};

pub const LIST: &str = "java.util.List";
pub const ARRAY_LIST: &str = "java.util.ArrayList";
pub const ARRAY_LIST_ADD: &str = "java.util.ArrayList.add(java.lang.Object)";
pub const ARRAY_LIST_NEW: &str = "java.util.ArrayList.<init>(java.util.Collection)";
pub const UNMODIFIABLE_LIST: &str = "java.util.Collections.unmodifiableList(java.util.List)";
pub const LOCAL_TIME_NOW: &str = "java.time.LocalTime.now()";

/// Session with no catalog, reporting every unit
pub fn bare_session() -> PuritySession {
    PuritySession::new(Catalog::empty(), Vec::<String>::new())
}

/// Runtime-library classifications the `core.Core` fixture relies on
pub fn core_catalog() -> Catalog {
    Catalog::standard_purity()
        .with_strict([UNMODIFIABLE_LIST])
        .with_not([ARRAY_LIST_ADD, LOCAL_TIME_NOW])
}

/// A small functional core: pure helpers, lazy initialization, field
/// assignment and void methods.
pub fn core_program() -> ProgramGraph {
    ProgramGraph::default()
        .with_unit(
            UnitDecl::constructor("core.Core")
                .void()
                .writes("core.Core", "talks")
                .constructs("java.util.ArrayList.<init>()"),
        )
        .with_unit(UnitDecl::method("core.Core", "add").params(["int", "int"]))
        .with_unit(UnitDecl::method("core.Core", "doNothing").void())
        .with_unit(UnitDecl::method("core.Core", "doUnneccessaryStuff").void())
        .with_unit(
            UnitDecl::method("core.Core", "addNewTalkForwad")
                .params([LIST, "java.lang.String"])
                .calls(
                    "core.Core",
                    "core.Core.addNewElement(java.util.List, java.lang.String)",
                ),
        )
        .with_unit(
            UnitDecl::method("core.Core", "addNewElement")
                .params([LIST, "java.lang.String"])
                .constructs(ARRAY_LIST_NEW)
                .calls(ARRAY_LIST, ARRAY_LIST_ADD)
                .calls("java.util.Collections", UNMODIFIABLE_LIST),
        )
        .with_unit(
            UnitDecl::method("core.Core", "addBoeseNewElement")
                .params([LIST, "java.lang.String"])
                .writes("core.Core", "talks")
                .reads("core.Core", "talks")
                .calls("java.util.Collections", UNMODIFIABLE_LIST),
        )
        .with_unit(
            UnitDecl::method("core.Core", "getLazy")
                .reads("core.Core", "string1")
                .writes("core.Core", "string1"),
        )
        .with_unit(
            UnitDecl::method("core.Core", "getRandomInit")
                .writes("core.Core", "string2")
                .reads("core.Core", "string2")
                .calls("java.time.LocalTime", LOCAL_TIME_NOW),
        )
}

/// Abstract `Shape.area()` with two concrete overriders and a caller
pub fn shapes_program() -> ProgramGraph {
    ProgramGraph::default()
        .with_type(TypeDecl::abstract_class("geo.Shape"))
        .with_type(TypeDecl::concrete("geo.Square").extending("geo.Shape"))
        .with_type(TypeDecl::concrete("geo.Circle").extending("geo.Shape"))
        .with_unit(UnitDecl::method("geo.Shape", "area").abstract_method())
        .with_unit(UnitDecl::method("geo.Square", "area").reads("geo.Square", "side"))
        .with_unit(
            UnitDecl::constructor("geo.Square")
                .params(["double"])
                .void()
                .writes("geo.Square", "side"),
        )
        .with_unit(UnitDecl::method("geo.Circle", "area"))
        .with_unit(
            UnitDecl::method("geo.Report", "totalArea")
                .params(["geo.Shape"])
                .calls("geo.Shape", "geo.Shape.area()"),
        )
}

pub fn graph_json(graph: &ProgramGraph) -> String {
    serde_json::to_string_pretty(graph).expect("graph serializes")
}
