//! Input declarations handed over by the call-graph extractor.
//!
//! These are plain serde types: a [`ProgramGraph`] document lists the types
//! and code units of one analyzed program, with every edge expressed by
//! qualified name. Interning into dense ids happens in [`super::Program`].

use crate::errors::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name given to constructors in qualified names
pub const CONSTRUCTOR_NAME: &str = "<init>";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    #[default]
    Method,
    Constructor,
}

/// How calls against a type are dispatched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    #[default]
    Concrete,
    Interface,
    Abstract,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub dispatch: DispatchKind,
    /// Direct supertypes (superclass and implemented interfaces)
    #[serde(default)]
    pub supertypes: Vec<String>,
}

impl TypeDecl {
    pub fn concrete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dispatch: DispatchKind::Concrete,
            supertypes: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            dispatch: DispatchKind::Interface,
            ..Self::concrete(name)
        }
    }

    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self {
            dispatch: DispatchKind::Abstract,
            ..Self::concrete(name)
        }
    }

    pub fn extending(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }
}

/// A field identified by its enclosing type and name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub owner: String,
    pub name: String,
}

/// One call site: the declared owner of the target plus every candidate
/// the call may resolve to under virtual dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdge {
    pub owner: String,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDecl {
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub kind: UnitKind,
    #[serde(default)]
    pub native: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub returns_void: bool,
    #[serde(default)]
    pub calls: Vec<CallEdge>,
    #[serde(default)]
    pub writes: Vec<FieldRef>,
    #[serde(default)]
    pub reads: Vec<FieldRef>,
    /// Constructors invoked locally whose result is not known to escape
    #[serde(default)]
    pub constructs: Vec<String>,
}

impl UnitDecl {
    pub fn method(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            parameters: Vec::new(),
            kind: UnitKind::Method,
            native: false,
            is_abstract: false,
            returns_void: false,
            calls: Vec::new(),
            writes: Vec::new(),
            reads: Vec::new(),
            constructs: Vec::new(),
        }
    }

    pub fn constructor(owner: impl Into<String>) -> Self {
        Self {
            kind: UnitKind::Constructor,
            ..Self::method(owner, CONSTRUCTOR_NAME)
        }
    }

    pub fn params<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn void(mut self) -> Self {
        self.returns_void = true;
        self
    }

    pub fn native(mut self) -> Self {
        self.native = true;
        self
    }

    pub fn abstract_method(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add a call site resolving to a single target
    pub fn calls(self, owner: impl Into<String>, target: impl Into<String>) -> Self {
        self.calls_any(owner, [target])
    }

    /// Add a call site resolving to several candidate targets
    pub fn calls_any<I, S>(mut self, owner: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.calls.push(CallEdge {
            owner: owner.into(),
            targets: targets.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn writes(mut self, owner: impl Into<String>, field: impl Into<String>) -> Self {
        self.writes.push(FieldRef {
            owner: owner.into(),
            name: field.into(),
        });
        self
    }

    pub fn reads(mut self, owner: impl Into<String>, field: impl Into<String>) -> Self {
        self.reads.push(FieldRef {
            owner: owner.into(),
            name: field.into(),
        });
        self
    }

    pub fn constructs(mut self, constructor: impl Into<String>) -> Self {
        self.constructs.push(constructor.into());
        self
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == UnitKind::Constructor
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.owner, &self.name, &self.parameters)
    }
}

/// Build the stable identity of a unit, e.g. `app.Core.add(int, int)`.
pub fn qualified_name(owner: &str, name: &str, parameters: &[String]) -> String {
    format!("{}.{}({})", owner, name, parameters.join(", "))
}

/// Split a qualified name back into simple name and parameter list.
///
/// Used for units that are only referenced, never declared. Falls back to
/// the whole string as the name when the shape is not recognized.
pub fn split_qualified_name(qualified: &str, owner: &str) -> (String, Vec<String>) {
    let rest = qualified
        .strip_prefix(owner)
        .and_then(|r| r.strip_prefix('.'))
        .unwrap_or(qualified);

    match (rest.find('('), rest.ends_with(')')) {
        (Some(open), true) => {
            let name = rest[..open].to_string();
            let inner = &rest[open + 1..rest.len() - 1];
            let parameters = inner
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            (name, parameters)
        }
        _ => (rest.to_string(), Vec::new()),
    }
}

/// Whole-program document produced by the extractor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramGraph {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    #[serde(default)]
    pub units: Vec<UnitDecl>,
}

impl ProgramGraph {
    pub fn from_json_str(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(Error::from)
            .context(format!("reading {}", path.display()))?;
        serde_json::from_str(&contents).map_err(|e| Error::InvalidGraph {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    pub fn with_unit(mut self, decl: UnitDecl) -> Self {
        self.units.push(decl);
        self
    }
}
