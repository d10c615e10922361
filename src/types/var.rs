//! Problem variables and their quantifier tag.
use std::fmt;

pub type VarId = u32;

/// Which quantifier block a variable was declared in.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum VarKind {
    /// universal input, free in every model.
    Universal,
    /// existential output, synthesized by this engine.
    Existential,
}

/// A problem variable together with its quantifier tag and, for existential
/// variables, the topological rank assigned by the Dependency Analyzer.
/// `rank` is `None` until the Analyzer runs and is always `None` for
/// universal variables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Var {
    pub id: VarId,
    pub kind: VarKind,
    pub rank: Option<usize>,
}

impl Var {
    pub fn new(id: VarId, kind: VarKind) -> Self {
        Var {
            id,
            kind,
            rank: None,
        }
    }

    pub fn is_existential(&self) -> bool {
        matches!(self.kind, VarKind::Existential)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            VarKind::Universal => write!(f, "x{}", self.id),
            VarKind::Existential => write!(f, "y{}", self.id),
        }
    }
}
