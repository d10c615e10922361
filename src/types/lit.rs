//! Signed variable references: the atoms cubes, clauses and assumption
//! sets are built from.
use {
    super::var::VarId,
    std::{fmt, ops::Not},
};

/// A signed reference to a variable, DIMACS-style: a positive `i32` names
/// the variable itself, a negative one its complement. Never zero.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Lit(i32);

impl Lit {
    pub fn new(var: VarId, positive: bool) -> Self {
        debug_assert!(var != 0, "variable 0 does not exist");
        Lit(if positive { var as i32 } else { -(var as i32) })
    }

    pub fn from_i32(v: i32) -> Self {
        debug_assert!(v != 0, "literal 0 is not a valid literal");
        Lit(v)
    }

    pub fn var(&self) -> VarId {
        self.0.unsigned_abs()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Evaluate this literal under a total per-variable assignment.
    pub fn holds_under(&self, value_of: impl Fn(VarId) -> bool) -> bool {
        value_of(self.var()) == self.is_positive()
    }
}

impl Not for Lit {
    type Output = Lit;
    #[inline]
    fn not(self) -> Lit {
        Lit(-self.0)
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Lit {
    fn from(v: i32) -> Self {
        Lit::from_i32(v)
    }
}

impl From<Lit> for i32 {
    fn from(l: Lit) -> i32 {
        l.0
    }
}
