//! The three-valued label a sample carries for a given output.
use std::fmt;

/// What F forces `y_i` to be, restricted to one sample's other variables.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Label {
    /// F is unsatisfiable with `y_i = 0`, satisfiable with `y_i = 1`.
    Must1,
    /// F is unsatisfiable with `y_i = 1`, satisfiable with `y_i = 0`.
    Must0,
    /// F is satisfiable under both polarities of `y_i`.
    DontCare,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Label::Must1 => write!(f, "MUST1"),
            Label::Must0 => write!(f, "MUST0"),
            Label::DontCare => write!(f, "DONTCARE"),
        }
    }
}
