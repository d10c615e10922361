//! Module `types` provides the data model: variables, literals, samples,
//! labels, cubes/clauses and their DNF/CNF aggregates, the specification
//! store, and the crate-wide error type.

/// Total variable assignments (samples, models).
pub mod assignment;
/// The crate-wide error enum.
pub mod error;
/// Cubes, clauses, DNF, CNF.
pub mod formula;
/// The three-valued output label.
pub mod label;
/// Signed variable references.
pub mod lit;
/// The in-memory specification store (F, partitioned into X/Y, QDIMACS load).
pub mod spec;
/// Problem variables and their quantifier tag.
pub mod var;

pub use self::{
    assignment::Assignment,
    error::{exit_code, SynthResult, SynthesisError},
    formula::{Clause, Cnf, Cube, Dnf},
    label::Label,
    lit::Lit,
    spec::SpecStore,
    var::{Var, VarId, VarKind},
};
