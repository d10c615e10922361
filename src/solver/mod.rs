//! Crate `solver`: the SAT and MaxSAT collaborator interfaces and their
//! default in-repo implementations. Both collaborators are realized as
//! small trait objects rather than ambient state:
//! `IncrementalSatSolver` and `MaxSatSolver`.
/// Default incremental SAT backend: DPLL with unit propagation and a
/// deletion-based unsat-core extractor.
pub mod core;
/// Default MaxSAT backend: Fu-Malik-style iterative core relaxation built
/// on top of `core::CoreSolver`.
pub mod maxsat;

pub use self::{core::CoreSolver, maxsat::MaxSatEngine};

use crate::types::{Assignment, Clause, Lit};

/// Result of an assumption-scoped SAT query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SatOutcome {
    Sat(Assignment),
    /// The unsat core, restricted to assumption literals, in the polarity
    /// they were asked under. Not guaranteed minimum, only minimal under
    /// the extractor's deletion order: a subset of the assumptions that
    /// is itself unsatisfiable, not necessarily the smallest such subset.
    Unsat { core: Vec<Lit> },
}

impl SatOutcome {
    pub fn is_sat(&self) -> bool {
        matches!(self, SatOutcome::Sat(_))
    }
}

/// add-clause, solve-under-assumptions, get-model, get-unsat-core.
/// `get-model`/`get-unsat-core` are folded into the `SatOutcome` returned
/// by `solve_under_assumptions` rather than separate calls, since this
/// engine never needs them independently of a solve.
pub trait IncrementalSatSolver {
    fn add_clause(&mut self, clause: Clause);
    fn solve_under_assumptions(&mut self, assumptions: &[Lit]) -> SatOutcome;
}

/// Result of a MaxSAT query: either every soft clause could be
/// satisfied alongside the hard clauses, or not -- in which case the
/// solution reports the best assignment found plus which soft clauses it
/// sacrificed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaxSatSolution {
    pub assignment: Assignment,
    pub unsatisfied_soft: Vec<usize>,
}

/// add-hard-clause, add-soft-clause(weight), solve. Soft clause weights
/// are accepted for interface fidelity; the default engine treats all
/// weights as equal (uniform weight 1 per soft clause).
pub trait MaxSatSolver {
    fn add_hard_clause(&mut self, clause: Clause);
    fn add_soft_clause(&mut self, clause: Clause, weight: u32);
    /// `None` if the hard clauses alone are already unsatisfiable --
    /// outside this engine's contract (the Diagnoser's hard clauses are
    /// always F ∧ assumptions on a known model, hence always satisfiable).
    fn solve(&mut self) -> Option<MaxSatSolution>;
}
