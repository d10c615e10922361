//! `CoreSolver`: the default `IncrementalSatSolver`. A compact DPLL engine
//! -- unit propagation plus chronological backtracking, no clause
//! learning -- built on the crate's own `Var`/`Lit`/assignment-stack
//! idiom, sized for the small, fan-in-scoped formulas the Verifier,
//! Diagnoser and Repairer build.
use {
    super::{IncrementalSatSolver, SatOutcome},
    crate::types::{Assignment, Clause, Lit, VarId},
    std::collections::BTreeMap,
};

#[derive(Clone, Copy, Eq, PartialEq)]
enum ClauseState {
    Sat,
    Conflict,
    Unit(Lit),
    Unresolved,
}

fn clause_eval(clause: &[Lit], assign: &BTreeMap<VarId, bool>) -> ClauseState {
    let mut unassigned = None;
    let mut unassigned_count = 0usize;
    for &lit in clause {
        match assign.get(&lit.var()) {
            Some(&v) if v == lit.is_positive() => return ClauseState::Sat,
            Some(_) => {}
            None => {
                unassigned_count += 1;
                unassigned = Some(lit);
            }
        }
    }
    match unassigned_count {
        0 => ClauseState::Conflict,
        1 => ClauseState::Unit(unassigned.expect("counted one unassigned literal")),
        _ => ClauseState::Unresolved,
    }
}

/// Propagates units to a fixpoint, then (if unresolved) branches on the
/// first unassigned variable from `order`, trying `true` before `false`.
fn dpll(
    clauses: &[Vec<Lit>],
    mut assign: BTreeMap<VarId, bool>,
    order: &[VarId],
) -> Option<BTreeMap<VarId, bool>> {
    loop {
        let mut progressed = false;
        for clause in clauses {
            match clause_eval(clause, &assign) {
                ClauseState::Conflict => return None,
                ClauseState::Unit(lit) => {
                    assign.insert(lit.var(), lit.is_positive());
                    progressed = true;
                }
                ClauseState::Sat | ClauseState::Unresolved => {}
            }
        }
        if !progressed {
            break;
        }
    }
    if clauses
        .iter()
        .all(|c| matches!(clause_eval(c, &assign), ClauseState::Sat))
    {
        return Some(assign);
    }
    let next = order.iter().find(|v| !assign.contains_key(v)).copied()?;
    for &value in &[true, false] {
        let mut branch = assign.clone();
        branch.insert(next, value);
        if let Some(result) = dpll(clauses, branch, order) {
            return Some(result);
        }
    }
    None
}

fn var_order(clauses: &[Vec<Lit>]) -> Vec<VarId> {
    let set: std::collections::BTreeSet<VarId> = clauses
        .iter()
        .flat_map(|c| c.iter().map(|l| l.var()))
        .collect();
    set.into_iter().collect()
}

/// A plain CNF clause database plus an incremental solve query surface.
#[derive(Clone, Debug, Default)]
pub struct CoreSolver {
    clauses: Vec<Vec<Lit>>,
}

impl CoreSolver {
    pub fn new() -> Self {
        CoreSolver::default()
    }

    pub fn with_clauses(clauses: impl IntoIterator<Item = Clause>) -> Self {
        let mut solver = CoreSolver::new();
        for c in clauses {
            IncrementalSatSolver::add_clause(&mut solver, c);
        }
        solver
    }

    /// Returns a *total* assignment over every variable occurring in the
    /// clause set or the assumptions -- vars left free by propagation are
    /// completed to `false`, so a successful `check` always yields a
    /// sample in the total-mapping sense (Var -> {0,1}).
    fn check(&self, assumptions: &[Lit]) -> Option<BTreeMap<VarId, bool>> {
        let mut all: Vec<Vec<Lit>> = self.clauses.clone();
        all.extend(assumptions.iter().map(|&l| vec![l]));
        let order = var_order(&all);
        dpll(&all, BTreeMap::new(), &order).map(|mut assign| {
            for &v in &order {
                assign.entry(v).or_insert(false);
            }
            assign
        })
    }

    /// Deletion-based shrink: drop an assumption literal if the remainder
    /// is still unsat under the hard clauses; otherwise keep it. Not
    /// minimum, but every produced core is genuinely unsat.
    fn extract_core(&self, assumptions: &[Lit]) -> Vec<Lit> {
        let mut core = assumptions.to_vec();
        let mut i = 0;
        while i < core.len() {
            let mut trial = core.clone();
            trial.remove(i);
            if self.check(&trial).is_none() {
                core = trial;
            } else {
                i += 1;
            }
        }
        core
    }
}

impl IncrementalSatSolver for CoreSolver {
    fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause.literals().to_vec());
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Lit]) -> SatOutcome {
        match self.check(assumptions) {
            Some(assign) => {
                let max_var = assign.keys().copied().max().unwrap_or(0);
                let mut model = Assignment::with_capacity(max_var);
                for (&var, &value) in &assign {
                    model.set(var, value);
                }
                SatOutcome::Sat(model)
            }
            None => SatOutcome::Unsat {
                core: self.extract_core(assumptions),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: i32) -> Lit {
        Lit::from_i32(v)
    }

    #[test]
    fn solves_a_trivial_satisfiable_formula() {
        let mut solver = CoreSolver::new();
        solver.add_clause(Clause::from_literals([lit(1), lit(2)]).unwrap());
        match solver.solve_under_assumptions(&[]) {
            SatOutcome::Sat(model) => assert!(model.value_of(1) || model.value_of(2)),
            SatOutcome::Unsat { .. } => panic!("expected SAT"),
        }
    }

    #[test]
    fn detects_unsat_and_returns_a_valid_core() {
        let mut solver = CoreSolver::new();
        solver.add_clause(Clause::from_literals([lit(1)]).unwrap());
        solver.add_clause(Clause::from_literals([lit(-1)]).unwrap());
        match solver.solve_under_assumptions(&[]) {
            SatOutcome::Unsat { core } => assert!(core.is_empty()),
            SatOutcome::Sat(_) => panic!("expected UNSAT"),
        }
    }

    #[test]
    fn assumptions_drive_unsat_and_core_contains_culprits() {
        let mut solver = CoreSolver::new();
        // x2 ∧ x3 -> contradiction forced by clause (-2 | -3)
        solver.add_clause(Clause::from_literals([lit(-2), lit(-3)]).unwrap());
        let outcome = solver.solve_under_assumptions(&[lit(2), lit(3)]);
        match outcome {
            SatOutcome::Unsat { core } => {
                assert!(core.contains(&lit(2)));
                assert!(core.contains(&lit(3)));
            }
            SatOutcome::Sat(_) => panic!("expected UNSAT"),
        }
    }

    #[test]
    fn unrelated_assumption_is_dropped_from_the_core() {
        let mut solver = CoreSolver::new();
        solver.add_clause(Clause::from_literals([lit(-2), lit(-3)]).unwrap());
        let outcome = solver.solve_under_assumptions(&[lit(2), lit(3), lit(9)]);
        match outcome {
            SatOutcome::Unsat { core } => assert!(!core.contains(&lit(9))),
            SatOutcome::Sat(_) => panic!("expected UNSAT"),
        }
    }
}
