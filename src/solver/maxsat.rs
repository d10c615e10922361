//! `MaxSatEngine`: the default `MaxSatSolver`, used by the Diagnoser to
//! find a maximum-weight-satisfied assignment over uniform-weight soft
//! clauses. Implements a simplified, unweighted Fu-Malik core-guided
//! relaxation on top of `CoreSolver`: each soft clause gets a fresh
//! selector literal; while assuming every selector false is UNSAT, the
//! selectors implicated in the core are permanently freed (their clause
//! is allowed to pass via the selector instead of its own literals) and
//! the loop repeats.
//!
//! This does not add the at-most-one-per-core cardinality constraint a
//! textbook Fu-Malik uses, so a single round may free more selectors than
//! strictly necessary -- the implicated index set may not be minimum,
//! only safe. Treating any such index as repairable is safe but possibly
//! wasteful; do not optimize this without evidence.
use {
    super::{core::CoreSolver, IncrementalSatSolver, MaxSatSolution, MaxSatSolver, SatOutcome},
    crate::types::{Clause, Lit, VarId},
};

#[derive(Clone, Debug, Default)]
pub struct MaxSatEngine {
    hard: Vec<Clause>,
    soft: Vec<Vec<Lit>>,
}

impl MaxSatEngine {
    pub fn new() -> Self {
        MaxSatEngine::default()
    }

    fn max_var(&self) -> VarId {
        self.hard
            .iter()
            .flat_map(|c| c.literals().iter().map(|l| l.var()))
            .chain(self.soft.iter().flat_map(|lits| lits.iter().map(|l| l.var())))
            .max()
            .unwrap_or(0)
    }
}

impl MaxSatSolver for MaxSatEngine {
    fn add_hard_clause(&mut self, clause: Clause) {
        self.hard.push(clause);
    }

    fn add_soft_clause(&mut self, clause: Clause, _weight: u32) {
        self.soft.push(clause.literals().to_vec());
    }

    fn solve(&mut self) -> Option<MaxSatSolution> {
        let n = self.soft.len();
        if n == 0 {
            let mut solver = CoreSolver::with_clauses(self.hard.clone());
            return match solver.solve_under_assumptions(&[]) {
                SatOutcome::Sat(assignment) => Some(MaxSatSolution {
                    assignment,
                    unsatisfied_soft: vec![],
                }),
                SatOutcome::Unsat { .. } => None,
            };
        }

        let mut fresh = self.max_var() + 1;
        let selectors: Vec<Lit> = (0..n)
            .map(|_| {
                let v = fresh;
                fresh += 1;
                Lit::new(v, true)
            })
            .collect();
        let mut relaxed = vec![false; n];

        loop {
            let mut solver = CoreSolver::new();
            for c in &self.hard {
                solver.add_clause(c.clone());
            }
            for (i, lits) in self.soft.iter().enumerate() {
                let mut with_selector = lits.clone();
                with_selector.push(selectors[i]);
                let clause = Clause::from_literals(with_selector)
                    .unwrap_or_else(|| Clause::unit(selectors[i]));
                solver.add_clause(clause);
            }

            let assumptions: Vec<Lit> = (0..n)
                .filter(|&i| !relaxed[i])
                .map(|i| !selectors[i])
                .collect();

            match solver.solve_under_assumptions(&assumptions) {
                SatOutcome::Sat(assignment) => {
                    let unsatisfied_soft = (0..n)
                        .filter(|&i| {
                            let original = Clause::from_literals(self.soft[i].clone())
                                .unwrap_or_else(|| Clause::from_literals([]).unwrap());
                            !original.evaluate(&assignment)
                        })
                        .collect();
                    return Some(MaxSatSolution {
                        assignment,
                        unsatisfied_soft,
                    });
                }
                SatOutcome::Unsat { core } => {
                    let mut freed_any = false;
                    for (i, &b) in selectors.iter().enumerate() {
                        if !relaxed[i] && core.contains(&!b) {
                            relaxed[i] = true;
                            freed_any = true;
                        }
                    }
                    if !freed_any {
                        // the hard clauses alone are unsatisfiable; outside
                        // this engine's contract, so surface `None`.
                        return None;
                    }
                }
            }
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
    fn all_soft_clauses_satisfied_when_compatible() {
        let mut engine = MaxSatEngine::new();
        engine.add_hard_clause(Clause::from_literals([lit(1)]).unwrap());
        engine.add_soft_clause(Clause::from_literals([lit(1)]).unwrap(), 1);
        engine.add_soft_clause(Clause::from_literals([lit(2)]).unwrap(), 1);
        let solution = engine.solve().expect("hard clauses are satisfiable");
        assert!(solution.unsatisfied_soft.is_empty());
        assert!(solution.assignment.value_of(1));
        assert!(solution.assignment.value_of(2));
    }

    #[test]
    fn conflicting_soft_clauses_sacrifice_the_minority() {
        let mut engine = MaxSatEngine::new();
        // hard: x1 must be true. soft: x1 should be true (2 votes via
        // duplication is unnecessary -- one soft clause wants ¬x1).
        engine.add_hard_clause(Clause::from_literals([lit(1)]).unwrap());
        engine.add_soft_clause(Clause::from_literals([lit(-1)]).unwrap(), 1);
        let solution = engine.solve().expect("hard clause is satisfiable");
        assert_eq!(solution.unsatisfied_soft, vec![0]);
        assert!(solution.assignment.value_of(1));
    }

    #[test]
    fn unsatisfiable_hard_clauses_return_none() {
        let mut engine = MaxSatEngine::new();
        engine.add_hard_clause(Clause::from_literals([lit(1)]).unwrap());
        engine.add_hard_clause(Clause::from_literals([lit(-1)]).unwrap());
        engine.add_soft_clause(Clause::from_literals([lit(1)]).unwrap(), 1);
        assert!(engine.solve().is_none());
    }
}
