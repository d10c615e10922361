//! Verifier: builds the error formula E and solves it. UNSAT means the
//! basis is correct; SAT yields a counterexample for the Diagnoser.
use crate::{
    analyzer::DependencyOrder,
    basis::BasisStore,
    circuit::build_candidate_circuit,
    solver::{CoreSolver, IncrementalSatSolver, SatOutcome},
    types::{Assignment, SpecStore, VarId},
};
use std::collections::BTreeMap;

/// The model extracted from a SAT error formula: σ_X, σ_G, σ_Y, σ_Y′.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Counterexample {
    pub sigma_x: BTreeMap<VarId, bool>,
    pub sigma_g: BTreeMap<VarId, bool>,
    pub sigma_y: BTreeMap<VarId, bool>,
    pub sigma_y_prime: BTreeMap<VarId, bool>,
}

impl Counterexample {
    /// Combines σ_X and σ_Y′ into one `Assignment`, the feature space basis
    /// entries are evaluated against: Â_i(σ_X, σ_Y_{<i}).
    pub fn feature_assignment(&self) -> Assignment {
        let max_var = self
            .sigma_x
            .keys()
            .chain(self.sigma_y_prime.keys())
            .copied()
            .max()
            .unwrap_or(0);
        let mut assign = Assignment::with_capacity(max_var);
        for (&v, &b) in &self.sigma_x {
            assign.set(v, b);
        }
        for (&v, &b) in &self.sigma_y_prime {
            assign.set(v, b);
        }
        assign
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VerifyOutcome {
    Correct,
    CounterExample(Counterexample),
}

/// Builds E via the Candidate Circuit Builder and asks the default SAT
/// collaborator whether `out` is satisfiable under no further assumptions
/// besides `out` itself.
pub fn verify(spec: &SpecStore, order: &DependencyOrder, basis: &BasisStore) -> VerifyOutcome {
    let circuit = build_candidate_circuit(spec, order, basis);
    let mut solver = CoreSolver::with_clauses(circuit.clauses.clone());
    match solver.solve_under_assumptions(&[circuit.out]) {
        SatOutcome::Unsat { .. } => VerifyOutcome::Correct,
        SatOutcome::Sat(model) => {
            // `spec.universals()`/`order.order()` name every declared X/Y
            // variable, but a variable that never occurs in any clause of F
            // (legal QDIMACS: declared in a quantifier block, used nowhere)
            // never makes it into the circuit's clause set, so `model` may
            // leave it unbound. Such a variable is unconstrained by F, so
            // `false` is as good a witness value as any.
            let sigma_x = spec
                .universals()
                .into_iter()
                .map(|v| (v, model.get(v).unwrap_or(false)))
                .collect();
            let sigma_y = order
                .order()
                .iter()
                .map(|&y| (y, model.get(y).unwrap_or(false)))
                .collect();
            let sigma_g = circuit
                .g_vars
                .iter()
                .map(|(&y, &g)| (y, model.value_of(g.var())))
                .collect();
            let sigma_y_prime = circuit
                .y_prime
                .iter()
                .map(|(&y, &yp)| (y, model.value_of(yp)))
                .collect();
            VerifyOutcome::CounterExample(Counterexample {
                sigma_x,
                sigma_g,
                sigma_y,
                sigma_y_prime,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::analyze,
        types::{Cube, Lit},
    };

    fn example() -> (SpecStore, DependencyOrder) {
        let mut spec = SpecStore::from_qdimacs(
            "p cnf 4 4\na 2 3 0\ne 1 4 0\n-1 2 0\n-1 3 0\n1 2 3 0\n4 0\n",
        )
        .unwrap();
        let order = analyze(&mut spec);
        (spec, order)
    }

    #[test]
    fn a_correct_basis_verifies() {
        let (spec, order) = example();
        let mut basis = BasisStore::new(&order.order().to_vec());
        basis
            .get_mut(1)
            .unwrap()
            .expand_a(Cube::from_literals([Lit::new(2, false)]).unwrap());
        basis.get_mut(1).unwrap().expand_a(
            Cube::from_literals([Lit::new(2, true), Lit::new(3, false)]).unwrap(),
        );
        basis.get_mut(4).unwrap().expand_a(Cube::empty());
        assert_eq!(verify(&spec, &order, &basis), VerifyOutcome::Correct);
    }

    #[test]
    fn an_empty_basis_yields_a_counterexample() {
        let (spec, order) = example();
        let basis = BasisStore::new(&order.order().to_vec());
        match verify(&spec, &order, &basis) {
            VerifyOutcome::CounterExample(_) => {}
            VerifyOutcome::Correct => panic!("an all-false basis cannot satisfy y4's must-1 row"),
        }
    }
}
