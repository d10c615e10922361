//! Diagnoser: given a counterexample, runs MaxSAT to find the
//! minimal set Ind of erring outputs and classifies each via the
//! four-row diagnosis table.
use crate::{
    analyzer::DependencyOrder,
    basis::BasisStore,
    solver::{MaxSatEngine, MaxSatSolver},
    types::{Clause, Lit, SpecStore, SynthResult, SynthesisError, VarId},
    verifier::Counterexample,
};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RepairAction {
    ShrinkA,
    ExpandA,
    ShrinkC,
    ExpandC,
}

/// One erring output and what the Repairer must do about it, plus the
/// context the Repairer's conflict formula needs: the target value
/// MaxSAT assigned it and the g-parameter value the counterexample used.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Diagnosis {
    pub var: VarId,
    pub action: RepairAction,
    pub target: bool,
    pub g_val: bool,
}

pub struct DiagnosisResult {
    pub diagnoses: Vec<Diagnosis>,
    /// Y_fix: the MaxSAT-chosen consistent assignment, needed by the
    /// Repairer to clamp downstream (rank greater than the one being
    /// repaired) outputs in the conflict formula.
    pub y_fix: BTreeMap<VarId, bool>,
}

/// Runs MaxSAT (F ∧ X↔σ_X hard, y_i↔σ_Y′[i] soft) and classifies every
/// output MaxSAT had to flip. Errors with `InvariantViolation` if the
/// counterexample is SAT for the Verifier yet MaxSAT reports no flips --
/// that combination cannot happen and signals a bug upstream.
pub fn diagnose(
    spec: &SpecStore,
    order: &DependencyOrder,
    basis: &BasisStore,
    cx: &Counterexample,
) -> SynthResult<DiagnosisResult> {
    let mut engine = MaxSatEngine::default();
    for clause in spec.clauses() {
        engine.add_hard_clause(clause.clone());
    }
    for &x in &spec.universals() {
        if let Some(&value) = cx.sigma_x.get(&x) {
            engine.add_hard_clause(Clause::unit(Lit::new(x, value)));
        }
    }
    let outputs = order.order().to_vec();
    for &y in &outputs {
        let target = cx.sigma_y_prime.get(&y).copied().unwrap_or(false);
        engine.add_soft_clause(Clause::unit(Lit::new(y, target)), 1);
    }

    let solution = engine.solve().ok_or_else(|| {
        SynthesisError::InvariantViolation(
            "diagnoser's hard clauses (F under the counterexample's X) are unsatisfiable"
                .to_string(),
        )
    })?;

    let y_fix: BTreeMap<VarId, bool> = outputs
        .iter()
        .map(|&y| (y, solution.assignment.value_of(y)))
        .collect();

    if solution.unsatisfied_soft.is_empty() {
        return Err(SynthesisError::InvariantViolation(
            "diagnoser found no erring output despite a SAT counterexample".to_string(),
        ));
    }

    let feature_assignment = cx.feature_assignment();
    let mut diagnoses = Vec::with_capacity(solution.unsatisfied_soft.len());
    for &idx in &solution.unsatisfied_soft {
        let y = outputs[idx];
        let target = y_fix[&y];
        let g_val = cx.sigma_g.get(&y).copied().unwrap_or(false);
        let action = match (target, g_val) {
            (false, false) => RepairAction::ShrinkA,
            (false, true) => {
                let a_holds = basis
                    .get(y)
                    .map(|e| e.a_value(&feature_assignment))
                    .unwrap_or(false);
                if a_holds {
                    RepairAction::ShrinkA
                } else {
                    RepairAction::ExpandC
                }
            }
            (true, false) => RepairAction::ExpandA,
            (true, true) => RepairAction::ShrinkC,
        };
        diagnoses.push(Diagnosis {
            var: y,
            action,
            target,
            g_val,
        });
    }
    // repairs are applied in increasing rank order; `outputs` is already
    // rank-ordered and `unsatisfied_soft` preserves that order.
    Ok(DiagnosisResult { diagnoses, y_fix })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{analyzer::analyze, types::Cube};

    fn example() -> (SpecStore, DependencyOrder) {
        let mut spec = SpecStore::from_qdimacs(
            "p cnf 4 4\na 2 3 0\ne 1 4 0\n-1 2 0\n-1 3 0\n1 2 3 0\n4 0\n",
        )
        .unwrap();
        let order = analyze(&mut spec);
        (spec, order)
    }

    fn cx(sigma_x: &[(VarId, bool)], sigma_g: &[(VarId, bool)], sigma_y_prime: &[(VarId, bool)]) -> Counterexample {
        Counterexample {
            sigma_x: sigma_x.iter().copied().collect(),
            sigma_g: sigma_g.iter().copied().collect(),
            sigma_y: BTreeMap::new(),
            sigma_y_prime: sigma_y_prime.iter().copied().collect(),
        }
    }

    #[test]
    fn over_eager_a1_is_diagnosed_as_shrink() {
        let (spec, order) = example();
        let mut basis = BasisStore::new(&order.order().to_vec());
        basis.get_mut(1).unwrap().expand_a(Cube::empty()); // Â_1 = true
        basis.get_mut(4).unwrap().expand_a(Cube::empty());
        // x2=1,x3=1 is a don't-care for y1, but Â_1=true forces y1'=1.
        let counterexample = cx(
            &[(2, true), (3, true)],
            &[(1, false), (4, false)],
            &[(1, true), (4, true)],
        );
        let result = diagnose(&spec, &order, &basis, &counterexample).unwrap();
        let d = result
            .diagnoses
            .iter()
            .find(|d| d.var == 1)
            .expect("y1 should be diagnosed");
        assert_eq!(d.action, RepairAction::ShrinkA);
        assert_eq!(d.target, false);
    }

    #[test]
    fn row_two_precedence_shrinks_a_not_c_when_a_already_holds() {
        let (spec, order) = example();
        let mut basis = BasisStore::new(&order.order().to_vec());
        basis.get_mut(1).unwrap().expand_a(Cube::empty()); // Â_1 = true everywhere
        basis.get_mut(4).unwrap().expand_a(Cube::empty());
        let counterexample = cx(
            &[(2, true), (3, true)],
            &[(1, true), (4, false)], // g_1 = 1
            &[(1, true), (4, true)],
        );
        let result = diagnose(&spec, &order, &basis, &counterexample).unwrap();
        let d = result.diagnoses.iter().find(|d| d.var == 1).unwrap();
        assert_eq!(d.action, RepairAction::ShrinkA);
    }

    #[test]
    fn under_approx_a4_is_diagnosed_as_expand() {
        let (spec, order) = example();
        let mut basis = BasisStore::new(&order.order().to_vec());
        basis
            .get_mut(1)
            .unwrap()
            .expand_a(Cube::from_literals([Lit::new(2, false)]).unwrap());
        basis.get_mut(1).unwrap().expand_a(
            Cube::from_literals([Lit::new(2, true), Lit::new(3, false)]).unwrap(),
        );
        // Â_4, Ĉ_4 both false: y4' forced to 0, but F demands y4 = 1.
        let counterexample = cx(
            &[(2, false), (3, false)],
            &[(1, false), (4, false)],
            &[(1, true), (4, false)],
        );
        let result = diagnose(&spec, &order, &basis, &counterexample).unwrap();
        let d = result.diagnoses.iter().find(|d| d.var == 4).unwrap();
        assert_eq!(d.action, RepairAction::ExpandA);
        assert_eq!(d.target, true);
    }
}
