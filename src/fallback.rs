//! Hard-to-Learn Fallback: once an output's repair count exceeds
//! the configured threshold, replace its Â_i/Ĉ_i with exact semantic
//! definitions derived from F's cofactors, and freeze the entry so the
//! Repairer never touches it again.
use crate::{
    basis::{BasisStore, SemanticDefinition},
    types::{SpecStore, SynthResult, SynthesisError, VarId},
};

/// Â_i := F|_{y_i=1} ∧ ¬F|_{y_i=0}; Ĉ_i := F|_{y_i=0} ∧ ¬F|_{y_i=1}. Both
/// reuse the same two cofactors, just conjoined in opposite roles.
pub fn apply_fallback(spec: &SpecStore, var: VarId, basis: &mut BasisStore) -> SynthResult<()> {
    let cofactor_true = spec.cofactor(var, true);
    let cofactor_false = spec.cofactor(var, false);

    let entry = basis
        .get_mut(var)
        .ok_or_else(|| SynthesisError::InvariantViolation(format!("no basis entry for y{var}")))?;
    entry.semantic = Some(SemanticDefinition {
        a_pos: cofactor_true.clone(),
        a_neg: cofactor_false.clone(),
        c_pos: cofactor_false,
        c_neg: cofactor_true,
    });
    entry.frozen = true;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Assignment;

    fn example_spec() -> SpecStore {
        SpecStore::from_qdimacs(
            "p cnf 4 4\na 2 3 0\ne 1 4 0\n-1 2 0\n-1 3 0\n1 2 3 0\n4 0\n",
        )
        .unwrap()
    }

    #[test]
    fn fallback_reproduces_the_exact_must_regions_for_y1() {
        let spec = example_spec();
        let mut basis = BasisStore::new(&[1, 4]);
        apply_fallback(&spec, 1, &mut basis).unwrap();
        let entry = basis.get(1).unwrap();
        assert!(entry.frozen);

        let mut must1 = Assignment::with_capacity(3);
        must1.set(2, false);
        must1.set(3, false);
        assert!(entry.a_value(&must1));
        assert!(!entry.c_value(&must1));

        let mut dont_care = Assignment::with_capacity(3);
        dont_care.set(2, true);
        dont_care.set(3, true);
        assert!(!entry.a_value(&dont_care));
        assert!(!entry.c_value(&dont_care));
    }

    #[test]
    fn fallback_never_leaves_a_and_c_both_true() {
        let spec = example_spec();
        let mut basis = BasisStore::new(&[1, 4]);
        apply_fallback(&spec, 1, &mut basis).unwrap();
        let entry = basis.get(1).unwrap();
        for x2 in [false, true] {
            for x3 in [false, true] {
                let mut a = Assignment::with_capacity(3);
                a.set(2, x2);
                a.set(3, x3);
                assert!(entry.is_consistent_at(&a));
            }
        }
    }
}
