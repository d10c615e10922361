//! Repairer: builds the conflict formula H_i for a diagnosed output,
//! extracts an unsat core restricted to X ∪ Y_{<i}, and applies the
//! resulting cube as a shrink or expand on the relevant basis side.
use crate::{
    analyzer::DependencyOrder,
    basis::BasisStore,
    circuit::{and_gate, const_lit, tseitin_basis_literals, or_gate, FreshVars},
    diagnoser::{Diagnosis, RepairAction},
    solver::{CoreSolver, IncrementalSatSolver, SatOutcome},
    types::{Clause, Cube, Lit, SpecStore, SynthResult, SynthesisError, VarId},
    verifier::Counterexample,
};
use std::collections::BTreeMap;

/// Applies one diagnosed repair. Returns `true` if `var`'s repair count
/// just crossed `threshold` and the Loop Controller must invoke the
/// Hard-to-Learn Fallback for it.
pub fn repair(
    spec: &SpecStore,
    order: &DependencyOrder,
    basis: &mut BasisStore,
    cx: &Counterexample,
    diag: &Diagnosis,
    y_fix: &BTreeMap<VarId, bool>,
    threshold: usize,
) -> SynthResult<bool> {
    let var = diag.var;
    let rank = order.rank_of(var).expect("diagnosed var is an output");
    let upstream = order.upstream_of(var).unwrap_or(&[]).to_vec();

    let entry = basis
        .get(var)
        .cloned()
        .ok_or_else(|| SynthesisError::InvariantViolation(format!("no basis entry for y{var}")))?;

    let mut fresh = FreshVars {
        next: spec.max_var() + 1,
    };
    let mut clauses: Vec<Clause> = spec.clauses().to_vec();

    for (idx, &y) in order.order().iter().enumerate() {
        if idx > rank {
            let value = y_fix.get(&y).copied().unwrap_or(false);
            clauses.push(Clause::unit(Lit::new(y, value)));
        }
    }

    let (a_lit, c_lit) = tseitin_basis_literals(&entry, &mut fresh, &mut clauses);

    let g_lit = const_lit(diag.g_val, &mut fresh, &mut clauses);
    let g_and_not_c = and_gate(&[g_lit, !c_lit], &mut fresh, &mut clauses);
    let psi_lit = or_gate(&[a_lit, g_and_not_c], &mut fresh, &mut clauses);

    let current = cx.sigma_y_prime.get(&var).copied().unwrap_or(!diag.target);
    clauses.push(Clause::unit(if current { psi_lit } else { !psi_lit }));

    let mut assumptions: Vec<Lit> = Vec::with_capacity(spec.universals().len() + upstream.len());
    for x in spec.universals() {
        if let Some(&value) = cx.sigma_x.get(&x) {
            assumptions.push(Lit::new(x, value));
        }
    }
    for &y in &upstream {
        if let Some(&value) = cx.sigma_y_prime.get(&y) {
            assumptions.push(Lit::new(y, value));
        }
    }

    let mut solver = CoreSolver::with_clauses(clauses);
    let core = match solver.solve_under_assumptions(&assumptions) {
        SatOutcome::Unsat { core } => core,
        SatOutcome::Sat(_) => {
            return Err(SynthesisError::InvariantViolation(format!(
                "conflict formula for y{var} was satisfiable; diagnosis was not actually a conflict"
            )))
        }
    };
    let beta = Cube::from_literals(core).unwrap_or_else(Cube::empty);

    let entry_mut = basis
        .get_mut(var)
        .ok_or_else(|| SynthesisError::InvariantViolation(format!("no basis entry for y{var}")))?;
    match diag.action {
        RepairAction::ShrinkA => entry_mut.shrink_a(&beta),
        RepairAction::ExpandA => entry_mut.expand_a(beta),
        RepairAction::ShrinkC => entry_mut.shrink_c(&beta),
        RepairAction::ExpandC => entry_mut.expand_c(beta),
    }
    entry_mut.repair_count += 1;

    #[cfg(feature = "boundary_check")]
    assert_a_and_c_disjoint(spec, var, entry_mut)?;

    Ok(entry_mut.repair_count > threshold && !entry_mut.frozen)
}

/// Checked incrementally after each repair by a satisfiability probe in
/// test builds: Â_i ∧ Ĉ_i must be unsatisfiable over all σ, not merely
/// false at the points this repair has seen so far.
#[cfg(feature = "boundary_check")]
fn assert_a_and_c_disjoint(
    spec: &SpecStore,
    var: VarId,
    entry: &crate::basis::BasisEntry,
) -> SynthResult<()> {
    let mut fresh = FreshVars {
        next: spec.max_var() + 1,
    };
    let mut clauses = Vec::new();
    let (a_lit, c_lit) = tseitin_basis_literals(entry, &mut fresh, &mut clauses);
    let conjunction = and_gate(&[a_lit, c_lit], &mut fresh, &mut clauses);
    let mut solver = CoreSolver::with_clauses(clauses);
    match solver.solve_under_assumptions(&[conjunction]) {
        SatOutcome::Unsat { .. } => Ok(()),
        SatOutcome::Sat(_) => Err(SynthesisError::InvariantViolation(format!(
            "y{var}: A_i and C_i are simultaneously satisfiable after repair"
        ))),
    }
}
