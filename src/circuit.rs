//! Candidate Circuit Builder: composes ψ_i = Â_i ∨ (g_i ∧ ¬Ĉ_i) for
//! every output and produces two structural copies of F -- `valid_orig`
//! over the original Y wires, `valid_syn` over the synthesized Y wires
//! driven by ψ -- plus the single `out = valid_orig ∧ ¬valid_syn` signal.
//! Everything is Tseitin-encoded into plain CNF so the Verifier can hand
//! it straight to an `IncrementalSatSolver`.
use crate::{
    analyzer::DependencyOrder,
    basis::{BasisEntry, BasisStore},
    types::{Clause, Cnf, Cube, Dnf, Lit, SpecStore, VarId},
};
use std::collections::BTreeMap;

/// Fresh-variable allocator shared with the Repairer's conflict-formula
/// builder, which needs the same Tseitin gate vocabulary.
pub(crate) struct FreshVars {
    pub(crate) next: VarId,
}

impl FreshVars {
    pub(crate) fn alloc(&mut self) -> VarId {
        let v = self.next;
        self.next += 1;
        v
    }
}

pub(crate) fn and_gate(inputs: &[Lit], fresh: &mut FreshVars, clauses: &mut Vec<Clause>) -> Lit {
    let out = Lit::new(fresh.alloc(), true);
    for &i in inputs {
        clauses.push(Clause::from_literals([!out, i]).expect("fresh var disjoint"));
    }
    let mut back: Vec<Lit> = inputs.iter().map(|&i| !i).collect();
    back.push(out);
    clauses.push(Clause::from_literals(back).expect("fresh var disjoint"));
    out
}

pub(crate) fn or_gate(inputs: &[Lit], fresh: &mut FreshVars, clauses: &mut Vec<Clause>) -> Lit {
    let out = Lit::new(fresh.alloc(), true);
    let mut fwd: Vec<Lit> = vec![!out];
    fwd.extend(inputs.iter().copied());
    clauses.push(Clause::from_literals(fwd).expect("fresh var disjoint"));
    for &i in inputs {
        clauses.push(Clause::from_literals([!i, out]).expect("fresh var disjoint"));
    }
    out
}

pub(crate) fn const_lit(value: bool, fresh: &mut FreshVars, clauses: &mut Vec<Clause>) -> Lit {
    let lit = Lit::new(fresh.alloc(), true);
    clauses.push(Clause::unit(if value { lit } else { !lit }));
    lit
}

fn tseitin_cube(cube: &Cube, fresh: &mut FreshVars, clauses: &mut Vec<Clause>) -> Lit {
    if cube.literals().is_empty() {
        return const_lit(true, fresh, clauses);
    }
    and_gate(cube.literals(), fresh, clauses)
}

pub(crate) fn tseitin_dnf(dnf: &Dnf, fresh: &mut FreshVars, clauses: &mut Vec<Clause>) -> Lit {
    if dnf.is_empty() {
        return const_lit(false, fresh, clauses);
    }
    let cube_lits: Vec<Lit> = dnf.cubes().map(|c| tseitin_cube(c, fresh, clauses)).collect();
    or_gate(&cube_lits, fresh, clauses)
}

fn tseitin_clause(clause: &Clause, fresh: &mut FreshVars, clauses: &mut Vec<Clause>) -> Lit {
    if clause.literals().is_empty() {
        return const_lit(false, fresh, clauses);
    }
    or_gate(clause.literals(), fresh, clauses)
}

pub(crate) fn tseitin_cnf(cnf: &Cnf, fresh: &mut FreshVars, clauses: &mut Vec<Clause>) -> Lit {
    if cnf.is_empty() {
        return const_lit(true, fresh, clauses);
    }
    let clause_lits: Vec<Lit> = cnf.clauses().map(|c| tseitin_clause(c, fresh, clauses)).collect();
    and_gate(&clause_lits, fresh, clauses)
}

fn iff(a: Lit, b: Lit, clauses: &mut Vec<Clause>) {
    clauses.push(Clause::from_literals([!a, b]).expect("disjoint vars"));
    clauses.push(Clause::from_literals([a, !b]).expect("disjoint vars"));
}

fn remap_lit(lit: Lit, map: &BTreeMap<VarId, VarId>) -> Lit {
    Lit::new(map.get(&lit.var()).copied().unwrap_or(lit.var()), lit.is_positive())
}

fn remap_cube(cube: &Cube, map: &BTreeMap<VarId, VarId>) -> Cube {
    Cube::from_literals(cube.literals().iter().map(|&l| remap_lit(l, map)))
        .expect("remapping preserves variable-disjointness")
}

fn remap_clause(clause: &Clause, map: &BTreeMap<VarId, VarId>) -> Clause {
    Clause::from_literals(clause.literals().iter().map(|&l| remap_lit(l, map)))
        .expect("remapping preserves variable-disjointness")
}

fn remap_dnf(dnf: &Dnf, map: &BTreeMap<VarId, VarId>) -> Dnf {
    let mut out = Dnf::new();
    for cube in dnf.cubes() {
        out.push(remap_cube(cube, map));
    }
    out
}

fn remap_cnf(cnf: &Cnf, map: &BTreeMap<VarId, VarId>) -> Cnf {
    Cnf::from_clauses(cnf.clauses().map(|c| remap_clause(c, map)))
}

fn remap_entry(entry: &BasisEntry, map: &BTreeMap<VarId, VarId>) -> BasisEntry {
    BasisEntry {
        a_dnf: remap_dnf(&entry.a_dnf, map),
        a_cnf: remap_cnf(&entry.a_cnf, map),
        c_dnf: remap_dnf(&entry.c_dnf, map),
        c_cnf: remap_cnf(&entry.c_cnf, map),
        repair_count: entry.repair_count,
        frozen: entry.frozen,
        semantic: entry.semantic.as_ref().map(|sem| crate::basis::SemanticDefinition {
            a_pos: remap_cnf(&sem.a_pos, map),
            a_neg: remap_cnf(&sem.a_neg, map),
            c_pos: remap_cnf(&sem.c_pos, map),
            c_neg: remap_cnf(&sem.c_neg, map),
        }),
    }
}

/// Encodes Â_i and Ĉ_i (whichever representation -- learned dual
/// DNF/CNF, or the Fallback's semantic cofactor pair -- `entry` carries)
/// into Tseitin gates and returns their literals.
pub(crate) fn tseitin_basis_literals(
    entry: &BasisEntry,
    fresh: &mut FreshVars,
    clauses: &mut Vec<Clause>,
) -> (Lit, Lit) {
    match &entry.semantic {
        Some(sem) => {
            let a_pos = tseitin_cnf(&sem.a_pos, fresh, clauses);
            let a_neg = tseitin_cnf(&sem.a_neg, fresh, clauses);
            let a_lit = and_gate(&[a_pos, !a_neg], fresh, clauses);
            let c_pos = tseitin_cnf(&sem.c_pos, fresh, clauses);
            let c_neg = tseitin_cnf(&sem.c_neg, fresh, clauses);
            let c_lit = and_gate(&[c_pos, !c_neg], fresh, clauses);
            (a_lit, c_lit)
        }
        None => {
            let a_dnf_lit = tseitin_dnf(&entry.a_dnf, fresh, clauses);
            let a_cnf_lit = tseitin_cnf(&entry.a_cnf, fresh, clauses);
            let a_lit = and_gate(&[a_dnf_lit, a_cnf_lit], fresh, clauses);
            let c_dnf_lit = tseitin_dnf(&entry.c_dnf, fresh, clauses);
            let c_cnf_lit = tseitin_cnf(&entry.c_cnf, fresh, clauses);
            let c_lit = and_gate(&[c_dnf_lit, c_cnf_lit], fresh, clauses);
            (a_lit, c_lit)
        }
    }
}

/// The fully Tseitin-encoded error formula E, ready to hand to an
/// `IncrementalSatSolver` with `[out]` as the sole assumption.
pub struct CandidateCircuit {
    pub clauses: Vec<Clause>,
    pub out: Lit,
    /// original y_i var -> its g_i literal.
    pub g_vars: BTreeMap<VarId, Lit>,
    /// original y_i var -> its y′_i var id.
    pub y_prime: BTreeMap<VarId, VarId>,
}

/// Builds E = F(X,Y) ∧ ¬F(X,Y′) ∧ ⋀_i (y′_i ↔ ψ_i(X, y′_{<i}, g_i)),
/// with `out` the literal representing the whole conjunction's truth
/// value. A model with `out` true is a counterexample; `out`
/// unsatisfiable means the basis is correct.
pub fn build_candidate_circuit(
    spec: &SpecStore,
    order: &DependencyOrder,
    basis: &BasisStore,
) -> CandidateCircuit {
    let mut fresh = FreshVars {
        next: spec.max_var() + 1,
    };
    let mut clauses = Vec::new();

    let valid_orig = tseitin_cnf(&spec.as_cnf(), &mut fresh, &mut clauses);

    let mut y_prime = BTreeMap::new();
    let mut g_vars = BTreeMap::new();
    for &y in order.order() {
        y_prime.insert(y, fresh.alloc());
        g_vars.insert(y, Lit::new(fresh.alloc(), true));
    }

    let orig_to_prime: BTreeMap<VarId, VarId> = y_prime.clone();
    let synthesized_cnf = remap_cnf(&spec.as_cnf(), &orig_to_prime);
    let valid_syn = tseitin_cnf(&synthesized_cnf, &mut fresh, &mut clauses);

    // Â_i/Ĉ_i are wired over the synthesized chain (y′_{<i}), matching
    // ψ_i(X, y′_{<i}, g_i); a learned entry only ever mentions upstream
    // outputs, but a Fallback-produced semantic entry may structurally
    // reference any output, so every output is remapped to its primed id.
    for &y in order.order() {
        let entry = basis.get(y).cloned().unwrap_or_default();
        let remapped = remap_entry(&entry, &orig_to_prime);
        let (a_lit, c_lit) = tseitin_basis_literals(&remapped, &mut fresh, &mut clauses);

        let g_lit = g_vars[&y];
        let g_and_not_c = and_gate(&[g_lit, !c_lit], &mut fresh, &mut clauses);
        let psi_lit = or_gate(&[a_lit, g_and_not_c], &mut fresh, &mut clauses);

        let y_prime_lit = Lit::new(y_prime[&y], true);
        iff(y_prime_lit, psi_lit, &mut clauses);
    }

    let not_valid_syn = !valid_syn;
    let out = and_gate(&[valid_orig, not_valid_syn], &mut fresh, &mut clauses);

    CandidateCircuit {
        clauses,
        out,
        g_vars,
        y_prime,
    }
}

#[cfg(feature = "circuit_export")]
pub mod export {
    //! Structural circuit description writer, JSON-serialized. Shipping
    //! this to a downstream verification tool is an external concern;
    //! this module only gives it something serializable to ship.
    use super::CandidateCircuit;
    use serde::Serialize;

    #[derive(Serialize)]
    pub struct NetlistExport {
        pub clauses: Vec<Vec<i32>>,
        pub out: i32,
        pub g_vars: Vec<(u32, i32)>,
        pub y_prime: Vec<(u32, u32)>,
    }

    impl From<&CandidateCircuit> for NetlistExport {
        fn from(circuit: &CandidateCircuit) -> Self {
            NetlistExport {
                clauses: circuit
                    .clauses
                    .iter()
                    .map(|c| c.literals().iter().map(|&l| i32::from(l)).collect())
                    .collect(),
                out: i32::from(circuit.out),
                g_vars: circuit
                    .g_vars
                    .iter()
                    .map(|(&y, &g)| (y, i32::from(g)))
                    .collect(),
                y_prime: circuit.y_prime.iter().map(|(&y, &yp)| (y, yp)).collect(),
            }
        }
    }

    pub fn to_json(circuit: &CandidateCircuit) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&NetlistExport::from(circuit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analyzer::analyze,
        solver::{CoreSolver, IncrementalSatSolver, SatOutcome},
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
    fn correct_basis_makes_out_unsat() {
        let (spec, order) = example();
        let mut basis = BasisStore::new(&order.order().to_vec());
        // Â_1 = ¬x2 ∨ (x2 ∧ ¬x3), Ĉ_1 = false, Â_4 = false, Ĉ_4 = false
        {
            let entry = basis.get_mut(1).unwrap();
            entry.expand_a(Cube::from_literals([Lit::new(2, false)]).unwrap());
            entry.expand_a(Cube::from_literals([Lit::new(2, true), Lit::new(3, false)]).unwrap());
        }
        {
            let entry = basis.get_mut(4).unwrap();
            entry.expand_a(Cube::empty());
        }
        let circuit = build_candidate_circuit(&spec, &order, &basis);
        let mut solver = CoreSolver::with_clauses(circuit.clauses.clone());
        let outcome = solver.solve_under_assumptions(&[circuit.out]);
        assert!(!outcome.is_sat(), "a correct basis must verify UNSAT");
    }

    #[test]
    fn over_eager_basis_produces_a_counterexample() {
        let (spec, order) = example();
        let mut basis = BasisStore::new(&order.order().to_vec());
        basis.get_mut(1).unwrap().expand_a(Cube::empty()); // Â_1 = true (over-eager)
        basis.get_mut(4).unwrap().expand_a(Cube::empty());
        let circuit = build_candidate_circuit(&spec, &order, &basis);
        let mut solver = CoreSolver::with_clauses(circuit.clauses.clone());
        match solver.solve_under_assumptions(&[circuit.out]) {
            SatOutcome::Sat(_) => {}
            SatOutcome::Unsat { .. } => panic!("Â_1 = true should admit a counterexample"),
        }
    }
}
