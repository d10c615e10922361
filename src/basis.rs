//! Basis Store: per-output dual DNF/CNF representation of Â_i, Ĉ_i. The
//! effective set is the conjunction of the DNF and CNF side; DNFs only
//! grow (expansion), CNFs only accrete clauses (shrinkage).
use crate::types::{Assignment, Cnf, Cube, Dnf, VarId};
use std::collections::BTreeMap;

/// The Hard-to-Learn Fallback's semantic replacement for a learned
/// Â_i/Ĉ_i: the cofactor-derived definitions, kept structural (plain CNF
/// pairs evaluated by conjunction) rather than flattened into a DNF, to
/// avoid the blow-up flattening an arbitrary cofactor would cause.
#[derive(Clone, Debug, Default)]
pub struct SemanticDefinition {
    /// Â_i = a_pos ∧ ¬a_neg, i.e. F|_{y_i=1} ∧ ¬F|_{y_i=0}.
    pub a_pos: Cnf,
    pub a_neg: Cnf,
    /// Ĉ_i = c_pos ∧ ¬c_neg, i.e. F|_{y_i=0} ∧ ¬F|_{y_i=1}.
    pub c_pos: Cnf,
    pub c_neg: Cnf,
}

impl SemanticDefinition {
    fn a_value(&self, assign: &Assignment) -> bool {
        self.a_pos.evaluate(assign) && !self.a_neg.evaluate(assign)
    }

    fn c_value(&self, assign: &Assignment) -> bool {
        self.c_pos.evaluate(assign) && !self.c_neg.evaluate(assign)
    }
}

/// Per-output basis entry. `A_cnf`/`C_cnf` start at the constant `true`
/// (empty `Cnf`); `A_dnf`/`C_dnf` start at the constant `false` (empty
/// `Dnf`).
#[derive(Clone, Debug, Default)]
pub struct BasisEntry {
    pub a_dnf: Dnf,
    pub a_cnf: Cnf,
    pub c_dnf: Dnf,
    pub c_cnf: Cnf,
    pub repair_count: usize,
    /// set by the Repairer once `repair_count` exceeds the threshold;
    /// the Hard-to-Learn Fallback owns this entry from then on and the
    /// Repairer must not touch it again.
    pub frozen: bool,
    /// present once the Fallback has run for this output; when set it
    /// overrides `a_dnf`/`a_cnf`/`c_dnf`/`c_cnf` entirely.
    pub semantic: Option<SemanticDefinition>,
}

impl BasisEntry {
    /// Â_i(σ) = A_dnf(σ) ∧ A_cnf(σ), or the semantic definition once the
    /// Fallback has replaced it.
    pub fn a_value(&self, assign: &Assignment) -> bool {
        match &self.semantic {
            Some(sem) => sem.a_value(assign),
            None => self.a_dnf.evaluate(assign) && self.a_cnf.evaluate(assign),
        }
    }

    /// Ĉ_i(σ) = C_dnf(σ) ∧ C_cnf(σ), or the semantic definition.
    pub fn c_value(&self, assign: &Assignment) -> bool {
        match &self.semantic {
            Some(sem) => sem.c_value(assign),
            None => self.c_dnf.evaluate(assign) && self.c_cnf.evaluate(assign),
        }
    }

    /// ψ_i(σ, g) = Â_i(σ) ∨ (g ∧ ¬Ĉ_i(σ)).
    pub fn psi_value(&self, assign: &Assignment, g: bool) -> bool {
        self.a_value(assign) || (g && !self.c_value(assign))
    }

    pub fn shrink_a(&mut self, beta: &Cube) {
        self.a_cnf.push(beta.negate_to_clause());
    }

    pub fn expand_a(&mut self, beta: Cube) {
        self.a_dnf.push(beta);
    }

    pub fn shrink_c(&mut self, beta: &Cube) {
        self.c_cnf.push(beta.negate_to_clause());
    }

    pub fn expand_c(&mut self, beta: Cube) {
        self.c_dnf.push(beta);
    }

    /// Optional absorption pass that drops DNF cubes and CNF clauses made
    /// redundant by others already present. Off by default; the Loop
    /// Controller invokes it explicitly when enabled in `Config`.
    pub fn simplify(&mut self) {
        self.a_dnf.simplify();
        self.c_dnf.simplify();
        self.a_cnf.simplify();
        self.c_cnf.simplify();
    }

    /// The safety invariant checked in test/`boundary_check` builds: Â_i
    /// and Ĉ_i must never both hold for the same σ.
    pub fn is_consistent_at(&self, assign: &Assignment) -> bool {
        !(self.a_value(assign) && self.c_value(assign))
    }
}

/// Owns one `BasisEntry` per existential variable. Exclusively owned and
/// mutated by the Loop Controller, via the Repairer or the Fallback; no
/// other component holds a mutable reference at the same time.
#[derive(Clone, Debug, Default)]
pub struct BasisStore {
    entries: BTreeMap<VarId, BasisEntry>,
}

impl BasisStore {
    pub fn new(existentials: &[VarId]) -> Self {
        BasisStore {
            entries: existentials
                .iter()
                .map(|&v| (v, BasisEntry::default()))
                .collect(),
        }
    }

    pub fn get(&self, var: VarId) -> Option<&BasisEntry> {
        self.entries.get(&var)
    }

    pub fn get_mut(&mut self, var: VarId) -> Option<&mut BasisEntry> {
        self.entries.get_mut(&var)
    }

    pub fn entries(&self) -> impl Iterator<Item = (VarId, &BasisEntry)> {
        self.entries.iter().map(|(&v, e)| (v, e))
    }

    pub fn simplify_entry(&mut self, var: VarId) {
        if let Some(entry) = self.entries.get_mut(&var) {
            entry.simplify();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Lit;

    fn assign(values: &[(u32, bool)]) -> Assignment {
        let mut a = Assignment::with_capacity(values.iter().map(|(v, _)| *v).max().unwrap_or(0));
        for &(v, b) in values {
            a.set(v, b);
        }
        a
    }

    #[test]
    fn fresh_entry_is_a_false_c_false() {
        let entry = BasisEntry::default();
        let sigma = assign(&[(2, true), (3, false)]);
        assert!(!entry.a_value(&sigma));
        assert!(!entry.c_value(&sigma));
        assert!(!entry.psi_value(&sigma, false));
        assert!(entry.psi_value(&sigma, true)); // g ∧ ¬false = true
    }

    #[test]
    fn expand_a_then_that_point_is_forced_one() {
        let mut entry = BasisEntry::default();
        let cube = Cube::from_literals([Lit::new(2, true)]).unwrap();
        entry.expand_a(cube);
        let sigma = assign(&[(2, true)]);
        assert!(entry.a_value(&sigma));
        assert!(entry.psi_value(&sigma, false));
    }

    #[test]
    fn shrink_a_excludes_a_point_previously_admitted_by_true_cnf() {
        let mut entry = BasisEntry::default();
        entry.expand_a(Cube::empty()); // A_dnf = true everywhere
        let sigma = assign(&[(2, true), (3, true)]);
        assert!(entry.a_value(&sigma));
        let beta = Cube::from_literals([Lit::new(2, true), Lit::new(3, true)]).unwrap();
        entry.shrink_a(&beta);
        assert!(!entry.a_value(&sigma));
    }

    #[test]
    fn reexpanding_a_clause_already_shrunk_out_is_a_no_op() {
        // A_cnf only accretes: once β is excluded by shrinkage, expanding
        // A_dnf by the very same β cannot bring it back (A_cnf ∧ ¬β ∧ β is
        // false), so the effective set after shrink+expand equals the
        // effective set right after the shrink alone.
        let mut entry = BasisEntry::default();
        entry.expand_a(Cube::empty());
        let beta = Cube::from_literals([Lit::new(2, true)]).unwrap();
        entry.shrink_a(&beta);
        let sigma_true = assign(&[(2, true)]);
        let after_shrink = entry.a_value(&sigma_true);
        entry.expand_a(beta);
        assert_eq!(entry.a_value(&sigma_true), after_shrink);
        assert!(!after_shrink);
    }
}
