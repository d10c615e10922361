//! Cubes, clauses, and their set-of aggregates DNF/CNF.
//!
//! A `Cube` is a conjunction of literals, treated as a set: duplicates
//! collapse, and a variable occurring with both polarities makes the cube
//! unsatisfiable, so construction drops it (`Cube::from_literals` returns
//! `None`). A `Clause` is the dual: a disjunction of literals, where a
//! variable occurring with both polarities makes the clause a tautology,
//! so it is dropped the same way (conjoining a tautology into a CNF is a
//! no-op). `Dnf`/`Cnf` are the implicit-∨ / implicit-∧ aggregates.
use {
    super::{assignment::Assignment, lit::Lit, var::VarId},
    std::collections::BTreeSet,
    std::fmt,
};

fn collapse(literals: impl IntoIterator<Item = Lit>) -> Option<Vec<Lit>> {
    let mut by_var: std::collections::BTreeMap<VarId, bool> = std::collections::BTreeMap::new();
    for lit in literals {
        match by_var.insert(lit.var(), lit.is_positive()) {
            Some(prev) if prev != lit.is_positive() => return None,
            _ => {}
        }
    }
    Some(
        by_var
            .into_iter()
            .map(|(v, pos)| Lit::new(v, pos))
            .collect(),
    )
}

/// A conjunction of literals. Always internally consistent: there is no
/// way to construct a `Cube` that is identically false.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Cube {
    lits: Vec<Lit>,
}

impl Cube {
    pub const fn empty() -> Self {
        Cube { lits: Vec::new() }
    }

    /// Builds a cube from literals, collapsing duplicates. Returns `None`
    /// if a variable appears with both polarities (the cube is
    /// unsatisfiable and must be dropped by the caller).
    pub fn from_literals(literals: impl IntoIterator<Item = Lit>) -> Option<Cube> {
        collapse(literals).map(|lits| Cube { lits })
    }

    pub fn literals(&self) -> &[Lit] {
        &self.lits
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn evaluate(&self, assign: &Assignment) -> bool {
        self.lits.iter().all(|l| assign.satisfies(*l) == Some(true))
    }

    /// True if every literal of `self` also appears in `other` (so `other`
    /// is at least as restrictive; used by the simplification pass to
    /// absorb subsumed cubes).
    pub fn is_subset_of(&self, other: &Cube) -> bool {
        self.lits.iter().all(|l| other.lits.contains(l))
    }

    /// ¬β as a clause: the disjunction of this cube's literals negated.
    /// Used by the Repairer to shrink a CNF side: `A_cnf ← A_cnf ∧ ¬β` is
    /// `A_cnf.push(beta.negate_to_clause())`.
    pub fn negate_to_clause(&self) -> Clause {
        Clause::from_literals(self.lits.iter().map(|l| !*l))
            .expect("a cube's literals are already variable-disjoint")
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.lits.is_empty() {
            return write!(f, "true");
        }
        let parts: Vec<String> = self.lits.iter().map(|l| l.to_string()).collect();
        write!(f, "({})", parts.join(" & "))
    }
}

/// A disjunction of clauses -- here, the dual of `Cube`: a disjunction of
/// literals. A tautological clause (both polarities of some variable
/// present) is dropped by the caller via `Clause::from_literals` returning
/// `None`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    pub fn from_literals(literals: impl IntoIterator<Item = Lit>) -> Option<Clause> {
        collapse(literals).map(|lits| Clause { lits })
    }

    pub fn unit(lit: Lit) -> Clause {
        Clause { lits: vec![lit] }
    }

    pub fn literals(&self) -> &[Lit] {
        &self.lits
    }

    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    pub fn evaluate(&self, assign: &Assignment) -> bool {
        self.lits.iter().any(|l| assign.satisfies(*l) == Some(true))
    }

    pub fn negate_to_cube(&self) -> Cube {
        Cube::from_literals(self.lits.iter().map(|l| !*l))
            .expect("a clause's literals are already variable-disjoint")
    }

    pub fn is_subset_of(&self, other: &Clause) -> bool {
        self.lits.iter().all(|l| other.lits.contains(l))
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.lits.is_empty() {
            return write!(f, "false");
        }
        let parts: Vec<String> = self.lits.iter().map(|l| l.to_string()).collect();
        write!(f, "({})", parts.join(" | "))
    }
}

/// Disjunction of cubes. An empty `Dnf` is the constant `false`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Dnf {
    cubes: BTreeSet<Cube>,
}

impl Dnf {
    pub fn new() -> Self {
        Dnf::default()
    }

    pub fn cubes(&self) -> impl Iterator<Item = &Cube> {
        self.cubes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn push(&mut self, cube: Cube) {
        self.cubes.insert(cube);
    }

    pub fn evaluate(&self, assign: &Assignment) -> bool {
        self.cubes.iter().any(|c| c.evaluate(assign))
    }

    /// Drops cubes subsumed by a more general (subset) cube already present.
    pub fn simplify(&mut self) {
        let keep: Vec<Cube> = self
            .cubes
            .iter()
            .filter(|c| {
                !self
                    .cubes
                    .iter()
                    .any(|other| other != *c && other.is_subset_of(c))
            })
            .cloned()
            .collect();
        self.cubes = keep.into_iter().collect();
    }
}

/// Conjunction of clauses. An empty `Cnf` is the constant `true`:
/// initially A_cnf = C_cnf = true.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Cnf {
    clauses: BTreeSet<Clause>,
}

impl Cnf {
    pub fn new() -> Self {
        Cnf::default()
    }

    pub fn from_clauses(clauses: impl IntoIterator<Item = Clause>) -> Self {
        Cnf {
            clauses: clauses.into_iter().collect(),
        }
    }

    pub fn clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn push(&mut self, clause: Clause) {
        self.clauses.insert(clause);
    }

    pub fn evaluate(&self, assign: &Assignment) -> bool {
        self.clauses.iter().all(|c| c.evaluate(assign))
    }

    pub fn simplify(&mut self) {
        let keep: Vec<Clause> = self
            .clauses
            .iter()
            .filter(|c| {
                !self
                    .clauses
                    .iter()
                    .any(|other| other != *c && other.is_subset_of(c))
            })
            .cloned()
            .collect();
        self.clauses = keep.into_iter().collect();
    }

    pub fn max_var(&self) -> VarId {
        self.clauses
            .iter()
            .flat_map(|c| c.literals().iter().map(|l| l.var()))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_with_both_polarities_is_dropped() {
        let cube = Cube::from_literals([Lit::new(1, true), Lit::new(1, false)]);
        assert!(cube.is_none());
    }

    #[test]
    fn clause_with_both_polarities_is_dropped() {
        let clause = Clause::from_literals([Lit::new(1, true), Lit::new(1, false)]);
        assert!(clause.is_none());
    }

    #[test]
    fn empty_dnf_is_false_empty_cnf_is_true() {
        let dnf = Dnf::new();
        let cnf = Cnf::new();
        let mut a = Assignment::with_capacity(2);
        a.set(1, true);
        a.set(2, false);
        assert!(!dnf.evaluate(&a));
        assert!(cnf.evaluate(&a));
    }

    #[test]
    fn clause_negation_is_a_cube_of_flipped_literals() {
        let clause =
            Clause::from_literals([Lit::new(1, true), Lit::new(2, false)]).expect("valid clause");
        let cube = clause.negate_to_cube();
        let mut lits = cube.literals().to_vec();
        lits.sort();
        assert_eq!(lits, vec![Lit::new(1, false), Lit::new(2, true)]);
    }

    #[test]
    fn cube_negate_to_clause_flips_every_literal() {
        let cube = Cube::from_literals([Lit::new(2, true), Lit::new(3, true)]).unwrap();
        let clause = cube.negate_to_clause();
        let mut lits = clause.literals().to_vec();
        lits.sort();
        assert_eq!(lits, vec![Lit::new(2, false), Lit::new(3, false)]);
    }

    #[test]
    fn dnf_simplify_absorbs_subsumed_cubes() {
        let mut dnf = Dnf::new();
        dnf.push(Cube::from_literals([Lit::new(1, true)]).unwrap());
        dnf.push(Cube::from_literals([Lit::new(1, true), Lit::new(2, true)]).unwrap());
        dnf.simplify();
        assert_eq!(dnf.cubes().count(), 1);
    }
}
