//! Dependency Analyzer: produces a total topological order over Y from
//! syntactic co-occurrence in F, by repeatedly removing the minimum-degree
//! vertex of the co-occurrence graph.
use {
    crate::types::{SpecStore, VarId},
    std::collections::{BTreeMap, BTreeSet},
};

/// A total order over the existential variables. `order[k]` is the
/// variable assigned rank `k`; `rank(v)` is its inverse.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DependencyOrder {
    order: Vec<VarId>,
}

impl DependencyOrder {
    pub fn order(&self) -> &[VarId] {
        &self.order
    }

    pub fn rank_of(&self, var: VarId) -> Option<usize> {
        self.order.iter().position(|&v| v == var)
    }

    /// The allowed feature set of `var`: X ∪ { y_j | rank(y_j) < rank(var) }.
    /// Returns `None` if `var` is not an existential variable of this order.
    pub fn upstream_of(&self, var: VarId) -> Option<&[VarId]> {
        self.rank_of(var).map(|r| &self.order[..r])
    }
}

/// Writes `rank(y_i)` into every existential `Var` of `spec` and returns
/// the order for callers that need it directly (the Learner, the
/// Repairer's rank comparisons). This always succeeds: every Y-variable
/// gets removed from the graph exactly once.
pub fn analyze(spec: &mut SpecStore) -> DependencyOrder {
    let existentials: BTreeSet<VarId> = spec.existentials().into_iter().collect();

    // undirected co-occurrence graph restricted to Y, as adjacency sets
    let mut adjacency: BTreeMap<VarId, BTreeSet<VarId>> =
        existentials.iter().map(|&v| (v, BTreeSet::new())).collect();
    for clause in spec.clauses() {
        let ys: Vec<VarId> = clause
            .literals()
            .iter()
            .map(|l| l.var())
            .filter(|v| existentials.contains(v))
            .collect();
        for (idx, &a) in ys.iter().enumerate() {
            for &b in &ys[idx + 1..] {
                if a != b {
                    adjacency.get_mut(&a).unwrap().insert(b);
                    adjacency.get_mut(&b).unwrap().insert(a);
                }
            }
        }
    }

    let mut remaining: BTreeSet<VarId> = existentials;
    let mut order = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        // minimum current degree, ties broken by smaller variable id; see
        // DESIGN.md for why smallest-id was picked over other tie-breaks.
        let next = *remaining
            .iter()
            .min_by_key(|&&v| {
                let degree = adjacency[&v].intersection(&remaining).count();
                (degree, v)
            })
            .expect("remaining is non-empty");
        order.push(next);
        remaining.remove(&next);
    }

    for (rank, &v) in order.iter().enumerate() {
        spec.set_rank(v, rank);
    }
    DependencyOrder { order }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_degree_ties_break_by_smallest_id() {
        // y1, y2, y3 pairwise disconnected: all degree 0, so the order is
        // just ascending id.
        let text = "p cnf 5 3\ne 1 2 3 0\na 4 5 0\n1 4 0\n2 5 0\n3 4 0\n";
        let mut spec = crate::types::SpecStore::from_qdimacs(text).unwrap();
        let order = analyze(&mut spec);
        assert_eq!(order.order(), &[1, 2, 3]);
    }

    #[test]
    fn order_is_stable_across_repeated_runs() {
        let text = "p cnf 4 3\ne 1 4 0\na 2 3 0\n-1 2 0\n-1 3 0\n1 2 3 0\n";
        let mut spec1 = crate::types::SpecStore::from_qdimacs(text).unwrap();
        let mut spec2 = crate::types::SpecStore::from_qdimacs(text).unwrap();
        assert_eq!(analyze(&mut spec1), analyze(&mut spec2));
    }

    #[test]
    fn upstream_of_is_the_strict_prefix() {
        let text = "p cnf 4 1\ne 1 4 0\na 2 3 0\n1 2 3 4 0\n";
        let mut spec = crate::types::SpecStore::from_qdimacs(text).unwrap();
        let order = analyze(&mut spec);
        let last = *order.order().last().unwrap();
        assert_eq!(order.upstream_of(last).unwrap().len(), order.order().len() - 1);
    }
}
