//! Learner: one multi-class decision tree per y_i over feature set
//! X ∪ Y_{<i}, labels {MUST0, MUST1, DONTCARE}; then extraction of
//! root-to-leaf path conjunctions into initial DNF forms Â_i, Ĉ_i.
use crate::{
    labeler::LabeledRow,
    types::{Cube, Dnf, Label, Lit, VarId},
};

/// A CART-shaped decision tree: internal nodes split on one feature
/// (`false` down the left edge, `true` down the right), leaves carry a
/// `Label`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecisionTree {
    Leaf(Label),
    Node {
        feature_index: usize,
        left: Box<DecisionTree>,
        right: Box<DecisionTree>,
    },
}

/// `fit(rows, labels) -> tree`; the tree exposes pre-order traversal via
/// `DecisionTree`'s own shape, so no separate accessor is needed.
pub trait TreeLearner {
    fn fit(&mut self, rows: &[LabeledRow]) -> DecisionTree;
}

/// Any tree learner with standard impurity and a depth cap is acceptable.
/// This is Gini impurity, greedy axis-aligned splits, ties broken
/// by smaller feature index -- the learner's one required determinism
/// property ("ties in the learner are resolved deterministically (fixed
/// seed)"); since splits are evaluated exhaustively in a fixed order
/// there is no actual randomness to seed.
#[derive(Clone, Debug)]
pub struct CartLearner {
    pub max_depth: usize,
}

impl Default for CartLearner {
    fn default() -> Self {
        CartLearner { max_depth: 8 }
    }
}

fn gini(counts: &[usize; 3]) -> f64 {
    let total = counts.iter().sum::<usize>() as f64;
    if total == 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|&c| (c as f64 / total).powi(2)).sum::<f64>()
}

fn label_index(label: Label) -> usize {
    match label {
        Label::Must1 => 0,
        Label::Must0 => 1,
        Label::DontCare => 2,
    }
}

fn counts_of(rows: &[&LabeledRow]) -> [usize; 3] {
    let mut counts = [0usize; 3];
    for row in rows {
        counts[label_index(row.label)] += 1;
    }
    counts
}

/// Ties broken by label priority Must1 > Must0 > DontCare, then (for equal
/// priority never occurring, since counts differ per label) by count.
fn majority_label(rows: &[&LabeledRow]) -> Label {
    let counts = counts_of(rows);
    [Label::Must1, Label::Must0, Label::DontCare]
        .into_iter()
        .max_by_key(|&l| counts[label_index(l)])
        .unwrap_or(Label::DontCare)
}

fn is_uniform(rows: &[&LabeledRow]) -> Option<Label> {
    let first = rows.first()?.label;
    rows.iter().all(|r| r.label == first).then_some(first)
}

struct Split<'a> {
    feature: usize,
    left: Vec<&'a LabeledRow>,
    right: Vec<&'a LabeledRow>,
}

fn best_split<'a>(rows: &[&'a LabeledRow], num_features: usize) -> Option<Split<'a>> {
    let parent_gini = gini(&counts_of(rows));
    let mut best: Option<(f64, Split<'a>)> = None;
    for feature in 0..num_features {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for &row in rows {
            if row.features[feature] {
                right.push(row);
            } else {
                left.push(row);
            }
        }
        if left.is_empty() || right.is_empty() {
            continue;
        }
        let total = rows.len() as f64;
        let weighted = (left.len() as f64 / total) * gini(&counts_of(&left))
            + (right.len() as f64 / total) * gini(&counts_of(&right));
        if weighted >= parent_gini {
            continue; // no information gain; not worth splitting on
        }
        let candidate = Split {
            feature,
            left,
            right,
        };
        match &best {
            Some((score, _)) if *score <= weighted => {}
            _ => best = Some((weighted, candidate)),
        }
    }
    best.map(|(_, split)| split)
}

fn build(rows: Vec<&LabeledRow>, depth: usize, max_depth: usize) -> DecisionTree {
    if rows.is_empty() {
        return DecisionTree::Leaf(Label::DontCare);
    }
    if let Some(label) = is_uniform(&rows) {
        return DecisionTree::Leaf(label);
    }
    let num_features = rows[0].features.len();
    if depth >= max_depth || num_features == 0 {
        return DecisionTree::Leaf(majority_label(&rows));
    }
    match best_split(&rows, num_features) {
        Some(split) => DecisionTree::Node {
            feature_index: split.feature,
            left: Box::new(build(split.left, depth + 1, max_depth)),
            right: Box::new(build(split.right, depth + 1, max_depth)),
        },
        None => DecisionTree::Leaf(majority_label(&rows)),
    }
}

impl TreeLearner for CartLearner {
    fn fit(&mut self, rows: &[LabeledRow]) -> DecisionTree {
        build(rows.iter().collect(), 0, self.max_depth)
    }
}

/// Extracts path conjunctions into (Â_i, Ĉ_i): for each leaf, the cube
/// is the conjunction of literals along its root path (right
/// edge = positive literal on that node's feature variable, left edge =
/// negative); MUST1 leaves contribute to the first `Dnf`, MUST0 leaves to
/// the second, DONTCARE leaves contribute nothing.
pub fn extract_dnf(tree: &DecisionTree, allowed: &[VarId]) -> (Dnf, Dnf) {
    let mut a_dnf = Dnf::new();
    let mut c_dnf = Dnf::new();
    let mut path = Vec::new();
    walk(tree, allowed, &mut path, &mut a_dnf, &mut c_dnf);
    (a_dnf, c_dnf)
}

fn walk(
    tree: &DecisionTree,
    allowed: &[VarId],
    path: &mut Vec<Lit>,
    a_dnf: &mut Dnf,
    c_dnf: &mut Dnf,
) {
    match tree {
        DecisionTree::Leaf(Label::Must1) => {
            if let Some(cube) = Cube::from_literals(path.iter().copied()) {
                a_dnf.push(cube);
            }
        }
        DecisionTree::Leaf(Label::Must0) => {
            if let Some(cube) = Cube::from_literals(path.iter().copied()) {
                c_dnf.push(cube);
            }
        }
        DecisionTree::Leaf(Label::DontCare) => {}
        DecisionTree::Node {
            feature_index,
            left,
            right,
        } => {
            let var = allowed[*feature_index];
            path.push(Lit::new(var, false));
            walk(left, allowed, path, a_dnf, c_dnf);
            path.pop();
            path.push(Lit::new(var, true));
            walk(right, allowed, path, a_dnf, c_dnf);
            path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(features: Vec<bool>, label: Label) -> LabeledRow {
        LabeledRow { features, label }
    }

    #[test]
    fn uniform_rows_produce_a_single_leaf() {
        let rows = vec![row(vec![true], Label::Must1), row(vec![false], Label::Must1)];
        let tree = CartLearner::default().fit(&rows);
        assert_eq!(tree, DecisionTree::Leaf(Label::Must1));
    }

    #[test]
    fn splits_on_the_discriminating_feature() {
        let rows = vec![
            row(vec![false], Label::Must0),
            row(vec![true], Label::Must1),
        ];
        let tree = CartLearner::default().fit(&rows);
        assert!(matches!(tree, DecisionTree::Node { .. }));
        let (a, c) = extract_dnf(&tree, &[2]);
        assert_eq!(a.cubes().count(), 1);
        assert_eq!(c.cubes().count(), 1);
    }

    #[test]
    fn dont_care_leaves_contribute_nothing() {
        let rows = vec![row(vec![], Label::DontCare)];
        let tree = CartLearner::default().fit(&rows);
        let (a, c) = extract_dnf(&tree, &[]);
        assert!(a.is_empty());
        assert!(c.is_empty());
    }

    #[test]
    fn empty_rows_yield_constant_false_on_both_sides() {
        let tree = CartLearner::default().fit(&[]);
        let (a, c) = extract_dnf(&tree, &[]);
        assert!(a.is_empty() && c.is_empty());
    }
}
