//! Labeler: for a sample σ and output y_i, labels σ restricted to
//! X ∪ Y_{<i} ∪ Y_{>i} as MUST0/MUST1/DONTCARE by evaluating F twice --
//! once with y_i forced to each polarity -- against the total sample.
//! Since σ already binds every other variable, this is plain clause
//! evaluation, linear in clause count; no SAT call is made.
use crate::types::{Assignment, Label, SpecStore, SynthResult, SynthesisError, VarId};

/// One row of training data for the Learner: the sample's values on the
/// allowed feature set (X ∪ Y_{<i}, in the order given), plus the label
/// y_i carries in that sample. Features outside `allowed` are never
/// consulted.
#[derive(Clone, Debug)]
pub struct LabeledRow {
    pub features: Vec<bool>,
    pub label: Label,
}

/// Labels a single sample for output `y`. Both polarities unsatisfied is
/// impossible for a genuine model of F and is reported as an
/// `InvariantViolation`: the Labeler is a total function over models of F
/// and must never return both unsatisfied.
pub fn label_sample(spec: &SpecStore, sample: &Assignment, y: VarId) -> SynthResult<Label> {
    let cnf = spec.as_cnf();
    let forced_false = sample.with(y, false);
    let forced_true = sample.with(y, true);
    let sat0 = cnf.evaluate(&forced_false);
    let sat1 = cnf.evaluate(&forced_true);
    match (sat0, sat1) {
        (false, true) => Ok(Label::Must1),
        (true, false) => Ok(Label::Must0),
        (true, true) => Ok(Label::DontCare),
        (false, false) => Err(SynthesisError::InvariantViolation(format!(
            "sample falsifies F under both polarities of y{y}, but it was drawn as a model of F"
        ))),
    }
}

/// Labels every sample for output `y`, projecting features onto `allowed`
/// (the caller passes X ∪ Y_{<rank(y)} from the Dependency Analyzer).
/// `allowed` may name a variable a sample leaves unbound -- a universal
/// declared in the quantifier block but absent from every clause, which
/// QDIMACS permits -- and such a variable is a genuine don't-care for
/// every sample, so it defaults to `false` rather than panicking.
pub fn label_samples(
    spec: &SpecStore,
    samples: &[Assignment],
    y: VarId,
    allowed: &[VarId],
) -> SynthResult<Vec<LabeledRow>> {
    samples
        .iter()
        .map(|sample| {
            let label = label_sample(spec, sample, y)?;
            let features = allowed.iter().map(|&v| sample.get(v).unwrap_or(false)).collect();
            Ok(LabeledRow { features, label })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_spec() -> SpecStore {
        SpecStore::from_qdimacs(
            "p cnf 4 4\na 2 3 0\ne 1 4 0\n-1 2 0\n-1 3 0\n1 2 3 0\n4 0\n",
        )
        .unwrap()
    }

    fn sample(values: &[(u32, bool)]) -> Assignment {
        let mut a = Assignment::with_capacity(values.iter().map(|(v, _)| *v).max().unwrap_or(0));
        for &(v, b) in values {
            a.set(v, b);
        }
        a
    }

    #[test]
    fn y1_is_dont_care_when_both_x_true() {
        let spec = example_spec();
        // x2=1, x3=1: (y1|x2|x3) is already satisfied without y1, and
        // (-y1|x2),(-y1|x3) hold regardless of y1, so both polarities
        // satisfy F: DONTCARE.
        let s = sample(&[(2, true), (3, true), (4, true)]);
        assert_eq!(label_sample(&spec, &s, 1).unwrap(), Label::DontCare);
    }

    #[test]
    fn y1_is_must1_when_both_x_false() {
        let spec = example_spec();
        // x2=0, x3=0: (y1|x2|x3) forces y1=1.
        let s = sample(&[(2, false), (3, false), (4, true)]);
        assert_eq!(label_sample(&spec, &s, 1).unwrap(), Label::Must1);
    }

    #[test]
    fn y4_is_always_must1() {
        let spec = example_spec();
        let s = sample(&[(2, true), (3, false), (4, true)]);
        assert_eq!(label_sample(&spec, &s, 4).unwrap(), Label::Must1);
    }

    #[test]
    fn label_samples_projects_onto_allowed_features() {
        let spec = example_spec();
        let samples = vec![sample(&[(2, false), (3, false), (4, true), (1, true)])];
        let rows = label_samples(&spec, &samples, 4, &[2, 3]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].features, vec![false, false]);
        assert_eq!(rows[0].label, Label::Must1);
    }
}
