//! Sampler Adapter: `sample(F, n, seed) -> up to n models of F`. Treated
//! as an interface abstraction; the default implementation drives
//! `CoreSolver` with randomized polarity nudges and blocking clauses so
//! repeated calls explore distinct models, matching "reasonable
//! coverage" rather than a uniform guarantee.
use {
    crate::{
        solver::{CoreSolver, IncrementalSatSolver, SatOutcome},
        types::{Assignment, Clause, Lit, SpecStore, VarId},
    },
    rand::{rngs::StdRng, Rng, SeedableRng},
    std::collections::BTreeSet,
};

/// `sample(cnf, n, seed) -> list of assignments`.
pub trait Sampler {
    /// Returns at least one model when `spec` is satisfiable; may return
    /// fewer than `n` if `spec` admits fewer models.
    fn sample(&mut self, spec: &SpecStore, n: usize, seed: u64) -> Vec<Assignment>;
}

#[derive(Debug, Default)]
pub struct RandomSampler;

impl Sampler for RandomSampler {
    fn sample(&mut self, spec: &SpecStore, n: usize, seed: u64) -> Vec<Assignment> {
        if n == 0 {
            return Vec::new();
        }
        let vars: Vec<VarId> = {
            let set: BTreeSet<VarId> = spec
                .clauses()
                .iter()
                .flat_map(|c| c.literals().iter().map(|l| l.var()))
                .collect();
            set.into_iter().collect()
        };
        let mut solver = CoreSolver::with_clauses(spec.clauses().iter().cloned());
        let mut rng = StdRng::seed_from_u64(seed);
        let mut models = Vec::with_capacity(n);

        for _ in 0..n {
            let mut shuffled = vars.clone();
            shuffle(&mut shuffled, &mut rng);
            let nudge_count = shuffled.len() / 2;
            let assumptions: Vec<Lit> = shuffled[..nudge_count]
                .iter()
                .map(|&v| Lit::new(v, rng.gen()))
                .collect();

            let model = match solver.solve_under_assumptions(&assumptions) {
                SatOutcome::Sat(model) => model,
                SatOutcome::Unsat { .. } => match solver.solve_under_assumptions(&[]) {
                    SatOutcome::Sat(model) => model,
                    // every model already blocked out: F admits fewer than
                    // n distinct models over the declared variables.
                    SatOutcome::Unsat { .. } => break,
                },
            };

            let blocking: Vec<Lit> = vars
                .iter()
                .map(|&v| Lit::new(v, !model.value_of(v)))
                .collect();
            if let Some(clause) = Clause::from_literals(blocking) {
                solver.add_clause(clause);
            }
            models.push(model);
        }
        models
    }
}

fn shuffle<T>(items: &mut [T], rng: &mut StdRng) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_models_that_satisfy_the_spec() {
        let spec = SpecStore::from_qdimacs("p cnf 4 4\na 2 3 0\ne 1 4 0\n-1 2 0\n-1 3 0\n1 2 3 0\n4 0\n")
            .unwrap();
        let cnf = spec.as_cnf();
        let models = RandomSampler.sample(&spec, 5, 42);
        assert!(!models.is_empty());
        for model in &models {
            assert!(cnf.evaluate(model));
        }
    }

    #[test]
    fn stops_early_when_models_are_exhausted() {
        // exactly one model: x1=1, x2=0
        let spec = SpecStore::from_qdimacs("p cnf 2 2\ne 1 2 0\n1 0\n-2 0\n").unwrap();
        let models = RandomSampler.sample(&spec, 10, 7);
        assert_eq!(models.len(), 1);
    }

    #[test]
    fn n_zero_returns_no_models() {
        let spec = SpecStore::from_qdimacs("p cnf 1 1\ne 1 0\n1 0\n").unwrap();
        assert!(RandomSampler.sample(&spec, 0, 1).is_empty());
    }
}
