/*!
# fbsynth

A counterexample-guided engine for **Boolean functional synthesis with
flexibility**: given a relational specification F(X,Y) over universal
inputs X and existential outputs Y, it produces, for each output y_i, a
parameterized Skolem function ψ_i(X, Y_{<i}, g_i) = Â_i ∨ (g_i ∧ ¬Ĉ_i)
such that every choice of the free parameter vector G yields a Y
satisfying F, and the don't-care region is exposed through g_i rather
than resolved arbitrarily.

The engine is a CEGAR loop: sample F, label the samples for each output,
learn an initial basis (Â_i, Ĉ_i) per output, build a candidate circuit,
verify it against F, and on a counterexample diagnose which outputs erred
and repair their basis entries with an unsat-core-derived cube. Outputs
that resist learning after repeated repair fall back to an exact semantic
definition derived from F's cofactors.

# Example

```
use fbsynth::{Config, Logger, LoopController, LoopOutcome, SpecStore};

let mut spec = SpecStore::from_qdimacs(
    "p cnf 4 4\na 2 3 0\ne 1 4 0\n-1 2 0\n-1 3 0\n1 2 3 0\n4 0\n",
).expect("valid qdimacs");

let config = Config {
    sample_count: 32,
    seed: 1,
    ..Config::default()
};
let mut controller = LoopController::new(config, Logger::quiet());
match controller.run(&mut spec) {
    Ok(LoopOutcome::Done { .. }) => println!("converged"),
    Ok(LoopOutcome::Aborted { reason, .. }) => println!("aborted: {reason}"),
    Err(e) => println!("degenerate: {e}"),
}
```
*/
/// Dependency Analyzer: topological ordering over Y.
pub mod analyzer;
/// Basis Store: the dual DNF/CNF Â_i/Ĉ_i representation.
pub mod basis;
/// Candidate Circuit Builder: ψ_i composition and Tseitin encoding.
pub mod circuit;
/// Engine run configuration and, behind `cli`, a `clap` front-end.
pub mod config;
/// Loop Controller: the top-level CEGAR state machine.
pub mod controller;
/// Diagnoser: MaxSAT-based error localization and classification.
pub mod diagnoser;
/// Hard-to-Learn Fallback: semantic cofactor-derived bases.
pub mod fallback;
/// Labeler: per-sample, per-output MUST0/MUST1/DONTCARE labeling.
pub mod labeler;
/// Learner: decision-tree training and DNF extraction.
pub mod learner;
/// Repairer: conflict-formula construction and unsat-core patching.
pub mod repairer;
/// Sampler Adapter: the default randomized model sampler.
pub mod sampler;
/// SAT/MaxSAT collaborator interfaces and their default implementations.
pub mod solver;
/// Progress reporting: `Logger` and the per-iteration `LoopState`.
pub mod state;
/// The data model: variables, literals, cubes/clauses, the spec store.
pub mod types;
/// Verifier: error-formula construction and counterexample extraction.
pub mod verifier;

pub use {
    config::Config,
    controller::{LoopController, LoopOutcome},
    state::Logger,
    types::{SpecStore, SynthResult, SynthesisError},
};
