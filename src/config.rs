//! Crate `config` provides the engine's run configuration and, behind the
//! `cli` feature, a real `clap`-derive command line front-end for it.
//! Derive is optional, a plain struct is the base case: `clap`'s derive
//! API is gated behind `cli` (see `Cargo.toml`) so the library can be
//! embedded without pulling in an argument parser.
#[cfg(feature = "cli")]
use clap::Parser;
use std::path::PathBuf;

/// Run configuration for the CEGAR loop. Every field here is a parameter
/// an external CLI front-end is expected to supply; this struct is what
/// it is expected to produce.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", command(name = "fbsynth", author, version, about))]
pub struct Config {
    /// Path to the QDIMACS input file.
    pub cnf_file: PathBuf,

    /// N: number of samples requested from the Sampler Adapter.
    #[cfg_attr(feature = "cli", arg(long = "samples", default_value_t = 200))]
    pub sample_count: usize,

    /// T: repair count threshold before the Hard-to-Learn Fallback takes
    /// over an output (default 50).
    #[cfg_attr(feature = "cli", arg(long = "repair-threshold", default_value_t = 50))]
    pub repair_threshold: usize,

    /// Iteration cap for the CEGAR loop; reaching it without a UNSAT
    /// verification is non-convergence.
    #[cfg_attr(feature = "cli", arg(long = "iteration-cap", default_value_t = 1000))]
    pub iteration_cap: usize,

    /// Per-solver-call timeout in seconds. `0.0` means no timeout.
    #[cfg_attr(feature = "cli", arg(long = "timeout", default_value_t = 0.0))]
    pub solver_timeout: f64,

    /// Output path for the structural circuit description (requires the
    /// `circuit_export` feature to actually be written).
    #[cfg_attr(feature = "cli", arg(long, default_value = "basis.json"))]
    pub output: PathBuf,

    /// Seed handed to the Sampler Adapter and any other randomized
    /// collaborator, for byte-identical reruns on the same input.
    #[cfg_attr(feature = "cli", arg(long, default_value_t = 0))]
    pub seed: u64,

    /// Suppress progress reporting (ambient "Logging / progress
    /// reporting" stack).
    #[cfg_attr(feature = "cli", arg(long))]
    pub quiet: bool,

    /// Run the optional basis simplification pass between iterations.
    /// Permitted but not required for correctness.
    #[cfg_attr(feature = "cli", arg(long = "simplify"))]
    pub simplify_between_iterations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cnf_file: PathBuf::new(),
            sample_count: 200,
            repair_threshold: 50,
            iteration_cap: 1000,
            solver_timeout: 0.0,
            output: PathBuf::from("basis.json"),
            seed: 0,
            quiet: false,
            simplify_between_iterations: false,
        }
    }
}

impl<T> From<T> for Config
where
    PathBuf: From<T>,
{
    /// Builds a default config pointed at `path`, a convenience
    /// constructor for the common case of only the input file varying.
    fn from(path: T) -> Config {
        Config {
            cnf_file: PathBuf::from(path),
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_spec_default_repair_threshold() {
        assert_eq!(Config::default().repair_threshold, 50);
    }

    #[test]
    fn from_path_fills_in_the_rest_from_default() {
        let config = Config::from("cnfs/sample.cnf");
        assert_eq!(config.cnf_file, PathBuf::from("cnfs/sample.cnf"));
        assert_eq!(config.iteration_cap, Config::default().iteration_cap);
    }
}
