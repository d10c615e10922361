//! Crate-wide error type. Mirrors the flat, hand-rolled style of a CDCL
//! solver's own error enum: one enum, a manual `Display`, no `thiserror`.
use std::fmt;

/// Everything that can go wrong while loading a spec or running the CEGAR
/// loop.
#[derive(Debug, Eq, PartialEq)]
pub enum SynthesisError {
    /// QDIMACS parse failure, 1-indexed source line.
    MalformedInput { line: usize, detail: String },
    /// F is unsatisfiable; reported once at load, never reached via the loop.
    DegenerateSpec,
    /// Sampler returned fewer models than requested. Recovered from locally;
    /// kept here only so it can be logged.
    SamplerStarvation { requested: usize, got: usize },
    /// A per-call solver timeout elapsed (spec §7 kind 4, "solver
    /// failure"); `Config::solver_timeout` bounds the Verifier/Diagnoser/
    /// Repairer's wall-clock time per CEGAR round. Fatal.
    SolverTimeout,
    /// A safety invariant was violated. Fatal; indicates a bug in this
    /// engine rather than in the input.
    InvariantViolation(String),
    /// The iteration cap was reached before the verifier returned UNSAT.
    NonConvergence,
    /// Failure to read or write auxiliary files (CNF input, circuit export).
    IOError(String),
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SynthesisError::MalformedInput { line, detail } => {
                write!(f, "malformed input at line {line}: {detail}")
            }
            SynthesisError::DegenerateSpec => write!(f, "specification is unsatisfiable"),
            SynthesisError::SamplerStarvation { requested, got } => {
                write!(f, "sampler returned {got} of {requested} requested models")
            }
            SynthesisError::SolverTimeout => write!(f, "solver timed out"),
            SynthesisError::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
            SynthesisError::NonConvergence => write!(f, "iteration cap reached"),
            SynthesisError::IOError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for SynthesisError {}

/// Result alias used throughout the crate.
pub type SynthResult<T> = Result<T, SynthesisError>;

/// Maps a terminal error (or success) to the process exit code.
pub fn exit_code(result: &SynthResult<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(SynthesisError::DegenerateSpec) => 1,
        Err(SynthesisError::NonConvergence) => 2,
        Err(SynthesisError::SolverTimeout) => 3,
        Err(SynthesisError::MalformedInput { .. }) | Err(SynthesisError::IOError(_)) => 4,
        Err(SynthesisError::InvariantViolation(_)) => 3,
        Err(SynthesisError::SamplerStarvation { .. }) => 0,
    }
}
