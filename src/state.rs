//! Crate `state`: progress reporting for the CEGAR loop.
//!
//! No logging crate; `Logger` hand-rolls a stat dump via bare `println!`
//! (and, for file output, a buffered writer) rather than going through
//! `log`/`tracing`, matching a CDCL solver's own bare stdout reporting.
//! `Logger` wraps either stdout or a file sink behind one `dump` call, and
//! `LoopState` is the progress snapshot the Loop Controller feeds it each
//! iteration -- iteration count, the verifier's verdict, and per-output
//! repair counts, the way a solver's progress state tracks restart and
//! conflict counts across a search.
use {
    crate::types::VarId,
    std::{
        fs::File,
        io::{self, Write},
        path::Path,
    },
};

/// Where progress lines go. `Quiet` is what `Config::quiet` selects.
pub enum Logger {
    Stdout,
    File(File),
    Quiet,
}

impl Logger {
    pub fn stdout() -> Self {
        Logger::Stdout
    }

    pub fn quiet() -> Self {
        Logger::Quiet
    }

    pub fn to_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Logger::File(File::create(path)?))
    }

    /// Writes one progress line.
    pub fn dump(&mut self, line: &str) {
        match self {
            Logger::Stdout => println!("{line}"),
            Logger::File(f) => {
                let _ = writeln!(f, "{line}");
            }
            Logger::Quiet => {}
        }
    }
}

/// One iteration's worth of CEGAR-loop progress: what the Verifier
/// found, and how many times the Repairer has touched each
/// output so far. The Loop Controller builds one of these per iteration
/// and hands it to a `Logger`.
#[derive(Clone, Debug, Default)]
pub struct LoopState {
    pub iteration: usize,
    pub verdict: VerifyVerdict,
    pub repair_counts: Vec<(VarId, usize)>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum VerifyVerdict {
    #[default]
    Pending,
    Correct,
    CounterExampleFound,
}

impl LoopState {
    pub fn progress_line(&self) -> String {
        let verdict = match self.verdict {
            VerifyVerdict::Pending => "pending",
            VerifyVerdict::Correct => "UNSAT (correct)",
            VerifyVerdict::CounterExampleFound => "SAT (counterexample)",
        };
        let repairs: Vec<String> = self
            .repair_counts
            .iter()
            .map(|(v, c)| format!("y{v}:{c}"))
            .collect();
        format!(
            "# iter {:>5} | verify: {:<22} | repairs [{}]",
            self.iteration,
            verdict,
            repairs.join(", ")
        )
    }
}
