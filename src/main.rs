//! CLI entry point. The full argument surface is an external concern;
//! what lives here is just enough wiring to run the engine end to end
//! from a QDIMACS file, over `LoopController::run`.
use fbsynth::{
    config::Config,
    controller::{LoopController, LoopOutcome},
    state::Logger,
    types::{SpecStore, SynthResult, SynthesisError},
};
use std::{fs, process::ExitCode};

#[cfg(feature = "cli")]
fn parse_config() -> Config {
    use clap::Parser;
    Config::parse()
}

#[cfg(not(feature = "cli"))]
fn parse_config() -> Config {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "cnfs/sample.cnf".to_string());
    Config::from(path)
}

fn exit_code_for(result: &SynthResult<()>) -> ExitCode {
    ExitCode::from(fbsynth::types::exit_code(result) as u8)
}

fn main() -> ExitCode {
    let config = parse_config();
    let logger = if config.quiet {
        Logger::quiet()
    } else {
        Logger::stdout()
    };

    let text = match fs::read_to_string(&config.cnf_file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error reading {}: {e}", config.cnf_file.display());
            return exit_code_for(&Err(SynthesisError::IOError(e.to_string())));
        }
    };

    let mut spec = match SpecStore::from_qdimacs(&text) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("{e}");
            return exit_code_for(&Err(e));
        }
    };

    let output_path = config.output.clone();
    let mut controller = LoopController::new(config, logger);
    match controller.run(&mut spec) {
        Err(e) => {
            eprintln!("{e}");
            exit_code_for(&Err(e))
        }
        Ok(LoopOutcome::Done { order, basis }) => {
            println!("# synthesis converged");
            write_circuit(&spec, &order, &basis, &output_path);
            exit_code_for(&Ok(()))
        }
        Ok(LoopOutcome::Aborted { reason, .. }) => {
            eprintln!("# synthesis aborted: {reason}");
            exit_code_for(&Err(reason))
        }
    }
}

#[cfg(feature = "circuit_export")]
fn write_circuit(
    spec: &SpecStore,
    order: &fbsynth::analyzer::DependencyOrder,
    basis: &fbsynth::basis::BasisStore,
    path: &std::path::Path,
) {
    let circuit = fbsynth::circuit::build_candidate_circuit(spec, order, basis);
    match fbsynth::circuit::export::to_json(&circuit) {
        Ok(json) => {
            if let Err(e) = fs::write(path, json) {
                eprintln!("error writing circuit description to {}: {e}", path.display());
            }
        }
        Err(e) => eprintln!("error serializing circuit description: {e}"),
    }
}

#[cfg(not(feature = "circuit_export"))]
fn write_circuit(
    _spec: &SpecStore,
    _order: &fbsynth::analyzer::DependencyOrder,
    _basis: &fbsynth::basis::BasisStore,
    _path: &std::path::Path,
) {
}
