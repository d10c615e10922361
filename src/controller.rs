//! Loop Controller: the explicit state machine `LEARN -> VERIFY ->
//! {DONE | DIAGNOSE -> REPAIR -> VERIFY ...}` driving the whole CEGAR
//! loop. Owns the Basis Store exclusively and is the only component that
//! sequences the other collaborators.
use crate::{
    analyzer::{analyze, DependencyOrder},
    basis::BasisStore,
    config::Config,
    diagnoser::diagnose,
    fallback::apply_fallback,
    labeler::label_samples,
    learner::{extract_dnf, CartLearner, TreeLearner},
    repairer::repair,
    sampler::{RandomSampler, Sampler},
    solver::{CoreSolver, IncrementalSatSolver},
    state::{Logger, LoopState, VerifyVerdict},
    types::{SpecStore, SynthResult, SynthesisError, VarId},
    verifier::{verify, Counterexample, VerifyOutcome},
};
use std::time::Instant;

/// Terminal result of a run: `Done` on verifier UNSAT, `Aborted` on any of the
/// three abort causes -- iteration cap, solver failure/timeout, or an
/// invariant violation -- carrying whatever basis and counterexample the
/// loop had reached so a caller can inspect the last-known-good state
/// instead of receiving a bare error.
pub enum LoopOutcome {
    Done {
        order: DependencyOrder,
        basis: BasisStore,
    },
    Aborted {
        order: DependencyOrder,
        partial_basis: BasisStore,
        last_counterexample: Option<Counterexample>,
        reason: SynthesisError,
    },
}

pub struct LoopController {
    config: Config,
    logger: Logger,
}

impl LoopController {
    pub fn new(config: Config, logger: Logger) -> Self {
        LoopController { config, logger }
    }

    /// The allowed feature set of `y`: X, in ascending id order,
    /// followed by Y_{<rank(y)} in rank order. Both the Labeler and the
    /// Learner's extraction must see the same vector, since the Learner
    /// addresses features by position.
    fn allowed_features(spec: &SpecStore, order: &DependencyOrder, y: VarId) -> Vec<VarId> {
        let mut allowed = spec.universals();
        allowed.sort_unstable();
        allowed.extend(order.upstream_of(y).unwrap_or(&[]).iter().copied());
        allowed
    }

    /// Runs dependency analysis, samples, labels, and trains the initial
    /// basis: Sampler -> Labeler -> Learner -> Basis Store. A sampler
    /// returning zero models (while F is itself satisfiable) skips the
    /// Learner entirely and leaves every entry at its all-false default,
    /// forcing the loop to repair from scratch.
    fn build_initial_basis(
        &mut self,
        spec: &SpecStore,
        order: &DependencyOrder,
    ) -> SynthResult<BasisStore> {
        let mut basis = BasisStore::new(order.order());
        let samples = RandomSampler.sample(spec, self.config.sample_count, self.config.seed);
        if samples.len() < self.config.sample_count {
            self.logger.dump(&format!(
                "# sampler starvation: got {} of {} requested models",
                samples.len(),
                self.config.sample_count
            ));
        }
        if samples.is_empty() {
            return Ok(basis);
        }
        for &y in order.order() {
            let allowed = Self::allowed_features(spec, order, y);
            let rows = label_samples(spec, &samples, y, &allowed)?;
            let tree = CartLearner::default().fit(&rows);
            let (a_dnf, c_dnf) = extract_dnf(&tree, &allowed);
            let entry = basis
                .get_mut(y)
                .expect("basis was initialized with every existential variable");
            entry.a_dnf = a_dnf;
            entry.c_dnf = c_dnf;
        }
        Ok(basis)
    }

    /// Drives the loop to a terminal state. `spec` is mutated only by the
    /// Dependency Analyzer, which attaches `rank` to each existential
    /// variable; the clause set itself is never touched.
    pub fn run(&mut self, spec: &mut SpecStore) -> SynthResult<LoopOutcome> {
        let order = analyze(spec);

        // trivial solver probe: if F itself has no model, this is a
        // degenerate spec, reported once, before the loop.
        let mut probe = CoreSolver::with_clauses(spec.clauses().iter().cloned());
        if !probe.solve_under_assumptions(&[]).is_sat() {
            return Err(SynthesisError::DegenerateSpec);
        }

        let mut basis = self.build_initial_basis(spec, &order)?;
        let mut last_cx: Option<Counterexample> = None;

        for iteration in 0..self.config.iteration_cap {
            if self.config.simplify_between_iterations {
                for &y in order.order() {
                    basis.simplify_entry(y);
                }
            }

            let verify_started = Instant::now();
            let verify_outcome = verify(spec, &order, &basis);
            if self.solver_call_timed_out(verify_started) {
                return Ok(LoopOutcome::Aborted {
                    order,
                    partial_basis: basis,
                    last_counterexample: last_cx,
                    reason: SynthesisError::SolverTimeout,
                });
            }

            match verify_outcome {
                VerifyOutcome::Correct => {
                    self.logger.dump(
                        &LoopState {
                            iteration,
                            verdict: VerifyVerdict::Correct,
                            repair_counts: repair_counts(&basis, &order),
                        }
                        .progress_line(),
                    );
                    return Ok(LoopOutcome::Done { order, basis });
                }
                VerifyOutcome::CounterExample(cx) => {
                    self.logger.dump(
                        &LoopState {
                            iteration,
                            verdict: VerifyVerdict::CounterExampleFound,
                            repair_counts: repair_counts(&basis, &order),
                        }
                        .progress_line(),
                    );
                    let repair_started = Instant::now();
                    let repair_result = self.diagnose_and_repair(spec, &order, &mut basis, &cx);
                    let repair_timed_out = self.solver_call_timed_out(repair_started);
                    match repair_result {
                        Ok(()) if repair_timed_out => {
                            return Ok(LoopOutcome::Aborted {
                                order,
                                partial_basis: basis,
                                last_counterexample: Some(cx),
                                reason: SynthesisError::SolverTimeout,
                            });
                        }
                        Ok(()) => {}
                        Err(reason) => {
                            return Ok(LoopOutcome::Aborted {
                                order,
                                partial_basis: basis,
                                last_counterexample: Some(cx),
                                reason,
                            });
                        }
                    }
                    last_cx = Some(cx);
                }
            }
        }

        Ok(LoopOutcome::Aborted {
            order,
            partial_basis: basis,
            last_counterexample: last_cx,
            reason: SynthesisError::NonConvergence,
        })
    }

    /// `config.solver_timeout` (seconds) bounds each verify/diagnose/repair
    /// round: since the Verifier, Diagnoser and Repairer run synchronously
    /// (§5's single-threaded cooperative model gives no preemption point
    /// mid-call), the cap is checked against the call's wall-clock duration
    /// immediately after it returns rather than interrupted during it.
    /// `0.0` (the default) disables the cap entirely.
    fn solver_call_timed_out(&self, started: Instant) -> bool {
        self.config.solver_timeout > 0.0
            && started.elapsed().as_secs_f64() > self.config.solver_timeout
    }

    /// One DIAGNOSE -> REPAIR step. Repairs are applied in increasing
    /// rank order -- the Diagnoser already returns `Ind` in that order --
    /// so a later-ranked output's conflict formula sees the current
    /// iteration's upstream changes.
    fn diagnose_and_repair(
        &mut self,
        spec: &SpecStore,
        order: &DependencyOrder,
        basis: &mut BasisStore,
        cx: &Counterexample,
    ) -> SynthResult<()> {
        let diagnosis = diagnose(spec, order, basis, cx)?;
        for diag in &diagnosis.diagnoses {
            let needs_fallback = repair(
                spec,
                order,
                basis,
                cx,
                diag,
                &diagnosis.y_fix,
                self.config.repair_threshold,
            )?;
            if needs_fallback {
                self.logger
                    .dump(&format!("# y{} exceeded repair threshold, falling back to semantic basis", diag.var));
                apply_fallback(spec, diag.var, basis)?;
            }
        }
        Ok(())
    }
}

fn repair_counts(basis: &BasisStore, order: &DependencyOrder) -> Vec<(VarId, usize)> {
    order
        .order()
        .iter()
        .map(|&y| (y, basis.get(y).map(|e| e.repair_count).unwrap_or(0)))
        .collect()
}
