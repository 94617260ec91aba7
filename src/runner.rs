//! Drives the benchmark matrix through a [`TrialExecutor`].

use tracing::{info, warn};

use crate::access::LookupMode;
use crate::config::RunProtocol;
use crate::error::{BenchError, BenchResult};
use crate::fork::TrialExecutor;
use crate::matrix::{BenchmarkMatrix, Configuration};
use crate::measure::{self, TrialSpec};
use crate::report::{BenchmarkRecord, Report};
use crate::stats::Summary;

pub struct MatrixRunner<E> {
    matrix: BenchmarkMatrix,
    protocol: RunProtocol,
    lookup: LookupMode,
    executor: E,
}

impl<E: TrialExecutor> MatrixRunner<E> {
    pub fn new(
        matrix: BenchmarkMatrix,
        protocol: RunProtocol,
        lookup: LookupMode,
        executor: E,
    ) -> BenchResult<Self> {
        protocol.validate()?;
        Ok(Self {
            matrix,
            protocol,
            lookup,
            executor,
        })
    }

    pub fn matrix(&self) -> &BenchmarkMatrix {
        &self.matrix
    }

    /// Measure every configuration. A failing configuration is recorded in the
    /// report and the run moves on to the next one.
    pub fn run(&self) -> Report {
        let total = self.matrix.len();
        let unit = self.protocol.time_unit;
        let mut report = Report::new();

        info!(
            configurations = total,
            forks = self.protocol.forks,
            lookup = %self.lookup,
            "starting benchmark run"
        );

        for (index, configuration) in self.matrix.configurations().enumerate() {
            let label = configuration.label();
            let progress = format!("{}/{}", index + 1, total);
            let record = match self.measure(&configuration) {
                Ok(summary) => {
                    info!(
                        %progress,
                        %label,
                        score = summary.mean,
                        error = summary.error,
                        unit = %unit,
                        "measured"
                    );
                    BenchmarkRecord::measured(&configuration, unit, &summary)
                }
                Err(e) => {
                    warn!(
                        %progress,
                        %label,
                        error = %e,
                        "configuration failed"
                    );
                    BenchmarkRecord::failed(&configuration, unit, e.to_string())
                }
            };
            report.push(record);
        }

        info!(
            configurations = total,
            failed = report.failures().count(),
            "benchmark run finished"
        );
        report
    }

    /// Run every trial for one configuration and summarize all measured samples.
    fn measure(&self, configuration: &Configuration) -> BenchResult<Summary> {
        let spec = TrialSpec {
            configuration: *configuration,
            lookup: self.lookup,
            protocol: self.protocol.clone(),
        };

        let trials = self.protocol.forks.max(1);
        let mut scores = Vec::new();
        for _ in 0..trials {
            let outcome = self.executor.run_trial(&spec)?;
            scores.extend(
                outcome
                    .samples
                    .iter()
                    .map(|s| self.protocol.time_unit.from_nanos(s.nanos_per_op())),
            );
        }

        Summary::of(&scores)
            .ok_or_else(|| BenchError::Fork(format!("{} produced no samples", configuration.label())))
    }

    /// Check every configuration against the sum oracle without timing it.
    pub fn verify(&self) -> Vec<(Configuration, BenchError)> {
        let failures: Vec<_> = self
            .matrix
            .configurations()
            .filter_map(|configuration| {
                measure::verify_configuration(&configuration, self.lookup)
                    .err()
                    .map(|e| (configuration, e))
            })
            .collect();

        if failures.is_empty() {
            info!(configurations = self.matrix.len(), "all configurations verified");
        }
        for (configuration, error) in &failures {
            warn!(label = %configuration.label(), %error, "verification failed");
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Operation;
    use crate::fork::InProcessExecutor;
    use crate::list_kind::ListKind;
    use crate::measure::{IterationSample, TrialOutcome};

    fn tiny_protocol() -> RunProtocol {
        RunProtocol {
            forks: 0,
            warmup_iterations: 0,
            warmup_time_ms: 1,
            measurement_iterations: 2,
            measurement_time_ms: 1,
            ..RunProtocol::default()
        }
    }

    fn small_matrix() -> BenchmarkMatrix {
        BenchmarkMatrix::new(Operation::ALL.to_vec(), vec![0, 10], ListKind::ALL.to_vec()).unwrap()
    }

    /// Fails every trial for the linked list, succeeds otherwise.
    struct FlakyExecutor;

    impl TrialExecutor for FlakyExecutor {
        fn run_trial(&self, spec: &TrialSpec) -> BenchResult<TrialOutcome> {
            if spec.configuration.list_kind == ListKind::LinkedList {
                return Err(BenchError::Fork("worker exited with signal 9".into()));
            }
            Ok(TrialOutcome {
                samples: vec![IterationSample {
                    invocations: 10,
                    elapsed_nanos: 20_000,
                }],
            })
        }
    }

    #[test]
    fn in_process_run_reports_every_configuration() {
        let runner = MatrixRunner::new(
            small_matrix(),
            tiny_protocol(),
            LookupMode::Positional,
            InProcessExecutor,
        )
        .unwrap();

        let report = runner.run();
        assert_eq!(report.records().len(), 5 * 2 * 3);
        assert_eq!(report.failures().count(), 0);
        assert!(report.records().iter().all(|r| r.samples == 2));
    }

    #[test]
    fn failing_configuration_does_not_stop_the_run() {
        let protocol = RunProtocol {
            forks: 3,
            ..tiny_protocol()
        };
        let runner =
            MatrixRunner::new(small_matrix(), protocol, LookupMode::Direct, FlakyExecutor).unwrap();

        let report = runner.run();
        assert_eq!(report.records().len(), 30);
        assert_eq!(report.failures().count(), 10);

        let measured = report
            .records()
            .iter()
            .find(|r| !r.is_failed())
            .unwrap();
        // three forks with one 2000ns sample each, reported in microseconds
        assert_eq!(measured.samples, 3);
        assert!((measured.score.unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(measured.error, Some(0.0));
    }

    #[test]
    fn verify_passes_for_small_counts() {
        let runner = MatrixRunner::new(
            BenchmarkMatrix::new(
                Operation::ALL.to_vec(),
                vec![0, 5, 1000],
                ListKind::ALL.to_vec(),
            )
            .unwrap(),
            tiny_protocol(),
            LookupMode::Positional,
            InProcessExecutor,
        )
        .unwrap();
        assert!(runner.verify().is_empty());
    }

    #[test]
    fn rejects_invalid_protocol() {
        let protocol = RunProtocol {
            measurement_iterations: 0,
            ..tiny_protocol()
        };
        assert!(MatrixRunner::new(
            small_matrix(),
            protocol,
            LookupMode::Positional,
            InProcessExecutor
        )
        .is_err());
    }
}
