//! Timed iterations and trials.
//!
//! A trial sets up one populated list, checks the operation against the sum
//! oracle, runs the warm-up iterations and then the measured ones. Setup and
//! the oracle check are never part of a timed iteration.

use std::hint::black_box;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::access::{expected_sum, LookupMode, Operation};
use crate::config::RunProtocol;
use crate::error::{BenchError, BenchResult};
use crate::matrix::Configuration;
use crate::populated::PopulatedList;

/// Everything a worker needs to run one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialSpec {
    pub configuration: Configuration,
    pub lookup: LookupMode,
    pub protocol: RunProtocol,
}

/// Result of one timed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IterationSample {
    pub invocations: u64,
    pub elapsed_nanos: u64,
}

impl IterationSample {
    pub fn nanos_per_op(&self) -> f64 {
        if self.invocations == 0 {
            return 0.0;
        }
        self.elapsed_nanos as f64 / self.invocations as f64
    }
}

/// Measured samples of one trial; warm-up samples are not kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub samples: Vec<IterationSample>,
}

/// Run `operation` once and compare the accumulator with the sum of `0..N`.
pub fn check_oracle(
    list: &PopulatedList,
    operation: Operation,
    lookup: LookupMode,
) -> BenchResult<i64> {
    let expected = expected_sum(list.len());
    let actual = operation.run(list, lookup)?;
    if actual != expected {
        return Err(BenchError::OracleMismatch {
            operation: operation.to_string(),
            kind: list.kind().to_string(),
            elements: list.len(),
            expected,
            actual,
        });
    }
    Ok(actual)
}

/// Build the list for `configuration` and check it against the oracle.
pub fn verify_configuration(configuration: &Configuration, lookup: LookupMode) -> BenchResult<i64> {
    let list = PopulatedList::build(configuration.list_kind, configuration.elements)?;
    check_oracle(&list, configuration.operation, lookup)
}

/// Invoke `operation` back-to-back until `budget` elapses.
///
/// A control thread raises the stop flag so the hot loop pays only a relaxed
/// load per invocation. The operation always runs at least once.
pub fn run_iteration(
    list: &PopulatedList,
    operation: Operation,
    lookup: LookupMode,
    budget: Duration,
) -> BenchResult<IterationSample> {
    let done = AtomicBool::new(false);
    let start = Instant::now();

    thread::scope(|scope| {
        // the budget counts from `start`, so spawn latency is not lost
        scope.spawn(|| {
            thread::sleep(budget.saturating_sub(start.elapsed()));
            done.store(true, Ordering::Release);
        });

        let mut invocations: u64 = 0;
        loop {
            black_box(operation.run(black_box(list), lookup)?);
            invocations += 1;
            if done.load(Ordering::Relaxed) {
                break;
            }
        }
        let elapsed_nanos = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

        Ok(IterationSample {
            invocations,
            elapsed_nanos,
        })
    })
}

/// Run a full trial in the current process.
pub fn run_trial(spec: &TrialSpec) -> BenchResult<TrialOutcome> {
    let Configuration {
        operation,
        list_kind,
        elements,
    } = spec.configuration;
    let protocol = &spec.protocol;

    debug!(%operation, %list_kind, elements, "trial setup");
    let list = PopulatedList::build(list_kind, elements)?;
    check_oracle(&list, operation, spec.lookup)?;

    for i in 0..protocol.warmup_iterations {
        let sample = run_iteration(&list, operation, spec.lookup, protocol.warmup_time())?;
        debug!(
            iteration = i + 1,
            ns_per_op = sample.nanos_per_op(),
            "warm-up iteration"
        );
    }

    let mut outcome = TrialOutcome::default();
    for i in 0..protocol.measurement_iterations {
        let sample = run_iteration(&list, operation, spec.lookup, protocol.measurement_time())?;
        debug!(
            iteration = i + 1,
            invocations = sample.invocations,
            ns_per_op = sample.nanos_per_op(),
            "measurement iteration"
        );
        outcome.samples.push(sample);
    }

    debug!(%operation, %list_kind, elements, "trial finished");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_kind::ListKind;

    fn quick_protocol() -> RunProtocol {
        RunProtocol {
            forks: 0,
            warmup_iterations: 1,
            warmup_time_ms: 2,
            measurement_iterations: 3,
            measurement_time_ms: 2,
            ..RunProtocol::default()
        }
    }

    #[test]
    fn iteration_runs_at_least_once() {
        let list = PopulatedList::build(ListKind::ArrayList, 100).unwrap();
        let sample = run_iteration(
            &list,
            Operation::Stream,
            LookupMode::Positional,
            Duration::from_millis(1),
        )
        .unwrap();
        assert!(sample.invocations >= 1);
        assert!(sample.elapsed_nanos > 0);
        assert!(sample.nanos_per_op() > 0.0);
    }

    #[test]
    fn iteration_covers_the_whole_budget() {
        let list = PopulatedList::build(ListKind::Vector, 10).unwrap();
        let budget = Duration::from_millis(20);
        let sample =
            run_iteration(&list, Operation::ForIndex, LookupMode::Positional, budget).unwrap();
        assert!(sample.elapsed_nanos >= budget.as_nanos() as u64);
    }

    #[test]
    fn trial_yields_one_sample_per_measurement_iteration() {
        let spec = TrialSpec {
            configuration: Configuration {
                operation: Operation::ForEach,
                list_kind: ListKind::LinkedList,
                elements: 50,
            },
            lookup: LookupMode::Positional,
            protocol: quick_protocol(),
        };
        let outcome = run_trial(&spec).unwrap();
        assert_eq!(outcome.samples.len(), 3);
    }

    #[test]
    fn empty_list_trial_completes() {
        let spec = TrialSpec {
            configuration: Configuration {
                operation: Operation::ParallelStream,
                list_kind: ListKind::Vector,
                elements: 0,
            },
            lookup: LookupMode::Direct,
            protocol: quick_protocol(),
        };
        assert_eq!(run_trial(&spec).unwrap().samples.len(), 3);
    }

    #[test]
    fn verify_passes_for_every_kind() {
        for kind in ListKind::ALL {
            let configuration = Configuration {
                operation: Operation::Iterator,
                list_kind: kind,
                elements: 250,
            };
            assert_eq!(
                verify_configuration(&configuration, LookupMode::Positional).unwrap(),
                expected_sum(250)
            );
        }
    }

    #[test]
    fn zero_invocations_report_zero_cost() {
        let sample = IterationSample {
            invocations: 0,
            elapsed_nanos: 10,
        };
        assert_eq!(sample.nanos_per_op(), 0.0);
    }
}
