//! Trial executors: in the current process, or in freshly spawned workers.
//!
//! A forked trial re-executes the running binary with the hidden `worker`
//! subcommand. The child writes its [`TrialOutcome`] as one JSON document on
//! stdout; logs go to stderr.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{BenchError, BenchResult};
use crate::measure::{self, TrialOutcome, TrialSpec};

/// Runs one trial and returns its measured samples.
pub trait TrialExecutor {
    fn run_trial(&self, spec: &TrialSpec) -> BenchResult<TrialOutcome>;
}

/// Runs trials on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct InProcessExecutor;

impl TrialExecutor for InProcessExecutor {
    fn run_trial(&self, spec: &TrialSpec) -> BenchResult<TrialOutcome> {
        measure::run_trial(spec)
    }
}

/// Runs every trial in a new child process.
#[derive(Debug, Clone)]
pub struct ForkedExecutor {
    program: PathBuf,
}

impl ForkedExecutor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Executor that spawns the currently running binary.
    pub fn current_exe() -> BenchResult<Self> {
        Ok(Self::new(std::env::current_exe()?))
    }
}

impl TrialExecutor for ForkedExecutor {
    fn run_trial(&self, spec: &TrialSpec) -> BenchResult<TrialOutcome> {
        let trial = serde_json::to_string(spec)?;
        debug!(program = %self.program.display(), label = %spec.configuration.label(), "spawning worker");

        let output = Command::new(&self.program)
            .arg("worker")
            .arg("--trial")
            .arg(&trial)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no diagnostic output");
            return Err(BenchError::Fork(format!(
                "worker exited with {}: {}",
                output.status, reason
            )));
        }

        parse_outcome(&output.stdout)
    }
}

/// Decode a worker's stdout.
pub fn parse_outcome(stdout: &[u8]) -> BenchResult<TrialOutcome> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| BenchError::Fork("worker produced no output".into()))?;
    serde_json::from_str(line)
        .map_err(|e| BenchError::Fork(format!("malformed worker output: {e}")))
}

/// Worker entry point: decode the trial, run it, print the outcome.
pub fn run_worker(trial: &str, out: &mut impl Write) -> BenchResult<()> {
    let spec: TrialSpec = serde_json::from_str(trial)?;
    let outcome = measure::run_trial(&spec)?;
    serde_json::to_writer(&mut *out, &outcome)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{LookupMode, Operation};
    use crate::config::RunProtocol;
    use crate::list_kind::ListKind;
    use crate::matrix::Configuration;
    use crate::measure::IterationSample;

    fn spec() -> TrialSpec {
        TrialSpec {
            configuration: Configuration {
                operation: Operation::Stream,
                list_kind: ListKind::ArrayList,
                elements: 25,
            },
            lookup: LookupMode::Positional,
            protocol: RunProtocol {
                forks: 1,
                warmup_iterations: 0,
                measurement_iterations: 2,
                measurement_time_ms: 1,
                ..RunProtocol::default()
            },
        }
    }

    #[test]
    fn worker_writes_parsable_outcome() {
        let trial = serde_json::to_string(&spec()).unwrap();
        let mut stdout = Vec::new();
        run_worker(&trial, &mut stdout).unwrap();

        let outcome = parse_outcome(&stdout).unwrap();
        assert_eq!(outcome.samples.len(), 2);
    }

    #[test]
    fn parse_outcome_uses_last_line() {
        let outcome = TrialOutcome {
            samples: vec![IterationSample {
                invocations: 4,
                elapsed_nanos: 400,
            }],
        };
        let mut stdout = b"stray line\n".to_vec();
        stdout.extend(serde_json::to_vec(&outcome).unwrap());
        stdout.extend(b"\n\n");
        assert_eq!(parse_outcome(&stdout).unwrap(), outcome);
    }

    #[test]
    fn parse_outcome_rejects_garbage() {
        assert!(matches!(parse_outcome(b""), Err(BenchError::Fork(_))));
        assert!(matches!(parse_outcome(b"{not json"), Err(BenchError::Fork(_))));
    }

    #[test]
    fn worker_rejects_malformed_trial() {
        let mut stdout = Vec::new();
        assert!(matches!(
            run_worker("{}", &mut stdout),
            Err(BenchError::Json(_))
        ));
    }

    #[test]
    fn missing_program_is_an_io_error() {
        let executor = ForkedExecutor::new("/nonexistent/list-bench-worker");
        assert!(matches!(executor.run_trial(&spec()), Err(BenchError::Io(_))));
    }

    #[test]
    fn in_process_executor_runs_trial() {
        let outcome = InProcessExecutor.run_trial(&spec()).unwrap();
        assert_eq!(outcome.samples.len(), 2);
    }
}
