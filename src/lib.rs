//! List access benchmark harness.
//!
//! Measures `Vec`, `LinkedList` and a mutex-guarded `Vec` under five access
//! patterns (indexed loop, for-each, explicit iterator, sequential and
//! parallel reduction) across a matrix of element counts. Each configuration
//! is set up, checked against the sum oracle, warmed up and then timed,
//! optionally inside freshly spawned worker processes.

pub mod access;
pub mod config;
pub mod error;
pub mod fork;
pub mod list_kind;
pub mod matrix;
pub mod measure;
pub mod populated;
pub mod report;
pub mod runner;
pub mod stats;

pub use access::{expected_sum, LookupMode, Operation};
pub use config::{ConfigOverrides, HarnessConfig, RunProtocol, TimeUnit};
pub use error::{BenchError, BenchResult};
pub use fork::{ForkedExecutor, InProcessExecutor, TrialExecutor};
pub use list_kind::ListKind;
pub use matrix::{BenchmarkMatrix, Configuration, DEFAULT_ELEMENT_COUNTS};
pub use measure::{IterationSample, TrialOutcome, TrialSpec};
pub use populated::PopulatedList;
pub use report::{BenchmarkRecord, Report};
pub use runner::MatrixRunner;
