//! Harness configuration: run protocol, axes, and TOML loading.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::access::{LookupMode, Operation};
use crate::error::{BenchError, BenchResult};
use crate::list_kind::ListKind;
use crate::matrix::{BenchmarkMatrix, DEFAULT_ELEMENT_COUNTS};

// ============================================================================
// Time unit
// ============================================================================

/// Unit scores are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    pub fn label(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
        }
    }

    pub fn from_nanos(&self, nanos: f64) -> f64 {
        match self {
            TimeUnit::Nanoseconds => nanos,
            TimeUnit::Microseconds => nanos / 1e3,
            TimeUnit::Milliseconds => nanos / 1e6,
            TimeUnit::Seconds => nanos / 1e9,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeUnit {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ns" | "nanoseconds" => Ok(TimeUnit::Nanoseconds),
            "us" | "µs" | "microseconds" => Ok(TimeUnit::Microseconds),
            "ms" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            "s" | "seconds" => Ok(TimeUnit::Seconds),
            _ => Err(BenchError::UnknownTimeUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = BenchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeUnit> for String {
    fn from(unit: TimeUnit) -> Self {
        unit.label().to_string()
    }
}

// ============================================================================
// Run protocol
// ============================================================================

/// Fork, warm-up and measurement parameters applied to every configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunProtocol {
    /// Independent worker processes per configuration. 0 runs in-process.
    pub forks: u32,
    pub warmup_iterations: u32,
    pub warmup_time_ms: u64,
    pub measurement_iterations: u32,
    pub measurement_time_ms: u64,
    pub time_unit: TimeUnit,
}

impl Default for RunProtocol {
    fn default() -> Self {
        Self {
            forks: 3,
            warmup_iterations: 1,
            warmup_time_ms: 100,
            measurement_iterations: 3,
            measurement_time_ms: 50,
            time_unit: TimeUnit::Microseconds,
        }
    }
}

impl RunProtocol {
    pub fn warmup_time(&self) -> Duration {
        Duration::from_millis(self.warmup_time_ms)
    }

    pub fn measurement_time(&self) -> Duration {
        Duration::from_millis(self.measurement_time_ms)
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.measurement_iterations == 0 {
            return Err(BenchError::Config(
                "measurement_iterations must be at least 1".into(),
            ));
        }
        if self.measurement_time_ms == 0 {
            return Err(BenchError::Config(
                "measurement_time_ms must be greater than zero".into(),
            ));
        }
        if self.warmup_iterations > 0 && self.warmup_time_ms == 0 {
            return Err(BenchError::Config(
                "warmup_time_ms must be greater than zero when warm-up is enabled".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Harness configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub element_counts: Vec<usize>,
    pub list_kinds: Vec<ListKind>,
    pub operations: Vec<Operation>,
    pub lookup: LookupMode,
    pub protocol: RunProtocol,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            element_counts: DEFAULT_ELEMENT_COUNTS.to_vec(),
            list_kinds: ListKind::ALL.to_vec(),
            operations: Operation::ALL.to_vec(),
            lookup: LookupMode::default(),
            protocol: RunProtocol::default(),
        }
    }
}

/// Command-line values that replace whatever the config file set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub element_counts: Option<Vec<usize>>,
    pub list_kinds: Option<Vec<ListKind>>,
    pub operations: Option<Vec<Operation>>,
    pub lookup: Option<LookupMode>,
    pub forks: Option<u32>,
    pub warmup_iterations: Option<u32>,
    pub warmup_time_ms: Option<u64>,
    pub measurement_iterations: Option<u32>,
    pub measurement_time_ms: Option<u64>,
    pub time_unit: Option<TimeUnit>,
}

impl HarnessConfig {
    pub fn from_toml_str(contents: &str) -> BenchResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> BenchResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Apply `overrides` on top of this configuration, then validate the result.
    pub fn apply_overrides(mut self, overrides: ConfigOverrides) -> BenchResult<Self> {
        if let Some(counts) = overrides.element_counts {
            self.element_counts = counts;
        }
        if let Some(kinds) = overrides.list_kinds {
            self.list_kinds = kinds;
        }
        if let Some(operations) = overrides.operations {
            self.operations = operations;
        }
        if let Some(lookup) = overrides.lookup {
            self.lookup = lookup;
        }

        let p = &mut self.protocol;
        if let Some(forks) = overrides.forks {
            p.forks = forks;
        }
        if let Some(n) = overrides.warmup_iterations {
            p.warmup_iterations = n;
        }
        if let Some(ms) = overrides.warmup_time_ms {
            p.warmup_time_ms = ms;
        }
        if let Some(n) = overrides.measurement_iterations {
            p.measurement_iterations = n;
        }
        if let Some(ms) = overrides.measurement_time_ms {
            p.measurement_time_ms = ms;
        }
        if let Some(unit) = overrides.time_unit {
            p.time_unit = unit;
        }

        self.validate()?;
        Ok(self)
    }

    /// Trials run in the current process when no forks are requested.
    pub fn in_process(&self) -> bool {
        self.protocol.forks == 0
    }

    pub fn validate(&self) -> BenchResult<()> {
        self.protocol.validate()?;
        self.matrix().map(|_| ())
    }

    pub fn matrix(&self) -> BenchResult<BenchmarkMatrix> {
        BenchmarkMatrix::new(
            self.operations.clone(),
            self.element_counts.clone(),
            self.list_kinds.clone(),
        )
    }
}
