//! Benchmark results and their text/JSON rendering.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::config::TimeUnit;
use crate::matrix::Configuration;
use crate::stats::Summary;

/// One row of the report: a configuration and its average time per call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    pub benchmark: String,
    pub list_type: String,
    pub number_of_elements: usize,
    pub mode: String,
    pub samples: usize,
    pub score: Option<f64>,
    pub error: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: String,
    pub failure: Option<String>,
}

impl BenchmarkRecord {
    fn base(configuration: &Configuration, unit: TimeUnit) -> Self {
        Self {
            benchmark: configuration.operation.to_string(),
            list_type: configuration.list_kind.to_string(),
            number_of_elements: configuration.elements,
            mode: "avgt".to_string(),
            samples: 0,
            score: None,
            error: None,
            min: None,
            max: None,
            unit: format!("{}/op", unit.label()),
            failure: None,
        }
    }

    pub fn measured(configuration: &Configuration, unit: TimeUnit, summary: &Summary) -> Self {
        Self {
            samples: summary.samples,
            score: Some(summary.mean),
            error: (!summary.error.is_nan()).then_some(summary.error),
            min: Some(summary.min),
            max: Some(summary.max),
            ..Self::base(configuration, unit)
        }
    }

    pub fn failed(configuration: &Configuration, unit: TimeUnit, reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::base(configuration, unit)
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    records: Vec<BenchmarkRecord>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: BenchmarkRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn failures(&self) -> impl Iterator<Item = &BenchmarkRecord> {
        self.records.iter().filter(|r| r.is_failed())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.records)
    }

    /// Fixed-width table, one row per record.
    pub fn render_table(&self) -> String {
        let header = [
            "Benchmark",
            "(listType)",
            "(numberOfElements)",
            "Mode",
            "Cnt",
            "Score",
            "",
            "Error",
            "Units",
        ];

        let rows: Vec<[String; 9]> = self.records.iter().map(table_row).collect();

        let mut widths: [usize; 9] = header.map(|h| h.chars().count());
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row.iter()) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut out = String::new();
        write_row(&mut out, &header.map(String::from), &widths);
        for row in &rows {
            write_row(&mut out, row, &widths);
        }
        out
    }
}

fn table_row(r: &BenchmarkRecord) -> [String; 9] {
    let mut row = [
        r.benchmark.clone(),
        r.list_type.clone(),
        r.number_of_elements.to_string(),
        r.mode.clone(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
    ];
    match (&r.failure, r.score) {
        (None, Some(score)) => {
            row[4] = r.samples.to_string();
            row[5] = format!("{score:.3}");
            if let Some(error) = r.error {
                row[6] = "±".to_string();
                row[7] = format!("{error:.3}");
            }
            row[8] = r.unit.clone();
        }
        (Some(reason), _) => row[8] = format!("FAILED: {reason}"),
        (None, None) => row[8] = "FAILED: no samples".to_string(),
    }
    row
}

fn write_row(out: &mut String, cells: &[String; 9], widths: &[usize; 9]) {
    let mut line = String::new();
    for (i, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
        match i {
            0 => {
                let _ = write!(line, "{cell:<width$}");
            }
            8 => {
                let _ = write!(line, "  {cell}");
            }
            6 => {
                let _ = write!(line, " {cell:>width$}");
            }
            _ => {
                let _ = write!(line, "  {cell:>width$}");
            }
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
