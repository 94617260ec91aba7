//! Benchmark axes and their Cartesian product.

use serde::{Deserialize, Serialize};

use crate::access::Operation;
use crate::error::{BenchError, BenchResult};
use crate::list_kind::ListKind;

/// Element counts measured by default.
pub const DEFAULT_ELEMENT_COUNTS: [usize; 17] = [
    10, 25, 50, 75, 100, 250, 500, 750, 1000, 2500, 5000, 7500, 10000, 25000, 50000, 75000,
    100000,
];

/// One cell of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Configuration {
    pub operation: Operation,
    pub list_kind: ListKind,
    pub elements: usize,
}

impl Configuration {
    pub fn label(&self) -> String {
        format!("{}/{}/{}", self.operation, self.list_kind, self.elements)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkMatrix {
    operations: Vec<Operation>,
    element_counts: Vec<usize>,
    list_kinds: Vec<ListKind>,
}

impl Default for BenchmarkMatrix {
    fn default() -> Self {
        Self {
            operations: Operation::ALL.to_vec(),
            element_counts: DEFAULT_ELEMENT_COUNTS.to_vec(),
            list_kinds: ListKind::ALL.to_vec(),
        }
    }
}

impl BenchmarkMatrix {
    pub fn new(
        operations: Vec<Operation>,
        element_counts: Vec<usize>,
        list_kinds: Vec<ListKind>,
    ) -> BenchResult<Self> {
        if operations.is_empty() {
            return Err(BenchError::Config("no operations selected".into()));
        }
        if element_counts.is_empty() {
            return Err(BenchError::Config("no element counts selected".into()));
        }
        if list_kinds.is_empty() {
            return Err(BenchError::Config("no list kinds selected".into()));
        }
        if let Some(count) = element_counts.iter().find(|&&n| i32::try_from(n).is_err()) {
            return Err(BenchError::Config(format!(
                "element count {count} does not fit in i32"
            )));
        }
        Ok(Self {
            operations,
            element_counts,
            list_kinds,
        })
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn element_counts(&self) -> &[usize] {
        &self.element_counts
    }

    pub fn list_kinds(&self) -> &[ListKind] {
        &self.list_kinds
    }

    pub fn len(&self) -> usize {
        self.operations.len() * self.element_counts.len() * self.list_kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every configuration, operation-major, then element count, then list kind.
    pub fn configurations(&self) -> impl Iterator<Item = Configuration> + '_ {
        self.operations.iter().flat_map(move |&operation| {
            self.element_counts.iter().flat_map(move |&elements| {
                self.list_kinds.iter().map(move |&list_kind| Configuration {
                    operation,
                    list_kind,
                    elements,
                })
            })
        })
    }
}
