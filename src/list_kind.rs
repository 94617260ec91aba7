//! The "list kind" benchmark axis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// Which concrete list implementation backs a benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ListKind {
    /// Contiguous growable array (`Vec`).
    ArrayList,
    /// Doubly-linked list (`std::collections::LinkedList`).
    LinkedList,
    /// Array guarded by a mutex taken on every access.
    Vector,
}

impl ListKind {
    pub const ALL: [ListKind; 3] = [ListKind::ArrayList, ListKind::LinkedList, ListKind::Vector];

    pub fn name(&self) -> &'static str {
        match self {
            ListKind::ArrayList => "ArrayList",
            ListKind::LinkedList => "LinkedList",
            ListKind::Vector => "Vector",
        }
    }

    /// Whether setup can pre-size the backing storage.
    pub fn supports_capacity(&self) -> bool {
        !matches!(self, ListKind::LinkedList)
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ListKind {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arraylist" | "array-backed" | "array" | "vec" => Ok(ListKind::ArrayList),
            "linkedlist" | "linked" => Ok(ListKind::LinkedList),
            "vector" | "synchronized-array-backed" | "synchronized" => Ok(ListKind::Vector),
            _ => Err(BenchError::UnknownListKind(s.to_string())),
        }
    }
}

impl TryFrom<String> for ListKind {
    type Error = BenchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ListKind> for String {
    fn from(kind: ListKind) -> Self {
        kind.name().to_string()
    }
}
