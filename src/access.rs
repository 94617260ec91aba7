//! The five timed access patterns.
//!
//! Every operation reads the populated list and returns the accumulated sum.
//! The measurement loop discards the value through `black_box`, but it is
//! always computed so the optimizer cannot drop the traversal.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};
use crate::populated::PopulatedList;

// ============================================================================
// Operation axis
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operation {
    ForIndex,
    ForEach,
    Iterator,
    Stream,
    ParallelStream,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::ForIndex,
        Operation::ForEach,
        Operation::Iterator,
        Operation::Stream,
        Operation::ParallelStream,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Operation::ForIndex => "forIndex",
            Operation::ForEach => "forEach",
            Operation::Iterator => "iterator",
            Operation::Stream => "stream",
            Operation::ParallelStream => "parallelStream",
        }
    }

    /// Run this operation once over `list`.
    #[inline]
    pub fn run(&self, list: &PopulatedList, lookup: LookupMode) -> BenchResult<i64> {
        match self {
            Operation::ForIndex => for_index_sum(list),
            Operation::ForEach => for_each_sum(list, lookup),
            Operation::Iterator => iterator_sum(list, lookup),
            Operation::Stream => Ok(stream_sum(list)),
            Operation::ParallelStream => Ok(parallel_stream_sum(list)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the operation names case-insensitively, ignoring `-` and `_`.
impl FromStr for Operation {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "forindex" => Ok(Operation::ForIndex),
            "foreach" => Ok(Operation::ForEach),
            "iterator" => Ok(Operation::Iterator),
            "stream" => Ok(Operation::Stream),
            "parallelstream" => Ok(Operation::ParallelStream),
            _ => Err(BenchError::UnknownOperation(s.to_string())),
        }
    }
}

impl TryFrom<String> for Operation {
    type Error = BenchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operation> for String {
    fn from(op: Operation) -> Self {
        op.name().to_string()
    }
}

// ============================================================================
// Lookup mode
// ============================================================================

/// How `forEach` and `iterator` use each iterated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupMode {
    /// Treat the value as a position and fetch the element there again.
    /// Matches the historical benchmark, including its O(n^2) linked-list cost.
    #[default]
    Positional,
    /// Accumulate the iterated value itself.
    Direct,
}

impl fmt::Display for LookupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupMode::Positional => f.write_str("positional"),
            LookupMode::Direct => f.write_str("direct"),
        }
    }
}

impl FromStr for LookupMode {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" | "literal" => Ok(LookupMode::Positional),
            "direct" => Ok(LookupMode::Direct),
            _ => Err(BenchError::UnknownLookupMode(s.to_string())),
        }
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Sum of `0..n`, the value every operation must produce.
pub fn expected_sum(n: usize) -> i64 {
    let n = n as i64;
    n * (n - 1) / 2
}

#[inline]
fn lookup_value(list: &PopulatedList, value: i32, lookup: LookupMode) -> BenchResult<i64> {
    match lookup {
        LookupMode::Positional => list.get_checked(i64::from(value)).map(i64::from),
        LookupMode::Direct => Ok(i64::from(value)),
    }
}

pub fn for_index_sum(list: &PopulatedList) -> BenchResult<i64> {
    let mut sum: i64 = 0;
    for i in 0..list.len() {
        sum += list.get_checked(i as i64)? as i64;
    }
    Ok(sum)
}

pub fn for_each_sum(list: &PopulatedList, lookup: LookupMode) -> BenchResult<i64> {
    let mut sum: i64 = 0;
    for value in list {
        sum += lookup_value(list, value, lookup)?;
    }
    Ok(sum)
}

#[allow(clippy::while_let_on_iterator)]
pub fn iterator_sum(list: &PopulatedList, lookup: LookupMode) -> BenchResult<i64> {
    let mut sum: i64 = 0;
    let mut cursor = list.cursor();
    while let Some(value) = cursor.next() {
        sum += lookup_value(list, value, lookup)?;
    }
    Ok(sum)
}

#[allow(clippy::unnecessary_fold)]
pub fn stream_sum(list: &PopulatedList) -> i64 {
    match list {
        PopulatedList::ArrayList(vec) => vec.iter().map(|&v| i64::from(v)).fold(0, |a, b| a + b),
        PopulatedList::LinkedList(items) => {
            items.iter().map(|&v| i64::from(v)).fold(0, |a, b| a + b)
        }
        PopulatedList::Vector(vector) => {
            let guard = vector.lock();
            guard.iter().map(|&v| i64::from(v)).fold(0, |a, b| a + b)
        }
    }
}

/// Parallel map/reduce on rayon's global pool. Split points vary between
/// runs; `i64` addition keeps the result identical to [`stream_sum`].
pub fn parallel_stream_sum(list: &PopulatedList) -> i64 {
    match list {
        PopulatedList::ArrayList(vec) => vec
            .par_iter()
            .map(|&v| i64::from(v))
            .reduce(|| 0, |a, b| a + b),
        PopulatedList::LinkedList(items) => items
            .par_iter()
            .map(|&v| i64::from(v))
            .reduce(|| 0, |a, b| a + b),
        PopulatedList::Vector(vector) => {
            let guard = vector.lock();
            guard
                .par_iter()
                .map(|&v| i64::from(v))
                .reduce(|| 0, |a, b| a + b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_kind::ListKind;

    #[test]
    fn array_list_of_five_sums_to_ten() {
        let list = PopulatedList::build(ListKind::ArrayList, 5).unwrap();
        assert_eq!(for_index_sum(&list).unwrap(), 10);
        assert_eq!(stream_sum(&list), 10);
        assert_eq!(parallel_stream_sum(&list), 10);
    }

    #[test]
    fn empty_linked_list_sums_to_zero() {
        let list = PopulatedList::build(ListKind::LinkedList, 0).unwrap();
        assert!(list.to_vec().is_empty());
        for op in Operation::ALL {
            assert_eq!(op.run(&list, LookupMode::Positional).unwrap(), 0);
            assert_eq!(op.run(&list, LookupMode::Direct).unwrap(), 0);
        }
    }

    #[test]
    fn every_operation_matches_oracle() {
        for kind in ListKind::ALL {
            for n in [0usize, 1, 2, 10, 75, 1000] {
                let list = PopulatedList::build(kind, n).unwrap();
                for op in Operation::ALL {
                    for lookup in [LookupMode::Positional, LookupMode::Direct] {
                        assert_eq!(
                            op.run(&list, lookup).unwrap(),
                            expected_sum(n),
                            "{op} on {kind} with {n} elements ({lookup})"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn expected_sum_small_values() {
        assert_eq!(expected_sum(0), 0);
        assert_eq!(expected_sum(1), 0);
        assert_eq!(expected_sum(5), 10);
        assert_eq!(expected_sum(100_000), 4_999_950_000);
    }

    #[test]
    fn operation_names_parse_back() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
        assert_eq!("parallel-stream".parse::<Operation>().unwrap(), Operation::ParallelStream);
        assert!(matches!(
            "shuffle".parse::<Operation>(),
            Err(BenchError::UnknownOperation(_))
        ));
        for alias in ["indexed", "sequential", "parallel"] {
            assert!(alias.parse::<Operation>().is_err(), "{alias} should not parse");
        }
    }

    #[test]
    fn lookup_mode_parses() {
        assert_eq!("positional".parse::<LookupMode>().unwrap(), LookupMode::Positional);
        assert_eq!("Direct".parse::<LookupMode>().unwrap(), LookupMode::Direct);
        assert!("random".parse::<LookupMode>().is_err());
        assert_eq!(LookupMode::default(), LookupMode::Positional);
    }
}
