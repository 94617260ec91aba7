//! Populated lists: the state each trial sets up before timing begins.

use std::collections::{linked_list, LinkedList};
use std::slice;

use parking_lot::Mutex;

use crate::error::{BenchError, BenchResult};
use crate::list_kind::ListKind;

/// A list holding `0..N` in insertion order, owned by a single trial.
///
/// Every accessor takes `&self`; nothing here mutates the contents after
/// [`PopulatedList::build`] returns.
#[derive(Debug)]
pub enum PopulatedList {
    ArrayList(Vec<i32>),
    LinkedList(LinkedList<i32>),
    Vector(Mutex<Vec<i32>>),
}

impl PopulatedList {
    /// Build a list of `kind` and append `0, 1, ..., count - 1`.
    ///
    /// Array-backed kinds are pre-sized to `count`; the linked list starts empty.
    pub fn build(kind: ListKind, count: usize) -> BenchResult<Self> {
        let upper = i32::try_from(count).map_err(|_| {
            BenchError::Config(format!("element count {count} does not fit in i32"))
        })?;

        let list = match kind {
            ListKind::ArrayList => {
                let mut vec = Vec::with_capacity(count);
                vec.extend(0..upper);
                PopulatedList::ArrayList(vec)
            }
            ListKind::LinkedList => {
                let mut list = LinkedList::new();
                for value in 0..upper {
                    list.push_back(value);
                }
                PopulatedList::LinkedList(list)
            }
            ListKind::Vector => {
                let vector = Mutex::new(Vec::with_capacity(count));
                for value in 0..upper {
                    // one lock per append, like a synchronized add
                    vector.lock().push(value);
                }
                PopulatedList::Vector(vector)
            }
        };
        Ok(list)
    }

    pub fn kind(&self) -> ListKind {
        match self {
            PopulatedList::ArrayList(_) => ListKind::ArrayList,
            PopulatedList::LinkedList(_) => ListKind::LinkedList,
            PopulatedList::Vector(_) => ListKind::Vector,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PopulatedList::ArrayList(vec) => vec.len(),
            PopulatedList::LinkedList(list) => list.len(),
            PopulatedList::Vector(vector) => vector.lock().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positional get. O(1) for the array kinds; the linked list walks from
    /// whichever end is nearer, O(min(index, len - index)).
    pub fn get(&self, index: usize) -> Option<i32> {
        match self {
            PopulatedList::ArrayList(vec) => vec.get(index).copied(),
            PopulatedList::LinkedList(list) => {
                let len = list.len();
                if index >= len {
                    None
                } else if index < len / 2 {
                    list.iter().nth(index).copied()
                } else {
                    list.iter().rev().nth(len - 1 - index).copied()
                }
            }
            PopulatedList::Vector(vector) => vector.lock().get(index).copied(),
        }
    }

    /// Positional get that treats a miss as a fault.
    pub fn get_checked(&self, index: i64) -> BenchResult<i32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.get(i))
            .ok_or_else(|| BenchError::IndexOutOfRange {
                index,
                len: self.len(),
            })
    }

    /// Forward cursor over the values, using each kind's natural iteration.
    pub fn cursor(&self) -> Cursor<'_> {
        match self {
            PopulatedList::ArrayList(vec) => Cursor::Array(vec.iter()),
            PopulatedList::LinkedList(list) => Cursor::Linked(list.iter()),
            PopulatedList::Vector(vector) => Cursor::Synchronized {
                vector,
                position: 0,
            },
        }
    }

    pub fn to_vec(&self) -> Vec<i32> {
        self.cursor().collect()
    }
}

impl<'a> IntoIterator for &'a PopulatedList {
    type Item = i32;
    type IntoIter = Cursor<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.cursor()
    }
}

/// Iterator returned by [`PopulatedList::cursor`].
///
/// The synchronized variant takes the lock for every step, so concurrent
/// readers interleave per element rather than per traversal.
#[derive(Debug)]
pub enum Cursor<'a> {
    Array(slice::Iter<'a, i32>),
    Linked(linked_list::Iter<'a, i32>),
    Synchronized {
        vector: &'a Mutex<Vec<i32>>,
        position: usize,
    },
}

impl Iterator for Cursor<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        match self {
            Cursor::Array(iter) => iter.next().copied(),
            Cursor::Linked(iter) => iter.next().copied(),
            Cursor::Synchronized { vector, position } => {
                let value = vector.lock().get(*position).copied()?;
                *position += 1;
                Some(value)
            }
        }
    }
}
