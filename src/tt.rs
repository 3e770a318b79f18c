//! Transposition table for the alpha-beta search.

use rustc_hash::FxHashMap;

use crate::constants::TT_CAPACITY;

/// How a stored value relates to the true minimax value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    /// The value is exact.
    Exact,
    /// The search failed high; the true value is at least this.
    Lower,
    /// The search failed low; the true value is at most this.
    Upper,
}

/// A completed search result for one position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TtEntry<M> {
    pub value: i32,
    pub bound: Bound,
    /// Remaining depth the value was searched to.
    pub depth: u32,
    pub best_move: Option<M>,
}

impl<M> TtEntry<M> {
    /// Classify `value` against the window the node was searched with.
    pub fn classify(value: i32, alpha: i32, beta: i32, depth: u32, best_move: Option<M>) -> Self {
        let bound = if value <= alpha {
            Bound::Upper
        } else if value >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        Self {
            value,
            bound,
            depth,
            best_move,
        }
    }
}

/// Position hash to entry. Inserting replaces any previous entry.
#[derive(Debug)]
pub struct TranspositionTable<M> {
    entries: FxHashMap<u64, TtEntry<M>>,
}

impl<M> Default for TranspositionTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> TranspositionTable<M> {
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<M: Copy> TranspositionTable<M> {
    #[inline]
    pub fn probe(&self, hash: u64) -> Option<TtEntry<M>> {
        self.entries.get(&hash).copied()
    }

    #[inline]
    pub fn store(&mut self, hash: u64, entry: TtEntry<M>) {
        self.entries.insert(hash, entry);
    }

    /// Drop all entries. The allocation is released once it has grown past
    /// the usual working size.
    pub fn clear(&mut self) {
        if self.entries.capacity() > TT_CAPACITY {
            self.entries = FxHashMap::default();
        } else {
            self.entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(TtEntry::<u8>::classify(5, 5, 10, 1, None).bound, Bound::Upper);
        assert_eq!(TtEntry::<u8>::classify(10, 5, 10, 1, None).bound, Bound::Lower);
        assert_eq!(TtEntry::<u8>::classify(7, 5, 10, 1, None).bound, Bound::Exact);
    }

    #[test]
    fn test_store_replaces() {
        let mut tt = TranspositionTable::new();
        tt.store(42, TtEntry::classify(3, 0, 10, 2, Some(1u8)));
        tt.store(42, TtEntry::classify(20, 0, 10, 4, Some(2u8)));
        assert_eq!(tt.len(), 1);
        let entry = tt.probe(42).unwrap();
        assert_eq!(entry.depth, 4);
        assert_eq!(entry.bound, Bound::Lower);
        assert_eq!(entry.best_move, Some(2));
        assert!(tt.probe(7).is_none());

        tt.clear();
        assert!(tt.is_empty());
    }
}
