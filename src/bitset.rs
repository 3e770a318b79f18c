//! Fixed-width bitset over dense indices.
//!
//! Used two ways: as a rank-indexed move list (bit `r` set means the move of
//! rank `r` is available) and as an id-indexed played-word set.

/// A bitset of fixed length, stored as 64-bit words.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// Create an all-zero bitset holding `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Number of addressable bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn insert(&mut self, bit: usize) {
        debug_assert!(bit < self.len, "bit {bit} out of range {}", self.len);
        self.words[bit / 64] |= 1u64 << (bit % 64);
    }

    #[inline]
    pub fn contains(&self, bit: usize) -> bool {
        bit < self.len && self.words[bit / 64] & (1u64 << (bit % 64)) != 0
    }

    /// OR `other` into `self`. Both sets must have the same length.
    #[inline]
    pub fn union_with(&mut self, other: &BitSet) {
        debug_assert_eq!(self.len, other.len);
        for (a, b) in self.words.iter_mut().zip(&other.words) {
            *a |= *b;
        }
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate set bits in ascending order.
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            index: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

/// Ascending iterator over the set bits of a [`BitSet`].
pub struct Ones<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.index += 1;
            if self.index >= self.words.len() {
                return None;
            }
            self.current = self.words[self.index];
        }
        let bit = self.current.trailing_zeros() as usize;
        // Clear lowest set bit
        self.current &= self.current - 1;
        Some(self.index * 64 + bit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains() {
        let mut set = BitSet::new(130);
        set.insert(0);
        set.insert(63);
        set.insert(64);
        set.insert(129);
        assert!(set.contains(0));
        assert!(set.contains(64));
        assert!(!set.contains(1));
        assert!(!set.contains(500));
        assert_eq!(set.count(), 4);
    }

    #[test]
    fn test_ones_ascending() {
        let mut set = BitSet::new(200);
        for bit in [199, 3, 64, 65, 127, 0] {
            set.insert(bit);
        }
        let bits: Vec<usize> = set.ones().collect();
        assert_eq!(bits, vec![0, 3, 64, 65, 127, 199]);
    }

    #[test]
    fn test_union_and_clear() {
        let mut a = BitSet::new(70);
        let mut b = BitSet::new(70);
        a.insert(1);
        b.insert(69);
        a.union_with(&b);
        assert_eq!(a.ones().collect::<Vec<_>>(), vec![1, 69]);
        a.clear();
        assert_eq!(a.count(), 0);
        assert_eq!(a.ones().next(), None);
    }

    #[test]
    fn test_empty_set() {
        let set = BitSet::new(0);
        assert!(set.is_empty());
        assert_eq!(set.ones().next(), None);
    }
}
