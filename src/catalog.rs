//! Goodness-ranked catalog of every word-instance on a board.
//!
//! Move ordering dominates search cost, so the catalog replaces a per-node
//! comparator sort with a bitset merge:
//!
//! 1. Every word-instance gets two position-independent goodness scores, one
//!    per player.
//! 2. After discovery, [`Catalog::rank`] sorts instances once per player and
//!    renumbers them `0..N` by descending goodness (ties by discovery order).
//! 3. Each cell keeps, per player, a bitset with the bit at each reachable
//!    instance's rank set ([`CellMoves`]).
//!
//! Enumerating moves from a set of owned cells is then an OR of their bitsets
//! followed by a scan of set bits in ascending rank, which is best-first order.

use std::cmp::Reverse;

use rustc_hash::FxHashMap;

use crate::bitset::BitSet;
use crate::board::Cell;
use crate::error::{Error, Result};
use crate::game::Player;

/// Dense identity of a word-instance, assigned in discovery order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordId(pub u32);

impl WordId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A specific cell path spelling a dictionary word.
#[derive(Clone, Debug)]
pub struct WordInstance {
    pub id: WordId,
    pub word: String,
    pub path: Vec<Cell>,
    goodness: [i32; 2],
    rank: [u32; 2],
}

impl WordInstance {
    /// Heuristic value of playing this instance for `player`.
    #[inline]
    pub fn goodness(&self, player: Player) -> i32 {
        self.goodness[player.index()]
    }

    /// Position in `player`'s best-first order (0 is best). Valid after ranking.
    #[inline]
    pub fn rank(&self, player: Player) -> usize {
        self.rank[player.index()] as usize
    }
}

/// All word-instances of one board plus the indexes needed to enumerate them.
#[derive(Debug, Default)]
pub struct Catalog {
    instances: Vec<WordInstance>,
    by_path: FxHashMap<Vec<Cell>, WordId>,
    by_word: FxHashMap<String, Vec<WordId>>,
    /// Rank -> id, one table per player.
    by_rank: [Vec<WordId>; 2],
    ranked: bool,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new instance and return its id.
    ///
    /// # Errors
    /// `DuplicatePath` if `path` is already registered.
    pub fn register(
        &mut self,
        path: Vec<Cell>,
        word: &str,
        goodness_one: i32,
        goodness_two: i32,
    ) -> Result<WordId> {
        if self.by_path.contains_key(&path) {
            return Err(Error::DuplicatePath(path));
        }
        let id = WordId(self.instances.len() as u32);
        self.by_path.insert(path.clone(), id);
        self.by_word.entry(word.to_string()).or_default().push(id);
        self.instances.push(WordInstance {
            id,
            word: word.to_string(),
            path,
            goodness: [goodness_one, goodness_two],
            rank: [0, 0],
        });
        self.ranked = false;
        Ok(id)
    }

    /// Assign dense ranks per player: descending goodness, ties by discovery order.
    pub fn rank(&mut self) {
        for player in [Player::One, Player::Two] {
            let p = player.index();
            let mut order: Vec<WordId> = self.instances.iter().map(|w| w.id).collect();
            // Stable, so equal goodness keeps id order
            order.sort_by_key(|id| Reverse(self.instances[id.index()].goodness[p]));
            for (rank, id) in order.iter().enumerate() {
                self.instances[id.index()].rank[p] = rank as u32;
            }
            self.by_rank[p] = order;
        }
        self.ranked = true;
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance for `id`. Panics if `id` did not come from this catalog.
    #[inline]
    pub fn get(&self, id: WordId) -> &WordInstance {
        &self.instances[id.index()]
    }

    pub fn try_get(&self, id: WordId) -> Result<&WordInstance> {
        self.instances.get(id.index()).ok_or(Error::WordIdOutOfRange {
            id: id.index(),
            len: self.instances.len(),
        })
    }

    /// Id of the instance following exactly `path`, if any.
    pub fn lookup_path(&self, path: &[Cell]) -> Option<WordId> {
        self.by_path.get(path).copied()
    }

    /// Every instance spelling `word`.
    pub fn ids_for_word(&self, word: &str) -> &[WordId] {
        self.by_word.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Id holding `rank` in `player`'s order.
    #[inline]
    pub fn at_rank(&self, player: Player, rank: usize) -> WordId {
        self.by_rank[player.index()][rank]
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordInstance> {
        self.instances.iter()
    }

    /// Best-first moves for `player` reachable from `lists`, by bitset merge.
    ///
    /// Instances whose id is in `played` are skipped, as are instances not
    /// spelling `filter` when one is given. Both filters run during the bit scan.
    pub fn ordered_moves<'c>(
        &self,
        lists: impl IntoIterator<Item = &'c CellMoves>,
        player: Player,
        played: &BitSet,
        filter: Option<&str>,
    ) -> Vec<WordId> {
        debug_assert!(self.ranked, "catalog must be ranked before enumeration");
        let mut merged = BitSet::new(self.len());
        for list in lists {
            merged.union_with(list.bits(player));
        }

        let by_rank = &self.by_rank[player.index()];
        let mut moves = Vec::new();
        for rank in merged.ones() {
            let id = by_rank[rank];
            if played.contains(id.index()) {
                continue;
            }
            if let Some(word) = filter {
                if self.instances[id.index()].word != word {
                    continue;
                }
            }
            moves.push(id);
        }
        moves
    }

    /// Reference enumeration: union the per-cell id lists, then sort by
    /// descending goodness with ties broken by id.
    ///
    /// Produces the same sequence as [`Catalog::ordered_moves`]; kept as an
    /// oracle for that equivalence.
    pub fn sorted_moves<'c>(
        &self,
        lists: impl IntoIterator<Item = &'c CellMoves>,
        player: Player,
        played: &BitSet,
        filter: Option<&str>,
    ) -> Vec<WordId> {
        let mut moves: Vec<WordId> = lists
            .into_iter()
            .flat_map(|list| list.ids.iter().copied())
            .filter(|id| !played.contains(id.index()))
            .filter(|id| filter.is_none_or(|word| self.get(*id).word == word))
            .collect();
        moves.sort_unstable();
        moves.dedup();
        moves.sort_by(|a, b| {
            self.get(*b)
                .goodness(player)
                .cmp(&self.get(*a).goodness(player))
                .then(a.cmp(b))
        });
        moves
    }
}

/// The word-instances reachable from one cell.
#[derive(Clone, Debug, Default)]
pub struct CellMoves {
    ids: Vec<WordId>,
    bits: [BitSet; 2],
}

impl CellMoves {
    pub(crate) fn push(&mut self, id: WordId) {
        self.ids.push(id);
    }

    /// Set the rank bits of every listed id. Call once, after ranking.
    pub(crate) fn index_ranks(&mut self, catalog: &Catalog) {
        for player in [Player::One, Player::Two] {
            let mut bits = BitSet::new(catalog.len());
            for &id in &self.ids {
                bits.insert(catalog.get(id).rank(player));
            }
            self.bits[player.index()] = bits;
        }
    }

    /// Ids in discovery order.
    pub fn ids(&self) -> &[WordId] {
        &self.ids
    }

    /// Rank bitset for `player`.
    pub fn bits(&self, player: Player) -> &BitSet {
        &self.bits[player.index()]
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
