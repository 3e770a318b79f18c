//! Territory state and the move transition rule.
//!
//! A [`Position`] is the mutable per-game state: who owns each cell, where
//! the unclaimed bombs are, which word-instances have been consumed, and who
//! moves next. Playing a word:
//!
//! 1. claims every cell on its path for the mover; a claimed bomb also claims
//!    its 4 orthogonal neighbors, a mega-bomb all 8, chaining through any
//!    further bombs reached;
//! 2. consumes every instance spelling the same word;
//! 3. runs a connectivity sweep: owned cells no longer connected (8-adjacency,
//!    same owner) to a home edge revert to unowned;
//! 4. passes the turn.
//!
//! Player one's home edge is row 0, player two's is the last row. Owning any
//! cell of the opponent's home edge wins.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use rustc_hash::FxHasher;

use crate::bitset::BitSet;
use crate::board::{cell_at, index, offset, Board, Cell};
use crate::catalog::WordId;
use crate::constants::{
    ADJACENT, BOMB, CELLS, HEIGHT, INF, MEGABOMB, ORTHOGONAL, OWNER_MASK, OWNER_ONE, OWNER_TWO,
    UNOWNED, VISITED, WIDTH,
};
use crate::game::{GameState, Player};

/// Ownership byte for a player.
#[inline]
pub fn owner_of(player: Player) -> u8 {
    match player {
        Player::One => OWNER_ONE,
        Player::Two => OWNER_TWO,
    }
}

/// A game in progress on a shared static [`Board`].
#[derive(Clone)]
pub struct Position {
    board: Rc<Board>,
    /// One ownership byte per cell (see `constants`).
    cells: [u8; CELLS],
    /// Consumed word-instances, indexed by id.
    played: BitSet,
    to_move: Player,
}

impl Position {
    /// Fresh game: home edges owned, bombs placed, nothing played.
    pub fn new(board: Rc<Board>, to_move: Player) -> Self {
        let mut cells = [UNOWNED; CELLS];
        for col in 0..WIDTH {
            cells[index((0, col))] = OWNER_ONE;
            cells[index((HEIGHT - 1, col))] = OWNER_TWO;
        }
        let played = BitSet::new(board.catalog().len());
        let mut pos = Position {
            board,
            cells,
            played,
            to_move,
        };
        let board = Rc::clone(&pos.board);
        pos.put_bombs(board.bombs(), false);
        pos.put_bombs(board.megabombs(), true);
        pos
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Ownership byte of a cell.
    #[inline]
    pub fn owner(&self, cell: Cell) -> u8 {
        self.cells[index(cell)]
    }

    #[inline]
    pub fn is_owned_by(&self, cell: Cell, player: Player) -> bool {
        self.owner(cell) == owner_of(player)
    }

    pub fn played(&self) -> &BitSet {
        &self.played
    }

    pub fn is_played(&self, id: WordId) -> bool {
        self.played.contains(id.index())
    }

    /// Drop bomb or mega-bomb markers onto cells, replacing whatever was there.
    pub fn put_bombs(&mut self, cells: &[Cell], mega: bool) {
        let marker = if mega { MEGABOMB } else { BOMB };
        for &cell in cells {
            self.cells[index(cell)] = marker;
        }
    }

    /// Mark every instance of `word` as consumed, for joining a game in
    /// progress. Returns how many instances were marked.
    pub fn add_already_played(&mut self, word: &str) -> usize {
        let ids = self.board.catalog().ids_for_word(word);
        for id in ids {
            self.played.insert(id.index());
        }
        ids.len()
    }

    /// Words consumed so far, deduplicated, in id order.
    pub fn played_words(&self) -> Vec<&str> {
        let mut words: Vec<&str> = Vec::new();
        for i in self.played.ones() {
            let word = self.board.instance(WordId(i as u32)).word.as_str();
            if !words.contains(&word) {
                words.push(word);
            }
        }
        words
    }

    /// Legal moves best-first for the mover, optionally only those spelling `word`.
    pub fn legal_moves_matching(&self, word: Option<&str>) -> Vec<WordId> {
        let owner = owner_of(self.to_move);
        let lists = (0..CELLS)
            .filter(|&i| self.cells[i] == owner)
            .map(|i| self.board.moves_at(cell_at(i)));
        self.board
            .catalog()
            .ordered_moves(lists, self.to_move, &self.played, word)
    }

    /// Play a word-instance for the mover and pass the turn.
    ///
    /// The first cell of the path must already belong to the mover; this is
    /// checked in debug builds only.
    pub fn play(&mut self, id: WordId) {
        let board = &*self.board;
        let instance = board.instance(id);
        let owner = owner_of(self.to_move);
        debug_assert!(
            self.cells[index(instance.path[0])] == owner,
            "move {:?} does not start on territory of player {}",
            instance.path,
            self.to_move
        );

        for &cell in &instance.path {
            claim(&mut self.cells, cell, owner);
        }
        for same in board.catalog().ids_for_word(&instance.word) {
            self.played.insert(same.index());
        }
        sweep_connectivity(&mut self.cells);
        self.to_move = self.to_move.opponent();
    }

    /// Winner if either home edge has been breached.
    pub fn winner(&self) -> Option<Player> {
        let top = (0..WIDTH).any(|col| self.cells[index((0, col))] == OWNER_TWO);
        if top {
            return Some(Player::Two);
        }
        let bottom = (0..WIDTH).any(|col| self.cells[index((HEIGHT - 1, col))] == OWNER_ONE);
        if bottom {
            return Some(Player::One);
        }
        None
    }

    /// Value for the player to move.
    ///
    /// Decided games score `±INF`. Otherwise each non-edge cell owned by
    /// player one adds `(row+1)²` and each owned by player two subtracts
    /// `(row-HEIGHT)²`; the sum is negated when player two is to move.
    pub fn heuristic(&self) -> i32 {
        let h = match self.winner() {
            Some(Player::One) => INF,
            Some(Player::Two) => -INF,
            None => {
                let mut h = 0i32;
                for row in 1..HEIGHT - 1 {
                    for col in 0..WIDTH {
                        match self.cells[index((row, col))] {
                            OWNER_ONE => h += ((row + 1) * (row + 1)) as i32,
                            OWNER_TWO => h -= ((HEIGHT - row) * (HEIGHT - row)) as i32,
                            _ => {}
                        }
                    }
                }
                h
            }
        };
        match self.to_move {
            Player::One => h,
            Player::Two => -h,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_owner(&mut self, cell: Cell, owner: u8) {
        self.cells[index(cell)] = owner;
    }
}

/// Claim one cell, chaining through bombs and mega-bombs.
fn claim(cells: &mut [u8; CELLS], start: Cell, owner: u8) {
    let mut stack = vec![start];
    while let Some(cell) = stack.pop() {
        let i = index(cell);
        let neighbors: &[(isize, isize)] = match cells[i] {
            BOMB => &ORTHOGONAL,
            MEGABOMB => &ADJACENT,
            _ => &[],
        };
        // Overwrite before chaining, so a bomb fires once
        cells[i] = owner;
        stack.extend(neighbors.iter().filter_map(|&d| offset(cell, d)));
    }
}

/// Keep only owned cells connected to a home edge through same-owner cells.
fn sweep_connectivity(cells: &mut [u8; CELLS]) {
    let mut stack = Vec::with_capacity(CELLS);
    for row in [0, HEIGHT - 1] {
        for col in 0..WIDTH {
            let i = index((row, col));
            if cells[i] == OWNER_ONE || cells[i] == OWNER_TWO {
                cells[i] |= VISITED;
                stack.push(i);
            }
        }
    }

    while let Some(i) = stack.pop() {
        let owner = cells[i] & OWNER_MASK;
        for delta in ADJACENT {
            if let Some(n) = offset(cell_at(i), delta) {
                let j = index(n);
                // Visited cells carry the marker bit and never compare equal
                if cells[j] == owner {
                    cells[j] |= VISITED;
                    stack.push(j);
                }
            }
        }
    }

    for c in cells.iter_mut() {
        if *c & VISITED != 0 {
            *c &= OWNER_MASK;
        } else if *c != BOMB && *c != MEGABOMB {
            *c = UNOWNED;
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.board, &other.board)
            && self.cells == other.cells
            && self.played == other.played
            && self.to_move == other.to_move
    }
}

impl GameState for Position {
    type Move = WordId;

    fn player_to_move(&self) -> Player {
        self.to_move
    }

    fn set_player_to_move(&mut self, player: Player) {
        self.to_move = player;
    }

    fn legal_moves(&self) -> Vec<WordId> {
        self.legal_moves_matching(None)
    }

    fn apply(&mut self, mv: WordId) {
        self.play(mv);
    }

    fn is_terminal(&self) -> bool {
        self.winner().is_some()
    }

    fn winner(&self) -> Option<Player> {
        Position::winner(self)
    }

    fn evaluate(&self) -> i32 {
        self.heuristic()
    }

    fn position_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.cells.hash(&mut hasher);
        self.played.hash(&mut hasher);
        self.to_move.hash(&mut hasher);
        hasher.finish()
    }
}

fn owner_glyph(owner: u8) -> char {
    match owner {
        OWNER_ONE | OWNER_TWO => '.',
        BOMB => '*',
        MEGABOMB => '+',
        UNOWNED => ' ',
        _ => '?',
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "player({}): h={}", self.to_move, self.heuristic())?;
        write!(f, "  ")?;
        for col in 0..WIDTH {
            write!(f, "{col:2}")?;
        }
        writeln!(f)?;
        for row in 0..HEIGHT {
            write!(f, "{row:2}")?;
            for col in 0..WIDTH {
                let owner = self.owner((row, col));
                let mut letter = self.board.letter((row, col));
                if owner == OWNER_ONE {
                    letter = letter.to_ascii_uppercase();
                }
                write!(f, "{}{letter}", owner_glyph(owner))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
