//! Static board: letter grid, bomb locations, and every playable word-instance.
//!
//! A board is built once from its text encoding and a dictionary and never
//! mutated afterwards. Construction discovers every word-instance with a
//! prefix-pruned depth-first walk, ranks them in a [`Catalog`], and indexes
//! the per-cell move lists used for best-first enumeration.

use std::fmt;

use crate::catalog::{Catalog, CellMoves, WordId, WordInstance};
use crate::constants::{ADJACENT, CELLS, HEIGHT, WIDTH};
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};

/// A grid cell as `(row, col)`.
pub type Cell = (usize, usize);

/// Flat index of a cell.
#[inline]
pub fn index((row, col): Cell) -> usize {
    row * WIDTH + col
}

/// Cell at a flat index.
#[inline]
pub fn cell_at(i: usize) -> Cell {
    (i / WIDTH, i % WIDTH)
}

/// The cell `(dr, dc)` away from `cell`, if it is on the grid.
#[inline]
pub fn offset((row, col): Cell, (dr, dc): (isize, isize)) -> Option<Cell> {
    let r = row.checked_add_signed(dr)?;
    let c = col.checked_add_signed(dc)?;
    (r < HEIGHT && c < WIDTH).then_some((r, c))
}

/// Goodness of a path for player one: deeper rows are worth quadratically more.
pub fn goodness_one(path: &[Cell]) -> i32 {
    path.iter()
        .map(|&(row, _)| {
            let d = row as i32 + 1;
            d * d
        })
        .sum()
}

/// Goodness of a path for player two, mirrored from the last row.
pub fn goodness_two(path: &[Cell]) -> i32 {
    path.iter()
        .map(|&(row, _)| {
            let d = row as i32 - HEIGHT as i32;
            d * d
        })
        .sum()
}

/// An immutable Wordbase board.
pub struct Board {
    letters: Vec<char>,
    bombs: Vec<Cell>,
    megabombs: Vec<Cell>,
    catalog: Catalog,
    cell_moves: Vec<CellMoves>,
}

impl Board {
    /// Build a board from its text encoding.
    ///
    /// The text lists 13 rows of 10 lowercase letters in row-major order. A
    /// letter prefixed with `*` is a bomb, with `+` a mega-bomb. Whitespace is
    /// ignored.
    ///
    /// # Errors
    /// `MalformedBoard` if the text does not hold exactly 130 letters,
    /// `DanglingBomb` if it ends in a bomb marker.
    pub fn new(text: &str, dictionary: &Dictionary) -> Result<Self> {
        let (letters, bombs, megabombs) = parse_grid(text)?;
        let mut board = Board {
            letters,
            bombs,
            megabombs,
            catalog: Catalog::new(),
            cell_moves: vec![CellMoves::default(); CELLS],
        };
        board.discover_words(dictionary)?;
        board.catalog.rank();
        for moves in &mut board.cell_moves {
            moves.index_ranks(&board.catalog);
        }
        Ok(board)
    }

    fn discover_words(&mut self, dictionary: &Dictionary) -> Result<()> {
        let mut walk = WordWalk {
            letters: &self.letters,
            dictionary,
            catalog: &mut self.catalog,
            visited: [false; CELLS],
            path: Vec::new(),
            word: String::new(),
        };
        for (i, moves) in self.cell_moves.iter_mut().enumerate() {
            walk.visit(cell_at(i), moves)?;
        }
        Ok(())
    }

    /// Letter at a cell.
    #[inline]
    pub fn letter(&self, cell: Cell) -> char {
        self.letters[index(cell)]
    }

    pub fn bombs(&self) -> &[Cell] {
        &self.bombs
    }

    pub fn megabombs(&self) -> &[Cell] {
        &self.megabombs
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Word-instances starting at `cell`.
    #[inline]
    pub fn moves_at(&self, cell: Cell) -> &CellMoves {
        &self.cell_moves[index(cell)]
    }

    #[inline]
    pub fn instance(&self, id: WordId) -> &WordInstance {
        self.catalog.get(id)
    }

    /// Every (word, path) starting at `cell`, in discovery order.
    pub fn word_paths(&self, cell: Cell) -> Vec<(&str, &[Cell])> {
        self.moves_at(cell)
            .ids()
            .iter()
            .map(|&id| {
                let w = self.catalog.get(id);
                (w.word.as_str(), w.path.as_slice())
            })
            .collect()
    }

    /// The letters along `path`.
    pub fn word_from_path(&self, path: &[Cell]) -> String {
        path.iter().map(|&cell| self.letter(cell)).collect()
    }

    /// The instance following exactly `path`.
    ///
    /// # Errors
    /// `UnknownPath` if no dictionary word follows that path.
    pub fn instance_for_path(&self, path: &[Cell]) -> Result<WordId> {
        self.catalog
            .lookup_path(path)
            .ok_or_else(|| Error::UnknownPath(path.to_vec()))
    }
}

/// Depth-first word discovery state.
struct WordWalk<'a> {
    letters: &'a [char],
    dictionary: &'a Dictionary,
    catalog: &'a mut Catalog,
    visited: [bool; CELLS],
    path: Vec<Cell>,
    word: String,
}

impl WordWalk<'_> {
    fn visit(&mut self, cell: Cell, out: &mut CellMoves) -> Result<()> {
        let i = index(cell);
        // A cell appears at most once per path
        if self.visited[i] {
            return Ok(());
        }

        self.visited[i] = true;
        self.path.push(cell);
        self.word.push(self.letters[i]);

        let result = self.extend(cell, out);

        self.word.pop();
        self.path.pop();
        self.visited[i] = false;
        result
    }

    fn extend(&mut self, cell: Cell, out: &mut CellMoves) -> Result<()> {
        if !self.dictionary.has_prefix(&self.word) {
            return Ok(());
        }
        if self.path.len() >= 2 && self.dictionary.has_word(&self.word) {
            let id = self.catalog.register(
                self.path.clone(),
                &self.word,
                goodness_one(&self.path),
                goodness_two(&self.path),
            )?;
            out.push(id);
        }
        for delta in ADJACENT {
            if let Some(next) = offset(cell, delta) {
                self.visit(next, out)?;
            }
        }
        Ok(())
    }
}

type Grid = (Vec<char>, Vec<Cell>, Vec<Cell>);

fn parse_grid(text: &str) -> Result<Grid> {
    let mut letters = Vec::with_capacity(CELLS);
    let mut bombs = Vec::new();
    let mut megabombs = Vec::new();
    let mut pending: Option<bool> = None;

    for ch in text.chars() {
        match ch {
            '*' => pending = Some(false),
            '+' => pending = Some(true),
            c if c.is_whitespace() => {}
            c => {
                let cell = cell_at(letters.len());
                match pending.take() {
                    Some(false) => bombs.push(cell),
                    Some(true) => megabombs.push(cell),
                    None => {}
                }
                letters.push(c);
            }
        }
    }

    if pending.is_some() {
        return Err(Error::DanglingBomb);
    }
    if letters.len() != CELLS {
        return Err(Error::MalformedBoard {
            expected: CELLS,
            found: letters.len(),
        });
    }
    Ok((letters, bombs, megabombs))
}

/// Parse a path written as `(row,col),(row,col),...`.
///
/// Pairs may be separated by commas and/or whitespace.
///
/// # Errors
/// `InvalidPath` on malformed text, an empty path, or a cell off the grid.
pub fn parse_path(text: &str) -> Result<Vec<Cell>> {
    let invalid = || Error::InvalidPath(text.to_string());
    let mut path = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        rest = rest.strip_prefix('(').ok_or_else(invalid)?;
        let close = rest.find(')').ok_or_else(invalid)?;
        let (row, col) = rest[..close].split_once(',').ok_or_else(invalid)?;
        let row: usize = row.trim().parse().map_err(|_| invalid())?;
        let col: usize = col.trim().parse().map_err(|_| invalid())?;
        if row >= HEIGHT || col >= WIDTH {
            return Err(invalid());
        }
        path.push((row, col));
        rest = rest[close + 1..].trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    }

    if path.is_empty() {
        return Err(invalid());
    }
    Ok(path)
}

/// Format a path as `(row,col),(row,col),...`.
pub fn format_path(path: &[Cell]) -> String {
    path.iter()
        .map(|(row, col)| format!("({row},{col})"))
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                let cell = (row, col);
                let marker = if self.bombs.contains(&cell) {
                    '*'
                } else if self.megabombs.contains(&cell) {
                    '+'
                } else {
                    ' '
                };
                write!(f, "{marker}{}", self.letter(cell))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
