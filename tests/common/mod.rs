//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use wordbase_rust::board::Board;
use wordbase_rust::constants::{CELLS, HEIGHT, INF, WIDTH};
use wordbase_rust::dictionary::Dictionary;
use wordbase_rust::game::{GameState, Player};
use wordbase_rust::position::Position;

/// A real game board with one bomb on row 1.
pub const CAO_BOARD: &str = "caorsorbafal*sutseidnercbnolecavksidlvrtselruamasiuxigdbrsyngoenerhaneodrosmtsihlaltdymecrescehudndmnefingelermaeamoksbaoflbdecuhlg";

/// Short English words, many of which can be traced on `CAO_BOARD`.
pub const WORDS: &[&str] = &[
    "cao", "car", "oar", "orb", "rob", "sob", "bar", "fab", "also", "lid", "lie", "die", "tie",
    "set", "sit", "its", "nod", "don", "one", "den", "end", "red", "ore", "roe", "bed", "sub",
    "bus", "tea", "eat", "ate", "sea", "ale", "lea", "ran", "nor", "van", "sin", "ins", "age",
    "ego", "gin", "ring", "sing", "king", "hen", "her", "tin", "nit", "sun", "nun", "run", "urn",
    "elm", "ham", "mad", "dam", "ode", "doe", "toe", "dot", "sod", "cod", "lab", "bad", "dab",
    "bug", "gab", "log", "leg", "gel", "dim", "mid", "med", "hum", "dug", "rug", "mug", "emu",
    "sly", "yes", "dye", "try", "sty", "rye", "lens", "lend", "send", "mend", "fine", "fin",
    "fling", "mole", "sole", "bale", "cube", "hue", "due", "duh", "hug",
];

pub fn words_dictionary() -> Dictionary {
    Dictionary::from_words(WORDS.iter().copied())
}

pub fn cao_position(dictionary: &Dictionary) -> Position {
    let board = Board::new(CAO_BOARD, dictionary).expect("valid board");
    Position::new(Rc::new(board), Player::One)
}

/// `prefix` followed by 'z' up to a full board.
pub fn padded_board(prefix: &str, dictionary: &Dictionary) -> Rc<Board> {
    let letters = prefix.chars().filter(|c| c.is_ascii_alphabetic()).count();
    let text = format!("{prefix}{}", "z".repeat(CELLS - letters));
    Rc::new(Board::new(&text, dictionary).expect("valid board"))
}

/// Column 0 spells "abcdefghijklm" top to bottom; everything else is 'z'.
pub fn ladder_board(dictionary: &Dictionary) -> Rc<Board> {
    let text: String = (0..HEIGHT)
        .map(|row| {
            let letter = (b'a' + row as u8) as char;
            format!("{letter}{}", "z".repeat(WIDTH - 1))
        })
        .collect();
    Rc::new(Board::new(&text, dictionary).expect("valid board"))
}

/// Take 1-3 from a pile; whoever takes the last one wins. Mirrors the
/// unit-test mock in `game::mock`, which is not compiled for this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct Nim {
    pub pile: u8,
    pub to_move: Player,
}

impl Nim {
    pub fn new(pile: u8) -> Self {
        Self {
            pile,
            to_move: Player::One,
        }
    }
}

impl GameState for Nim {
    type Move = u8;

    fn player_to_move(&self) -> Player {
        self.to_move
    }
    fn set_player_to_move(&mut self, player: Player) {
        self.to_move = player;
    }
    fn legal_moves(&self) -> Vec<u8> {
        (1..=3).rev().filter(|&take| take <= self.pile).collect()
    }
    fn apply(&mut self, take: u8) {
        self.pile -= take;
        self.to_move = self.to_move.opponent();
    }
    fn is_terminal(&self) -> bool {
        self.pile == 0
    }
    fn winner(&self) -> Option<Player> {
        self.is_terminal().then(|| self.to_move.opponent())
    }
    fn evaluate(&self) -> i32 {
        if self.is_terminal() { -INF } else { 0 }
    }
    fn position_hash(&self) -> u64 {
        (self.pile as u64) << 1 | self.to_move.index() as u64
    }
}
