//! Error type shared by the library.

use thiserror::Error;

use crate::board::{format_path, Cell};
use crate::game::Player;

/// Errors raised while building boards or interpreting user input.
///
/// Search time-outs are not errors: they surface as an incomplete result.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed board: expected {expected} cells, found {found}")]
    MalformedBoard { expected: usize, found: usize },

    #[error("malformed board: bomb marker at end of text")]
    DanglingBomb,

    #[error("word-instance path {0:?} registered twice")]
    DuplicatePath(Vec<Cell>),

    #[error("no word-instance follows path {0:?}")]
    UnknownPath(Vec<Cell>),

    #[error("word id {id} out of range (catalog holds {len})")]
    WordIdOutOfRange { id: usize, len: usize },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("{} is not a legal move here", format_path(.0))]
    IllegalMove(Vec<Cell>),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("no board loaded")]
    NoBoard,

    #[error("position is already decided")]
    TerminalPosition,

    #[error("player {0} has no legal moves")]
    NoLegalMoves(Player),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
