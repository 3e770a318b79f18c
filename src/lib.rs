//! Wordbase-Rust: search engines for a two-player territory word game.
//!
//! Players alternately trace dictionary words through adjacent letters on a
//! 13×10 grid, starting from cells they already own. Every cell on the path
//! becomes theirs; territory cut off from its owner's home edge is lost.
//! Reaching the opponent's home edge wins.
//!
//! ## Modules
//!
//! - [`board`] - Static board: letters, bombs, word discovery
//! - [`catalog`] - Goodness-ranked word-instance catalog and bitset move merge
//! - [`position`] - Territory state and the move transition
//! - [`game`] - Generic game contract shared by the searches
//! - [`minimax`] - Iterative-deepening alpha-beta with a transposition table
//! - [`mcts`] - Monte Carlo Tree Search
//! - [`playout`] - Rollout policy for MCTS
//! - [`duel`] - Strategy-vs-strategy matches
//! - [`shell`] - Interactive analysis shell
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use wordbase_rust::board::Board;
//! use wordbase_rust::dictionary::Dictionary;
//! use wordbase_rust::game::{Player, Strategy};
//! use wordbase_rust::minimax::{Minimax, MinimaxConfig};
//! use wordbase_rust::position::Position;
//!
//! let dictionary = Dictionary::from_words(["cao"]);
//! let text = format!("cao{}", "z".repeat(127));
//! let board = Rc::new(Board::new(&text, &dictionary).unwrap());
//! let position = Position::new(board, Player::One);
//!
//! let mut search: Minimax<Position> = Minimax::new(MinimaxConfig {
//!     max_depth: 1,
//!     ..MinimaxConfig::default()
//! });
//! let best = search.get_move(&position).unwrap();
//! assert_eq!(position.board().instance(best).word, "cao");
//! ```

pub mod bitset;
pub mod board;
pub mod catalog;
pub mod constants;
pub mod dictionary;
pub mod duel;
pub mod error;
pub mod game;
pub mod mcts;
pub mod minimax;
pub mod playout;
pub mod position;
pub mod shell;
pub mod timer;
pub mod tt;
