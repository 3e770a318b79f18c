//! The position/move contract shared by the search algorithms.
//!
//! Both [`crate::minimax`] and [`crate::mcts`] are generic over
//! [`GameState`]; the territory game in [`crate::position`] is one
//! implementation, and the tests drive the searches with a tiny take-away game.

use std::fmt;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};

use crate::error::Result;

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    /// Moves first; home edge is row 0; maximizer in the territory heuristic.
    One,
    /// Home edge is the last row; minimizer in the territory heuristic.
    Two,
}

impl Player {
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 0 for player one, 1 for player two.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "1"),
            Player::Two => write!(f, "2"),
        }
    }
}

/// A two-player, perfect-information position.
///
/// `evaluate` follows the negamax convention: it is always from the point of
/// view of the player about to move.
pub trait GameState: Clone + PartialEq {
    type Move: Copy + Eq + Hash + fmt::Debug;

    fn player_to_move(&self) -> Player;

    /// Hand the turn to `player` without moving. Used to ask what the
    /// opponent could do if it were their turn.
    fn set_player_to_move(&mut self, player: Player);

    /// Legal moves in best-first order for the player to move.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Play `mv` for the player to move and pass the turn.
    fn apply(&mut self, mv: Self::Move);

    fn is_terminal(&self) -> bool;

    /// The winner of a terminal position, `None` while in progress or drawn.
    fn winner(&self) -> Option<Player>;

    fn is_winner(&self, player: Player) -> bool {
        self.winner() == Some(player)
    }

    /// Static value for the player to move; terminal positions use `±INF`.
    fn evaluate(&self) -> i32;

    /// Hash of the full position, used as the transposition key.
    fn position_hash(&self) -> u64;
}

/// Scoped snapshot: mutate a state in place, restored when the guard drops.
///
/// Restoration runs on every exit path, including early returns and unwinding,
/// so a search can apply a trial move through the guard and simply return.
///
/// ```
/// # use wordbase_rust::game::{GameState, Snapshot};
/// # fn probe<S: GameState>(state: &mut S, mv: S::Move) -> bool {
/// let mover = state.player_to_move();
/// let mut trial = Snapshot::new(state);
/// trial.apply(mv);
/// trial.is_winner(mover)
/// # }
/// ```
pub struct Snapshot<'s, S: Clone> {
    state: &'s mut S,
    saved: Option<S>,
}

impl<'s, S: Clone> Snapshot<'s, S> {
    pub fn new(state: &'s mut S) -> Self {
        let saved = Some(state.clone());
        Self { state, saved }
    }
}

impl<S: Clone> Deref for Snapshot<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.state
    }
}

impl<S: Clone> DerefMut for Snapshot<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.state
    }
}

impl<S: Clone> Drop for Snapshot<'_, S> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            *self.state = saved;
        }
    }
}

/// A move-choosing algorithm.
pub trait Strategy<S: GameState> {
    /// Choose a move for the player to move in `state`.
    ///
    /// # Errors
    /// `TerminalPosition` if the game is already decided.
    fn get_move(&mut self, state: &S) -> Result<S::Move>;

    /// Forget anything cached between unrelated searches.
    fn reset(&mut self) {}

    fn name(&self) -> &'static str;
}
