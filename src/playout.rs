//! Default policy for the tree search: tactical move pickers and random rollouts.
//!
//! A rollout plays from a leaf to the end of the game, preferring at each
//! step a move that wins on the spot, then (optionally) a move that stops the
//! opponent from winning on the spot, then a uniformly random legal move.

use crate::constants::{DRAW_SCORE, LOSE_SCORE, WIN_SCORE};
use crate::game::{GameState, Player, Snapshot};
use crate::timer::Timer;

/// A move that wins immediately for the player to move, if any.
///
/// Candidates are tried in best-first order. `state` is left unchanged.
pub fn winning_move<S: GameState>(state: &mut S) -> Option<S::Move> {
    let mover = state.player_to_move();
    state.legal_moves().into_iter().find(|&mv| {
        let mut trial = Snapshot::new(&mut *state);
        trial.apply(mv);
        trial.is_winner(mover)
    })
}

/// A move that leaves the opponent without an immediately winning reply.
///
/// Only considered when the opponent, given the turn right now, would have a
/// winning move; returns `None` when there is no such threat or when every
/// move still loses on the spot. `state` is left unchanged.
pub fn blocking_move<S: GameState>(state: &mut S) -> Option<S::Move> {
    let mover = state.player_to_move();
    let threatened = {
        let mut flipped = Snapshot::new(&mut *state);
        flipped.set_player_to_move(mover.opponent());
        winning_move(&mut *flipped).is_some()
    };
    if !threatened {
        return None;
    }

    state.legal_moves().into_iter().find(|&mv| {
        let mut trial = Snapshot::new(&mut *state);
        trial.apply(mv);
        trial.is_winner(mover) || winning_move(&mut *trial).is_none()
    })
}

/// A uniformly random legal move, `None` if there are none.
pub fn random_move<S: GameState>(state: &S, rng: &mut fastrand::Rng) -> Option<S::Move> {
    let moves = state.legal_moves();
    if moves.is_empty() {
        None
    } else {
        Some(moves[rng.usize(..moves.len())])
    }
}

/// Score of a finished game for `player`.
pub fn outcome_for<S: GameState>(state: &S, player: Player) -> f64 {
    match state.winner() {
        Some(winner) if winner == player => WIN_SCORE,
        Some(_) => LOSE_SCORE,
        None => DRAW_SCORE,
    }
}

/// Play `state` out to the end and score it for `player`.
///
/// A position left with no legal moves before anyone has won counts as a draw,
/// as does a rollout still running when `timer` expires.
pub fn rollout<S: GameState>(
    mut state: S,
    player: Player,
    block: bool,
    rng: &mut fastrand::Rng,
    timer: &Timer,
) -> f64 {
    while !state.is_terminal() && !timer.exceeded() {
        let mv = winning_move(&mut state)
            .or_else(|| if block { blocking_move(&mut state) } else { None })
            .or_else(|| random_move(&state, rng));
        match mv {
            Some(mv) => state.apply(mv),
            None => break,
        }
    }
    outcome_for(&state, player)
}
