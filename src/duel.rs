//! Head-to-head matches between two strategies.
//!
//! Games alternate which strategy moves first. After every game the first
//! strategy's score (wins plus half the draws) gets a 99% Wilson interval; the
//! match stops early once the interval lies wholly above or below one half.

use std::fmt;

use log::info;

use crate::error::Result;
use crate::game::{GameState, Player, Strategy};

/// Two-sided 99% normal quantile.
const Z_99: f64 = 2.576;

/// Result of a single game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameRecord {
    pub winner: Option<Player>,
    pub plies: usize,
}

/// Play `state` to the end, `players[0]` moving for player one.
///
/// The game is drawn if it reaches `max_plies` or a position with no legal
/// moves before either side wins.
pub fn play_game<S: GameState>(
    mut state: S,
    players: [&mut dyn Strategy<S>; 2],
    max_plies: usize,
) -> Result<GameRecord> {
    let [one, two] = players;
    one.reset();
    two.reset();

    let mut plies = 0;
    while !state.is_terminal() && plies < max_plies && !state.legal_moves().is_empty() {
        let mv = match state.player_to_move() {
            Player::One => one.get_move(&state)?,
            Player::Two => two.get_move(&state)?,
        };
        state.apply(mv);
        plies += 1;
    }
    Ok(GameRecord {
        winner: state.winner(),
        plies,
    })
}

/// Running match score from the first strategy's side.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Tally {
    pub fn games(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Fraction of points won, draws counting half.
    pub fn score(&self) -> f64 {
        let n = self.games();
        if n == 0 {
            0.5
        } else {
            (self.wins as f64 + 0.5 * self.draws as f64) / n as f64
        }
    }

    /// 99% Wilson score interval on [`Tally::score`].
    pub fn interval(&self) -> (f64, f64) {
        let n = self.games() as f64;
        if n == 0.0 {
            return (0.0, 1.0);
        }
        let p = self.score();
        let z2 = Z_99 * Z_99;
        let denom = 1.0 + z2 / n;
        let center = (p + z2 / (2.0 * n)) / denom;
        let half = Z_99 * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;
        ((center - half).max(0.0), (center + half).min(1.0))
    }

    /// True once the interval excludes an even match.
    pub fn is_decided(&self) -> bool {
        let (low, high) = self.interval();
        low > 0.5 || high < 0.5
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (low, high) = self.interval();
        write!(
            f,
            "+{} -{} ={} score {:.3} [{:.3}, {:.3}]",
            self.wins,
            self.losses,
            self.draws,
            self.score(),
            low,
            high
        )
    }
}

/// Match between strategies `a` and `b` from a fixed starting position.
pub struct Duel<'a, S: GameState> {
    a: &'a mut dyn Strategy<S>,
    b: &'a mut dyn Strategy<S>,
    max_games: u32,
    max_plies: usize,
}

impl<'a, S: GameState> Duel<'a, S> {
    pub fn new(a: &'a mut dyn Strategy<S>, b: &'a mut dyn Strategy<S>, max_games: u32) -> Self {
        Self {
            a,
            b,
            max_games,
            max_plies: 500,
        }
    }

    pub fn with_max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = max_plies;
        self
    }

    /// Play games until `max_games` or a decided score.
    ///
    /// `start` must have player one to move; `a` takes player one in even games.
    pub fn run(&mut self, start: &S) -> Result<Tally> {
        let mut tally = Tally::default();
        for game in 0..self.max_games {
            let a_side = if game % 2 == 0 { Player::One } else { Player::Two };
            let players: [&mut dyn Strategy<S>; 2] = match a_side {
                Player::One => [&mut *self.a, &mut *self.b],
                Player::Two => [&mut *self.b, &mut *self.a],
            };
            let record = play_game(start.clone(), players, self.max_plies)?;
            match record.winner {
                Some(w) if w == a_side => tally.wins += 1,
                Some(_) => tally.losses += 1,
                None => tally.draws += 1,
            }
            info!(
                "game {}: {} as player {a_side}, winner {:?} after {} plies; {tally}",
                game + 1,
                self.a.name(),
                record.winner,
                record.plies
            );
            if tally.is_decided() {
                break;
            }
        }
        Ok(tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::mock::Nim;
    use crate::minimax::{Minimax, MinimaxConfig};

    /// Always takes a single stone.
    struct Timid;

    impl Strategy<Nim> for Timid {
        fn get_move(&mut self, _state: &Nim) -> Result<u8> {
            Ok(1)
        }
        fn name(&self) -> &'static str {
            "timid"
        }
    }

    #[test]
    fn test_wilson_interval() {
        let even = Tally {
            wins: 5,
            losses: 5,
            draws: 0,
        };
        let (low, high) = even.interval();
        assert!(low < 0.5 && high > 0.5);
        assert!(!even.is_decided());

        let sweep = Tally {
            wins: 12,
            losses: 0,
            draws: 0,
        };
        assert!(sweep.interval().0 > 0.5);
        assert!(sweep.is_decided());
        assert_eq!(Tally::default().interval(), (0.0, 1.0));
    }

    #[test]
    fn test_play_game_reports_winner() {
        let mut a = Timid;
        let mut b = Timid;
        // Nine single takes: player one takes the last stone
        let players: [&mut dyn Strategy<Nim>; 2] = [&mut a, &mut b];
        let record = play_game(Nim::new(9), players, 100).unwrap();
        assert_eq!(record.winner, Some(Player::One));
        assert_eq!(record.plies, 9);
    }

    #[test]
    fn test_perfect_player_wins_match() {
        let mut perfect: Minimax<Nim> = Minimax::new(MinimaxConfig {
            max_seconds: f64::INFINITY,
            max_depth: 12,
            use_transposition_table: true,
            seed: Some(4),
        });
        let mut timid = Timid;
        // Against single takes from 10, perfect play wins from either side
        let mut duel: Duel<'_, Nim> = Duel::new(&mut perfect, &mut timid, 20);
        let tally = duel.run(&Nim::new(10)).unwrap();
        assert_eq!(tally.losses, 0);
        assert!(tally.is_decided());
        assert!(tally.games() < 20);
    }

    #[test]
    fn test_ply_cap_draws_long_games() {
        let mut a = Timid;
        let mut b = Timid;
        let mut duel: Duel<'_, Nim> = Duel::new(&mut a, &mut b, 4).with_max_plies(5);
        let tally = duel.run(&Nim::new(20)).unwrap();
        assert_eq!(
            tally,
            Tally {
                wins: 0,
                losses: 0,
                draws: 4
            }
        );
        assert!(!tally.is_decided());
    }
}
