//! Iterative-deepening negamax with alpha-beta pruning and a transposition table.
//!
//! The search runs depth 1, 2, 3, ... against a wall-clock budget and returns
//! the best move of the last depth that finished. A depth interrupted by the
//! timer is thrown away whole.
//!
//! The timer is polled once per node. An interrupted node reports
//! `completed == false`, is never written to the table, and makes every
//! ancestor incomplete as well.

use log::{debug, info, warn};

use crate::constants::{INF, MAX_DEPTH, MAX_SECONDS};
use crate::error::{Error, Result};
use crate::game::{GameState, Snapshot, Strategy};
use crate::timer::Timer;
use crate::tt::{Bound, TranspositionTable, TtEntry};

/// Minimax tuning.
#[derive(Clone, Debug)]
pub struct MinimaxConfig {
    /// Wall-clock budget per move.
    pub max_seconds: f64,
    /// Deepest iteration attempted.
    pub max_depth: u32,
    pub use_transposition_table: bool,
    /// Seed for the random fallback move; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            max_seconds: MAX_SECONDS,
            max_depth: MAX_DEPTH,
            use_transposition_table: true,
            seed: None,
        }
    }
}

/// Outcome of one `search` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult<M> {
    /// Value for the player to move. Meaningless when not completed.
    pub value: i32,
    pub best_move: Option<M>,
    /// False if the timer interrupted this subtree.
    pub completed: bool,
}

impl<M> SearchResult<M> {
    fn aborted() -> Self {
        Self {
            value: 0,
            best_move: None,
            completed: false,
        }
    }
}

/// Counters for the most recent move decision.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub leafs: u64,
    pub beta_cuts: u64,
    /// Sum over beta cuts of how many moves were tried before the cut.
    pub cut_bf_sum: u64,
    pub tt_hits: u64,
    pub tt_exacts: u64,
    pub tt_cuts: u64,
    /// Deepest iteration that completed.
    pub depth: u32,
}

impl SearchStats {
    /// Average number of moves examined at nodes that produced a beta cut.
    pub fn mean_cut_branching(&self) -> f64 {
        if self.beta_cuts == 0 {
            0.0
        } else {
            self.cut_bf_sum as f64 / self.beta_cuts as f64
        }
    }
}

/// Alpha-beta searcher. Owns its transposition table between moves.
pub struct Minimax<S: GameState> {
    config: MinimaxConfig,
    tt: TranspositionTable<S::Move>,
    stats: SearchStats,
    rng: fastrand::Rng,
}

impl<S: GameState> Minimax<S> {
    pub fn new(config: MinimaxConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            config,
            tt: TranspositionTable::new(),
            stats: SearchStats::default(),
            rng,
        }
    }

    pub fn config(&self) -> &MinimaxConfig {
        &self.config
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Number of positions currently cached.
    pub fn table_len(&self) -> usize {
        self.tt.len()
    }

    /// Negamax search of `state` to `depth` plies inside the `(alpha, beta)` window.
    ///
    /// `state` is mutated while searching and restored before returning.
    ///
    /// # Panics
    /// If a non-terminal position has no legal moves.
    pub fn search(
        &mut self,
        state: &mut S,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        timer: &Timer,
    ) -> SearchResult<S::Move> {
        if timer.exceeded() {
            return SearchResult::aborted();
        }
        self.stats.nodes += 1;

        if depth == 0 || state.is_terminal() {
            self.stats.leafs += 1;
            return SearchResult {
                value: state.evaluate(),
                best_move: None,
                completed: true,
            };
        }

        let hash = state.position_hash();
        if self.config.use_transposition_table {
            if let Some(entry) = self.tt.probe(hash) {
                if entry.depth >= depth {
                    self.stats.tt_hits += 1;
                    match entry.bound {
                        Bound::Exact => {
                            self.stats.tt_exacts += 1;
                            return SearchResult {
                                value: entry.value,
                                best_move: entry.best_move,
                                completed: true,
                            };
                        }
                        Bound::Lower => alpha = alpha.max(entry.value),
                        Bound::Upper => beta = beta.min(entry.value),
                    }
                    if alpha >= beta {
                        self.stats.tt_cuts += 1;
                        return SearchResult {
                            value: entry.value,
                            best_move: entry.best_move,
                            completed: true,
                        };
                    }
                }
            }
        }
        let window_alpha = alpha;

        let moves = state.legal_moves();
        assert!(!moves.is_empty(), "non-terminal position has no legal moves");

        let mut best = -INF;
        let mut best_move = None;
        let mut completed = true;
        for (tried, &mv) in moves.iter().enumerate() {
            let child = {
                let mut trial = Snapshot::new(&mut *state);
                trial.apply(mv);
                self.search(&mut trial, depth - 1, -beta, -alpha, timer)
            };
            if !child.completed {
                completed = false;
                break;
            }

            let value = -child.value;
            if best_move.is_none() || value > best {
                best = value;
                best_move = Some(mv);
            }
            if best >= beta {
                self.stats.beta_cuts += 1;
                self.stats.cut_bf_sum += tried as u64 + 1;
                break;
            }
            alpha = alpha.max(best);
        }

        if completed && self.config.use_transposition_table {
            self.tt
                .store(hash, TtEntry::classify(best, window_alpha, beta, depth, best_move));
        }
        if best_move.is_none() {
            best_move = Some(moves[self.rng.usize(..moves.len())]);
        }

        SearchResult {
            value: best,
            best_move,
            completed,
        }
    }

    fn random_move(&mut self, state: &S) -> S::Move {
        let moves = state.legal_moves();
        assert!(!moves.is_empty(), "non-terminal position has no legal moves");
        moves[self.rng.usize(..moves.len())]
    }
}

impl<S: GameState> Strategy<S> for Minimax<S> {
    fn get_move(&mut self, state: &S) -> Result<S::Move> {
        if state.is_terminal() {
            return Err(Error::TerminalPosition);
        }

        let timer = Timer::start(self.config.max_seconds);
        self.stats = SearchStats::default();
        let mut work = state.clone();
        let mut chosen = None;

        for depth in 1..=self.config.max_depth {
            let result = self.search(&mut work, depth, -INF, INF, &timer);
            if !result.completed {
                debug!("depth {depth} interrupted after {timer}");
                break;
            }
            chosen = result.best_move;
            self.stats.depth = depth;
            let s = &self.stats;
            info!(
                "depth {depth}: value {} in {timer}, move {:?}, nodes {} leafs {} cuts {} (bf {:.2}), \
                 tt hits {} exacts {} cuts {} size {}",
                result.value,
                result.best_move,
                s.nodes,
                s.leafs,
                s.beta_cuts,
                s.mean_cut_branching(),
                s.tt_hits,
                s.tt_exacts,
                s.tt_cuts,
                self.tt.len()
            );
            if result.value == INF || result.value == -INF || timer.exceeded() {
                break;
            }
        }

        let elapsed = timer.seconds_elapsed();
        if elapsed > 0.0 {
            debug!(
                "{:.0} nodes/s, mean cut branching {:.2}",
                self.stats.nodes as f64 / elapsed,
                self.stats.mean_cut_branching()
            );
        }

        match chosen {
            Some(mv) => Ok(mv),
            None => {
                warn!("no search depth completed within {timer}; playing a random move");
                Ok(self.random_move(state))
            }
        }
    }

    fn reset(&mut self) {
        self.tt.clear();
        self.stats = SearchStats::default();
    }

    fn name(&self) -> &'static str {
        "minimax"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Player;

    /// Fixed two-ply tree: the mover picks a branch, the opponent picks a leaf.
    #[derive(Clone, PartialEq, Debug)]
    struct Tree {
        path: Vec<usize>,
        to_move: Player,
    }

    const LEAVES: [[i32; 2]; 3] = [[3, 12], [2, 4], [14, 1]];

    impl GameState for Tree {
        type Move = usize;

        fn player_to_move(&self) -> Player {
            self.to_move
        }
        fn set_player_to_move(&mut self, player: Player) {
            self.to_move = player;
        }
        fn legal_moves(&self) -> Vec<usize> {
            match self.path.len() {
                0 => vec![0, 1, 2],
                1 => vec![0, 1],
                _ => vec![],
            }
        }
        fn apply(&mut self, mv: usize) {
            self.path.push(mv);
            self.to_move = self.to_move.opponent();
        }
        fn is_terminal(&self) -> bool {
            self.path.len() == 2
        }
        fn winner(&self) -> Option<Player> {
            None
        }
        fn evaluate(&self) -> i32 {
            // Leaf values are for the root mover, who is to move again at depth 2
            match self.path[..] {
                [a, b] => LEAVES[a][b],
                _ => 0,
            }
        }
        fn position_hash(&self) -> u64 {
            self.path.iter().fold(7, |h, &m| h * 31 + m as u64 + 1)
        }
    }

    fn root() -> Tree {
        Tree {
            path: vec![],
            to_move: Player::One,
        }
    }

    fn unlimited(tt: bool) -> MinimaxConfig {
        MinimaxConfig {
            max_seconds: f64::INFINITY,
            max_depth: 2,
            use_transposition_table: tt,
            seed: Some(1),
        }
    }

    #[test]
    fn test_search_picks_maximin_branch() {
        let mut mm = Minimax::new(unlimited(false));
        let timer = Timer::start(f64::INFINITY);
        let result = mm.search(&mut root(), 2, -INF, INF, &timer);
        assert!(result.completed);
        // Branch minima are 3, 2, 1
        assert_eq!(result.value, 3);
        assert_eq!(result.best_move, Some(0));
    }

    #[test]
    fn test_alpha_beta_prunes() {
        let mut mm = Minimax::new(unlimited(false));
        let timer = Timer::start(f64::INFINITY);
        mm.search(&mut root(), 2, -INF, INF, &timer);
        // Branch 1 is refuted by its first leaf, so it cuts
        assert!(mm.stats().beta_cuts >= 1);
        assert!(mm.stats().leafs < 6);
    }

    #[test]
    fn test_search_restores_state() {
        let mut mm = Minimax::new(unlimited(true));
        let timer = Timer::start(f64::INFINITY);
        let mut state = root();
        mm.search(&mut state, 2, -INF, INF, &timer);
        assert_eq!(state, root());
    }

    #[test]
    fn test_expired_timer_is_incomplete_and_uncached() {
        let mut mm = Minimax::new(unlimited(true));
        let timer = Timer::start(0.0);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let result = mm.search(&mut root(), 2, -INF, INF, &timer);
        assert!(!result.completed);
        assert_eq!(mm.table_len(), 0);
    }

    /// `Tree` whose moves take `SLOW_APPLY` to play, and whose depth-1
    /// values favor a different branch than the full two-ply search.
    #[derive(Clone, PartialEq, Debug)]
    struct SlowTree(Tree);

    const SLOW_APPLY: std::time::Duration = std::time::Duration::from_millis(50);

    /// Values after one ply, for the opponent to move.
    const SHALLOW: [i32; 3] = [5, 5, -9];

    impl GameState for SlowTree {
        type Move = usize;

        fn player_to_move(&self) -> Player {
            self.0.player_to_move()
        }
        fn set_player_to_move(&mut self, player: Player) {
            self.0.set_player_to_move(player);
        }
        fn legal_moves(&self) -> Vec<usize> {
            self.0.legal_moves()
        }
        fn apply(&mut self, mv: usize) {
            std::thread::sleep(SLOW_APPLY);
            self.0.apply(mv);
        }
        fn is_terminal(&self) -> bool {
            self.0.is_terminal()
        }
        fn winner(&self) -> Option<Player> {
            None
        }
        fn evaluate(&self) -> i32 {
            match self.0.path[..] {
                [a] => SHALLOW[a],
                _ => self.0.evaluate(),
            }
        }
        fn position_hash(&self) -> u64 {
            self.0.position_hash()
        }
    }

    #[test]
    fn test_interrupted_depth_is_discarded() {
        let start = SlowTree(root());
        // Depth 1 plays three moves (150ms); depth 2 reaches its first
        // grandchild only after five (250ms)
        let mut mm = Minimax::new(MinimaxConfig {
            max_seconds: 0.23,
            max_depth: 2,
            use_transposition_table: true,
            seed: Some(1),
        });

        let mv = mm.get_move(&start).unwrap();
        assert_eq!(mm.stats().depth, 1);
        // Depth 1 sees branch values -5, -5, 9; two plies would pick branch 0
        assert_eq!(mv, 2);

        let entry = mm.tt.probe(start.position_hash()).unwrap();
        assert_eq!(entry.depth, 1);
        assert_eq!(entry.best_move, Some(2));
        // Nothing below the root was finished at depth 2 either
        let mut first = root();
        first.apply(0);
        assert!(mm.tt.probe(first.position_hash()).is_none());
    }

    #[test]
    fn test_table_fills_and_resets() {
        let mut mm = Minimax::new(unlimited(true));
        let mv = mm.get_move(&root()).unwrap();
        assert_eq!(mv, 0);
        assert!(mm.table_len() > 0);
        assert_eq!(mm.stats().depth, 2);
        mm.reset();
        assert_eq!(mm.table_len(), 0);
    }

    #[test]
    fn test_zero_budget_falls_back_to_legal_move() {
        let mut mm = Minimax::new(MinimaxConfig {
            max_seconds: 0.0,
            ..unlimited(true)
        });
        let mv = mm.get_move(&root()).unwrap();
        assert!(mv < 3);
    }
}
