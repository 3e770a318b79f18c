//! Monte Carlo Tree Search with UCT selection.
//!
//! Each simulation:
//! - descends from the root, always taking an immediately winning move when
//!   the node has one, otherwise expanding the first untried move, otherwise
//!   following the child with the best UCT score;
//! - plays the new leaf out with [`rollout`];
//! - adds the result, scored for the root's player, to every node on the way
//!   back up.
//!
//! The tree is an arena: nodes live in one `Vec` and refer to their parent and
//! children by index. After the budget runs out the most visited root child
//! is played.

use log::debug;
use rustc_hash::FxHashMap;

use crate::constants::{MAX_SECONDS, MAX_SIMULATIONS, UCT_C};
use crate::error::{Error, Result};
use crate::game::{GameState, Player, Strategy};
use crate::playout::{rollout, winning_move};
use crate::timer::Timer;

/// MCTS tuning.
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Wall-clock budget per move.
    pub max_seconds: f64,
    /// Simulation cap per move.
    pub max_simulations: usize,
    /// Let rollouts block the opponent's immediate wins.
    pub block: bool,
    /// Seed for rollouts; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            max_seconds: MAX_SECONDS,
            max_simulations: MAX_SIMULATIONS,
            block: true,
            seed: None,
        }
    }
}

/// A node in the search tree.
pub struct Node<S: GameState> {
    pub state: S,
    pub parent: Option<usize>,
    /// Move that led here from the parent.
    pub mv: Option<S::Move>,
    pub children: FxHashMap<S::Move, usize>,
    /// Moves not yet expanded, best-first from the back.
    untried: Vec<S::Move>,
    /// Cached answer to "does the mover here have an immediate win?".
    winning: Option<Option<S::Move>>,
    pub visits: u32,
    /// Sum of simulation results, scored for the root's player.
    pub score: f64,
}

impl<S: GameState> Node<S> {
    fn new(state: S, parent: Option<usize>, mv: Option<S::Move>) -> Self {
        let mut untried = state.legal_moves();
        untried.reverse();
        Self {
            state,
            parent,
            mv,
            children: FxHashMap::default(),
            untried,
            winning: None,
            visits: 0,
            score: 0.0,
        }
    }

    /// Average result for the root's player, 0 before the first visit.
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits > 0 {
            self.score / self.visits as f64
        } else {
            0.0
        }
    }
}

/// Monte Carlo tree searcher.
pub struct MonteCarloTreeSearch<S: GameState> {
    config: MctsConfig,
    nodes: Vec<Node<S>>,
    root_player: Player,
    simulations: usize,
    rng: fastrand::Rng,
}

impl<S: GameState> MonteCarloTreeSearch<S> {
    pub fn new(config: MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            config,
            nodes: Vec::new(),
            root_player: Player::One,
            simulations: 0,
            rng,
        }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Simulations run for the last move.
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    /// The tree built for the last move; index 0 is the root.
    pub fn nodes(&self) -> &[Node<S>] {
        &self.nodes
    }

    /// Grow the tree from `state` until a budget runs out.
    pub fn search(&mut self, state: &S) {
        let timer = Timer::start(self.config.max_seconds);
        self.nodes.clear();
        self.nodes.push(Node::new(state.clone(), None, None));
        self.root_player = state.player_to_move();
        self.simulations = 0;

        while self.simulations < self.config.max_simulations && !timer.exceeded() {
            let leaf = self.select_and_expand();
            let result = rollout(
                self.nodes[leaf].state.clone(),
                self.root_player,
                self.config.block,
                &mut self.rng,
                &timer,
            );
            self.backpropagate(leaf, result);
            self.simulations += 1;
        }

        debug!("{} simulations, {} nodes in {timer}", self.simulations, self.nodes.len());
    }

    /// Tree policy: walk down to a node to simulate from, expanding one child.
    fn select_and_expand(&mut self) -> usize {
        let mut id = 0;
        loop {
            if self.nodes[id].state.is_terminal() {
                return id;
            }

            if let Some(mv) = self.winning_move_at(id) {
                return match self.nodes[id].children.get(&mv) {
                    Some(&child) => child,
                    None => {
                        self.nodes[id].untried.retain(|&m| m != mv);
                        self.expand(id, mv)
                    }
                };
            }

            if let Some(mv) = self.nodes[id].untried.pop() {
                return self.expand(id, mv);
            }

            match self.best_uct_child(id) {
                Some(child) => id = child,
                // No moves and no winner: simulate from here
                None => return id,
            }
        }
    }

    fn winning_move_at(&mut self, id: usize) -> Option<S::Move> {
        let node = &mut self.nodes[id];
        if let Some(cached) = node.winning {
            return cached;
        }
        let found = winning_move(&mut node.state);
        node.winning = Some(found);
        found
    }

    fn expand(&mut self, parent: usize, mv: S::Move) -> usize {
        let mut state = self.nodes[parent].state.clone();
        state.apply(mv);
        let id = self.nodes.len();
        self.nodes.push(Node::new(state, Some(parent), Some(mv)));
        self.nodes[parent].children.insert(mv, id);
        id
    }

    /// UCT score of `child` seen from the player choosing at its parent.
    fn uct(&self, parent: usize, child: usize) -> f64 {
        let p = &self.nodes[parent];
        let c = &self.nodes[child];
        let exploit = if p.state.player_to_move() == self.root_player {
            c.mean()
        } else {
            1.0 - c.mean()
        };
        let explore = UCT_C * ((p.visits as f64).ln() / c.visits as f64).sqrt();
        exploit + explore
    }

    fn best_uct_child(&self, id: usize) -> Option<usize> {
        self.nodes[id]
            .children
            .values()
            .copied()
            .max_by(|&a, &b| {
                self.uct(id, a)
                    .partial_cmp(&self.uct(id, b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    fn backpropagate(&mut self, leaf: usize, result: f64) {
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            let node = &mut self.nodes[id];
            node.visits += 1;
            node.score += result;
            cursor = node.parent;
        }
    }

    /// Most visited root child's move.
    fn best_root_move(&self) -> Option<S::Move> {
        let root = self.nodes.first()?;
        root.children
            .iter()
            .max_by_key(|&(_, &child)| self.nodes[child].visits)
            .map(|(&mv, _)| mv)
    }

    /// Log statistics for every root child.
    pub fn dump_children(&self) {
        let Some(root) = self.nodes.first() else {
            return;
        };
        for &child in root.children.values() {
            let node = &self.nodes[child];
            debug!(
                "move {:?} score {:.1} visits {} mean {:.3} uct {:.3}",
                node.mv,
                node.score,
                node.visits,
                node.mean(),
                self.uct(0, child)
            );
        }
    }
}

impl<S: GameState> Strategy<S> for MonteCarloTreeSearch<S> {
    fn get_move(&mut self, state: &S) -> Result<S::Move> {
        if state.is_terminal() {
            return Err(Error::TerminalPosition);
        }
        self.search(state);
        self.dump_children();

        if let Some(mv) = self.best_root_move() {
            return Ok(mv);
        }
        // The budget ran out before the first simulation
        let moves = state.legal_moves();
        assert!(!moves.is_empty(), "non-terminal position has no legal moves");
        Ok(moves[0])
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.simulations = 0;
    }

    fn name(&self) -> &'static str {
        "mcts"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::mock::Nim;

    fn config(sims: usize, seed: u64) -> MctsConfig {
        MctsConfig {
            max_seconds: f64::INFINITY,
            max_simulations: sims,
            block: true,
            seed: Some(seed),
        }
    }

    #[test]
    fn test_arena_links() {
        let mut mcts = MonteCarloTreeSearch::new(config(200, 1));
        mcts.search(&Nim::new(7));
        assert_eq!(mcts.simulations(), 200);

        let nodes = mcts.nodes();
        assert_eq!(nodes[0].parent, None);
        assert_eq!(nodes[0].visits, 200);
        for (id, node) in nodes.iter().enumerate().skip(1) {
            let parent = node.parent.unwrap();
            assert!(parent < id);
            assert_eq!(nodes[parent].children[&node.mv.unwrap()], id);
        }
        // An inner node is simulated from once, when it is created
        for (id, node) in nodes.iter().enumerate() {
            if node.state.is_terminal() {
                continue;
            }
            let below: u32 = node.children.values().map(|&c| nodes[c].visits).sum();
            let own = if id == 0 { 0 } else { 1 };
            assert_eq!(node.visits, below + own);
        }
    }

    #[test]
    fn test_scores_stay_in_unit_range() {
        let mut mcts = MonteCarloTreeSearch::new(config(300, 5));
        mcts.search(&Nim::new(9));
        for node in mcts.nodes() {
            assert!((0.0..=1.0).contains(&node.mean()));
        }
    }

    #[test]
    fn test_winning_child_expanded_once() {
        let mut mcts = MonteCarloTreeSearch::new(config(50, 2));
        mcts.search(&Nim::new(3));
        let root = &mcts.nodes()[0];
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[&3], 1);
        assert_eq!(mcts.nodes()[1].visits, 50);
    }

    #[test]
    fn test_terminal_state_is_an_error() {
        let mut mcts = MonteCarloTreeSearch::new(config(10, 0));
        assert!(matches!(
            mcts.get_move(&Nim::new(0)),
            Err(Error::TerminalPosition)
        ));
    }
}
