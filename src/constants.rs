//! Constants for grid geometry, cell ownership, and search parameters.
//!
//! The grid is stored row-major in a flat array of `CELLS` bytes. Row 0 is
//! player one's home edge and row `HEIGHT - 1` is player two's.

// =============================================================================
// Grid Geometry
// =============================================================================

/// Number of rows on the grid.
pub const HEIGHT: usize = 13;

/// Number of columns on the grid.
pub const WIDTH: usize = 10;

/// Total number of cells.
pub const CELLS: usize = HEIGHT * WIDTH;

/// Offsets (row, col) to the 4 orthogonal neighbors, claimed by a bomb.
pub const ORTHOGONAL: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Offsets (row, col) to all 8 neighbors.
/// Order: NW, N, NE, W, E, SW, S, SE. Word discovery visits neighbors in this order.
pub const ADJACENT: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// =============================================================================
// Cell Ownership (as bytes)
// =============================================================================

/// Nobody owns the cell.
pub const UNOWNED: u8 = 0;

/// Owned by player one (home edge is row 0).
pub const OWNER_ONE: u8 = 1;

/// Owned by player two (home edge is the last row).
pub const OWNER_TWO: u8 = 2;

/// Unclaimed bomb: claiming it also claims the 4 orthogonal neighbors.
pub const BOMB: u8 = 3;

/// Unclaimed mega-bomb: claiming it also claims all 8 neighbors.
pub const MEGABOMB: u8 = 4;

/// Transient marker set on cells reached by the connectivity sweep.
pub const VISITED: u8 = 0x8;

/// Mask recovering the owner from a visited cell.
pub const OWNER_MASK: u8 = 0x7;

// =============================================================================
// Search Parameters
// =============================================================================

/// Sentinel magnitude for won/lost positions and the initial alpha-beta window.
pub const INF: i32 = i32::MAX;

/// Default maximum iterative-deepening depth.
pub const MAX_DEPTH: u32 = 20;

/// Default wall-clock budget per move decision, in seconds.
pub const MAX_SECONDS: f64 = 3.0;

/// Default cap on MCTS simulations per move decision.
pub const MAX_SIMULATIONS: usize = 10_000_000;

/// UCT exploration constant.
pub const UCT_C: f64 = std::f64::consts::SQRT_2;

/// Rollout outcome for a win of the root's player.
pub const WIN_SCORE: f64 = 1.0;

/// Rollout outcome for a draw.
pub const DRAW_SCORE: f64 = 0.5;

/// Rollout outcome for a loss of the root's player.
pub const LOSE_SCORE: f64 = 0.0;

/// Initial capacity of the transposition table.
pub const TT_CAPACITY: usize = 1 << 20;
