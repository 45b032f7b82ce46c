//! Simulation defaults.

pub const DEFAULT_ERROR_RATE: f64 = 0.2;
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;
pub const TICK_MILLIS: u64 = 50;
pub const HEADLESS_STEPS: u64 = 50;

/// Reference maze: 16 columns by 4 rows.
pub const MAZE_COLUMNS: usize = 16;
pub const MAZE_ROWS: usize = 4;

/// Obstacle cells of the reference maze as (column, row).
pub const MAZE_OBSTACLES: [(usize, usize); 22] = [
    (0, 1),
    (0, 2),
    (1, 1),
    (2, 3),
    (4, 0),
    (4, 1),
    (4, 2),
    (6, 1),
    (6, 2),
    (6, 3),
    (7, 1),
    (7, 2),
    (9, 1),
    (10, 0),
    (11, 1),
    (11, 3),
    (13, 1),
    (13, 2),
    (14, 0),
    (14, 1),
    (14, 2),
    (15, 1),
];
