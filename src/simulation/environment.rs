use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::simulation::error::{LocalizationError, Result};
use crate::simulation::params::{MAZE_COLUMNS, MAZE_OBSTACLES, MAZE_ROWS};
use crate::simulation::sensor::SensorReading;

/// A grid cell addressed as (column, row). Row 0 is the northern edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub col: usize,
    pub row: usize,
}

impl Coordinate {
    #[must_use]
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Applies the unit offset of `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// The upper bounds are the topology's business.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (d_col, d_row) = direction.offset();
        let col = self.col.checked_add_signed(d_col)?;
        let row = self.row.checked_add_signed(d_row)?;
        Some(Self { col, row })
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((col, row): (usize, usize)) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Compass moves available to the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All directions, in sensor bit order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// (column, row) delta of a single step.
    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

/// Static description of the world the agent lives in.
///
/// Occupiable cells are enumerated row-major at construction, and that
/// order is the state index used by every vector and matrix in the model.
#[derive(Clone, Debug)]
pub struct GridTopology {
    columns: usize,
    rows: usize,
    obstacles: HashSet<Coordinate>,
    occupiable: Vec<Coordinate>,
    index: HashMap<Coordinate, usize>,
    ground_truth: Vec<SensorReading>,
}

impl GridTopology {
    /// Builds a topology, validating dimensions and obstacle bounds.
    ///
    /// Duplicate obstacles collapse into one.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero, an obstacle lies outside
    /// the grid, or obstacles cover every cell.
    pub fn new<I>(columns: usize, rows: usize, obstacles: I) -> Result<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        if columns == 0 || rows == 0 {
            return Err(LocalizationError::EmptyGrid { columns, rows });
        }

        let mut obstacle_set = HashSet::new();
        for coord in obstacles {
            if coord.col >= columns || coord.row >= rows {
                return Err(LocalizationError::ObstacleOutOfBounds(coord));
            }
            obstacle_set.insert(coord);
        }

        let mut topology = Self {
            columns,
            rows,
            obstacles: obstacle_set,
            occupiable: Vec::new(),
            index: HashMap::new(),
            ground_truth: Vec::new(),
        };

        for row in 0..rows {
            for col in 0..columns {
                let coord = Coordinate::new(col, row);
                if !topology.has_obstacle(coord) {
                    topology.index.insert(coord, topology.occupiable.len());
                    topology.occupiable.push(coord);
                }
            }
        }

        if topology.occupiable.is_empty() {
            return Err(LocalizationError::NoOccupiableCells);
        }

        topology.ground_truth = topology
            .occupiable
            .iter()
            .map(|&coord| topology.compute_reading(coord))
            .collect();

        debug!(
            columns,
            rows,
            obstacles = topology.obstacles.len(),
            states = topology.occupiable.len(),
            "built grid topology"
        );

        Ok(topology)
    }

    /// The 16x4 reference maze.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the layout is a compile-time constant.
    pub fn reference_maze() -> Result<Self> {
        Self::new(
            MAZE_COLUMNS,
            MAZE_ROWS,
            MAZE_OBSTACLES.iter().map(|&cell| Coordinate::from(cell)),
        )
    }

    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    pub fn obstacles(&self) -> impl Iterator<Item = &Coordinate> {
        self.obstacles.iter()
    }

    /// Non-obstacle cells in canonical state order.
    #[must_use]
    pub fn occupiable_coordinates(&self) -> &[Coordinate] {
        &self.occupiable
    }

    /// Number of HMM states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.occupiable.len()
    }

    /// State index of an occupiable cell.
    #[must_use]
    pub fn state_index(&self, coord: Coordinate) -> Option<usize> {
        self.index.get(&coord).copied()
    }

    /// Bounds are not checked; an out-of-bounds cell is simply not an obstacle.
    #[must_use]
    pub fn has_obstacle(&self, coord: Coordinate) -> bool {
        self.obstacles.contains(&coord)
    }

    #[must_use]
    pub const fn in_bounds(&self, coord: Coordinate) -> bool {
        coord.col < self.columns && coord.row < self.rows
    }

    #[must_use]
    pub fn is_occupiable(&self, coord: Coordinate) -> bool {
        self.in_bounds(coord) && !self.has_obstacle(coord)
    }

    /// Open 4-connected neighbors, in north, south, east, west order.
    #[must_use]
    pub fn neighbors(&self, coord: Coordinate) -> Vec<Coordinate> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| coord.step(direction))
            .filter(|&candidate| self.is_occupiable(candidate))
            .collect()
    }

    /// Noise-free sensor signature of a cell: a side is blocked when the
    /// neighbor in that direction is off the grid or an obstacle.
    #[must_use]
    pub fn ground_truth_reading(&self, coord: Coordinate) -> SensorReading {
        match self.state_index(coord) {
            Some(i) => self.ground_truth[i],
            None => self.compute_reading(coord),
        }
    }

    /// Ground-truth readings of every state, in canonical order.
    #[must_use]
    pub fn ground_truth_readings(&self) -> &[SensorReading] {
        &self.ground_truth
    }

    fn compute_reading(&self, coord: Coordinate) -> SensorReading {
        let blocked = |direction: Direction| {
            coord
                .step(direction)
                .is_none_or(|neighbor| !self.is_occupiable(neighbor))
        };
        SensorReading {
            north: blocked(Direction::North),
            south: blocked(Direction::South),
            east: blocked(Direction::East),
            west: blocked(Direction::West),
        }
    }
}
