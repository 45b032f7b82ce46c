use crate::simulation::environment::{Coordinate, GridTopology};
use crate::simulation::inference::BeliefState;
use rayon::prelude::*;

/// Shading from no belief mass to the current peak.
pub const SHADES: [char; 9] = [' ', '.', ':', '-', '=', '+', '*', '%', '@'];
pub const OBSTACLE: char = '#';
pub const AGENT: char = 'O';
/// Terminal columns per grid cell.
pub const CELL_WIDTH: usize = 3;

/// Renders belief mass as one text line per grid row.
///
/// Shading is relative to the most probable cell so that a diffuse belief
/// is still visible.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn compute_belief_grid(topology: &GridTopology, belief: &BeliefState) -> Vec<String> {
    let peak = belief.probabilities().max_entry();

    (0..topology.rows())
        .into_par_iter()
        .map(|row| {
            let mut line = String::with_capacity(topology.columns() * CELL_WIDTH);
            for col in 0..topology.columns() {
                let coord = Coordinate::new(col, row);
                let glyph = if topology.has_obstacle(coord) {
                    OBSTACLE
                } else {
                    let p = topology
                        .state_index(coord)
                        .and_then(|i| belief.probability(i))
                        .unwrap_or(0.0);
                    let scaled = if peak > 0.0 { p / peak } else { 0.0 };
                    let idx = (scaled * (SHADES.len() - 1) as f64).round() as usize;
                    SHADES[idx.min(SHADES.len() - 1)]
                };
                for _ in 0..CELL_WIDTH {
                    line.push(glyph);
                }
            }
            line
        })
        .collect()
}

/// Key to the glyphs used by [`compute_belief_grid`] and [`overlay_agent`].
#[must_use]
pub fn legend() -> String {
    let scale: String = SHADES[1..].iter().collect();
    format!(" low {scale} peak | {OBSTACLE} wall | {AGENT} agent ")
}

/// Marks the agent's true position in a grid produced by [`compute_belief_grid`].
pub fn overlay_agent(grid: &mut [String], position: Coordinate) {
    let Some(line) = grid.get_mut(position.row) else {
        return;
    };
    let c = position.col * CELL_WIDTH + CELL_WIDTH / 2;
    if c < line.len() && line.is_char_boundary(c) && line.is_char_boundary(c + 1) {
        line.replace_range(c..=c, &AGENT.to_string());
    }
}
