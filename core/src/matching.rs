use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// A run has to be at least this long, origin included, to be cleared.
pub const MIN_MATCH: usize = 3;

/// Cells visited by [`find_run`], origin excluded, in walking order.
pub type Run = SmallVec<[Coord2; 8]>;

/// Walks from `origin` in `direction` while cells hold the origin's symbol.
///
/// The origin itself is never part of the result. An empty origin yields an
/// empty run, as does an immediate mismatch or the board edge.
pub fn find_run(grid: &Grid, origin: Coord2, direction: Direction) -> Result<Run> {
    let origin = grid.validate_coords(origin)?;
    let mut run = Run::new();

    let Some(symbol) = grid[origin].symbol() else {
        return Ok(run);
    };

    let mut current = origin;
    while let Some(next) = direction.step(current, grid.size()) {
        if grid[next].symbol() != Some(symbol) {
            break;
        }
        run.push(next);
        current = next;
    }

    Ok(run)
}

/// What a successful [`evaluate_cell`] cleared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub origin: Coord2,
    pub symbol: Symbol,
    /// Every cleared cell exactly once, the origin first.
    pub cleared: Vec<Coord2>,
    pub horizontal: bool,
    pub vertical: bool,
}

/// Collects the cells of the axis through `origin` that `first` and its opposite walk over.
fn axis_cells(grid: &Grid, origin: Coord2, first: Direction) -> Result<Run> {
    let mut cells = find_run(grid, origin, first)?;
    cells.extend(find_run(grid, origin, first.opposite())?);
    Ok(cells)
}

/// Clears every axis through `origin` that forms a run of at least [`MIN_MATCH`].
///
/// Returns `None` and leaves the grid untouched when neither axis qualifies.
pub fn evaluate_cell(grid: &mut Grid, origin: Coord2) -> Result<Option<MatchReport>> {
    let origin = grid.validate_coords(origin)?;
    let Some(symbol) = grid[origin].symbol() else {
        return Ok(None);
    };

    let horizontal = axis_cells(grid, origin, Direction::Left)?;
    let vertical = axis_cells(grid, origin, Direction::Up)?;

    let horizontal_counts = horizontal.len() + 1 >= MIN_MATCH;
    let vertical_counts = vertical.len() + 1 >= MIN_MATCH;
    if !horizontal_counts && !vertical_counts {
        return Ok(None);
    }

    let mut cleared = Vec::with_capacity(1 + horizontal.len() + vertical.len());
    cleared.push(origin);
    if horizontal_counts {
        cleared.extend(horizontal);
    }
    if vertical_counts {
        cleared.extend(vertical);
    }

    for &coords in &cleared {
        grid.set(coords, Cell::Empty)?;
    }

    log::debug!(
        "Cleared {} cells of {} through {:?} (horizontal: {}, vertical: {})",
        cleared.len(),
        symbol,
        origin,
        horizontal_counts,
        vertical_counts
    );

    Ok(Some(MatchReport {
        origin,
        symbol,
        cleared,
        horizontal: horizontal_counts,
        vertical: vertical_counts,
    }))
}
