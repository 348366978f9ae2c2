use alloc::vec::Vec;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// A tile that fell from row `from` to row `to` within `column`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileShift {
    pub column: Coord,
    pub from: Coord,
    pub to: Coord,
}

/// A new tile placed into an emptied cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpawn {
    pub coords: Coord2,
    pub symbol: Symbol,
}

/// Ordered deltas of one collapse pass, for a presentation layer to replay.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollapseReport {
    pub shifts: Vec<TileShift>,
    pub spawns: Vec<TileSpawn>,
    /// How many cells each column had to refill, indexed by `x`.
    pub refilled_per_column: Vec<CellCount>,
}

impl CollapseReport {
    pub fn refilled(&self) -> usize {
        self.spawns.len()
    }

    pub fn is_noop(&self) -> bool {
        self.shifts.is_empty() && self.spawns.is_empty()
    }
}

/// Pushes the filled cells of column `x` down onto the lowest rows.
///
/// Relative order is kept and empties end up at the top. Shifts are reported
/// bottom-most first.
pub fn collapse_column(grid: &mut Grid, x: Coord) -> Result<Vec<TileShift>> {
    grid.validate_coords((x, 0))?;
    let mut shifts = Vec::new();
    let mut write: Coord = 0;

    for read in 0..grid.height() {
        let cell = grid[(x, read)];
        if cell.is_empty() {
            continue;
        }
        if read != write {
            grid.set((x, write), cell)?;
            grid.set((x, read), Cell::Empty)?;
            log::trace!("Shift column {} from row {} to row {}", x, read, write);
            shifts.push(TileShift {
                column: x,
                from: read,
                to: write,
            });
        }
        write += 1;
    }

    Ok(shifts)
}

/// Symbols placed left, right and below `coords`, when those cells exist and are filled.
fn refill_exclusions(grid: &Grid, coords: Coord2) -> SmallVec<[Symbol; 3]> {
    [Direction::Left, Direction::Right, Direction::Down]
        .into_iter()
        .filter_map(|direction| direction.step(coords, grid.size()))
        .filter_map(|neighbor| grid[neighbor].symbol())
        .collect()
}

/// Fills every empty cell of column `x`, bottom to top.
///
/// Each pick avoids the symbols directly left, right and below. This is a
/// best-effort guard against fresh matches, not a guarantee.
pub fn refill_column<R: Rng>(
    grid: &mut Grid,
    x: Coord,
    alphabet: Alphabet,
    rng: &mut R,
) -> Result<Vec<TileSpawn>> {
    grid.validate_coords((x, 0))?;
    let mut spawns = Vec::new();

    for y in 0..grid.height() {
        let coords = (x, y);
        if !grid[coords].is_empty() {
            continue;
        }

        let excluded = refill_exclusions(grid, coords);
        let symbol = match alphabet.pick_excluding(rng, &excluded) {
            Some(symbol) => symbol,
            None => {
                log::warn!(
                    "No symbol avoids all neighbors of {:?}, only avoiding the one below",
                    coords
                );
                let below: SmallVec<[Symbol; 1]> = Direction::Down
                    .step(coords, grid.size())
                    .and_then(|below| grid[below].symbol())
                    .into_iter()
                    .collect();
                alphabet
                    .pick_excluding(rng, &below)
                    .ok_or(GameError::AlphabetTooSmall)?
            }
        };

        grid.set(coords, Cell::Filled(symbol))?;
        log::trace!("Spawn {} at {:?}", symbol, coords);
        spawns.push(TileSpawn { coords, symbol });
    }

    Ok(spawns)
}

/// Compacts and then refills every column, left to right.
///
/// Matches formed by the settled or spawned tiles are left on the board.
pub fn collapse<R: Rng>(
    grid: &mut Grid,
    alphabet: Alphabet,
    rng: &mut R,
) -> Result<CollapseReport> {
    let mut report = CollapseReport::default();

    for x in 0..grid.width() {
        report.shifts.extend(collapse_column(grid, x)?);
        let spawns = refill_column(grid, x, alphabet, rng)?;
        report
            .refilled_per_column
            .push(spawns.len().try_into().unwrap_or(CellCount::MAX));
        report.spawns.extend(spawns);
    }

    if !report.is_noop() {
        log::debug!(
            "Collapse moved {} tiles and spawned {}",
            report.shifts.len(),
            report.spawns.len()
        );
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(42)
    }

    #[test]
    fn collapse_column_keeps_order_and_moves_empties_up() {
        let mut grid = grid(
            ".
             A
             .
             B
             .
             C",
        );

        let shifts = collapse_column(&mut grid, 0).unwrap();

        assert_eq!(grid.to_string(), ".\n.\n.\nA\nB\nC");
        assert_eq!(
            shifts,
            [
                TileShift { column: 0, from: 2, to: 1 },
                TileShift { column: 0, from: 4, to: 2 },
            ]
        );
    }

    #[test]
    fn collapse_column_on_full_or_settled_column_is_noop() {
        let mut full = grid("A\nB\nC");
        assert!(collapse_column(&mut full, 0).unwrap().is_empty());

        let mut settled = grid(".\n.\nA");
        assert!(collapse_column(&mut settled, 0).unwrap().is_empty());
        assert_eq!(settled.to_string(), ".\n.\nA");
    }

    #[test]
    fn collapse_column_rejects_missing_column() {
        let mut grid = grid("AB");
        assert_eq!(collapse_column(&mut grid, 2), Err(GameError::OutOfBounds));
    }

    #[test]
    fn refill_column_leaves_no_empty_cell_and_avoids_neighbors() {
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut grid = grid(
                "A.B
                 C.D
                 A.B
                 CAD",
            );

            let spawns = refill_column(&mut grid, 1, Alphabet::new(5), &mut rng).unwrap();

            assert_eq!(spawns.len(), 3);
            assert!(grid.is_full());
            for spawn in spawns {
                let (x, y) = spawn.coords;
                assert_ne!(grid[(x - 1, y)].symbol(), Some(spawn.symbol));
                assert_ne!(grid[(x + 1, y)].symbol(), Some(spawn.symbol));
                assert_ne!(grid[(x, y - 1)].symbol(), Some(spawn.symbol));
            }
        }
    }

    #[test]
    fn refill_with_three_symbols_falls_back_when_cornered() {
        let mut grid = grid(
            "A.B
             ACB",
        );

        let spawns = refill_column(&mut grid, 1, Alphabet::new(3), &mut rng()).unwrap();

        assert_eq!(spawns.len(), 1);
        assert_ne!(spawns[0].symbol, Symbol(2));
        assert!(grid.is_full());
    }

    #[test]
    fn collapse_compacts_then_refills_every_column() {
        let mut grid = grid(
            "ABCDA
             BCDAB
             C...C
             DA.CD
             ABADA",
        );

        let report = collapse(&mut grid, Alphabet::new(4), &mut rng()).unwrap();

        assert!(grid.is_full());
        assert_eq!(report.refilled_per_column, [0, 1, 2, 1, 0]);
        assert_eq!(report.refilled(), 4);
        // column 1: C and B fall by one, B and A below stay put
        assert_eq!(grid[(1, 1)], Cell::Filled(Symbol(0)));
        assert_eq!(grid[(1, 2)], Cell::Filled(Symbol(2)));
        assert_eq!(grid[(1, 3)], Cell::Filled(Symbol(1)));
        assert!(report.shifts.contains(&TileShift { column: 2, from: 3, to: 1 }));
    }

    #[test]
    fn collapse_twice_is_noop_the_second_time() {
        let mut grid = grid(
            "A.C
             ..D
             BAB",
        );
        let mut rng = rng();

        collapse(&mut grid, Alphabet::new(4), &mut rng).unwrap();
        let settled = grid.clone();
        let second = collapse(&mut grid, Alphabet::new(4), &mut rng).unwrap();

        assert!(second.is_noop());
        assert_eq!(grid, settled);
    }
}
