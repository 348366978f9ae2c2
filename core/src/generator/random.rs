use rand::prelude::*;
use smallvec::SmallVec;

use super::*;

/// Fills the board column by column from the bottom-left corner, never
/// repeating the symbol directly left or directly below.
///
/// No two equal symbols end up adjacent, so the board starts without matches.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(self, config: &BoardConfig) -> Result<Grid> {
        config.validate()?;

        let alphabet = config.alphabet();
        let mut grid = Grid::new(config.size);
        let mut rng = SmallRng::seed_from_u64(self.seed);

        for coords in grid.iter_coords() {
            let excluded: SmallVec<[Symbol; 2]> = [Direction::Left, Direction::Down]
                .into_iter()
                .filter_map(|direction| direction.step(coords, grid.size()))
                .filter_map(|neighbor| grid[neighbor].symbol())
                .collect();

            let symbol = alphabet
                .pick_excluding(&mut rng, &excluded)
                .ok_or(GameError::AlphabetTooSmall)?;
            grid.set(coords, Cell::Filled(symbol))?;
        }

        log::debug!(
            "Generated {}x{} board with {} symbols, seed {}",
            config.size.0,
            config.size.1,
            config.symbols,
            self.seed
        );
        Ok(grid)
    }
}
