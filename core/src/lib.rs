#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cell::*;
pub use collapse::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use generator::*;
pub use grid::*;
pub use matching::*;
pub use types::*;

mod cell;
mod collapse;
mod engine;
mod error;
mod events;
mod generator;
mod grid;
mod matching;
mod types;

/// Smallest alphabet that can always avoid placing two equal neighbors.
pub const MIN_ALPHABET: u8 = 3;

/// Largest alphabet with a letter for every symbol in the text form.
pub const MAX_ALPHABET: u8 = 26;

/// Whether settled tiles are re-checked for matches after a collapse.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadeMode {
    /// One clear and one collapse per swap, new runs wait for the next swap.
    #[default]
    Single,
    /// Keep clearing and collapsing until the board has no match left.
    Full,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub size: Coord2,
    pub symbols: u8,
    pub moves: u32,
    pub points_per_cell: u32,
    pub cascade: CascadeMode,
}

impl BoardConfig {
    pub const fn new_unchecked(size: Coord2, symbols: u8) -> Self {
        Self {
            size,
            symbols,
            moves: 60,
            points_per_cell: 50,
            cascade: CascadeMode::Single,
        }
    }

    pub fn new((size_x, size_y): Coord2, symbols: u8) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        Self::new_unchecked((size_x, size_y), symbols)
    }

    pub const fn with_moves(mut self, moves: u32) -> Self {
        self.moves = moves;
        self
    }

    pub const fn with_cascade(mut self, cascade: CascadeMode) -> Self {
        self.cascade = cascade;
        self
    }

    pub const fn alphabet(&self) -> Alphabet {
        Alphabet::new(self.symbols)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        if self.symbols < MIN_ALPHABET {
            return Err(GameError::AlphabetTooSmall);
        }
        if self.symbols > MAX_ALPHABET {
            return Err(GameError::AlphabetTooLarge);
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new_unchecked((8, 8), 6)
    }
}
