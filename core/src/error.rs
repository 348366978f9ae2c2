use core::fmt;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates out of bounds")]
    OutOfBounds,
    #[error("Alphabet too small, at least 3 symbols are needed")]
    AlphabetTooSmall,
    #[error("Alphabet too large, at most 26 symbols are supported")]
    AlphabetTooLarge,
    #[error("Invalid swap: {0}")]
    InvalidSwap(SwapRejection),
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Symbol is not part of the alphabet")]
    UnknownSymbol,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
}

/// Why a swap request was turned down. Nothing is mutated when this is reported.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SwapRejection {
    NotAdjacent,
    EmptyCell,
    Busy,
}

impl fmt::Display for SwapRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotAdjacent => "cells are not adjacent",
            Self::EmptyCell => "cell is empty",
            Self::Busy => "board is busy",
        })
    }
}

impl From<SwapRejection> for GameError {
    fn from(reason: SwapRejection) -> Self {
        Self::InvalidSwap(reason)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
