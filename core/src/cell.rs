use core::fmt;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Opaque tile identity. Symbols only compare for equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(pub u8);

impl Symbol {
    /// Letter used by text renderings, `A` for symbol 0 and so on.
    pub fn as_char(self) -> char {
        if self.0 < 26 {
            char::from(b'A' + self.0)
        } else {
            '?'
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Content of a single board cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Symbol),
}

impl Cell {
    pub const fn symbol(self) -> Option<Symbol> {
        match self {
            Self::Empty => None,
            Self::Filled(symbol) => Some(symbol),
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Option<Symbol>> for Cell {
    fn from(symbol: Option<Symbol>) -> Self {
        symbol.map_or(Self::Empty, Self::Filled)
    }
}

/// The finite set of symbols `0..len` a board is filled from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    len: u8,
}

impl Alphabet {
    pub const fn new(len: u8) -> Self {
        Self { len }
    }

    pub const fn len(&self) -> u8 {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn contains(&self, symbol: Symbol) -> bool {
        symbol.0 < self.len
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + Clone + use<> {
        (0..self.len).map(Symbol)
    }

    /// Uniformly picks a symbol that is not in `excluded`, `None` if all are excluded.
    pub fn pick_excluding<R: Rng>(
        &self,
        rng: &mut R,
        excluded: &[Symbol],
    ) -> Option<Symbol> {
        let candidates = self.iter().filter(|symbol| !excluded.contains(symbol));
        let count = candidates.clone().count();
        if count == 0 {
            return None;
        }
        let pick = rng.random_range(0..count);
        candidates.clone().nth(pick)
    }
}
