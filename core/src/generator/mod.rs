use crate::*;
pub use random::*;

mod preset;
mod random;

pub trait BoardGenerator {
    fn generate(self, config: &BoardConfig) -> Result<Grid>;
}
