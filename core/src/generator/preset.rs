use super::*;

/// A hand-made board is its own generator, once it fits the config.
impl BoardGenerator for Grid {
    fn generate(self, config: &BoardConfig) -> Result<Grid> {
        config.validate()?;

        if self.size() != config.size || !self.is_full() {
            return Err(GameError::InvalidBoardShape);
        }

        let alphabet = config.alphabet();
        let all_known = self
            .iter_coords()
            .filter_map(|coords| self[coords].symbol())
            .all(|symbol| alphabet.contains(symbol));
        if !all_known {
            return Err(GameError::UnknownSymbol);
        }

        if self.has_matches() {
            log::warn!("Preset board already contains matches");
        }
        Ok(self)
    }
}
