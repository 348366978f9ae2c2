use alloc::vec::Vec;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Upper bound on clear and collapse rounds one swap may trigger with [`CascadeMode::Full`].
pub const MAX_CASCADE_PASSES: usize = 64;

/// Keeps the refill stream apart from the generator stream of the same seed.
const REFILL_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// What the board is doing right now. Swaps are only accepted while idle.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardPhase {
    #[default]
    Idle,
    Evaluating,
    Collapsing,
}

impl BoardPhase {
    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Active,
    Ended,
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Ended)
    }
}

/// Everything a single accepted swap changed, in order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub swapped: (Coord2, Coord2),
    pub matches: Vec<MatchReport>,
    /// One report per collapse pass; more than one only when cascading.
    pub collapses: Vec<CollapseReport>,
    pub score_delta: u32,
    pub moves_left: u32,
    pub game_ended: bool,
}

impl SwapOutcome {
    pub fn has_match(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn cleared(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.matches
            .iter()
            .flat_map(|report| report.cleared.iter().copied())
    }
}

/// Result of clicking a cell.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectOutcome {
    /// Busy board or empty cell, nothing happened.
    Ignored,
    Selected(Coord2),
    Deselected(Coord2),
    /// A non-adjacent cell was clicked, the selection moved there.
    Reselected { from: Coord2, to: Coord2 },
    Swapped(SwapOutcome),
}

impl SelectOutcome {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// One play session: a board, its score, its move budget and the current selection.
#[derive(Clone, Debug)]
pub struct PlayEngine {
    config: BoardConfig,
    grid: Grid,
    rng: SmallRng,
    score: u32,
    moves_left: u32,
    selected: Option<Coord2>,
    phase: BoardPhase,
    state: EngineState,
}

impl PlayEngine {
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self> {
        Self::with_generator(config, seed, RandomBoardGenerator::new(seed))
    }

    pub fn with_generator(
        config: BoardConfig,
        seed: u64,
        generator: impl BoardGenerator,
    ) -> Result<Self> {
        let grid = generator.generate(&config)?;
        let state = if config.moves == 0 {
            log::warn!("Session created without moves, it starts finished");
            EngineState::Ended
        } else {
            EngineState::Active
        };

        Ok(Self {
            config,
            grid,
            rng: SmallRng::seed_from_u64(seed ^ REFILL_SEED_SALT),
            score: 0,
            moves_left: config.moves,
            selected: None,
            phase: BoardPhase::Idle,
            state,
        })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    pub fn selected(&self) -> Option<Coord2> {
        self.selected
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Marks the board busy while a front end replays the deltas of the last swap.
    pub fn begin_presentation(&mut self) {
        if self.phase == BoardPhase::Idle {
            self.phase = BoardPhase::Collapsing;
        }
    }

    pub fn end_presentation(&mut self) {
        self.phase = BoardPhase::Idle;
    }

    /// Handles a click on `coords`: select, deselect, move the selection, or
    /// swap with the selected neighbor.
    pub fn select(&mut self, coords: Coord2, sink: &mut impl EventSink) -> Result<SelectOutcome> {
        use SelectOutcome::*;

        let coords = self.grid.validate_coords(coords)?;
        self.check_active()?;

        if self.phase.is_busy() || self.grid[coords].is_empty() {
            return Ok(Ignored);
        }

        Ok(match self.selected {
            Some(previous) if previous == coords => {
                self.selected = None;
                sink.emit(GameEvent::Sound(SoundCue::Deselect));
                Deselected(coords)
            }
            Some(previous) if are_adjacent(previous, coords) => {
                Swapped(self.swap(previous, coords, sink)?)
            }
            Some(previous) => {
                self.selected = Some(coords);
                sink.emit(GameEvent::Sound(SoundCue::Select));
                Reselected {
                    from: previous,
                    to: coords,
                }
            }
            None => {
                self.selected = Some(coords);
                sink.emit(GameEvent::Sound(SoundCue::Select));
                Selected(coords)
            }
        })
    }

    /// Swaps two neighboring tiles, clears what matches through `a` and then
    /// `b`, collapses, scores and spends one move.
    ///
    /// A rejected swap leaves everything untouched. An accepted swap stays in
    /// place even if nothing matched.
    pub fn swap(&mut self, a: Coord2, b: Coord2, sink: &mut impl EventSink) -> Result<SwapOutcome> {
        self.check_active()?;
        let a = self.grid.validate_coords(a)?;
        let b = self.grid.validate_coords(b)?;

        if self.phase.is_busy() {
            return Err(SwapRejection::Busy.into());
        }
        if !are_adjacent(a, b) {
            return Err(SwapRejection::NotAdjacent.into());
        }
        let (Some(symbol_a), Some(symbol_b)) = (self.grid[a].symbol(), self.grid[b].symbol())
        else {
            return Err(SwapRejection::EmptyCell.into());
        };

        self.grid.swap(a, b)?;
        self.selected = None;
        if symbol_a != symbol_b {
            sink.emit(GameEvent::Sound(SoundCue::Swap));
        }
        log::debug!("Swapped {:?} ({}) with {:?} ({})", a, symbol_a, b, symbol_b);

        let mut outcome = SwapOutcome {
            swapped: (a, b),
            matches: Vec::new(),
            collapses: Vec::new(),
            score_delta: 0,
            moves_left: self.moves_left,
            game_ended: false,
        };

        let resolved = self.resolve(&[a, b], &mut outcome, sink);
        self.phase = BoardPhase::Idle;
        resolved?;

        self.moves_left = self.moves_left.saturating_sub(1);
        outcome.moves_left = self.moves_left;
        sink.emit(GameEvent::MovesLeft(self.moves_left));

        if self.moves_left == 0 {
            self.end_game(sink);
            outcome.game_ended = true;
        }

        Ok(outcome)
    }

    /// Clears matches through `origins` and collapses, repeating over the whole
    /// board while cascading is enabled.
    fn resolve(
        &mut self,
        origins: &[Coord2],
        outcome: &mut SwapOutcome,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let mut origins = origins.to_vec();

        for pass in 0.. {
            self.phase = BoardPhase::Evaluating;
            let mut matched = false;
            for &origin in &origins {
                if let Some(report) = evaluate_cell(&mut self.grid, origin)? {
                    sink.emit(GameEvent::Sound(SoundCue::Clear));
                    outcome.matches.push(report);
                    matched = true;
                }
            }
            if !matched {
                break;
            }

            self.phase = BoardPhase::Collapsing;
            let report = collapse(&mut self.grid, self.config.alphabet(), &mut self.rng)?;
            self.award(report.refilled(), outcome, sink);
            outcome.collapses.push(report);

            if self.config.cascade == CascadeMode::Single {
                break;
            }
            if pass + 1 >= MAX_CASCADE_PASSES {
                log::warn!("Cascade stopped after {} passes", MAX_CASCADE_PASSES);
                break;
            }
            origins = self.grid.find_all_matches();
        }

        Ok(())
    }

    fn award(&mut self, refilled: usize, outcome: &mut SwapOutcome, sink: &mut impl EventSink) {
        let refilled = u32::try_from(refilled).unwrap_or(u32::MAX);
        let delta = self.config.points_per_cell.saturating_mul(refilled);
        if delta == 0 {
            return;
        }
        self.score = self.score.saturating_add(delta);
        outcome.score_delta = outcome.score_delta.saturating_add(delta);
        sink.emit(GameEvent::ScoreChanged {
            delta,
            total: self.score,
        });
    }

    fn end_game(&mut self, sink: &mut impl EventSink) {
        if self.state.is_finished() {
            return;
        }
        self.state = EngineState::Ended;
        self.selected = None;
        log::debug!("Game ended with score {}", self.score);
        sink.emit(GameEvent::GameEnded { score: self.score });
    }

    fn check_active(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
