use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Audio cues a front end may play; the engine never plays sound itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Select,
    Deselect,
    Swap,
    Clear,
}

/// Notifications emitted by [`PlayEngine`](crate::PlayEngine) while it handles input.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    ScoreChanged { delta: u32, total: u32 },
    MovesLeft(u32),
    GameEnded { score: u32 },
}

/// Receiver for [`GameEvent`]s, standing in for score display, audio and move counter.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Discards every event.
impl EventSink for () {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Collects events in order.
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}
