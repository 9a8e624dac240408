//! Messages exchanged with the narration engine.

use tokio::sync::mpsc;

use super::VoiceProfile;

/// Identifies one narration request. Monotonic within a playback session.
pub type UtteranceId = u64;

/// Channel the engine reports lifecycle events on.
pub type NarrationEventSender = mpsc::UnboundedSender<NarrationEvent>;

/// A request to speak one block of text.
#[derive(Debug, Clone)]
pub struct NarrationRequest {
    pub utterance: UtteranceId,
    pub text: String,
    pub voice: Option<VoiceProfile>,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Where the engine delivers start/end/error events for this utterance.
    pub events: NarrationEventSender,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NarrationEventKind {
    Start,
    End,
    Error(String),
    Pause,
    Resume,
}

/// A lifecycle event for one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrationEvent {
    pub utterance: UtteranceId,
    pub kind: NarrationEventKind,
}

impl NarrationEvent {
    pub fn new(utterance: UtteranceId, kind: NarrationEventKind) -> Self {
        Self { utterance, kind }
    }
}
