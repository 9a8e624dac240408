//! Playback state machine over a [`NarrationEngine`].
//!
//! ```text
//! Idle --play/start event--> Playing --pause--> Paused
//!   ^                          |                  |
//!   +----stop/end/error--------+-------stop-------+
//! ```
//!
//! The controller's own state decides which commands are legal. Engine
//! events only move the state for the utterance that is currently active.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use audioleaf_core::config::{MAX_SPEECH_RATE, MIN_SPEECH_RATE};
use audioleaf_core::{
    ExtractionResult, NarrationEngine, NarrationEvent, NarrationEventKind, NarrationRequest,
    Page, PlaybackConfig, UtteranceId, VoiceProfile,
};

/// Errors creating a playback session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("Document has no text to read")]
    EmptyDocument,
}

pub type PlaybackResult<T> = Result<T, PlaybackError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing,
    Paused,
}

/// Outcome of comparing the controller against the engine's paused flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientStatus {
    Consistent,
    Mismatch,
}

/// Which controls a presentation layer should offer right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub play: bool,
    pub pause: bool,
    pub resume: bool,
    pub stop: bool,
    pub previous: bool,
    pub next: bool,
}

/// Narrates an extracted document one page at a time.
pub struct PlaybackController {
    engine: Arc<dyn NarrationEngine>,
    pages: Vec<Page>,
    current_page: u32,
    state: PlaybackState,
    voice: Option<VoiceProfile>,
    rate: f32,
    pitch: f32,
    volume: f32,
    next_utterance: UtteranceId,
    active: Option<UtteranceId>,
    events_tx: UnboundedSender<NarrationEvent>,
    events_rx: UnboundedReceiver<NarrationEvent>,
}

impl PlaybackController {
    /// Start a session on a freshly extracted document, positioned on page 1.
    pub fn new(
        engine: Arc<dyn NarrationEngine>,
        result: ExtractionResult,
        config: &PlaybackConfig,
    ) -> PlaybackResult<Self> {
        if result.full_text().trim().is_empty() || result.total_pages() == 0 {
            return Err(PlaybackError::EmptyDocument);
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        info!(pages = result.total_pages(), "Playback session created");

        Ok(Self {
            engine,
            pages: result.into_pages(),
            current_page: 1,
            state: PlaybackState::Idle,
            voice: None,
            rate: clamp_rate(config.speech_rate),
            pitch: config.pitch,
            volume: config.volume,
            next_utterance: 1,
            active: None,
            events_tx,
            events_rx,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Text of the page under the cursor.
    pub fn page_text(&self) -> &str {
        self.pages
            .get(self.current_page as usize - 1)
            .map(|p| p.text.as_str())
            .unwrap_or_default()
    }

    pub fn voice(&self) -> Option<&VoiceProfile> {
        self.voice.as_ref()
    }

    /// Voice for the next `play()`. Does not affect an utterance in flight.
    pub fn set_voice(&mut self, voice: Option<VoiceProfile>) {
        self.voice = voice;
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Rate for the next `play()`, clamped to the supported range.
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = clamp_rate(rate);
    }

    /// Start narrating the current page from the beginning.
    ///
    /// Legal from `Idle` and `Paused`. The state only becomes `Playing`
    /// once the engine reports the utterance started. Returns whether a
    /// request was issued.
    pub fn play(&mut self) -> bool {
        if self.state == PlaybackState::Playing {
            debug!("play() ignored while playing");
            return false;
        }
        let text = self.page_text().to_string();
        if text.trim().is_empty() {
            debug!(page = self.current_page, "play() ignored on an empty page");
            return false;
        }

        self.engine.cancel();
        self.state = PlaybackState::Idle;

        let utterance = self.next_utterance;
        self.next_utterance += 1;
        self.active = Some(utterance);

        debug!(utterance, page = self.current_page, rate = self.rate, "Speaking page");
        self.engine.speak(NarrationRequest {
            utterance,
            text,
            voice: self.voice.clone(),
            rate: self.rate,
            pitch: self.pitch,
            volume: self.volume,
            events: self.events_tx.clone(),
        });
        true
    }

    /// Legal only while playing.
    pub fn pause(&mut self) -> bool {
        if self.state != PlaybackState::Playing {
            debug!(state = ?self.state, "pause() ignored");
            return false;
        }
        self.engine.pause();
        self.state = PlaybackState::Paused;
        true
    }

    /// Legal only while paused.
    pub fn resume(&mut self) -> bool {
        if self.state != PlaybackState::Paused {
            debug!(state = ?self.state, "resume() ignored");
            return false;
        }
        self.engine.resume();
        self.state = PlaybackState::Playing;
        true
    }

    /// Cancel any narration. Legal from every state.
    pub fn stop(&mut self) {
        self.engine.cancel();
        self.active = None;
        self.state = PlaybackState::Idle;
    }

    /// Move the cursor to page `n`, stopping narration first.
    ///
    /// Out-of-range pages are ignored and leave everything untouched.
    pub fn change_page(&mut self, n: u32) -> bool {
        if n < 1 || n > self.total_pages() {
            debug!(page = n, total = self.total_pages(), "change_page() out of range");
            return false;
        }
        self.stop();
        self.current_page = n;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.change_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        match self.current_page.checked_sub(1) {
            Some(n) => self.change_page(n),
            None => false,
        }
    }

    /// Apply every engine event received so far. Returns how many were read.
    pub fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next engine event and apply it.
    ///
    /// Returns `None` only if the event channel closed, which cannot happen
    /// while the controller holds its own sender.
    pub async fn next_event(&mut self) -> Option<NarrationEvent> {
        let event = self.events_rx.recv().await?;
        self.apply_event(event.clone());
        Some(event)
    }

    fn apply_event(&mut self, event: NarrationEvent) {
        if self.active != Some(event.utterance) {
            debug!(utterance = event.utterance, "Ignoring event for superseded utterance");
            return;
        }

        match event.kind {
            NarrationEventKind::Start => self.state = PlaybackState::Playing,
            NarrationEventKind::End => {
                self.active = None;
                self.state = PlaybackState::Idle;
            }
            NarrationEventKind::Error(message) => {
                warn!(utterance = event.utterance, %message, "Narration failed");
                self.active = None;
                self.state = PlaybackState::Idle;
            }
            NarrationEventKind::Pause if self.state == PlaybackState::Playing => {
                self.state = PlaybackState::Paused;
            }
            NarrationEventKind::Resume if self.state == PlaybackState::Paused => {
                self.state = PlaybackState::Playing;
            }
            NarrationEventKind::Pause | NarrationEventKind::Resume => {}
        }
    }

    /// Compare the controller's state with the engine's paused flag.
    ///
    /// Meant to be called once per UI tick. Never changes state.
    pub fn sync_ambient(&self) -> AmbientStatus {
        let engine_paused = self.engine.is_paused();
        let expected = self.state == PlaybackState::Paused;
        if engine_paused == expected {
            AmbientStatus::Consistent
        } else {
            warn!(state = ?self.state, engine_paused, "Narration engine paused flag disagrees");
            AmbientStatus::Mismatch
        }
    }

    /// Controls enabled in the current state.
    pub fn visible_controls(&self) -> Controls {
        Controls {
            play: self.state == PlaybackState::Idle && self.voice.is_some(),
            pause: self.state == PlaybackState::Playing,
            resume: self.state == PlaybackState::Paused,
            stop: self.state != PlaybackState::Idle,
            previous: self.current_page > 1,
            next: self.current_page < self.total_pages(),
        }
    }
}

fn clamp_rate(rate: f32) -> f32 {
    if rate.is_nan() {
        return MIN_SPEECH_RATE;
    }
    rate.clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use audioleaf_core::PageSource;
    use mockall::mock;
    use tokio::sync::watch;

    mock! {
        Engine {}

        impl NarrationEngine for Engine {
            fn speak(&self, request: NarrationRequest);
            fn pause(&self);
            fn resume(&self);
            fn cancel(&self);
            fn is_paused(&self) -> bool;
            fn voices(&self) -> watch::Receiver<Vec<VoiceProfile>>;
        }
    }

    fn result(texts: &[&str]) -> ExtractionResult {
        let pages = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Page::new(i as u32 + 1, *t, PageSource::Parsed))
            .collect();
        ExtractionResult::from_pages(pages, "text-layer")
    }

    fn controller(engine: MockEngine, texts: &[&str]) -> PlaybackController {
        PlaybackController::new(Arc::new(engine), result(texts), &PlaybackConfig::default())
            .unwrap()
    }

    #[test]
    fn test_empty_document_rejected() {
        let err = PlaybackController::new(
            Arc::new(MockEngine::new()),
            result(&["  ", ""]),
            &PlaybackConfig::default(),
        )
        .err();
        assert_eq!(err, Some(PlaybackError::EmptyDocument));
    }

    #[test]
    fn test_pause_in_idle_issues_nothing() {
        let mut engine = MockEngine::new();
        engine.expect_pause().times(0);
        engine.expect_resume().times(0);

        let mut playback = controller(engine, &["one"]);
        assert!(!playback.pause());
        assert!(!playback.resume());
        assert_eq!(playback.state(), PlaybackState::Idle);
    }

    #[test]
    fn test_resume_while_playing_issues_nothing() {
        let mut engine = MockEngine::new();
        engine.expect_cancel().times(1).return_const(());
        engine.expect_speak().times(1).return_const(());
        engine.expect_resume().times(0);

        let mut playback = controller(engine, &["one"]);
        assert!(playback.play());
        playback.apply_event(NarrationEvent::new(1, NarrationEventKind::Start));
        assert_eq!(playback.state(), PlaybackState::Playing);

        assert!(!playback.resume());
        assert!(!playback.play());
        assert_eq!(playback.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_play_request_carries_settings() {
        let mut engine = MockEngine::new();
        engine.expect_cancel().return_const(());
        engine
            .expect_speak()
            .withf(|req| {
                req.utterance == 1
                    && req.text == "Page one"
                    && req.rate == MAX_SPEECH_RATE
                    && req.pitch == 1.0
                    && req.volume == 1.0
                    && req.voice.as_ref().map(|v| v.name.as_str()) == Some("Lekha")
            })
            .times(1)
            .return_const(());

        let mut playback = controller(engine, &["Page one"]);
        playback.set_voice(Some(VoiceProfile::new("Lekha", "hi-IN")));
        playback.set_rate(5.0);
        assert!(playback.play());
    }

    #[test]
    fn test_play_on_empty_page_issues_nothing() {
        let mut engine = MockEngine::new();
        engine.expect_speak().times(0);
        engine.expect_cancel().return_const(());

        let mut playback = controller(engine, &["text", ""]);
        assert!(playback.change_page(2));
        assert!(!playback.play());
    }

    #[test]
    fn test_out_of_range_page_changes_nothing() {
        let mut engine = MockEngine::new();
        engine.expect_cancel().times(0);

        let mut playback = controller(engine, &["a", "b"]);
        assert!(!playback.change_page(0));
        assert!(!playback.change_page(3));
        assert!(!playback.previous_page());
        assert_eq!(playback.current_page(), 1);
        assert_eq!(playback.page_text(), "a");
    }

    #[test]
    fn test_rate_clamped() {
        assert_eq!(clamp_rate(0.1), MIN_SPEECH_RATE);
        assert_eq!(clamp_rate(9.0), MAX_SPEECH_RATE);
        assert_eq!(clamp_rate(1.25), 1.25);
        assert_eq!(clamp_rate(f32::NAN), MIN_SPEECH_RATE);
    }

    #[test]
    fn test_ambient_mismatch_detected() {
        let mut engine = MockEngine::new();
        engine.expect_is_paused().times(2).returning(|| true);
        engine.expect_cancel().return_const(());
        engine.expect_speak().return_const(());
        engine.expect_pause().return_const(());

        let mut playback = controller(engine, &["a"]);
        assert_eq!(playback.sync_ambient(), AmbientStatus::Mismatch);

        playback.play();
        playback.apply_event(NarrationEvent::new(1, NarrationEventKind::Start));
        playback.pause();
        assert_eq!(playback.sync_ambient(), AmbientStatus::Consistent);
    }
}
