//! Progress side channel for one extraction run.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc::UnboundedSender;
use tracing::trace;

use audioleaf_core::ExtractionProgress;

pub const LABEL_ANALYZING: &str = "Analyzing document structure...";
pub const LABEL_OCR_FALLBACK: &str = "No text found. Using OCR to extract text from images...";
pub const LABEL_BYTE_SCAN: &str = "Scanning raw document bytes...";
pub const LABEL_FINALIZING: &str = "Finalizing content...";
pub const LABEL_COMPLETED: &str = "Processing completed!";

pub fn label_extracting_page(page_number: u32) -> String {
    format!("Extracting text from page {page_number}...")
}

pub fn label_rendering_page(page_number: u32) -> String {
    format!("Rendering page {page_number} to image...")
}

pub fn label_recognizing(index: u32, total: u32) -> String {
    format!("Processing image {index} of {total} with OCR...")
}

#[derive(Debug)]
struct TrackerState {
    percent: f32,
    label: String,
    sender: Option<UnboundedSender<ExtractionProgress>>,
}

/// Monotonic progress reporter.
///
/// Every report is clamped into `[0, 100]` and never below the previous
/// one. Clones share state, so an OCR progress callback and the strategy
/// that spawned it report on the same scale.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    state: Arc<Mutex<TrackerState>>,
}

impl ProgressTracker {
    pub fn new(sender: Option<UnboundedSender<ExtractionProgress>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(TrackerState {
                percent: 0.0,
                label: String::new(),
                sender,
            })),
        }
    }

    /// A tracker with no listener.
    pub fn silent() -> Self {
        Self::new(None)
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Report a new percentage and step label.
    pub fn report(&self, percent: f32, label: impl Into<String>) {
        let mut state = self.lock();
        state.label = label.into();
        Self::publish(&mut state, percent);
    }

    /// Report a new percentage, keeping the current label.
    pub fn advance(&self, percent: f32) {
        let mut state = self.lock();
        Self::publish(&mut state, percent);
    }

    fn publish(state: &mut TrackerState, percent: f32) {
        let percent = if percent.is_nan() { 0.0 } else { percent };
        state.percent = percent.clamp(state.percent, 100.0);
        trace!(percent = state.percent, label = %state.label, "Extraction progress");

        let update = ExtractionProgress::new(state.percent, state.label.clone());
        if let Some(sender) = &state.sender {
            if sender.send(update).is_err() {
                // Listener went away; keep extracting without it.
                state.sender = None;
            }
        }
    }

    pub fn percent(&self) -> f32 {
        self.lock().percent
    }

    pub fn label(&self) -> String {
        self.lock().label.clone()
    }
}

/// Map `fraction` of the way through `[start, end]`.
pub fn scaled(start: f32, end: f32, fraction: f32) -> f32 {
    start + (end - start) * fraction.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_reports_are_monotonic_and_clamped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tracker = ProgressTracker::new(Some(tx));

        tracker.report(10.0, "a");
        tracker.report(5.0, "b");
        tracker.advance(150.0);
        tracker.advance(-3.0);

        let seen: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        let percents: Vec<f32> = seen.iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![10.0, 10.0, 100.0, 100.0]);
        assert_eq!(seen[1].step_label, "b");
        assert_eq!(seen[2].step_label, "b");
    }

    #[test]
    fn test_clones_share_state() {
        let tracker = ProgressTracker::silent();
        let other = tracker.clone();
        other.report(42.0, "shared");
        assert_eq!(tracker.percent(), 42.0);
        assert_eq!(tracker.label(), "shared");
    }

    #[test]
    fn test_dropped_listener_is_tolerated() {
        let (tx, rx) = mpsc::unbounded_channel();
        let tracker = ProgressTracker::new(Some(tx));
        drop(rx);
        tracker.report(50.0, "still running");
        assert_eq!(tracker.percent(), 50.0);
    }

    #[test]
    fn test_scaled() {
        assert_eq!(scaled(75.0, 100.0, 0.5), 87.5);
        assert_eq!(scaled(50.0, 75.0, 2.0), 75.0);
        assert_eq!(scaled(0.0, 50.0, -1.0), 0.0);
    }
}
