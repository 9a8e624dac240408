//! Monotonic conversion progress.

use std::sync::{Arc, Mutex};

/// Listener for conversion progress percentages.
pub type ProgressCallback = Arc<dyn Fn(f32) + Send + Sync>;

/// Highest percentage a backend may report; 100 means the result is ready.
const BACKEND_CEILING: f32 = 99.0;

/// Forwards backend progress to a listener, never going backwards.
///
/// Retries restart the backend's own count; those lower reports are
/// swallowed so the listener only ever sees increases.
#[derive(Clone)]
pub struct ConversionProgress {
    last: Arc<Mutex<f32>>,
    callback: Option<ProgressCallback>,
}

impl ConversionProgress {
    pub fn new(callback: Option<ProgressCallback>) -> Self {
        Self {
            last: Arc::new(Mutex::new(0.0)),
            callback,
        }
    }

    pub fn silent() -> Self {
        Self::new(None)
    }

    /// Report backend progress. Capped below 100 and ignored unless higher
    /// than what was reported before.
    pub fn report(&self, percent: f32) {
        self.emit(percent.clamp(0.0, BACKEND_CEILING));
    }

    /// Mark the conversion finished.
    pub fn complete(&self) {
        self.emit(100.0);
    }

    pub fn last(&self) -> f32 {
        self.last.lock().map(|last| *last).unwrap_or_default()
    }

    fn emit(&self, percent: f32) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        if percent <= *last {
            return;
        }
        *last = percent;
        drop(last);

        if let Some(callback) = &self.callback {
            callback(percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording() -> (ConversionProgress, Arc<Mutex<Vec<f32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = ConversionProgress::new(Some(Arc::new(move |p: f32| {
            sink.lock().unwrap().push(p);
        })));
        (progress, seen)
    }

    #[test]
    fn test_reports_only_increase() {
        let (progress, seen) = recording();
        progress.report(20.0);
        progress.report(10.0);
        progress.report(20.0);
        progress.report(45.0);
        assert_eq!(*seen.lock().unwrap(), vec![20.0, 45.0]);
    }

    #[test]
    fn test_backend_cannot_reach_100() {
        let (progress, seen) = recording();
        progress.report(150.0);
        assert_eq!(progress.last(), 99.0);
        progress.complete();
        assert_eq!(*seen.lock().unwrap(), vec![99.0, 100.0]);
    }

    #[test]
    fn test_silent_tracks_last() {
        let progress = ConversionProgress::silent();
        progress.report(30.0);
        assert_eq!(progress.last(), 30.0);
    }
}
