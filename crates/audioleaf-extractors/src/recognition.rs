//! Recognition engine adapter.
//!
//! Wraps one long-lived [`RecognitionEngine`] for the life of a session:
//! the engine is loaded at most once, runs one job at a time, and every
//! job is time-boxed. Callers turn the errors into page-level diagnostics.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use audioleaf_core::{PageBitmap, RecognitionEngine, RecognitionProgress};

pub const OCR_UNAVAILABLE: &str = "OCR processing not available. This appears to be an image-based PDF. Please try a text-based PDF or contact support.";
pub const OCR_TIMED_OUT: &str = "OCR processing timed out for this page.";
pub const OCR_FAILED: &str = "OCR processing failed for this page.";
pub const RENDER_FAILED: &str = "This page could not be rendered for OCR.";

/// Errors from a single recognition job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("Recognition engine is not available")]
    Unavailable,

    #[error("Recognition timed out after {0:?}")]
    Timeout(Duration),

    #[error("Recognition failed: {0}")]
    Engine(String),
}

impl RecognitionError {
    /// Fixed page text standing in for a failed recognition.
    pub fn diagnostic(&self) -> &'static str {
        match self {
            Self::Unavailable => OCR_UNAVAILABLE,
            Self::Timeout(_) => OCR_TIMED_OUT,
            Self::Engine(_) => OCR_FAILED,
        }
    }
}

/// Session-wide handle to the OCR engine.
pub struct Recognizer {
    engine: Arc<dyn RecognitionEngine>,
    ready: OnceCell<bool>,
    terminated: AtomicBool,
    job: Mutex<()>,
    timeout: Duration,
}

impl Recognizer {
    pub fn new(engine: Arc<dyn RecognitionEngine>, timeout: Duration) -> Self {
        Self {
            engine,
            ready: OnceCell::new(),
            terminated: AtomicBool::new(false),
            job: Mutex::new(()),
            timeout,
        }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Load the engine if that has not been tried yet.
    ///
    /// Idempotent: concurrent callers share one load attempt and a failed
    /// load is not retried. Returns whether the engine is usable.
    pub async fn initialize(&self) -> bool {
        if self.terminated.load(Ordering::Acquire) {
            return false;
        }

        let ready = *self
            .ready
            .get_or_init(|| async {
                match self.engine.load().await {
                    Ok(()) => {
                        info!(engine = self.engine.name(), "Recognition engine ready");
                        true
                    }
                    Err(e) => {
                        warn!(engine = self.engine.name(), error = %e, "Recognition engine failed to load");
                        false
                    }
                }
            })
            .await;

        ready && !self.terminated.load(Ordering::Acquire)
    }

    /// Start loading in the background so the first page does not wait.
    pub fn warm_up(self: &Arc<Self>) {
        let recognizer = Arc::clone(self);
        tokio::spawn(async move {
            recognizer.initialize().await;
        });
    }

    /// Whether a load has completed successfully and the adapter is live.
    pub fn is_ready(&self) -> bool {
        !self.terminated.load(Ordering::Acquire) && self.ready.get() == Some(&true)
    }

    /// Recognize one bitmap, waiting for any in-flight job first.
    pub async fn recognize(
        &self,
        bitmap: &PageBitmap,
        progress: RecognitionProgress,
    ) -> Result<String, RecognitionError> {
        if !self.initialize().await {
            return Err(RecognitionError::Unavailable);
        }

        let _job = self.job.lock().await;
        debug!(width = bitmap.width, height = bitmap.height, "Recognizing bitmap");

        match tokio::time::timeout(self.timeout, self.engine.recognize(bitmap, progress)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(RecognitionError::Engine(e.to_string())),
            Err(_) => Err(RecognitionError::Timeout(self.timeout)),
        }
    }

    /// Release the engine. Safe to call repeatedly or before any load.
    pub async fn terminate(&self) {
        if self.terminated.swap(true, Ordering::AcqRel) {
            return;
        }
        if self.ready.get() != Some(&true) {
            debug!("Recognition engine was never loaded; nothing to release");
            return;
        }
        match self.engine.terminate().await {
            Ok(()) => info!(engine = self.engine.name(), "Recognition engine terminated"),
            Err(e) => warn!(engine = self.engine.name(), error = %e, "Failed to terminate recognition engine"),
        }
    }
}
