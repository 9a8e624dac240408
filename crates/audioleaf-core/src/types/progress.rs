use serde::{Deserialize, Serialize};

/// A progress report emitted while a document is being extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionProgress {
    /// Percentage in `[0, 100]`.
    pub percent: f32,
    /// Human-readable description of the current step.
    pub step_label: String,
}

impl ExtractionProgress {
    pub fn new(percent: f32, step_label: impl Into<String>) -> Self {
        Self {
            percent,
            step_label: step_label.into(),
        }
    }
}
