//! Configuration system for audioleaf.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::error::{AudioleafError, AudioleafResult, ErrorCode};
use crate::types::VoiceFilter;

const MIB: u64 = 1024 * 1024;

/// Allowed speech rate range.
pub const MIN_SPEECH_RATE: f32 = 0.5;
pub const MAX_SPEECH_RATE: f32 = 2.0;

/// Extraction pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Largest accepted document (default: 50 MiB).
    pub max_file_size_bytes: u64,
    /// Scale factor pages are rasterized at for OCR (default: 2.0).
    pub raster_scale: f32,
    /// Budget for recognizing one page (default: 120 000 ms).
    pub recognition_timeout_ms: u64,
    /// Budget for rasterizing one page (default: 30 000 ms).
    pub render_timeout_ms: u64,
    /// Budget for loading the document structure (default: 60 000 ms).
    pub parse_timeout_ms: u64,
    /// Minimum byte-scan output accepted as content (default: 50 chars).
    pub min_heuristic_chars: usize,
    /// Emit guidance text instead of failing when nothing is readable.
    pub descriptive_fallback: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 50 * MIB,
            raster_scale: 2.0,
            recognition_timeout_ms: 120_000,
            render_timeout_ms: 30_000,
            parse_timeout_ms: 60_000,
            min_heuristic_chars: 50,
            descriptive_fallback: true,
        }
    }
}

impl ExtractionConfig {
    pub fn with_max_file_size_mb(mut self, megabytes: u64) -> Self {
        self.max_file_size_bytes = megabytes * MIB;
        self
    }

    pub fn with_recognition_timeout(mut self, timeout: Duration) -> Self {
        self.recognition_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_parse_timeout(mut self, timeout: Duration) -> Self {
        self.parse_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Fail with no-content instead of emitting guidance text.
    pub fn without_descriptive_fallback(mut self) -> Self {
        self.descriptive_fallback = false;
        self
    }

    pub fn recognition_timeout(&self) -> Duration {
        Duration::from_millis(self.recognition_timeout_ms)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }

    pub fn parse_timeout(&self) -> Duration {
        Duration::from_millis(self.parse_timeout_ms)
    }
}

/// Playback session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial speech rate (default: 0.9).
    pub speech_rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Which catalog voices the session offers.
    pub voices: VoiceFilter,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speech_rate: 0.9,
            pitch: 1.0,
            volume: 1.0,
            voices: VoiceFilter::default(),
        }
    }
}

/// Format conversion settings.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Retries after the first attempt (default: 2).
    pub max_retries: usize,
    /// Backoff unit; attempt `n` waits `n` units (default: 1000 ms).
    pub backoff_base_ms: u64,
    /// Budget for the whole conversion including retries (default: 30 000 ms).
    pub timeout_ms: u64,
    /// Largest accepted input (default: 50 MiB).
    pub max_file_size_bytes: u64,
    /// Remote backend key. Without one the synthetic backend is used.
    #[serde(skip_serializing)]
    pub api_key: Option<SecretString>,
    pub pdf_to_word_endpoint: String,
    pub word_to_pdf_endpoint: String,
    /// Delay between synthetic progress steps (default: 200 ms).
    pub synthetic_step_ms: u64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base_ms: 1_000,
            timeout_ms: 30_000,
            max_file_size_bytes: 50 * MIB,
            api_key: None,
            pdf_to_word_endpoint: "https://api.cloudmersive.com/convert/pdf/to/docx".to_string(),
            word_to_pdf_endpoint: "https://api.cloudmersive.com/convert/docx/to/pdf".to_string(),
            synthetic_step_ms: 200,
        }
    }
}

impl ConversionConfig {
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(key.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_millis(self.backoff_base_ms)
    }

    pub fn synthetic_step(&self) -> Duration {
        Duration::from_millis(self.synthetic_step_ms)
    }
}

/// Main audioleaf configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioleafConfig {
    pub extraction: ExtractionConfig,
    pub playback: PlaybackConfig,
    pub conversion: ConversionConfig,
}

impl AudioleafConfig {
    /// Default location of the user config file (`~/.audioleaf/config.toml`).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".audioleaf"))
            .unwrap_or_else(|| PathBuf::from(".audioleaf"))
            .join("config.toml")
    }

    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> AudioleafResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| AudioleafError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| AudioleafError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| AudioleafError::Configuration(e.to_string())),
            _ => Err(AudioleafError::validation_with_suggestion(
                "Unsupported config file format",
                ErrorCode::CfgUnsupportedFormat,
                "Use .toml, .json, or .yaml",
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Overlay environment variables on this configuration.
    ///
    /// Reads:
    /// - `AUDIOLEAF_MAX_FILE_SIZE_MB`
    /// - `AUDIOLEAF_RECOGNITION_TIMEOUT_MS`
    /// - `AUDIOLEAF_RASTER_SCALE`
    /// - `AUDIOLEAF_SPEECH_RATE`
    /// - `AUDIOLEAF_VOICE_LANGUAGE` (replaces the language prefix list)
    /// - `AUDIOLEAF_CONVERSION_API_KEY`
    /// - `AUDIOLEAF_CONVERSION_TIMEOUT_MS`
    pub fn apply_env(mut self) -> Self {
        if let Some(mb) = env_parse::<u64>("AUDIOLEAF_MAX_FILE_SIZE_MB") {
            let bytes = mb.saturating_mul(MIB);
            self.extraction.max_file_size_bytes = bytes;
            self.conversion.max_file_size_bytes = bytes;
        }
        if let Some(ms) = env_parse("AUDIOLEAF_RECOGNITION_TIMEOUT_MS") {
            self.extraction.recognition_timeout_ms = ms;
        }
        if let Some(scale) = env_parse("AUDIOLEAF_RASTER_SCALE") {
            self.extraction.raster_scale = scale;
        }
        if let Some(rate) = env_parse("AUDIOLEAF_SPEECH_RATE") {
            self.playback.speech_rate = rate;
        }
        if let Ok(language) = std::env::var("AUDIOLEAF_VOICE_LANGUAGE") {
            self.playback.voices.language_prefixes = language
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
        }
        if let Ok(key) = std::env::var("AUDIOLEAF_CONVERSION_API_KEY") {
            if !key.trim().is_empty() {
                self.conversion.api_key = Some(SecretString::new(key));
            }
        }
        if let Some(ms) = env_parse("AUDIOLEAF_CONVERSION_TIMEOUT_MS") {
            self.conversion.timeout_ms = ms;
        }

        self
    }

    /// Load from `path` when given (defaults otherwise), overlay the
    /// environment and validate.
    pub fn load(path: Option<&Path>) -> AudioleafResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        }
        .apply_env();

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> AudioleafResult<()> {
        let extraction = &self.extraction;
        if extraction.max_file_size_bytes == 0 || self.conversion.max_file_size_bytes == 0 {
            return Err(invalid("max_file_size_bytes must be greater than zero"));
        }
        if extraction.recognition_timeout_ms == 0
            || extraction.render_timeout_ms == 0
            || extraction.parse_timeout_ms == 0
            || self.conversion.timeout_ms == 0
        {
            return Err(invalid("timeouts must be greater than zero"));
        }
        if !(extraction.raster_scale.is_finite() && extraction.raster_scale > 0.0) {
            return Err(invalid(format!(
                "raster_scale must be positive, got {}",
                extraction.raster_scale
            )));
        }
        let rate = self.playback.speech_rate;
        if !(MIN_SPEECH_RATE..=MAX_SPEECH_RATE).contains(&rate) {
            return Err(AudioleafError::validation_with_suggestion(
                format!("speech_rate {rate} is out of range"),
                ErrorCode::CfgInvalidValue,
                format!("Use a rate between {MIN_SPEECH_RATE} and {MAX_SPEECH_RATE}"),
            ));
        }
        if self.playback.voices.max_voices == 0 {
            return Err(invalid("voices.max_voices must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AudioleafError {
    AudioleafError::Validation {
        message: message.into(),
        code: ErrorCode::CfgInvalidValue,
        suggestion: None,
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment variable");
            None
        }
    }
}
