//! Voice profiles and the predicate used to pick narration voices.

use serde::{Deserialize, Serialize};

/// A voice offered by the narration engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceProfile {
    pub name: String,
    /// BCP 47 language tag, e.g. `hi-IN`.
    pub language_tag: String,
}

impl VoiceProfile {
    pub fn new(name: impl Into<String>, language_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language_tag: language_tag.into(),
        }
    }
}

/// Selects the voices a session may use out of the engine's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceFilter {
    /// A voice matches when its language tag starts with one of these.
    pub language_prefixes: Vec<String>,
    /// ...or when its tag or name contains one of these (case-insensitive).
    pub keywords: Vec<String>,
    /// Upper bound on the filtered list.
    pub max_voices: usize,
}

impl Default for VoiceFilter {
    fn default() -> Self {
        Self {
            language_prefixes: vec!["hi".to_string()],
            keywords: vec![
                "hindi".to_string(),
                "india".to_string(),
                "हिंदी".to_string(),
            ],
            max_voices: 5,
        }
    }
}

impl VoiceFilter {
    pub fn matches(&self, voice: &VoiceProfile) -> bool {
        let tag = voice.language_tag.to_lowercase();
        let name = voice.name.to_lowercase();

        self.language_prefixes
            .iter()
            .any(|prefix| tag.starts_with(&prefix.to_lowercase()))
            || self.keywords.iter().any(|keyword| {
                let keyword = keyword.to_lowercase();
                tag.contains(&keyword) || name.contains(&keyword)
            })
    }

    /// Filter a catalog, preserving its order and capping the result.
    pub fn select(&self, catalog: &[VoiceProfile]) -> Vec<VoiceProfile> {
        catalog
            .iter()
            .filter(|v| self.matches(v))
            .take(self.max_voices)
            .cloned()
            .collect()
    }
}
