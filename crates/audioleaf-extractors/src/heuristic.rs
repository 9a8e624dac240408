//! Byte-pattern heuristic extraction.
//!
//! Last resort for PDFs when no OCR path exists: scan the lossy UTF-8
//! decode of the raw payload for fragments that look like prose. Results
//! are low confidence and tagged [`PageSource::Heuristic`].

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use audioleaf_core::{DocumentKind, Page, PageSource};

use crate::context::{ExtractionContext, StrategyOutcome};
use crate::progress::LABEL_BYTE_SCAN;
use crate::ExtractionStrategy;

/// Shortest fragment worth keeping.
const MIN_FRAGMENT_CHARS: usize = 5;

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\(([a-zA-Z0-9\s.,!?;:'"()-]{5,})\)"#).expect("valid pattern"));
static DOUBLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([a-zA-Z0-9\s.,!?;:'"()-]{5,})""#).expect("valid pattern"));
static SINGLE_QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"'([a-zA-Z0-9\s.,!?;:'"()-]{5,})'"#).expect("valid pattern"));
static SHOW_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\(([a-zA-Z0-9\s.,!?;:'"()-]{5,})\)\s*Tj"#).expect("valid pattern")
});
static TEXT_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"BT\s*([a-zA-Z0-9\s.,!?;:'"()-]{5,})\s*ET"#).expect("valid pattern"));
static LETTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]").expect("valid pattern"));
static NUMERIC_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\s.,]+$").expect("valid pattern"));

/// Scans raw bytes for human-readable fragments.
#[derive(Debug, Clone, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Every surviving fragment, joined with single spaces.
    pub fn extract(&self, bytes: &[u8]) -> String {
        let decoded = String::from_utf8_lossy(bytes);
        let mut fragments: Vec<String> = Vec::new();

        for pattern in [&*BRACKETED, &*DOUBLE_QUOTED, &*SINGLE_QUOTED] {
            fragments.extend(
                pattern
                    .find_iter(&decoded)
                    .map(|m| strip_delimiters(m.as_str()))
                    .filter(|f| is_readable(f)),
            );
        }

        fragments.extend(
            SHOW_TEXT
                .find_iter(&decoded)
                .map(|m| strip_delimiters(m.as_str()).replace("Tj", "").trim().to_string())
                .filter(|f| is_operator_text(f)),
        );
        fragments.extend(
            TEXT_BLOCK
                .find_iter(&decoded)
                .map(|m| {
                    let inner = m.as_str();
                    inner[2..inner.len() - 2].trim().to_string()
                })
                .filter(|f| is_operator_text(f)),
        );

        debug!(fragments = fragments.len(), "Byte scan finished");
        fragments.join(" ")
    }
}

fn strip_delimiters(fragment: &str) -> String {
    fragment
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '"' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Bracketed or quoted fragment that reads like text.
fn is_readable(fragment: &str) -> bool {
    fragment.len() >= MIN_FRAGMENT_CHARS
        && LETTER.is_match(fragment)
        && !NUMERIC_ONLY.is_match(fragment)
        && fragment.is_ascii()
}

/// Text-operator fragment that reads like text.
fn is_operator_text(fragment: &str) -> bool {
    fragment.len() >= MIN_FRAGMENT_CHARS && LETTER.is_match(fragment) && fragment.is_ascii()
}

/// Strategy running [`HeuristicExtractor`] over the whole payload.
pub struct HeuristicStrategy {
    extractor: HeuristicExtractor,
    min_chars: usize,
}

impl HeuristicStrategy {
    pub fn new(min_chars: usize) -> Self {
        Self {
            extractor: HeuristicExtractor::new(),
            min_chars,
        }
    }
}

#[async_trait]
impl ExtractionStrategy for HeuristicStrategy {
    fn name(&self) -> &str {
        "byte-heuristic"
    }

    fn applies_to(&self, kind: DocumentKind) -> bool {
        kind.is_pdf()
    }

    async fn attempt(&self, ctx: &mut ExtractionContext<'_>) -> StrategyOutcome {
        ctx.progress.report(50.0, LABEL_BYTE_SCAN);

        let text = self.extractor.extract(ctx.document.bytes());
        ctx.progress.advance(75.0);

        if text.len() < self.min_chars {
            info!(chars = text.len(), min = self.min_chars, "Byte scan found too little text");
            return StrategyOutcome::Empty;
        }

        info!(chars = text.len(), "Byte scan recovered text");
        ctx.replace_with_single(Page::new(1, text, PageSource::Heuristic));
        StrategyOutcome::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracketed_and_quoted_fragments() {
        let raw = br#"%PDF-1.4 <</Title (Annual Report)>> <"quoted words here"> <'12345'> <(a)> <'single ones'>"#;
        let text = HeuristicExtractor::new().extract(raw);
        assert_eq!(text, "Annual Report quoted words here single ones");
    }

    #[test]
    fn test_rejects_numbers_and_non_ascii() {
        let raw = "(1,234.56) (caf\u{e9} menu) (12 34 56)".as_bytes();
        assert_eq!(HeuristicExtractor::new().extract(raw), "");
    }

    #[test]
    fn test_text_operator_forms() {
        let raw = b"BT /F1 12 Tf (Hello there) Tj ET";
        let text = HeuristicExtractor::new().extract(raw);
        // Found once as a bracketed fragment and once as a Tj operand.
        assert_eq!(text, "Hello there Hello there");

        let raw = b"BT Plain words ET";
        assert_eq!(HeuristicExtractor::new().extract(raw), "Plain words");
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut raw = vec![0xFF, 0xFE, 0x00];
        raw.extend_from_slice(b"(Readable text)");
        assert_eq!(HeuristicExtractor::new().extract(&raw), "Readable text");
    }
}
