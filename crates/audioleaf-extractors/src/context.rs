//! State threaded through the strategy chain for one document.

use audioleaf_core::{Document, DocumentKind, ExtractionConfig, Page};

use crate::error::ExtractError;
use crate::progress::ProgressTracker;

/// Result of one strategy attempt.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// The strategy produced the final page set; stop the chain.
    Complete,
    /// Nothing usable; try the next strategy.
    Empty,
    /// The strategy failed. Fatal errors end extraction, others are logged
    /// and the chain continues.
    Failed(ExtractError),
}

/// Mutable working state shared by the strategies of one run.
///
/// `pages` holds whatever the most recent strategy produced. A strategy
/// that returns `Empty` may still leave pages behind (the text layer leaves
/// one blank page per physical page) so later strategies know the page
/// count and can fill pages in place.
pub struct ExtractionContext<'a> {
    pub document: &'a Document,
    pub kind: DocumentKind,
    pub config: &'a ExtractionConfig,
    pub pages: Vec<Page>,
    pub progress: ProgressTracker,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(
        document: &'a Document,
        kind: DocumentKind,
        config: &'a ExtractionConfig,
        progress: ProgressTracker,
    ) -> Self {
        Self {
            document,
            kind,
            config,
            pages: Vec::new(),
            progress,
        }
    }

    /// Number of physical pages discovered so far, if any strategy found them.
    pub fn known_page_count(&self) -> Option<u32> {
        if self.pages.is_empty() {
            None
        } else {
            Some(self.pages.len() as u32)
        }
    }

    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|p| !p.is_blank())
    }

    /// Replace the page set with a single document-level page.
    pub fn replace_with_single(&mut self, page: Page) {
        self.pages = vec![page];
    }
}
