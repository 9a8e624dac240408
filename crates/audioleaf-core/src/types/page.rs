//! Pages and the extraction result handed to presentation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator between page texts in [`ExtractionResult::full_text`].
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Where a page's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSource {
    /// Read from the document's native text layer.
    Parsed,
    /// Produced by the OCR engine from a rendered bitmap.
    Recognized,
    /// Recovered by scanning raw bytes. Lower confidence.
    Heuristic,
    /// Explanatory text standing in for content that could not be read.
    Diagnostic,
}

/// A single page of extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based page number.
    pub page_number: u32,
    pub text: String,
    pub source: PageSource,
}

impl Page {
    pub fn new(page_number: u32, text: impl Into<String>, source: PageSource) -> Self {
        Self {
            page_number,
            text: text.into(),
            source,
        }
    }

    pub fn parsed(page_number: u32, text: impl Into<String>) -> Self {
        Self::new(page_number, text, PageSource::Parsed)
    }

    pub fn diagnostic(page_number: u32, text: impl Into<String>) -> Self {
        Self::new(page_number, text, PageSource::Diagnostic)
    }

    /// True when the page has no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// True when the text was actually read from the document rather than
    /// guessed or substituted.
    pub fn is_genuine(&self) -> bool {
        matches!(self.source, PageSource::Parsed | PageSource::Recognized)
    }

    /// Replace this page's text with a later strategy's result.
    pub fn supersede(&mut self, text: impl Into<String>, source: PageSource) {
        self.text = text.into();
        self.source = source;
    }
}

/// Final output of a successful extraction.
///
/// `full_text` is always the page texts joined by a blank line and
/// `total_pages` always equals `pages.len()`; both are derived on
/// construction so the two can never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    full_text: String,
    pages: Vec<Page>,
    total_pages: u32,
    strategy: String,
}

impl ExtractionResult {
    /// Build a result from pages in physical order.
    pub fn from_pages(pages: Vec<Page>, strategy: impl Into<String>) -> Self {
        debug_assert!(
            pages
                .iter()
                .enumerate()
                .all(|(i, p)| p.page_number as usize == i + 1),
            "pages must be numbered contiguously from 1"
        );

        let full_text = pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR);

        Self {
            full_text,
            total_pages: pages.len() as u32,
            pages,
            strategy: strategy.into(),
        }
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Name of the strategy that completed extraction.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Page with the given 1-based number.
    pub fn page(&self, page_number: u32) -> Option<&Page> {
        page_number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
    }

    /// How many pages came from each source.
    pub fn source_counts(&self) -> BTreeMap<PageSource, usize> {
        let mut counts = BTreeMap::new();
        for page in &self.pages {
            *counts.entry(page.source).or_insert(0) += 1;
        }
        counts
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
