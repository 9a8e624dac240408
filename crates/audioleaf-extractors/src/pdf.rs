//! PDF text-layer parsing using lopdf.
//!
//! Collects the string operands of the text-showing operators (`Tj`, `TJ`,
//! `'` and `"`) from each page's content stream. No layout reconstruction
//! is attempted; tokens come back in content-stream order.

use lopdf::content::Content;
use lopdf::{Object, ObjectId};

use audioleaf_core::{DocumentParser, EngineError, ParsedDocument};

/// Kerning adjustment (thousandths of an em) treated as a word gap in `TJ`.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// PDF parser using the lopdf library.
#[derive(Debug, Clone, Default)]
pub struct LopdfParser;

impl LopdfParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for LopdfParser {
    fn parse(&self, bytes: &[u8]) -> Result<Box<dyn ParsedDocument>, EngineError> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| EngineError::Failed(format!("Failed to parse PDF: {e}")))?;
        let pages = doc.get_pages().into_values().collect();

        Ok(Box::new(LopdfDocument { doc, pages }))
    }

    fn name(&self) -> &str {
        "lopdf"
    }
}

struct LopdfDocument {
    doc: lopdf::Document,
    /// Page object ids in page order.
    pages: Vec<ObjectId>,
}

impl ParsedDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_tokens(&self, page_number: u32) -> Result<Vec<String>, EngineError> {
        let page_id = page_number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .ok_or_else(|| EngineError::Failed(format!("Page {page_number} does not exist")))?;

        let data = self
            .doc
            .get_page_content(*page_id)
            .map_err(|e| EngineError::Failed(format!("Page {page_number}: {e}")))?;
        let content = Content::decode(&data)
            .map_err(|e| EngineError::Failed(format!("Page {page_number}: {e}")))?;

        Ok(content
            .operations
            .iter()
            .filter_map(|op| match op.operator.as_str() {
                "Tj" | "'" => op.operands.first().and_then(string_operand),
                "\"" => op.operands.get(2).and_then(string_operand),
                "TJ" => op.operands.first().map(array_operand),
                _ => None,
            })
            .filter(|token| !token.trim().is_empty())
            .collect())
    }
}

fn string_operand(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

fn array_operand(object: &Object) -> String {
    let Object::Array(items) = object else {
        return String::new();
    };

    let mut combined = String::new();
    for item in items {
        let adjustment = match item {
            Object::String(bytes, _) => {
                combined.push_str(&decode_pdf_string(bytes));
                continue;
            }
            Object::Integer(n) => -(*n as f32),
            Object::Real(n) => -(*n as f32),
            _ => continue,
        };
        if adjustment > TJ_SPACE_THRESHOLD && !combined.is_empty() && !combined.ends_with(' ') {
            combined.push(' ');
        }
    }
    combined
}

/// Decode a PDF string: UTF-16BE when it carries a byte-order mark,
/// otherwise one char per byte.
fn decode_pdf_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| b as char).collect(),
    }
}
