//! DOCX text extraction using docx-rs.
//!
//! Paragraphs and table cells are collected in document order. Legacy
//! binary `.doc` files are not readable by docx-rs and are rejected.

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};

use audioleaf_core::{EngineError, WordFormat, WordParser};

/// Word parser using the docx-rs library.
#[derive(Debug, Clone)]
pub struct DocxParser {
    /// Render table rows as `a | b | c` lines instead of one line per cell.
    preserve_tables: bool,
}

impl DocxParser {
    pub fn new() -> Self {
        Self {
            preserve_tables: true,
        }
    }

    /// Configure whether to keep table rows together.
    pub fn with_tables(mut self, preserve: bool) -> Self {
        self.preserve_tables = preserve;
        self
    }

    fn paragraph_text(p: &Paragraph) -> String {
        let mut text = String::new();
        for child in &p.children {
            match child {
                ParagraphChild::Run(r) => {
                    for run_child in &r.children {
                        match run_child {
                            RunChild::Text(t) => text.push_str(&t.text),
                            RunChild::Tab(_) => text.push('\t'),
                            RunChild::Break(_) => text.push('\n'),
                            _ => {}
                        }
                    }
                }
                ParagraphChild::Hyperlink(h) => {
                    for child in &h.children {
                        if let ParagraphChild::Run(r) = child {
                            for run_child in &r.children {
                                if let RunChild::Text(t) = run_child {
                                    text.push_str(&t.text);
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }
        text
    }

    fn cell_texts(t: &Table) -> Vec<Vec<String>> {
        t.rows
            .iter()
            .map(|row| {
                let TableChild::TableRow(r) = row;
                r.cells
                    .iter()
                    .map(|cell| {
                        let TableRowChild::TableCell(c) = cell;
                        c.children
                            .iter()
                            .filter_map(|child| match child {
                                TableCellContent::Paragraph(p) => Some(Self::paragraph_text(p)),
                                _ => None,
                            })
                            .filter(|s| !s.trim().is_empty())
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .collect()
            })
            .collect()
    }

    fn read(&self, bytes: &[u8]) -> Result<String, EngineError> {
        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| EngineError::Failed(format!("Failed to parse DOCX: {e}")))?;

        let mut parts: Vec<String> = Vec::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => {
                    let text = Self::paragraph_text(p);
                    if !text.trim().is_empty() {
                        parts.push(text);
                    }
                }
                DocumentChild::Table(t) => {
                    let rows = Self::cell_texts(t);
                    if self.preserve_tables {
                        parts.extend(
                            rows.iter()
                                .map(|cells| cells.join(" | "))
                                .filter(|line| !line.replace('|', "").trim().is_empty()),
                        );
                    } else {
                        parts.extend(rows.into_iter().flatten().filter(|c| !c.is_empty()));
                    }
                }
                _ => {}
            }
        }

        Ok(parts.join("\n"))
    }
}

impl Default for DocxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl WordParser for DocxParser {
    fn extract_text(&self, bytes: &[u8], format: WordFormat) -> Result<String, EngineError> {
        match format {
            WordFormat::Docx => self.read(bytes),
            WordFormat::LegacyDoc => Err(EngineError::Unsupported(
                "legacy .doc files cannot be read; save the document as .docx".to_string(),
            )),
        }
    }

    fn name(&self) -> &str {
        "docx-rs"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use docx_rs::{Docx, Run, TableCell, TableRow};

    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut cursor = std::io::Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_reads_paragraphs() {
        let bytes = build_docx(&["Chapter one", "", "It was a quiet morning."]);
        let text = DocxParser::new()
            .extract_text(&bytes, WordFormat::Docx)
            .unwrap();
        assert_eq!(text, "Chapter one\nIt was a quiet morning.");
    }

    #[test]
    fn test_reads_tables() {
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Name"))),
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Asha"))),
        ])]);
        let mut cursor = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Roster")))
            .add_table(table)
            .build()
            .pack(&mut cursor)
            .unwrap();
        let bytes = cursor.into_inner();

        let text = DocxParser::new()
            .extract_text(&bytes, WordFormat::Docx)
            .unwrap();
        assert_eq!(text, "Roster\nName | Asha");

        let flat = DocxParser::new()
            .with_tables(false)
            .extract_text(&bytes, WordFormat::Docx)
            .unwrap();
        assert_eq!(flat, "Roster\nName\nAsha");
    }

    #[test]
    fn test_rejects_legacy_doc_and_garbage() {
        let parser = DocxParser::new();
        assert!(matches!(
            parser.extract_text(b"\xD0\xCF\x11\xE0", WordFormat::LegacyDoc),
            Err(EngineError::Unsupported(_))
        ));
        assert!(parser.extract_text(&[], WordFormat::Docx).is_err());
    }
}
