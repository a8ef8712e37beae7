//! Turns classifier and locator output into document edits.

use serde::Serialize;

use crate::classify::LogTarget;
use crate::edit::Edit;
use crate::locate::PrintCallSpan;
use crate::position::{DocumentPosition, DocumentRange, PositionTranslator, position_to_offset};

/// An edit in document-absolute coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DocumentEdit {
    Insert { position: DocumentPosition, text: String },
    Delete { range: DocumentRange },
}

impl DocumentEdit {
    /// Resolve against the document text the edit was computed from
    ///
    /// An insertion below the last line lands at the end of the document,
    /// on a line of its own.
    pub fn to_byte_edit(&self, document: &str) -> Edit {
        match self {
            DocumentEdit::Insert { position, text } => match position_to_offset(document, *position) {
                Some(offset) => Edit::insert(offset, text.as_str()),
                None if document.is_empty() || document.ends_with('\n') => {
                    Edit::insert(document.len(), text.as_str())
                }
                None => Edit::insert(document.len(), format!("\n{text}")),
            },
            DocumentEdit::Delete { range } => {
                let start = position_to_offset(document, range.start).unwrap_or(document.len());
                let end = position_to_offset(document, range.end).unwrap_or(document.len());
                Edit::delete(start, end)
            }
        }
    }
}

/// Escape text for a double-quoted string literal
fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// The statement inserted for a classified selection
///
/// `label` is the enclosing function name, or `line:N` for the 1-indexed
/// document line the statement lands on.
pub fn statement_text(
    target: &LogTarget,
    raw_text: &str,
    function_name: Option<&str>,
    document_line: usize,
    suffix: &str,
) -> String {
    let label = match function_name {
        Some(name) => name.to_string(),
        None => format!("line:{}", document_line + 1),
    };
    let message = escape_literal(&format!("🚀 ~ {label} ~ {raw_text}:{suffix}"));
    format!("console.log(\"{message}\", {});\n", target.expression_or(raw_text))
}

/// Insertion edit for a classified selection
pub fn insertion(
    target: &LogTarget,
    raw_text: &str,
    function_name: Option<&str>,
    suffix: &str,
    translator: &PositionTranslator,
) -> DocumentEdit {
    let position = translator.translate(target.insertion_line, 0);
    DocumentEdit::Insert {
        text: statement_text(target, raw_text, function_name, position.line, suffix),
        position,
    }
}

/// Document range covered by a located span
pub fn span_range(span: &PrintCallSpan, content: &str, translator: &PositionTranslator) -> DocumentRange {
    DocumentRange {
        start: translator.translate_position(span.start_position()),
        end: translator.translate_position(span.end_position(content)),
    }
}

/// Ranges to highlight before deleting
pub fn highlight_ranges(
    spans: &[PrintCallSpan],
    content: &str,
    translator: &PositionTranslator,
) -> Vec<DocumentRange> {
    spans
        .iter()
        .map(|span| span_range(span, content, translator))
        .collect()
}

/// One deletion per span, all computed from pre-edit offsets
///
/// The host must apply the result as a single batch.
pub fn deletions(
    spans: &[PrintCallSpan],
    content: &str,
    translator: &PositionTranslator,
) -> Vec<DocumentEdit> {
    highlight_ranges(spans, content, translator)
        .into_iter()
        .map(|range| DocumentEdit::Delete { range })
        .collect()
}
