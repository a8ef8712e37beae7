use serde::Serialize;

use crate::region::EmbeddedRegion;

/// Position inside a parsed script buffer (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed, in bytes)
    pub column: usize,
}

/// Position inside the host document
///
/// Both fields are 0-indexed, columns count bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DocumentPosition {
    pub line: usize,
    pub character: usize,
}

impl DocumentPosition {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Half-open range of document positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentRange {
    pub start: DocumentPosition,
    pub end: DocumentPosition,
}

/// Convert a byte offset to line and column position
///
/// # Arguments
/// * `content` - The buffer the offset points into
/// * `byte_offset` - The byte offset to convert
///
/// # Returns
/// * `Position` with line and column (both 1-indexed)
/// * Offsets past the end resolve against the last line
pub fn byte_to_position(content: &str, byte_offset: usize) -> Position {
    let offset = byte_offset.min(content.len());
    let before = &content.as_bytes()[..offset];

    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |idx| idx + 1);

    Position {
        line,
        column: offset - line_start + 1,
    }
}

/// Convert a byte offset to a 0-indexed document position
pub fn offset_to_position(content: &str, byte_offset: usize) -> DocumentPosition {
    let pos = byte_to_position(content, byte_offset);
    DocumentPosition::new(pos.line - 1, pos.column - 1)
}

/// Convert a document position back to a byte offset
///
/// Columns past the end of the line clamp to the line end.
/// Returns `None` when the line does not exist.
pub fn position_to_offset(content: &str, position: DocumentPosition) -> Option<usize> {
    let mut line_start = 0;
    for _ in 0..position.line {
        let newline = content[line_start..].find('\n')?;
        line_start += newline + 1;
    }

    let line_end = content[line_start..]
        .find('\n')
        .map_or(content.len(), |idx| line_start + idx);

    Some((line_start + position.character).min(line_end))
}

/// Maps tree-relative coordinates onto the host document
///
/// For an embedded region only line 0 of the extracted content shares a
/// physical line with the opening tag, so only that line gets the column
/// shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionTranslator {
    base: Option<DocumentPosition>,
}

impl PositionTranslator {
    /// Translator for a buffer that is the whole document
    pub fn identity() -> Self {
        Self { base: None }
    }

    /// Translator for a region of `document`
    pub fn for_region(document: &str, region: &EmbeddedRegion<'_>) -> Self {
        Self {
            base: Some(offset_to_position(document, region.absolute_start_offset)),
        }
    }

    pub fn new(document: &str, region: Option<&EmbeddedRegion<'_>>) -> Self {
        match region {
            Some(region) => Self::for_region(document, region),
            None => Self::identity(),
        }
    }

    /// Translate a 0-indexed tree-relative position into the document
    pub fn translate(&self, line: usize, column: usize) -> DocumentPosition {
        match self.base {
            None => DocumentPosition::new(line, column),
            Some(base) if line == 0 => DocumentPosition::new(base.line, base.character + column),
            Some(base) => DocumentPosition::new(base.line + line, column),
        }
    }

    /// Translate a 1-indexed tree position into the document
    pub fn translate_position(&self, position: Position) -> DocumentPosition {
        self.translate(position.line - 1, position.column - 1)
    }

    /// Inverse of `translate` for whole lines
    ///
    /// Returns `None` for document lines above the region.
    pub fn relative_line(&self, document_line: usize) -> Option<usize> {
        match self.base {
            None => Some(document_line),
            Some(base) => document_line.checked_sub(base.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_to_position_start() {
        let content = "Hello\nWorld";
        let pos = byte_to_position(content, 0);

        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
    }

    #[test]
    fn test_byte_to_position_after_newline() {
        let content = "Hello\nWorld";
        // H=0 e=1 l=2 l=3 o=4 \n=5 W=6
        let pos = byte_to_position(content, 6);

        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
    }

    #[test]
    fn test_byte_to_position_end_of_buffer() {
        let content = "ab\ncd";
        assert_eq!(byte_to_position(content, 5), Position { line: 2, column: 3 });
    }

    #[test]
    fn test_byte_to_position_past_end_clamps() {
        let content = "ab\ncd";
        assert_eq!(byte_to_position(content, 99), Position { line: 2, column: 3 });
        assert_eq!(offset_to_position(content, 99), DocumentPosition::new(1, 2));
    }

    #[test]
    fn test_offset_round_trip_crlf() {
        let content = "a\r\nbc\r\n";
        let pos = offset_to_position(content, 4);
        assert_eq!(pos, DocumentPosition::new(1, 1));
        assert_eq!(position_to_offset(content, pos), Some(4));
    }

    #[test]
    fn test_position_to_offset_clamps_column() {
        let content = "ab\ncd";
        assert_eq!(position_to_offset(content, DocumentPosition::new(0, 10)), Some(2));
        assert_eq!(position_to_offset(content, DocumentPosition::new(1, 0)), Some(3));
        assert_eq!(position_to_offset(content, DocumentPosition::new(2, 0)), None);
    }

    #[test]
    fn test_identity_translation() {
        let translator = PositionTranslator::identity();
        for (line, column) in [(0, 0), (0, 7), (3, 2), (12, 0)] {
            assert_eq!(translator.translate(line, column), DocumentPosition::new(line, column));
        }
        assert_eq!(translator.relative_line(4), Some(4));
    }

    #[test]
    fn test_region_translation_shifts_first_line_only() {
        let document = "<template>\n</template>\n\n  <script>  console.log(1)</script>\n";
        let region = EmbeddedRegion {
            content: "",
            absolute_start_offset: document.find("<script>").unwrap() + "<script>".len(),
        };
        let translator = PositionTranslator::for_region(document, &region);

        assert_eq!(translator.translate(0, 2), DocumentPosition::new(3, 12));
        assert_eq!(translator.translate(2, 4), DocumentPosition::new(5, 4));
        assert_eq!(translator.relative_line(5), Some(2));
        assert_eq!(translator.relative_line(1), None);
    }
}
