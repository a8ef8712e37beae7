//! Isolates the analyzable script text of a document.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::language::FileKind;

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<script[^>]*>([\s\S]*?)</script>").expect("script block pattern is valid")
});

/// Script text embedded in a larger templating document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddedRegion<'a> {
    /// Text between the opening tag's `>` and `</script>`
    pub content: &'a str,
    /// Byte offset of `content` in the outer document
    pub absolute_start_offset: usize,
}

/// The text a command parses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptText<'a> {
    /// The whole document is script
    Document(&'a str),
    /// Only a region of the document is script
    Embedded(EmbeddedRegion<'a>),
}

impl<'a> ScriptText<'a> {
    pub fn content(&self) -> &'a str {
        match self {
            ScriptText::Document(text) => text,
            ScriptText::Embedded(region) => region.content,
        }
    }

    pub fn region(&self) -> Option<&EmbeddedRegion<'a>> {
        match self {
            ScriptText::Document(_) => None,
            ScriptText::Embedded(region) => Some(region),
        }
    }

    /// Absolute document offset of the first content byte
    pub fn start_offset(&self) -> usize {
        self.region().map_or(0, |region| region.absolute_start_offset)
    }

    /// Map an absolute document offset into the content, if it falls inside
    pub fn relative_offset(&self, document_offset: usize) -> Option<usize> {
        let relative = document_offset.checked_sub(self.start_offset())?;
        (relative <= self.content().len()).then_some(relative)
    }
}

/// Locate the first `<script ...>...</script>` block of a templating document
pub fn extract_embedded(text: &str) -> Option<EmbeddedRegion<'_>> {
    let body = SCRIPT_BLOCK.captures(text)?.get(1)?;
    Some(EmbeddedRegion {
        content: body.as_str(),
        absolute_start_offset: body.start(),
    })
}

/// Isolate the analyzable text of a document of the given kind
///
/// Returns `None` when a templating document has no script block.
pub fn extract_script(text: &str, kind: FileKind) -> Option<ScriptText<'_>> {
    if kind.is_templating() {
        let region = extract_embedded(text);
        if region.is_none() {
            tracing::debug!(%kind, "no script block in templating document");
        }
        region.map(ScriptText::Embedded)
    } else {
        Some(ScriptText::Document(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SFC: &str = "<template>\n  <div>{{ msg }}</div>\n</template>\n<script setup lang=\"ts\">\nconst msg = 'hi';\n</script>\n";

    #[test]
    fn test_extract_vue_script_block() {
        let script = extract_script(SFC, FileKind::Vue).unwrap();
        let region = script.region().unwrap();

        assert_eq!(region.content, "\nconst msg = 'hi';\n");
        assert_eq!(&SFC[region.absolute_start_offset..][..1], "\n");
        assert_eq!(&SFC[..region.absolute_start_offset], &SFC[..SFC.find("ts\">").unwrap() + 4]);
    }

    #[test]
    fn test_extract_takes_first_block() {
        let text = "<script>a()</script>\n<script setup>b()</script>";
        let region = extract_embedded(text).unwrap();
        assert_eq!(region.content, "a()");
        assert_eq!(region.absolute_start_offset, 8);
    }

    #[test]
    fn test_vue_without_script_has_no_content() {
        assert_eq!(extract_script("<template><p/></template>", FileKind::Vue), None);
    }

    #[test]
    fn test_script_file_is_whole_document() {
        let text = "const a = 1;";
        let script = extract_script(text, FileKind::Ts).unwrap();
        assert_eq!(script, ScriptText::Document(text));
        assert_eq!(script.start_offset(), 0);
        assert!(script.region().is_none());
    }

    #[test]
    fn test_relative_offset() {
        let script = extract_script(SFC, FileKind::Vue).unwrap();
        let start = script.start_offset();

        assert_eq!(script.relative_offset(start + 3), Some(3));
        assert_eq!(script.relative_offset(start - 1), None);
        assert_eq!(script.relative_offset(SFC.len()), None);
    }
}
