use thiserror::Error;

/// A byte-level text edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Byte offset where the edit starts (inclusive)
    pub byte_start: usize,
    /// Byte offset where the edit ends (exclusive)
    pub byte_end: usize,
    /// Replacement text
    pub replacement: String,
}

impl Edit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            byte_start: offset,
            byte_end: offset,
            replacement: text.into(),
        }
    }

    pub fn delete(byte_start: usize, byte_end: usize) -> Self {
        Self {
            byte_start,
            byte_end,
            replacement: String::new(),
        }
    }

    fn byte_shift(&self) -> i64 {
        self.replacement.len() as i64 - (self.byte_end - self.byte_start) as i64
    }
}

/// Result of applying a batch of edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchResult {
    /// Content after every edit was applied
    pub content: String,
    /// Checksum of `content`
    pub checksum: String,
    /// Total byte shift across all edits
    pub byte_shift: i64,
    /// Number of edits applied
    pub applied: usize,
}

/// Error types for edit operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Byte span {byte_start}..{byte_end} out of bounds (content length: {content_len})")]
    OutOfBounds {
        byte_start: usize,
        byte_end: usize,
        content_len: usize,
    },
    #[error("Invalid span: end ({byte_end}) < start ({byte_start})")]
    InvalidSpan { byte_start: usize, byte_end: usize },
    #[error("Byte offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
    #[error("Edits overlap: {first_start}..{first_end} and {second_start}..{second_end}")]
    Overlapping {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

/// BLAKE3 checksum of `content`, hex-encoded
pub fn compute_checksum(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

/// Verify that content matches the expected checksum
pub fn verify_checksum(content: &str, expected_checksum: &str) -> Result<(), EditError> {
    let actual = compute_checksum(content);
    if actual == expected_checksum {
        Ok(())
    } else {
        Err(EditError::ChecksumMismatch {
            expected: expected_checksum.to_string(),
            actual,
        })
    }
}

/// Validate an edit's byte span against content
///
/// Empty spans are insertions and are valid.
pub fn validate_edit_span(edit: &Edit, content: &str) -> Result<(), EditError> {
    let content_len = content.len();

    if edit.byte_end < edit.byte_start {
        return Err(EditError::InvalidSpan {
            byte_start: edit.byte_start,
            byte_end: edit.byte_end,
        });
    }

    if edit.byte_end > content_len {
        return Err(EditError::OutOfBounds {
            byte_start: edit.byte_start,
            byte_end: edit.byte_end,
            content_len,
        });
    }

    for offset in [edit.byte_start, edit.byte_end] {
        if !content.is_char_boundary(offset) {
            return Err(EditError::NotCharBoundary { offset });
        }
    }

    Ok(())
}

/// Sort edits for back-to-front application
///
/// Edits are applied from the highest offset down so earlier offsets stay
/// valid. At equal starts the longer span goes first, which puts a deletion
/// ahead of an insertion at the same offset.
pub fn sort_edits_descending(edits: &[Edit]) -> Vec<Edit> {
    let mut sorted = edits.to_vec();
    sorted.sort_by(|a, b| {
        b.byte_start
            .cmp(&a.byte_start)
            .then(b.byte_end.cmp(&a.byte_end))
    });
    sorted
}

fn check_overlaps(sorted_descending: &[Edit]) -> Result<(), EditError> {
    for pair in sorted_descending.windows(2) {
        let (later, earlier) = (&pair[0], &pair[1]);
        if earlier.byte_end > later.byte_start {
            return Err(EditError::Overlapping {
                first_start: earlier.byte_start,
                first_end: earlier.byte_end,
                second_start: later.byte_start,
                second_end: later.byte_end,
            });
        }
    }
    Ok(())
}

/// Apply a batch of edits, all or nothing
///
/// Every edit is expressed in offsets of the original `content`. The batch
/// is rejected before any edit is applied when the checksum does not match,
/// a span is invalid, or two spans overlap.
pub fn apply_edits(
    content: &str,
    expected_checksum: &str,
    edits: &[Edit],
) -> Result<BatchResult, EditError> {
    verify_checksum(content, expected_checksum)?;

    for edit in edits {
        validate_edit_span(edit, content)?;
    }

    let sorted = sort_edits_descending(edits);
    check_overlaps(&sorted)?;

    let mut current = content.to_string();
    let mut byte_shift = 0i64;
    for edit in &sorted {
        current.replace_range(edit.byte_start..edit.byte_end, &edit.replacement);
        byte_shift += edit.byte_shift();
    }

    Ok(BatchResult {
        checksum: compute_checksum(&current),
        content: current,
        byte_shift,
        applied: sorted.len(),
    })
}
