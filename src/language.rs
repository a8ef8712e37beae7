use serde::{Deserialize, Serialize};
use std::path::Path;

/// File kinds the engine can analyze
///
/// Every variant except `Vue` is a plain script file whose whole text is
/// parsed. `Vue` is a templating file: only its first `<script>` block is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Vue single-file component (.vue)
    Vue,
    /// TypeScript (.ts)
    Ts,
    /// JavaScript (.js)
    Js,
    /// TypeScript with JSX (.tsx)
    Tsx,
    /// JavaScript with JSX (.jsx)
    Jsx,
}

/// Tree-sitter grammar used to parse a file kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    TypeScript,
    Tsx,
    JavaScript,
}

impl FileKind {
    pub const ALL: [FileKind; 5] = [
        FileKind::Vue,
        FileKind::Ts,
        FileKind::Js,
        FileKind::Tsx,
        FileKind::Jsx,
    ];

    /// The extension (without the dot) that selects this kind
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Vue => "vue",
            FileKind::Ts => "ts",
            FileKind::Js => "js",
            FileKind::Tsx => "tsx",
            FileKind::Jsx => "jsx",
        }
    }

    /// Whether analyzable script lives inside a region of the document
    pub fn is_templating(&self) -> bool {
        matches!(self, FileKind::Vue)
    }

    /// Grammar for the analyzable text of this kind
    ///
    /// Vue script blocks may be `lang="ts"` or plain JavaScript; the
    /// TypeScript grammar accepts both.
    pub fn grammar(&self) -> Grammar {
        match self {
            FileKind::Vue | FileKind::Ts => Grammar::TypeScript,
            FileKind::Tsx => Grammar::Tsx,
            FileKind::Js | FileKind::Jsx => Grammar::JavaScript,
        }
    }

    /// Pipe-separated list of supported extensions, for user messages
    pub fn supported_list() -> String {
        FileKind::ALL
            .iter()
            .map(|kind| format!(".{}", kind.extension()))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Detect the file kind from a file path
///
/// The extension is matched case-insensitively. Any other extension
/// yields `None`.
///
/// # Examples
/// ```
/// use smart_log::{FileKind, detect_file_kind};
/// assert_eq!(detect_file_kind("App.vue"), Some(FileKind::Vue));
/// assert_eq!(detect_file_kind("index.TS"), Some(FileKind::Ts));
/// assert_eq!(detect_file_kind("main.rs"), None);
/// ```
pub fn detect_file_kind<P: AsRef<Path>>(path: P) -> Option<FileKind> {
    let extension = path
        .as_ref()
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();

    FileKind::ALL
        .into_iter()
        .find(|kind| kind.extension() == extension)
}
