//! Finds existing `console.log(...)` calls.

use serde::Serialize;

use crate::position::{Position, byte_to_position};
use crate::syntax::{NodeKind, SyntaxNode, SyntaxTree};

const PRINT_OBJECT: &str = "console";
const PRINT_MEMBER: &str = "log";

/// One print call occurrence in the parsed buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrintCallSpan {
    /// Byte offset of the call
    pub start: usize,
    /// Exclusive end, including a directly trailing `;`
    pub end: usize,
    /// 1-indexed line of `start`
    pub line: usize,
    /// 1-indexed column of `start`
    pub column: usize,
    /// Text covered by `start..end`
    pub full_text: String,
}

impl PrintCallSpan {
    pub fn start_position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// 1-indexed position of `end` within `content`
    pub fn end_position(&self, content: &str) -> Position {
        byte_to_position(content, self.end)
    }
}

/// Whether `node` is a call of the form `console.log(...)`
fn is_print_call(node: &SyntaxNode<'_>) -> bool {
    if node.kind() != NodeKind::CallExpression {
        return false;
    }
    let Some(callee) = node.field("function") else {
        return false;
    };
    if callee.kind() != NodeKind::PropertyAccessExpression {
        return false;
    }

    let object = callee.field("object").map(|n| n.text());
    let member = callee.field("property").map(|n| n.text());
    object == Some(PRINT_OBJECT) && member == Some(PRINT_MEMBER)
}

/// Every print call in the tree, sorted by start offset
///
/// A matched call is not searched for nested print calls, so the spans never
/// overlap.
pub fn find_all(tree: &SyntaxTree<'_>) -> Vec<PrintCallSpan> {
    let source = tree.source();
    let mut spans = Vec::new();
    let mut stack = vec![tree.root()];

    while let Some(node) = stack.pop() {
        if is_print_call(&node) {
            let start = node.start();
            let mut end = node.end();
            if source.as_bytes().get(end) == Some(&b';') {
                end += 1;
            }

            let position = node.start_position();
            spans.push(PrintCallSpan {
                start,
                end,
                line: position.line,
                column: position.column,
                full_text: source[start..end].to_string(),
            });
            continue;
        }

        stack.extend(node.named_children().into_iter().rev());
    }

    tracing::debug!(count = spans.len(), "located print calls");
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::{Edit, apply_edits, compute_checksum};
    use crate::language::Grammar;

    fn find(source: &str) -> Vec<PrintCallSpan> {
        find_all(&SyntaxTree::parse(source, Grammar::TypeScript).unwrap())
    }

    fn delete_all(source: &str, spans: &[PrintCallSpan]) -> String {
        let edits: Vec<Edit> = spans
            .iter()
            .map(|span| Edit::delete(span.start, span.end))
            .collect();
        apply_edits(source, &compute_checksum(source), &edits)
            .unwrap()
            .content
    }

    #[test]
    fn test_span_includes_trailing_semicolon() {
        let source = "console.log(\"x\");let y = 1;";
        let spans = find(source);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[0].end, 17);
        assert_eq!(spans[0].full_text, "console.log(\"x\");");

        let after = delete_all(source, &spans);
        assert_eq!(after, "let y = 1;");
    }

    #[test]
    fn test_span_without_semicolon() {
        let source = "if (ok) console.log(ok)\nnext()";
        let spans = find(source);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].full_text, "console.log(ok)");
        assert_eq!(spans[0].start_position(), Position { line: 1, column: 9 });
    }

    #[test]
    fn test_positions_and_order() {
        let source = "function f() {\n  console.log(a);\n  if (b) {\n    console.log(b);\n  }\n}\nconsole.log(c);\n";
        let spans = find(source);

        let positions: Vec<(usize, usize)> = spans.iter().map(|s| (s.line, s.column)).collect();
        assert_eq!(positions, vec![(2, 3), (4, 5), (7, 1)]);
        assert!(spans.windows(2).all(|w| w[0].end <= w[1].start));
        assert_eq!(spans[2].end_position(source), Position { line: 7, column: 16 });
    }

    #[test]
    fn test_ignores_other_calls() {
        let source = "console.warn(1);\nlogger.log(2);\nlog(3);\nconsole['log'](4);\nconsole.log;\n";
        assert!(find(source).is_empty());
    }

    #[test]
    fn test_nested_calls_do_not_overlap() {
        let source = "console.log(console.log(1));";
        let spans = find(source);

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end, source.len());
    }

    #[test]
    fn test_deleting_all_is_idempotent() {
        let source = "const a = 1;\nconsole.log(a);\nwatch(() => { console.log('w'); });\nconsole.log(\n  'multi',\n  a\n)\nexport { a };\n";
        let spans = find(source);
        assert_eq!(spans.len(), 3);

        let after = delete_all(source, &spans);
        assert!(find(&after).is_empty());
        assert!(after.contains("export { a };"));
        assert!(after.contains("watch(() => {  });"));
    }

    #[test]
    fn test_malformed_input_terminates() {
        let spans = find("console.log(1;\n}}} console.log(2);");
        assert!(spans.iter().all(|s| s.full_text.starts_with("console.log")));
    }
}
