//! Decides where a print statement goes and what it prints.
//!
//! The decision is keyed on the kind of the selected node's logical parent:
//!
//! | parent                  | printed expression        | insertion line                   |
//! |-------------------------|---------------------------|----------------------------------|
//! | property assignment     | `decl.key.key`            | after the enclosing declaration  |
//! | property access         | `decl...` or `a.b.c`      | after the declaration, or above  |
//! | variable declaration    | selection                 | after the declaration            |
//! | call expression         | declared name / selection | after or above the call          |
//! | anything else           | selection                 | below the caret                  |
//!
//! All lines are 0-indexed rows of the parsed buffer.

use crate::syntax::{NodeKind, SyntaxNode};

/// The user's chosen node
#[derive(Debug, Clone)]
pub struct Selection<'t> {
    /// Smallest named node at the selection start
    pub node: SyntaxNode<'t>,
    /// The literal selected characters
    pub raw_text: String,
    /// Row of the caret, relative to the parsed buffer
    pub active_line: usize,
}

/// Where to insert and what to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    /// Row the statement is inserted at (column 0)
    pub insertion_line: usize,
    /// Expression to print; `None` prints the raw selection
    pub expression_text: Option<String>,
}

impl LogTarget {
    fn fallback(selection: &Selection<'_>) -> Self {
        Self {
            insertion_line: selection.active_line + 1,
            expression_text: None,
        }
    }

    /// The expression that ends up in the statement
    pub fn expression_or<'a>(&'a self, raw_text: &'a str) -> &'a str {
        self.expression_text.as_deref().unwrap_or(raw_text)
    }
}

/// Classify a selection into a `LogTarget`
pub fn classify(selection: &Selection<'_>) -> LogTarget {
    let node = selection.node;
    let Some(parent) = node.logical_parent() else {
        return LogTarget::fallback(selection);
    };

    let target = match parent.kind() {
        NodeKind::PropertyAssignment => in_property_assignment(&node),
        NodeKind::PropertyAccessExpression => {
            Some(in_property_access(&node, &parent, selection.active_line))
        }
        NodeKind::VariableDeclaration => Some(LogTarget {
            insertion_line: line_after(&parent),
            expression_text: None,
        }),
        NodeKind::CallExpression => in_call(&node, &parent),
        NodeKind::Identifier
        | NodeKind::Arguments
        | NodeKind::FunctionDeclaration
        | NodeKind::MethodDeclaration
        | NodeKind::FunctionExpression
        | NodeKind::ArrowFunction
        | NodeKind::Other => None,
    };

    tracing::debug!(
        parent = parent.grammar_kind(),
        active_line = selection.active_line,
        matched = target.is_some(),
        "classified selection"
    );

    target.unwrap_or_else(|| LogTarget::fallback(selection))
}

/// Row right below the node's last row
fn line_after(node: &SyntaxNode<'_>) -> usize {
    node.end_row() + 1
}

/// Dotted path of enclosing property keys, rooted at the declared variable
fn property_path(node: &SyntaxNode<'_>) -> String {
    let mut segments = Vec::new();
    for ancestor in node.ancestors() {
        match ancestor.kind() {
            NodeKind::PropertyAssignment => segments.extend(ancestor.name()),
            NodeKind::VariableDeclaration => {
                segments.extend(ancestor.name());
                break;
            }
            _ => {}
        }
    }
    segments.reverse();
    segments.join(".")
}

/// `const a = { b: 10 }` with `b` selected prints `a.b`
///
/// An object literal outside any declaration is not handled here; the
/// caller falls back to the caret line.
fn in_property_assignment(node: &SyntaxNode<'_>) -> Option<LogTarget> {
    let declaration = node.ancestor_of_kind(NodeKind::VariableDeclaration)?;
    Some(LogTarget {
        insertion_line: line_after(&declaration),
        expression_text: Some(property_path(node)),
    })
}

fn in_property_access(node: &SyntaxNode<'_>, access: &SyntaxNode<'_>, active_line: usize) -> LogTarget {
    if let Some(declaration) = node.ancestor_of_kind(NodeKind::VariableDeclaration) {
        return LogTarget {
            insertion_line: line_after(&declaration),
            expression_text: Some(property_path(node)),
        };
    }

    let mut segments = Vec::new();
    collect_access_path(access, &mut segments);
    let path = segments.join(".");

    LogTarget {
        insertion_line: active_line,
        expression_text: (!path.is_empty()).then_some(path),
    }
}

/// Left-to-right identifiers of an access chain; other operands are skipped
fn collect_access_path<'t>(expr: &SyntaxNode<'t>, segments: &mut Vec<&'t str>) {
    match expr.kind() {
        NodeKind::PropertyAccessExpression => {
            if let Some(object) = expr.field("object") {
                collect_access_path(&object, segments);
            }
            if let Some(property) = expr.field("property") {
                segments.push(property.text());
            }
        }
        NodeKind::Identifier => segments.push(expr.text()),
        _ => {}
    }
}

fn in_call(node: &SyntaxNode<'_>, call: &SyntaxNode<'_>) -> Option<LogTarget> {
    if let Some(declaration) = node.ancestor_of_kind(NodeKind::VariableDeclaration) {
        return Some(LogTarget {
            insertion_line: line_after(&declaration),
            expression_text: declaration.name().map(str::to_string),
        });
    }

    if call.field("function").as_ref() == Some(node) {
        // callee: print after the call
        Some(LogTarget {
            insertion_line: line_after(call),
            expression_text: None,
        })
    } else if node.is_argument_of(call) {
        // argument: print above the call
        Some(LogTarget {
            insertion_line: call.start_row(),
            expression_text: None,
        })
    } else {
        None
    }
}

/// Name of the innermost function enclosing `node`
///
/// Function expressions and arrow functions take the name they are bound to.
/// Returns `None` outside any function, or for an anonymous one.
pub fn enclosing_function_name(node: &SyntaxNode<'_>) -> Option<String> {
    let function = node.ancestors().find(|n| n.kind().is_function_like())?;

    let name = match function.kind() {
        NodeKind::FunctionDeclaration | NodeKind::MethodDeclaration => function.name(),
        NodeKind::FunctionExpression | NodeKind::ArrowFunction => {
            let binding = function.parent()?;
            match binding.kind() {
                NodeKind::VariableDeclaration
                | NodeKind::PropertyAssignment
                | NodeKind::MethodDeclaration => binding.name(),
                _ => None,
            }
        }
        _ => None,
    };

    name.filter(|name| !name.is_empty()).map(str::to_string)
}
