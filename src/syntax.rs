//! Throwaway syntax trees over script text.
//!
//! A tree is built per command invocation and dropped with it. Nodes borrow
//! the tree and navigate upward through their parent links only.

use thiserror::Error;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::language::Grammar;
use crate::position::Position;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load {grammar:?} grammar: {source}")]
    Language {
        grammar: Grammar,
        #[source]
        source: tree_sitter::LanguageError,
    },
    #[error("parser produced no tree")]
    Aborted,
}

impl Grammar {
    fn language(&self) -> Language {
        match self {
            Grammar::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Grammar::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Grammar::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

/// Grammatical category of a node, as far as the engine cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Identifier,
    /// `key: value` inside an object literal
    PropertyAssignment,
    /// `a.b`
    PropertyAccessExpression,
    /// `name = init` inside a `const`/`let`/`var` statement
    VariableDeclaration,
    CallExpression,
    /// Parenthesized argument list of a call
    Arguments,
    FunctionDeclaration,
    MethodDeclaration,
    FunctionExpression,
    ArrowFunction,
    Other,
}

impl NodeKind {
    fn from_ts_kind(kind: &str) -> Self {
        match kind {
            "identifier"
            | "property_identifier"
            | "shorthand_property_identifier"
            | "private_property_identifier" => NodeKind::Identifier,
            "pair" => NodeKind::PropertyAssignment,
            "member_expression" => NodeKind::PropertyAccessExpression,
            "variable_declarator" => NodeKind::VariableDeclaration,
            "call_expression" => NodeKind::CallExpression,
            "arguments" => NodeKind::Arguments,
            "function_declaration" | "generator_function_declaration" => {
                NodeKind::FunctionDeclaration
            }
            "method_definition" => NodeKind::MethodDeclaration,
            "function_expression" | "function" | "generator_function" => {
                NodeKind::FunctionExpression
            }
            "arrow_function" => NodeKind::ArrowFunction,
            _ => NodeKind::Other,
        }
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::MethodDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::ArrowFunction
        )
    }
}

const STRING_PARTS: [&str; 2] = ["string_fragment", "escape_sequence"];
const STRING_LITERALS: [&str; 2] = ["string", "template_string"];

/// A parsed script buffer
pub struct SyntaxTree<'src> {
    tree: Tree,
    source: &'src str,
}

impl std::fmt::Debug for SyntaxTree<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("root", &self.tree.root_node().kind())
            .field("len", &self.source.len())
            .finish()
    }
}

impl<'src> SyntaxTree<'src> {
    /// Parse `source` with the given grammar
    ///
    /// Syntax errors do not fail the parse; they surface as error nodes the
    /// engine never matches.
    pub fn parse(source: &'src str, grammar: Grammar) -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&grammar.language())
            .map_err(|source| ParseError::Language { grammar, source })?;

        let tree = parser.parse(source, None).ok_or(ParseError::Aborted)?;
        if tree.root_node().has_error() {
            tracing::debug!(?grammar, "parsed with syntax errors");
        }

        Ok(Self { tree, source })
    }

    pub fn source(&self) -> &'src str {
        self.source
    }

    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            raw: self.tree.root_node(),
            source: self.source,
        }
    }

    /// Smallest named node covering `offset`
    ///
    /// Offsets inside a string or template literal resolve to the whole
    /// literal, never to its fragments.
    pub fn node_at(&self, offset: usize) -> Option<SyntaxNode<'_>> {
        let mut raw = self
            .tree
            .root_node()
            .named_descendant_for_byte_range(offset, offset)?;
        if STRING_PARTS.contains(&raw.kind()) {
            if let Some(literal) = raw.parent().filter(|p| STRING_LITERALS.contains(&p.kind())) {
                raw = literal;
            }
        }
        Some(SyntaxNode {
            raw,
            source: self.source,
        })
    }
}

/// A node of a `SyntaxTree`
#[derive(Clone, Copy)]
pub struct SyntaxNode<'t> {
    raw: Node<'t>,
    source: &'t str,
}

impl std::fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}..{}", self.raw.kind(), self.start(), self.end())
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.raw.id() == other.raw.id()
    }
}

impl Eq for SyntaxNode<'_> {}

impl<'t> SyntaxNode<'t> {
    fn wrap(&self, raw: Node<'t>) -> Self {
        Self {
            raw,
            source: self.source,
        }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_ts_kind(self.raw.kind())
    }

    /// Grammar-level kind name, for diagnostics
    pub fn grammar_kind(&self) -> &'static str {
        self.raw.kind()
    }

    pub fn text(&self) -> &'t str {
        self.source.get(self.raw.byte_range()).unwrap_or_default()
    }

    pub fn start(&self) -> usize {
        self.raw.start_byte()
    }

    pub fn end(&self) -> usize {
        self.raw.end_byte()
    }

    /// 1-indexed start position
    pub fn start_position(&self) -> Position {
        let point = self.raw.start_position();
        Position {
            line: point.row + 1,
            column: point.column + 1,
        }
    }

    /// 0-indexed row the node starts on
    pub fn start_row(&self) -> usize {
        self.raw.start_position().row
    }

    /// 0-indexed row the node ends on
    pub fn end_row(&self) -> usize {
        self.raw.end_position().row
    }

    pub fn parent(&self) -> Option<Self> {
        self.raw.parent().map(|raw| self.wrap(raw))
    }

    /// Parent with argument-list wrappers skipped
    ///
    /// An argument's logical parent is the call expression itself.
    pub fn logical_parent(&self) -> Option<Self> {
        let parent = self.parent()?;
        if parent.kind() == NodeKind::Arguments {
            if let Some(call) = parent.parent().filter(|p| p.kind() == NodeKind::CallExpression) {
                return Some(call);
            }
        }
        Some(parent)
    }

    /// Strict ancestors, innermost first
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<'t>> + use<'t> {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// First strict ancestor of the given kind
    pub fn ancestor_of_kind(&self, kind: NodeKind) -> Option<Self> {
        self.ancestors().find(|node| node.kind() == kind)
    }

    pub fn field(&self, name: &str) -> Option<Self> {
        self.raw.child_by_field_name(name).map(|raw| self.wrap(raw))
    }

    /// Text of the `name` field (declarations) or `key` field (pairs)
    pub fn name(&self) -> Option<&'t str> {
        let name = match self.kind() {
            NodeKind::PropertyAssignment => self.field("key")?,
            _ => self.field("name")?,
        };
        Some(name.text())
    }

    pub fn named_children(&self) -> Vec<Self> {
        let mut cursor = self.raw.walk();
        self.raw
            .named_children(&mut cursor)
            .map(|raw| self.wrap(raw))
            .collect()
    }

    /// Whether this node is one of the arguments of `call`
    pub fn is_argument_of(&self, call: &SyntaxNode<'t>) -> bool {
        call.field("arguments")
            .is_some_and(|args| args.named_children().contains(self))
    }
}
