//! Language adapter trait and parse errors.
//!
//! `SyntaxAdapter` is the extension point for adding new host languages.
//! Implement it to teach govlint how to lower a language's tree into the
//! shared syntax model.

use govlint_core::{FileModel, Taxonomy};
use tree_sitter::Node;

/// Errors from parsing one source file.
///
/// A genuinely malformed tree is the only fatal condition, and it is fatal
/// per file: the host reports it and moves on to the next file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("{language} grammar rejected by tree-sitter: {message}")]
    Grammar {
        /// Language identifier.
        language: &'static str,
        /// Underlying error message.
        message: String,
    },

    /// The parser produced no tree at all.
    #[error("could not parse {language} source")]
    Unparseable {
        /// Language identifier.
        language: &'static str,
    },

    /// The tree contains syntax errors.
    #[error("syntax error at line {line}")]
    Syntax {
        /// 1-based line of the first error node.
        line: usize,
    },
}

/// Trait for language-specific tree lowering.
///
/// The adapter receives raw source text plus the classification taxonomy and
/// returns the lowered [`FileModel`]. Classification happens here, during the
/// single pass over the parsed tree, so call sites reach the rules already
/// tagged.
pub trait SyntaxAdapter: Send + Sync {
    /// Language identifier (e.g., `"python"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this adapter handles (e.g., `&[".py"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parses `source` and lowers it into a [`FileModel`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the source cannot be parsed into a
    /// well-formed tree.
    fn parse(&self, source: &str, taxonomy: &Taxonomy) -> Result<FileModel, ParseError>;
}

/// 1-based line of the first error or missing node under `node`.
pub(crate) fn first_error_line(node: Node<'_>) -> usize {
    if node.is_error() || node.is_missing() {
        return node.start_position().row + 1;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            return first_error_line(child);
        }
    }
    node.start_position().row + 1
}
