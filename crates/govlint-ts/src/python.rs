//! Python front-end using tree-sitter.

use tree_sitter::{Language, Node, Parser};

use govlint_core::{
    CallSite, CalleeShape, CompareOp, ComparisonSite, FileModel, ModelBuilder, Operand, Position,
    Scope, ScopeKind, Taxonomy,
};

use crate::adapter::{first_error_line, ParseError, SyntaxAdapter};

/// Lowers Python source into the shared syntax model.
pub struct PythonAdapter {
    language: Language,
}

impl PythonAdapter {
    /// Creates a new Python adapter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
    }

    fn position(node: &Node<'_>) -> Position {
        Position::new(node.start_position().row + 1, node.start_position().column)
    }

    /// Only `identifier` and `identifier.identifier` callees are classified;
    /// anything else is opaque.
    fn callee_shape(call: &Node<'_>, src: &[u8]) -> CalleeShape {
        let Some(func) = call.child_by_field_name("function") else {
            return CalleeShape::Opaque;
        };
        match func.kind() {
            "identifier" => CalleeShape::Function(Self::text(&func, src).to_owned()),
            "attribute" => {
                let object = func.child_by_field_name("object");
                let attribute = func.child_by_field_name("attribute");
                match (object, attribute) {
                    (Some(object), Some(attribute)) if object.kind() == "identifier" => {
                        CalleeShape::Method {
                            object: Self::text(&object, src).to_owned(),
                            method: Self::text(&attribute, src).to_owned(),
                        }
                    }
                    _ => CalleeShape::Opaque,
                }
            }
            _ => CalleeShape::Opaque,
        }
    }

    /// Extracts the first string-literal argument, for action names.
    fn first_string_argument(call: &Node<'_>, src: &[u8]) -> Option<String> {
        let arguments = call.child_by_field_name("arguments")?;
        let mut cursor = arguments.walk();
        let string = arguments
            .children(&mut cursor)
            .find(|child| child.kind() == "string")?;
        let mut inner = string.walk();
        let content = string
            .children(&mut inner)
            .find(|child| child.kind() == "string_content")
            .map(|child| Self::text(&child, src).to_owned());
        content.or_else(|| {
            Some(
                Self::text(&string, src)
                    .trim_matches(|c| c == '"' || c == '\'')
                    .to_owned(),
            )
        })
    }

    fn operand(node: &Node<'_>, src: &[u8]) -> Operand {
        let text = Self::text(node, src);
        let position = Some(Self::position(node));
        match node.kind() {
            "identifier" | "attribute" => Operand::name(text, position),
            "integer" => match text.parse::<i64>() {
                Ok(value) => Operand::int_literal(value, text, position),
                Err(_) => Operand::other(text, position),
            },
            _ => Operand::other(text, position),
        }
    }

    /// Python folds `a < b < c` into one `comparison_operator` node; each
    /// (left, op, right) window becomes its own comparison site.
    fn add_comparisons(node: &Node<'_>, src: &[u8], builder: &mut ModelBuilder) {
        let mut previous: Option<Node<'_>> = None;
        let mut pending: Option<CompareOp> = None;

        for index in 0..node.child_count() {
            let Some(child) = node.child(index) else {
                continue;
            };
            if let Some(op) = CompareOp::from_token(child.kind()) {
                pending = Some(op);
            } else if child.is_named() {
                if let (Some(op), Some(left)) = (pending, previous) {
                    builder.add_comparison(ComparisonSite {
                        op,
                        lhs: Self::operand(&left, src),
                        rhs: Self::operand(&child, src),
                        position: Some(Self::position(node)),
                    });
                }
                previous = Some(child);
                pending = None;
            } else {
                // A non-comparison operator (`in`, `is`, ...) breaks the pair.
                pending = None;
            }
        }
    }

    fn walk(node: Node<'_>, src: &[u8], taxonomy: &Taxonomy, builder: &mut ModelBuilder) {
        match node.kind() {
            "function_definition" => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| Self::text(&n, src).to_owned());
                builder.enter_scope(Scope {
                    kind: ScopeKind::Function,
                    name,
                    position: Some(Self::position(&node)),
                });
                Self::walk_children(node, src, taxonomy, builder);
                builder.exit();
            }
            "lambda" => {
                builder.enter_scope(Scope {
                    kind: ScopeKind::Lambda,
                    name: None,
                    position: Some(Self::position(&node)),
                });
                Self::walk_children(node, src, taxonomy, builder);
                builder.exit();
            }
            "call" => {
                let callee = Self::callee_shape(&node, src);
                let mut call =
                    CallSite::classified(callee, taxonomy, Some(Self::position(&node)));
                if let Some(action) = Self::first_string_argument(&node, src) {
                    call = call.with_action(action);
                }
                builder.enter_call(call);
                Self::walk_children(node, src, taxonomy, builder);
                builder.exit();
            }
            "comparison_operator" => {
                Self::add_comparisons(&node, src, builder);
                Self::walk_children(node, src, taxonomy, builder);
            }
            _ => Self::walk_children(node, src, taxonomy, builder),
        }
    }

    fn walk_children(node: Node<'_>, src: &[u8], taxonomy: &Taxonomy, builder: &mut ModelBuilder) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            Self::walk(child, src, taxonomy, builder);
        }
    }
}

impl Default for PythonAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxAdapter for PythonAdapter {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".py"]
    }

    fn parse(&self, source: &str, taxonomy: &Taxonomy) -> Result<FileModel, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Grammar {
                language: "python",
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser
            .parse(src, None)
            .ok_or(ParseError::Unparseable { language: "python" })?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(ParseError::Syntax {
                line: first_error_line(root),
            });
        }

        let mut builder = ModelBuilder::new();
        Self::walk_children(root, src, taxonomy, &mut builder);
        Ok(builder.finish())
    }
}
