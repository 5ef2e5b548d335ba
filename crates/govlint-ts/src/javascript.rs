//! JavaScript front-end using tree-sitter.

use tree_sitter::{Language, Node, Parser};

use govlint_core::{
    CallSite, CalleeShape, CompareOp, ComparisonSite, FileModel, ModelBuilder, Operand, Position,
    Scope, ScopeKind, Taxonomy,
};

use crate::adapter::{first_error_line, ParseError, SyntaxAdapter};

/// Lowers JavaScript source into the shared syntax model.
pub struct JsAdapter {
    language: Language,
}

impl JsAdapter {
    /// Creates a new JavaScript adapter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    fn text<'a>(node: &Node<'_>, src: &'a [u8]) -> &'a str {
        std::str::from_utf8(&src[node.start_byte()..node.end_byte()]).unwrap_or("")
    }

    fn position(node: &Node<'_>) -> Position {
        Position::new(node.start_position().row + 1, node.start_position().column)
    }

    fn callee_shape(call: &Node<'_>, src: &[u8]) -> CalleeShape {
        let Some(func) = call.child_by_field_name("function") else {
            return CalleeShape::Opaque;
        };
        match func.kind() {
            "identifier" => CalleeShape::Function(Self::text(&func, src).to_owned()),
            "member_expression" => {
                let object = func.child_by_field_name("object");
                let property = func.child_by_field_name("property");
                match (object, property) {
                    (Some(object), Some(property))
                        if object.kind() == "identifier"
                            && property.kind() == "property_identifier" =>
                    {
                        CalleeShape::Method {
                            object: Self::text(&object, src).to_owned(),
                            method: Self::text(&property, src).to_owned(),
                        }
                    }
                    _ => CalleeShape::Opaque,
                }
            }
            _ => CalleeShape::Opaque,
        }
    }

    fn first_string_argument(call: &Node<'_>, src: &[u8]) -> Option<String> {
        let arguments = call.child_by_field_name("arguments")?;
        let mut cursor = arguments.walk();
        let string = arguments
            .children(&mut cursor)
            .find(|child| child.kind() == "string")?;
        let mut inner = string.walk();
        let fragment = string
            .children(&mut inner)
            .find(|child| child.kind() == "string_fragment")
            .map(|child| Self::text(&child, src).to_owned());
        fragment.or_else(|| {
            Some(
                Self::text(&string, src)
                    .trim_matches(|c| c == '"' || c == '\'' || c == '`')
                    .to_owned(),
            )
        })
    }

    fn operand(node: &Node<'_>, src: &[u8]) -> Operand {
        let text = Self::text(node, src);
        let position = Some(Self::position(node));
        match node.kind() {
            "identifier" | "member_expression" => Operand::name(text, position),
            "number" => match text.parse::<i64>() {
                Ok(value) => Operand::int_literal(value, text, position),
                Err(_) => Operand::other(text, position),
            },
            _ => Operand::other(text, position),
        }
    }

    fn enter_function_scope(
        node: &Node<'_>,
        kind: ScopeKind,
        src: &[u8],
        builder: &mut ModelBuilder,
    ) {
        let name = node
            .child_by_field_name("name")
            .map(|n| Self::text(&n, src).to_owned());
        builder.enter_scope(Scope {
            kind,
            name,
            position: Some(Self::position(node)),
        });
    }

    fn walk(node: Node<'_>, src: &[u8], taxonomy: &Taxonomy, builder: &mut ModelBuilder) {
        match node.kind() {
            "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "method_definition" => {
                Self::enter_function_scope(&node, ScopeKind::Function, src, builder);
                Self::walk_children(node, src, taxonomy, builder);
                builder.exit();
            }
            "arrow_function" => {
                Self::enter_function_scope(&node, ScopeKind::Arrow, src, builder);
                Self::walk_children(node, src, taxonomy, builder);
                builder.exit();
            }
            "call_expression" => {
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
            "binary_expression" => {
                Self::add_comparison(&node, src, builder);
                Self::walk_children(node, src, taxonomy, builder);
            }
            _ => Self::walk_children(node, src, taxonomy, builder),
        }
    }

    fn add_comparison(node: &Node<'_>, src: &[u8], builder: &mut ModelBuilder) {
        let operator = node
            .child_by_field_name("operator")
            .and_then(|op| CompareOp::from_token(op.kind()));
        let (Some(op), Some(left), Some(right)) = (
            operator,
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };
        builder.add_comparison(ComparisonSite {
            op,
            lhs: Self::operand(&left, src),
            rhs: Self::operand(&right, src),
            position: Some(Self::position(node)),
        });
    }

    fn walk_children(node: Node<'_>, src: &[u8], taxonomy: &Taxonomy, builder: &mut ModelBuilder) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            Self::walk(child, src, taxonomy, builder);
        }
    }
}

impl Default for JsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxAdapter for JsAdapter {
    fn language_id(&self) -> &'static str {
        "javascript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".js", ".mjs", ".cjs"]
    }

    fn parse(&self, source: &str, taxonomy: &Taxonomy) -> Result<FileModel, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ParseError::Grammar {
                language: "javascript",
                message: e.to_string(),
            })?;

        let src = source.as_bytes();
        let tree = parser.parse(src, None).ok_or(ParseError::Unparseable {
            language: "javascript",
        })?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use govlint_core::{CallCategory, EnclosingScope, OperandKind};

    fn parse(source: &str) -> FileModel {
        JsAdapter::new()
            .parse(source, &Taxonomy::new())
            .expect("source should parse")
    }

    #[test]
    fn extracts_method_call_with_category_and_action() {
        let model = parse("function runAgent() {\n  tool.run(\"search\");\n}\n");
        let (_, call) = model.calls().next().expect("one call");
        assert_eq!(call.category, CallCategory::ToolCall);
        assert_eq!(call.callee.to_string(), "tool.run");
        assert_eq!(call.position, Some(Position::new(2, 2)));
        assert_eq!(call.action.as_deref(), Some("search"));
    }

    #[test]
    fn arrow_function_is_a_scope() {
        let model = parse("const f = () => {\n  openai.chat(\"prompt\");\n};\n");
        let (id, _) = model.calls().next().expect("one call");
        let EnclosingScope::Scope(scope_id) = model.enclosing_scope(id) else {
            panic!("expected arrow scope");
        };
        assert_eq!(
            model.scope(scope_id).expect("scope node").kind,
            ScopeKind::Arrow
        );
    }

    #[test]
    fn method_definition_is_a_scope() {
        let model = parse("class Agent {\n  act() {\n    tool.run(\"x\");\n  }\n}\n");
        let (id, _) = model.calls().next().expect("one call");
        let EnclosingScope::Scope(scope_id) = model.enclosing_scope(id) else {
            panic!("expected method scope");
        };
        assert_eq!(
            model.scope(scope_id).expect("scope node").name.as_deref(),
            Some("act")
        );
    }

    #[test]
    fn top_level_call_has_no_scope() {
        let model = parse("db.query(\"users\");\n");
        let (id, call) = model.calls().next().expect("one call");
        assert_eq!(call.category, CallCategory::DataAccess);
        assert_eq!(model.enclosing_scope(id), EnclosingScope::TopLevel);
    }

    #[test]
    fn chained_member_callee_is_opaque() {
        let model = parse("ctx.tool.run(\"x\");\n");
        let (_, call) = model.calls().next().expect("one call");
        assert_eq!(call.callee, CalleeShape::Opaque);
        assert_eq!(call.category, CallCategory::Unclassified);
    }

    #[test]
    fn computed_member_callee_is_opaque() {
        let model = parse("tool[\"run\"](\"x\");\n");
        let (_, call) = model.calls().next().expect("one call");
        assert_eq!(call.callee, CalleeShape::Opaque);
    }

    #[test]
    fn strict_equality_comparison_is_extracted() {
        let model = parse("if (trustLevel === 2) {\n  act();\n}\n");
        let (_, cmp) = model.comparisons().next().expect("one comparison");
        assert_eq!(cmp.op, CompareOp::StrictEq);
        assert_eq!(cmp.lhs.kind, OperandKind::Name);
        assert_eq!(cmp.rhs.kind, OperandKind::IntLiteral(2));
    }

    #[test]
    fn reversed_literal_comparison_is_extracted() {
        let model = parse("if (3 <= level) {\n  act();\n}\n");
        let (_, cmp) = model.comparisons().next().expect("one comparison");
        assert_eq!(cmp.lhs.kind, OperandKind::IntLiteral(3));
        assert_eq!(cmp.rhs.kind, OperandKind::Name);
        assert_eq!(cmp.rhs.text, "level");
    }

    #[test]
    fn member_operand_keeps_full_text() {
        let model = parse("if (user.trust > 1) {\n  act();\n}\n");
        let (_, cmp) = model.comparisons().next().expect("one comparison");
        assert_eq!(cmp.lhs.text, "user.trust");
        assert_eq!(cmp.lhs.kind, OperandKind::Name);
    }

    #[test]
    fn float_literal_is_not_an_int_operand() {
        let model = parse("if (level > 2.5) {\n  act();\n}\n");
        let (_, cmp) = model.comparisons().next().expect("one comparison");
        assert_eq!(cmp.rhs.kind, OperandKind::Other);
    }

    #[test]
    fn arithmetic_binary_expression_is_not_a_comparison() {
        let model = parse("const x = a + 3;\n");
        assert_eq!(model.comparisons().count(), 0);
    }

    #[test]
    fn syntax_error_is_fatal_per_file() {
        let result = JsAdapter::new().parse("function broken( {\n", &Taxonomy::new());
        assert!(matches!(result, Err(ParseError::Syntax { .. })));
    }
}
