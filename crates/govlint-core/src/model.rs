//! Language-neutral syntax model.
//!
//! Front-ends lower a parsed host-language tree into a [`FileModel`]: a
//! preorder arena of the nodes the rules care about (function-like scopes,
//! call sites, comparison sites) with parent links and subtree extents.
//! Scope resolution walks parent links upward; call collection scans a
//! scope's subtree slice.

use crate::taxonomy::{CallCategory, Taxonomy};

/// A source position. Lines are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 0-based column offset.
    pub column: usize,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The statically visible shape of a call's callee.
///
/// Anything that is not a plain `identifier` or `identifier.identifier` is
/// [`Opaque`](CalleeShape::Opaque) and is never classified, flagged, or
/// counted toward a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalleeShape {
    /// A bare call: `auditLog(...)`.
    Function(String),
    /// A single-level method call: `tool.run(...)`.
    Method {
        /// Receiver identifier.
        object: String,
        /// Method identifier.
        method: String,
    },
    /// Computed member access, chained calls, subscripts, and the like.
    Opaque,
}

impl std::fmt::Display for CalleeShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function(name) => f.write_str(name),
            Self::Method { object, method } => write!(f, "{object}.{method}"),
            Self::Opaque => f.write_str("<dynamic>"),
        }
    }
}

/// One call expression occurrence.
#[derive(Debug, Clone)]
pub struct CallSite {
    /// Shape of the callee.
    pub callee: CalleeShape,
    /// Category assigned from the callee shape alone.
    pub category: CallCategory,
    /// Source position; calls without one sort after everything.
    pub position: Option<Position>,
    /// Human-readable action name taken from the first string argument.
    pub action: Option<String>,
}

impl CallSite {
    /// Builds a call site, classifying the callee against `taxonomy`.
    #[must_use]
    pub fn classified(callee: CalleeShape, taxonomy: &Taxonomy, position: Option<Position>) -> Self {
        let category = taxonomy.classify(&callee);
        Self {
            callee,
            category,
            position,
            action: None,
        }
    }

    /// Attaches the extracted action name.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Comparison operator of a [`ComparisonSite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `===` (JavaScript strict equality)
    StrictEq,
    /// `!==` (JavaScript strict inequality)
    StrictNe,
}

impl CompareOp {
    /// Maps an operator token to its variant.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Ge),
            "===" => Some(Self::StrictEq),
            "!==" => Some(Self::StrictNe),
            _ => None,
        }
    }

    /// The operator's source token.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::StrictEq => "===",
            Self::StrictNe => "!==",
        }
    }
}

/// What kind of expression a comparison operand is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// A plain or dotted identifier (`level`, `user.trust`).
    Name,
    /// An integer literal with its value.
    IntLiteral(i64),
    /// Anything else (calls, floats, strings, ...).
    Other,
}

/// One side of a comparison.
#[derive(Debug, Clone)]
pub struct Operand {
    /// Source text of the operand, used in messages.
    pub text: String,
    /// Operand classification.
    pub kind: OperandKind,
    /// Position of the operand itself (violations report at the literal).
    pub position: Option<Position>,
}

/// Identifier fragments that mark an operand as trust-related.
const TRUST_NAME_FRAGMENTS: [&str; 4] = ["trust", "level", "tier", "clearance"];

impl Operand {
    /// Creates an identifier operand.
    #[must_use]
    pub fn name(text: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            text: text.into(),
            kind: OperandKind::Name,
            position,
        }
    }

    /// Creates an integer-literal operand.
    #[must_use]
    pub fn int_literal(value: i64, text: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            text: text.into(),
            kind: OperandKind::IntLiteral(value),
            position,
        }
    }

    /// Creates an operand that is neither an identifier nor an int literal.
    #[must_use]
    pub fn other(text: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            text: text.into(),
            kind: OperandKind::Other,
            position,
        }
    }

    /// True when this operand is an identifier whose name looks trust-related
    /// (case-insensitive fragment match on `trust|level|tier|clearance`).
    #[must_use]
    pub fn is_trust_name(&self) -> bool {
        if self.kind != OperandKind::Name {
            return false;
        }
        let lowered = self.text.to_lowercase();
        TRUST_NAME_FRAGMENTS
            .iter()
            .any(|fragment| lowered.contains(fragment))
    }

    /// Returns the literal value when this operand is an integer in
    /// `0..=max`.
    #[must_use]
    pub fn small_literal(&self, max: i64) -> Option<i64> {
        match self.kind {
            OperandKind::IntLiteral(value) if (0..=max).contains(&value) => Some(value),
            _ => None,
        }
    }
}

/// One binary comparison occurrence.
#[derive(Debug, Clone)]
pub struct ComparisonSite {
    /// The comparison operator.
    pub op: CompareOp,
    /// Left operand.
    pub lhs: Operand,
    /// Right operand.
    pub rhs: Operand,
    /// Position of the whole comparison expression.
    pub position: Option<Position>,
}

/// Kind of a function-like scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Named (or method) function definition.
    Function,
    /// Python `lambda`.
    Lambda,
    /// JavaScript arrow function.
    Arrow,
}

/// A function-like syntactic construct bounding precedence requirements.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Scope kind.
    pub kind: ScopeKind,
    /// Name, when the construct has one.
    pub name: Option<String>,
    /// Position of the construct.
    pub position: Option<Position>,
}

/// Index of a node in a [`FileModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a model node holds.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The file root.
    Root,
    /// A function-like scope.
    Scope(Scope),
    /// A call expression.
    Call(CallSite),
    /// A binary comparison.
    Comparison(ComparisonSite),
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    /// Exclusive end of this node's subtree in preorder.
    subtree_end: usize,
    kind: NodeKind,
}

/// Result of resolving a node's nearest enclosing function-like scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnclosingScope {
    /// No enclosing function-like construct before the file root.
    TopLevel,
    /// The nearest enclosing scope node.
    Scope(NodeId),
}

/// The lowered view of one parsed source file.
///
/// Immutable once built; borrowed by rules for the duration of one file's
/// evaluation and discarded afterwards.
#[derive(Debug, Clone)]
pub struct FileModel {
    nodes: Vec<NodeData>,
}

impl FileModel {
    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Iterates every call site in the file, in preorder.
    pub fn calls(&self) -> impl Iterator<Item = (NodeId, &CallSite)> {
        self.nodes.iter().enumerate().filter_map(|(index, node)| {
            if let NodeKind::Call(call) = &node.kind {
                Some((NodeId(index), call))
            } else {
                None
            }
        })
    }

    /// Iterates every comparison site in the file, in preorder.
    pub fn comparisons(&self) -> impl Iterator<Item = (NodeId, &ComparisonSite)> {
        self.nodes.iter().enumerate().filter_map(|(index, node)| {
            if let NodeKind::Comparison(comparison) = &node.kind {
                Some((NodeId(index), comparison))
            } else {
                None
            }
        })
    }

    /// Returns the scope stored at `id`, if that node is a scope.
    #[must_use]
    pub fn scope(&self, id: NodeId) -> Option<&Scope> {
        match &self.nodes[id.0].kind {
            NodeKind::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    /// Walks parent links upward to the nearest function-like scope.
    ///
    /// Deterministic, O(depth of the node).
    #[must_use]
    pub fn enclosing_scope(&self, id: NodeId) -> EnclosingScope {
        let mut current = self.nodes[id.0].parent;
        while let Some(ancestor) = current {
            if matches!(self.nodes[ancestor.0].kind, NodeKind::Scope(_)) {
                return EnclosingScope::Scope(ancestor);
            }
            current = self.nodes[ancestor.0].parent;
        }
        EnclosingScope::TopLevel
    }

    /// Collects every call site nested anywhere within `scope`, in source
    /// order. For [`EnclosingScope::TopLevel`] the whole file is scanned.
    ///
    /// Side-effect-free and restartable; invoked once per triggering call.
    #[must_use]
    pub fn calls_within(&self, scope: EnclosingScope) -> Vec<&CallSite> {
        let range = match scope {
            EnclosingScope::TopLevel => 0..self.nodes.len(),
            EnclosingScope::Scope(id) => (id.0 + 1)..self.nodes[id.0].subtree_end,
        };
        self.nodes[range]
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Call(call) => Some(call),
                _ => None,
            })
            .collect()
    }
}

/// Builds a [`FileModel`] during one preorder pass over a parsed tree.
///
/// Scopes and calls are containers: `enter_*` opens them,
/// [`ModelBuilder::exit`] closes the most recently opened one. Comparisons
/// are leaves.
#[derive(Debug)]
pub struct ModelBuilder {
    nodes: Vec<NodeData>,
    open: Vec<NodeId>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Creates a builder holding only the file root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                parent: None,
                subtree_end: 1,
                kind: NodeKind::Root,
            }],
            open: vec![NodeId(0)],
        }
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.open.last().copied();
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent,
            subtree_end: id.0 + 1,
            kind,
        });
        id
    }

    /// Opens a function-like scope.
    pub fn enter_scope(&mut self, scope: Scope) -> NodeId {
        let id = self.push(NodeKind::Scope(scope));
        self.open.push(id);
        id
    }

    /// Opens a call site (calls contain their argument subexpressions).
    pub fn enter_call(&mut self, call: CallSite) -> NodeId {
        let id = self.push(NodeKind::Call(call));
        self.open.push(id);
        id
    }

    /// Records a comparison as a leaf.
    pub fn add_comparison(&mut self, comparison: ComparisonSite) -> NodeId {
        self.push(NodeKind::Comparison(comparison))
    }

    /// Closes the most recently opened scope or call.
    ///
    /// The root cannot be closed early; a surplus call is a no-op.
    pub fn exit(&mut self) {
        if self.open.len() > 1 {
            if let Some(id) = self.open.pop() {
                self.nodes[id.0].subtree_end = self.nodes.len();
            }
        }
    }

    /// Finalizes the model, closing any still-open nodes.
    #[must_use]
    pub fn finish(mut self) -> FileModel {
        let end = self.nodes.len();
        for id in self.open.drain(..) {
            self.nodes[id.0].subtree_end = end;
        }
        FileModel { nodes: self.nodes }
    }
}
