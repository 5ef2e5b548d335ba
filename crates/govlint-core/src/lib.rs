//! # govlint-core
//!
//! Core framework for the govlint governance linter.
//!
//! This crate provides the language-neutral pieces shared by every front-end:
//!
//! - [`Taxonomy`] mapping call shapes to governance categories
//! - [`FileModel`] / [`ModelBuilder`] for the syntax model front-ends produce
//! - [`Rule`] trait for per-file governance rules
//! - [`Linter`] for driving a rule set over one file's model
//! - [`Violation`] for representing lint findings
//!
//! Front-ends parse a host language (Python, JavaScript) into a [`FileModel`];
//! all rule logic runs against that model, never against host-specific trees.
//!
//! ## Example
//!
//! ```ignore
//! use govlint_core::{FileContext, Linter};
//!
//! let linter = Linter::new(rules);
//! let ctx = FileContext::new(path, &content, root);
//! let violations = linter.lint(&ctx, &model);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod engine;
mod fix;
mod linter;
mod model;
mod rule;
mod suppression;
mod taxonomy;
mod types;

pub use config::{Config, ConfigError, LinterConfig, RuleConfig, RuleOptions};
pub use context::FileContext;
pub use engine::{co_occurs, position_key, precedes, unmet_triggers, Requirement};
pub use fix::{CommentMarker, SuggestedFix};
pub use linter::Linter;
pub use model::{
    CallSite, CalleeShape, CompareOp, ComparisonSite, EnclosingScope, FileModel, ModelBuilder,
    NodeId, NodeKind, Operand, OperandKind, Position, Scope, ScopeKind,
};
pub use rule::{Rule, RuleBox};
pub use suppression::{partition_suppressed, SuppressionReport, Suppressions};
pub use taxonomy::{CallCategory, Taxonomy, Vocabulary};
pub use types::{LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic};
