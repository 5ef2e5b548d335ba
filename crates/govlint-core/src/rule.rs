//! Rule trait for defining governance lint rules.

use crate::context::FileContext;
use crate::model::FileModel;
use crate::types::{Severity, Violation};

/// A per-file governance rule evaluated against the language-neutral
/// [`FileModel`].
///
/// Rules never see host-language trees; every front-end lowers into the same
/// model, so rule logic exists exactly once.
///
/// # Example
///
/// ```ignore
/// use govlint_core::{FileContext, FileModel, Rule, Severity, Violation};
///
/// pub struct NoUngovernedToolCall;
///
/// impl Rule for NoUngovernedToolCall {
///     fn name(&self) -> &'static str { "no-ungoverned-tool-call" }
///     fn code(&self) -> &'static str { "GV001" }
///     fn default_severity(&self) -> Severity { Severity::Error }
///
///     fn check(&self, ctx: &FileContext, model: &FileModel) -> Vec<Violation> {
///         // walk model.calls() and report
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-ungoverned-tool-call").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "GV001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Checks one file's model and returns any violations found.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context about the file being checked
    /// * `model` - The lowered syntax model of the file
    fn check(&self, ctx: &FileContext, model: &FileModel) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
