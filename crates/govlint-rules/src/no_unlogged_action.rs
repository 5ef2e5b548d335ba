//! Rule to require an audit log call alongside every governance check.
//!
//! Governance decisions must be auditable. If a check is performed but the
//! outcome is never recorded, the system cannot be retrospectively audited.
//! Order is irrelevant: a log call after the check, or in a later branch,
//! satisfies the requirement.

use govlint_core::{
    unmet_triggers, CallCategory, FileContext, FileModel, Location, Requirement, Rule, Severity,
    Suggestion, Violation,
};

/// Rule code for no-unlogged-action.
pub const CODE: &str = "GV002";

/// Rule name for no-unlogged-action.
pub const NAME: &str = "no-unlogged-action";

/// Flags governance checks with no audit log call anywhere in the same scope.
#[derive(Debug, Clone)]
pub struct NoUnloggedAction {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoUnloggedAction {
    fn default() -> Self {
        Self::new()
    }
}

impl NoUnloggedAction {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoUnloggedAction {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires an audit log call in the same scope as every governance check"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, model: &FileModel) -> Vec<Violation> {
        unmet_triggers(
            model,
            CallCategory::GovernanceCheck,
            Requirement::CoOccurs(CallCategory::AuditLog),
        )
        .into_iter()
        .map(|call| {
            let location = Location::from_position(ctx.relative_path.clone(), call.position);
            let message = format!(
                "'{}' is a governance check but no audit log call (e.g. audit.log() \
                 or logger.log()) was found in the enclosing scope. Log the outcome \
                 so it can be audited.",
                call.callee
            );
            let suggestion = match &call.action {
                Some(action) => Suggestion::new(format!(
                    "Record the decision for \"{action}\" with an audit log call"
                )),
                None => Suggestion::new("Record the decision with an audit log call"),
            };
            Violation::new(CODE, NAME, self.severity, location, message)
                .with_category(call.category)
                .with_suggestion(suggestion)
        })
        .collect()
    }
}
