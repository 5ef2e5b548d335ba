//! Rule to require a budget check before spending operations.
//!
//! Agent systems consume real resources through LLM and external API calls.
//! Without a prior budget check an agent may exceed configured cost limits.
//! The check must precede the spend so the call is blocked when the budget
//! is insufficient.

use govlint_core::{
    unmet_triggers, CallCategory, FileContext, FileModel, Location, Requirement, Rule, Severity,
    Suggestion, Violation,
};

/// Rule code for require-budget-check.
pub const CODE: &str = "GV005";

/// Rule name for require-budget-check.
pub const NAME: &str = "require-budget-check";

/// Flags spending calls with no prior budget check in the same scope.
#[derive(Debug, Clone)]
pub struct RequireBudgetCheck {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for RequireBudgetCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl RequireBudgetCheck {
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

impl Rule for RequireBudgetCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a budget check before spending operations in the same scope"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, model: &FileModel) -> Vec<Violation> {
        unmet_triggers(
            model,
            CallCategory::SpendCall,
            Requirement::Precedes(CallCategory::BudgetCheck),
        )
        .into_iter()
        .map(|call| {
            let location = Location::from_position(ctx.relative_path.clone(), call.position);
            let message = format!(
                "'{}' is a spending operation but no budget check (e.g. budget.check() \
                 or quota.canSpend()) was found before it in the enclosing scope. \
                 Check available budget before incurring cost.",
                call.callee
            );
            let suggestion = match &call.action {
                Some(action) => Suggestion::new(format!(
                    "Check the budget for \"{action}\" before this call"
                )),
                None => Suggestion::new("Check the budget before this call"),
            };
            Violation::new(CODE, NAME, self.severity, location, message)
                .with_category(call.category)
                .with_suggestion(suggestion)
        })
        .collect()
    }
}
