//! Rule to require a consent check before personal-data access.
//!
//! Accessing personal or sensitive data without first verifying that the
//! subject has consented is a privacy violation. The check must precede the
//! access so the access is never performed when consent is absent.

use govlint_core::{
    unmet_triggers, CallCategory, FileContext, FileModel, Location, Requirement, Rule, Severity,
    Suggestion, Violation,
};

/// Rule code for require-consent-check.
pub const CODE: &str = "GV004";

/// Rule name for require-consent-check.
pub const NAME: &str = "require-consent-check";

/// Flags data-access calls with no prior consent check in the same scope.
#[derive(Debug, Clone)]
pub struct RequireConsentCheck {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for RequireConsentCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl RequireConsentCheck {
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

impl Rule for RequireConsentCheck {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a consent check before data-access operations in the same scope"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, model: &FileModel) -> Vec<Violation> {
        unmet_triggers(
            model,
            CallCategory::DataAccess,
            Requirement::Precedes(CallCategory::ConsentCheck),
        )
        .into_iter()
        .map(|call| {
            let location = Location::from_position(ctx.relative_path.clone(), call.position);
            let message = format!(
                "'{}' accesses data but no consent check (e.g. consent.check() or \
                 privacy.verify()) was found before it in the enclosing scope. \
                 Verify consent before reading personal data.",
                call.callee
            );
            let suggestion = match &call.action {
                Some(action) => Suggestion::new(format!(
                    "Verify consent for \"{action}\" before this access"
                )),
                None => Suggestion::new("Verify consent before this access"),
            };
            Violation::new(CODE, NAME, self.severity, location, message)
                .with_category(call.category)
                .with_suggestion(suggestion)
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govlint_core::{CallSite, CalleeShape, ModelBuilder, Position, Scope, ScopeKind, Taxonomy};
    use std::path::Path;

    fn method_call(taxonomy: &Taxonomy, object: &str, method: &str, line: usize) -> CallSite {
        CallSite::classified(
            CalleeShape::Method {
                object: object.to_owned(),
                method: method.to_owned(),
            },
            taxonomy,
            Some(Position::new(line, 4)),
        )
    }

    fn function_scope(name: &str, line: usize) -> Scope {
        Scope {
            kind: ScopeKind::Function,
            name: Some(name.to_owned()),
            position: Some(Position::new(line, 0)),
        }
    }

    fn check_model(model: &FileModel) -> Vec<Violation> {
        let ctx = FileContext::new(Path::new("profile.py"), "", Path::new("."));
        RequireConsentCheck::new().check(&ctx, model)
    }

    #[test]
    fn unconsented_access_is_flagged() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("load_profile", 1));
        builder.enter_call(method_call(&taxonomy, "db", "query", 2));
        builder.exit();
        builder.exit();

        let violations = check_model(&builder.finish());
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("'db.query'"));
        assert!(violations[0].message.contains("consent check"));
    }

    #[test]
    fn prior_consent_check_satisfies() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("load_profile", 1));
        builder.enter_call(method_call(&taxonomy, "consent", "check", 2));
        builder.exit();
        builder.enter_call(method_call(&taxonomy, "user", "fetch", 3));
        builder.exit();
        builder.exit();

        assert!(check_model(&builder.finish()).is_empty());
    }

    #[test]
    fn consent_check_after_the_access_still_flags() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("load_profile", 1));
        builder.enter_call(method_call(&taxonomy, "repo", "find", 2));
        builder.exit();
        builder.enter_call(method_call(&taxonomy, "privacy", "verify", 3));
        builder.exit();
        builder.exit();

        assert_eq!(check_model(&builder.finish()).len(), 1);
    }

    #[test]
    fn top_level_access_always_flags() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_call(method_call(&taxonomy, "consent", "check", 1));
        builder.exit();
        builder.enter_call(method_call(&taxonomy, "db", "query", 2));
        builder.exit();

        assert_eq!(check_model(&builder.finish()).len(), 1);
    }

    #[test]
    fn snake_case_consent_spelling_satisfies() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("load_profile", 1));
        builder.enter_call(method_call(&taxonomy, "permissions", "is_allowed", 2));
        builder.exit();
        builder.enter_call(method_call(&taxonomy, "customer", "load", 3));
        builder.exit();
        builder.exit();

        assert!(check_model(&builder.finish()).is_empty());
    }
}
