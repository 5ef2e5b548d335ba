//! Rule to require a governance check before every tool invocation.
//!
//! # Rationale
//!
//! Every action an agent takes through a tool must be authorised by the
//! governance layer before execution. Skipping the check means the agent can
//! perform arbitrary actions without policy enforcement.
//!
//! # Suppression
//!
//! - `# govlint: disable=no-ungoverned-tool-call` comment

use govlint_core::{
    unmet_triggers, CallCategory, FileContext, FileModel, Location, Requirement, Rule, Severity,
    Suggestion, Violation,
};

/// Rule code for no-ungoverned-tool-call.
pub const CODE: &str = "GV001";

/// Rule name for no-ungoverned-tool-call.
pub const NAME: &str = "no-ungoverned-tool-call";

/// Flags tool invocations with no prior governance check in the same scope.
#[derive(Debug, Clone)]
pub struct NoUngovernedToolCall {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoUngovernedToolCall {
    fn default() -> Self {
        Self::new()
    }
}

impl NoUngovernedToolCall {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoUngovernedToolCall {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a governance check before every tool invocation in the same scope"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, model: &FileModel) -> Vec<Violation> {
        unmet_triggers(
            model,
            CallCategory::ToolCall,
            Requirement::Precedes(CallCategory::GovernanceCheck),
        )
        .into_iter()
        .map(|call| {
            let location = Location::from_position(ctx.relative_path.clone(), call.position);
            let message = format!(
                "'{}' is a tool invocation but no governance check (e.g. engine.check() \
                 or governance.check()) was found before it in the enclosing scope. \
                 Add a check to authorise this action.",
                call.callee
            );
            let suggestion = match &call.action {
                Some(action) => Suggestion::new(format!(
                    "Add a governance check for \"{action}\" before this call"
                )),
                None => Suggestion::new("Add a governance check before this call"),
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
    use govlint_core::{
        CallSite, CalleeShape, ModelBuilder, Position, Scope, ScopeKind, Taxonomy,
    };
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
        let ctx = FileContext::new(Path::new("agent.py"), "", Path::new("."));
        NoUngovernedToolCall::new().check(&ctx, model)
    }

    #[test]
    fn ungoverned_tool_call_is_flagged() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("run_agent", 1));
        builder.enter_call(method_call(&taxonomy, "tool", "run", 2));
        builder.exit();
        builder.exit();

        let violations = check_model(&builder.finish());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[0].location.line, 2);
        assert!(violations[0].message.contains("'tool.run'"));
        assert!(violations[0].message.contains("governance check"));
    }

    #[test]
    fn governed_tool_call_passes() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("run_agent", 1));
        builder.enter_call(method_call(&taxonomy, "engine", "check", 2));
        builder.exit();
        builder.enter_call(method_call(&taxonomy, "tool", "run", 3));
        builder.exit();
        builder.exit();

        assert!(check_model(&builder.finish()).is_empty());
    }

    #[test]
    fn check_after_tool_call_still_flags() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("run_agent", 1));
        builder.enter_call(method_call(&taxonomy, "tool", "run", 2));
        builder.exit();
        builder.enter_call(method_call(&taxonomy, "engine", "check", 3));
        builder.exit();
        builder.exit();

        assert_eq!(check_model(&builder.finish()).len(), 1);
    }

    #[test]
    fn alternative_vocabulary_passes() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("run_agent", 1));
        builder.enter_call(method_call(&taxonomy, "governance", "verify", 2));
        builder.exit();
        builder.enter_call(method_call(&taxonomy, "tools", "execute", 3));
        builder.exit();
        builder.exit();

        assert!(check_model(&builder.finish()).is_empty());
    }

    #[test]
    fn top_level_tool_call_always_flags() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        // A prior check does not help: top level has no bounding scope.
        builder.enter_call(method_call(&taxonomy, "engine", "check", 1));
        builder.exit();
        builder.enter_call(method_call(&taxonomy, "tool", "run", 2));
        builder.exit();

        assert_eq!(check_model(&builder.finish()).len(), 1);
    }

    #[test]
    fn check_in_outer_scope_does_not_govern_inner_lambda() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("run_agent", 1));
        builder.enter_call(method_call(&taxonomy, "engine", "check", 2));
        builder.exit();
        builder.enter_scope(Scope {
            kind: ScopeKind::Lambda,
            name: None,
            position: Some(Position::new(3, 10)),
        });
        builder.enter_call(method_call(&taxonomy, "tool", "run", 3));
        builder.exit();
        builder.exit(); // lambda
        builder.exit(); // function

        // The lambda is the nearest enclosing scope; the outer check is
        // outside it and never counts.
        assert_eq!(check_model(&builder.finish()).len(), 1);
    }

    #[test]
    fn each_ungoverned_call_reports_once() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("run_agent", 1));
        builder.enter_call(method_call(&taxonomy, "tool", "run", 2));
        builder.exit();
        builder.enter_call(method_call(&taxonomy, "agent", "invoke", 3));
        builder.exit();
        builder.exit();

        let violations = check_model(&builder.finish());
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].location.line, 2);
        assert_eq!(violations[1].location.line, 3);
    }

    #[test]
    fn action_name_enriches_suggestion() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("run_agent", 1));
        builder.enter_call(
            method_call(&taxonomy, "tool", "run", 2).with_action("search query"),
        );
        builder.exit();
        builder.exit();

        let violations = check_model(&builder.finish());
        let suggestion = violations[0].suggestion.as_ref().expect("has suggestion");
        assert!(suggestion.message.contains("search query"));
    }

    #[test]
    fn unclassified_calls_do_not_trigger() {
        let taxonomy = Taxonomy::new();
        let mut builder = ModelBuilder::new();
        builder.enter_scope(function_scope("run_agent", 1));
        builder.enter_call(method_call(&taxonomy, "helper", "run", 2));
        builder.exit();
        builder.enter_call(CallSite::classified(
            CalleeShape::Opaque,
            &taxonomy,
            Some(Position::new(3, 4)),
        ));
        builder.exit();
        builder.exit();

        assert!(check_model(&builder.finish()).is_empty());
    }
}
