//! Rule set construction helpers.

use govlint_core::{RuleBox, RuleOptions};

use crate::{
    NoHardcodedTrustLevel, NoUngovernedToolCall, NoUnloggedAction, RequireBudgetCheck,
    RequireConsentCheck,
};

/// Returns all five governance rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    configured_rules(&RuleOptions::default())
}

/// Returns all five governance rules configured from `options`.
#[must_use]
pub fn configured_rules(options: &RuleOptions) -> Vec<RuleBox> {
    vec![
        Box::new(NoUngovernedToolCall::new()),
        Box::new(NoUnloggedAction::new()),
        Box::new(NoHardcodedTrustLevel::new().max_magic_value(options.max_magic_value)),
        Box::new(RequireConsentCheck::new()),
        Box::new(RequireBudgetCheck::new()),
    ]
}

/// Builds a single rule by its kebab-case name or code.
///
/// Returns `None` for unknown identifiers so callers can report a usage
/// error.
#[must_use]
pub fn rule_by_name(name: &str, options: &RuleOptions) -> Option<RuleBox> {
    match name {
        crate::no_ungoverned_tool_call::NAME | crate::no_ungoverned_tool_call::CODE => {
            Some(Box::new(NoUngovernedToolCall::new()))
        }
        crate::no_unlogged_action::NAME | crate::no_unlogged_action::CODE => {
            Some(Box::new(NoUnloggedAction::new()))
        }
        crate::no_hardcoded_trust_level::NAME | crate::no_hardcoded_trust_level::CODE => Some(
            Box::new(NoHardcodedTrustLevel::new().max_magic_value(options.max_magic_value)),
        ),
        crate::require_consent_check::NAME | crate::require_consent_check::CODE => {
            Some(Box::new(RequireConsentCheck::new()))
        }
        crate::require_budget_check::NAME | crate::require_budget_check::CODE => {
            Some(Box::new(RequireBudgetCheck::new()))
        }
        _ => None,
    }
}
