//! # govlint-rules
//!
//! Built-in governance rules for govlint.
//!
//! Each rule pairs a trigger category with a requirement on its enclosing
//! lexical scope, evaluated against the language-neutral syntax model from
//! `govlint-core` — the same rule logic serves every front-end.
//!
//! ## Available Rules
//!
//! | Code | Name | Severity | Description |
//! |------|------|----------|-------------|
//! | GV001 | `no-ungoverned-tool-call` | error | Tool calls need a prior governance check |
//! | GV002 | `no-unlogged-action` | warning | Governance checks need a co-occurring audit log |
//! | GV003 | `no-hardcoded-trust-level` | warning | No magic numbers in trust comparisons |
//! | GV004 | `require-consent-check` | warning | Data access needs a prior consent check |
//! | GV005 | `require-budget-check` | warning | Spend calls need a prior budget check |
//!
//! ## Usage
//!
//! ```ignore
//! use govlint_core::Linter;
//! use govlint_rules::all_rules;
//!
//! let linter = Linter::new(all_rules());
//! let violations = linter.lint(&ctx, &model);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod no_hardcoded_trust_level;
mod no_ungoverned_tool_call;
mod no_unlogged_action;
mod presets;
mod require_budget_check;
mod require_consent_check;

pub use no_hardcoded_trust_level::{NoHardcodedTrustLevel, DEFAULT_MAX_MAGIC_VALUE};
pub use no_ungoverned_tool_call::NoUngovernedToolCall;
pub use no_unlogged_action::NoUnloggedAction;
pub use presets::{all_rules, configured_rules, rule_by_name};
pub use require_budget_check::RequireBudgetCheck;
pub use require_consent_check::RequireConsentCheck;

/// Re-export core types for convenience.
pub use govlint_core::{Rule, RuleBox, Severity, Violation};
