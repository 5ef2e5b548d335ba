//! Rule to disallow magic numeric literals in trust-level comparisons.
//!
//! Patterns flagged:
//!
//! ```text
//! if level >= 3:           # 3 is a magic number
//! if trust_level == 2:     # 2 is a magic number
//! if 3 <= level:           # reversed operand order is flagged too
//! ```
//!
//! Correct form:
//!
//! ```text
//! if level >= TrustLevel.OPERATOR:
//! ```
//!
//! Hard-coded numeric trust levels are brittle and unclear. Named constants
//! document intent and let the trust model be refactored without
//! hunt-and-replace. Detection is symmetric in operand order and reports at
//! the literal's position.

use govlint_core::{FileContext, FileModel, Location, Operand, Rule, Severity, Violation};

/// Rule code for no-hardcoded-trust-level.
pub const CODE: &str = "GV003";

/// Rule name for no-hardcoded-trust-level.
pub const NAME: &str = "no-hardcoded-trust-level";

/// Default upper bound (inclusive) for magic-number detection.
pub const DEFAULT_MAX_MAGIC_VALUE: i64 = 5;

/// Flags small numeric literals compared against trust-like identifiers.
#[derive(Debug, Clone)]
pub struct NoHardcodedTrustLevel {
    /// Upper bound (inclusive) for flagged literal values.
    pub max_magic_value: i64,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoHardcodedTrustLevel {
    fn default() -> Self {
        Self::new()
    }
}

impl NoHardcodedTrustLevel {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_magic_value: DEFAULT_MAX_MAGIC_VALUE,
            severity: Severity::Warning,
        }
    }

    /// Sets the inclusive upper bound for flagged literals.
    #[must_use]
    pub fn max_magic_value(mut self, max: i64) -> Self {
        self.max_magic_value = max;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns the flagged literal operand of a pair, if the pair matches:
    /// one trust-like identifier, one literal in `0..=max_magic_value`.
    fn magic_operand<'a>(&self, left: &'a Operand, right: &'a Operand) -> Option<(i64, &'a Operand)> {
        if left.is_trust_name() {
            return right
                .small_literal(self.max_magic_value)
                .map(|value| (value, right));
        }
        if right.is_trust_name() {
            return left
                .small_literal(self.max_magic_value)
                .map(|value| (value, left));
        }
        None
    }
}

impl Rule for NoHardcodedTrustLevel {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Disallows numeric literals in trust-level comparisons; use named constants"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check(&self, ctx: &FileContext, model: &FileModel) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (_, comparison) in model.comparisons() {
            let Some((value, operand)) = self.magic_operand(&comparison.lhs, &comparison.rhs)
            else {
                continue;
            };
            // Report at the literal, falling back to the comparison itself.
            let position = operand.position.or(comparison.position);
            let location = Location::from_position(ctx.relative_path.clone(), position);
            violations.push(Violation::new(
                CODE,
                NAME,
                self.severity,
                location,
                format!(
                    "Magic number {value} used in a trust comparison. Replace it with a \
                     named constant (e.g. TrustLevel.OPERATOR) so the intent is explicit."
                ),
            ));
        }

        violations
    }
}
