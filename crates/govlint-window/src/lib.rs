//! # govlint-window
//!
//! Degraded text-window front-end for govlint.
//!
//! Editor integrations must produce diagnostics for in-progress text that may
//! not parse at all. This scanner approximates the real engine's scope and
//! precedence semantics with fixed-size line windows over raw text: a trigger
//! pattern on one line is satisfied by a prerequisite pattern within a fixed
//! number of preceding lines (or surrounding lines, for the co-occurrence
//! rule) instead of within its true lexical scope.
//!
//! This is a deliberately degraded fallback, never a second source of truth.
//! Known accuracy limits, by design:
//!
//! - **False negatives** when the prerequisite sits farther away than the
//!   window, or when a call spans multiple lines.
//! - **False positives** when a pattern occurs inside a comment or string,
//!   or when the prerequisite in the window belongs to a different function.
//!
//! The emitted [`Violation`]s carry the same rule ids, codes, and severities
//! as the tree engine so hosts can render them uniformly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::path::Path;

use govlint_core::{CallCategory, Location, Severity, Taxonomy, Violation, Vocabulary};

/// Lines looked back from a tool call for a governance pattern.
pub const GOVERNANCE_WINDOW: usize = 20;
/// Lines looked back from a data access for a consent pattern.
pub const CONSENT_WINDOW: usize = 30;
/// Lines looked back from a spend call for a budget pattern.
pub const BUDGET_WINDOW: usize = 40;
/// Lines looked around a governance check for an audit pattern.
pub const AUDIT_WINDOW: usize = 30;

/// Textual needles for one call category (`"obj.method("` and `"fn("`).
#[derive(Debug, Clone, Default)]
struct PatternSet {
    needles: Vec<String>,
}

impl PatternSet {
    fn from_vocabulary(vocabulary: &Vocabulary) -> Self {
        let mut needles = Vec::new();
        for object in vocabulary.objects() {
            for method in vocabulary.methods() {
                needles.push(format!("{object}.{method}("));
            }
        }
        for (object, method) in vocabulary.pairs() {
            needles.push(format!("{object}.{method}("));
        }
        for function in vocabulary.functions() {
            needles.push(format!("{function}("));
        }
        Self { needles }
    }

    /// Leftmost match in `line`, as (column, callee text).
    fn first_match<'s>(&'s self, line: &str) -> Option<(usize, &'s str)> {
        self.needles
            .iter()
            .filter_map(|needle| line.find(needle).map(|col| (col, needle.as_str())))
            .min_by_key(|(col, _)| *col)
            .map(|(col, needle)| (col, needle.trim_end_matches('(')))
    }

    fn matches(&self, line: &str) -> bool {
        self.needles.iter().any(|needle| line.contains(needle))
    }

    fn matches_any(&self, lines: &[&str]) -> bool {
        lines.iter().any(|line| self.matches(line))
    }
}

/// Line-window scanner over raw, possibly-unparsable source text.
#[derive(Debug, Clone)]
pub struct WindowScanner {
    governance: PatternSet,
    tool: PatternSet,
    audit: PatternSet,
    consent: PatternSet,
    budget: PatternSet,
    data: PatternSet,
    spend: PatternSet,
    max_magic_value: i64,
}

impl Default for WindowScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowScanner {
    /// Creates a scanner from the default taxonomy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_taxonomy(&Taxonomy::new(), 5)
    }

    /// Creates a scanner that reuses the (possibly extended) taxonomy tables.
    #[must_use]
    pub fn with_taxonomy(taxonomy: &Taxonomy, max_magic_value: i64) -> Self {
        let patterns = |category: CallCategory| {
            taxonomy
                .vocabulary(category)
                .map(PatternSet::from_vocabulary)
                .unwrap_or_default()
        };
        Self {
            governance: patterns(CallCategory::GovernanceCheck),
            tool: patterns(CallCategory::ToolCall),
            audit: patterns(CallCategory::AuditLog),
            consent: patterns(CallCategory::ConsentCheck),
            budget: patterns(CallCategory::BudgetCheck),
            data: patterns(CallCategory::DataAccess),
            spend: patterns(CallCategory::SpendCall),
            max_magic_value,
        }
    }

    /// Scans `source` and returns violations ordered by (line, column).
    #[must_use]
    pub fn scan(&self, path: &Path, source: &str) -> Vec<Violation> {
        let lines: Vec<&str> = source.lines().collect();
        let mut violations = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let line_no = index + 1;

            if let Some((col, callee)) = self.tool.first_match(line) {
                if !preceded_by(&lines, index, col, GOVERNANCE_WINDOW, &self.governance) {
                    violations.push(
                        Violation::new(
                            "GV001",
                            "no-ungoverned-tool-call",
                            Severity::Error,
                            Location::new(path.to_path_buf(), line_no, col),
                            format!(
                                "'{callee}' looks like a tool invocation with no governance \
                                 check pattern within the preceding {GOVERNANCE_WINDOW} lines."
                            ),
                        )
                        .with_category(CallCategory::ToolCall),
                    );
                }
            }

            if let Some((col, callee)) = self.governance.first_match(line) {
                if !surrounded_by(&lines, index, AUDIT_WINDOW, &self.audit) {
                    violations.push(
                        Violation::new(
                            "GV002",
                            "no-unlogged-action",
                            Severity::Warning,
                            Location::new(path.to_path_buf(), line_no, col),
                            format!(
                                "'{callee}' looks like a governance check with no audit log \
                                 pattern within {AUDIT_WINDOW} surrounding lines."
                            ),
                        )
                        .with_category(CallCategory::GovernanceCheck),
                    );
                }
            }

            if let Some((col, callee)) = self.data.first_match(line) {
                if !preceded_by(&lines, index, col, CONSENT_WINDOW, &self.consent) {
                    violations.push(
                        Violation::new(
                            "GV004",
                            "require-consent-check",
                            Severity::Warning,
                            Location::new(path.to_path_buf(), line_no, col),
                            format!(
                                "'{callee}' looks like a data access with no consent check \
                                 pattern within the preceding {CONSENT_WINDOW} lines."
                            ),
                        )
                        .with_category(CallCategory::DataAccess),
                    );
                }
            }

            if let Some((col, callee)) = self.spend.first_match(line) {
                if !preceded_by(&lines, index, col, BUDGET_WINDOW, &self.budget) {
                    violations.push(
                        Violation::new(
                            "GV005",
                            "require-budget-check",
                            Severity::Warning,
                            Location::new(path.to_path_buf(), line_no, col),
                            format!(
                                "'{callee}' looks like a spending operation with no budget \
                                 check pattern within the preceding {BUDGET_WINDOW} lines."
                            ),
                        )
                        .with_category(CallCategory::SpendCall),
                    );
                }
            }

            if let Some((value, col)) = self.trust_literal(line) {
                violations.push(Violation::new(
                    "GV003",
                    "no-hardcoded-trust-level",
                    Severity::Warning,
                    Location::new(path.to_path_buf(), line_no, col),
                    format!(
                        "Magic number {value} used in a trust comparison. Replace it with \
                         a named constant (e.g. TrustLevel.OPERATOR) so the intent is explicit."
                    ),
                ));
            }
        }

        violations.sort_by_key(|v| (v.location.line, v.location.column));
        violations
    }

    /// Finds a small integer literal compared against a trust-like name on
    /// one line, returning (value, column of the literal).
    fn trust_literal(&self, line: &str) -> Option<(i64, usize)> {
        const COMPARE_TOKENS: [&str; 8] = ["===", "!==", "<=", ">=", "==", "!=", "<", ">"];

        for (idx, _) in line.char_indices() {
            for token in COMPARE_TOKENS {
                if !line[idx..].starts_with(token) {
                    continue;
                }
                let left = &line[..idx];
                let right = &line[idx + token.len()..];

                if contains_trust_word(left) {
                    if let Some((value, offset)) = leading_int(right) {
                        if (0..=self.max_magic_value).contains(&value) {
                            return Some((value, idx + token.len() + offset));
                        }
                    }
                }
                if contains_trust_word(right) {
                    if let Some((value, col)) = trailing_int(left) {
                        if (0..=self.max_magic_value).contains(&value) {
                            return Some((value, col));
                        }
                    }
                }
                break; // longest token at this index already tried
            }
        }
        None
    }
}

/// True when `patterns` matches in the `window` lines before `index`, or
/// earlier on the trigger line itself.
fn preceded_by(
    lines: &[&str],
    index: usize,
    col: usize,
    window: usize,
    patterns: &PatternSet,
) -> bool {
    let start = index.saturating_sub(window);
    patterns.matches_any(&lines[start..index]) || patterns.matches(&lines[index][..col])
}

/// True when `patterns` matches within `window` lines on either side of
/// `index`, the trigger line included (order is irrelevant for co-occurrence).
fn surrounded_by(lines: &[&str], index: usize, window: usize, patterns: &PatternSet) -> bool {
    let start = index.saturating_sub(window);
    let end = usize::min(lines.len(), index + window + 1);
    patterns.matches_any(&lines[start..end])
}

fn contains_trust_word(text: &str) -> bool {
    let lowered = text.to_lowercase();
    ["trust", "level", "tier", "clearance"]
        .iter()
        .any(|word| lowered.contains(word))
}

/// Integer at the start of `s` (after whitespace), as (value, offset of its
/// first digit). Floats and identifier tails are rejected.
fn leading_int(s: &str) -> Option<(i64, usize)> {
    let offset = s.len() - s.trim_start().len();
    let trimmed = &s[offset..];
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    let after = trimmed.chars().nth(digits.len());
    if matches!(after, Some(c) if c == '.' || c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    digits.parse().ok().map(|value| (value, offset))
}

/// Integer at the end of `s` (before whitespace), as (value, column of its
/// first digit). Floats, negatives, and identifier tails are rejected.
fn trailing_int(s: &str) -> Option<(i64, usize)> {
    let trimmed = s.trim_end();
    let digits: String = trimmed
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<String>()
        .chars()
        .rev()
        .collect();
    if digits.is_empty() {
        return None;
    }
    let start = trimmed.len() - digits.len();
    let before = trimmed[..start].chars().next_back();
    if matches!(before, Some(c) if c == '.' || c == '-' || c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    digits.parse().ok().map(|value| (value, start))
}
