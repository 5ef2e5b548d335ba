//! Inline suppression directives.
//!
//! Two directive forms are recognized inside `#` or `//` comments:
//!
//! ```text
//! tool.run(task)          # govlint: disable=no-ungoverned-tool-call
//! # govlint: disable-next-line=no-hardcoded-trust-level
//! if level >= 3: ...
//! ```
//!
//! `disable` covers its own line, `disable-next-line` the line below. Omitting
//! `=RULE` suppresses every rule on the covered line. Suppressed violations
//! are kept in a [`SuppressionReport`] so operators can audit what was
//! silenced.

use crate::types::Violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirectiveKind {
    Disable,
    DisableNextLine,
}

#[derive(Debug, Clone)]
struct Directive {
    line: usize,
    kind: DirectiveKind,
    rule: Option<String>,
}

/// All suppression directives parsed from one source file.
#[derive(Debug, Clone, Default)]
pub struct Suppressions {
    directives: Vec<Directive>,
}

impl Suppressions {
    /// Parses every directive in `source`.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let directives = source
            .lines()
            .enumerate()
            .filter_map(|(index, text)| parse_directive(index + 1, text))
            .collect();
        Self { directives }
    }

    /// True when `rule` on 1-based `line` is covered by a directive.
    #[must_use]
    pub fn is_suppressed(&self, line: usize, rule: &str) -> bool {
        self.directives.iter().any(|directive| {
            let line_covered = match directive.kind {
                DirectiveKind::Disable => directive.line == line,
                DirectiveKind::DisableNextLine => directive.line + 1 == line,
            };
            line_covered && directive.rule.as_deref().map_or(true, |r| r == rule)
        })
    }

    /// Number of directives found in the source.
    #[must_use]
    pub fn directive_count(&self) -> usize {
        self.directives.len()
    }
}

/// Audit record of suppressed violations.
#[derive(Debug, Default)]
pub struct SuppressionReport {
    /// Violations silenced by an inline directive.
    pub suppressed: Vec<Violation>,
    /// Violations that remain active.
    pub active: Vec<Violation>,
}

impl SuppressionReport {
    /// Number of suppressed violations.
    #[must_use]
    pub fn suppression_count(&self) -> usize {
        self.suppressed.len()
    }
}

/// Partitions `violations` into suppressed and active using the directives
/// found in `source`.
#[must_use]
pub fn partition_suppressed(violations: Vec<Violation>, source: &str) -> SuppressionReport {
    let suppressions = Suppressions::parse(source);
    let mut report = SuppressionReport::default();

    for violation in violations {
        if suppressions.is_suppressed(violation.location.line, &violation.rule) {
            report.suppressed.push(violation);
        } else {
            report.active.push(violation);
        }
    }

    report
}

fn parse_directive(line: usize, text: &str) -> Option<Directive> {
    let marker = text.find("govlint:")?;
    // The directive must sit in a `#` or `//` comment.
    let before = text[..marker].trim_end();
    if !(before.ends_with('#') || before.ends_with("//")) {
        return None;
    }

    let rest = text[marker + "govlint:".len()..].trim();
    let (kind, rest) = if let Some(tail) = rest.strip_prefix("disable-next-line") {
        (DirectiveKind::DisableNextLine, tail)
    } else if let Some(tail) = rest.strip_prefix("disable") {
        (DirectiveKind::Disable, tail)
    } else {
        return None;
    };

    let rest = rest.trim();
    let rule = match rest.strip_prefix('=') {
        Some(name) => {
            let name: String = name
                .trim_start()
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect();
            if name.is_empty() {
                return None;
            }
            Some(name)
        }
        None if rest.is_empty() => None,
        // Trailing prose after the keyword: not a directive.
        None => return None,
    };

    Some(Directive { line, kind, rule })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Severity};
    use std::path::PathBuf;

    fn violation(rule: &str, line: usize) -> Violation {
        Violation::new(
            "GV001",
            rule,
            Severity::Warning,
            Location::new(PathBuf::from("agent.py"), line, 0),
            "test",
        )
    }

    #[test]
    fn disable_covers_its_own_line() {
        let source = "tool.run(task)  # govlint: disable=no-ungoverned-tool-call\n";
        let suppressions = Suppressions::parse(source);
        assert!(suppressions.is_suppressed(1, "no-ungoverned-tool-call"));
        assert!(!suppressions.is_suppressed(2, "no-ungoverned-tool-call"));
        assert!(!suppressions.is_suppressed(1, "require-budget-check"));
    }

    #[test]
    fn disable_next_line_covers_the_line_below() {
        let source = "# govlint: disable-next-line=no-hardcoded-trust-level\nif level >= 3:\n";
        let suppressions = Suppressions::parse(source);
        assert!(suppressions.is_suppressed(2, "no-hardcoded-trust-level"));
        assert!(!suppressions.is_suppressed(1, "no-hardcoded-trust-level"));
    }

    #[test]
    fn bare_disable_covers_all_rules() {
        let source = "// govlint: disable-next-line\nconst x = tool.run(task);\n";
        let suppressions = Suppressions::parse(source);
        assert!(suppressions.is_suppressed(2, "no-ungoverned-tool-call"));
        assert!(suppressions.is_suppressed(2, "require-budget-check"));
    }

    #[test]
    fn slash_comments_are_recognized() {
        let source = "tool.run(task); // govlint: disable=no-ungoverned-tool-call\n";
        assert!(Suppressions::parse(source).is_suppressed(1, "no-ungoverned-tool-call"));
    }

    #[test]
    fn directive_outside_comment_is_ignored() {
        let source = "text = \"govlint: disable=no-ungoverned-tool-call\"\n";
        assert_eq!(Suppressions::parse(source).directive_count(), 0);
    }

    #[test]
    fn trailing_prose_is_not_a_directive() {
        let source = "# govlint: disable everything please\n";
        assert_eq!(Suppressions::parse(source).directive_count(), 0);
    }

    #[test]
    fn partition_separates_suppressed_from_active() {
        let source = "\n# govlint: disable-next-line=no-ungoverned-tool-call\ntool.run(task)\n";
        let violations = vec![
            violation("no-ungoverned-tool-call", 3),
            violation("require-budget-check", 3),
        ];
        let report = partition_suppressed(violations, source);
        assert_eq!(report.suppression_count(), 1);
        assert_eq!(report.active.len(), 1);
        assert_eq!(report.active[0].rule, "require-budget-check");
    }
}
