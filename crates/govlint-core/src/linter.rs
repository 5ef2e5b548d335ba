//! Per-file lint driver.

use tracing::debug;

use crate::config::Config;
use crate::context::FileContext;
use crate::model::FileModel;
use crate::rule::RuleBox;
use crate::suppression::{partition_suppressed, SuppressionReport};
use crate::types::Violation;

/// Drives a rule set over one file's model at a time.
///
/// Holds no per-file state: the same linter is reused across every file of a
/// run, and files are independent units of work.
pub struct Linter {
    rules: Vec<RuleBox>,
    config: Config,
}

impl Linter {
    /// Creates a linter with the given rules and a default configuration.
    #[must_use]
    pub fn new(rules: Vec<RuleBox>) -> Self {
        Self {
            rules,
            config: Config::default(),
        }
    }

    /// Sets the configuration (enablement and severity overrides).
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Runs every enabled rule over `model` and returns the violations,
    /// sorted by (line, column).
    ///
    /// Running twice on the same input yields an identical sequence.
    #[must_use]
    pub fn lint(&self, ctx: &FileContext, model: &FileModel) -> Vec<Violation> {
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let mut rule_violations = rule.check(ctx, model);
            if let Some(severity) = self.config.rule_severity(rule.name()) {
                for violation in &mut rule_violations {
                    violation.severity = severity;
                }
            }
            violations.extend(rule_violations);
        }

        // Byte offsets for span-based renderers.
        for violation in &mut violations {
            violation.location.offset =
                ctx.offset_for(violation.location.line, violation.location.column);
        }

        violations.sort_by_key(|v| (v.location.line, v.location.column));
        violations
    }

    /// Like [`lint`](Self::lint), but partitions out violations covered by
    /// inline suppression directives in the source.
    #[must_use]
    pub fn lint_with_suppressions(&self, ctx: &FileContext, model: &FileModel) -> SuppressionReport {
        partition_suppressed(self.lint(ctx, model), ctx.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelBuilder;
    use crate::rule::Rule;
    use crate::types::{Location, Severity};
    use std::path::Path;

    struct FixedRule {
        name: &'static str,
        lines: &'static [usize],
    }

    impl Rule for FixedRule {
        fn name(&self) -> &'static str {
            self.name
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn check(&self, ctx: &FileContext, _model: &FileModel) -> Vec<Violation> {
            self.lines
                .iter()
                .map(|line| {
                    Violation::new(
                        self.code(),
                        self.name,
                        Severity::Warning,
                        Location::new(ctx.relative_path.clone(), *line, 0),
                        "fixed violation",
                    )
                })
                .collect()
        }
    }

    fn linter(rules: Vec<RuleBox>) -> Linter {
        Linter::new(rules)
    }

    #[test]
    fn violations_come_back_position_sorted() {
        let rules: Vec<RuleBox> = vec![
            Box::new(FixedRule {
                name: "rule-b",
                lines: &[9, 2],
            }),
            Box::new(FixedRule {
                name: "rule-a",
                lines: &[5],
            }),
        ];
        let ctx = FileContext::new(Path::new("a.py"), "", Path::new("."));
        let model = ModelBuilder::new().finish();

        let violations = linter(rules).lint(&ctx, &model);
        let lines: Vec<usize> = violations.iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![2, 5, 9]);
    }

    #[test]
    fn disabled_rule_is_skipped() {
        let rules: Vec<RuleBox> = vec![Box::new(FixedRule {
            name: "rule-a",
            lines: &[1],
        })];
        let config = Config::parse("[rules.rule-a]\nenabled = false\n").expect("valid toml");
        let ctx = FileContext::new(Path::new("a.py"), "", Path::new("."));
        let model = ModelBuilder::new().finish();

        let violations = linter(rules).with_config(config).lint(&ctx, &model);
        assert!(violations.is_empty());
    }

    #[test]
    fn severity_override_applies() {
        let rules: Vec<RuleBox> = vec![Box::new(FixedRule {
            name: "rule-a",
            lines: &[1],
        })];
        let config = Config::parse("[rules.rule-a]\nseverity = \"error\"\n").expect("valid toml");
        let ctx = FileContext::new(Path::new("a.py"), "", Path::new("."));
        let model = ModelBuilder::new().finish();

        let violations = linter(rules).with_config(config).lint(&ctx, &model);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn suppressed_violations_are_partitioned() {
        let rules: Vec<RuleBox> = vec![Box::new(FixedRule {
            name: "rule-a",
            lines: &[2],
        })];
        let source = "# govlint: disable-next-line=rule-a\nx = 1\n";
        let ctx = FileContext::new(Path::new("a.py"), source, Path::new("."));
        let model = ModelBuilder::new().finish();

        let report = linter(rules).lint_with_suppressions(&ctx, &model);
        assert_eq!(report.suppression_count(), 1);
        assert!(report.active.is_empty());
    }

    #[test]
    fn lint_is_idempotent() {
        let rules: Vec<RuleBox> = vec![Box::new(FixedRule {
            name: "rule-a",
            lines: &[3, 1],
        })];
        let ctx = FileContext::new(Path::new("a.py"), "", Path::new("."));
        let model = ModelBuilder::new().finish();
        let linter = linter(rules);

        let first: Vec<String> = linter
            .lint(&ctx, &model)
            .iter()
            .map(ToString::to_string)
            .collect();
        let second: Vec<String> = linter
            .lint(&ctx, &model)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(first, second);
    }
}
