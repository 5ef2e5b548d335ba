//! Suggested-fix placeholders keyed by rule id.
//!
//! The linter never synthesizes governance logic: the correct arguments to a
//! check call require semantic knowledge it does not have. What it can offer
//! is an inert placeholder. [`SuggestedFix`] enforces that boundary by
//! construction: its body lines are private and every one of them is
//! comment-prefixed before it is stored, so the payload cannot carry
//! executable text.

/// Comment marker of the host language a fix is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentMarker {
    /// `#` (Python).
    Hash,
    /// `//` (JavaScript).
    Slashes,
}

impl CommentMarker {
    /// The marker's source text.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hash => "#",
            Self::Slashes => "//",
        }
    }
}

/// An inert, insertable placeholder for one rule's violation.
#[derive(Debug, Clone)]
pub struct SuggestedFix {
    /// Rule id this fix belongs to.
    pub rule: String,
    /// Human-readable explanation of what a real fix needs to do.
    pub description: String,
    lines: Vec<String>,
}

impl SuggestedFix {
    fn new(rule: &str, description: &str, body: &[&str], marker: CommentMarker) -> Self {
        Self {
            rule: rule.to_owned(),
            description: description.to_owned(),
            lines: body
                .iter()
                .map(|line| format!("{} {line}", marker.as_str()))
                .collect(),
        }
    }

    /// The comment-prefixed placeholder lines.
    #[must_use]
    pub fn placeholder(&self) -> &[String] {
        &self.lines
    }

    /// Placeholder joined into one insertable block.
    #[must_use]
    pub fn rendered(&self) -> String {
        self.lines.join("\n")
    }

    /// Returns the fix template for `rule`, or `None` when the rule has no
    /// mechanical placeholder.
    #[must_use]
    pub fn for_rule(rule: &str, marker: CommentMarker) -> Option<Self> {
        match rule {
            "no-ungoverned-tool-call" => Some(Self::new(
                rule,
                "Add a governance check before invoking the tool.",
                &["TODO(governance): authorise this action first, e.g. engine.check(action, context)"],
                marker,
            )),
            "no-unlogged-action" => Some(Self::new(
                rule,
                "Pass the governance decision to an audit logger.",
                &["TODO(governance): record the decision, e.g. audit.log(decision)"],
                marker,
            )),
            "no-hardcoded-trust-level" => Some(Self::new(
                rule,
                "Replace the numeric literal with a named trust-level constant.",
                &["TODO(governance): introduce a TrustLevel constant for this threshold"],
                marker,
            )),
            "require-consent-check" => Some(Self::new(
                rule,
                "Verify consent before the data access.",
                &["TODO(governance): confirm consent first, e.g. consent.check(subject, purpose)"],
                marker,
            )),
            "require-budget-check" => Some(Self::new(
                rule,
                "Reserve budget before the spending operation.",
                &["TODO(governance): check budget first, e.g. budget.canSpend(estimate)"],
                marker,
            )),
            _ => None,
        }
    }

    /// Rule ids that have a fix template.
    #[must_use]
    pub fn supported_rules() -> &'static [&'static str] {
        &[
            "no-ungoverned-tool-call",
            "no-unlogged-action",
            "no-hardcoded-trust-level",
            "require-consent-check",
            "require-budget-check",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_supported_rule_has_a_template() {
        for rule in SuggestedFix::supported_rules() {
            let fix = SuggestedFix::for_rule(rule, CommentMarker::Hash);
            assert!(fix.is_some(), "missing template for {rule}");
        }
    }

    #[test]
    fn unknown_rule_has_no_template() {
        assert!(SuggestedFix::for_rule("parse-error", CommentMarker::Hash).is_none());
    }

    #[test]
    fn placeholder_lines_are_always_comments() {
        for rule in SuggestedFix::supported_rules() {
            for marker in [CommentMarker::Hash, CommentMarker::Slashes] {
                let fix = SuggestedFix::for_rule(rule, marker).expect("template exists");
                for line in fix.placeholder() {
                    assert!(
                        line.starts_with(marker.as_str()),
                        "uncommented placeholder line in {rule}: {line}"
                    );
                }
            }
        }
    }

    #[test]
    fn rendered_uses_host_marker() {
        let fix = SuggestedFix::for_rule("no-unlogged-action", CommentMarker::Slashes)
            .expect("template exists");
        assert!(fix.rendered().starts_with("// TODO(governance):"));
    }
}
