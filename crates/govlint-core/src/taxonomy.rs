//! Call-shape taxonomy: the seven categories of governance-relevant calls.
//!
//! A call is classified purely by the static shape of its callee
//! (`object.method(...)` or a bare `function(...)`) against fixed name sets.
//! No aliasing, import, or type resolution is attempted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::CalleeShape;

/// Classification of a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallCategory {
    /// A governance / trust check, e.g. `engine.check()`.
    GovernanceCheck,
    /// A tool invocation, e.g. `tool.run()`.
    ToolCall,
    /// An audit log call, e.g. `audit.log()` or bare `auditLog()`.
    AuditLog,
    /// A consent / privacy check, e.g. `consent.check()`.
    ConsentCheck,
    /// A budget / quota check, e.g. `budget.canSpend()`.
    BudgetCheck,
    /// A personal-data access, e.g. `db.query()`.
    DataAccess,
    /// A spending operation, e.g. `llm.complete()`.
    SpendCall,
    /// Anything that matched no category.
    Unclassified,
}

impl CallCategory {
    /// Human-readable label used in diagnostic messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::GovernanceCheck => "governance check",
            Self::ToolCall => "tool call",
            Self::AuditLog => "audit log",
            Self::ConsentCheck => "consent check",
            Self::BudgetCheck => "budget check",
            Self::DataAccess => "data access",
            Self::SpendCall => "spend call",
            Self::Unclassified => "unclassified",
        }
    }
}

impl std::fmt::Display for CallCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Name sets defining one category.
///
/// A method call `obj.m(...)` matches when `obj` is in the receiver set and
/// `m` in the method set, or when `(obj, m)` is a caller-supplied extra pair.
/// A bare call `f(...)` matches only through the function-name set (used by
/// the audit-log category).
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    objects: HashSet<String>,
    methods: HashSet<String>,
    functions: HashSet<String>,
    pairs: Vec<(String, String)>,
}

impl Vocabulary {
    fn new(objects: &[&str], methods: &[&str]) -> Self {
        Self {
            objects: objects.iter().map(|s| (*s).to_owned()).collect(),
            methods: methods.iter().map(|s| (*s).to_owned()).collect(),
            functions: HashSet::new(),
            pairs: Vec::new(),
        }
    }

    fn with_functions(mut self, functions: &[&str]) -> Self {
        self.functions = functions.iter().map(|s| (*s).to_owned()).collect();
        self
    }

    /// Returns true when `object.method(...)` belongs to this vocabulary.
    #[must_use]
    pub fn matches_method(&self, object: &str, method: &str) -> bool {
        (self.objects.contains(object) && self.methods.contains(method))
            || self.pairs.iter().any(|(o, m)| o == object && m == method)
    }

    /// Returns true when a bare `name(...)` belongs to this vocabulary.
    #[must_use]
    pub fn matches_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    /// Merges caller-supplied patterns into this vocabulary.
    ///
    /// `"object.method"` becomes an exact extra pair; a bare name widens the
    /// receiver set.
    pub fn extend_patterns(&mut self, patterns: &[String]) {
        for pattern in patterns {
            match pattern.split_once('.') {
                Some((object, method)) => {
                    self.pairs
                        .push((object.trim().to_owned(), method.trim().to_owned()));
                }
                None => {
                    self.objects.insert(pattern.trim().to_owned());
                }
            }
        }
    }

    /// Receiver names in this vocabulary.
    pub fn objects(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(String::as_str)
    }

    /// Method names in this vocabulary.
    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(String::as_str)
    }

    /// Bare function names in this vocabulary.
    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(String::as_str)
    }

    /// Caller-supplied exact `(object, method)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(o, m)| (o.as_str(), m.as_str()))
    }
}

/// The process-wide classification tables.
///
/// Built once per run, optionally extended with caller-supplied tool and
/// governance patterns, then treated as read-only.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    governance: Vocabulary,
    tool: Vocabulary,
    audit: Vocabulary,
    consent: Vocabulary,
    budget: Vocabulary,
    data: Vocabulary,
    spend: Vocabulary,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new()
    }
}

impl Taxonomy {
    /// Creates the default taxonomy.
    ///
    /// Method sets carry both camelCase and snake_case spellings so one table
    /// serves both host languages.
    #[must_use]
    pub fn new() -> Self {
        Self {
            governance: Vocabulary::new(
                &["engine", "governance", "trust", "policy", "aumos"],
                &["check", "verify", "validate", "authorize", "permit"],
            ),
            tool: Vocabulary::new(
                &["tool", "tools", "agent", "executor"],
                &["run", "execute", "invoke", "call", "dispatch"],
            ),
            audit: Vocabulary::new(
                &["audit", "logger", "log", "auditLog"],
                &[
                    "log", "write", "record", "emit", "info", "debug", "warn", "error",
                ],
            )
            .with_functions(&["auditLog", "auditAction", "logAction", "recordAction"]),
            consent: Vocabulary::new(
                &["consent", "privacy", "gdpr", "permissions"],
                &[
                    "check",
                    "verify",
                    "hasConsent",
                    "isAllowed",
                    "grant",
                    "has_consent",
                    "is_allowed",
                ],
            ),
            budget: Vocabulary::new(
                &["budget", "cost", "quota", "spend", "billing", "tokens"],
                &[
                    "check",
                    "verify",
                    "canSpend",
                    "hasQuota",
                    "authorize",
                    "reserve",
                    "can_spend",
                    "has_quota",
                ],
            ),
            data: Vocabulary::new(
                &[
                    "db",
                    "database",
                    "repo",
                    "repository",
                    "store",
                    "user",
                    "users",
                    "profile",
                    "customer",
                ],
                &[
                    "query",
                    "find",
                    "findOne",
                    "findAll",
                    "findById",
                    "fetch",
                    "get",
                    "read",
                    "select",
                    "load",
                    "find_one",
                    "find_all",
                    "find_by_id",
                ],
            ),
            spend: Vocabulary::new(
                &[
                    "api",
                    "openai",
                    "anthropic",
                    "llm",
                    "model",
                    "tokens",
                    "completion",
                    "embedding",
                ],
                &[
                    "call",
                    "chat",
                    "complete",
                    "generate",
                    "embed",
                    "use",
                    "consume",
                    "request",
                    "create",
                    "createCompletion",
                    "createChatCompletion",
                    "create_completion",
                    "create_chat_completion",
                ],
            ),
        }
    }

    /// Merges additional tool-call patterns (configuration extension point).
    pub fn extend_tool_patterns(&mut self, patterns: &[String]) {
        self.tool.extend_patterns(patterns);
    }

    /// Merges additional governance-check patterns.
    pub fn extend_check_patterns(&mut self, patterns: &[String]) {
        self.governance.extend_patterns(patterns);
    }

    /// Returns the vocabulary backing a category, if it has one.
    #[must_use]
    pub fn vocabulary(&self, category: CallCategory) -> Option<&Vocabulary> {
        match category {
            CallCategory::GovernanceCheck => Some(&self.governance),
            CallCategory::ToolCall => Some(&self.tool),
            CallCategory::AuditLog => Some(&self.audit),
            CallCategory::ConsentCheck => Some(&self.consent),
            CallCategory::BudgetCheck => Some(&self.budget),
            CallCategory::DataAccess => Some(&self.data),
            CallCategory::SpendCall => Some(&self.spend),
            CallCategory::Unclassified => None,
        }
    }

    /// Classifies a callee shape into a category.
    ///
    /// Method sets are disjoint across categories, so the first match in the
    /// fixed order below is the only possible match. Opaque callees (computed
    /// member access, chained calls) are never classified.
    #[must_use]
    pub fn classify(&self, callee: &CalleeShape) -> CallCategory {
        match callee {
            CalleeShape::Method { object, method } => {
                let checks = [
                    (&self.governance, CallCategory::GovernanceCheck),
                    (&self.tool, CallCategory::ToolCall),
                    (&self.audit, CallCategory::AuditLog),
                    (&self.consent, CallCategory::ConsentCheck),
                    (&self.budget, CallCategory::BudgetCheck),
                    (&self.data, CallCategory::DataAccess),
                    (&self.spend, CallCategory::SpendCall),
                ];
                for (vocabulary, category) in checks {
                    if vocabulary.matches_method(object, method) {
                        return category;
                    }
                }
                CallCategory::Unclassified
            }
            CalleeShape::Function(name) => {
                if self.audit.matches_function(name) {
                    CallCategory::AuditLog
                } else {
                    CallCategory::Unclassified
                }
            }
            CalleeShape::Opaque => CallCategory::Unclassified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(object: &str, name: &str) -> CalleeShape {
        CalleeShape::Method {
            object: object.to_owned(),
            method: name.to_owned(),
        }
    }

    #[test]
    fn classifies_method_calls() {
        let taxonomy = Taxonomy::new();
        assert_eq!(
            taxonomy.classify(&method("engine", "check")),
            CallCategory::GovernanceCheck
        );
        assert_eq!(
            taxonomy.classify(&method("tool", "run")),
            CallCategory::ToolCall
        );
        assert_eq!(
            taxonomy.classify(&method("db", "query")),
            CallCategory::DataAccess
        );
        assert_eq!(
            taxonomy.classify(&method("openai", "chat")),
            CallCategory::SpendCall
        );
    }

    #[test]
    fn tokens_receiver_disambiguated_by_method() {
        let taxonomy = Taxonomy::new();
        // "tokens" appears in both the budget and spend receiver sets;
        // the method sets are disjoint and decide the category.
        assert_eq!(
            taxonomy.classify(&method("tokens", "reserve")),
            CallCategory::BudgetCheck
        );
        assert_eq!(
            taxonomy.classify(&method("tokens", "use")),
            CallCategory::SpendCall
        );
    }

    #[test]
    fn classifies_bare_audit_functions() {
        let taxonomy = Taxonomy::new();
        assert_eq!(
            taxonomy.classify(&CalleeShape::Function("auditLog".to_owned())),
            CallCategory::AuditLog
        );
        assert_eq!(
            taxonomy.classify(&CalleeShape::Function("helper".to_owned())),
            CallCategory::Unclassified
        );
    }

    #[test]
    fn opaque_callees_are_never_classified() {
        let taxonomy = Taxonomy::new();
        assert_eq!(
            taxonomy.classify(&CalleeShape::Opaque),
            CallCategory::Unclassified
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        let taxonomy = Taxonomy::new();
        assert_eq!(
            taxonomy.classify(&method("Tool", "run")),
            CallCategory::Unclassified
        );
    }

    #[test]
    fn extends_with_pair_pattern() {
        let mut taxonomy = Taxonomy::new();
        taxonomy.extend_tool_patterns(&["sandbox.spawn".to_owned()]);
        assert_eq!(
            taxonomy.classify(&method("sandbox", "spawn")),
            CallCategory::ToolCall
        );
        // Only the exact pair was added, not the cartesian product.
        assert_eq!(
            taxonomy.classify(&method("sandbox", "run")),
            CallCategory::Unclassified
        );
    }

    #[test]
    fn extends_with_bare_receiver_pattern() {
        let mut taxonomy = Taxonomy::new();
        taxonomy.extend_check_patterns(&["guard".to_owned()]);
        assert_eq!(
            taxonomy.classify(&method("guard", "verify")),
            CallCategory::GovernanceCheck
        );
    }

    #[test]
    fn snake_case_spellings_are_recognized() {
        let taxonomy = Taxonomy::new();
        assert_eq!(
            taxonomy.classify(&method("consent", "has_consent")),
            CallCategory::ConsentCheck
        );
        assert_eq!(
            taxonomy.classify(&method("quota", "can_spend")),
            CallCategory::BudgetCheck
        );
        assert_eq!(
            taxonomy.classify(&method("repo", "find_by_id")),
            CallCategory::DataAccess
        );
    }
}
