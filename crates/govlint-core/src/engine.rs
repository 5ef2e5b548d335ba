//! Precedence and co-occurrence evaluation.
//!
//! The ordinal core of the linter: given the calls collected from a scope,
//! decide whether a prerequisite call occurs strictly before a trigger in
//! source order, or anywhere in the scope at all.

use crate::model::{CallSite, EnclosingScope, FileModel, Position};
use crate::taxonomy::CallCategory;

/// Sort key for an optional position.
///
/// Missing positions sort after everything, so a call lacking location data
/// can never satisfy a precedence requirement. Conservative bias toward
/// reporting.
#[must_use]
pub fn position_key(position: Option<Position>) -> (usize, usize) {
    position.map_or((usize::MAX, usize::MAX), |p| (p.line, p.column))
}

/// True iff some call satisfying `predicate` sorts strictly before `target`
/// under (line ascending, then column ascending).
pub fn precedes<P>(calls: &[&CallSite], target: Option<Position>, predicate: P) -> bool
where
    P: Fn(&CallSite) -> bool,
{
    let target_key = position_key(target);
    calls
        .iter()
        .any(|call| predicate(call) && position_key(call.position) < target_key)
}

/// True iff any call satisfies `predicate`, regardless of order.
pub fn co_occurs<P>(calls: &[&CallSite], predicate: P) -> bool
where
    P: Fn(&CallSite) -> bool,
{
    calls.iter().any(|call| predicate(call))
}

/// What a rule requires of the trigger's enclosing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// A call of this category must occur before the trigger.
    Precedes(CallCategory),
    /// A call of this category must occur anywhere in the scope.
    CoOccurs(CallCategory),
    /// A pure syntactic shape check; no companion call is involved.
    LiteralShape,
}

/// Returns every call of category `trigger` whose requirement is unmet.
///
/// For each trigger the enclosing scope is resolved and its calls collected;
/// a trigger with no enclosing function-like scope is unmet by construction
/// (top-level code is reported unconditionally). Cross-scope or cross-file
/// satisfaction never counts.
#[must_use]
pub fn unmet_triggers<'m>(
    model: &'m FileModel,
    trigger: CallCategory,
    requirement: Requirement,
) -> Vec<&'m CallSite> {
    let mut unmet = Vec::new();
    for (id, call) in model.calls() {
        if call.category != trigger {
            continue;
        }
        match model.enclosing_scope(id) {
            EnclosingScope::TopLevel => unmet.push(call),
            scope @ EnclosingScope::Scope(_) => {
                let calls = model.calls_within(scope);
                let satisfied = match requirement {
                    Requirement::Precedes(category) => {
                        precedes(&calls, call.position, |c| c.category == category)
                    }
                    Requirement::CoOccurs(category) => {
                        co_occurs(&calls, |c| c.category == category)
                    }
                    // Shape checks never have a companion-call requirement.
                    Requirement::LiteralShape => true,
                };
                if !satisfied {
                    unmet.push(call);
                }
            }
        }
    }
    unmet
}
