//! Permission checks against a resolved ability.
//!
//! A rule grants a request when its action covers the requested action, its
//! subject type covers the subject's type, and (for object subjects) every
//! condition holds. Type-only subjects treat conditions as satisfied: the
//! answer is "could this ever be permitted", which is for capability probing
//! and must not be used to authorize an operation on a concrete object.

use crate::{Ability, ActionName, Subject};

/// Result of a permission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Granted by the rule at this index in the ability.
    Allow { rule: usize },
    Deny { reason: String },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }
}

/// Whether `ability` permits `action` on `subject`.
pub fn can(ability: &Ability, action: ActionName, subject: Subject<'_>) -> bool {
    first_match(ability, action, subject).is_some()
}

/// Like [`can`], with the matching rule or a denial reason.
pub fn check(ability: &Ability, action: ActionName, subject: Subject<'_>) -> Decision {
    if let Some(rule) = first_match(ability, action, subject) {
        return Decision::Allow { rule };
    }

    let type_name = subject.type_name();
    let reason = if ability.rules_for(action, type_name).next().is_none() {
        format!("no rule grants {action} on {type_name}")
    } else {
        format!("conditions for {action} on {type_name} not met")
    };
    Decision::Deny { reason }
}

fn first_match(ability: &Ability, action: ActionName, subject: Subject<'_>) -> Option<usize> {
    let type_name = subject.type_name();
    ability
        .rules_for(action, type_name)
        .find(|(_, rule)| match subject {
            Subject::Type(_) => true,
            Subject::Object(record) => rule.matches(record),
        })
        .map(|(index, _)| index)
}
