//! The resolved, immutable rule set of one principal.

use crate::checker::{self, Decision};
use crate::filter::{self, Filter};
use crate::{ActionName, PrincipalKey, Rule, Subject};

/// An ordered list of rules bound to one principal.
///
/// Never mutated after construction. Two abilities compare equal when they
/// belong to the same principal id and role; rule lists are not compared.
#[derive(Debug, Clone)]
pub struct Ability {
    principal: PrincipalKey,
    rules: Vec<Rule>,
}

impl Ability {
    pub fn new(principal: PrincipalKey, rules: Vec<Rule>) -> Self {
        Self { principal, rules }
    }

    pub fn principal(&self) -> &PrincipalKey {
        &self.principal
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules relevant to `action` on `type_name`, in order, with their index.
    ///
    /// Both the checker and the filter compiler select rules through here.
    pub fn rules_for<'a>(
        &'a self,
        action: ActionName,
        type_name: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Rule)> + 'a {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.applies_to(action, type_name))
    }

    /// Whether `action` is permitted on `subject`.
    pub fn can<'s>(&self, action: ActionName, subject: impl Into<Subject<'s>>) -> bool {
        checker::can(self, action, subject.into())
    }

    /// Like [`Ability::can`], but reports which rule matched or why none did.
    pub fn check<'s>(&self, action: ActionName, subject: impl Into<Subject<'s>>) -> Decision {
        checker::check(self, action, subject.into())
    }

    /// Storage filter selecting exactly the `subject_type` objects `can` would approve.
    pub fn accessible_filter(&self, action: ActionName, subject_type: &str) -> Filter {
        filter::accessible_filter(self, action, subject_type)
    }
}

impl PartialEq for Ability {
    fn eq(&self, other: &Self) -> bool {
        self.principal == other.principal
    }
}

impl Eq for Ability {}
