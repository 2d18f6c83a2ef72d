//! Compiles an ability into a storage filter.
//!
//! For any object `o` of type `T`, `o` satisfies
//! `accessible_filter(ability, action, T)` exactly when
//! `can(ability, action, Subject::Object(o))` holds. Both sides select rules
//! through [`Ability::rules_for`] and evaluate conditions with
//! [`Condition::matches`].

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};
use tracing::trace;

use crate::subject::Record;
use crate::{Ability, ActionName, Condition};

/// A storage-agnostic predicate: OR over clauses, each an AND of equalities.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq)]
enum Repr {
    Everything,
    Nothing,
    AnyOf(Vec<Vec<Condition>>),
}

impl Filter {
    /// Matches every object.
    pub fn everything() -> Self {
        Self {
            repr: Repr::Everything,
        }
    }

    /// Matches no object. Callers should return an empty result set.
    pub fn nothing() -> Self {
        Self {
            repr: Repr::Nothing,
        }
    }

    pub fn is_everything(&self) -> bool {
        matches!(self.repr, Repr::Everything)
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self.repr, Repr::Nothing)
    }

    /// The OR-ed conjunctions. Empty for the everything/nothing filters.
    pub fn clauses(&self) -> &[Vec<Condition>] {
        match &self.repr {
            Repr::AnyOf(clauses) => clauses.as_slice(),
            Repr::Everything | Repr::Nothing => &[],
        }
    }

    /// Evaluate in memory, with the same equality semantics as the checker.
    pub fn matches(&self, record: &dyn Record) -> bool {
        match &self.repr {
            Repr::Everything => true,
            Repr::Nothing => false,
            Repr::AnyOf(clauses) => clauses
                .iter()
                .any(|clause| clause.iter().all(|c| c.matches(record))),
        }
    }

    /// Render as a MongoDB-style query document.
    ///
    /// `{}` matches everything and `{"$nor": [{}]}` matches nothing. A clause
    /// naming the same field twice is rendered with `$and` so neither
    /// constraint is lost.
    pub fn to_query(&self) -> Value {
        match &self.repr {
            Repr::Everything => json!({}),
            Repr::Nothing => json!({ "$nor": [{}] }),
            Repr::AnyOf(clauses) => {
                let clauses: Vec<Value> = clauses.iter().map(|c| clause_query(c)).collect();
                json!({ "$or": clauses })
            }
        }
    }
}

fn clause_query(clause: &[Condition]) -> Value {
    let mut fields = Map::new();
    for condition in clause {
        if fields
            .insert(condition.field.clone(), condition.value.clone())
            .is_some()
        {
            let parts: Vec<Value> = clause
                .iter()
                .map(|c| {
                    let mut single = Map::new();
                    single.insert(c.field.clone(), c.value.clone());
                    Value::Object(single)
                })
                .collect();
            return json!({ "$and": parts });
        }
    }
    Value::Object(fields)
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_query().serialize(serializer)
    }
}

/// Compile the rules of `ability` relevant to `action` on `subject_type`.
pub fn accessible_filter(ability: &Ability, action: ActionName, subject_type: &str) -> Filter {
    let mut clauses: Vec<Vec<Condition>> = Vec::new();
    for (_, rule) in ability.rules_for(action, subject_type) {
        if rule.is_unconditional() {
            trace!(%action, subject_type, "unconditional grant, filter matches everything");
            return Filter::everything();
        }
        if !clauses.contains(&rule.conditions) {
            clauses.push(rule.conditions.clone());
        }
    }

    if clauses.is_empty() {
        trace!(%action, subject_type, "no applicable rules, filter matches nothing");
        return Filter::nothing();
    }

    trace!(%action, subject_type, clauses = clauses.len(), "compiled filter");
    Filter {
        repr: Repr::AnyOf(clauses),
    }
}
