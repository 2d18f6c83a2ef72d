//! Grants: one action on one subject type, optionally scoped by field equality.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::subject::Record;
use crate::{ActionName, Error, Result};

/// The subject type a rule applies to.
///
/// `All` is the wildcard and matches every concrete type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubjectType {
    All,
    Named(String),
}

impl SubjectType {
    pub const WILDCARD: &'static str = "all";

    pub fn named(name: impl Into<String>) -> Self {
        Self::from(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            SubjectType::All => Self::WILDCARD,
            SubjectType::Named(name) => name,
        }
    }

    /// Whether a rule scoped to `self` applies to objects of `type_name`.
    pub fn covers(&self, type_name: &str) -> bool {
        match self {
            SubjectType::All => true,
            SubjectType::Named(name) => name == type_name,
        }
    }
}

impl From<String> for SubjectType {
    fn from(name: String) -> Self {
        if name == Self::WILDCARD {
            SubjectType::All
        } else {
            SubjectType::Named(name)
        }
    }
}

impl From<&str> for SubjectType {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<SubjectType> for String {
    fn from(subject: SubjectType) -> Self {
        match subject {
            SubjectType::All => SubjectType::WILDCARD.to_string(),
            SubjectType::Named(name) => name,
        }
    }
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `field == value` constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub value: Value,
}

impl Condition {
    /// Evaluate against a record. A missing field never satisfies the condition.
    pub fn matches(&self, record: &dyn Record) -> bool {
        record
            .field(&self.field)
            .is_some_and(|value| *value == self.value)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.field, self.value)
    }
}

/// A grant of one action on one subject type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub action: ActionName,
    pub subject: SubjectType,
    /// Conjunction of equality constraints; empty means unconditional.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

impl Rule {
    /// Build a rule, rejecting conditions with an empty field name.
    pub fn new<F, V>(
        action: ActionName,
        subject: impl Into<SubjectType>,
        conditions: impl IntoIterator<Item = (F, V)>,
    ) -> Result<Self>
    where
        F: Into<String>,
        V: Into<Value>,
    {
        let conditions = conditions
            .into_iter()
            .map(|(field, value)| {
                let field = field.into();
                if field.is_empty() {
                    return Err(Error::InvalidRule(format!(
                        "condition field must not be empty (action {action})"
                    )));
                }
                Ok(Condition {
                    field,
                    value: value.into(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            action,
            subject: subject.into(),
            conditions,
        })
    }

    /// A rule with no conditions.
    pub fn unconditional(action: ActionName, subject: impl Into<SubjectType>) -> Self {
        Self {
            action,
            subject: subject.into(),
            conditions: Vec::new(),
        }
    }

    pub fn is_unconditional(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether this rule is relevant to `action` on `type_name`, ignoring conditions.
    pub fn applies_to(&self, action: ActionName, type_name: &str) -> bool {
        self.action.covers(action) && self.subject.covers(type_name)
    }

    /// Whether every condition holds for `record`.
    pub fn matches(&self, record: &dyn Record) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "can {} {}", self.action, self.subject)?;
        for (i, condition) in self.conditions.iter().enumerate() {
            let joiner = if i == 0 { "where" } else { "and" };
            write!(f, " {joiner} {condition}")?;
        }
        Ok(())
    }
}
