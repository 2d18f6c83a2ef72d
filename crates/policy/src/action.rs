use serde::{Deserialize, Serialize};

use crate::Error;

/// An action a principal may perform on a subject.
///
/// `Manage` is the wildcard: a rule granting `Manage` grants every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionName {
    Create,
    Access,
    Update,
    Delete,
    Manage,
}

impl ActionName {
    /// The concrete (non-wildcard) actions.
    pub const CRUD: [ActionName; 4] = [
        ActionName::Create,
        ActionName::Access,
        ActionName::Update,
        ActionName::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionName::Create => "create",
            ActionName::Access => "access",
            ActionName::Update => "update",
            ActionName::Delete => "delete",
            ActionName::Manage => "manage",
        }
    }

    pub fn is_wildcard(self) -> bool {
        matches!(self, ActionName::Manage)
    }

    /// Whether a rule granting `self` covers a request for `requested`.
    pub fn covers(self, requested: ActionName) -> bool {
        match self {
            ActionName::Manage => true,
            granted => granted == requested,
        }
    }
}

impl std::fmt::Display for ActionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionName {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(ActionName::Create),
            "access" => Ok(ActionName::Access),
            "update" => Ok(ActionName::Update),
            "delete" => Ok(ActionName::Delete),
            "manage" => Ok(ActionName::Manage),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}
