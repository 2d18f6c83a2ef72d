//! Derives abilities from principals.

use tracing::{debug, warn};

use crate::{Ability, ActionName, Condition, InvalidPrincipal, Principal, Role, Rule, SubjectType};

/// Field on stored objects naming the principal that created them.
pub const OWNER_FIELD: &str = "createdBy";

/// Turns a principal into its ability.
///
/// Implementations must be deterministic and free of I/O: the same id and
/// role always yield the same rules.
pub trait Resolver: Send + Sync {
    fn resolve(&self, principal: &Principal) -> Result<Ability, InvalidPrincipal>;
}

/// Role-based rule derivation.
///
/// Admins get a single `manage`/`all` grant. Everyone else may create,
/// access, update and delete objects of any type whose `createdBy` is their
/// own id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleResolver;

impl RoleResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for RoleResolver {
    fn resolve(&self, principal: &Principal) -> Result<Ability, InvalidPrincipal> {
        if principal.id.is_empty() {
            warn!(role = %principal.role, "rejecting principal with empty id");
            return Err(InvalidPrincipal::new("principal id must not be empty"));
        }

        let rules = match principal.role {
            Role::Admin => vec![Rule::unconditional(ActionName::Manage, SubjectType::All)],
            Role::User => ActionName::CRUD
                .into_iter()
                .map(|action| ownership_rule(action, &principal.id))
                .collect(),
        };

        debug!(
            principal = %principal.id,
            role = %principal.role,
            rules = rules.len(),
            "resolved ability"
        );
        Ok(Ability::new(principal.key(), rules))
    }
}

fn ownership_rule(action: ActionName, owner: &str) -> Rule {
    Rule {
        action,
        subject: SubjectType::All,
        conditions: vec![Condition {
            field: OWNER_FIELD.to_string(),
            value: owner.into(),
        }],
    }
}

/// Resolve with the default [`RoleResolver`].
pub fn resolve(principal: &Principal) -> crate::Result<Ability> {
    Ok(RoleResolver.resolve(principal)?)
}
