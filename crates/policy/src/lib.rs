//! Role-derived authorization for application resources.
//!
//! Core principle: **a permission check and a storage filter must always
//! agree.** Both are computed from the same immutable [`Ability`], so an
//! object is returned by [`Ability::accessible_filter`] exactly when
//! [`Ability::can`] approves it.
//!
//! # Overview
//!
//! - A [`Principal`] (id + [`Role`]) arrives from the session layer.
//! - A [`Resolver`] derives its [`Ability`]: an ordered list of [`Rule`]s.
//!   There are no deny rules; permission is an OR over matching rules.
//! - [`Ability::can`] answers single-object questions, and
//!   [`Ability::accessible_filter`] compiles a [`Filter`] for list queries.
//! - [`AbilityCache`] memoizes resolution per `(id, role)` with a bounded
//!   size and single-flight misses.
//!
//! Denials are never errors. The only error a caller has to handle is
//! [`InvalidPrincipal`], raised for an empty id or an unknown role.
//!
//! # Example
//!
//! ```
//! use policy::{AbilityCache, ActionName, CacheConfig, Document, Principal};
//!
//! let cache = AbilityCache::new(&CacheConfig::default());
//! let ability = cache.get_or_resolve(&Principal::user("u2"))?;
//!
//! let mine = Document::new("Resource").with_field("createdBy", "u2");
//! let theirs = Document::new("Resource").with_field("createdBy", "u3");
//! assert!(ability.can(ActionName::Update, &mine));
//! assert!(!ability.can(ActionName::Update, &theirs));
//!
//! let filter = ability.accessible_filter(ActionName::Access, "Resource");
//! assert_eq!(
//!     filter.to_query(),
//!     serde_json::json!({ "$or": [{ "createdBy": "u2" }] })
//! );
//! # Ok::<(), policy::Error>(())
//! ```

mod ability;
mod action;
mod cache;
pub mod checker;
mod config;
mod error;
pub mod filter;
mod principal;
mod resolver;
mod rule;
mod subject;

pub use ability::Ability;
pub use action::ActionName;
pub use cache::AbilityCache;
pub use checker::Decision;
pub use config::{CacheConfig, EngineConfig};
pub use error::{Error, InvalidPrincipal, Result};
pub use filter::Filter;
pub use principal::{Principal, PrincipalKey, Role};
pub use resolver::{OWNER_FIELD, Resolver, RoleResolver, resolve};
pub use rule::{Condition, Rule, SubjectType};
pub use subject::{Document, Record, Subject};
