//! Per-principal memoization of resolved abilities.

use std::sync::Arc;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;
use tracing::{debug, trace};

use crate::{
    Ability, CacheConfig, Error, Principal, PrincipalKey, Resolver, Result, Role, RoleResolver,
};

/// A bounded, concurrent cache of abilities keyed by principal id and role.
///
/// Concurrent misses for the same key are coalesced into a single resolver
/// call, and every waiter receives the same `Arc<Ability>`. Misses for
/// different keys do not block each other. Failed resolutions are not cached.
///
/// # Staleness
///
/// Nothing notifies the cache when a principal's role changes. A principal
/// presented with its new role misses and resolves fresh, but the entry for
/// the old role stays until it is evicted, expires, or is removed with
/// [`AbilityCache::invalidate`]. Callers that learn of a role change should
/// invalidate the principal.
pub struct AbilityCache<R = RoleResolver> {
    resolver: R,
    entries: Cache<PrincipalKey, Arc<Ability>>,
}

impl AbilityCache<RoleResolver> {
    /// Cache in front of the default role resolver.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_resolver(RoleResolver, config)
    }
}

impl Default for AbilityCache<RoleResolver> {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl<R: Resolver> AbilityCache<R> {
    pub fn with_resolver(resolver: R, config: &CacheConfig) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(config.capacity)
            .eviction_policy(EvictionPolicy::lru());
        if let Some(ttl) = config.time_to_live() {
            builder = builder.time_to_live(ttl);
        }
        if let Some(tti) = config.time_to_idle() {
            builder = builder.time_to_idle(tti);
        }

        Self {
            resolver,
            entries: builder.build(),
        }
    }

    /// Return the cached ability for `principal`, resolving it on a miss.
    pub fn get_or_resolve(&self, principal: &Principal) -> Result<Arc<Ability>> {
        let key = principal.key();
        if let Some(ability) = self.entries.get(&key) {
            trace!(principal = %key, "ability cache hit");
            return Ok(ability);
        }

        trace!(principal = %key, "ability cache miss");
        self.entries
            .try_get_with(key, || self.resolver.resolve(principal).map(Arc::new))
            .map_err(|err| Error::InvalidPrincipal((*err).clone()))
    }

    /// Drop every cached ability for `principal_id`, whatever its role.
    pub fn invalidate(&self, principal_id: &str) {
        for role in Role::ALL {
            let key = PrincipalKey {
                id: principal_id.to_string(),
                role,
            };
            self.entries.invalidate(&key);
        }
        debug!(principal = principal_id, "invalidated cached abilities");
    }

    /// Drop every cached ability.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
        debug!("invalidated all cached abilities");
    }

    /// Whether an ability is currently cached for this principal.
    pub fn contains(&self, principal: &Principal) -> bool {
        self.entries.contains_key(&principal.key())
    }

    /// Number of cached abilities, after pending evictions have been applied.
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}
