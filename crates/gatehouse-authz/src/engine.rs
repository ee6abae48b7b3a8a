//! Authorization engine: owns the permission cache and keeps it in step with
//! the durable store.
//!
//! # Lifecycle
//! Construct with [`AuthorizationEngine::new`], then call
//! [`AuthorizationEngine::start`] before serving decisions. A start failure
//! must abort the process; deciding against an unloaded cache would deny (or
//! worse, allow stale grants for) every request. Dropping the engine is the
//! only teardown.
//!
//! # Consistency
//! - Decisions read only the cache.
//! - `upsert` writes the store first and touches the cache only after the
//!   store confirmed the write.
//! - A failed write re-reads the role from the store and caches what it
//!   finds. If the write timed out and the re-read fails too, the role is
//!   dropped from the cache, so it fails closed until the next load.
//! - Writes to the same role are serialized by a per-role lock; writes to
//!   different roles only contend inside the store. A lock is released from
//!   the map once no writer holds it.
//! - Every store call is bounded by `EngineConfig::store_timeout`.
use crate::Action;
use crate::cache::PermissionCache;
use crate::capability::{Capability, OperationRequirements};
use crate::decision::{Decision, decide, has_grant};
use crate::errors::{EngineError, EngineResult};
use crate::grants::{Grants, RawGrants, clean_grants, retain_valid};
use crate::registry::OperationRegistry;
use crate::role::Role;
use crate::store::{PermissionEntry, PermissionStore, StoreResult};
use crate::taxonomy::{default_grants, find_module};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound for a single store round-trip.
    pub store_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }
}

pub struct AuthorizationEngine {
    store: Arc<dyn PermissionStore>,
    cache: PermissionCache,
    role_locks: DashMap<Role, Arc<Mutex<()>>>,
    registry: OperationRegistry,
    config: EngineConfig,
}

impl AuthorizationEngine {
    pub fn new(store: Arc<dyn PermissionStore>, config: EngineConfig) -> Self {
        Self {
            store,
            cache: PermissionCache::new(),
            role_locks: DashMap::new(),
            registry: OperationRegistry::with_admin_operations(),
            config,
        }
    }

    /// Replace the operation registry (the admin operations are included by
    /// default; callers extending it should start from
    /// [`OperationRegistry::with_admin_operations`]).
    pub fn with_registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Seed defaults, then load the cache.
    pub async fn start(&self) -> EngineResult<()> {
        let seeded = self.seed_defaults().await?;
        let loaded = self.load_cache().await?;
        tracing::info!(
            backend = self.store.backend_name(),
            seeded,
            roles = loaded,
            "authorization engine started"
        );
        Ok(())
    }

    /// Create a store entry for every default role that has none.
    ///
    /// Existing entries are never touched, so administrator edits survive
    /// redeploys. Returns the number of entries created.
    pub async fn seed_defaults(&self) -> EngineResult<usize> {
        let mut created = 0;
        for (role, grants) in default_grants() {
            let role = Role::new(role);
            if self
                .call("find_one", self.store.find_one(&role))
                .await?
                .is_some()
            {
                continue;
            }
            let entry = PermissionEntry::new(role.clone(), grants);
            if self.call("insert", self.store.insert(entry)).await? {
                tracing::debug!(%role, "seeded default permissions");
                created += 1;
            }
        }
        Ok(created)
    }

    /// Rebuild the whole cache from the store and publish it in one swap.
    pub async fn load_cache(&self) -> EngineResult<usize> {
        let entries = self.call("find_all", self.store.find_all()).await?;
        let table = entries
            .into_iter()
            .map(|entry| (entry.role, Arc::new(retain_valid(entry.grants))))
            .collect::<std::collections::HashMap<_, _>>();
        let roles = table.len();
        self.cache.replace_all(table);
        tracing::debug!(roles, "permission cache loaded");
        Ok(roles)
    }

    /// Cached grants for `role`; empty for unknown roles.
    pub fn get(&self, role: &str) -> Arc<Grants> {
        self.cache.get(role).unwrap_or_default()
    }

    /// Replace `role`'s grants with the taxonomy-valid part of `raw`.
    ///
    /// Returns what was stored so callers can see dropped entries.
    pub async fn upsert(&self, role: &Role, raw: &RawGrants) -> EngineResult<Grants> {
        let cleaned = clean_grants(raw);
        let lock = self.role_locks.entry(role.clone()).or_default().clone();
        let result = {
            let _guard = lock.lock().await;
            self.replace_locked(role, &cleaned).await
        };
        drop(lock);
        self.role_locks
            .remove_if(role, |_, lock| Arc::strong_count(lock) == 1);
        result?;

        if role.is_elevated() {
            tracing::warn!(%role, "stored grants for an elevated role; they are not consulted");
        }
        tracing::info!(%role, modules = cleaned.len(), "role permissions replaced");
        metrics::counter!("gatehouse_permission_updates_total").increment(1);
        Ok(cleaned)
    }

    /// Caller holds the role lock.
    async fn replace_locked(&self, role: &Role, cleaned: &Grants) -> EngineResult<()> {
        let entry = PermissionEntry::new(role.clone(), cleaned.clone());
        match self
            .call(
                "find_one_and_replace",
                self.store.find_one_and_replace(role, entry),
            )
            .await
        {
            Ok(_) => {
                self.cache.insert(role.clone(), cleaned.clone());
                Ok(())
            }
            Err(err) => {
                self.resync_role(role, &err).await;
                Err(err)
            }
        }
    }

    /// Bring one cache entry back in line with the store after a failed write.
    async fn resync_role(&self, role: &Role, write_error: &EngineError) {
        match self.call("find_one", self.store.find_one(role)).await {
            Ok(Some(entry)) => self.cache.insert(role.clone(), retain_valid(entry.grants)),
            Ok(None) => self.cache.remove(role.as_str()),
            Err(_) if matches!(write_error, EngineError::StoreTimeout { .. }) => {
                tracing::error!(%role, "write outcome unknown; dropping cached grants");
                self.cache.remove(role.as_str());
            }
            Err(_) => {}
        }
    }

    /// Snapshot of every cached role, ordered by role.
    pub fn list_all(&self) -> BTreeMap<Role, Grants> {
        self.cache
            .snapshot()
            .iter()
            .map(|(role, grants)| (role.clone(), Grants::clone(grants)))
            .collect()
    }

    pub fn authorize(&self, role: &str, requirements: &OperationRequirements) -> bool {
        self.evaluate(role, requirements).is_allowed()
    }

    /// Like [`Self::authorize`] but returns the rule that decided.
    pub fn evaluate(&self, role: &str, requirements: &OperationRequirements) -> Decision {
        let decision = decide(role, requirements, &self.cache.snapshot());
        if !decision.is_allowed() {
            tracing::debug!(role, decision = decision.as_str(), "authorization denied");
        }
        let outcome = if decision.is_allowed() { "allow" } else { "deny" };
        metrics::counter!("gatehouse_authz_decisions_total", "outcome" => outcome).increment(1);
        decision
    }

    /// Authorize a registered operation by id.
    pub fn authorize_operation(&self, role: &str, operation: &str) -> bool {
        self.authorize(role, &self.registry.requirements(operation))
    }

    /// Table lookup only; elevated roles get no bypass here.
    pub fn has_capability(&self, role: &str, module: &str, action: Action) -> bool {
        find_module(module)
            .and_then(|module| Capability::new(module, action).ok())
            .is_some_and(|capability| has_grant(&self.cache.snapshot(), role, capability))
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn PermissionStore> {
        &self.store
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = StoreResult<T>>,
    ) -> EngineResult<T> {
        match tokio::time::timeout(self.config.store_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => {
                tracing::error!(operation, error = %source, "permission store call failed");
                Err(EngineError::Store { operation, source })
            }
            Err(_) => {
                tracing::error!(operation, timeout = ?self.config.store_timeout, "permission store call timed out");
                Err(EngineError::StoreTimeout {
                    operation,
                    timeout: self.config.store_timeout,
                })
            }
        }
    }
}

impl std::fmt::Debug for AuthorizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationEngine")
            .field("backend", &self.store.backend_name())
            .field("cached_roles", &self.cache.len())
            .field("config", &self.config)
            .finish()
    }
}
