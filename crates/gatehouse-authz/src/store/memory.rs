//! In-memory implementation of the permission store.
//!
//! # Purpose
//! Backs the permission table with a `HashMap` guarded by
//! `tokio::sync::RwLock`. Used for local development, tests, and deployments
//! that accept losing administrator edits on restart.
//!
//! # Durability and consistency
//! - **Not durable**: the table is rebuilt from defaults on every start.
//! - Reads take the read lock; inserts and replaces take the write lock, so
//!   each write is atomic with respect to other store calls.
use super::{PermissionEntry, PermissionStore, StoreResult};
use crate::role::Role;
use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<RwLock<HashMap<Role, PermissionEntry>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`; later duplicates win.
    pub fn with_entries(entries: impl IntoIterator<Item = PermissionEntry>) -> Self {
        let map = entries
            .into_iter()
            .map(|entry| (entry.role.clone(), entry))
            .collect();
        Self {
            entries: Arc::new(RwLock::new(map)),
        }
    }
}

#[async_trait]
impl PermissionStore for InMemoryStore {
    async fn find_one(&self, role: &Role) -> StoreResult<Option<PermissionEntry>> {
        Ok(self.entries.read().await.get(role).cloned())
    }

    async fn insert(&self, entry: PermissionEntry) -> StoreResult<bool> {
        let mut entries = self.entries.write().await;
        match entries.entry(entry.role.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(true)
            }
        }
    }

    async fn find_one_and_replace(
        &self,
        role: &Role,
        entry: PermissionEntry,
    ) -> StoreResult<PermissionEntry> {
        let mut entries = self.entries.write().await;
        entries.insert(role.clone(), entry.clone());
        Ok(entry)
    }

    async fn find_all(&self) -> StoreResult<Vec<PermissionEntry>> {
        let entries = self.entries.read().await;
        let mut all: Vec<PermissionEntry> = entries.values().cloned().collect();
        all.sort_by(|a, b| a.role.cmp(&b.role));
        Ok(all)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
