//! Durable permission table contract.
//!
//! # Purpose
//! Abstracts the document store that owns the authoritative role → grants
//! table. The engine never reads it on the decision path; it only seeds,
//! loads, and writes through it.
//!
//! # Key invariants
//! - At most one entry per role.
//! - `insert` never overwrites an existing entry.
//! - `find_one_and_replace` creates the entry when missing.
use crate::grants::Grants;
use crate::role::Role;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;

/// One row of the permission table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub role: Role,
    #[serde(default)]
    pub grants: Grants,
}

impl PermissionEntry {
    pub fn new(role: impl Into<Role>, grants: Grants) -> Self {
        Self {
            role: role.into(),
            grants,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn find_one(&self, role: &Role) -> StoreResult<Option<PermissionEntry>>;
    /// Create `entry`; returns `false` and leaves the store untouched when the
    /// role already has an entry.
    async fn insert(&self, entry: PermissionEntry) -> StoreResult<bool>;
    /// Create or replace the entry for `role`.
    async fn find_one_and_replace(
        &self,
        role: &Role,
        entry: PermissionEntry,
    ) -> StoreResult<PermissionEntry>;
    async fn find_all(&self) -> StoreResult<Vec<PermissionEntry>>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
