//! Postgres-backed permission table.
//!
//! # Data model
//! One row per role in `role_permissions`; `grants` is a JSONB object of
//! module key → action names. Migrations run on connect so the engine can
//! assume the table exists before seeding.
//!
//! # Key invariants
//! - `insert` is `ON CONFLICT DO NOTHING`; seeding never overwrites edits.
//! - `find_one_and_replace` is a single upsert statement, so a concurrent
//!   reader sees either the old row or the new one.
//! - Rows edited by hand may carry unknown modules or actions; they are
//!   dropped on read rather than failing the whole load.
//!
//! # Security notes
//! - The connection URL may contain credentials; it is never logged.
use crate::config::PostgresConfig;
use anyhow::anyhow;
use async_trait::async_trait;
use gatehouse_authz::{
    PermissionEntry, PermissionStore, RawGrants, Role, StoreError, StoreResult, clean_grants,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;

pub struct PostgresStore {
    pool: PgPool,
}

#[derive(Debug, Clone, FromRow)]
struct DbRolePermissions {
    role: String,
    grants: Json<RawGrants>,
}

impl From<DbRolePermissions> for PermissionEntry {
    fn from(row: DbRolePermissions) -> Self {
        PermissionEntry::new(row.role, clean_grants(&row.grants.0))
    }
}

impl PostgresStore {
    /// Open a pool and apply migrations.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        let options = PgConnectOptions::from_str(&pg.url).map_err(store_error)?;
        let connect = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(options);
        let pool = tokio::time::timeout(Duration::from_millis(pg.connect_timeout_ms), connect)
            .await
            .map_err(|_| StoreError::Unavailable("postgres connect timed out".to_string()))?
            .map_err(store_error)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|err| StoreError::Unexpected(anyhow!("migration failed: {err}")))?;
        tracing::info!(max_connections = pg.max_connections, "postgres permission store ready");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PostgresStore {
    async fn find_one(&self, role: &Role) -> StoreResult<Option<PermissionEntry>> {
        let row: Option<DbRolePermissions> =
            sqlx::query_as("SELECT role, grants FROM role_permissions WHERE role = $1")
                .bind(role.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(row.map(PermissionEntry::from))
    }

    async fn insert(&self, entry: PermissionEntry) -> StoreResult<bool> {
        let result = sqlx::query(
            "INSERT INTO role_permissions (role, grants) VALUES ($1, $2) \
             ON CONFLICT (role) DO NOTHING",
        )
        .bind(entry.role.as_str())
        .bind(Json(&entry.grants))
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(result.rows_affected() == 1)
    }

    async fn find_one_and_replace(
        &self,
        role: &Role,
        entry: PermissionEntry,
    ) -> StoreResult<PermissionEntry> {
        if &entry.role != role {
            return Err(StoreError::Conflict(format!(
                "entry for {} cannot replace {role}",
                entry.role
            )));
        }
        let row: DbRolePermissions = sqlx::query_as(
            "INSERT INTO role_permissions (role, grants, updated_at) VALUES ($1, $2, now()) \
             ON CONFLICT (role) DO UPDATE SET grants = EXCLUDED.grants, updated_at = now() \
             RETURNING role, grants",
        )
        .bind(role.as_str())
        .bind(Json(&entry.grants))
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(row.into())
    }

    async fn find_all(&self) -> StoreResult<Vec<PermissionEntry>> {
        let rows: Vec<DbRolePermissions> =
            sqlx::query_as("SELECT role, grants FROM role_permissions ORDER BY role")
                .fetch_all(&self.pool)
                .await
                .map_err(store_error)?;
        Ok(rows.into_iter().map(PermissionEntry::from).collect())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// Connectivity failures become `Unavailable`; everything else is unexpected.
fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(err.to_string())
        }
        sqlx::Error::Io(io) => StoreError::Unavailable(io.to_string()),
        other => StoreError::Unexpected(anyhow!(other)),
    }
}
