//! Policyd HTTP application wiring.
//!
//! Builds the Axum router and the shared state injected into handlers, and
//! constructs that state from configuration.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::config::{PolicydConfig, StorageBackend};
use crate::observability;
use crate::store::postgres::PostgresStore;
use anyhow::Context;
use axum::{Json, Router};
use gatehouse_authz::store::memory::InMemoryStore;
use gatehouse_authz::{AuthorizationEngine, EngineConfig, PermissionStore, PolicyAdmin};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AuthorizationEngine>,
    pub admin: PolicyAdmin,
    pub api_version: String,
    pub durable_storage: bool,
}

impl AppState {
    /// State around an engine that has already been started.
    pub fn new(engine: Arc<AuthorizationEngine>) -> Self {
        let durable_storage = engine.store().is_durable();
        Self {
            admin: PolicyAdmin::new(engine.clone()),
            engine,
            api_version: "v1".to_string(),
            durable_storage,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/permissions/modules",
            axum::routing::get(api::permissions::list_modules),
        )
        .route(
            "/v1/permissions/roles",
            axum::routing::get(api::permissions::list_role_permissions),
        )
        .route(
            "/v1/permissions/roles/:role",
            axum::routing::get(api::permissions::get_role_permissions)
                .put(api::permissions::update_role_permissions),
        )
        .route(
            "/v1/authorize",
            axum::routing::post(api::authorize::authorize),
        )
        .route(
            "/v1/openapi.json",
            axum::routing::get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(trace_layer)
        .with_state(state)
}

/// Open the configured store and start the engine; fails when the store
/// cannot be seeded or loaded.
pub async fn build_state(config: &PolicydConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn PermissionStore> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::Postgres => {
            let pg = config
                .postgres
                .as_ref()
                .context("postgres configuration missing")?;
            Arc::new(
                PostgresStore::connect(pg)
                    .await
                    .context("connect postgres permission store")?,
            )
        }
    };
    let engine = AuthorizationEngine::new(
        store,
        EngineConfig {
            store_timeout: config.store_timeout(),
        },
    );
    engine
        .start()
        .await
        .context("start authorization engine")?;
    Ok(AppState::new(Arc::new(engine)))
}
