use gatehouse_authz::store::memory::InMemoryStore;
use gatehouse_authz::{AuthorizationEngine, EngineConfig};
use policyd::app::{AppState, build_router};
use std::sync::Arc;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

/// Router over a started engine backed by a fresh memory store.
pub async fn test_app() -> (axum::Router, Arc<AuthorizationEngine>) {
    let engine = Arc::new(AuthorizationEngine::new(
        Arc::new(InMemoryStore::new()),
        EngineConfig::default(),
    ));
    engine.start().await.expect("start engine");
    (build_router(AppState::new(engine.clone())), engine)
}
