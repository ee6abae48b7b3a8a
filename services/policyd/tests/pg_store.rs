#![cfg(feature = "pg-tests")]

use gatehouse_authz::{
    Action, AuthorizationEngine, EngineConfig, PermissionEntry, PermissionStore, RawGrants, Role,
};
use policyd::config::PostgresConfig;
use policyd::store::postgres::PostgresStore;
use serial_test::serial;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

async fn pg_store() -> Option<PostgresStore> {
    let url = match std::env::var("GATEHOUSE_TEST_PG_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("skipping pg-tests: set GATEHOUSE_TEST_PG_URL");
            return None;
        }
    };
    let pg = PostgresConfig {
        url,
        max_connections: 5,
        connect_timeout_ms: 5_000,
        acquire_timeout_ms: 5_000,
    };
    let store = match PostgresStore::connect(&pg).await {
        Ok(store) => store,
        Err(err) => {
            eprintln!("skipping pg-tests: connect postgres store failed: {err}");
            return None;
        }
    };
    let pool = sqlx::PgPool::connect(&pg.url).await.expect("pool");
    sqlx::query("TRUNCATE role_permissions")
        .execute(&pool)
        .await
        .expect("truncate");
    Some(store)
}

fn grants(module: &str, actions: &[Action]) -> gatehouse_authz::Grants {
    [(module.to_string(), actions.iter().copied().collect())]
        .into_iter()
        .collect()
}

#[tokio::test]
#[serial]
async fn pg_insert_never_overwrites() {
    let Some(store) = pg_store().await else {
        return;
    };
    let first = PermissionEntry::new("viewer", grants("invoices", &[Action::Read]));
    let second = PermissionEntry::new("viewer", grants("archive", &[Action::Read]));
    assert!(store.insert(first.clone()).await.expect("insert"));
    assert!(!store.insert(second).await.expect("insert again"));
    let found = store
        .find_one(&Role::new("viewer"))
        .await
        .expect("find")
        .expect("entry");
    assert_eq!(found, first);
}

#[tokio::test]
#[serial]
async fn pg_replace_creates_and_overwrites() {
    let Some(store) = pg_store().await else {
        return;
    };
    let role = Role::new("auditor");
    let created = store
        .find_one_and_replace(
            &role,
            PermissionEntry::new(role.clone(), grants("archive", &[Action::Read])),
        )
        .await
        .expect("create");
    assert_eq!(created.grants["archive"], BTreeSet::from([Action::Read]));

    let replaced = store
        .find_one_and_replace(
            &role,
            PermissionEntry::new(role.clone(), grants("documents", &[Action::Read])),
        )
        .await
        .expect("replace");
    assert!(replaced.grants.get("archive").is_none());
    assert_eq!(store.find_all().await.expect("all").len(), 1);
    store.health_check().await.expect("health");
}

#[tokio::test]
#[serial]
async fn pg_engine_round_trip_survives_restart() {
    let Some(store) = pg_store().await else {
        return;
    };
    let engine = AuthorizationEngine::new(Arc::new(store), EngineConfig::default());
    engine.start().await.expect("start");
    let raw: RawGrants = HashMap::from([(
        "shipments".to_string(),
        vec!["create".to_string(), "delete".to_string()],
    )]);
    engine
        .upsert(&Role::new("operator"), &raw)
        .await
        .expect("upsert");

    let url = std::env::var("GATEHOUSE_TEST_PG_URL").expect("url");
    let reopened = PostgresStore::connect(&PostgresConfig {
        url,
        max_connections: 2,
        connect_timeout_ms: 5_000,
        acquire_timeout_ms: 5_000,
    })
    .await
    .expect("reconnect");
    let restarted = AuthorizationEngine::new(Arc::new(reopened), EngineConfig::default());
    restarted.start().await.expect("restart");
    assert!(restarted.has_capability("operator", "shipments", Action::Create));
    assert!(!restarted.has_capability("operator", "requests", Action::Read));
    assert!(restarted.has_capability("viewer", "invoices", Action::Read));
}
