//! Storage backends for the permission table.
//!
//! The in-memory backend lives in `gatehouse_authz::store::memory`; this
//! service adds the durable Postgres backend.
pub mod postgres;
