//! Policy service library crate.
//!
//! # Purpose
//! Hosts the gatehouse authorization engine behind an HTTP API: permission
//! administration, a decision endpoint, health, and metrics.
//!
//! # Notes
//! The binary in `main.rs` only wires configuration to [`app::build_state`]
//! and serves the router; everything else lives here so tests can drive it.
pub mod api;
pub mod app;
pub mod config;
pub mod observability;
pub mod store;
