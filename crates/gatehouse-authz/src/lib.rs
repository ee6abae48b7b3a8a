//! Role and capability authorization engine.
//!
//! # Purpose
//! Answers one question per request: may an actor with a given role run an
//! operation that declares a role list or a `"<module>.<action>"` capability?
//!
//! # How it fits
//! Calling layers resolve the actor role and the operation's requirements,
//! then call [`AuthorizationEngine::authorize`]. Administrators change the
//! per-role grant table through [`PolicyAdmin`], which is gated by the same
//! engine.
//!
//! # Key invariants
//! - Grants only ever contain modules and actions the static taxonomy allows.
//! - Decisions read the in-memory cache only; the store is touched on start
//!   and on administrative writes.
//! - Elevated roles pass every capability check; explicit role lists still
//!   apply to them.
//!
//! # Examples
//! ```rust
//! use gatehouse_authz::{OperationRequirements, Requirement, split_capability};
//!
//! assert_eq!(split_capability("invoices.create"), Some(("invoices", "create")));
//! let reqs = OperationRequirements::handler(Requirement::capability("invoices.create"))
//!     .with_class(Requirement::roles(["manager"]));
//! assert_eq!(reqs.resolved_capability(), Some("invoices.create"));
//! assert!(reqs.resolved_roles().is_some());
//! ```
//!
//! # Common pitfalls
//! - Serving decisions before [`AuthorizationEngine::start`] completes: every
//!   standard role is denied.
//! - Expecting partial updates: an upsert replaces the role's whole grant set.

mod action;
mod admin;
mod cache;
mod capability;
mod decision;
mod engine;
mod errors;
mod grants;
mod registry;
mod role;
pub mod store;
pub mod taxonomy;

pub use action::Action;
pub use admin::PolicyAdmin;
pub use cache::{CacheSnapshot, PermissionCache};
pub use capability::{Capability, OperationRequirements, Requirement, split_capability};
pub use decision::{Decision, decide, has_grant};
pub use engine::{AuthorizationEngine, DEFAULT_STORE_TIMEOUT, EngineConfig};
pub use errors::{
    AdminError, AdminResult, CapabilityError, CapabilityResult, EngineError, EngineResult,
};
pub use grants::{Grants, RawGrants, clean_grants, retain_valid};
pub use registry::{
    CAP_USERS_READ, CAP_USERS_UPDATE, OP_GET_ROLE, OP_LIST_MODULES, OP_LIST_ROLES,
    OP_UPDATE_ROLE, OperationRegistry,
};
pub use role::{ELEVATED_ROLES, Role, is_elevated};
pub use store::{PermissionEntry, PermissionStore, StoreError, StoreResult};
pub use taxonomy::{CapabilityModule, default_grants, find_module, is_allowed, list_modules};
