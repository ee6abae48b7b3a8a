//! Request-time authorization decision.
//!
//! [`decide`] is a pure function of the actor role, the operation's declared
//! requirements, and a cache snapshot. Evaluation order:
//! 1. A resolved, non-empty role list is final: allow iff the actor is
//!    listed. Role lists and capabilities resolve independently, so a class
//!    role list still applies under a handler capability.
//! 2. No capability declared: the operation is unguarded, allow.
//! 3. Elevated roles pass every capability check.
//! 4. A capability string without both segments denies.
//! 5. Allow iff the role's cached grants contain the action for the module.
//!    Capabilities outside the taxonomy can never be granted.
use crate::cache::CacheSnapshot;
use crate::capability::{Capability, OperationRequirements};
use crate::errors::CapabilityError;
use crate::role::is_elevated;
use serde::Serialize;

/// Outcome of one evaluation, with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Unguarded,
    RoleListed,
    RoleNotListed,
    Elevated,
    Granted,
    MalformedCapability,
    NotGranted,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(
            self,
            Decision::Unguarded | Decision::RoleListed | Decision::Elevated | Decision::Granted
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Unguarded => "unguarded",
            Decision::RoleListed => "role_listed",
            Decision::RoleNotListed => "role_not_listed",
            Decision::Elevated => "elevated",
            Decision::Granted => "granted",
            Decision::MalformedCapability => "malformed_capability",
            Decision::NotGranted => "not_granted",
        }
    }
}

pub fn decide(
    role: &str,
    requirements: &OperationRequirements,
    snapshot: &CacheSnapshot,
) -> Decision {
    if let Some(roles) = requirements.resolved_roles().filter(|roles| !roles.is_empty()) {
        return if roles.iter().any(|listed| listed.as_str() == role) {
            Decision::RoleListed
        } else {
            Decision::RoleNotListed
        };
    }

    let Some(raw) = requirements.resolved_capability() else {
        return Decision::Unguarded;
    };

    if is_elevated(role) {
        return Decision::Elevated;
    }

    let capability = match Capability::parse(raw) {
        Ok(capability) => capability,
        Err(CapabilityError::Malformed(_)) => return Decision::MalformedCapability,
        Err(_) => return Decision::NotGranted,
    };

    if has_grant(snapshot, role, capability) {
        Decision::Granted
    } else {
        Decision::NotGranted
    }
}

/// Whether `role` holds `capability` in `snapshot`. Unknown roles are simply
/// not granted.
pub fn has_grant(snapshot: &CacheSnapshot, role: &str, capability: Capability) -> bool {
    snapshot
        .get(role)
        .and_then(|grants| grants.get(capability.module.key))
        .is_some_and(|actions| actions.contains(&capability.action))
}
