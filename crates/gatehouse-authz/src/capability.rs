//! Capability strings and operation requirements.
//!
//! # Purpose
//! Parses the `"<module>.<action>"` wire format and models what an operation
//! declares it needs before it may run.
//!
//! # Key invariants
//! - Capability strings split on the first `.`; both segments must be
//!   non-empty.
//! - Role lists and capabilities resolve independently, each handler first
//!   and class second.
//! - An empty handler role list counts as undeclared, so the class list
//!   still applies; an empty resolved list guards nothing.
use crate::errors::{CapabilityError, CapabilityResult};
use crate::role::Role;
use crate::taxonomy::{CapabilityModule, find_module};
use crate::Action;
use serde::{Deserialize, Serialize};

/// Split a capability string into `(module, action)` segments.
///
/// Returns `None` when the separator is missing or either side is empty.
pub fn split_capability(raw: &str) -> Option<(&str, &str)> {
    let (module, action) = raw.split_once('.')?;
    if module.is_empty() || action.is_empty() {
        return None;
    }
    Some((module, action))
}

/// A `(module, action)` pair validated against the taxonomy.
///
/// Every grant written by an administrator and every capability checked at
/// decision time goes through one of the constructors below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    pub module: &'static CapabilityModule,
    pub action: Action,
}

impl Capability {
    pub fn new(module: &'static CapabilityModule, action: Action) -> CapabilityResult<Self> {
        if !module.allows(action) {
            return Err(CapabilityError::ActionNotAllowed {
                module: module.key.to_string(),
                action,
            });
        }
        Ok(Self { module, action })
    }

    /// Validate an already split module key and action name.
    pub fn from_parts(module_key: &str, action: &str) -> CapabilityResult<Self> {
        let module = find_module(module_key)
            .ok_or_else(|| CapabilityError::UnknownModule(module_key.to_string()))?;
        let action: Action = action
            .parse()
            .map_err(|_| CapabilityError::UnknownAction(action.to_string()))?;
        Self::new(module, action)
    }

    pub fn parse(raw: &str) -> CapabilityResult<Self> {
        let (module_key, action) =
            split_capability(raw).ok_or_else(|| CapabilityError::Malformed(raw.to_string()))?;
        Self::from_parts(module_key, action)
    }

    pub fn as_string(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.module.key, self.action)
    }
}

/// What a single level (handler or class) declares.
///
/// A level may declare a role list, a capability, both, or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Only the listed roles may run the operation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<Role>>,
    /// A `"<module>.<action>"` capability string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<String>,
}

impl Requirement {
    pub fn roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        Self::default().with_roles(roles)
    }

    pub fn capability(raw: impl Into<String>) -> Self {
        Self::default().with_capability(raw)
    }

    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_capability(mut self, raw: impl Into<String>) -> Self {
        self.capability = Some(raw.into());
        self
    }
}

/// Requirements attached to one operation at handler and class level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequirements {
    #[serde(default)]
    pub handler: Option<Requirement>,
    #[serde(default)]
    pub class: Option<Requirement>,
}

impl OperationRequirements {
    pub fn unguarded() -> Self {
        Self::default()
    }

    pub fn handler(requirement: Requirement) -> Self {
        Self {
            handler: Some(requirement),
            class: None,
        }
    }

    pub fn class(requirement: Requirement) -> Self {
        Self {
            handler: None,
            class: Some(requirement),
        }
    }

    pub fn with_class(mut self, requirement: Requirement) -> Self {
        self.class = Some(requirement);
        self
    }

    /// The role list that applies: the handler's when non-empty, otherwise
    /// the class's.
    pub fn resolved_roles(&self) -> Option<&[Role]> {
        self.handler
            .as_ref()
            .and_then(|level| level.roles.as_deref())
            .filter(|roles| !roles.is_empty())
            .or_else(|| self.class.as_ref().and_then(|level| level.roles.as_deref()))
    }

    /// The capability that applies: the handler's, otherwise the class's.
    pub fn resolved_capability(&self) -> Option<&str> {
        self.handler
            .as_ref()
            .and_then(|level| level.capability.as_deref())
            .or_else(|| {
                self.class
                    .as_ref()
                    .and_then(|level| level.capability.as_deref())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_uses_first_separator() {
        assert_eq!(split_capability("invoices.create"), Some(("invoices", "create")));
        assert_eq!(split_capability("a.b.c"), Some(("a", "b.c")));
    }

    #[test]
    fn split_rejects_missing_segments() {
        assert_eq!(split_capability("invoices"), None);
        assert_eq!(split_capability(".create"), None);
        assert_eq!(split_capability("invoices."), None);
        assert_eq!(split_capability(""), None);
        assert_eq!(split_capability("."), None);
    }

    #[test]
    fn parse_validates_against_taxonomy() {
        let cap = Capability::parse("shipments.update").expect("valid");
        assert_eq!(cap.module.key, "shipments");
        assert_eq!(cap.action, Action::Update);
        assert_eq!(cap.to_string(), "shipments.update");
        assert_eq!(cap.as_string(), "shipments.update");
    }

    #[test]
    fn parse_error_variants() {
        assert!(matches!(
            Capability::parse("shipments"),
            Err(CapabilityError::Malformed(_))
        ));
        assert!(matches!(
            Capability::parse("payroll.read"),
            Err(CapabilityError::UnknownModule(_))
        ));
        assert!(matches!(
            Capability::parse("invoices.approve"),
            Err(CapabilityError::UnknownAction(_))
        ));
        assert!(matches!(
            Capability::parse("archive.delete"),
            Err(CapabilityError::ActionNotAllowed { .. })
        ));
    }

    #[test]
    fn from_parts_matches_parse() {
        assert_eq!(
            Capability::from_parts("archive", "update"),
            Capability::parse("archive.update")
        );
        assert!(matches!(
            Capability::from_parts("archive", "create"),
            Err(CapabilityError::ActionNotAllowed { .. })
        ));
    }

    #[test]
    fn class_role_list_survives_handler_capability() {
        let reqs = OperationRequirements::handler(Requirement::capability("invoices.read"))
            .with_class(Requirement::roles(["manager"]));
        assert_eq!(reqs.resolved_roles(), Some(&[Role::new("manager")][..]));
        assert_eq!(reqs.resolved_capability(), Some("invoices.read"));
    }

    #[test]
    fn handler_values_override_class_values() {
        let reqs = OperationRequirements::handler(
            Requirement::roles(["operator"]).with_capability("chat.create"),
        )
        .with_class(Requirement::roles(["manager"]).with_capability("chat.read"));
        assert_eq!(reqs.resolved_roles(), Some(&[Role::new("operator")][..]));
        assert_eq!(reqs.resolved_capability(), Some("chat.create"));
    }

    #[test]
    fn class_applies_when_handler_is_silent() {
        let reqs = OperationRequirements::class(Requirement::capability("chat.read"));
        assert_eq!(reqs.resolved_capability(), Some("chat.read"));
        assert_eq!(reqs.resolved_roles(), None);
        let reqs = OperationRequirements::handler(Requirement::default())
            .with_class(Requirement::roles(["viewer"]));
        assert_eq!(reqs.resolved_roles(), Some(&[Role::new("viewer")][..]));
    }

    #[test]
    fn empty_handler_role_list_defers_to_class() {
        let reqs = OperationRequirements::handler(Requirement::roles(Vec::<Role>::new()))
            .with_class(Requirement::roles(["manager"]).with_capability("email.read"));
        assert_eq!(reqs.resolved_roles(), Some(&[Role::new("manager")][..]));
        assert_eq!(reqs.resolved_capability(), Some("email.read"));

        let reqs = OperationRequirements::handler(Requirement::roles(Vec::<Role>::new()))
            .with_class(Requirement::capability("email.read"));
        assert_eq!(reqs.resolved_roles(), None);
        assert_eq!(reqs.resolved_capability(), Some("email.read"));

        let reqs = OperationRequirements::handler(Requirement::roles(Vec::<Role>::new()));
        assert_eq!(reqs.resolved_roles(), Some(&[] as &[Role]));
    }

    #[test]
    fn requirements_deserialize_from_json() {
        let reqs: OperationRequirements = serde_json::from_value(serde_json::json!({
            "handler": { "capability": "invoices.create" },
            "class": { "roles": ["admin", "manager"], "capability": "invoices.read" }
        }))
        .expect("deserialize");
        assert_eq!(reqs.handler, Some(Requirement::capability("invoices.create")));
        assert_eq!(
            reqs.class,
            Some(Requirement::roles(["admin", "manager"]).with_capability("invoices.read"))
        );
    }
}
