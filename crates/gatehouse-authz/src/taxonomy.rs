//! Static capability taxonomy and default grants.
//!
//! # Purpose
//! Declares every module the application gates, the actions each module
//! supports, and the grants standard roles start with.
//!
//! # Key invariants
//! - The module list is immutable and keeps declaration order.
//! - Module keys are lower-case ASCII and never contain `.`.
//! - Every default grant names a declared module and only actions that module
//!   allows (checked by tests).
//! - Elevated roles are absent from the defaults; they bypass the table.
use crate::Action;
use crate::grants::Grants;
use serde::Serialize;

/// One gated business area and the actions it exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityModule {
    pub key: &'static str,
    pub display_name: &'static str,
    pub allowed_actions: &'static [Action],
}

impl CapabilityModule {
    pub fn allows(&self, action: Action) -> bool {
        self.allowed_actions.contains(&action)
    }
}

const CRUD: &[Action] = &[Action::Create, Action::Read, Action::Update, Action::Delete];

static MODULES: [CapabilityModule; 9] = [
    CapabilityModule {
        key: "users",
        display_name: "Users",
        allowed_actions: CRUD,
    },
    CapabilityModule {
        key: "invoices",
        display_name: "Invoices",
        allowed_actions: CRUD,
    },
    CapabilityModule {
        key: "requests",
        display_name: "Requests",
        allowed_actions: CRUD,
    },
    CapabilityModule {
        key: "shipments",
        display_name: "Shipments",
        allowed_actions: &[Action::Create, Action::Read, Action::Update],
    },
    CapabilityModule {
        key: "documents",
        display_name: "Documents",
        allowed_actions: CRUD,
    },
    CapabilityModule {
        key: "archive",
        display_name: "Archive",
        allowed_actions: &[Action::Read, Action::Update],
    },
    CapabilityModule {
        key: "notifications",
        display_name: "Notifications",
        allowed_actions: &[Action::Read, Action::Update, Action::Delete],
    },
    CapabilityModule {
        key: "chat",
        display_name: "Chat",
        allowed_actions: &[Action::Create, Action::Read],
    },
    CapabilityModule {
        key: "email",
        display_name: "Email",
        allowed_actions: &[Action::Create, Action::Read],
    },
];

/// All modules in stable declaration order.
pub fn list_modules() -> &'static [CapabilityModule] {
    &MODULES
}

pub fn find_module(key: &str) -> Option<&'static CapabilityModule> {
    MODULES.iter().find(|module| module.key == key)
}

/// Whether `(module, action)` is a valid capability at all.
pub fn is_allowed(module: &str, action: Action) -> bool {
    find_module(module).is_some_and(|m| m.allows(action))
}

type DefaultGrant = (&'static str, &'static [(&'static str, &'static [Action])]);

const READ: &[Action] = &[Action::Read];
const CRU: &[Action] = &[Action::Create, Action::Read, Action::Update];

static DEFAULT_GRANTS: [DefaultGrant; 4] = [
    (
        "manager",
        &[
            ("users", READ),
            ("invoices", CRUD),
            ("requests", CRUD),
            ("shipments", CRU),
            ("documents", CRUD),
            ("archive", &[Action::Read, Action::Update]),
            ("notifications", &[Action::Read, Action::Update, Action::Delete]),
            ("chat", &[Action::Create, Action::Read]),
            ("email", &[Action::Create, Action::Read]),
        ],
    ),
    (
        "operator",
        &[
            ("requests", CRU),
            ("shipments", CRU),
            ("documents", CRU),
            ("archive", READ),
            ("notifications", &[Action::Read, Action::Update]),
            ("chat", &[Action::Create, Action::Read]),
        ],
    ),
    (
        "accountant",
        &[
            ("invoices", CRU),
            ("documents", READ),
            ("archive", READ),
            ("notifications", &[Action::Read, Action::Update]),
            ("email", &[Action::Create, Action::Read]),
        ],
    ),
    (
        "viewer",
        &[
            ("invoices", READ),
            ("requests", READ),
            ("shipments", READ),
            ("documents", READ),
            ("notifications", READ),
        ],
    ),
];

/// Seed grants for each standard role, in declaration order.
pub fn default_grants() -> Vec<(&'static str, Grants)> {
    DEFAULT_GRANTS
        .iter()
        .map(|(role, modules)| {
            let grants = modules
                .iter()
                .map(|(module, actions)| (module.to_string(), actions.iter().copied().collect()))
                .collect();
            (*role, grants)
        })
        .collect()
}
