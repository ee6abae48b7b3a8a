//! Grant sets and taxonomy filtering.
//!
//! Incoming grants arrive as free-form strings. [`clean_grants`] is the single
//! chokepoint that turns them into typed [`Grants`]. Every entry is validated
//! as a [`Capability`]; unknown modules and actions a module does not allow
//! are dropped, never stored.
use crate::Action;
use crate::capability::Capability;
use crate::taxonomy::find_module;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Granted actions per module key. Ordered for stable output.
pub type Grants = BTreeMap<String, BTreeSet<Action>>;

/// Untrusted grants as supplied by an administrator.
pub type RawGrants = HashMap<String, Vec<String>>;

/// Project `raw` onto the capability taxonomy.
///
/// Modules left with no valid action are omitted; absence already means
/// "nothing granted".
pub fn clean_grants(raw: &RawGrants) -> Grants {
    let mut cleaned = Grants::new();
    for (key, actions) in raw {
        for action in actions {
            match Capability::from_parts(key, action) {
                Ok(capability) => {
                    cleaned
                        .entry(capability.module.key.to_string())
                        .or_default()
                        .insert(capability.action);
                }
                Err(err) => tracing::debug!(error = %err, "dropping grant"),
            }
        }
    }
    cleaned
}

/// Re-validate already typed grants, e.g. rows read back from a store that
/// predate a taxonomy change.
pub fn retain_valid(grants: Grants) -> Grants {
    grants
        .into_iter()
        .filter_map(|(key, actions)| {
            let module = find_module(&key)?;
            let actions: BTreeSet<Action> =
                actions.into_iter().filter(|a| module.allows(*a)).collect();
            (!actions.is_empty()).then_some((key, actions))
        })
        .collect()
}
