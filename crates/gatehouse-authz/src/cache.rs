//! In-memory mirror of the permission table.
//!
//! # Concurrency model
//! The whole table is an immutable snapshot behind an [`ArcSwap`]. Readers
//! load the current snapshot without locking and never observe a partial
//! update. Writers publish a new snapshot:
//! - [`PermissionCache::replace_all`] swaps in a fully built table.
//! - [`PermissionCache::insert`] copies the table with one role's entry
//!   replaced, via `rcu`, so concurrent writers to different roles do not
//!   lose each other's updates.
//! - [`PermissionCache::remove`] drops one role the same way.
use crate::grants::Grants;
use crate::role::Role;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;

pub type CacheSnapshot = HashMap<Role, Arc<Grants>>;

#[derive(Debug)]
pub struct PermissionCache {
    snapshot: ArcSwap<CacheSnapshot>,
}

impl Default for PermissionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionCache {
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Current table. Cheap to call on every request.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        self.snapshot.load_full()
    }

    pub fn get(&self, role: &str) -> Option<Arc<Grants>> {
        self.snapshot.load().get(role).cloned()
    }

    pub fn replace_all(&self, table: CacheSnapshot) {
        let roles = table.len();
        self.snapshot.store(Arc::new(table));
        metrics::gauge!("gatehouse_cached_roles").set(roles as f64);
    }

    pub fn insert(&self, role: Role, grants: Grants) {
        let grants = Arc::new(grants);
        let previous = self.snapshot.rcu(|current| {
            let mut next = CacheSnapshot::clone(current);
            next.insert(role.clone(), grants.clone());
            next
        });
        let roles = previous.len() + usize::from(!previous.contains_key(&role));
        metrics::gauge!("gatehouse_cached_roles").set(roles as f64);
    }

    /// Drop `role`; later lookups see it as unknown.
    pub fn remove(&self, role: &str) {
        let previous = self.snapshot.rcu(|current| {
            let mut next = CacheSnapshot::clone(current);
            next.remove(role);
            next
        });
        let roles = previous.len() - usize::from(previous.contains_key(role));
        metrics::gauge!("gatehouse_cached_roles").set(roles as f64);
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.load().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;
    use std::collections::BTreeSet;

    fn grants(module: &str, actions: &[Action]) -> Grants {
        let mut grants = Grants::new();
        grants.insert(module.to_string(), actions.iter().copied().collect::<BTreeSet<_>>());
        grants
    }

    #[test]
    fn unknown_role_is_absent() {
        let cache = PermissionCache::new();
        assert!(cache.get("ghost").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_replaces_whole_entry() {
        let cache = PermissionCache::new();
        cache.insert(Role::new("operator"), grants("chat", &[Action::Read]));
        cache.insert(Role::new("operator"), grants("email", &[Action::Create]));
        let current = cache.get("operator").expect("present");
        assert!(!current.contains_key("chat"));
        assert!(current["email"].contains(&Action::Create));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn old_snapshot_is_unaffected_by_later_writes() {
        let cache = PermissionCache::new();
        cache.insert(Role::new("viewer"), grants("invoices", &[Action::Read]));
        let before = cache.snapshot();
        cache.insert(Role::new("viewer"), Grants::new());
        assert!(before["viewer"].contains_key("invoices"));
        assert!(cache.get("viewer").expect("present").is_empty());
    }

    #[test]
    fn remove_drops_only_that_role() {
        let cache = PermissionCache::new();
        cache.insert(Role::new("viewer"), grants("invoices", &[Action::Read]));
        cache.insert(Role::new("operator"), grants("chat", &[Action::Read]));
        cache.remove("viewer");
        cache.remove("ghost");
        assert!(cache.get("viewer").is_none());
        assert!(cache.get("operator").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn replace_all_drops_roles_missing_from_new_table() {
        let cache = PermissionCache::new();
        cache.insert(Role::new("viewer"), Grants::new());
        let mut table = CacheSnapshot::new();
        table.insert(Role::new("operator"), Arc::new(Grants::new()));
        cache.replace_all(table);
        assert!(cache.get("viewer").is_none());
        assert!(cache.get("operator").is_some());
    }

    #[test]
    fn concurrent_inserts_to_different_roles_all_land() {
        let cache = Arc::new(PermissionCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for j in 0..50 {
                        cache.insert(
                            Role::new(format!("role-{i}")),
                            grants("chat", if j % 2 == 0 { &[Action::Read] } else { &[Action::Create] }),
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("join");
        }
        assert_eq!(cache.len(), 8);
    }
}
