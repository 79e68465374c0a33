//! The shared policy snapshot.
//!
//! Request handlers only read; the refresher only writes. Each write swaps
//! one whole slice (maintenance flag, ban list or group definitions) into a
//! fresh snapshot, so a reader sees either the old or the new slice, never a
//! mix.

use arc_swap::ArcSwap;
use discovery_core::EndpointSet;
use std::collections::HashMap;
use std::sync::Arc;

use super::keys::TokenKeys;

/// Stored key -> ban reason.
pub type BanList = HashMap<String, String>;

/// Stored key -> endpoint group name.
pub type GroupDefinitions = HashMap<String, String>;

/// Default endpoints plus the named group overrides.
///
/// Fixed after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointTable {
    /// Endpoints for consoles in no group
    pub default: EndpointSet,

    /// Group name -> endpoints
    pub groups: HashMap<String, EndpointSet>,
}

impl EndpointTable {
    /// Create a table with no named groups
    #[must_use]
    pub fn new(default: EndpointSet) -> Self {
        Self {
            default,
            groups: HashMap::new(),
        }
    }

    /// Add a named group
    #[must_use]
    pub fn with_group(mut self, name: impl Into<String>, endpoints: EndpointSet) -> Self {
        self.groups.insert(name.into(), endpoints);
        self
    }

    /// Endpoints for a named group
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&EndpointSet> {
        self.groups.get(name)
    }
}

/// Point-in-time view of every policy domain.
#[derive(Debug, Clone)]
pub struct PolicyState {
    /// Global maintenance flag
    pub maintenance: bool,

    /// Banned tokens
    pub bans: Arc<BanList>,

    /// Token -> group assignments
    pub group_definitions: Arc<GroupDefinitions>,

    /// Endpoint sets
    pub endpoints: Arc<EndpointTable>,

    /// How ban and group keys are stored
    pub token_keys: TokenKeys,
}

impl PolicyState {
    /// A snapshot with no maintenance, bans or groups
    #[must_use]
    pub fn new(endpoints: EndpointTable, token_keys: TokenKeys) -> Self {
        Self {
            maintenance: false,
            bans: Arc::new(BanList::new()),
            group_definitions: Arc::new(GroupDefinitions::new()),
            endpoints: Arc::new(endpoints),
            token_keys,
        }
    }

    /// Set the maintenance flag
    #[must_use]
    pub fn with_maintenance(mut self, active: bool) -> Self {
        self.maintenance = active;
        self
    }

    /// Set the ban list
    #[must_use]
    pub fn with_bans(mut self, bans: BanList) -> Self {
        self.bans = Arc::new(bans);
        self
    }

    /// Set the group definitions
    #[must_use]
    pub fn with_group_definitions(mut self, definitions: GroupDefinitions) -> Self {
        self.group_definitions = Arc::new(definitions);
        self
    }
}

/// Owner of the current [`PolicyState`], shared between the HTTP handler
/// and the refresher.
#[derive(Debug, Clone)]
pub struct PolicyStore {
    inner: Arc<ArcSwap<PolicyState>>,
}

impl PolicyStore {
    /// Create a store holding `initial`
    #[must_use]
    pub fn new(initial: PolicyState) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// A consistent snapshot of all domains
    #[must_use]
    pub fn current(&self) -> Arc<PolicyState> {
        self.inner.load_full()
    }

    /// Replace the maintenance flag
    pub fn replace_maintenance(&self, active: bool) {
        self.inner.rcu(|state| PolicyState::clone(state).with_maintenance(active));
    }

    /// Replace the whole ban list
    pub fn replace_bans(&self, bans: BanList) {
        let bans = Arc::new(bans);
        self.inner.rcu(|state| PolicyState {
            bans: Arc::clone(&bans),
            ..PolicyState::clone(state)
        });
    }

    /// Replace the whole group definition table
    pub fn replace_group_definitions(&self, definitions: GroupDefinitions) {
        let definitions = Arc::new(definitions);
        self.inner.rcu(|state| PolicyState {
            group_definitions: Arc::clone(&definitions),
            ..PolicyState::clone(state)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> PolicyStore {
        let table = EndpointTable::new(EndpointSet::new("d", "a", "p", "n"));
        PolicyStore::new(PolicyState::new(table, TokenKeys::Plaintext))
    }

    #[test]
    fn test_slices_replace_independently() {
        let store = store();
        let mut bans = BanList::new();
        bans.insert("tok".into(), "reason".into());

        store.replace_bans(bans);
        store.replace_maintenance(true);

        let state = store.current();
        assert!(state.maintenance);
        assert_eq!(state.bans.get("tok").map(String::as_str), Some("reason"));
        assert!(state.group_definitions.is_empty());
    }

    #[test]
    fn test_snapshot_is_stable_across_replacement() {
        let store = store();
        let before = store.current();

        let mut defs = GroupDefinitions::new();
        defs.insert("tok".into(), "beta".into());
        store.replace_group_definitions(defs);

        assert!(before.group_definitions.is_empty());
        assert_eq!(store.current().group_definitions.len(), 1);
    }

    #[test]
    fn test_concurrent_readers_see_whole_slices() {
        let store = store();
        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                for round in 0..200u32 {
                    let bans: BanList = (0..16)
                        .map(|i| (format!("tok-{i}"), format!("round-{round}")))
                        .collect();
                    store.replace_bans(bans);
                }
            })
        };

        for _ in 0..200 {
            let state = store.current();
            let reasons: std::collections::HashSet<&String> = state.bans.values().collect();
            assert!(reasons.len() <= 1, "ban list mixed two rounds: {reasons:?}");
            assert!(state.bans.is_empty() || state.bans.len() == 16);
        }

        writer.join().unwrap();
    }
}
