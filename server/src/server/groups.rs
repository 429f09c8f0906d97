// The group directory: group name -> member connections.

use std::collections::{HashMap, HashSet};

use crate::server::state::ConnId;

/// Named sets of member connections. Groups are created lazily on first
/// join and dropped again once the last member leaves.
#[derive(Default)]
pub struct Groups {
    map: HashMap<String, HashSet<ConnId>>,
}

impl Groups {
    /// Add `conn` to the group, creating it if absent. Adding twice is a
    /// no-op.
    pub fn join(&mut self, group: &str, conn: ConnId) {
        self.map.entry(group.to_string()).or_default().insert(conn);
    }

    /// Remove `conn` from the group. An emptied group entry is removed.
    pub fn leave(&mut self, group: &str, conn: ConnId) {
        if let Some(members) = self.map.get_mut(group) {
            members.remove(&conn);
            if members.is_empty() {
                self.map.remove(group);
            }
        }
    }

    /// Owned snapshot of the group's members for fan-out. Unknown groups
    /// are simply empty, not an error.
    pub fn members(&self, group: &str) -> Vec<ConnId> {
        self.map
            .get(group)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Remove `conn` from every group it appears in. Used on disconnect to
    /// sweep memberships whose owning session no longer exists.
    pub fn purge(&mut self, conn: ConnId) {
        self.map.retain(|_, members| {
            members.remove(&conn);
            !members.is_empty()
        });
    }

    pub fn contains(&self, group: &str) -> bool {
        self.map.contains_key(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_is_idempotent() {
        let mut groups = Groups::default();
        let conn = ConnId::next();
        groups.join("lobby", conn);
        groups.join("lobby", conn);
        assert_eq!(groups.members("lobby").len(), 1);
    }

    #[test]
    fn unknown_group_has_no_members() {
        let groups = Groups::default();
        assert!(groups.members("nowhere").is_empty());
    }

    #[test]
    fn empty_groups_are_collected() {
        let mut groups = Groups::default();
        let a = ConnId::next();
        let b = ConnId::next();
        groups.join("lobby", a);
        groups.join("lobby", b);

        groups.leave("lobby", a);
        assert!(groups.contains("lobby"));
        groups.leave("lobby", b);
        assert!(!groups.contains("lobby"));
    }

    #[test]
    fn purge_sweeps_every_membership() {
        let mut groups = Groups::default();
        let a = ConnId::next();
        let b = ConnId::next();
        groups.join("lobby", a);
        groups.join("lobby", b);
        groups.join("games", a);

        groups.purge(a);
        assert_eq!(groups.members("lobby"), vec![b]);
        assert!(!groups.contains("games"));
    }

    #[test]
    fn leave_of_unknown_group_is_a_noop() {
        let mut groups = Groups::default();
        groups.leave("nowhere", ConnId::next());
        assert!(!groups.contains("nowhere"));
    }
}
