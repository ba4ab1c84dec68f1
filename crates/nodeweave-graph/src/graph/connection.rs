use super::connector::{ConnectorKind, ConnectorRef};
use super::node::NodeId;

/// Directed edge from an output connector to an input connector.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Connection {
    pub from_node: NodeId,
    pub from_output: u32,
    pub to_node: NodeId,
    pub to_input: u32,
}

impl Connection {
    pub fn new(from_node: NodeId, from_output: u32, to_node: NodeId, to_input: u32) -> Self {
        Self { from_node, from_output, to_node, to_input }
    }

    pub fn source(&self) -> ConnectorRef {
        ConnectorRef::new(self.from_node, ConnectorKind::Output, self.from_output)
    }

    pub fn target(&self) -> ConnectorRef {
        ConnectorRef::new(self.to_node, ConnectorKind::Input, self.to_input)
    }

    /// Whether one of the endpoints is exactly `c`.
    pub fn uses(&self, c: ConnectorRef) -> bool {
        match c.kind {
            ConnectorKind::Output => self.source() == c,
            ConnectorKind::Input => self.target() == c,
        }
    }

    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.from_node == self.to_node
    }
}

/// Connections in creation order.
///
/// Duplicates are allowed; self-loops never enter the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionStore {
    items: Vec<Connection>,
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `c`. Returns `false` (and stores nothing) for a self-loop.
    pub fn add(&mut self, c: Connection) -> bool {
        if c.is_self_loop() {
            log::debug!("rejected self-loop connection on node {}", c.from_node);
            return false;
        }
        self.items.push(c);
        true
    }

    /// Removes every connection attached to `c`, keeping the rest in order.
    ///
    /// Returns how many were removed.
    pub fn remove_connector(&mut self, c: ConnectorRef) -> usize {
        let before = self.items.len();
        self.items.retain(|conn| !conn.uses(c));
        before - self.items.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based access matching document numbering.
    pub fn get(&self, one_based: usize) -> Option<&Connection> {
        one_based.checked_sub(1).and_then(|i| self.items.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Connection] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> NodeId {
        NodeId::new(n).unwrap()
    }

    #[test]
    fn self_loop_is_rejected() {
        let mut store = ConnectionStore::new();
        assert!(!store.add(Connection::new(id(1), 1, id(1), 1)));
        assert!(store.is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let mut store = ConnectionStore::new();
        let c = Connection::new(id(1), 1, id(2), 1);
        assert!(store.add(c));
        assert!(store.add(c));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_output_connector_drops_only_matching_edges() {
        let mut store = ConnectionStore::new();
        let a = Connection::new(id(1), 1, id(2), 1);
        let b = Connection::new(id(1), 2, id(2), 1);
        let c = Connection::new(id(3), 1, id(2), 2);
        let d = Connection::new(id(1), 2, id(3), 1);
        for conn in [a, b, c, d] {
            store.add(conn);
        }

        let removed = store.remove_connector(ConnectorRef::new(id(1), ConnectorKind::Output, 2));
        assert_eq!(removed, 2);
        assert_eq!(store.as_slice(), &[a, c]);
        assert!(store.iter().all(|conn| !conn.uses(ConnectorRef::new(id(1), ConnectorKind::Output, 2))));
    }

    #[test]
    fn remove_input_connector_matches_target_side_only() {
        let mut store = ConnectionStore::new();
        let a = Connection::new(id(1), 1, id(2), 1);
        let b = Connection::new(id(2), 1, id(3), 1);
        store.add(a);
        store.add(b);

        // Node 2 slot 1 exists as both an input (target of `a`) and output (source of `b`).
        assert_eq!(store.remove_connector(ConnectorRef::new(id(2), ConnectorKind::Input, 1)), 1);
        assert_eq!(store.as_slice(), &[b]);
    }

    #[test]
    fn connect_then_remove_leaves_nothing() {
        let mut store = ConnectionStore::new();
        store.add(Connection::new(id(1), 2, id(2), 1));
        assert_eq!(store.remove_connector(ConnectorRef::new(id(1), ConnectorKind::Output, 2)), 1);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn remaining_entries_are_renumbered_from_one() {
        let mut store = ConnectionStore::new();
        let a = Connection::new(id(1), 1, id(2), 1);
        let b = Connection::new(id(3), 1, id(2), 2);
        store.add(a);
        store.add(b);
        store.remove_connector(ConnectorRef::new(id(1), ConnectorKind::Output, 1));

        assert_eq!(store.get(1), Some(&b));
        assert_eq!(store.get(0), None);
        assert_eq!(store.get(2), None);
    }
}
