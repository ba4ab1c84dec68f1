//! Point queries against the node store, in world coordinates.
//!
//! Priority rules shared by every query: lowest node id first, then lowest
//! slot. For connectors, outputs are considered before inputs.

use nodeweave_engine::coords::{Rect, Vec2};

use crate::graph::{CONNECTOR_HIT_RADIUS, ConnectorKind, ConnectorRef, Node, NodeId, NodeStore};

impl Node {
    /// Closed square test: points on the border hit.
    pub fn body_contains(&self, p: Vec2) -> bool {
        Rect::centered_square(self.center, self.size).contains_inclusive(p)
    }
}

impl NodeStore {
    /// Topmost-priority node whose body contains `p`.
    pub fn node_at(&self, p: Vec2) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.body_contains(p)).map(|(id, _)| id)
    }

    /// First connector of `kind` within the pick radius of `p`.
    pub fn connector_of_kind_at(&self, p: Vec2, kind: ConnectorKind) -> Option<ConnectorRef> {
        self.connectors_of_kind_at(p, kind).next()
    }

    /// Output under `p` if any, otherwise input under `p`.
    pub fn connector_at(&self, p: Vec2) -> Option<ConnectorRef> {
        self.connector_of_kind_at(p, ConnectorKind::Output)
            .or_else(|| self.connector_of_kind_at(p, ConnectorKind::Input))
    }

    /// Every connector within the pick radius of `p`, outputs first.
    pub fn connectors_at(&self, p: Vec2) -> Vec<ConnectorRef> {
        self.connectors_of_kind_at(p, ConnectorKind::Output)
            .chain(self.connectors_of_kind_at(p, ConnectorKind::Input))
            .collect()
    }

    fn connectors_of_kind_at(&self, p: Vec2, kind: ConnectorKind) -> impl Iterator<Item = ConnectorRef> + '_ {
        self.iter().flat_map(move |(id, node)| {
            node.connectors(kind)
                .filter(move |(_, pos)| pos.distance(p) <= CONNECTOR_HIT_RADIUS)
                .map(move |(slot, _)| ConnectorRef::new(id, kind, slot))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> NodeId {
        NodeId::new(n).unwrap()
    }

    fn single() -> NodeStore {
        NodeStore::new(vec![Node::new(Vec2::new(400.0, 300.0), 100.0)])
    }

    #[test]
    fn body_hit_inside_and_miss_outside() {
        let nodes = single();
        assert_eq!(nodes.node_at(Vec2::new(420.0, 310.0)), Some(id(1)));
        assert_eq!(nodes.node_at(Vec2::new(460.0, 310.0)), None);
    }

    #[test]
    fn body_hit_is_reflexive_and_closed() {
        let nodes = single();
        assert_eq!(nodes.node_at(Vec2::new(400.0, 300.0)), Some(id(1)));
        assert_eq!(nodes.node_at(Vec2::new(450.0, 350.0)), Some(id(1)));
        assert_eq!(nodes.node_at(Vec2::new(450.01, 300.0)), None);
        assert_eq!(nodes.node_at(Vec2::new(400.0, 249.9)), None);
    }

    #[test]
    fn overlapping_bodies_pick_lowest_id() {
        let nodes = NodeStore::new(vec![
            Node::new(Vec2::new(0.0, 0.0), 100.0),
            Node::new(Vec2::new(20.0, 0.0), 100.0),
        ]);
        assert_eq!(nodes.node_at(Vec2::new(10.0, 0.0)), Some(id(1)));
        assert_eq!(nodes.node_at(Vec2::new(60.0, 0.0)), Some(id(2)));
    }

    #[test]
    fn connector_pick_radius_is_fifteen() {
        let nodes = NodeStore::new(vec![Node::new(Vec2::new(0.0, 0.0), 100.0).with_connectors(0, 1)]);
        let out = ConnectorRef::new(id(1), ConnectorKind::Output, 1);

        assert_eq!(nodes.connector_at(Vec2::new(65.0, 0.0)), Some(out));
        assert_eq!(nodes.connector_at(Vec2::new(59.0, 12.0)), Some(out));
        assert_eq!(nodes.connector_at(Vec2::new(65.1, 0.0)), None);
    }

    #[test]
    fn outputs_win_over_inputs() {
        // Node 2's input sits exactly on node 1's output.
        let nodes = NodeStore::new(vec![
            Node::new(Vec2::new(0.0, 0.0), 100.0).with_connectors(0, 1),
            Node::new(Vec2::new(100.0, 0.0), 100.0).with_connectors(1, 0),
        ]);
        let p = Vec2::new(50.0, 0.0);

        assert_eq!(nodes.connector_at(p), Some(ConnectorRef::new(id(1), ConnectorKind::Output, 1)));
        assert_eq!(
            nodes.connectors_at(p),
            vec![
                ConnectorRef::new(id(1), ConnectorKind::Output, 1),
                ConnectorRef::new(id(2), ConnectorKind::Input, 1),
            ]
        );
    }

    #[test]
    fn nearby_slots_resolve_to_lowest() {
        // Slots are 20 apart with radius 15, so the midpoint hits both.
        let nodes = NodeStore::new(vec![Node::new(Vec2::new(0.0, 0.0), 100.0).with_connectors(2, 0)]);
        let mid = Vec2::new(-50.0, 0.0);

        assert_eq!(nodes.connector_at(mid), Some(ConnectorRef::new(id(1), ConnectorKind::Input, 1)));
        assert_eq!(nodes.connectors_at(mid).len(), 2);
    }

    #[test]
    fn empty_store_hits_nothing() {
        let nodes = NodeStore::default();
        assert_eq!(nodes.node_at(Vec2::zero()), None);
        assert!(nodes.connectors_at(Vec2::zero()).is_empty());
    }
}
