use std::fmt;

use nodeweave_engine::coords::Vec2;

use super::node::{Node, NodeId, NodeStore};

/// Vertical distance between neighbouring connectors, in world units.
pub const CONNECTOR_SPACING: f32 = 20.0;

/// Pick radius around a connector, in world units (independent of zoom).
pub const CONNECTOR_HIT_RADIUS: f32 = 15.0;

/// Drawn radius of a connector, in world units.
pub const CONNECTOR_RADIUS: f32 = 6.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ConnectorKind {
    /// Left edge; connection target.
    Input,
    /// Right edge; connection source.
    Output,
}

/// Address of one connector: node, side and 1-based slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ConnectorRef {
    pub node: NodeId,
    pub kind: ConnectorKind,
    pub slot: u32,
}

impl ConnectorRef {
    pub fn new(node: NodeId, kind: ConnectorKind, slot: u32) -> Self {
        Self { node, kind, slot }
    }
}

impl fmt::Display for ConnectorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.kind {
            ConnectorKind::Input => "in",
            ConnectorKind::Output => "out",
        };
        write!(f, "{}.{side}{}", self.node, self.slot)
    }
}

/// Vertical offset from the node center of 0-based slot `j` out of `n`.
///
/// Slots are spaced evenly and centered, so offsets of all `n` slots sum to zero.
#[inline]
pub fn slot_offset(j: u32, n: u32) -> f32 {
    j as f32 * CONNECTOR_SPACING - (n.saturating_sub(1)) as f32 * CONNECTOR_SPACING / 2.0
}

impl Node {
    #[inline]
    pub fn connector_count(&self, kind: ConnectorKind) -> u32 {
        match kind {
            ConnectorKind::Input => self.inputs,
            ConnectorKind::Output => self.outputs,
        }
    }

    /// World position of 1-based `slot`; `None` when out of range.
    pub fn connector_pos(&self, kind: ConnectorKind, slot: u32) -> Option<Vec2> {
        let n = self.connector_count(kind);
        if slot == 0 || slot > n {
            return None;
        }
        let x = match kind {
            ConnectorKind::Input => self.center.x - self.half_size(),
            ConnectorKind::Output => self.center.x + self.half_size(),
        };
        Some(Vec2::new(x, self.center.y + slot_offset(slot - 1, n)))
    }

    /// `(slot, position)` for every connector of `kind`, lowest slot first.
    pub fn connectors(&self, kind: ConnectorKind) -> impl Iterator<Item = (u32, Vec2)> + '_ {
        (1..=self.connector_count(kind)).filter_map(move |slot| Some((slot, self.connector_pos(kind, slot)?)))
    }
}

impl NodeStore {
    /// World position of a connector; `None` if node or slot does not exist.
    pub fn connector_pos(&self, c: ConnectorRef) -> Option<Vec2> {
        self.get(c.node)?.connector_pos(c.kind, c.slot)
    }

    /// Whether the referenced node exists and has that slot.
    pub fn has_connector(&self, c: ConnectorRef) -> bool {
        self.connector_pos(c).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node() -> Node {
        Node::new(Vec2::new(400.0, 300.0), 100.0).with_connectors(3, 2)
    }

    #[test]
    fn slot_offsets_are_centered() {
        for n in 1..=7u32 {
            let sum: f32 = (0..n).map(|j| slot_offset(j, n)).sum();
            assert!((sum / n as f32).abs() < 1e-4, "n = {n}");
        }
        assert_eq!(slot_offset(0, 1), 0.0);
        assert_eq!(slot_offset(0, 2), -10.0);
        assert_eq!(slot_offset(1, 2), 10.0);
    }

    #[test]
    fn connectors_sit_on_node_edges() {
        let n = node();
        assert_eq!(n.connector_pos(ConnectorKind::Input, 1), Some(Vec2::new(350.0, 280.0)));
        assert_eq!(n.connector_pos(ConnectorKind::Input, 3), Some(Vec2::new(350.0, 320.0)));
        assert_eq!(n.connector_pos(ConnectorKind::Output, 2), Some(Vec2::new(450.0, 310.0)));
    }

    #[test]
    fn out_of_range_slots_have_no_position() {
        let n = node();
        assert_eq!(n.connector_pos(ConnectorKind::Input, 0), None);
        assert_eq!(n.connector_pos(ConnectorKind::Output, 3), None);
        assert_eq!(n.connectors(ConnectorKind::Output).count(), 2);
    }

    #[test]
    fn display_names_side_and_slot() {
        let c = ConnectorRef::new(NodeId::new(2).unwrap(), ConnectorKind::Output, 1);
        assert_eq!(c.to_string(), "#2.out1");
    }
}
