use std::fmt;
use std::num::NonZeroU32;

use nodeweave_engine::coords::Vec2;
use nodeweave_engine::paint::Color;

/// 1-based position of a node in its [`NodeStore`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// `None` for `0`; ids are 1-based.
    #[inline]
    pub fn new(one_based: u32) -> Option<Self> {
        NonZeroU32::new(one_based).map(Self)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }

    #[inline]
    fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index + 1).ok().and_then(Self::new)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A square node in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Center of the square.
    pub center: Vec2,
    /// Side length; always positive.
    pub size: f32,
    pub color: Color,
    pub text: String,
    pub inputs: u32,
    pub outputs: u32,
}

impl Node {
    /// Red, unlabeled node with no connectors.
    pub fn new(center: Vec2, size: f32) -> Self {
        Self {
            center,
            size,
            color: Color::opaque(1.0, 0.0, 0.0),
            text: String::new(),
            inputs: 0,
            outputs: 0,
        }
    }

    pub fn with_connectors(mut self, inputs: u32, outputs: u32) -> Self {
        self.inputs = inputs;
        self.outputs = outputs;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }
}

/// Nodes in document order. Ids stay valid for the whole session since
/// nodes are never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStore {
    nodes: Vec<Node>,
}

impl NodeStore {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Nodes with their ids, lowest id first.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| NodeId::from_index(i).map(|id| (id, n)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_one_based() {
        assert!(NodeId::new(0).is_none());
        let store = NodeStore::new(vec![
            Node::new(Vec2::new(0.0, 0.0), 10.0),
            Node::new(Vec2::new(5.0, 5.0), 10.0).with_text("second"),
        ]);

        let ids: Vec<u32> = store.iter().map(|(id, _)| id.get()).collect();
        assert_eq!(ids, vec![1, 2]);

        let second = NodeId::new(2).unwrap();
        assert_eq!(store.get(second).unwrap().text, "second");
        assert!(store.get(NodeId::new(3).unwrap()).is_none());
    }

    #[test]
    fn get_mut_moves_node() {
        let mut store = NodeStore::new(vec![Node::new(Vec2::new(0.0, 0.0), 10.0)]);
        let id = NodeId::new(1).unwrap();
        store.get_mut(id).unwrap().center = Vec2::new(3.0, 4.0);
        assert_eq!(store.get(id).unwrap().center, Vec2::new(3.0, 4.0));
    }
}
