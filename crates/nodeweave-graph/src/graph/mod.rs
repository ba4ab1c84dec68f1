//! Graph data: nodes, their derived connectors and the connections between them.

mod connection;
mod connector;
mod node;

pub use connection::{Connection, ConnectionStore};
pub use connector::{
    CONNECTOR_HIT_RADIUS, CONNECTOR_RADIUS, CONNECTOR_SPACING, ConnectorKind, ConnectorRef,
    slot_offset,
};
pub use node::{Node, NodeId, NodeStore};
