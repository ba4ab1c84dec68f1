//! Node-graph editing model.
//!
//! Everything here is GPU-free: the camera, the typed document, hit-testing
//! and the interaction state machine operate on plain data, and the scene
//! module records the result into an engine `DrawList`.

pub mod camera;
pub mod document;
pub mod graph;
pub mod hit;
pub mod interaction;
pub mod painter;
pub mod scene;

pub use camera::Camera;
pub use document::{Document, DocumentError, Settings};
pub use graph::{Connection, ConnectionStore, ConnectorKind, ConnectorRef, Node, NodeId, NodeStore};
pub use interaction::{Interaction, Mode};
pub use painter::GraphPainter;
