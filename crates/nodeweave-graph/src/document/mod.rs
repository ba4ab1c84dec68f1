//! The graph document: settings, camera, nodes and connections.
//!
//! Loaded once at startup from TOML. Afterwards the in-memory [`Document`]
//! is the only source of truth; nothing is written back.

mod error;
mod load;

use std::path::Path;

use crate::camera::Camera;
use crate::graph::{ConnectionStore, NodeStore};

pub use error::DocumentError;

/// Window, font and label configuration from the `[config]` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub font_path: String,
    /// World units; text scales with zoom.
    pub font_size: f32,
    /// Label drawn at the world origin.
    pub text: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_title: "SDL3 Lua App".to_string(),
            window_width: 800,
            window_height: 600,
            font_path: "Kenney Mini.ttf".to_string(),
            font_size: 24.0,
            text: "Hello, World!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub settings: Settings,
    pub camera: Camera,
    pub nodes: NodeStore,
    pub connections: ConnectionStore,
}

impl Document {
    pub fn new(settings: Settings, camera: Camera, nodes: NodeStore, connections: ConnectionStore) -> Self {
        Self { settings, camera, nodes, connections }
    }

    /// Reads and parses a document file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc = Self::from_toml_str(&src)?;
        log::info!(
            "loaded {}: {} nodes, {} connections",
            path.display(),
            doc.nodes.len(),
            doc.connections.len()
        );
        Ok(doc)
    }

    /// Parses a document from TOML source.
    ///
    /// Only invalid TOML is an error. Missing or mistyped fields fall back to
    /// defaults, and unusable connection records are skipped, each with a warning.
    pub fn from_toml_str(src: &str) -> Result<Self, DocumentError> {
        load::parse(src).map_err(DocumentError::from)
    }
}
