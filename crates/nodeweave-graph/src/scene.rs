//! Per-frame draw recording for the whole graph.

use nodeweave_engine::coords::Vec2;
use nodeweave_engine::paint::Color;

use crate::document::Document;
use crate::graph::{CONNECTOR_RADIUS, ConnectorKind};
use crate::interaction::Interaction;
use crate::painter::GraphPainter;

/// Window background.
pub const CLEAR_COLOR: Color = Color { r: 0.2, g: 0.3, b: 0.3, a: 1.0 };

/// Palette for graph elements.
#[derive(Debug, Clone)]
pub struct Theme {
    pub connection: Color,
    pub pending_connection: Color,
    pub input: Color,
    pub output: Color,
    pub hover: Color,
    /// Hovered connectors are drawn this much larger.
    pub hover_scale: f32,
    pub label: Color,
    pub backdrop: Color,
    /// Backdrop margin around the origin label, in world units.
    pub backdrop_padding: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            connection: Color::opaque(0.9, 0.9, 0.9),
            pending_connection: Color::opaque(1.0, 0.85, 0.2),
            input: Color::opaque(0.3, 0.6, 1.0),
            output: Color::opaque(0.3, 1.0, 0.5),
            hover: Color::opaque(1.0, 1.0, 0.3),
            hover_scale: 1.5,
            label: Color::white(),
            backdrop: Color::from_srgb_u8(50, 50, 50, 200),
            backdrop_padding: 4.0,
        }
    }
}

/// Records one frame of the graph, back to front:
/// connections, the pending connection, node bodies, connectors, node
/// labels, and finally the origin label over its backdrop.
pub fn record(painter: &mut GraphPainter<'_>, doc: &Document, interaction: &Interaction, theme: &Theme) {
    for c in doc.connections.iter() {
        let (Some(a), Some(b)) = (doc.nodes.connector_pos(c.source()), doc.nodes.connector_pos(c.target())) else {
            continue;
        };
        painter.draw_line(a, b, theme.connection);
    }

    if let Some((from, to)) = interaction.pending_connection(doc) {
        painter.draw_line(from, to, theme.pending_connection);
    }

    for (_, node) in doc.nodes.iter() {
        painter.draw_rect(node.center, Vec2::new(node.size, node.size), node.color);
    }

    let hover = interaction.hover();
    for (id, node) in doc.nodes.iter() {
        for kind in [ConnectorKind::Input, ConnectorKind::Output] {
            let base = match kind {
                ConnectorKind::Input => theme.input,
                ConnectorKind::Output => theme.output,
            };
            for (slot, pos) in node.connectors(kind) {
                let hovered = hover.is_some_and(|h| h.node == id && h.kind == kind && h.slot == slot);
                if hovered {
                    painter.draw_circle(pos, CONNECTOR_RADIUS * theme.hover_scale, theme.hover);
                } else {
                    painter.draw_circle(pos, CONNECTOR_RADIUS, base);
                }
            }
        }
    }

    for (_, node) in doc.nodes.iter() {
        if node.text.is_empty() {
            continue;
        }
        let extent = painter.measure_text(&node.text);
        painter.draw_text(&node.text, node.center - extent / 2.0, theme.label);
    }

    let text = &doc.settings.text;
    if !text.is_empty() {
        let extent = painter.measure_text(text);
        let pad = theme.backdrop_padding;
        let size = Vec2::new(extent.x + 2.0 * pad, extent.y + 2.0 * pad);
        painter.draw_rect(extent / 2.0, size, theme.backdrop);
        painter.draw_text(text, Vec2::zero(), theme.label);
    }
}
