//! Pointer-driven editing: node drag, camera pan/zoom, connection forming
//! and removal.

use nodeweave_engine::coords::Vec2;
use nodeweave_engine::input::{InputEvent, InputFrame, MouseButton, MouseButtonState, PointerButtonEvent};

use crate::document::Document;
use crate::graph::{Connection, ConnectorKind, ConnectorRef, NodeId};

/// Current gesture. Everything except `Idle` is a drag-like mode, and at most
/// one is active at a time.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    /// `offset` is the grab point relative to the node center, in world units.
    DraggingNode { node: NodeId, offset: Vec2 },
    /// `anchor` is the last pointer sample in screen space.
    Panning { anchor: Vec2 },
    /// Dragging a new connection out of `origin` (always an output).
    Connecting { origin: ConnectorRef },
}

/// Interaction state machine over a [`Document`].
///
/// Feed it the frame's events in arrival order; it mutates node positions,
/// the camera and the connection store in place.
#[derive(Debug, Default)]
pub struct Interaction {
    mode: Mode,
    pointer_screen: Vec2,
    pointer_world: Vec2,
    hover: Option<ConnectorRef>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Connector under the pointer, if any.
    #[inline]
    pub fn hover(&self) -> Option<ConnectorRef> {
        self.hover
    }


    #[inline]
    pub fn pointer_world(&self) -> Vec2 {
        self.pointer_world
    }

    /// Origin connector position and pointer, in world space, while connecting.
    pub fn pending_connection(&self, doc: &Document) -> Option<(Vec2, Vec2)> {
        let Mode::Connecting { origin } = self.mode else { return None };
        Some((doc.nodes.connector_pos(origin)?, self.pointer_world))
    }

    /// Replays every event recorded this frame, in order.
    pub fn handle_frame(&mut self, doc: &mut Document, frame: &InputFrame) {
        for ev in frame.events() {
            self.handle_event(doc, ev);
        }
    }

    pub fn handle_event(&mut self, doc: &mut Document, ev: &InputEvent) {
        match ev {
            InputEvent::PointerMoved(m) => self.pointer_moved(doc, Vec2::new(m.x, m.y)),
            InputEvent::PointerButton(b) => self.pointer_button(doc, b),
            InputEvent::MouseWheel { delta } => self.wheel(doc, delta.vertical()),
            // Leaving the window keeps any gesture alive; the release may still arrive.
            InputEvent::PointerLeft => {}
        }

        self.hover = doc.nodes.connector_at(self.pointer_world);
    }

    fn set_pointer(&mut self, doc: &Document, screen: Vec2) {
        self.pointer_screen = screen;
        self.pointer_world = doc.camera.screen_to_world(screen);
    }

    fn pointer_moved(&mut self, doc: &mut Document, screen: Vec2) {
        self.set_pointer(doc, screen);

        match self.mode {
            Mode::DraggingNode { node, offset } => {
                if let Some(n) = doc.nodes.get_mut(node) {
                    n.center = self.pointer_world - offset;
                }
            }
            Mode::Panning { anchor } => {
                doc.camera.pan(screen - anchor);
                self.mode = Mode::Panning { anchor: screen };
                self.pointer_world = doc.camera.screen_to_world(screen);
            }
            Mode::Idle | Mode::Connecting { .. } => {}
        }
    }

    fn pointer_button(&mut self, doc: &mut Document, ev: &PointerButtonEvent) {
        self.set_pointer(doc, Vec2::new(ev.x, ev.y));

        match (ev.button, ev.state) {
            (MouseButton::Left, MouseButtonState::Pressed) => self.left_pressed(doc),
            (MouseButton::Left, MouseButtonState::Released) => self.left_released(doc),
            (MouseButton::Middle, MouseButtonState::Pressed) => self.middle_pressed(),
            (MouseButton::Middle, MouseButtonState::Released) => {
                if matches!(self.mode, Mode::Panning { .. }) {
                    self.mode = Mode::Idle;
                }
            }
            (MouseButton::Right, MouseButtonState::Pressed) => self.right_pressed(doc),
            _ => {}
        }
    }

    fn left_pressed(&mut self, doc: &mut Document) {
        if self.mode != Mode::Idle {
            log::debug!("left press ignored while {:?}", self.mode);
            return;
        }

        let p = self.pointer_world;
        if doc.nodes.is_empty() {
            log::info!("click at world ({:.1}, {:.1}) with no nodes", p.x, p.y);
            return;
        }

        if let Some(origin) = doc.nodes.connector_of_kind_at(p, ConnectorKind::Output) {
            log::debug!("connecting from {origin}");
            self.mode = Mode::Connecting { origin };
            return;
        }

        // Inputs are not drag sources; a press on one falls through to the body.
        match doc.nodes.node_at(p) {
            Some(id) => {
                let Some(node) = doc.nodes.get(id) else { return };
                let offset = p - node.center;
                log::info!(
                    "dragging node {id}: screen=({:.1}, {:.1}) world=({:.1}, {:.1}) node=({:.1}, {:.1}) size={:.1} cam=({:.1}, {:.1}, {:.2})",
                    self.pointer_screen.x,
                    self.pointer_screen.y,
                    p.x,
                    p.y,
                    node.center.x,
                    node.center.y,
                    node.size,
                    doc.camera.x,
                    doc.camera.y,
                    doc.camera.scale()
                );
                self.mode = Mode::DraggingNode { node: id, offset };
            }
            None => {
                log::info!(
                    "click outside nodes: screen=({:.1}, {:.1}) world=({:.1}, {:.1}) cam=({:.1}, {:.1}, {:.2})",
                    self.pointer_screen.x,
                    self.pointer_screen.y,
                    p.x,
                    p.y,
                    doc.camera.x,
                    doc.camera.y,
                    doc.camera.scale()
                );
            }
        }
    }

    fn left_released(&mut self, doc: &mut Document) {
        match self.mode {
            Mode::Connecting { origin } => {
                self.mode = Mode::Idle;
                match doc.nodes.connector_of_kind_at(self.pointer_world, ConnectorKind::Input) {
                    Some(target) if target.node != origin.node => {
                        let added = doc
                            .connections
                            .add(Connection::new(origin.node, origin.slot, target.node, target.slot));
                        if added {
                            log::info!("connected {origin} -> {target}");
                        }
                    }
                    Some(target) => log::debug!("{origin} -> {target} would be a self-loop; discarded"),
                    None => log::debug!("connection from {origin} released over nothing"),
                }
            }
            Mode::DraggingNode { node, .. } => {
                log::debug!("drag of node {node} finished");
                self.mode = Mode::Idle;
            }
            Mode::Idle | Mode::Panning { .. } => {}
        }
    }

    fn middle_pressed(&mut self) {
        if self.mode != Mode::Idle {
            log::debug!("middle press ignored while {:?}", self.mode);
            return;
        }
        self.mode = Mode::Panning { anchor: self.pointer_screen };
    }

    fn right_pressed(&mut self, doc: &mut Document) {
        let hits = doc.nodes.connectors_at(self.pointer_world);
        if hits.is_empty() {
            return;
        }

        let removed: usize = hits.iter().map(|c| doc.connections.remove_connector(*c)).sum();
        log::info!("removed {removed} connection(s) at {} connector(s)", hits.len());
    }

    fn wheel(&mut self, doc: &mut Document, direction: f32) {
        if doc.camera.zoom_at(self.pointer_screen, direction) {
            self.pointer_world = doc.camera.screen_to_world(self.pointer_screen);
            log::debug!("zoom -> {:.3}", doc.camera.scale());
        }
    }
}
