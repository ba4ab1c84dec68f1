use std::fmt::Debug;

use nodeweave_engine::coords::Vec2;
use nodeweave_engine::paint::Color;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use toml::Value;

use crate::camera::Camera;
use crate::graph::{Connection, ConnectionStore, ConnectorKind, ConnectorRef, Node, NodeId, NodeStore};

use super::{Document, Settings};

const DEFAULT_NODE_X: f32 = 400.0;
const DEFAULT_NODE_Y: f32 = 300.0;
const DEFAULT_NODE_SIZE: f32 = 100.0;

/// Whole file. Every field is lenient, so only malformed TOML fails to parse.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DocumentRecord {
    #[serde(deserialize_with = "lenient")]
    config: Option<ConfigRecord>,
    #[serde(deserialize_with = "lenient_records")]
    nodes: Option<Vec<Option<NodeRecord>>>,
    #[serde(deserialize_with = "lenient_records")]
    connections: Option<Vec<Option<ConnectionRecord>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigRecord {
    #[serde(deserialize_with = "lenient")]
    window_title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    window_width: Option<Count>,
    #[serde(deserialize_with = "lenient")]
    window_height: Option<Count>,
    #[serde(deserialize_with = "lenient")]
    font_path: Option<String>,
    #[serde(deserialize_with = "lenient")]
    font_size: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    camera: Option<CameraRecord>,
    #[serde(deserialize_with = "lenient_records")]
    nodes: Option<Vec<Option<NodeRecord>>>,
    #[serde(deserialize_with = "lenient_records")]
    connections: Option<Vec<Option<ConnectionRecord>>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CameraRecord {
    #[serde(deserialize_with = "lenient")]
    x: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    y: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    scale: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NodeRecord {
    #[serde(deserialize_with = "lenient")]
    x: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    y: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    size: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    r: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    g: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    b: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    text: Option<String>,
    #[serde(deserialize_with = "lenient")]
    inputs: Option<Count>,
    #[serde(deserialize_with = "lenient")]
    outputs: Option<Count>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConnectionRecord {
    #[serde(deserialize_with = "lenient")]
    from_node: Option<Count>,
    #[serde(deserialize_with = "lenient")]
    from_output: Option<Count>,
    #[serde(deserialize_with = "lenient")]
    to_node: Option<Count>,
    #[serde(deserialize_with = "lenient")]
    to_input: Option<Count>,
}

/// Integer field that also accepts floats (truncated).
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum Count {
    Int(i64),
    Float(f64),
}

impl Count {
    /// `None` when negative, non-finite or too large for `u32`.
    fn get(self) -> Option<u32> {
        match self {
            Count::Int(i) => u32::try_from(i).ok(),
            Count::Float(f) if f.is_finite() => u32::try_from(f.trunc() as i64).ok(),
            Count::Float(_) => None,
        }
    }
}

/// Deserializes `T`, or yields `None` with a warning when the value has the wrong shape.
fn lenient<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(convert(Value::deserialize(d)?))
}

/// Array of records where each entry is converted on its own, so one bad
/// entry keeps its slot instead of failing the whole list.
fn lenient_records<'de, D, T>(d: D) -> Result<Option<Vec<Option<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let records: Option<Vec<Value>> = lenient(d)?;
    Ok(records.map(|values| values.into_iter().map(convert).collect()))
}

fn convert<T: DeserializeOwned>(value: Value) -> Option<T> {
    let kind = value.type_str();
    match value.try_into() {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("ignoring {kind} value: {}", e.to_string().trim());
            None
        }
    }
}

/// Value or `default`, warning when it was missing or unusable.
fn or_default<T: Debug>(value: Option<T>, name: &str, default: T) -> T {
    value.unwrap_or_else(|| {
        log::warn!("{name} missing or invalid; using {default:?}");
        default
    })
}

/// Like [`or_default`], but non-positive numbers also fall back.
fn positive_or(value: Option<f32>, name: &str, default: f32) -> f32 {
    match value {
        Some(v) if v > 0.0 && v.is_finite() => v,
        Some(v) => {
            log::warn!("{name}: {v} must be positive; using {default}");
            default
        }
        None => or_default(None, name, default),
    }
}

fn count_or(value: Option<Count>, name: &str, default: u32) -> u32 {
    match value.map(Count::get) {
        Some(Some(v)) => v,
        Some(None) => {
            log::warn!("{name}: {value:?} is out of range; using {default}");
            default
        }
        None => or_default(None, name, default),
    }
}

/// Parses TOML source into a document, applying defaults and skip rules.
pub(super) fn parse(src: &str) -> Result<Document, toml::de::Error> {
    let raw: DocumentRecord = toml::from_str(src)?;
    Ok(raw.into_document())
}

impl DocumentRecord {
    fn into_document(self) -> Document {
        let mut config = self.config.unwrap_or_else(|| {
            log::warn!("no usable [config] table; using defaults");
            ConfigRecord::default()
        });

        let node_records = pick(config.nodes.take(), self.nodes, "nodes");
        let connection_records = pick(config.connections.take(), self.connections, "connections");

        let camera = match config.camera.take() {
            Some(c) => c.into_camera(),
            None => {
                log::warn!("config.camera missing or invalid; using default camera");
                Camera::default()
            }
        };
        let settings = config.into_settings();
        let nodes = nodes_from(node_records);
        let connections = connections_from(connection_records, &nodes);

        Document::new(settings, camera, nodes, connections)
    }
}

/// `[[config.<key>]]`, or top-level `[[<key>]]` as an alternate schema.
fn pick<T>(nested: Option<Vec<T>>, top: Option<Vec<T>>, key: &str) -> Option<Vec<T>> {
    if nested.is_some() && top.is_some() {
        log::warn!("both config.{key} and top-level {key} present; using config.{key}");
    }
    nested.or(top)
}

impl ConfigRecord {
    fn into_settings(self) -> Settings {
        let d = Settings::default();

        let window_width = match count_or(self.window_width, "config.window_width", d.window_width) {
            0 => {
                log::warn!("config.window_width must be positive; using {}", d.window_width);
                d.window_width
            }
            w => w,
        };
        let window_height = match count_or(self.window_height, "config.window_height", d.window_height) {
            0 => {
                log::warn!("config.window_height must be positive; using {}", d.window_height);
                d.window_height
            }
            h => h,
        };

        Settings {
            window_title: or_default(self.window_title, "config.window_title", d.window_title),
            window_width,
            window_height,
            font_path: or_default(self.font_path, "config.font_path", d.font_path),
            font_size: positive_or(self.font_size, "config.font_size", d.font_size),
            text: or_default(self.text, "config.text", d.text),
        }
    }
}

impl CameraRecord {
    fn into_camera(self) -> Camera {
        Camera::new(
            or_default(self.x, "config.camera.x", 0.0),
            or_default(self.y, "config.camera.y", 0.0),
            positive_or(self.scale, "config.camera.scale", 1.0),
        )
    }
}

impl NodeRecord {
    fn into_node(self, context: &str) -> Node {
        let field = |key: &str| format!("{context}.{key}");
        let center = Vec2::new(
            or_default(self.x, &field("x"), DEFAULT_NODE_X),
            or_default(self.y, &field("y"), DEFAULT_NODE_Y),
        );
        let color = Color::opaque(
            or_default(self.r, &field("r"), 1.0),
            or_default(self.g, &field("g"), 0.0),
            or_default(self.b, &field("b"), 0.0),
        );

        Node::new(center, positive_or(self.size, &field("size"), DEFAULT_NODE_SIZE))
            .with_color(color)
            .with_text(or_default(self.text, &field("text"), String::new()))
            .with_connectors(
                count_or(self.inputs, &field("inputs"), 0),
                count_or(self.outputs, &field("outputs"), 0),
            )
    }
}

impl ConnectionRecord {
    fn into_connection(self, context: &str, nodes: &NodeStore) -> Option<Connection> {
        let endpoint = |node: Option<Count>, node_key: &str, slot: Option<Count>, slot_key: &str, kind| {
            let Some(node) = node.and_then(Count::get).and_then(NodeId::new) else {
                log::warn!("{context}.{node_key}: missing or not a 1-based node index");
                return None;
            };
            let Some(slot) = slot.and_then(Count::get).filter(|s| *s > 0) else {
                log::warn!("{context}.{slot_key}: missing or not a 1-based slot index");
                return None;
            };
            let c = ConnectorRef::new(node, kind, slot);
            if !nodes.has_connector(c) {
                log::warn!("{context}: connector {c} does not exist");
                return None;
            }
            Some(c)
        };

        let from = endpoint(self.from_node, "from_node", self.from_output, "from_output", ConnectorKind::Output)?;
        let to = endpoint(self.to_node, "to_node", self.to_input, "to_input", ConnectorKind::Input)?;
        Some(Connection::new(from.node, from.slot, to.node, to.slot))
    }
}

fn nodes_from(records: Option<Vec<Option<NodeRecord>>>) -> NodeStore {
    let Some(records) = records else {
        log::warn!("document has no nodes");
        return NodeStore::default();
    };

    let nodes = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            let context = format!("nodes[{}]", i + 1);
            // Skipping would renumber later nodes; keep the slot with defaults.
            let record = record.unwrap_or_else(|| {
                log::warn!("{context}: not a table; using defaults");
                NodeRecord::default()
            });
            record.into_node(&context)
        })
        .collect();
    NodeStore::new(nodes)
}

fn connections_from(records: Option<Vec<Option<ConnectionRecord>>>, nodes: &NodeStore) -> ConnectionStore {
    let mut store = ConnectionStore::new();
    for (i, record) in records.into_iter().flatten().enumerate() {
        let context = format!("connections[{}]", i + 1);
        let Some(record) = record else {
            log::warn!("{context}: not a table; skipped");
            continue;
        };
        match record.into_connection(&context, nodes) {
            Some(c) => {
                if !store.add(c) {
                    log::warn!("{context}: self-loop on node {}; skipped", c.from_node);
                }
            }
            None => log::warn!("{context}: invalid record; skipped"),
        }
    }
    store
}

#[cfg(test)]
mod tests {
    use crate::document::{Document, Settings};
    use crate::graph::{Connection, NodeId};
    use nodeweave_engine::coords::Vec2;
    use nodeweave_engine::paint::Color;

    fn id(n: u32) -> NodeId {
        NodeId::new(n).unwrap()
    }

    fn parse(src: &str) -> Document {
        Document::from_toml_str(src).unwrap()
    }

    #[test]
    fn empty_document_uses_defaults() {
        let doc = parse("");
        assert_eq!(doc.settings, Settings::default());
        assert_eq!(doc.camera.scale(), 1.0);
        assert!(doc.nodes.is_empty());
        assert!(doc.connections.is_empty());
    }

    #[test]
    fn full_document_parses() {
        let doc = parse(
            r#"
            [config]
            window_title = "Graph"
            window_width = 1024
            window_height = 768
            font_path = "font.ttf"
            font_size = 18
            text = "hi"

            [config.camera]
            x = -10
            y = 20.5
            scale = 2.0

            [[config.nodes]]
            x = 400.0
            y = 300.0
            size = 100.0
            r = 0.0
            g = 1.0
            b = 0.0
            text = "A"
            inputs = 1
            outputs = 2

            [[config.nodes]]
            x = 700
            y = 300
            inputs = 1

            [[connections]]
            from_node = 1
            from_output = 2
            to_node = 2
            to_input = 1
            "#,
        );

        assert_eq!(doc.settings.window_title, "Graph");
        assert_eq!((doc.settings.window_width, doc.settings.window_height), (1024, 768));
        assert_eq!(doc.settings.font_size, 18.0);
        assert_eq!(doc.camera.origin(), Vec2::new(-10.0, 20.5));
        assert_eq!(doc.camera.scale(), 2.0);

        let a = doc.nodes.get(id(1)).unwrap();
        assert_eq!(a.text, "A");
        assert_eq!(a.color, Color::opaque(0.0, 1.0, 0.0));
        assert_eq!((a.inputs, a.outputs), (1, 2));

        let b = doc.nodes.get(id(2)).unwrap();
        assert_eq!(b.center, Vec2::new(700.0, 300.0));
        assert_eq!(b.size, 100.0);
        assert_eq!(b.color, Color::opaque(1.0, 0.0, 0.0));

        assert_eq!(doc.connections.as_slice(), &[Connection::new(id(1), 2, id(2), 1)]);
    }

    #[test]
    fn top_level_nodes_are_accepted() {
        let doc = parse(
            r#"
            [[nodes]]
            x = 1
            y = 2
            "#,
        );
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes.get(id(1)).unwrap().center, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn lenient_numbers_and_bad_values_default() {
        let doc = parse(
            r#"
            [config]
            window_width = 640.9
            window_height = "tall"
            font_size = -3

            [config.camera]
            scale = 0

            [[config.nodes]]
            size = -5
            inputs = 2.7
            outputs = -1
            x = "left"
            "#,
        );

        assert_eq!(doc.settings.window_width, 640);
        assert_eq!(doc.settings.window_height, 600);
        assert_eq!(doc.settings.font_size, 24.0);
        assert_eq!(doc.camera.scale(), 1.0);

        let n = doc.nodes.get(id(1)).unwrap();
        assert_eq!(n.size, 100.0);
        assert_eq!((n.inputs, n.outputs), (2, 0));
        assert_eq!(n.center.x, 400.0);
    }

    #[test]
    fn invalid_connections_are_skipped() {
        let doc = parse(
            r#"
            [[nodes]]
            outputs = 1
            inputs = 1
            [[nodes]]
            inputs = 1

            [[connections]]      # valid
            from_node = 1
            from_output = 1
            to_node = 2
            to_input = 1

            [[connections]]      # self-loop
            from_node = 1
            from_output = 1
            to_node = 1
            to_input = 1

            [[connections]]      # missing field
            from_node = 1
            to_node = 2
            to_input = 1

            [[connections]]      # no such node
            from_node = 1
            from_output = 1
            to_node = 9
            to_input = 1

            [[connections]]      # no such slot
            from_node = 1
            from_output = 2
            to_node = 2
            to_input = 1

            [[connections]]      # zero index
            from_node = 0
            from_output = 1
            to_node = 2
            to_input = 1
            "#,
        );

        assert_eq!(doc.connections.as_slice(), &[Connection::new(id(1), 1, id(2), 1)]);
    }

    #[test]
    fn non_table_node_keeps_its_number() {
        let doc = parse(
            r#"
            nodes = ["oops", { x = 10, y = 20, inputs = 1 }]

            [[connections]]
            from_node = 1
            from_output = 1
            to_node = 2
            to_input = 1
            "#,
        );

        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes.get(id(1)).unwrap().center, Vec2::new(400.0, 300.0));
        assert_eq!(doc.nodes.get(id(2)).unwrap().center, Vec2::new(10.0, 20.0));
        // Node 1 has no outputs, so the record is dropped rather than misrouted.
        assert!(doc.connections.is_empty());
    }

    #[test]
    fn mistyped_tables_fall_back_to_defaults() {
        let doc = parse(
            r#"
            config = 3
            connections = "none"
            "#,
        );
        assert_eq!(doc.settings, Settings::default());
        assert_eq!(doc.camera.scale(), 1.0);
        assert!(doc.connections.is_empty());
    }

    #[test]
    fn nested_lists_win_over_top_level() {
        let doc = parse(
            r#"
            [[nodes]]
            x = 1
            [[nodes]]
            x = 2

            [[config.nodes]]
            x = 5
            "#,
        );
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes.get(id(1)).unwrap().center.x, 5.0);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = Document::from_toml_str("[config\nx = ").unwrap_err();
        assert!(err.to_string().starts_with("document is not valid TOML"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Document::load("/definitely/not/here/graph.toml").unwrap_err();
        assert!(matches!(err, crate::document::DocumentError::Io { .. }));
    }
}
