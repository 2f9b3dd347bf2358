use crate::{GraphEvent, Node, NodeType, SkillGraph};
use anyhow::{Context, Result};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default save file name in the working directory
pub const SAVE_FILE_NAME: &str = "skilltree.txt";

/// Recoverable conditions encountered while decoding a save file.
/// None of these abort the load; the host decides how to surface them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    /// Line had fewer than 3 `|`-separated fields and was skipped
    SkippedLine { line: usize },

    /// Group field failed integer parsing; the node loaded ungrouped
    BadGroupId { line: usize, raw: String },

    /// Unrecognized node-type literal; the node loaded as Default
    UnknownNodeType { line: usize, raw: String },
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadIssue::SkippedLine { line } => {
                write!(f, "line {}: too few fields, skipped", line)
            }
            LoadIssue::BadGroupId { line, raw } => {
                write!(f, "line {}: bad group id {:?}, node left ungrouped", line, raw)
            }
            LoadIssue::UnknownNodeType { line, raw } => {
                write!(f, "line {}: unknown node type {:?}, using Default", line, raw)
            }
        }
    }
}

/// Where the loaded graph came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Decoded from the save file
    File,

    /// No save file on disk; seed data generated
    Seeded,

    /// The save file failed hard (I/O or numeric parse); seed data
    /// generated. Carries the user-visible reason.
    SeededAfterError(String),
}

/// Outcome of `SaveFile::load`. Loading never fails outright.
#[derive(Debug)]
pub struct LoadResult {
    pub graph: SkillGraph,
    pub issues: Vec<LoadIssue>,
    pub source: LoadSource,
}

/// Encode one node as a save-file line:
/// `id|x|y|connections|groupId|nodeType`
pub fn encode_node(node: &Node) -> String {
    let connections = node.connections.join(",");
    let group = node
        .group_id
        .map(|g| g.to_string())
        .unwrap_or_default();
    format!(
        "{}|{}|{}|{}|{}|{}",
        node.id,
        node.x,
        node.y,
        connections,
        group,
        node.node_type.as_wire()
    )
}

/// Encode the whole graph, one line per node in insertion order
pub fn encode_graph(graph: &SkillGraph) -> String {
    let mut out = String::new();
    for node in graph.nodes() {
        out.push_str(&encode_node(node));
        out.push('\n');
    }
    out
}

/// Decode save-file text into a graph.
///
/// Short lines, bad group ids, and unknown node types are tolerated and
/// reported as `LoadIssue`s. A malformed x/y coordinate is a hard error
/// that fails the whole load. Connection targets are not validated here;
/// dangling ids round-trip verbatim.
pub fn decode_graph(input: &str) -> Result<(SkillGraph, Vec<LoadIssue>)> {
    let mut nodes = Vec::new();
    let mut issues = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let parts: Vec<&str> = line.split('|').collect();
        if parts.len() < 3 {
            issues.push(LoadIssue::SkippedLine { line: line_no });
            continue;
        }

        let x: f32 = parts[1]
            .trim()
            .parse()
            .with_context(|| format!("line {}: bad x coordinate {:?}", line_no, parts[1]))?;
        let y: f32 = parts[2]
            .trim()
            .parse()
            .with_context(|| format!("line {}: bad y coordinate {:?}", line_no, parts[2]))?;

        let mut node = Node::new(parts[0], x, y);

        if parts.len() > 3 && !parts[3].is_empty() {
            for conn in parts[3].split(',') {
                if !conn.is_empty() {
                    node.connections.push(conn.to_string());
                }
            }
        }

        if parts.len() > 4 && !parts[4].is_empty() {
            match parts[4].trim().parse::<i32>() {
                Ok(group) => node.group_id = Some(group),
                Err(_) => issues.push(LoadIssue::BadGroupId {
                    line: line_no,
                    raw: parts[4].to_string(),
                }),
            }
        }

        if parts.len() > 5 && !parts[5].is_empty() {
            node.node_type = NodeType::from_wire(parts[5]);
            if node.node_type == NodeType::Default && parts[5] != "Default" {
                issues.push(LoadIssue::UnknownNodeType {
                    line: line_no,
                    raw: parts[5].to_string(),
                });
            }
        }

        nodes.push(node);
    }

    Ok((SkillGraph::from_nodes(nodes), issues))
}

/// Handle to the skill tree's save file and its event sidecar
pub struct SaveFile {
    path: PathBuf,
}

impl SaveFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The conventional `skilltree.txt` in the working directory
    pub fn default_location() -> Self {
        Self::new(SAVE_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Event log sidecar next to the save file
    pub fn events_path(&self) -> PathBuf {
        self.path.with_extension("events.jsonl")
    }

    /// Load the graph. Never fails: a missing file yields seed data, a
    /// hard error yields seed data plus the reason.
    pub fn load(&self) -> LoadResult {
        if !self.path.exists() {
            return LoadResult {
                graph: SkillGraph::seed(),
                issues: Vec::new(),
                source: LoadSource::Seeded,
            };
        }

        let attempt = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))
            .and_then(|text| decode_graph(&text));

        match attempt {
            Ok((graph, issues)) => LoadResult {
                graph,
                issues,
                source: LoadSource::File,
            },
            Err(err) => LoadResult {
                graph: SkillGraph::seed(),
                issues: Vec::new(),
                source: LoadSource::SeededAfterError(format!("{:#}", err)),
            },
        }
    }

    /// Write the whole graph. I/O errors propagate; in-memory state is
    /// the caller's and stays untouched.
    pub fn save(&self, graph: &SkillGraph) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("failed to create {}", self.path.display()))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(encode_graph(graph).as_bytes())
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", self.path.display()))?;
        Ok(())
    }

    /// Append drained graph events to the sidecar, one JSON object per line
    pub fn append_events(&self, events: &[GraphEvent]) -> Result<()> {
        if events.is_empty() {
            return Ok(());
        }

        let events_path = self.events_path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&events_path)
            .with_context(|| format!("failed to open {}", events_path.display()))?;
        let mut writer = BufWriter::new(file);

        for event in events {
            let json = serde_json::to_string(event)
                .with_context(|| format!("failed to serialize event for {}", events_path.display()))?;
            writeln!(writer, "{}", json)
                .with_context(|| format!("failed to write {}", events_path.display()))?;
        }

        writer
            .flush()
            .with_context(|| format!("failed to flush {}", events_path.display()))?;
        Ok(())
    }

    /// Read back the event sidecar. Empty lines are skipped.
    pub fn load_events(&self) -> Result<Vec<GraphEvent>> {
        let events_path = self.events_path();
        if !events_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&events_path)
            .with_context(|| format!("failed to open {}", events_path.display()))?;
        let reader = BufReader::new(file);

        let mut events = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line.with_context(|| {
                format!("failed to read line {} of {}", index + 1, events_path.display())
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let event: GraphEvent = serde_json::from_str(&line).with_context(|| {
                format!("failed to parse line {} of {}", index + 1, events_path.display())
            })?;
            events.push(event);
        }

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventType;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_encode_node_all_fields() {
        let mut node = Node::new("a1", 10.0, 20.5);
        node.connections = vec!["b2".to_string(), "c3".to_string()];
        node.group_id = Some(7);
        node.node_type = NodeType::Mastery;

        assert_eq!(encode_node(&node), "a1|10|20.5|b2,c3|7|Mastery");
    }

    #[test]
    fn test_encode_node_empty_fields() {
        let node = Node::new("solo", 1.0, 2.0);
        assert_eq!(encode_node(&node), "solo|1|2|||Default");
    }

    #[test]
    fn test_decode_single_line() {
        let (graph, issues) = decode_graph("A|10|20|B,C|5|Mastery\n").unwrap();

        assert!(issues.is_empty());
        let a = graph.find("A").unwrap();
        assert_eq!((a.x, a.y), (10.0, 20.0));
        assert_eq!(a.connections, vec!["B".to_string(), "C".to_string()]);
        assert_eq!(a.group_id, Some(5));
        assert_eq!(a.node_type, NodeType::Mastery);
    }

    #[test]
    fn test_dangling_connections_round_trip() {
        // B and C exist nowhere in the file; they load, never resolve,
        // and write back verbatim
        let input = "A|10|20|B,C|5|Mastery\n";
        let (graph, _) = decode_graph(input).unwrap();

        assert_eq!(graph.connection_count(), 0);
        assert_eq!(encode_graph(&graph), input);
    }

    #[test]
    fn test_short_line_skipped_rest_loads() {
        let (graph, issues) = decode_graph("X|1\nok|5|6|||Default\n").unwrap();

        assert_eq!(graph.node_count(), 1);
        assert!(graph.find("ok").is_some());
        assert_eq!(issues, vec![LoadIssue::SkippedLine { line: 1 }]);
    }

    #[test]
    fn test_bad_coordinate_fails_whole_load() {
        let result = decode_graph("good|1|2|||Default\nbad|oops|3|||Default\n");
        assert!(result.is_err());
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("line 2"), "unexpected error: {}", message);
    }

    #[test]
    fn test_bad_group_id_continues() {
        let (graph, issues) = decode_graph("a|1|2||notanint|Stat\n").unwrap();

        let a = graph.find("a").unwrap();
        assert_eq!(a.group_id, None);
        assert_eq!(a.node_type, NodeType::Stat);
        assert_eq!(
            issues,
            vec![LoadIssue::BadGroupId {
                line: 1,
                raw: "notanint".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_node_type_defaults() {
        let (graph, issues) = decode_graph("a|1|2|||Legendary\n").unwrap();

        assert_eq!(graph.find("a").unwrap().node_type, NodeType::Default);
        assert_eq!(
            issues,
            vec![LoadIssue::UnknownNodeType {
                line: 1,
                raw: "Legendary".to_string()
            }]
        );
    }

    #[test]
    fn test_missing_type_field_defaults_silently() {
        let (graph, issues) = decode_graph("a|1|2|b|3\n").unwrap();

        assert_eq!(graph.find("a").unwrap().node_type, NodeType::Default);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_seed_round_trip() {
        let graph = SkillGraph::seed();
        let encoded = encode_graph(&graph);

        assert_eq!(
            encoded,
            "w0|100|100|m0||Default\n\
             m0|300|200|w0,r0||Default\n\
             r0|200|400|m0||Default\n"
        );

        let (decoded, issues) = decode_graph(&encoded).unwrap();
        assert!(issues.is_empty());
        assert_eq!(decoded.nodes(), graph.nodes());
    }

    #[test]
    fn test_load_missing_file_seeds() {
        let temp_dir = TempDir::new().unwrap();
        let save_file = SaveFile::new(temp_dir.path().join(SAVE_FILE_NAME));

        let result = save_file.load();

        assert_eq!(result.source, LoadSource::Seeded);
        assert_eq!(result.graph.node_count(), 3);
        assert!(result.graph.find("w0").unwrap().connects_to("m0"));
        assert!(result.graph.find("m0").unwrap().connects_to("r0"));
        assert!(!result.graph.find("w0").unwrap().connects_to("r0"));
    }

    #[test]
    fn test_load_corrupt_file_seeds_with_reason() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(SAVE_FILE_NAME);
        std::fs::write(&path, "broken|NaNope|2|||Default\n").unwrap();

        let result = SaveFile::new(&path).load();

        match result.source {
            LoadSource::SeededAfterError(reason) => {
                assert!(reason.contains("line 1"), "reason: {}", reason);
            }
            other => panic!("expected SeededAfterError, got {:?}", other),
        }
        assert_eq!(result.graph.node_count(), 3);
    }

    #[test]
    fn test_save_load_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let save_file = SaveFile::new(temp_dir.path().join(SAVE_FILE_NAME));

        let mut graph = SkillGraph::seed();
        graph.set_group("m0", Some(2));
        graph.set_node_type("r0", NodeType::Stat);
        save_file.save(&graph).unwrap();

        let result = save_file.load();
        assert_eq!(result.source, LoadSource::File);
        assert!(result.issues.is_empty());
        assert_eq!(result.graph.nodes(), graph.nodes());
    }

    #[test]
    fn test_event_sidecar_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let save_file = SaveFile::new(temp_dir.path().join(SAVE_FILE_NAME));

        let mut graph = SkillGraph::seed();
        let events = graph.take_events();
        save_file.append_events(&events).unwrap();
        // A second save appends rather than truncating
        save_file
            .append_events(&[GraphEvent::new(EventType::ConnectionRemoved {
                from: "w0".to_string(),
                to: "m0".to_string(),
            })])
            .unwrap();

        let loaded = save_file.load_events().unwrap();
        assert_eq!(loaded.len(), events.len() + 1);
    }

    fn arbitrary_node() -> impl Strategy<Value = Node> {
        (
            "[a-z][a-z0-9]{0,7}",
            -10_000.0_f32..10_000.0,
            -10_000.0_f32..10_000.0,
            proptest::collection::vec("[a-z][a-z0-9]{0,7}", 0..4),
            proptest::option::of(-100_i32..100),
            prop_oneof![
                Just(NodeType::Default),
                Just(NodeType::Mastery),
                Just(NodeType::Stat)
            ],
        )
            .prop_map(|(id, x, y, connections, group_id, node_type)| {
                let mut node = Node::new(id, x, y);
                let mut seen = Vec::new();
                for conn in connections {
                    if !seen.contains(&conn) {
                        seen.push(conn);
                    }
                }
                node.connections = seen;
                node.group_id = group_id;
                node.node_type = node_type;
                node
            })
    }

    proptest! {
        #[test]
        fn prop_codec_round_trip(nodes in proptest::collection::vec(arbitrary_node(), 0..12)) {
            let graph = SkillGraph::from_nodes(nodes);
            let (decoded, issues) = decode_graph(&encode_graph(&graph)).unwrap();

            prop_assert!(issues.is_empty());
            prop_assert_eq!(decoded.nodes(), graph.nodes());
        }
    }
}
