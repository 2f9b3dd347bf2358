use crate::{EventType, GraphEvent, Node, NodeType, Point};

/// World-space bounding box over node positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Extent of a graph with no nodes
    pub const EMPTY: Bounds = Bounds {
        min_x: 0.0,
        max_x: 0.0,
        min_y: 0.0,
        max_y: 0.0,
    };

    /// Grow the box by `margin` world units on every side
    pub fn padded(&self, margin: f32) -> Bounds {
        Bounds {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_y: self.min_y - margin,
            max_y: self.max_y + margin,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// The skill tree: all nodes and their mirrored connections
#[derive(Debug, Clone, Default)]
pub struct SkillGraph {
    /// Nodes in insertion order. Order is meaningful: it is the save-file
    /// line order and the lookup scan order.
    nodes: Vec<Node>,

    /// Event log for history tracking
    events: Vec<GraphEvent>,
}

impl SkillGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Build a graph from already-decoded nodes without logging events
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            events: Vec::new(),
        }
    }

    /// The fixed starter tree used when no save file exists
    pub fn seed() -> Self {
        let mut graph = Self::new();
        graph.add_node(Node::new("w0", 100.0, 100.0));
        graph.add_node(Node::new("m0", 300.0, 200.0));
        graph.add_node(Node::new("r0", 200.0, 400.0));
        graph.add_connection("w0", "m0");
        graph.add_connection("m0", "r0");
        graph
    }

    // ========== Lookup ==========

    /// Find a node by id. Linear scan, first match wins.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Mutable lookup by id, first match wins
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of undirected edges with both endpoints present
    pub fn connection_count(&self) -> usize {
        let mirrored: usize = self
            .nodes
            .iter()
            .map(|n| n.connections.iter().filter(|c| self.contains(c)).count())
            .sum();
        mirrored / 2
    }

    // ========== Node operations ==========

    /// Append a node. Id uniqueness is the caller's responsibility.
    pub fn add_node(&mut self, node: Node) {
        self.log_event(EventType::NodeAdded {
            id: node.id.clone(),
            x: node.x,
            y: node.y,
        });
        self.nodes.push(node);
    }

    /// Remove a node and purge its id from every neighbor list, keeping
    /// connection symmetry intact. Returns false for an unknown id.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(index) = self.nodes.iter().position(|n| n.id == id) else {
            return false;
        };
        self.nodes.remove(index);

        let mut purged_from = Vec::new();
        for node in &mut self.nodes {
            let before = node.connections.len();
            node.connections.retain(|c| c != id);
            if node.connections.len() != before {
                purged_from.push(node.id.clone());
            }
        }

        self.log_event(EventType::NodeRemoved {
            id: id.to_string(),
            purged_from,
        });
        true
    }

    /// Update a node's position without logging. Called on every pointer
    /// move during a drag; the drop point is recorded separately.
    pub fn move_node(&mut self, id: &str, pos: Point) -> bool {
        match self.find_mut(id) {
            Some(node) => {
                node.set_position(pos);
                true
            }
            None => false,
        }
    }

    /// Log the node's current position, marking the end of a drag
    pub fn record_node_moved(&mut self, id: &str) {
        if let Some(node) = self.find(id) {
            let (id, x, y) = (node.id.clone(), node.x, node.y);
            self.log_event(EventType::NodeMoved { id, x, y });
        }
    }

    /// Change a node's id. Neighbor lists still hold the old id; those
    /// entries become dangling and are surfaced by validation.
    pub fn rename_node(&mut self, old_id: &str, new_id: &str) -> bool {
        if old_id == new_id {
            return true;
        }
        match self.find_mut(old_id) {
            Some(node) => {
                node.id = new_id.to_string();
                self.log_event(EventType::NodeRenamed {
                    old_id: old_id.to_string(),
                    new_id: new_id.to_string(),
                });
                true
            }
            None => false,
        }
    }

    pub fn set_node_type(&mut self, id: &str, node_type: NodeType) -> bool {
        match self.find_mut(id) {
            Some(node) => {
                let old_type = node.node_type;
                if old_type != node_type {
                    node.node_type = node_type;
                    self.log_event(EventType::NodeRetyped {
                        id: id.to_string(),
                        old_type,
                        new_type: node_type,
                    });
                }
                true
            }
            None => false,
        }
    }

    pub fn set_group(&mut self, id: &str, group_id: Option<i32>) -> bool {
        match self.find_mut(id) {
            Some(node) => {
                if node.group_id != group_id {
                    node.group_id = group_id;
                    self.log_event(EventType::GroupAssigned {
                        id: id.to_string(),
                        group_id,
                    });
                }
                true
            }
            None => false,
        }
    }

    // ========== Connection operations ==========

    /// Insert the mirrored pair of connection entries. Silent no-op when
    /// either id is unresolved or the ids are equal; idempotent when the
    /// edge already exists.
    pub fn add_connection(&mut self, from: &str, to: &str) {
        if from == to || !self.contains(from) || !self.contains(to) {
            return;
        }

        let mut inserted = false;
        if let Some(node) = self.find_mut(from) {
            if !node.connects_to(to) {
                node.connections.push(to.to_string());
                inserted = true;
            }
        }
        if let Some(node) = self.find_mut(to) {
            if !node.connects_to(from) {
                node.connections.push(from.to_string());
                inserted = true;
            }
        }

        if inserted {
            self.log_event(EventType::ConnectionAdded {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }

    /// Remove the mirrored pair of connection entries. Both endpoints must
    /// resolve before either side is touched; removing a non-edge is a
    /// no-op on both sides.
    pub fn remove_connection(&mut self, from: &str, to: &str) {
        if !self.contains(from) || !self.contains(to) {
            return;
        }

        let mut removed = false;
        if let Some(node) = self.find_mut(from) {
            let before = node.connections.len();
            node.connections.retain(|c| c != to);
            removed |= node.connections.len() != before;
        }
        if let Some(node) = self.find_mut(to) {
            let before = node.connections.len();
            node.connections.retain(|c| c != from);
            removed |= node.connections.len() != before;
        }

        if removed {
            self.log_event(EventType::ConnectionRemoved {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }

    // ========== Extent ==========

    /// Bounding box over node positions. The empty graph yields
    /// `Bounds::EMPTY` so extent consumers stay total.
    pub fn extent_bounds(&self) -> Bounds {
        if self.nodes.is_empty() {
            return Bounds::EMPTY;
        }

        let mut bounds = Bounds {
            min_x: f32::MAX,
            max_x: f32::MIN,
            min_y: f32::MAX,
            max_y: f32::MIN,
        };
        for node in &self.nodes {
            bounds.min_x = bounds.min_x.min(node.x);
            bounds.max_x = bounds.max_x.max(node.x);
            bounds.min_y = bounds.min_y.min(node.y);
            bounds.max_y = bounds.max_y.max(node.y);
        }
        bounds
    }

    /// Topmost node whose box contains the world point. Later nodes draw
    /// above earlier ones, so scan back to front.
    pub fn node_at(&self, point: Point) -> Option<&Node> {
        self.nodes.iter().rev().find(|n| n.contains_point(point))
    }

    // ========== Event logging ==========

    fn log_event(&mut self, event: EventType) {
        self.events.push(GraphEvent::new(event));
    }

    /// Events accumulated since the last drain
    pub fn events(&self) -> &[GraphEvent] {
        &self.events
    }

    /// Hand over the accumulated events, leaving the log empty
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}
