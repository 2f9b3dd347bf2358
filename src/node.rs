use serde::{Deserialize, Serialize};

/// Side length of a node's bounding box in world units.
pub const NODE_SIZE: f32 = 50.0;

/// A point in either world or screen space, depending on context.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A node in the skill tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Unique identifier, the only cross-reference key
    pub id: String,

    /// World-space X of the top-left corner of the node's box
    pub x: f32,

    /// World-space Y of the top-left corner of the node's box
    pub y: f32,

    /// Neighbor ids. Logically a set; kept in insertion order so the
    /// save file round-trips byte-for-byte.
    pub connections: Vec<String>,

    /// Optional display group tag
    pub group_id: Option<i32>,

    /// Shape/role of the node
    pub node_type: NodeType,
}

impl Node {
    /// Create a new ungrouped Default node at the given world position
    pub fn new(id: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            connections: Vec::new(),
            group_id: None,
            node_type: NodeType::Default,
        }
    }

    /// Top-left corner of the node's bounding box
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, pos: Point) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Center of the node's bounding box, where edges attach
    pub fn center(&self) -> Point {
        Point::new(self.x + NODE_SIZE / 2.0, self.y + NODE_SIZE / 2.0)
    }

    /// Check if a world-space point falls inside the node's box
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + NODE_SIZE
            && point.y >= self.y
            && point.y <= self.y + NODE_SIZE
    }

    /// Check whether this node lists the given id as a neighbor
    pub fn connects_to(&self, id: &str) -> bool {
        self.connections.iter().any(|c| c == id)
    }

    /// Label shown under the node on the canvas
    pub fn display_label(&self) -> String {
        match self.group_id {
            Some(group) => format!("{} ({})", self.id, group),
            None => self.id.clone(),
        }
    }
}

/// Node type determines shape and emphasis on the canvas
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum NodeType {
    #[default]
    Default,
    Mastery,
    Stat,
}

impl NodeType {
    /// Literal used in the save file
    pub fn as_wire(&self) -> &'static str {
        match self {
            NodeType::Default => "Default",
            NodeType::Mastery => "Mastery",
            NodeType::Stat => "Stat",
        }
    }

    /// Parse a save-file literal. Unrecognized values map to `Default`
    /// so newer files still open.
    pub fn from_wire(value: &str) -> Self {
        match value {
            "Mastery" => NodeType::Mastery,
            "Stat" => NodeType::Stat,
            _ => NodeType::Default,
        }
    }

    pub const ALL: [NodeType; 3] = [NodeType::Default, NodeType::Mastery, NodeType::Stat];
}
