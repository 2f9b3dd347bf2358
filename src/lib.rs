// Skill Tree Editor - Core Library

pub mod camera;
pub mod event;
pub mod graph;
pub mod interaction;
pub mod node;
pub mod storage;
pub mod ui;
pub mod validation;

// Re-export main types for convenience
pub use camera::Camera;
pub use event::{EventType, GraphEvent};
pub use graph::{Bounds, SkillGraph};
pub use interaction::{
    ConnectionEditMode, DragState, InteractionController, PendingConnectionEdit, PointerButton,
    PressOutcome,
};
pub use node::{Node, NodeType, Point, NODE_SIZE};
pub use storage::{LoadIssue, LoadResult, LoadSource, SaveFile};
pub use ui::SkillTreeApp;
pub use validation::{ValidatedGraph, ValidationIssue, ValidationResult, ValidationSeverity};
