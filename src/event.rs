use crate::NodeType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A graph event with timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEvent {
    pub timestamp: DateTime<Utc>,
    pub event: EventType,
}

impl GraphEvent {
    /// Create a new event with the current timestamp
    pub fn new(event: EventType) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }

    /// Create a new event with a specific timestamp
    pub fn with_timestamp(timestamp: DateTime<Utc>, event: EventType) -> Self {
        Self { timestamp, event }
    }
}

/// Types of events that can occur in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventType {
    NodeAdded {
        id: String,
        x: f32,
        y: f32,
    },

    NodeRemoved {
        id: String,
        /// Neighbors whose connection lists were purged along with the node
        purged_from: Vec<String>,
    },

    NodeMoved {
        id: String,
        x: f32,
        y: f32,
    },

    NodeRenamed {
        old_id: String,
        new_id: String,
    },

    NodeRetyped {
        id: String,
        old_type: NodeType,
        new_type: NodeType,
    },

    GroupAssigned {
        id: String,
        group_id: Option<i32>,
    },

    ConnectionAdded {
        from: String,
        to: String,
    },

    ConnectionRemoved {
        from: String,
        to: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = GraphEvent::new(EventType::NodeAdded {
            id: "w0".to_string(),
            x: 100.0,
            y: 100.0,
        });

        assert!(event.timestamp <= Utc::now());
    }

    #[test]
    fn test_event_serialization() {
        let event = GraphEvent::new(EventType::ConnectionAdded {
            from: "w0".to_string(),
            to: "m0".to_string(),
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: GraphEvent = serde_json::from_str(&json).unwrap();

        match (&event.event, &deserialized.event) {
            (
                EventType::ConnectionAdded { from: f1, to: t1 },
                EventType::ConnectionAdded { from: f2, to: t2 },
            ) => {
                assert_eq!(f1, f2);
                assert_eq!(t1, t2);
            }
            _ => panic!("Event type mismatch"),
        }
    }
}
