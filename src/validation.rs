use crate::SkillGraph;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Validation severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationSeverity {
    Info,
    Warning,
    Error,
}

/// Validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: ValidationSeverity,
    pub message: String,
    pub affected_nodes: Vec<String>,
    pub issue_type: ValidationIssueType,
}

/// Types of validation issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssueType {
    /// Two nodes share an id; link resolution is ambiguous
    DuplicateId,

    /// One side of a connection pair is missing its mirror entry
    AsymmetricConnection,

    /// A connection entry references an id not present in the graph
    DanglingConnection,

    /// Node has no connections at all
    IsolatedNode,
}

/// Complete validation result
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Warning)
    }

    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Error)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Warning)
            .collect()
    }

    pub fn info(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == ValidationSeverity::Info)
            .collect()
    }

    /// Validation passed when nothing rose to Error
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }
}

/// Data-quality checks over a skill graph. Reporting only: nothing here
/// blocks editing or saving.
pub struct Validator;

impl Validator {
    pub fn validate(graph: &SkillGraph) -> ValidationResult {
        let mut result = ValidationResult::new();

        Self::check_duplicate_ids(graph, &mut result);
        Self::check_connection_integrity(graph, &mut result);
        Self::check_isolated_nodes(graph, &mut result);

        result
    }

    fn check_duplicate_ids(graph: &SkillGraph, result: &mut ValidationResult) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for node in graph.nodes() {
            *counts.entry(node.id.as_str()).or_default() += 1;
        }

        let mut duplicates: Vec<&str> = counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(id, _)| id)
            .collect();
        duplicates.sort_unstable();

        for id in duplicates {
            result.add_issue(ValidationIssue {
                severity: ValidationSeverity::Warning,
                message: format!("Id {:?} is used by more than one node; links resolve to the first match.", id),
                affected_nodes: vec![id.to_string()],
                issue_type: ValidationIssueType::DuplicateId,
            });
        }
    }

    fn check_connection_integrity(graph: &SkillGraph, result: &mut ValidationResult) {
        let mut seen_asymmetric: HashSet<(String, String)> = HashSet::new();

        for node in graph.nodes() {
            for conn in &node.connections {
                match graph.find(conn) {
                    None => {
                        result.add_issue(ValidationIssue {
                            severity: ValidationSeverity::Warning,
                            message: format!(
                                "Node {:?} references missing node {:?}; the connection is never drawn.",
                                node.id, conn
                            ),
                            affected_nodes: vec![node.id.clone()],
                            issue_type: ValidationIssueType::DanglingConnection,
                        });
                    }
                    Some(neighbor) => {
                        if !neighbor.connects_to(&node.id) {
                            // Report each broken pair once, whichever
                            // side we walk first
                            let key = if node.id <= *conn {
                                (node.id.clone(), conn.clone())
                            } else {
                                (conn.clone(), node.id.clone())
                            };
                            if seen_asymmetric.insert(key) {
                                result.add_issue(ValidationIssue {
                                    severity: ValidationSeverity::Error,
                                    message: format!(
                                        "Connection {:?} → {:?} has no mirror entry.",
                                        node.id, conn
                                    ),
                                    affected_nodes: vec![node.id.clone(), conn.clone()],
                                    issue_type: ValidationIssueType::AsymmetricConnection,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    fn check_isolated_nodes(graph: &SkillGraph, result: &mut ValidationResult) {
        for node in graph.nodes() {
            if node.connections.is_empty() {
                result.add_issue(ValidationIssue {
                    severity: ValidationSeverity::Info,
                    message: format!("Node {:?} has no connections.", node.id),
                    affected_nodes: vec![node.id.clone()],
                    issue_type: ValidationIssueType::IsolatedNode,
                });
            }
        }
    }
}

/// Extension trait for SkillGraph to add validation
pub trait ValidatedGraph {
    fn validate(&self) -> ValidationResult;

    /// Highest severity per affected node id
    fn nodes_with_issues(&self, result: &ValidationResult) -> HashMap<String, ValidationSeverity>;
}

impl ValidatedGraph for SkillGraph {
    fn validate(&self) -> ValidationResult {
        Validator::validate(self)
    }

    fn nodes_with_issues(&self, result: &ValidationResult) -> HashMap<String, ValidationSeverity> {
        let mut nodes = HashMap::new();

        for issue in &result.issues {
            for id in &issue.affected_nodes {
                nodes
                    .entry(id.clone())
                    .and_modify(|severity| {
                        if issue.severity as u8 > *severity as u8 {
                            *severity = issue.severity;
                        }
                    })
                    .or_insert(issue.severity);
            }
        }

        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;

    #[test]
    fn test_seed_graph_is_valid() {
        let result = Validator::validate(&SkillGraph::seed());

        assert!(result.is_valid());
        assert!(!result.has_warnings());
        assert!(result.info().is_empty());
    }

    #[test]
    fn test_duplicate_id_warning() {
        let mut graph = SkillGraph::new();
        graph.add_node(Node::new("dup", 0.0, 0.0));
        graph.add_node(Node::new("dup", 10.0, 10.0));

        let result = Validator::validate(&graph);
        assert!(result.has_warnings());
        assert!(result
            .warnings()
            .iter()
            .any(|w| w.issue_type == ValidationIssueType::DuplicateId));
    }

    #[test]
    fn test_dangling_connection_warning() {
        let mut graph = SkillGraph::seed();
        graph.find_mut("w0").unwrap().connections.push("ghost".to_string());

        let result = Validator::validate(&graph);
        assert!(result.is_valid());
        assert!(result
            .warnings()
            .iter()
            .any(|w| w.issue_type == ValidationIssueType::DanglingConnection));
    }

    #[test]
    fn test_asymmetric_connection_error() {
        let mut graph = SkillGraph::seed();
        // Break the mirror by hand
        graph
            .find_mut("m0")
            .unwrap()
            .connections
            .retain(|c| c != "w0");

        let result = Validator::validate(&graph);
        assert!(!result.is_valid());

        let errors = result.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].issue_type, ValidationIssueType::AsymmetricConnection);
    }

    #[test]
    fn test_isolated_node_info() {
        let mut graph = SkillGraph::seed();
        graph.add_node(Node::new("loner", 900.0, 900.0));

        let result = Validator::validate(&graph);
        assert!(result.is_valid());
        assert!(result
            .info()
            .iter()
            .any(|i| i.issue_type == ValidationIssueType::IsolatedNode));
    }

    #[test]
    fn test_nodes_with_issues_keeps_highest_severity() {
        let mut graph = SkillGraph::seed();
        // w0: dangling ref (warning) plus a broken mirror (error)
        graph.find_mut("w0").unwrap().connections.push("ghost".to_string());
        graph
            .find_mut("m0")
            .unwrap()
            .connections
            .retain(|c| c != "w0");

        let result = graph.validate();
        let flagged = graph.nodes_with_issues(&result);

        assert_eq!(flagged.get("w0"), Some(&ValidationSeverity::Error));
    }
}
