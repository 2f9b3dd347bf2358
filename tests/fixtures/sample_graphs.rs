// Helper functions to generate test trees with various configurations

use skill_tree_editor::{Node, NodeType, SkillGraph};

/// A small tree spanning all three node types and a group tag
pub fn grouped_tree() -> SkillGraph {
    let mut graph = SkillGraph::new();

    let mut warrior = Node::new("warrior", 100.0, 100.0);
    warrior.group_id = Some(1);
    graph.add_node(warrior);

    let mut mastery = Node::new("blade_mastery", 300.0, 150.0);
    mastery.node_type = NodeType::Mastery;
    mastery.group_id = Some(1);
    graph.add_node(mastery);

    let mut stat = Node::new("strength", 200.0, 350.0);
    stat.node_type = NodeType::Stat;
    graph.add_node(stat);

    graph.add_connection("warrior", "blade_mastery");
    graph.add_connection("blade_mastery", "strength");
    graph.clear_events();
    graph
}

/// A tree whose first node references an id that exists nowhere
pub fn tree_with_dangling_ref() -> SkillGraph {
    let mut graph = grouped_tree();
    graph
        .find_mut("warrior")
        .expect("fixture node")
        .connections
        .push("removed_long_ago".to_string());
    graph.clear_events();
    graph
}

/// Save-file text exercising the reader's tolerance rules: a short line
/// to skip, a bad group id, and an unknown node type
pub fn save_file_text_with_issues() -> &'static str {
    "short|1\n\
     a|10|20|b|x9|Mastery\n\
     b|30|40|a||Legendary\n"
}
