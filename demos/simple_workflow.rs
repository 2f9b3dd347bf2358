// Scripted tour of the skill tree model: build a small tree, wire it up,
// move the camera around it, and round-trip the save format.

use skill_tree_editor::{
    storage, Camera, Node, NodeType, Point, SkillGraph, ValidatedGraph,
};

fn main() {
    println!("=== Skill Tree Workflow Example ===\n");

    // Step 1: Build a tree
    println!("Step 1: Building the tree...");
    let mut graph = SkillGraph::new();

    graph.add_node(Node::new("warrior", 100.0, 100.0));

    let mut blade = Node::new("blade_mastery", 320.0, 140.0);
    blade.node_type = NodeType::Mastery;
    graph.add_node(blade);

    let mut strength = Node::new("strength", 210.0, 330.0);
    strength.node_type = NodeType::Stat;
    strength.group_id = Some(1);
    graph.add_node(strength);

    graph.add_connection("warrior", "blade_mastery");
    graph.add_connection("blade_mastery", "strength");
    println!(
        "  ✓ {} nodes, {} connections",
        graph.node_count(),
        graph.connection_count()
    );

    // Step 2: Fit the camera and look at a node through it
    println!("\nStep 2: Fitting the camera...");
    let mut camera = Camera::new();
    camera.fit_to_graph(&graph);
    println!("  ✓ Canvas {:?} world units", camera.canvas_size());

    let center = graph.find("warrior").expect("just added").center();
    let on_screen = camera.world_to_screen(center);
    println!(
        "  ✓ warrior center ({}, {}) appears at screen ({}, {})",
        center.x, center.y, on_screen.x, on_screen.y
    );

    camera.zoom_by(1.1);
    camera.pan_by_screen_delta(Point::new(-40.0, 0.0));
    println!("  ✓ After a zoom step and a 40px pan: scale {:.2}", camera.scale());

    // Step 3: Check data quality
    println!("\nStep 3: Validating...");
    let report = graph.validate();
    println!(
        "  ✓ {} errors, {} warnings, {} notes",
        report.errors().len(),
        report.warnings().len(),
        report.info().len()
    );

    // Step 4: Round-trip the save format
    println!("\nStep 4: Round-tripping the save format...");
    let encoded = storage::encode_graph(&graph);
    for line in encoded.lines() {
        println!("  | {}", line);
    }

    let (decoded, issues) = storage::decode_graph(&encoded).expect("own output parses");
    assert_eq!(decoded.nodes(), graph.nodes());
    println!("  ✓ Decoded {} nodes, {} issues", decoded.node_count(), issues.len());

    println!("\n=== Workflow complete ===");
}
