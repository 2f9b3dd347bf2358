use skill_tree_editor::{
    storage, Camera, InteractionController, Point, PointerButton, SkillGraph,
};

fn main() {
    println!("Skill Tree Editor - Core Model Walkthrough");
    println!("==========================================\n");

    // Start from the seed tree used when no save file exists
    let mut graph = SkillGraph::seed();
    println!("✓ Seeded starter tree");
    println!("  Nodes: {}", graph.node_count());
    println!("  Connections: {}", graph.connection_count());

    // Close the triangle, then change our mind
    graph.add_connection("w0", "r0");
    println!("\n✓ Connected w0 – r0");
    println!("  Connections: {}", graph.connection_count());

    graph.remove_connection("w0", "r0");
    println!("\n✓ Disconnected w0 – r0 again");
    println!("  Connections: {}", graph.connection_count());

    // Drive a node drag through the interaction state machine the same
    // way the GUI does: press, move, release
    let camera = {
        let mut camera = Camera::new();
        camera.fit_to_graph(&graph);
        camera
    };
    let mut controller = InteractionController::new();

    let press = camera.world_to_screen(Point::new(110.0, 120.0));
    controller.pointer_pressed(&mut graph, &camera, press, PointerButton::Primary);
    let mut moving_camera = camera.clone();
    controller.pointer_moved(
        &mut graph,
        &mut moving_camera,
        press + Point::new(150.0, 50.0),
    );
    controller.pointer_released(&mut graph, PointerButton::Primary);

    let w0 = graph.find("w0").expect("seed node w0 exists");
    println!("\n✓ Dragged w0 to ({}, {})", w0.x, w0.y);

    // Round-trip the tree through the save-file codec
    let encoded = storage::encode_graph(&graph);
    println!("\n📄 Save file contents:");
    for line in encoded.lines() {
        println!("  {}", line);
    }

    let (decoded, issues) = storage::decode_graph(&encoded).expect("round trip");
    println!("\n✓ Decoded {} nodes back ({} issues)", decoded.node_count(), issues.len());
    println!("  Events logged this session: {}", graph.events().len());

    println!("\nRun the `gui` binary for the interactive editor.\n");
}
