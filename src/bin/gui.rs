use eframe::egui;
use skill_tree_editor::SkillTreeApp;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("Skill Tree Editor"),
        ..Default::default()
    };

    eframe::run_native(
        "Skill Tree Editor",
        options,
        Box::new(|_cc| Ok(Box::new(SkillTreeApp::new()))),
    )
}
