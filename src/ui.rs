use crate::{
    camera::{MAX_SCALE, MIN_SCALE},
    storage::{LoadSource, SaveFile},
    validation::{ValidatedGraph, ValidationSeverity},
    Camera, ConnectionEditMode, DragState, InteractionController, Node, NodeType, Point,
    PointerButton, PressOutcome, SkillGraph, NODE_SIZE,
};
use egui::{epaint::PathShape, vec2, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke};
use std::collections::HashMap;

/// Main application state
pub struct SkillTreeApp {
    /// The skill tree being edited
    graph: SkillGraph,

    /// Viewport transform
    camera: Camera,

    /// Selection, drag, and connection-edit state machine
    controller: InteractionController,

    /// Save file handle
    save_file: SaveFile,

    /// Property-form text buffers
    form: NodeForm,

    /// Status message
    status_message: String,

    /// Whether node issues are computed and highlighted
    show_issues: bool,

    /// Highest issue severity per node id, recomputed when shown
    issue_flags: HashMap<String, ValidationSeverity>,
}

#[derive(Default)]
struct NodeForm {
    id: String,
    x: String,
    y: String,
    group: String,

    /// Node id whose values currently populate the buffers
    loaded_for: Option<String>,
}

impl NodeForm {
    fn clear(&mut self) {
        *self = NodeForm::default();
    }
}

impl Default for SkillTreeApp {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillTreeApp {
    /// Open the editor against `skilltree.txt` in the working directory
    pub fn new() -> Self {
        Self::with_save_file(SaveFile::default_location())
    }

    pub fn with_save_file(save_file: SaveFile) -> Self {
        let loaded = save_file.load();

        let status_message = match &loaded.source {
            LoadSource::File if loaded.issues.is_empty() => {
                format!("Loaded {} nodes from {}", loaded.graph.node_count(), save_file.path().display())
            }
            LoadSource::File => format!(
                "Loaded {} nodes from {} ({} line(s) had issues)",
                loaded.graph.node_count(),
                save_file.path().display(),
                loaded.issues.len()
            ),
            LoadSource::Seeded => "No save file found; starting with the sample tree".to_string(),
            LoadSource::SeededAfterError(reason) => {
                format!("⚠ Load failed: {}. Starting with the sample tree", reason)
            }
        };

        let mut graph = loaded.graph;
        graph.clear_events();

        let mut camera = Camera::new();
        camera.fit_to_graph(&graph);

        Self {
            graph,
            camera,
            controller: InteractionController::new(),
            save_file,
            form: NodeForm::default(),
            status_message,
            show_issues: false,
            issue_flags: HashMap::new(),
        }
    }

    /// Commit pending form edits, persist the tree, and re-derive the
    /// canvas extent. In-memory state survives a failed write.
    fn save_tree(&mut self) {
        if self.controller.selected_id().is_some() {
            self.controller
                .commit_node_edits(&mut self.graph, &self.form.id, &self.form.x, &self.form.y);
            // The id may have changed; refill from the node next frame
            self.form.loaded_for = None;
        }

        match self.save_file.save(&self.graph) {
            Ok(()) => {
                let events = self.graph.take_events();
                if let Err(e) = self.save_file.append_events(&events) {
                    self.status_message = format!("✓ Saved, but event log failed: {}", e);
                } else {
                    self.status_message =
                        format!("✓ Saved {} nodes to {}", self.graph.node_count(), self.save_file.path().display());
                }
                self.camera.fit_to_graph(&self.graph);
            }
            Err(e) => {
                self.status_message = format!("❌ Save failed: {}", e);
            }
        }
    }

    fn arm_connection_edit(&mut self, mode: ConnectionEditMode) {
        if self.controller.arm_connection_edit(mode) {
            self.status_message = match mode {
                ConnectionEditMode::Add => "Click a node to connect it to the selection".to_string(),
                ConnectionEditMode::Remove => {
                    "Click a node to disconnect it from the selection".to_string()
                }
            };
        } else {
            self.status_message = "⚠ Select a source node first".to_string();
        }
    }

    /// Render the entire UI
    fn render_ui(&mut self, ctx: &egui::Context) {
        // Space clears the selection (not while a text field has focus)
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) && !ctx.wants_keyboard_input() {
            self.controller.deselect();
            self.form.clear();
            self.status_message = "Selection cleared".to_string();
        }

        if self.show_issues {
            let result = self.graph.validate();
            self.issue_flags = self.graph.nodes_with_issues(&result);
        } else {
            self.issue_flags.clear();
        }

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("💾 Save").clicked() {
                    self.save_tree();
                }
                ui.separator();

                if ui.button("🔗 Add Connection").clicked() {
                    self.arm_connection_edit(ConnectionEditMode::Add);
                }
                if ui.button("✂ Remove Connection").clicked() {
                    self.arm_connection_edit(ConnectionEditMode::Remove);
                }
                if let Some(pending) = self.controller.pending_edit() {
                    let verb = match pending.mode {
                        ConnectionEditMode::Add => "connecting",
                        ConnectionEditMode::Remove => "disconnecting",
                    };
                    ui.label(format!("({} from {})", verb, pending.source_id));
                }
                ui.separator();

                ui.checkbox(&mut self.show_issues, "Highlight issues");
                ui.separator();

                ui.label(format!("Nodes: {}", self.graph.node_count()));
                ui.label(format!("Connections: {}", self.graph.connection_count()));
            });

            // Camera controls, two-way bound: sliders move the camera and
            // dragging the camera moves the sliders
            ui.horizontal(|ui| {
                let mut scale = self.camera.scale();
                if ui
                    .add(egui::Slider::new(&mut scale, MIN_SCALE..=MAX_SCALE).text("Zoom"))
                    .changed()
                {
                    self.camera.set_scale(scale);
                }

                let (canvas_w, canvas_h) = self.camera.canvas_size();
                let mut pan = self.camera.pan();
                let x_changed = ui
                    .add(egui::Slider::new(&mut pan.x, -canvas_w..=canvas_w).text("Camera X"))
                    .changed();
                let y_changed = ui
                    .add(egui::Slider::new(&mut pan.y, -canvas_h..=canvas_h).text("Camera Y"))
                    .changed();
                if x_changed || y_changed {
                    self.camera.set_pan(pan);
                }
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&self.status_message);
            });
        });

        // Right panel (properties)
        egui::SidePanel::right("properties_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                self.render_properties_panel(ui);
            });

        // Central panel (canvas)
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_canvas(ui);
        });
    }

    /// Render the properties panel for the selected node
    fn render_properties_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Node");
        ui.separator();

        let Some(selected_id) = self.controller.selected_id().map(str::to_string) else {
            ui.label("No node selected");
            ui.separator();
            ui.label("Left-drag moves a node, right-drag pans the camera,");
            ui.label("scroll zooms, space deselects.");
            return;
        };

        // Clone what the widgets need before any mutation
        let node_data = self
            .graph
            .find(&selected_id)
            .map(|n| (n.node_type, n.connections.clone()));
        let Some((node_type_orig, connections)) = node_data else {
            // Selection points at a vanished id (e.g. renamed elsewhere)
            ui.label(format!("Node {:?} no longer exists", selected_id));
            return;
        };

        if self.form.loaded_for.as_deref() != Some(selected_id.as_str()) {
            self.fill_form(&selected_id);
        }

        ui.label("Id:");
        ui.text_edit_singleline(&mut self.form.id);

        ui.horizontal(|ui| {
            ui.label("X:");
            ui.text_edit_singleline(&mut self.form.x);
        });
        ui.horizontal(|ui| {
            ui.label("Y:");
            ui.text_edit_singleline(&mut self.form.y);
        });
        ui.label("Id/position changes apply on Save.");

        ui.separator();

        // Node type applies immediately
        ui.label("Type:");
        let mut node_type = node_type_orig;
        egui::ComboBox::from_label("")
            .selected_text(node_type.as_wire())
            .show_ui(ui, |ui| {
                for candidate in NodeType::ALL {
                    ui.selectable_value(&mut node_type, candidate, candidate.as_wire());
                }
            });
        if node_type != node_type_orig {
            self.controller.set_selected_node_type(&mut self.graph, node_type);
            self.status_message = format!("{} is now {}", selected_id, node_type.as_wire());
        }

        ui.separator();

        ui.label("Group:");
        ui.horizontal(|ui| {
            ui.text_edit_singleline(&mut self.form.group);
            if ui.button("Apply Group").clicked() {
                self.controller.apply_group(&mut self.graph, &self.form.group);
                // Reflect the silent fallback in the buffer
                self.form.group = self
                    .graph
                    .find(&selected_id)
                    .and_then(|n| n.group_id)
                    .map(|g| g.to_string())
                    .unwrap_or_default();
            }
        });

        ui.separator();

        ui.label("Connections:");
        if connections.is_empty() {
            ui.label("  (none)");
        } else {
            for conn in &connections {
                if self.graph.contains(conn) {
                    ui.label(format!("  – {}", conn));
                } else {
                    ui.label(format!("  – {} (missing)", conn));
                }
            }
        }

        ui.separator();

        if ui.button("📋 Copy Id").clicked() {
            match self.copy_to_clipboard(&selected_id) {
                Ok(()) => self.status_message = format!("✓ Copied {:?}", selected_id),
                Err(e) => self.status_message = format!("❌ Failed to copy: {}", e),
            }
        }

        if self.show_issues {
            ui.separator();
            self.render_issue_list(ui);
        }
    }

    fn render_issue_list(&mut self, ui: &mut egui::Ui) {
        let result = self.graph.validate();

        ui.label("Issues:");
        if result.issues.is_empty() {
            ui.colored_label(Color32::GREEN, "✓ All checks passed");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            for issue in &result.issues {
                let color = match issue.severity {
                    ValidationSeverity::Error => Color32::RED,
                    ValidationSeverity::Warning => Color32::from_rgb(255, 165, 0),
                    ValidationSeverity::Info => Color32::BLUE,
                };
                ui.colored_label(color, &issue.message);
            }
        });
    }

    /// Render the canvas with edges and nodes, and feed pointer events
    /// into the controller
    fn render_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let canvas_rect = response.rect;

        // Pointer dispatch. Coordinates handed to the controller are
        // screen-space relative to the canvas origin; it applies the
        // camera transform itself.
        if let Some(pos) = response.interact_pointer_pos() {
            let screen = relative_point(pos, canvas_rect);

            if response.drag_started_by(egui::PointerButton::Primary) {
                let outcome = self.controller.pointer_pressed(
                    &mut self.graph,
                    &self.camera,
                    screen,
                    PointerButton::Primary,
                );
                self.report_press(outcome);
            }
            if response.drag_started_by(egui::PointerButton::Secondary) {
                self.controller.pointer_pressed(
                    &mut self.graph,
                    &self.camera,
                    screen,
                    PointerButton::Secondary,
                );
            }
            if response.dragged() {
                self.controller
                    .pointer_moved(&mut self.graph, &mut self.camera, screen);
                if let DragState::DraggingNode { id, .. } = self.controller.drag_state() {
                    // Keep the form's x/y text tracking the drag
                    if let Some(node) = self.graph.find(id) {
                        self.form.x = node.x.to_string();
                        self.form.y = node.y.to_string();
                    }
                }
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.controller
                .pointer_released(&mut self.graph, PointerButton::Primary);
        }
        if response.drag_stopped_by(egui::PointerButton::Secondary) {
            self.controller
                .pointer_released(&mut self.graph, PointerButton::Secondary);
        }

        // Wheel zoom while hovering
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                self.controller.wheel_zoom(&mut self.camera, scroll);
            }
        }

        self.draw_canvas_bounds(&painter, canvas_rect);

        // Edges under nodes. Each resolvable entry draws; the mirrored
        // entry retraces the same segment.
        for node in self.graph.nodes() {
            for conn in &node.connections {
                if let Some(target) = self.graph.find(conn) {
                    painter.line_segment(
                        [
                            to_canvas(self.camera.world_to_screen(node.center()), canvas_rect),
                            to_canvas(self.camera.world_to_screen(target.center()), canvas_rect),
                        ],
                        Stroke::new(2.0, Color32::BLACK),
                    );
                }
            }
        }

        for node in self.graph.nodes() {
            self.draw_node(&painter, canvas_rect, node);
        }
    }

    /// Drawable-area boundary, mostly useful when zoomed far out
    fn draw_canvas_bounds(&self, painter: &egui::Painter, canvas_rect: Rect) {
        let (width, height) = self.camera.canvas_size();
        let pan = self.camera.pan();
        let min = to_canvas(
            self.camera.world_to_screen(Point::new(-pan.x, -pan.y)),
            canvas_rect,
        );
        let max = to_canvas(
            self.camera
                .world_to_screen(Point::new(-pan.x + width, -pan.y + height)),
            canvas_rect,
        );
        painter.rect_stroke(
            Rect::from_two_pos(min, max),
            0.0,
            Stroke::new(1.0, Color32::from_gray(220)),
        );
    }

    fn draw_node(&self, painter: &egui::Painter, canvas_rect: Rect, node: &Node) {
        let selected = self.controller.selected_id() == Some(node.id.as_str());
        let scale = self.camera.scale();

        let stroke_color = match self.issue_flags.get(&node.id) {
            Some(ValidationSeverity::Error) => Color32::RED,
            Some(ValidationSeverity::Warning) => Color32::from_rgb(255, 165, 0),
            Some(ValidationSeverity::Info) => Color32::BLUE,
            None if selected => Color32::from_rgb(0, 90, 200),
            None => Color32::BLACK,
        };
        let stroke = Stroke::new(if selected { 3.0 } else { 2.0 }, stroke_color);

        // Shape vertices in world units relative to the node corner
        let corner = node.position();
        let at = |dx: f32, dy: f32| -> Pos2 {
            to_canvas(
                self.camera
                    .world_to_screen(Point::new(corner.x + dx, corner.y + dy)),
                canvas_rect,
            )
        };

        match node.node_type {
            NodeType::Mastery => {
                let fill = Color32::GOLD;
                painter.add(PathShape::convex_polygon(
                    vec![
                        at(NODE_SIZE / 2.0, 0.0),
                        at(NODE_SIZE, NODE_SIZE),
                        at(0.0, NODE_SIZE),
                    ],
                    fill,
                    stroke,
                ));
            }
            NodeType::Stat => {
                let fill = Color32::LIGHT_BLUE;
                painter.add(PathShape::convex_polygon(
                    vec![
                        at(NODE_SIZE / 2.0, 0.0),
                        at(NODE_SIZE, NODE_SIZE / 2.0),
                        at(NODE_SIZE / 2.0, NODE_SIZE),
                        at(0.0, NODE_SIZE / 2.0),
                    ],
                    fill,
                    stroke,
                ));
            }
            NodeType::Default => {
                let fill = if selected {
                    Color32::from_rgb(144, 238, 144)
                } else {
                    Color32::from_rgb(135, 206, 235)
                };
                painter.circle(
                    to_canvas(self.camera.world_to_screen(node.center()), canvas_rect),
                    NODE_SIZE / 2.0 * scale,
                    fill,
                    stroke,
                );
            }
        }

        // Mastery labels sit below the triangle, the rest inside the box
        let label_dy = if node.node_type == NodeType::Mastery {
            NODE_SIZE + 5.0
        } else {
            15.0
        };
        painter.text(
            at(NODE_SIZE / 2.0, label_dy),
            Align2::CENTER_TOP,
            node.display_label(),
            FontId::proportional(13.0),
            Color32::DARK_GRAY,
        );
    }

    fn report_press(&mut self, outcome: PressOutcome) {
        match outcome {
            PressOutcome::SelectedNode { id } => {
                self.status_message = format!("Selected {}", id);
            }
            PressOutcome::ConnectionEdited {
                source,
                target,
                mode: ConnectionEditMode::Add,
            } => {
                self.status_message = format!("✓ Connected {} – {}", source, target);
            }
            PressOutcome::ConnectionEdited {
                source,
                target,
                mode: ConnectionEditMode::Remove,
            } => {
                self.status_message = format!("✓ Disconnected {} – {}", source, target);
            }
            PressOutcome::ConnectionEditCancelled => {
                self.status_message = "Connection edit cancelled".to_string();
            }
            PressOutcome::StartedCameraDrag | PressOutcome::Ignored => {}
        }
    }

    fn fill_form(&mut self, id: &str) {
        if let Some(node) = self.graph.find(id) {
            self.form.id = node.id.clone();
            self.form.x = node.x.to_string();
            self.form.y = node.y.to_string();
            self.form.group = node.group_id.map(|g| g.to_string()).unwrap_or_default();
            self.form.loaded_for = Some(id.to_string());
        }
    }

    /// Copy text to clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<(), String> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new().map_err(|e| format!("{}", e))?;
        clipboard.set_text(text).map_err(|e| format!("{}", e))?;
        Ok(())
    }
}

/// Pointer position relative to the canvas origin
fn relative_point(pos: Pos2, canvas_rect: Rect) -> Point {
    let rel = pos - canvas_rect.left_top();
    Point::new(rel.x, rel.y)
}

/// Camera screen space back into egui coordinates
fn to_canvas(point: Point, canvas_rect: Rect) -> Pos2 {
    canvas_rect.left_top() + vec2(point.x, point.y)
}

impl eframe::App for SkillTreeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.render_ui(ctx);
    }
}
