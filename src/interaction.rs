use crate::camera::ZOOM_STEP;
use crate::{Camera, NodeType, Point, SkillGraph};

/// Pointer button identity as reported by the host toolkit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

/// The one drag in flight, if any. Node and camera drags are separate
/// channels keyed by button; a release only ends the matching channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,

    /// Primary-button drag of a node. `grab_offset` is the world-space
    /// distance from the pointer to the node's corner at press time, so
    /// the node does not jump to the pointer hotspot.
    DraggingNode { id: String, grab_offset: Point },

    /// Secondary-button camera pan. `anchor` is the last screen point;
    /// each move applies the incremental delta and re-anchors.
    DraggingCamera { anchor: Point },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEditMode {
    Add,
    Remove,
}

/// An armed one-shot connection edit, consumed by the next node press
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConnectionEdit {
    pub source_id: String,
    pub mode: ConnectionEditMode,
}

/// What a primary/secondary press accomplished, for status reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// Nothing happened: empty canvas under the primary button, or a
    /// press while another drag channel was already active
    Ignored,

    SelectedNode {
        id: String,
    },

    StartedCameraDrag,

    /// A pending connection edit was consumed against the pressed node
    ConnectionEdited {
        source: String,
        target: String,
        mode: ConnectionEditMode,
    },

    /// The pending edit was consumed against its own source; nothing
    /// mutated
    ConnectionEditCancelled,
}

/// Owns selection, drag, and connection-edit state, and dispatches
/// pointer and form events into graph/camera mutations. Holds ids, never
/// node copies; nodes are looked up on demand.
#[derive(Debug, Default)]
pub struct InteractionController {
    selected: Option<String>,
    drag: DragState,
    pending_edit: Option<PendingConnectionEdit>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The selected node, if the id still resolves
    pub fn selected_node<'a>(&self, graph: &'a SkillGraph) -> Option<&'a crate::Node> {
        self.selected.as_deref().and_then(|id| graph.find(id))
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn pending_edit(&self) -> Option<&PendingConnectionEdit> {
        self.pending_edit.as_ref()
    }

    /// Button-down dispatch. Secondary starts a camera drag anywhere;
    /// primary over a node either consumes a pending connection edit or
    /// selects and starts a node drag. Primary over empty canvas leaves
    /// selection as it was.
    pub fn pointer_pressed(
        &mut self,
        graph: &mut SkillGraph,
        camera: &Camera,
        screen: Point,
        button: PointerButton,
    ) -> PressOutcome {
        if self.drag != DragState::Idle {
            return PressOutcome::Ignored;
        }

        if button == PointerButton::Secondary {
            self.drag = DragState::DraggingCamera { anchor: screen };
            return PressOutcome::StartedCameraDrag;
        }

        let world = camera.screen_to_world(screen);
        let Some((id, position)) = graph.node_at(world).map(|n| (n.id.clone(), n.position()))
        else {
            return PressOutcome::Ignored;
        };

        if let Some(pending) = self.pending_edit.take() {
            self.selected = Some(id.clone());
            if pending.source_id == id {
                return PressOutcome::ConnectionEditCancelled;
            }
            match pending.mode {
                ConnectionEditMode::Add => graph.add_connection(&pending.source_id, &id),
                ConnectionEditMode::Remove => graph.remove_connection(&pending.source_id, &id),
            }
            return PressOutcome::ConnectionEdited {
                source: pending.source_id,
                target: id,
                mode: pending.mode,
            };
        }

        self.selected = Some(id.clone());
        self.drag = DragState::DraggingNode {
            grab_offset: world - position,
            id: id.clone(),
        };
        PressOutcome::SelectedNode { id }
    }

    /// Pointer-move dispatch while a button is held
    pub fn pointer_moved(&mut self, graph: &mut SkillGraph, camera: &mut Camera, screen: Point) {
        match &mut self.drag {
            DragState::Idle => {}
            DragState::DraggingNode { id, grab_offset } => {
                let world = camera.screen_to_world(screen);
                graph.move_node(id, world - *grab_offset);
            }
            DragState::DraggingCamera { anchor } => {
                camera.pan_by_screen_delta(screen - *anchor);
                *anchor = screen;
            }
        }
    }

    /// Button-up dispatch; only the matching channel ends
    pub fn pointer_released(&mut self, graph: &mut SkillGraph, button: PointerButton) {
        match (&self.drag, button) {
            (DragState::DraggingNode { id, .. }, PointerButton::Primary) => {
                let id = id.clone();
                graph.record_node_moved(&id);
                self.drag = DragState::Idle;
            }
            (DragState::DraggingCamera { .. }, PointerButton::Secondary) => {
                self.drag = DragState::Idle;
            }
            _ => {}
        }
    }

    /// Wheel zoom with the fixed step factor, anchored at the camera
    /// origin
    pub fn wheel_zoom(&self, camera: &mut Camera, scroll_delta: f32) {
        if scroll_delta > 0.0 {
            camera.zoom_by(ZOOM_STEP);
        } else if scroll_delta < 0.0 {
            camera.zoom_by(1.0 / ZOOM_STEP);
        }
    }

    /// Space binding: clears the selection only. An in-progress drag
    /// keeps its own node id and continues; an armed connection edit
    /// stays armed.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Arm a one-shot connection edit from the current selection.
    /// Returns false (and stays disarmed) with no selection.
    pub fn arm_connection_edit(&mut self, mode: ConnectionEditMode) -> bool {
        match &self.selected {
            Some(id) => {
                self.pending_edit = Some(PendingConnectionEdit {
                    source_id: id.clone(),
                    mode,
                });
                true
            }
            None => false,
        }
    }

    /// Type selector: retype the selected node immediately
    pub fn set_selected_node_type(&mut self, graph: &mut SkillGraph, node_type: NodeType) -> bool {
        match self.selected.as_deref() {
            Some(id) => graph.set_node_type(id, node_type),
            None => false,
        }
    }

    /// Apply-group action: integer parse, any failure clears the group
    pub fn apply_group(&mut self, graph: &mut SkillGraph, raw: &str) -> bool {
        let Some(id) = self.selected.clone() else {
            return false;
        };
        graph.set_group(&id, raw.trim().parse::<i32>().ok())
    }

    /// Save-commit of the property form: the id always applies, x/y only
    /// when they parse as floats. Selection follows a renamed id.
    pub fn commit_node_edits(
        &mut self,
        graph: &mut SkillGraph,
        id_text: &str,
        x_text: &str,
        y_text: &str,
    ) -> bool {
        let Some(current_id) = self.selected.clone() else {
            return false;
        };
        if !graph.contains(&current_id) {
            return false;
        }

        let id = if id_text != current_id && graph.rename_node(&current_id, id_text) {
            self.selected = Some(id_text.to_string());
            id_text.to_string()
        } else {
            current_id
        };

        let mut moved = false;
        if let Some(node) = graph.find_mut(&id) {
            if let Ok(x) = x_text.trim().parse::<f32>() {
                node.x = x;
                moved = true;
            }
            if let Ok(y) = y_text.trim().parse::<f32>() {
                node.y = y;
                moved = true;
            }
        }
        if moved {
            graph.record_node_moved(&id);
        }
        true
    }
}
