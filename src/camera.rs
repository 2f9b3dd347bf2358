use crate::{Point, SkillGraph};

/// Zoom limits and step factor for wheel zooming
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 3.0;
pub const ZOOM_STEP: f32 = 1.1;

/// Padding around the node extent when sizing the drawable area
pub const CANVAS_MARGIN: f32 = 700.0;

/// The drawable area never shrinks below this, per axis, in world units
pub const MIN_CANVAS_EXTENT: f32 = 15000.0;

/// Viewport state: zoom scale, pan offset, and the derived canvas extent.
///
/// Scale and pan are independent knobs, but the rendered translation is
/// always `pan * scale` so panning stays visually consistent in screen
/// pixels across zoom levels.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    scale: f32,
    pan: Point,
    canvas_width: f32,
    canvas_height: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            scale: 1.0,
            pan: Point::ZERO,
            canvas_width: MIN_CANVAS_EXTENT,
            canvas_height: MIN_CANVAS_EXTENT,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Pan offset in world units
    pub fn pan(&self) -> Point {
        self.pan
    }

    /// Drawable area dimensions in world units
    pub fn canvas_size(&self) -> (f32, f32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Screen-space translation applied to the world origin
    pub fn translation(&self) -> Point {
        Point::new(self.pan.x * self.scale, self.pan.y * self.scale)
    }

    /// Slider binding; clamps like `zoom_by`
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Slider binding for the pan offset
    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    /// Multiply the scale by `factor`, clamped to the zoom limits.
    /// Anchored at the camera origin, not the pointer.
    pub fn zoom_by(&mut self, factor: f32) {
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn world_to_screen(&self, point: Point) -> Point {
        Point::new(
            (point.x + self.pan.x) * self.scale,
            (point.y + self.pan.y) * self.scale,
        )
    }

    pub fn screen_to_world(&self, point: Point) -> Point {
        Point::new(
            point.x / self.scale - self.pan.x,
            point.y / self.scale - self.pan.y,
        )
    }

    /// Pan by a screen-space delta: the same pixel drag moves the camera
    /// by `delta / scale` world units at any zoom level.
    pub fn pan_by_screen_delta(&mut self, delta: Point) {
        self.pan.x += delta.x / self.scale;
        self.pan.y += delta.y / self.scale;
    }

    /// Re-derive the drawable area from the graph extent: pad by
    /// `CANVAS_MARGIN` per side, enforce the minimum canvas size, and
    /// anchor the padded minimum corner to the origin.
    pub fn fit_to_graph(&mut self, graph: &SkillGraph) {
        let padded = graph.extent_bounds().padded(CANVAS_MARGIN);
        self.canvas_width = padded.width().max(MIN_CANVAS_EXTENT);
        self.canvas_height = padded.height().max(MIN_CANVAS_EXTENT);
        self.pan = Point::new(-padded.min_x, -padded.min_y);
    }
}
