use crate::ids::{ComponentId, WireId};

/// Persisted canvas view (pan/zoom). Irrelevant to simulation; carried only
/// so a round-trip through the loader/saver (out of scope here) doesn't
/// lose it.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasView {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

/// Ordered container of components and wires.
#[derive(Debug, Clone)]
pub struct Page {
    pub name: String,
    pub canvas_view: CanvasView,
    pub components: Vec<ComponentId>,
    pub wires: Vec<WireId>,
}

impl Page {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canvas_view: CanvasView::default(),
            components: Vec::new(),
            wires: Vec::new(),
        }
    }
}
