use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::id_generator::define_id;

define_id!(
    /// Identifier of a committed ink stroke.
    StrokeId
);

pub const DEFAULT_OPACITY: f32 = 1.0;
pub const HIGHLIGHTER_OPACITY: f32 = 0.4;

/// Which ink tool produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    Pen,
    Highlighter,
    /// Recorded like ink, rendered as a destructive composite.
    Eraser,
}

impl StrokeTool {
    pub fn default_opacity(self) -> f32 {
        match self {
            Self::Highlighter => HIGHLIGHTER_OPACITY,
            Self::Pen | Self::Eraser => DEFAULT_OPACITY,
        }
    }
}

fn default_opacity() -> f32 {
    DEFAULT_OPACITY
}

// Immutable stroke, frozen once the gesture that drew it ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    id: StrokeId,
    points: Vec<Pos2>,
    tool: StrokeTool,
    color: Color32,
    width: f32,
    #[serde(default = "default_opacity")]
    opacity: f32,
}

// Mutable stroke for the gesture in flight
#[derive(Debug, Clone, PartialEq)]
pub struct MutableStroke {
    points: Vec<Pos2>,
    tool: StrokeTool,
    color: Color32,
    width: f32,
    opacity: f32,
}

impl Stroke {
    pub fn new(tool: StrokeTool, color: Color32, width: f32, points: Vec<Pos2>) -> Self {
        Self {
            id: StrokeId::new(),
            points,
            tool,
            color,
            width,
            opacity: tool.default_opacity(),
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn id(&self) -> &StrokeId {
        &self.id
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn tool(&self) -> StrokeTool {
        self.tool
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn is_eraser(&self) -> bool {
        self.tool == StrokeTool::Eraser
    }
}

impl MutableStroke {
    /// Starts a stroke at `start`, so the stroke is never empty.
    pub fn new(tool: StrokeTool, color: Color32, width: f32, start: Pos2) -> Self {
        Self {
            points: vec![start],
            tool,
            color,
            width,
            opacity: tool.default_opacity(),
        }
    }

    pub fn add_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    /// Freeze into a committed stroke with a fresh id
    pub fn into_stroke(self) -> Stroke {
        Stroke {
            id: StrokeId::new(),
            points: self.points,
            tool: self.tool,
            color: self.color,
            width: self.width,
            opacity: self.opacity,
        }
    }

    // Get a reference to the points for preview
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn tool(&self) -> StrokeTool {
        self.tool
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }
}
