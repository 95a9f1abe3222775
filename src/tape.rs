use egui::{Color32, Pos2, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

use crate::geometry;
use crate::id_generator::define_id;

define_id!(
    /// Identifier of a tape strip.
    TapeId
);

pub const DEFAULT_TAPE_OPACITY: f32 = 0.9;
/// Opacity a revealed strip is drawn with, so the reader still sees where it was.
pub const REVEALED_TAPE_OPACITY: f32 = 0.2;

/// Palette key for tape. Rendering maps it to a concrete color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TapeColor {
    #[default]
    Yellow,
    Beige,
    Gray,
    Blue,
    Green,
}

impl TapeColor {
    pub const ALL: [TapeColor; 5] = [
        TapeColor::Yellow,
        TapeColor::Beige,
        TapeColor::Gray,
        TapeColor::Blue,
        TapeColor::Green,
    ];

    pub fn color32(self) -> Color32 {
        match self {
            Self::Yellow => Color32::from_rgb(0xfe, 0xf0, 0x8a),
            Self::Beige => Color32::from_rgb(0xf5, 0xf5, 0xdc),
            Self::Gray => Color32::from_rgb(0xd1, 0xd5, 0xdb),
            Self::Blue => Color32::from_rgb(0xbf, 0xdb, 0xfe),
            Self::Green => Color32::from_rgb(0xbb, 0xf7, 0xd0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Beige => "beige",
            Self::Gray => "gray",
            Self::Blue => "blue",
            Self::Green => "green",
        }
    }
}

/// Geometry of a strip as stored: origin corner, signed size, rotation about the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapeGeometry {
    pub origin: Pos2,
    pub size: Vec2,
    pub rotation: f32,
}

impl TapeGeometry {
    pub fn center(&self) -> Pos2 {
        self.origin + self.size / 2.0
    }

    /// The four corners in drawing order, rotated into page space.
    pub fn corners(&self) -> [Pos2; 4] {
        let o = self.origin;
        let s = self.size;
        [o, o + vec2(s.x, 0.0), o + s, o + vec2(0.0, s.y)]
            .map(|c| geometry::rotate_about(c, o, self.rotation))
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        geometry::point_in_rotated_rect(pos, self.origin, self.size, self.rotation)
    }
}

/// Result of a transform-handle gesture as the handle reports it.
///
/// `width`/`height` are the unscaled node size and `scale_x`/`scale_y` the factors
/// applied during the gesture. They are baked into absolute size on commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapeTransform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation: f32,
}

fn default_tape_opacity() -> f32 {
    DEFAULT_TAPE_OPACITY
}

/// A rectangular occlusion overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TapeStrip {
    pub id: TapeId,
    pub x: f32,
    pub y: f32,
    /// Negative while (and after) a leftward drag; never normalized in place.
    pub width: f32,
    pub height: f32,
    /// Degrees about `(x, y)`.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default)]
    pub color: TapeColor,
    #[serde(default = "default_tape_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub is_revealed: bool,
    #[serde(default)]
    pub is_locked: bool,
}

impl TapeStrip {
    pub fn new(position: Pos2, width: f32, height: f32, color: TapeColor) -> Self {
        Self {
            id: TapeId::new(),
            x: position.x,
            y: position.y,
            width,
            height,
            rotation: 0.0,
            color,
            opacity: DEFAULT_TAPE_OPACITY,
            is_revealed: false,
            is_locked: false,
        }
    }

    /// Zero-width strip as placed by pointer-down with the tape tool.
    pub fn at(position: Pos2, height: f32, color: TapeColor) -> Self {
        Self::new(position, 0.0, height, color)
    }

    pub fn position(&self) -> Pos2 {
        pos2(self.x, self.y)
    }

    pub fn geometry(&self) -> TapeGeometry {
        TapeGeometry {
            origin: self.position(),
            size: vec2(self.width, self.height),
            rotation: self.rotation,
        }
    }

    /// Center used by lasso selection. Sign-agnostic, so a leftward strip's
    /// center still sits inside its painted area.
    pub fn center(&self) -> Pos2 {
        pos2(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, pos: Pos2) -> bool {
        self.geometry().contains(pos)
    }

    pub fn toggle_revealed(&mut self) {
        self.is_revealed = !self.is_revealed;
    }

    pub fn set_position(&mut self, position: Pos2) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn apply_transform(&mut self, transform: TapeTransform) {
        self.x = transform.x;
        self.y = transform.y;
        self.width = transform.width * transform.scale_x;
        self.height = transform.height * transform.scale_y;
        self.rotation = transform.rotation;
    }

    /// Opacity the strip is painted with in its current reveal state.
    pub fn display_opacity(&self) -> f32 {
        if self.is_revealed {
            REVEALED_TAPE_OPACITY
        } else {
            self.opacity
        }
    }
}
