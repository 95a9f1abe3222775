use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::geometry;
use crate::id_generator::define_id;
use crate::stroke::{Stroke, StrokeId};
use crate::tape::{TapeGeometry, TapeId, TapeStrip};

define_id!(
    /// Identifier of a page inside a notebook.
    PageId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    White,
    Dark,
    Paper,
    Grid,
    Dots,
}

impl Background {
    pub const ALL: [Background; 5] = [
        Background::White,
        Background::Dark,
        Background::Paper,
        Background::Grid,
        Background::Dots,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Dark => "dark",
            Self::Paper => "paper",
            Self::Grid => "grid",
            Self::Dots => "dots",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Self::Portrait => Self::Landscape,
            Self::Landscape => Self::Portrait,
        }
    }
}

/// A rasterized import, referenced rather than embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundImage {
    pub reference: String,
    pub width: u32,
    pub height: u32,
}

/// One page of a notebook: ink, tape and what they sit on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: PageId,
    pub title: String,
    #[serde(default)]
    pub lines: Vec<Stroke>,
    #[serde(default)]
    pub tapes: Vec<TapeStrip>,
    #[serde(default)]
    pub background: Background,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<BackgroundImage>,
    #[serde(default)]
    pub orientation: Orientation,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(PageId::new(), title, Background::White)
    }

    pub fn with_id(id: PageId, title: impl Into<String>, background: Background) -> Self {
        Self {
            id,
            title: title.into(),
            lines: Vec::new(),
            tapes: Vec::new(),
            background,
            background_image: None,
            orientation: Orientation::Portrait,
        }
    }

    /// Snapshot-in, snapshot-out application of a patch.
    pub fn apply(mut self, command: &Command) -> Page {
        command.execute(&mut self);
        self
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.lines
    }

    pub fn tapes(&self) -> &[TapeStrip] {
        &self.tapes
    }

    pub fn tape(&self, id: &TapeId) -> Option<&TapeStrip> {
        self.tapes.iter().find(|t| &t.id == id)
    }

    pub(crate) fn tape_mut(&mut self, id: &TapeId) -> Option<&mut TapeStrip> {
        self.tapes.iter_mut().find(|t| &t.id == id)
    }

    pub fn has_tape(&self, id: &TapeId) -> bool {
        self.tape(id).is_some()
    }

    pub fn tape_geometry(&self, id: &TapeId) -> Option<TapeGeometry> {
        self.tape(id).map(TapeStrip::geometry)
    }

    /// Topmost strip under `pos`. Later strips are drawn above earlier ones.
    pub fn tape_at(&self, pos: Pos2) -> Option<&TapeStrip> {
        self.tapes.iter().rev().find(|t| t.contains(pos))
    }

    /// Strokes of any tool with a vertex strictly inside `radius` of `pos`,
    /// in creation order.
    pub fn strokes_near(&self, pos: Pos2, radius: f32) -> impl Iterator<Item = &Stroke> {
        self.lines
            .iter()
            .filter(move |s| geometry::is_point_near_vertex(pos, s.points(), radius))
    }

    /// First stroke hit by `strokes_near`.
    pub fn stroke_near(&self, pos: Pos2, radius: f32) -> Option<&StrokeId> {
        self.strokes_near(pos, radius).next().map(Stroke::id)
    }

    pub fn revealed_count(&self) -> usize {
        self.tapes.iter().filter(|t| t.is_revealed).count()
    }
}
