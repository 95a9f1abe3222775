use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::tape::TapeColor;

pub const PEN_COLORS: [(&str, Color32); 5] = [
    ("Black", Color32::from_rgb(0x14, 0x14, 0x14)),
    ("Blue", Color32::from_rgb(0x25, 0x63, 0xeb)),
    ("Red", Color32::from_rgb(0xdc, 0x26, 0x26)),
    ("Green", Color32::from_rgb(0x16, 0xa3, 0x4a)),
    ("Purple", Color32::from_rgb(0x93, 0x33, 0xea)),
];

pub const HIGHLIGHTER_COLORS: [(&str, Color32); 4] = [
    ("Yellow", Color32::from_rgb(0xfe, 0xf0, 0x8a)),
    ("Green", Color32::from_rgb(0xbb, 0xf7, 0xd0)),
    ("Blue", Color32::from_rgb(0xbf, 0xdb, 0xfe)),
    ("Pink", Color32::from_rgb(0xfb, 0xcf, 0xe8)),
];

/// User-adjustable tool configuration, persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct ToolSettings {
    pub pen_color: Color32,
    pub highlighter_color: Color32,
    pub pen_width: f32,
    pub highlighter_width: f32,
    pub eraser_width: f32,
    pub tape_height: f32,
    pub tape_color: TapeColor,
    /// When set, an erasing drag deletes every stroke it passes over, not only
    /// the one under the initial press.
    pub eraser_sweep: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            pen_color: PEN_COLORS[0].1,
            highlighter_color: HIGHLIGHTER_COLORS[0].1,
            pen_width: 2.0,
            highlighter_width: 20.0,
            eraser_width: 20.0,
            tape_height: 40.0,
            tape_color: TapeColor::Yellow,
            eraser_sweep: false,
        }
    }
}

impl ToolSettings {
    /// Distance under which the eraser grabs a stroke vertex.
    pub fn eraser_radius(&self) -> f32 {
        self.eraser_width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: ToolSettings = serde_json::from_str(r#"{"tape_height": 60.0}"#).unwrap();
        assert_eq!(settings.tape_height, 60.0);
        assert_eq!(settings.eraser_width, 20.0);
        assert_eq!(settings.tape_color, TapeColor::Yellow);
        assert!(!settings.eraser_sweep);
    }
}
