//! Placement of tape strips over detected keywords.
//!
//! Keyword positions are not located on the page yet: strips are laid out on
//! a fixed diagonal so each lands below and to the right of the previous one.
//! A text-location service can replace `placement_for` without touching the
//! strip model.
use egui::{Pos2, pos2};

use crate::tape::{TapeColor, TapeStrip};

pub const FIRST_POSITION: Pos2 = pos2(100.0, 200.0);
pub const STEP_X: f32 = 50.0;
pub const STEP_Y: f32 = 60.0;
pub const DEFAULT_WIDTH: f32 = 150.0;
pub const DEFAULT_HEIGHT: f32 = 40.0;
pub const DEFAULT_COLOR: TapeColor = TapeColor::Yellow;

pub fn placement_for(index: usize) -> Pos2 {
    let i = index as f32;
    pos2(FIRST_POSITION.x + i * STEP_X, FIRST_POSITION.y + i * STEP_Y)
}

/// One unrevealed, unlocked strip per keyword.
pub fn tapes_for_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<TapeStrip> {
    keywords
        .iter()
        .enumerate()
        .map(|(i, keyword)| {
            log::debug!("Placing tape for keyword {:?}", keyword.as_ref());
            TapeStrip::new(placement_for(i), DEFAULT_WIDTH, DEFAULT_HEIGHT, DEFAULT_COLOR)
        })
        .collect()
}
