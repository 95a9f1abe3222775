use egui::Pos2;

use crate::page::{Background, BackgroundImage, Orientation, Page};
use crate::stroke::{Stroke, StrokeId};
use crate::tape::{TapeId, TapeStrip, TapeTransform};

/// Patches that can be applied to a page.
///
/// Every change to page state goes through one of these, so the session can
/// decide in one place whether selection needs pruning, quiz progress needs
/// recomputing and whether the change should be persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddStroke(Stroke),
    RemoveStroke(StrokeId),
    /// Drop the most recently committed stroke
    UndoStroke,
    AddTape(TapeStrip),
    AddTapes(Vec<TapeStrip>),
    /// Live width update while a strip is being sized
    ResizeTape { id: TapeId, width: f32 },
    MoveTape { id: TapeId, position: Pos2 },
    TransformTape { id: TapeId, transform: TapeTransform },
    ToggleReveal(TapeId),
    SetAllRevealed(bool),
    ToggleLock(TapeId),
    RemoveTapes(Vec<TapeId>),
    ClearPage,
    SetBackground(Background),
    SetBackgroundImage(Option<BackgroundImage>),
    SetOrientation(Orientation),
    Rename(String),
}

impl Command {
    /// Apply to `page`. Returns false when the command found nothing to change,
    /// e.g. an id that was already removed.
    pub fn execute(&self, page: &mut Page) -> bool {
        match self {
            Command::AddStroke(stroke) => {
                page.lines.push(stroke.clone());
                true
            }
            Command::RemoveStroke(id) => {
                let before = page.lines.len();
                page.lines.retain(|s| s.id() != id);
                page.lines.len() != before
            }
            Command::UndoStroke => page.lines.pop().is_some(),
            Command::AddTape(tape) => {
                page.tapes.push(tape.clone());
                true
            }
            Command::AddTapes(tapes) => {
                page.tapes.extend(tapes.iter().cloned());
                !tapes.is_empty()
            }
            Command::ResizeTape { id, width } => match page.tape_mut(id) {
                Some(tape) => {
                    tape.width = *width;
                    true
                }
                None => false,
            },
            Command::MoveTape { id, position } => match page.tape_mut(id) {
                Some(tape) => {
                    tape.set_position(*position);
                    true
                }
                None => false,
            },
            Command::TransformTape { id, transform } => match page.tape_mut(id) {
                Some(tape) => {
                    tape.apply_transform(*transform);
                    true
                }
                None => false,
            },
            Command::ToggleReveal(id) => match page.tape_mut(id) {
                Some(tape) => {
                    tape.toggle_revealed();
                    true
                }
                None => false,
            },
            Command::SetAllRevealed(revealed) => {
                for tape in &mut page.tapes {
                    tape.is_revealed = *revealed;
                }
                !page.tapes.is_empty()
            }
            Command::ToggleLock(id) => match page.tape_mut(id) {
                Some(tape) => {
                    tape.is_locked = !tape.is_locked;
                    true
                }
                None => false,
            },
            Command::RemoveTapes(ids) => {
                let before = page.tapes.len();
                page.tapes.retain(|t| !ids.contains(&t.id));
                page.tapes.len() != before
            }
            Command::ClearPage => {
                let changed = !page.lines.is_empty() || !page.tapes.is_empty();
                page.lines.clear();
                page.tapes.clear();
                changed
            }
            Command::SetBackground(background) => {
                page.background = *background;
                true
            }
            Command::SetBackgroundImage(image) => {
                page.background_image = image.clone();
                true
            }
            Command::SetOrientation(orientation) => {
                page.orientation = *orientation;
                true
            }
            Command::Rename(title) => {
                page.title = title.clone();
                true
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::AddStroke(_) => "add_stroke",
            Command::RemoveStroke(_) => "remove_stroke",
            Command::UndoStroke => "undo_stroke",
            Command::AddTape(_) => "add_tape",
            Command::AddTapes(_) => "add_tapes",
            Command::ResizeTape { .. } => "resize_tape",
            Command::MoveTape { .. } => "move_tape",
            Command::TransformTape { .. } => "transform_tape",
            Command::ToggleReveal(_) => "toggle_reveal",
            Command::SetAllRevealed(_) => "set_all_revealed",
            Command::ToggleLock(_) => "toggle_lock",
            Command::RemoveTapes(_) => "remove_tapes",
            Command::ClearPage => "clear_page",
            Command::SetBackground(_) => "set_background",
            Command::SetBackgroundImage(_) => "set_background_image",
            Command::SetOrientation(_) => "set_orientation",
            Command::Rename(_) => "rename",
        }
    }
}
