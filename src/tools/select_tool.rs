use egui::Pos2;

use super::{Effects, GestureContext, GestureHandler, SelectionEffect};
use crate::state::GestureState;

/// Pressing empty canvas clears the selection. Presses on a strip belong to
/// the strip's own click, drag and transform handling.
pub struct SelectTool;

impl GestureHandler for SelectTool {
    fn name(&self) -> &'static str {
        "select"
    }

    fn pointer_down(&self, pos: Pos2, ctx: &GestureContext<'_>) -> (GestureState, Effects) {
        let effects = if ctx.page.tape_at(pos).is_none() {
            Effects::selection(SelectionEffect::Clear)
        } else {
            Effects::none()
        };
        (GestureState::Idle, effects)
    }

    fn pointer_move(&self, _state: &mut GestureState, _pos: Pos2, _ctx: &GestureContext<'_>) -> Effects {
        Effects::none()
    }
}
