use egui::Pos2;

use super::{Effects, GestureContext, GestureHandler};
use crate::command::Command;
use crate::state::GestureState;
use crate::tape::TapeStrip;

pub struct TapeTool;

impl GestureHandler for TapeTool {
    fn name(&self) -> &'static str {
        "tape"
    }

    /// The strip goes on the page immediately with zero width.
    fn pointer_down(&self, pos: Pos2, ctx: &GestureContext<'_>) -> (GestureState, Effects) {
        let tape = TapeStrip::at(pos, ctx.settings.tape_height, ctx.settings.tape_color);
        let tape_id = tape.id.clone();
        (GestureState::SizingTape { tape_id }, Effects::command(Command::AddTape(tape)))
    }

    /// Width follows the pointer; height stays what the settings said at creation.
    fn pointer_move(&self, state: &mut GestureState, pos: Pos2, ctx: &GestureContext<'_>) -> Effects {
        let Some(tape_id) = state.sizing_tape() else {
            return Effects::none();
        };
        match ctx.page.tape(tape_id) {
            Some(tape) => Effects::command(Command::ResizeTape {
                id: tape_id.clone(),
                width: pos.x - tape.x,
            }),
            None => Effects::none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use crate::tools::ToolSettings;
    use egui::pos2;

    #[test]
    fn test_sizing_a_removed_strip_is_noop() {
        let page = Page::new("Test");
        let settings = ToolSettings::default();
        let ctx = GestureContext { page: &page, settings: &settings };

        let (mut state, effects) = TapeTool.pointer_down(pos2(10.0, 10.0), &ctx);
        assert_eq!(effects.commands.len(), 1);
        // The page in ctx never received the strip.
        assert!(TapeTool.pointer_move(&mut state, pos2(50.0, 10.0), &ctx).is_empty());
    }
}
