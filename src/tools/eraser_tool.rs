use egui::{Color32, Pos2};

use super::ink_tool::{commit_stroke, extend_stroke};
use super::{Effects, GestureContext, GestureHandler};
use crate::command::Command;
use crate::state::GestureState;
use crate::stroke::{MutableStroke, StrokeTool};

pub struct EraserTool;

impl GestureHandler for EraserTool {
    fn name(&self) -> &'static str {
        "eraser"
    }

    /// A press near an existing stroke deletes it outright. Otherwise an
    /// erasing stroke starts, exactly like the pen. Press and sweep hit
    /// eraser strokes the same as ink.
    fn pointer_down(&self, pos: Pos2, ctx: &GestureContext<'_>) -> (GestureState, Effects) {
        if let Some(id) = ctx.page.stroke_near(pos, ctx.settings.eraser_radius()) {
            log::debug!("Eraser hit stroke {id}");
            return (GestureState::Idle, Effects::command(Command::RemoveStroke(id.clone())));
        }

        let stroke = MutableStroke::new(StrokeTool::Eraser, Color32::WHITE, ctx.settings.eraser_width, pos);
        (GestureState::DrawingStroke { stroke }, Effects::none())
    }

    fn pointer_move(&self, state: &mut GestureState, pos: Pos2, ctx: &GestureContext<'_>) -> Effects {
        extend_stroke(state, pos);
        if !ctx.settings.eraser_sweep || state.stroke().is_none() {
            return Effects::none();
        }

        let commands = ctx
            .page
            .strokes_near(pos, ctx.settings.eraser_radius())
            .map(|s| Command::RemoveStroke(s.id().clone()))
            .collect();
        Effects { commands, selection: None }
    }

    fn pointer_up(&self, state: GestureState, _ctx: &GestureContext<'_>) -> Effects {
        commit_stroke(state)
    }
}
