use egui::Pos2;

use super::{Effects, GestureContext, GestureHandler};
use crate::command::Command;
use crate::state::GestureState;
use crate::stroke::{MutableStroke, StrokeTool};

/// Pen and highlighter. They differ only in the settings they read.
pub struct InkTool {
    kind: StrokeTool,
}

impl InkTool {
    pub const PEN: InkTool = InkTool { kind: StrokeTool::Pen };
    pub const HIGHLIGHTER: InkTool = InkTool { kind: StrokeTool::Highlighter };
}

impl GestureHandler for InkTool {
    fn name(&self) -> &'static str {
        match self.kind {
            StrokeTool::Highlighter => "highlighter",
            StrokeTool::Pen | StrokeTool::Eraser => "pen",
        }
    }

    fn pointer_down(&self, pos: Pos2, ctx: &GestureContext<'_>) -> (GestureState, Effects) {
        let settings = ctx.settings;
        let stroke = match self.kind {
            StrokeTool::Highlighter => MutableStroke::new(
                StrokeTool::Highlighter,
                settings.highlighter_color,
                settings.highlighter_width,
                pos,
            ),
            StrokeTool::Pen | StrokeTool::Eraser => {
                MutableStroke::new(StrokeTool::Pen, settings.pen_color, settings.pen_width, pos)
            }
        };
        (GestureState::DrawingStroke { stroke }, Effects::none())
    }

    fn pointer_move(&self, state: &mut GestureState, pos: Pos2, _ctx: &GestureContext<'_>) -> Effects {
        extend_stroke(state, pos);
        Effects::none()
    }

    fn pointer_up(&self, state: GestureState, _ctx: &GestureContext<'_>) -> Effects {
        commit_stroke(state)
    }
}

pub(super) fn extend_stroke(state: &mut GestureState, pos: Pos2) {
    if let GestureState::DrawingStroke { stroke } = state {
        stroke.add_point(pos);
    }
}

/// Freezes the in-flight stroke into an `AddStroke` command.
pub(super) fn commit_stroke(state: GestureState) -> Effects {
    match state {
        GestureState::DrawingStroke { stroke } => Effects::command(Command::AddStroke(stroke.into_stroke())),
        _ => Effects::none(),
    }
}
