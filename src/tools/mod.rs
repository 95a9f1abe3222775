use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::page::Page;
use crate::state::GestureState;
use crate::tape::TapeId;

mod eraser_tool;
mod ink_tool;
mod lasso_tool;
mod select_tool;
mod settings;
mod tape_tool;

pub use eraser_tool::EraserTool;
pub use ink_tool::InkTool;
pub use lasso_tool::{LassoTool, MIN_LASSO_POINTS, tapes_in_lasso};
pub use select_tool::SelectTool;
pub use settings::{HIGHLIGHTER_COLORS, PEN_COLORS, ToolSettings};
pub use tape_tool::TapeTool;

/// Every tool the canvas knows. Closed, so handler lookup is checked for exhaustiveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Select,
    Lasso,
    #[default]
    Pen,
    Highlighter,
    Eraser,
    Tape,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Select,
        ToolKind::Lasso,
        ToolKind::Pen,
        ToolKind::Highlighter,
        ToolKind::Eraser,
        ToolKind::Tape,
    ];

    pub fn name(self) -> &'static str {
        handler_for(self).name()
    }
}

/// What a handler sees of the session for one event.
pub struct GestureContext<'a> {
    pub page: &'a Page,
    pub settings: &'a ToolSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEffect {
    Clear,
    Replace(Vec<TapeId>),
}

/// Side effects requested by a handler. The session applies them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub commands: Vec<Command>,
    pub selection: Option<SelectionEffect>,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn command(command: Command) -> Self {
        Self {
            commands: vec![command],
            selection: None,
        }
    }

    pub fn selection(effect: SelectionEffect) -> Self {
        Self {
            commands: Vec::new(),
            selection: Some(effect),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.selection.is_none()
    }
}

/// Transition table for one tool.
///
/// `pointer_down` is only called from `Idle`. `pointer_move` may update the
/// in-flight state in place. `pointer_up` consumes the state; the session
/// always returns to `Idle` afterwards.
pub trait GestureHandler: Sync {
    fn name(&self) -> &'static str;

    fn pointer_down(&self, pos: Pos2, ctx: &GestureContext<'_>) -> (GestureState, Effects);

    fn pointer_move(&self, state: &mut GestureState, pos: Pos2, ctx: &GestureContext<'_>) -> Effects;

    fn pointer_up(&self, state: GestureState, _ctx: &GestureContext<'_>) -> Effects {
        let _ = state;
        Effects::none()
    }
}

static SELECT: SelectTool = SelectTool;
static LASSO: LassoTool = LassoTool;
static PEN: InkTool = InkTool::PEN;
static HIGHLIGHTER: InkTool = InkTool::HIGHLIGHTER;
static ERASER: EraserTool = EraserTool;
static TAPE: TapeTool = TapeTool;

pub fn handler_for(tool: ToolKind) -> &'static dyn GestureHandler {
    match tool {
        ToolKind::Select => &SELECT,
        ToolKind::Lasso => &LASSO,
        ToolKind::Pen => &PEN,
        ToolKind::Highlighter => &HIGHLIGHTER,
        ToolKind::Eraser => &ERASER,
        ToolKind::Tape => &TAPE,
    }
}
