//! The gesture state machine of the canvas.
//!
//! One pointer gesture is in flight at a time. Every gesture starts from
//! `Idle` and every gesture ends in `Idle`:
//!
//! ```text
//!            pointer_down (pen/highlighter/eraser miss)
//!          ┌───────────────────────────► DrawingStroke ──┐
//!          │ pointer_down (lasso)                         │
//!   Idle ──┼───────────────────────────► DrawingLasso  ───┼──► Idle
//!          │ pointer_down (tape)                          │  pointer_up
//!          └───────────────────────────► SizingTape    ───┘
//! ```
//!
//! `pointer_move` keeps the state and updates its payload. Select-mode
//! presses and eraser hits stay in `Idle`.
use egui::Pos2;

use crate::stroke::MutableStroke;
use crate::tape::TapeId;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// The stroke lives here until pointer-up commits it to the page.
    DrawingStroke { stroke: MutableStroke },
    /// Transient; dropped when the gesture ends whatever the outcome.
    DrawingLasso { path: Vec<Pos2> },
    /// The strip is already on the page; only its id is tracked.
    SizingTape { tape_id: TapeId },
}

impl GestureState {
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::DrawingStroke { .. } => "drawing-stroke",
            GestureState::DrawingLasso { .. } => "drawing-lasso",
            GestureState::SizingTape { .. } => "sizing-tape",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &GestureState) -> bool {
        match (self, new_state) {
            // From Idle, we can go to any state
            (GestureState::Idle, _) => true,
            // Any gesture can only end
            (_, GestureState::Idle) => true,
            _ => false,
        }
    }

    pub fn lasso_path(&self) -> Option<&[Pos2]> {
        match self {
            GestureState::DrawingLasso { path } => Some(path),
            _ => None,
        }
    }

    pub fn stroke(&self) -> Option<&MutableStroke> {
        match self {
            GestureState::DrawingStroke { stroke } => Some(stroke),
            _ => None,
        }
    }

    pub fn sizing_tape(&self) -> Option<&TapeId> {
        match self {
            GestureState::SizingTape { tape_id } => Some(tape_id),
            _ => None,
        }
    }
}
