use egui::Pos2;

use super::{Effects, GestureContext, GestureHandler, SelectionEffect};
use crate::geometry;
use crate::page::Page;
use crate::state::GestureState;
use crate::tape::TapeId;

/// A lasso needs at least a triangle to enclose anything.
pub const MIN_LASSO_POINTS: usize = 3;

pub struct LassoTool;

impl GestureHandler for LassoTool {
    fn name(&self) -> &'static str {
        "lasso"
    }

    fn pointer_down(&self, pos: Pos2, _ctx: &GestureContext<'_>) -> (GestureState, Effects) {
        (GestureState::DrawingLasso { path: vec![pos] }, Effects::none())
    }

    fn pointer_move(&self, state: &mut GestureState, pos: Pos2, _ctx: &GestureContext<'_>) -> Effects {
        if let GestureState::DrawingLasso { path } = state {
            path.push(pos);
        }
        Effects::none()
    }

    fn pointer_up(&self, state: GestureState, ctx: &GestureContext<'_>) -> Effects {
        match state {
            GestureState::DrawingLasso { path } if path.len() >= MIN_LASSO_POINTS => {
                let ids = tapes_in_lasso(ctx.page, &path);
                log::debug!("Lasso of {} points selected {} strips", path.len(), ids.len());
                Effects::selection(SelectionEffect::Replace(ids))
            }
            _ => Effects::none(),
        }
    }
}

/// Strips whose center lies strictly inside `path`, in page order.
pub fn tapes_in_lasso(page: &Page, path: &[Pos2]) -> Vec<TapeId> {
    page.tapes()
        .iter()
        .filter(|t| geometry::point_in_polygon(t.center(), path))
        .map(|t| t.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::{TapeColor, TapeStrip};
    use crate::tools::ToolSettings;
    use egui::pos2;

    #[test]
    fn test_short_lasso_selects_nothing() {
        let page = Page::new("Test");
        let settings = ToolSettings::default();
        let ctx = GestureContext { page: &page, settings: &settings };

        let (mut state, _) = LassoTool.pointer_down(pos2(0.0, 0.0), &ctx);
        LassoTool.pointer_move(&mut state, pos2(10.0, 0.0), &ctx);
        assert!(LassoTool.pointer_up(state, &ctx).is_empty());
    }

    #[test]
    fn test_empty_result_still_replaces() {
        let page = Page::new("Test");
        let settings = ToolSettings::default();
        let ctx = GestureContext { page: &page, settings: &settings };

        let state = GestureState::DrawingLasso {
            path: vec![pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0)],
        };
        assert_eq!(
            LassoTool.pointer_up(state, &ctx).selection,
            Some(SelectionEffect::Replace(Vec::new()))
        );
    }

    #[test]
    fn test_leftward_strip_uses_true_center() {
        let mut page = Page::new("Test");
        // Dragged leftwards from x=200 to x=100, so it covers 100..200.
        let tape = TapeStrip::new(pos2(200.0, 100.0), -100.0, 40.0, TapeColor::Yellow);
        let id = tape.id.clone();
        page.tapes.push(tape);

        let around = [pos2(90.0, 90.0), pos2(190.0, 90.0), pos2(190.0, 150.0), pos2(90.0, 150.0)];
        assert_eq!(tapes_in_lasso(&page, &around), vec![id]);

        let right_of_origin = [pos2(205.0, 90.0), pos2(320.0, 90.0), pos2(320.0, 150.0), pos2(205.0, 150.0)];
        assert!(tapes_in_lasso(&page, &right_of_origin).is_empty());
    }
}
