use egui::{Color32, Pos2, pos2};
use proptest::prelude::*;
use tapenote::command::Command;
use tapenote::tools::tapes_in_lasso;
use tapenote::{CanvasSession, Page, Stroke, StrokeTool, TapeColor, TapeStrip, ToolKind, ToolSettings};

fn point() -> impl Strategy<Value = Pos2> {
    (-500.0f32..500.0, -500.0f32..500.0).prop_map(|(x, y)| pos2(x, y))
}

fn strip() -> impl Strategy<Value = TapeStrip> {
    (point(), -200.0f32..200.0, -80.0f32..80.0)
        .prop_map(|(origin, width, height)| TapeStrip::new(origin, width, height, TapeColor::Yellow))
}

fn page_with_strokes(strokes: &[Vec<Pos2>]) -> Page {
    strokes.iter().fold(Page::new("Props"), |page, points| {
        page.apply(&Command::AddStroke(Stroke::new(
            StrokeTool::Pen,
            Color32::BLACK,
            2.0,
            points.clone(),
        )))
    })
}

proptest! {
    #[test]
    fn undo_removes_exactly_the_last_stroke(
        strokes in prop::collection::vec(prop::collection::vec(point(), 1..6), 0..8),
    ) {
        let page = page_with_strokes(&strokes);
        let before = page.strokes().to_vec();
        let after = page.apply(&Command::UndoStroke);

        if before.is_empty() {
            prop_assert!(after.strokes().is_empty());
        } else {
            prop_assert_eq!(after.strokes(), &before[..before.len() - 1]);
        }
    }

    #[test]
    fn toggling_reveal_twice_restores(strips in prop::collection::vec(strip(), 1..6), pick in 0usize..6) {
        let page = strips.into_iter().fold(Page::new("Props"), |page, tape| page.apply(&Command::AddTape(tape)));
        let id = page.tapes()[pick % page.tapes().len()].id.clone();

        let toggled = page
            .clone()
            .apply(&Command::ToggleReveal(id.clone()))
            .apply(&Command::ToggleReveal(id));
        prop_assert_eq!(toggled, page);
    }

    #[test]
    fn lasso_selection_is_deterministic(
        strips in prop::collection::vec(strip(), 0..10),
        path in prop::collection::vec(point(), 3..12),
    ) {
        let page = strips.into_iter().fold(Page::new("Props"), |page, tape| page.apply(&Command::AddTape(tape)));
        let first = tapes_in_lasso(&page, &path);
        let second = tapes_in_lasso(&page, &path);
        prop_assert_eq!(&first, &second);

        let mut session = CanvasSession::new(page, ToolSettings::default());
        session.set_tool(ToolKind::Lasso);
        session.pointer_down(path[0]);
        for p in &path[1..] {
            session.pointer_move(*p);
        }
        session.pointer_up();

        let mut expected = first;
        expected.sort();
        prop_assert_eq!(session.selection().ids(), expected);
    }

    #[test]
    fn every_strip_contains_its_center(tape in strip()) {
        prop_assume!(tape.width.abs() > 1.0 && tape.height.abs() > 1.0);
        prop_assert!(tape.contains(tape.center()));
    }
}

#[test]
fn test_center_on_lasso_edge_is_outside() {
    // Center at (50, 20)
    let page = Page::new("Edge").apply(&Command::AddTape(TapeStrip::new(
        pos2(0.0, 0.0),
        100.0,
        40.0,
        TapeColor::Yellow,
    )));

    let through_center = [pos2(50.0, 0.0), pos2(200.0, 0.0), pos2(200.0, 100.0), pos2(50.0, 100.0)];
    assert!(tapes_in_lasso(&page, &through_center).is_empty());

    let corner_on_center = [pos2(50.0, 20.0), pos2(200.0, 20.0), pos2(200.0, 100.0)];
    assert!(tapes_in_lasso(&page, &corner_on_center).is_empty());

    let around = [pos2(40.0, 10.0), pos2(60.0, 10.0), pos2(60.0, 30.0), pos2(40.0, 30.0)];
    assert_eq!(tapes_in_lasso(&page, &around).len(), 1);
}

#[test]
fn test_centers_on_diagonal_edge_far_from_origin() {
    let (a, b) = (pos2(738.25, 261.75), pos2(2049.75, 1049.25));
    let lasso = [a, b, pos2(738.25, 1049.25)];

    let mut page = Page::new("Far edge");
    for k in 1..128 {
        let center = a + (b - a) * (k as f32 / 128.0);
        let tape = TapeStrip::new(center - egui::vec2(50.0, 20.0), 100.0, 40.0, TapeColor::Blue);
        page = page.apply(&Command::AddTape(tape));
    }
    let inside = TapeStrip::new(pos2(1250.0, 680.0), 100.0, 40.0, TapeColor::Blue);
    let inside_id = inside.id.clone();
    page = page.apply(&Command::AddTape(inside));

    assert_eq!(tapes_in_lasso(&page, &lasso), vec![inside_id]);
}
