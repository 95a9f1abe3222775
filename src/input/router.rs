use egui::{Pos2, Vec2};

use super::InputEvent;
use crate::geometry;
use crate::renderer::TapeHandles;
use crate::session::CanvasSession;
use crate::tape::{TapeGeometry, TapeId, TapeTransform};
use crate::tools::ToolKind;

/// Movement below this distance still counts as a click.
pub const CLICK_SLOP: f32 = 4.0;

/// Smallest extent a handle resize may produce on either axis.
pub const MIN_TAPE_EXTENT: f32 = 5.0;

#[derive(Debug, Clone, PartialEq)]
enum Target {
    /// A tool gesture forwarded to the session's state machine.
    Gesture,
    /// Press on a strip outside select mode. Becomes a click on release, or a
    /// tool gesture once the pointer travels.
    PendingClick { id: TapeId, pressed_at: Pos2 },
    /// Select-mode press on a strip body.
    Strip { id: TapeId, grab: Vec2, moved: bool },
    Resize { id: TapeId, start: TapeGeometry, last: Option<TapeTransform> },
    Rotate { id: TapeId, start: TapeGeometry, handle: Pos2, last: Option<TapeTransform> },
}

/// Routes pointer events to strip interaction or to the gesture state machine.
#[derive(Debug, Default)]
pub struct PointerRouter {
    target: Option<Target>,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.target.is_some()
    }

    pub fn route(&mut self, event: &InputEvent, session: &mut CanvasSession) {
        match event {
            InputEvent::PointerDown { location } => self.press(location.position, session),
            InputEvent::PointerMove { location } => self.drag(location.position, session),
            InputEvent::PointerUp { location } => self.release(location.position, session),
            InputEvent::PointerLeave { last_known_location } => self.release(last_known_location.position, session),
        }
    }

    fn press(&mut self, pos: Pos2, session: &mut CanvasSession) {
        if self.target.is_some() {
            log::debug!("Ignoring press while {:?} is active", self.target);
            return;
        }

        if session.tool() == ToolKind::Select {
            if let Some(target) = handle_under(pos, session) {
                self.target = Some(target);
                return;
            }
            if let Some(id) = session.tape_at(pos) {
                let grab = session.tape_geometry(&id).map_or(Vec2::ZERO, |g| pos - g.origin);
                self.target = Some(Target::Strip { id, grab, moved: false });
                return;
            }
        } else if let Some(id) = session.tape_at(pos) {
            self.target = Some(Target::PendingClick { id, pressed_at: pos });
            return;
        }

        session.pointer_down(pos);
        self.target = Some(Target::Gesture);
    }

    fn drag(&mut self, pos: Pos2, session: &mut CanvasSession) {
        let Some(target) = self.target.as_mut() else {
            return;
        };
        match target {
            Target::Gesture => session.pointer_move(pos),
            Target::PendingClick { pressed_at, .. } => {
                if pressed_at.distance(pos) > CLICK_SLOP {
                    session.pointer_down(*pressed_at);
                    session.pointer_move(pos);
                    *target = Target::Gesture;
                }
            }
            Target::Strip { id, grab, moved } => {
                if let Err(e) = session.drag_tape(id, pos - *grab) {
                    log::debug!("Drag refused: {e}");
                }
                *moved = true;
            }
            Target::Resize { id, start, last } => {
                let Some(transform) = resized(start, pos) else {
                    return;
                };
                if session.preview_transform(id, transform).is_ok() {
                    *last = Some(transform);
                }
            }
            Target::Rotate { id, start, handle, last } => {
                let transform = rotated(start, *handle, pos);
                if session.preview_transform(id, transform).is_ok() {
                    *last = Some(transform);
                }
            }
        }
    }

    fn release(&mut self, pos: Pos2, session: &mut CanvasSession) {
        let Some(target) = self.target.take() else {
            return;
        };
        match target {
            Target::Gesture => session.pointer_up(),
            Target::PendingClick { id, .. } => {
                session.click_tape(&id);
            }
            Target::Strip { id, grab, moved } => {
                if !moved {
                    session.click_tape(&id);
                } else if let Err(e) = session.end_tape_drag(&id, pos - grab) {
                    log::debug!("Drag refused: {e}");
                }
            }
            Target::Resize { id, last, .. } | Target::Rotate { id, last, .. } => {
                if let Some(transform) = last {
                    if let Err(e) = session.transform_tape(&id, transform) {
                        log::debug!("Transform refused: {e}");
                    }
                }
            }
        }
    }
}

/// Handle of a selected, unlocked strip under `pos`.
fn handle_under(pos: Pos2, session: &CanvasSession) -> Option<Target> {
    let page = session.page();
    session.selection().iter().find_map(|id| {
        let tape = page.tape(id).filter(|t| !t.is_locked)?;
        let start = tape.geometry();
        let handles = TapeHandles::of(&start);
        if geometry::is_point_near_handle(pos, handles.resize) {
            Some(Target::Resize { id: id.clone(), start, last: None })
        } else if geometry::is_point_near_handle(pos, handles.rotate) {
            Some(Target::Rotate {
                id: id.clone(),
                start,
                handle: handles.rotate,
                last: None,
            })
        } else {
            None
        }
    })
}

/// Size from dragging the far corner to `pointer`, measured in the strip's own frame.
///
/// None when either side would be thinner than `MIN_TAPE_EXTENT`; the drag
/// then keeps its last accepted size.
fn resized(start: &TapeGeometry, pointer: Pos2) -> Option<TapeTransform> {
    let local = geometry::rotate_about(pointer, start.origin, -start.rotation);
    let (width, height) = (local.x - start.origin.x, local.y - start.origin.y);
    if width.abs() < MIN_TAPE_EXTENT || height.abs() < MIN_TAPE_EXTENT {
        return None;
    }
    Some(TapeTransform {
        x: start.origin.x,
        y: start.origin.y,
        width,
        height,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: start.rotation,
    })
}

/// Rotation about the origin that carries the handle from `handle` to `pointer`.
fn rotated(start: &TapeGeometry, handle: Pos2, pointer: Pos2) -> TapeTransform {
    let from = (handle - start.origin).angle();
    let to = (pointer - start.origin).angle();
    TapeTransform {
        x: start.origin.x,
        y: start.origin.y,
        width: start.size.x,
        height: start.size.y,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: start.rotation + (to - from).to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::input::InputLocation;
    use crate::page::Page;
    use crate::tape::{TapeColor, TapeStrip};
    use crate::tools::ToolSettings;
    use egui::pos2;

    fn at(x: f32, y: f32) -> InputLocation {
        InputLocation { position: pos2(x, y), is_in_canvas: true }
    }

    fn session_with_strip() -> (CanvasSession, TapeId) {
        let mut session = CanvasSession::new(Page::new("Router"), ToolSettings::default());
        let tape = TapeStrip::new(pos2(100.0, 100.0), 100.0, 40.0, TapeColor::Yellow);
        let id = tape.id.clone();
        session.apply_page_update(Command::AddTape(tape));
        (session, id)
    }

    #[test]
    fn test_tap_on_strip_reveals_with_pen() {
        let (mut session, id) = session_with_strip();
        let mut router = PointerRouter::new();
        router.route(&InputEvent::PointerDown { location: at(150.0, 120.0) }, &mut session);
        router.route(&InputEvent::PointerUp { location: at(150.0, 120.0) }, &mut session);

        assert!(session.page().tape(&id).unwrap().is_revealed);
        assert!(session.page().strokes().is_empty());
    }

    #[test]
    fn test_drawing_across_strip_does_not_reveal() {
        let (mut session, id) = session_with_strip();
        let mut router = PointerRouter::new();
        router.route(&InputEvent::PointerDown { location: at(150.0, 120.0) }, &mut session);
        router.route(&InputEvent::PointerMove { location: at(170.0, 125.0) }, &mut session);
        router.route(&InputEvent::PointerUp { location: at(170.0, 125.0) }, &mut session);

        assert!(!session.page().tape(&id).unwrap().is_revealed);
        assert_eq!(session.page().strokes()[0].points().len(), 2);
    }

    #[test]
    fn test_select_drag_moves_strip() {
        let (mut session, id) = session_with_strip();
        session.set_tool(ToolKind::Select);
        let mut router = PointerRouter::new();
        router.route(&InputEvent::PointerDown { location: at(110.0, 110.0) }, &mut session);
        router.route(&InputEvent::PointerMove { location: at(130.0, 150.0) }, &mut session);
        router.route(&InputEvent::PointerUp { location: at(140.0, 160.0) }, &mut session);

        assert_eq!(session.page().tape(&id).unwrap().position(), pos2(130.0, 150.0));
        assert!(!router.is_busy());
    }

    #[test]
    fn test_resize_handle_commits_size() {
        let (mut session, id) = session_with_strip();
        session.set_tool(ToolKind::Select);
        session.click_tape(&id);
        let mut router = PointerRouter::new();
        router.route(&InputEvent::PointerDown { location: at(200.0, 140.0) }, &mut session);
        router.route(&InputEvent::PointerMove { location: at(260.0, 160.0) }, &mut session);
        router.route(&InputEvent::PointerUp { location: at(260.0, 160.0) }, &mut session);

        let tape = session.page().tape(&id).unwrap();
        assert_eq!((tape.width, tape.height), (160.0, 60.0));
        assert_eq!(tape.position(), pos2(100.0, 100.0));
    }

    #[test]
    fn test_resize_keeps_last_size_above_minimum() {
        let (mut session, id) = session_with_strip();
        session.set_tool(ToolKind::Select);
        session.click_tape(&id);
        let mut router = PointerRouter::new();
        router.route(&InputEvent::PointerDown { location: at(200.0, 140.0) }, &mut session);
        router.route(&InputEvent::PointerMove { location: at(130.0, 120.0) }, &mut session);
        router.route(&InputEvent::PointerMove { location: at(102.0, 100.0) }, &mut session);
        router.route(&InputEvent::PointerUp { location: at(102.0, 100.0) }, &mut session);

        let tape = session.page().tape(&id).unwrap();
        assert_eq!((tape.width, tape.height), (30.0, 20.0));
    }

    #[test]
    fn test_collapsed_resize_commits_nothing() {
        let (mut session, id) = session_with_strip();
        session.set_tool(ToolKind::Select);
        session.click_tape(&id);
        let mut router = PointerRouter::new();
        router.route(&InputEvent::PointerDown { location: at(200.0, 140.0) }, &mut session);
        router.route(&InputEvent::PointerMove { location: at(100.0, 100.0) }, &mut session);
        router.route(&InputEvent::PointerUp { location: at(100.0, 100.0) }, &mut session);

        let tape = session.page().tape(&id).unwrap();
        assert_eq!((tape.width, tape.height), (100.0, 40.0));
        assert!(resized(&tape.geometry(), pos2(103.0, 160.0)).is_none());
    }

    #[test]
    fn test_rotation_follows_pointer() {
        let start = TapeStrip::new(pos2(0.0, 0.0), 100.0, 40.0, TapeColor::Yellow).geometry();
        let transform = rotated(&start, pos2(100.0, 0.0), pos2(0.0, 100.0));
        assert!((transform.rotation - 90.0).abs() < 1e-3);
    }
}
