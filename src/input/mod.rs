use egui::{Context, PointerButton, Pos2, Rect};

mod router;
pub use router::{CLICK_SLOP, PointerRouter};

/// Represents the location where an input event occurred
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputLocation {
    /// The position in page coordinates
    pub position: Pos2,
    /// Whether this position is within the canvas bounds
    pub is_in_canvas: bool,
}

/// Pointer input in page coordinates. Only the primary button is reported.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { location: InputLocation },
    PointerMove { location: InputLocation },
    PointerUp { location: InputLocation },
    /// The pointer left the window while a button was held
    PointerLeave { last_known_location: InputLocation },
}

/// Converts raw egui input over the canvas into [`InputEvent`]s.
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    canvas_rect: Option<Rect>,
    pressed: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the canvas rectangle. Page coordinates are relative to its corner.
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = Some(rect);
    }

    fn make_location(&self, screen_pos: Pos2) -> InputLocation {
        match self.canvas_rect {
            Some(rect) => InputLocation {
                position: screen_pos - rect.min.to_vec2(),
                is_in_canvas: rect.contains(screen_pos),
            },
            None => InputLocation {
                position: screen_pos,
                is_in_canvas: false,
            },
        }
    }

    /// Process raw egui input and generate our InputEvents
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let hover = input.pointer.hover_pos();

            if input.pointer.button_pressed(PointerButton::Primary) {
                if let Some(pos) = hover {
                    let location = self.make_location(pos);
                    // Presses that start outside the canvas belong to the panels.
                    if location.is_in_canvas {
                        self.pressed = true;
                        events.push(InputEvent::PointerDown { location });
                    }
                }
            }

            if let Some(pos) = hover {
                if self.pressed && Some(pos) != self.last_pointer_pos {
                    events.push(InputEvent::PointerMove {
                        location: self.make_location(pos),
                    });
                }
                self.last_pointer_pos = Some(pos);
            } else if let Some(last) = self.last_pointer_pos.take() {
                if self.pressed {
                    self.pressed = false;
                    events.push(InputEvent::PointerLeave {
                        last_known_location: self.make_location(last),
                    });
                }
            }

            if self.pressed && input.pointer.button_released(PointerButton::Primary) {
                self.pressed = false;
                let pos = hover.or(self.last_pointer_pos).unwrap_or_default();
                events.push(InputEvent::PointerUp {
                    location: self.make_location(pos),
                });
            }
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_locations_are_canvas_relative() {
        let mut handler = InputHandler::new();
        handler.set_canvas_rect(Rect::from_min_max(pos2(200.0, 50.0), pos2(600.0, 450.0)));

        let inside = handler.make_location(pos2(250.0, 60.0));
        assert_eq!(inside.position, pos2(50.0, 10.0));
        assert!(inside.is_in_canvas);
        assert!(!handler.make_location(pos2(10.0, 10.0)).is_in_canvas);
    }
}
