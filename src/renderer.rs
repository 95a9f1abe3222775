use egui::emath::Rot2;
use egui::{Color32, Mesh, Painter, Pos2, Rect, Shape, Stroke as PaintStroke, TextureId, Vec2, pos2, vec2};

use crate::page::{Background, Orientation, Page};
use crate::selection::Selection;
use crate::session::CanvasSession;
use crate::stroke::{MutableStroke, Stroke, StrokeTool};
use crate::tape::{TapeGeometry, TapeStrip};
use crate::texture_manager::TextureManager;

pub const SELECTION_COLOR: Color32 = Color32::from_rgb(30, 144, 255);
pub const HANDLE_RADIUS: f32 = 6.0;
/// Tint applied to imported page images.
pub const BACKGROUND_IMAGE_OPACITY: f32 = 0.8;
const GRID_SPACING: f32 = 24.0;
const LASSO_DASH: f32 = 6.0;

/// Where the handles of a selected strip sit, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapeHandles {
    /// Far corner; dragging it resizes.
    pub resize: Pos2,
    /// Beyond the top edge; dragging it rotates about the origin.
    pub rotate: Pos2,
}

impl TapeHandles {
    pub fn of(geometry: &TapeGeometry) -> Self {
        let corners = geometry.corners();
        let top_mid = pos2((corners[0].x + corners[1].x) / 2.0, (corners[0].y + corners[1].y) / 2.0);
        let up = crate::geometry::rotate_about(pos2(0.0, -24.0), Pos2::ZERO, geometry.rotation).to_vec2();
        Self {
            resize: corners[2],
            rotate: top_mid + up,
        }
    }
}

/// Colors a page background is painted with.
pub fn background_color(background: Background) -> Color32 {
    match background {
        Background::White | Background::Grid | Background::Dots => Color32::WHITE,
        Background::Dark => Color32::from_rgb(0x1f, 0x29, 0x37),
        Background::Paper => Color32::from_rgb(0xfd, 0xfb, 0xf7),
    }
}

fn pattern_color(background: Background) -> Color32 {
    match background {
        Background::Dark => Color32::from_gray(70),
        _ => Color32::from_rgb(0xe5, 0xe7, 0xeb),
    }
}

/// Turns a session into paint shapes, back to front.
///
/// Page coordinates are offset by `canvas.min`. `background_texture` is the
/// already-uploaded page image, if any.
pub fn scene_shapes(session: &CanvasSession, canvas: Rect, background_texture: Option<TextureId>) -> Vec<Shape> {
    let page = session.page();
    let offset = canvas.min.to_vec2();
    let mut shapes = Vec::new();

    background_shapes(page, canvas, &mut shapes);
    if let (Some(texture), Some(image)) = (background_texture, &page.background_image) {
        shapes.push(background_image_shape(
            texture,
            canvas,
            vec2(image.width as f32, image.height as f32),
            page.orientation,
        ));
    }

    let erase_color = background_color(page.background);
    for stroke in page.strokes() {
        shapes.push(committed_stroke_shape(stroke, offset, erase_color));
    }
    if let Some(stroke) = session.in_progress_stroke() {
        shapes.push(live_stroke_shape(stroke, offset, erase_color));
    }

    for tape in page.tapes() {
        shapes.extend(tape_shapes(tape, offset));
    }

    selection_shapes(page, session.selection(), offset, &mut shapes);

    if let Some(path) = session.lasso_path() {
        let points: Vec<Pos2> = path.iter().map(|p| *p + offset).collect();
        shapes.extend(Shape::dashed_line(
            &points,
            PaintStroke::new(1.5, SELECTION_COLOR),
            LASSO_DASH,
            LASSO_DASH,
        ));
    }

    shapes
}

fn background_shapes(page: &Page, canvas: Rect, shapes: &mut Vec<Shape>) {
    shapes.push(Shape::rect_filled(canvas, 0.0, background_color(page.background)));
    let line = PaintStroke::new(1.0, pattern_color(page.background));

    match page.background {
        Background::Grid => {
            let mut x = canvas.left() + GRID_SPACING;
            while x < canvas.right() {
                shapes.push(Shape::line_segment([pos2(x, canvas.top()), pos2(x, canvas.bottom())], line));
                x += GRID_SPACING;
            }
            let mut y = canvas.top() + GRID_SPACING;
            while y < canvas.bottom() {
                shapes.push(Shape::line_segment([pos2(canvas.left(), y), pos2(canvas.right(), y)], line));
                y += GRID_SPACING;
            }
        }
        Background::Dots => {
            let mut y = canvas.top() + GRID_SPACING;
            while y < canvas.bottom() {
                let mut x = canvas.left() + GRID_SPACING;
                while x < canvas.right() {
                    shapes.push(Shape::circle_filled(pos2(x, y), 1.2, line.color));
                    x += GRID_SPACING;
                }
                y += GRID_SPACING;
            }
        }
        Background::Paper => {
            // Ruled lines with a margin
            let mut y = canvas.top() + GRID_SPACING * 3.0;
            while y < canvas.bottom() {
                shapes.push(Shape::line_segment([pos2(canvas.left(), y), pos2(canvas.right(), y)], line));
                y += GRID_SPACING;
            }
            let margin = canvas.left() + 64.0;
            shapes.push(Shape::line_segment(
                [pos2(margin, canvas.top()), pos2(margin, canvas.bottom())],
                PaintStroke::new(1.0, Color32::from_rgb(0xfc, 0xa5, 0xa5)),
            ));
        }
        Background::White | Background::Dark => {}
    }
}

/// The page image scaled to the canvas width. Landscape pages show it turned
/// a quarter turn about its center.
fn background_image_shape(texture: TextureId, canvas: Rect, image_size: Vec2, orientation: Orientation) -> Shape {
    let (fit_width, turned) = match orientation {
        Orientation::Portrait => (canvas.width(), false),
        Orientation::Landscape => (canvas.height(), true),
    };
    let scale = if image_size.x > 0.0 { fit_width / image_size.x } else { 1.0 };
    let size = image_size * scale;
    let rect = if turned {
        Rect::from_center_size(canvas.center(), size)
    } else {
        Rect::from_min_size(canvas.min, size)
    };

    let tint = Color32::WHITE.gamma_multiply(BACKGROUND_IMAGE_OPACITY);
    let mut mesh = Mesh::with_texture(texture);
    mesh.add_rect_with_uv(rect, Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)), tint);
    if turned {
        mesh.rotate(Rot2::from_angle(std::f32::consts::FRAC_PI_2), rect.center());
    }
    Shape::mesh(mesh)
}

fn ink_shape(points: &[Pos2], offset: Vec2, width: f32, color: Color32) -> Shape {
    match points {
        [only] => Shape::circle_filled(*only + offset, width / 2.0, color),
        _ => Shape::line(points.iter().map(|p| *p + offset).collect(), PaintStroke::new(width, color)),
    }
}

fn ink_color(tool: StrokeTool, color: Color32, opacity: f32, erase_color: Color32) -> Color32 {
    match tool {
        StrokeTool::Eraser => erase_color,
        StrokeTool::Pen | StrokeTool::Highlighter => color.gamma_multiply(opacity),
    }
}

fn committed_stroke_shape(stroke: &Stroke, offset: Vec2, erase_color: Color32) -> Shape {
    let color = ink_color(stroke.tool(), stroke.color(), stroke.opacity(), erase_color);
    ink_shape(stroke.points(), offset, stroke.width(), color)
}

fn live_stroke_shape(stroke: &MutableStroke, offset: Vec2, erase_color: Color32) -> Shape {
    let color = ink_color(stroke.tool(), stroke.color(), stroke.opacity(), erase_color);
    ink_shape(stroke.points(), offset, stroke.width(), color)
}

/// Reorders `points` clockwise on screen, which `convex_polygon` expects.
/// Strips dragged leftwards or upwards come out counter-clockwise.
fn clockwise(mut points: [Pos2; 4]) -> [Pos2; 4] {
    let twice_area: f32 = (0..4)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % 4]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    if twice_area < 0.0 {
        points.reverse();
    }
    points
}

pub fn tape_shapes(tape: &TapeStrip, offset: Vec2) -> Vec<Shape> {
    let corners = clockwise(tape.geometry().corners().map(|c| c + offset));
    let fill = tape.color.color32().gamma_multiply(tape.display_opacity());
    let edge = if tape.is_revealed {
        PaintStroke::new(1.0, tape.color.color32().gamma_multiply(0.6))
    } else {
        PaintStroke::NONE
    };

    let mut shapes = vec![Shape::convex_polygon(corners.to_vec(), fill, edge)];
    if tape.is_locked {
        let center = tape.geometry().center() + offset;
        shapes.push(Shape::circle_stroke(center, 4.0, PaintStroke::new(1.5, Color32::from_gray(90))));
    }
    shapes
}

fn selection_shapes(page: &Page, selection: &Selection, offset: Vec2, shapes: &mut Vec<Shape>) {
    let outline = PaintStroke::new(1.5, SELECTION_COLOR);
    for id in selection.iter() {
        let Some(geometry) = page.tape_geometry(id) else {
            continue;
        };
        let corners = geometry.corners().map(|c| c + offset);
        shapes.push(Shape::closed_line(corners.to_vec(), outline));

        if page.tape(id).is_some_and(|t| t.is_locked) {
            continue;
        }
        let handles = TapeHandles::of(&geometry);
        for handle in [handles.resize, handles.rotate] {
            shapes.push(Shape::circle_filled(handle + offset, HANDLE_RADIUS, SELECTION_COLOR));
            shapes.push(Shape::circle_stroke(handle + offset, HANDLE_RADIUS, PaintStroke::new(1.0, Color32::WHITE)));
        }
    }
}

/// Paints the active page and keeps its background texture loaded.
#[derive(Debug)]
pub struct Renderer {
    textures: TextureManager,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            textures: TextureManager::new(8),
        }
    }

    /// Renders the current frame
    pub fn render(&mut self, ctx: &egui::Context, painter: &Painter, canvas: Rect, session: &CanvasSession) {
        let texture = session
            .page()
            .background_image
            .as_ref()
            .and_then(|image| self.textures.get_or_load(ctx, image).ok());
        painter.extend(scene_shapes(session, canvas, texture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::tape::TapeColor;
    use crate::tools::{ToolKind, ToolSettings};

    fn canvas() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 300.0))
    }

    #[test]
    fn test_clockwise_fixes_leftward_strip() {
        let tape = TapeStrip::new(pos2(200.0, 0.0), -100.0, 40.0, TapeColor::Yellow);
        let corners = clockwise(tape.geometry().corners());
        let twice_area: f32 = (0..4)
            .map(|i| {
                let (a, b) = (corners[i], corners[(i + 1) % 4]);
                a.x * b.y - b.x * a.y
            })
            .sum();
        assert!(twice_area > 0.0);
    }

    #[test]
    fn test_single_point_stroke_is_a_dot() {
        let shape = ink_shape(&[pos2(5.0, 5.0)], Vec2::ZERO, 4.0, Color32::BLACK);
        assert!(matches!(shape, Shape::Circle(c) if c.radius == 2.0));
    }

    #[test]
    fn test_selected_strip_gets_handles() {
        let mut session = CanvasSession::new(Page::new("Render"), ToolSettings::default());
        let tape = TapeStrip::new(pos2(10.0, 10.0), 100.0, 40.0, TapeColor::Blue);
        let id = tape.id.clone();
        session.apply_page_update(Command::AddTape(tape));

        let plain = scene_shapes(&session, canvas(), None).len();
        session.set_tool(ToolKind::Select);
        session.click_tape(&id);
        // Outline plus two handles of two shapes each
        assert_eq!(scene_shapes(&session, canvas(), None).len(), plain + 5);
    }

    #[test]
    fn test_handles_follow_rotation() {
        let tape = TapeStrip::new(pos2(0.0, 0.0), 100.0, 40.0, TapeColor::Yellow);
        let handles = TapeHandles::of(&tape.geometry());
        assert_eq!(handles.resize, pos2(100.0, 40.0));
        assert!((handles.rotate - pos2(50.0, -24.0)).length() < 1e-4);
    }
}
