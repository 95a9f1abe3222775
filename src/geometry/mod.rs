mod hit_testing;

pub use hit_testing::{
    is_point_near_handle, is_point_near_vertex, normalized_rect, point_in_polygon,
    point_in_rotated_rect, point_on_polygon_boundary, rotate_about, HANDLE_HIT_RADIUS,
};
