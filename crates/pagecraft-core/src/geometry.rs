//! Resize and move constraint solver.
//!
//! Every function here is pure: it takes geometry captured at gesture start
//! plus a document-space delta and returns the clamped result. Geometry never
//! fails; out-of-range deltas are clamped to the nearest valid result.

use crate::config::CanvasConfig;
use crate::selection::{AxisEdge, HandleKind};
use kurbo::{Point, Rect, Size, Vec2};

/// Resolve one axis of a resize.
///
/// Returns the new `(position, size)` for that axis.
fn resize_axis(position: f64, size: f64, min: f64, delta: f64, edge: AxisEdge) -> (f64, f64) {
    match edge {
        AxisEdge::Fixed => (position, size),
        AxisEdge::Far => (position, (size + delta).max(min)),
        AxisEdge::Near => {
            // Cap the shrinking delta first; size and position are then both
            // derived from the same clamped value.
            let max_delta = size - min;
            let delta = delta.min(max_delta);
            (position + delta, size - delta)
        }
    }
}

/// Resize an item from its gesture-start geometry.
///
/// `start` is the item's bounds when the gesture began and `delta` is the
/// total document-space pointer delta since then.
pub fn resize(start: Rect, handle: HandleKind, delta: Vec2, config: &CanvasConfig) -> Rect {
    let horizontal = handle.horizontal();
    let vertical = handle.vertical();

    let (mut x, mut width) = resize_axis(start.x0, start.width(), config.min_width, delta.x, horizontal);
    let (mut y, mut height) = resize_axis(start.y0, start.height(), config.min_height, delta.y, vertical);

    if x + width > config.page_width {
        if horizontal == AxisEdge::Far {
            width = config.page_width - x;
        } else {
            x = config.page_width - width;
        }
    }
    if y + height > config.page_height {
        if vertical == AxisEdge::Far {
            height = config.page_height - y;
        } else {
            y = config.page_height - height;
        }
    }

    // Pinning to the origin keeps the untouched far edge where it was.
    if x < 0.0 {
        x = 0.0;
        if horizontal == AxisEdge::Near {
            width = start.x1.max(config.min_width);
        }
    }
    if y < 0.0 {
        y = 0.0;
        if vertical == AxisEdge::Near {
            height = start.y1.max(config.min_height);
        }
    }

    log::trace!(
        "resize {} by ({:.1}, {:.1}) -> ({:.1}, {:.1}) {:.1}x{:.1}",
        handle, delta.x, delta.y, x, y, width, height
    );
    Rect::new(x, y, x + width, y + height)
}

/// Clamp one axis of a position so `[position, position + extent]` stays in `[0, page]`.
fn clamp_axis(position: f64, extent: f64, page: f64) -> f64 {
    position.min(page - extent).max(0.0)
}

/// Translate an item by a document-space delta, keeping it on the page.
pub fn translate(start: Point, size: Size, delta: Vec2, config: &CanvasConfig) -> Point {
    Point::new(
        clamp_axis(start.x + delta.x, size.width, config.page_width),
        clamp_axis(start.y + delta.y, size.height, config.page_height),
    )
}

/// Position that centers an item of `size` on `point`, kept on the page.
pub fn center_on(point: Point, size: Size, config: &CanvasConfig) -> Point {
    let origin = Point::new(point.x - size.width / 2.0, point.y - size.height / 2.0);
    translate(origin, size, Vec2::ZERO, config)
}

/// Bring arbitrary geometry into a state that satisfies every invariant:
/// size at least the minimum and at most the page, fully on the page.
pub fn clamp_to_page(position: Point, size: Size, config: &CanvasConfig) -> (Point, Size) {
    let size = Size::new(
        size.width.max(config.min_width).min(config.page_width),
        size.height.max(config.min_height).min(config.page_height),
    );
    let position = translate(position, size, Vec2::ZERO, config);
    (position, size)
}

/// Whether geometry satisfies the size and bounds invariants.
pub fn is_valid(position: Point, size: Size, config: &CanvasConfig) -> bool {
    size.width >= config.min_width
        && size.height >= config.min_height
        && position.x >= 0.0
        && position.y >= 0.0
        && position.x + size.width <= config.page_width
        && position.y + size.height <= config.page_height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CanvasConfig {
        CanvasConfig::default()
    }

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::new(x, y, x + w, y + h)
    }

    #[test]
    fn test_bottom_right_grow() {
        let result = resize(rect(0.0, 0.0, 150.0, 80.0), HandleKind::BottomRight, Vec2::new(50.0, 20.0), &config());
        assert!((result.width() - 200.0).abs() < f64::EPSILON);
        assert!((result.height() - 100.0).abs() < f64::EPSILON);
        assert!((result.x0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bottom_right_shrink_stops_at_minimum() {
        let result = resize(rect(0.0, 0.0, 150.0, 80.0), HandleKind::BottomRight, Vec2::new(-100.0, -50.0), &config());
        assert!((result.width() - 100.0).abs() < f64::EPSILON);
        assert!((result.height() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_top_left_moves_origin() {
        let result = resize(rect(100.0, 100.0, 150.0, 80.0), HandleKind::TopLeft, Vec2::new(30.0, 20.0), &config());
        assert!((result.x0 - 130.0).abs() < f64::EPSILON);
        assert!((result.y0 - 120.0).abs() < f64::EPSILON);
        assert!((result.x1 - 250.0).abs() < f64::EPSILON);
        assert!((result.y1 - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_near_edge_clamp_keeps_far_edge() {
        // Shrinking far past the minimum stops with the right edge untouched.
        let result = resize(rect(100.0, 100.0, 150.0, 80.0), HandleKind::Left, Vec2::new(500.0, 0.0), &config());
        assert!((result.width() - 100.0).abs() < f64::EPSILON);
        assert!((result.x1 - 250.0).abs() < f64::EPSILON);
        assert!((result.height() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edge_handles_touch_one_axis() {
        let start = rect(100.0, 100.0, 150.0, 80.0);
        let top = resize(start, HandleKind::Top, Vec2::new(40.0, -10.0), &config());
        assert!((top.x0 - 100.0).abs() < f64::EPSILON);
        assert!((top.width() - 150.0).abs() < f64::EPSILON);
        assert!((top.y0 - 90.0).abs() < f64::EPSILON);
        assert!((top.height() - 90.0).abs() < f64::EPSILON);

        let right = resize(start, HandleKind::Right, Vec2::new(25.0, 60.0), &config());
        assert!((right.width() - 175.0).abs() < f64::EPSILON);
        assert!((right.height() - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grow_past_page_edge_is_trimmed() {
        let result = resize(rect(500.0, 700.0, 100.0, 80.0), HandleKind::BottomRight, Vec2::new(100.0, 100.0), &config());
        assert!((result.x1 - 612.0).abs() < f64::EPSILON);
        assert!((result.y1 - 792.0).abs() < f64::EPSILON);
        assert!((result.x0 - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grow_past_origin_pins_to_zero() {
        let result = resize(rect(20.0, 30.0, 150.0, 80.0), HandleKind::TopLeft, Vec2::new(-100.0, -100.0), &config());
        assert!((result.x0).abs() < f64::EPSILON);
        assert!((result.y0).abs() < f64::EPSILON);
        // Opposite edges stay where they were.
        assert!((result.x1 - 170.0).abs() < f64::EPSILON);
        assert!((result.y1 - 110.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_near_edge_no_drift() {
        let start = rect(200.0, 300.0, 150.0, 80.0);
        let first = resize(start, HandleKind::TopLeft, Vec2::new(30.0, 15.0), &config());
        let second = resize(first, HandleKind::TopLeft, Vec2::new(-30.0, -15.0), &config());
        assert_eq!(second, start);
    }

    #[test]
    fn test_translate_clamps_each_axis() {
        let size = Size::new(150.0, 80.0);
        let moved = translate(Point::new(10.0, 10.0), size, Vec2::new(-50.0, 30.0), &config());
        assert_eq!(moved, Point::new(0.0, 40.0));

        let moved = translate(Point::new(400.0, 700.0), size, Vec2::new(500.0, 500.0), &config());
        assert_eq!(moved, Point::new(462.0, 712.0));
    }

    #[test]
    fn test_center_on_keeps_item_on_page() {
        let size = Size::new(150.0, 80.0);
        assert_eq!(center_on(Point::ZERO, size, &config()), Point::ZERO);
        assert_eq!(center_on(Point::new(300.0, 300.0), size, &config()), Point::new(225.0, 260.0));
        assert_eq!(center_on(Point::new(612.0, 792.0), size, &config()), Point::new(462.0, 712.0));
    }

    #[test]
    fn test_clamp_to_page_normalizes() {
        let (position, size) = clamp_to_page(Point::new(-20.0, 900.0), Size::new(10.0, 2000.0), &config());
        assert!(is_valid(position, size, &config()));
        assert!((size.width - 100.0).abs() < f64::EPSILON);
        assert!((size.height - 792.0).abs() < f64::EPSILON);
        assert_eq!(position, Point::ZERO);
    }
}
