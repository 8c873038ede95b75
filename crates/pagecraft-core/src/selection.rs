//! Resize handles and manipulation state.

use crate::item::CanvasItem;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 6.0;

/// One of the eight resize grab points of a selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandleKind {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

/// What a handle does to one axis of the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisEdge {
    /// The handle leaves this axis alone.
    Fixed,
    /// Moves the edge on the origin side; the opposite edge stays put,
    /// so both position and size change.
    Near,
    /// Moves the edge away from the origin; position stays put.
    Far,
}

impl HandleKind {
    /// All handles, clockwise from the top-left corner.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::Top,
        HandleKind::TopRight,
        HandleKind::Right,
        HandleKind::BottomRight,
        HandleKind::Bottom,
        HandleKind::BottomLeft,
        HandleKind::Left,
    ];

    /// Effect on the x axis.
    pub fn horizontal(self) -> AxisEdge {
        match self {
            HandleKind::TopLeft | HandleKind::BottomLeft | HandleKind::Left => AxisEdge::Near,
            HandleKind::TopRight | HandleKind::BottomRight | HandleKind::Right => AxisEdge::Far,
            HandleKind::Top | HandleKind::Bottom => AxisEdge::Fixed,
        }
    }

    /// Effect on the y axis.
    pub fn vertical(self) -> AxisEdge {
        match self {
            HandleKind::TopLeft | HandleKind::TopRight | HandleKind::Top => AxisEdge::Near,
            HandleKind::BottomLeft | HandleKind::BottomRight | HandleKind::Bottom => AxisEdge::Far,
            HandleKind::Left | HandleKind::Right => AxisEdge::Fixed,
        }
    }

    pub fn is_corner(self) -> bool {
        self.horizontal() != AxisEdge::Fixed && self.vertical() != AxisEdge::Fixed
    }

    pub fn name(self) -> &'static str {
        match self {
            HandleKind::TopLeft => "top-left",
            HandleKind::Top => "top",
            HandleKind::TopRight => "top-right",
            HandleKind::Right => "right",
            HandleKind::BottomRight => "bottom-right",
            HandleKind::Bottom => "bottom",
            HandleKind::BottomLeft => "bottom-left",
            HandleKind::Left => "left",
        }
    }

    /// Location of this handle on a rectangle.
    pub fn anchor(self, bounds: Rect) -> Point {
        let x = match self.horizontal() {
            AxisEdge::Near => bounds.x0,
            AxisEdge::Far => bounds.x1,
            AxisEdge::Fixed => bounds.center().x,
        };
        let y = match self.vertical() {
            AxisEdge::Near => bounds.y0,
            AxisEdge::Far => bounds.y1,
            AxisEdge::Fixed => bounds.center().y,
        };
        Point::new(x, y)
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HandleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|handle| handle.name() == s)
            .ok_or_else(|| format!("unknown handle: {}", s))
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    /// Position in document coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in document coordinates) hits this handle.
    /// `tolerance` should be adjusted for zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point.x - self.position.x).abs() <= tolerance
            && (point.y - self.position.y).abs() <= tolerance
    }
}

/// Get the resize handles for an item.
pub fn get_handles(item: &CanvasItem) -> Vec<Handle> {
    let bounds = item.bounds();
    HandleKind::ALL
        .iter()
        .map(|&kind| Handle::new(kind.anchor(bounds), kind))
        .collect()
}

/// Find which handle (if any) is hit at the given document point.
pub fn hit_test_handles(item: &CanvasItem, point: Point, tolerance: f64) -> Option<HandleKind> {
    get_handles(item)
        .into_iter()
        .find(|handle| handle.hit_test(point, tolerance))
        .map(|handle| handle.kind)
}

/// What an active manipulation does to its item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationKind {
    Move,
    Resize(HandleKind),
}

/// State of an active move or resize gesture on a single item.
///
/// Every frame is computed from `original` plus the total pointer delta, so
/// intermediate frames never accumulate rounding drift.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    /// Index of the item in the collection.
    pub index: usize,
    pub kind: ManipulationKind,
    /// Pointer position at gesture start, in screen coordinates.
    pub start_point: Point,
    /// Latest pointer position, in screen coordinates.
    pub current_point: Point,
    /// The item as it was when the gesture started.
    pub original: CanvasItem,
}

impl ManipulationState {
    pub fn new(index: usize, kind: ManipulationKind, start_point: Point, original: CanvasItem) -> Self {
        Self {
            index,
            kind,
            start_point,
            current_point: start_point,
            original,
        }
    }

    /// Screen-space delta since gesture start.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }
}
