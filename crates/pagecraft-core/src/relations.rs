//! Directional spatial relations between items.
//!
//! For each item and each direction the analyzer picks the nearest item whose
//! center lies on that side and which overlaps it on the perpendicular axis.
//! Relations are derived data: they are recomputed from the current items on
//! every call and never stored on an item.

use crate::item::CanvasItem;
use serde::{Deserialize, Serialize};

/// A direction from an item towards a neighbor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Above,
        Direction::Below,
        Direction::Left,
        Direction::Right,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::Above => "above",
            Direction::Below => "below",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Above => Direction::Below,
            Direction::Below => Direction::Above,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Nearest neighbor per direction, as indexes into the analyzed slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelationSet {
    pub above: Option<usize>,
    pub below: Option<usize>,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

impl RelationSet {
    pub fn get(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Above => self.above,
            Direction::Below => self.below,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Whether `value` lies strictly between `min` and `max`.
fn strictly_between(min: f64, value: f64, max: f64) -> bool {
    min < value && value < max
}

/// Horizontal overlap: either item's center x lies strictly inside the
/// other's horizontal extent.
pub fn horizontal_overlap(a: &CanvasItem, b: &CanvasItem) -> bool {
    strictly_between(a.position.x, b.center().x, a.right())
        || strictly_between(b.position.x, a.center().x, b.right())
}

/// Vertical overlap: either item's center y lies strictly inside the
/// other's vertical extent.
pub fn vertical_overlap(a: &CanvasItem, b: &CanvasItem) -> bool {
    strictly_between(a.position.y, b.center().y, a.bottom())
        || strictly_between(b.position.y, a.center().y, b.bottom())
}

/// Signed distance of `other` from `item` along the direction's axis.
/// Positive means `other` lies in that direction.
fn offset(item: &CanvasItem, other: &CanvasItem, direction: Direction) -> f64 {
    let (from, to) = (item.center(), other.center());
    match direction {
        Direction::Above => from.y - to.y,
        Direction::Below => to.y - from.y,
        Direction::Left => from.x - to.x,
        Direction::Right => to.x - from.x,
    }
}

fn overlaps(item: &CanvasItem, other: &CanvasItem, direction: Direction) -> bool {
    match direction {
        Direction::Above | Direction::Below => horizontal_overlap(item, other),
        Direction::Left | Direction::Right => vertical_overlap(item, other),
    }
}

/// All items that qualify as a neighbor of `items[index]` in `direction`,
/// in collection order.
pub fn candidates(items: &[CanvasItem], index: usize, direction: Direction) -> Vec<usize> {
    let Some(item) = items.get(index) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter(|&(other_index, other)| {
            other_index != index
                && offset(item, other, direction) > 0.0
                && overlaps(item, other, direction)
        })
        .map(|(other_index, _)| other_index)
        .collect()
}

/// Nearest candidate in `direction`. Ties keep the earliest item in
/// collection order.
pub fn neighbor(items: &[CanvasItem], index: usize, direction: Direction) -> Option<usize> {
    let item = items.get(index)?;
    let mut best: Option<(usize, f64)> = None;
    for candidate in candidates(items, index, direction) {
        let distance = offset(item, &items[candidate], direction);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// Relations of a single item.
pub fn relations(items: &[CanvasItem], index: usize) -> RelationSet {
    RelationSet {
        above: neighbor(items, index, Direction::Above),
        below: neighbor(items, index, Direction::Below),
        left: neighbor(items, index, Direction::Left),
        right: neighbor(items, index, Direction::Right),
    }
}

/// Relations of every item, in collection order.
pub fn analyze(items: &[CanvasItem]) -> Vec<RelationSet> {
    (0..items.len()).map(|index| relations(items, index)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKind;
    use kurbo::{Point, Size};

    fn item(kind: ItemKind, x: f64, y: f64, w: f64, h: f64) -> CanvasItem {
        CanvasItem::new(kind, Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_stacked_items() {
        let items = vec![
            item(ItemKind::Text, 0.0, 0.0, 150.0, 80.0),
            item(ItemKind::Title, 0.0, 100.0, 150.0, 50.0),
        ];
        let title = relations(&items, 1);
        assert_eq!(title.above, Some(0));
        assert_eq!(title.below, None);
        assert_eq!(title.left, None);
        assert_eq!(title.right, None);

        let text = relations(&items, 0);
        assert_eq!(text.below, Some(1));
        assert_eq!(text.above, None);
    }

    #[test]
    fn test_nearest_candidate_wins() {
        let items = vec![
            item(ItemKind::Text, 0.0, 0.0, 150.0, 80.0),
            item(ItemKind::List, 0.0, 100.0, 150.0, 80.0),
            item(ItemKind::Table, 0.0, 300.0, 150.0, 80.0),
        ];
        assert_eq!(neighbor(&items, 2, Direction::Above), Some(1));
        assert_eq!(candidates(&items, 2, Direction::Above), vec![0, 1]);
        assert_eq!(neighbor(&items, 0, Direction::Below), Some(1));
    }

    #[test]
    fn test_side_by_side() {
        let items = vec![
            item(ItemKind::Figure, 0.0, 0.0, 150.0, 80.0),
            item(ItemKind::Text, 200.0, 20.0, 150.0, 80.0),
            item(ItemKind::Text, 400.0, 500.0, 150.0, 80.0),
        ];
        assert_eq!(neighbor(&items, 0, Direction::Right), Some(1));
        assert_eq!(neighbor(&items, 1, Direction::Left), Some(0));
        // Far below and without vertical overlap.
        assert_eq!(neighbor(&items, 1, Direction::Right), None);
    }

    #[test]
    fn test_overlap_is_either_way_containment() {
        // A narrow item whose center sits inside a wide one, but not vice versa.
        let wide = item(ItemKind::Text, 0.0, 0.0, 600.0, 40.0);
        let narrow = item(ItemKind::Text, 10.0, 100.0, 100.0, 40.0);
        assert!(horizontal_overlap(&wide, &narrow));
        assert!(horizontal_overlap(&narrow, &wide));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        // Each center sits exactly on the other's edge.
        let a = item(ItemKind::Text, 0.0, 0.0, 100.0, 40.0);
        let b = item(ItemKind::Text, 50.0, 100.0, 100.0, 40.0);
        let c = item(ItemKind::Text, 40.0, 100.0, 100.0, 40.0);
        assert!(!horizontal_overlap(&a, &b));
        assert!(horizontal_overlap(&a, &c));
    }

    #[test]
    fn test_equal_centers_are_not_neighbors() {
        let items = vec![
            item(ItemKind::Text, 0.0, 0.0, 150.0, 80.0),
            item(ItemKind::Title, 0.0, 0.0, 150.0, 80.0),
        ];
        assert_eq!(relations(&items, 0), RelationSet::default());
    }

    #[test]
    fn test_tie_keeps_first_in_order() {
        let items = vec![
            item(ItemKind::Text, 0.0, 200.0, 150.0, 80.0),
            item(ItemKind::Title, 0.0, 0.0, 150.0, 80.0),
            item(ItemKind::List, 20.0, 0.0, 150.0, 80.0),
        ];
        assert_eq!(neighbor(&items, 0, Direction::Above), Some(1));
    }

    #[test]
    fn test_out_of_range_index() {
        let items = vec![item(ItemKind::Text, 0.0, 0.0, 150.0, 80.0)];
        assert!(candidates(&items, 3, Direction::Above).is_empty());
        assert_eq!(neighbor(&items, 3, Direction::Below), None);
    }
}
