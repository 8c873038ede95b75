//! Placed items and the palette catalogue.

use crate::config::DEFAULT_ITEM_SIZE;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for items within a session.
pub type ItemId = Uuid;

/// The closed set of block types a layout is composed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Text,
    Title,
    List,
    Table,
    Figure,
}

/// Palette grouping of item kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaletteCategory {
    TextElements,
    VisualElements,
}

impl PaletteCategory {
    pub fn title(&self) -> &'static str {
        match self {
            PaletteCategory::TextElements => "Text elements",
            PaletteCategory::VisualElements => "Visual elements",
        }
    }
}

/// A palette entry that can be dragged onto the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    pub kind: ItemKind,
    pub label: &'static str,
    pub category: PaletteCategory,
    pub default_size: Size,
}

impl ItemKind {
    /// All kinds, ordered by legacy class id.
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Text,
        ItemKind::Title,
        ItemKind::List,
        ItemKind::Table,
        ItemKind::Figure,
    ];

    /// Numeric class used by the legacy backend schema.
    pub fn class_id(self) -> u8 {
        match self {
            ItemKind::Text => 0,
            ItemKind::Title => 1,
            ItemKind::List => 2,
            ItemKind::Table => 3,
            ItemKind::Figure => 4,
        }
    }

    /// Map a legacy class id back to a kind.
    pub fn from_class_id(class_id: u64) -> Option<Self> {
        Self::ALL.get(usize::try_from(class_id).ok()?).copied()
    }

    /// Lower-case name as used by the native schema.
    pub fn name(self) -> &'static str {
        match self {
            ItemKind::Text => "text",
            ItemKind::Title => "title",
            ItemKind::List => "list",
            ItemKind::Table => "table",
            ItemKind::Figure => "figure",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Text => "Text",
            ItemKind::Title => "Title",
            ItemKind::List => "List",
            ItemKind::Table => "Table",
            ItemKind::Figure => "Figure",
        }
    }

    pub fn category(self) -> PaletteCategory {
        match self {
            ItemKind::Text | ItemKind::Title | ItemKind::List => PaletteCategory::TextElements,
            ItemKind::Table | ItemKind::Figure => PaletteCategory::VisualElements,
        }
    }

    /// Palette entry for this kind.
    pub fn palette_entry(self) -> PaletteEntry {
        PaletteEntry {
            kind: self,
            label: self.label(),
            category: self.category(),
            default_size: DEFAULT_ITEM_SIZE,
        }
    }

    /// The full palette in display order.
    pub fn palette() -> Vec<PaletteEntry> {
        Self::ALL.iter().map(|kind| kind.palette_entry()).collect()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown item kind: {}", s))
    }
}

/// A block placed on the page. All geometry is in document units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasItem {
    pub(crate) id: ItemId,
    pub kind: ItemKind,
    /// Display name, informational only.
    pub label: String,
    /// Top-left corner.
    pub position: Point,
    pub size: Size,
}

impl CanvasItem {
    /// Create a new item with a fresh id.
    pub fn new(kind: ItemKind, position: Point, size: Size) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            label: kind.label().to_string(),
            position,
            size,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Clone this item under a newly minted id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// Bounding rectangle in document space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.position.x + self.size.width / 2.0,
            self.position.y + self.size.height / 2.0,
        )
    }

    /// Right edge (`x + width`).
    pub fn right(&self) -> f64 {
        self.position.x + self.size.width
    }

    /// Bottom edge (`y + height`).
    pub fn bottom(&self) -> f64 {
        self.position.y + self.size.height
    }
}

/// Number of items per kind. Every kind is present, possibly with zero.
pub fn count_kinds(items: &[CanvasItem]) -> BTreeMap<ItemKind, usize> {
    let mut counts: BTreeMap<ItemKind, usize> = ItemKind::ALL.iter().map(|&kind| (kind, 0)).collect();
    for item in items {
        *counts.entry(item.kind).or_insert(0) += 1;
    }
    counts
}
