//! Gesture and keyboard events delivered by the host UI.
//!
//! The core depends only on these types, never on a specific drag-and-drop
//! library. A gesture source reports start/move/end phases in screen space;
//! the canvas converts them to document space.

use crate::item::{ItemKind, PaletteEntry};
use crate::selection::HandleKind;
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Phase of a pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    Start,
    Move,
    End,
}

/// Item descriptor carried by a drag that originates in the palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaletteDrag {
    pub kind: ItemKind,
    pub default_size: Size,
}

impl From<PaletteEntry> for PaletteDrag {
    fn from(entry: PaletteEntry) -> Self {
        Self {
            kind: entry.kind,
            default_size: entry.default_size,
        }
    }
}

/// What a gesture acts on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureTarget {
    /// Drag an existing item by index.
    Move(usize),
    /// Drag a resize handle of an existing item.
    Resize(usize, HandleKind),
    /// Drag a new item out of the palette.
    Palette(PaletteDrag),
}

/// Where the pointer was released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropTarget {
    /// Over the page.
    #[default]
    Page,
    /// Over the trash area; a dragged item is deleted.
    Trash,
    /// Anywhere else; the drop has no effect.
    Outside,
}

/// A pointer event from the gesture source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    /// Pointer position in screen space, relative to the page origin.
    pub pointer: Point,
    /// Screen-space delta since the gesture started.
    pub delta: Vec2,
    /// Drop zone under the pointer. Only read on `End`.
    #[serde(default)]
    pub drop_target: DropTarget,
}

impl GestureEvent {
    pub fn start(pointer: Point) -> Self {
        Self {
            phase: GesturePhase::Start,
            pointer,
            delta: Vec2::ZERO,
            drop_target: DropTarget::Page,
        }
    }

    pub fn moved(start: Point, pointer: Point) -> Self {
        Self {
            phase: GesturePhase::Move,
            pointer,
            delta: pointer - start,
            drop_target: DropTarget::Page,
        }
    }

    pub fn end(start: Point, pointer: Point) -> Self {
        Self {
            phase: GesturePhase::End,
            pointer,
            delta: pointer - start,
            drop_target: DropTarget::Page,
        }
    }

    /// Set the drop zone of an end event.
    pub fn over(mut self, drop_target: DropTarget) -> Self {
        self.drop_target = drop_target;
        self
    }
}

/// A key press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Key name as reported by the host ("Delete", "Backspace", ...).
    pub key: String,
    /// Set when a text input or other input-capturing control has focus.
    #[serde(default)]
    pub input_focused: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            input_focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.input_focused = focused;
        self
    }
}

/// Canvas actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    DeleteSelected,
}

/// Map a key event to a canvas action. Keys typed into a focused input
/// control never reach the canvas.
pub fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    if event.input_focused {
        return None;
    }
    match event.key.as_str() {
        "Delete" | "Backspace" => Some(KeyAction::DeleteSelected),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_keys() {
        assert_eq!(key_action(&KeyEvent::new("Delete")), Some(KeyAction::DeleteSelected));
        assert_eq!(key_action(&KeyEvent::new("Backspace")), Some(KeyAction::DeleteSelected));
        assert_eq!(key_action(&KeyEvent::new("Enter")), None);
    }

    #[test]
    fn test_focused_input_swallows_keys() {
        assert_eq!(key_action(&KeyEvent::new("Delete").focused(true)), None);
    }

    #[test]
    fn test_gesture_event_delta() {
        let start = Point::new(10.0, 10.0);
        let event = GestureEvent::moved(start, Point::new(40.0, 0.0));
        assert_eq!(event.phase, GesturePhase::Move);
        assert_eq!(event.delta, Vec2::new(30.0, -10.0));
        assert_eq!(GestureEvent::start(start).delta, Vec2::ZERO);
    }

    #[test]
    fn test_drop_target_defaults_to_page() {
        let start = Point::new(10.0, 10.0);
        let event = GestureEvent::end(start, Point::new(20.0, 20.0));
        assert_eq!(event.drop_target, DropTarget::Page);
        assert_eq!(event.over(DropTarget::Trash).drop_target, DropTarget::Trash);

        let parsed: GestureEvent = serde_json::from_str(
            r#"{"phase": "end", "pointer": {"x": 1.0, "y": 2.0}, "delta": {"x": 0.0, "y": 0.0}}"#,
        )
        .unwrap();
        assert_eq!(parsed.drop_target, DropTarget::Page);
    }

    #[test]
    fn test_palette_drag_from_entry() {
        let drag = PaletteDrag::from(ItemKind::Figure.palette_entry());
        assert_eq!(drag.kind, ItemKind::Figure);
        assert!((drag.default_size.height - 80.0).abs() < f64::EPSILON);
    }
}
