//! Canvas document and state management.

use crate::config::{CanvasConfig, ConfigError};
use crate::geometry;
use crate::input::{
    DropTarget, GestureEvent, GesturePhase, GestureTarget, KeyAction, KeyEvent, PaletteDrag,
    key_action,
};
use crate::item::{CanvasItem, ItemKind, count_kinds};
use crate::search::{SearchError, SearchRequest};
use crate::selection::{HandleKind, ManipulationKind, ManipulationState};
use crate::template::{self, LegacyTemplate, TemplateError, TemplateResult};
use crate::zoom::{self, Zoom};
use kurbo::{Point, Rect, Size, Vec2};
use std::collections::BTreeMap;

/// Direction for a one-step z-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    /// Towards the end of the collection (painted later, on top).
    Forward,
    /// Towards the start of the collection.
    Backward,
}

/// The ordered item collection of a page.
///
/// Collection order is the z-order and the instance order used on export.
/// Items can only be changed through the methods below, each of which keeps
/// every item inside the page and at least the minimum size.
#[derive(Debug, Clone)]
pub struct CanvasDocument {
    config: CanvasConfig,
    items: Vec<CanvasItem>,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasDocument {
    /// Create a new empty document with the default config.
    pub fn new() -> Self {
        Self {
            config: CanvasConfig::default(),
            items: Vec::new(),
        }
    }

    /// Create an empty document with a custom config, validated first.
    pub fn with_config(config: CanvasConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            items: Vec::new(),
        })
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Items in z-order (back to front).
    pub fn items(&self) -> &[CanvasItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&CanvasItem> {
        self.items.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of items per kind.
    pub fn kind_counts(&self) -> BTreeMap<ItemKind, usize> {
        count_kinds(&self.items)
    }

    /// Place a new item centered on a screen-space drop point.
    /// The item goes on top of the z-order. Returns its index.
    pub fn add_item(&mut self, kind: ItemKind, drop_point: Point, size: Size, zoom: f64) -> usize {
        let center = zoom::to_document_point(drop_point, zoom);
        let (_, size) = geometry::clamp_to_page(Point::ZERO, size, &self.config);
        let position = geometry::center_on(center, size, &self.config);
        self.items.push(CanvasItem::new(kind, position, size));
        log::debug!("Added {} at ({:.1}, {:.1})", kind, position.x, position.y);
        self.items.len() - 1
    }

    /// Remove an item. Out-of-range indexes are ignored.
    pub fn remove_item(&mut self, index: usize) -> Option<CanvasItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Move an item by a screen-space delta from its current position.
    pub fn move_item(&mut self, index: usize, screen_delta: Vec2, zoom: f64) -> bool {
        match self.items.get(index) {
            Some(item) => {
                let start = item.position;
                self.move_item_from(index, start, screen_delta, zoom)
            }
            None => false,
        }
    }

    /// Move an item to `start` plus a screen-space delta.
    /// Used by gestures, where `start` is the position at gesture start.
    pub fn move_item_from(&mut self, index: usize, start: Point, screen_delta: Vec2, zoom: f64) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        let delta = zoom::to_document_delta(screen_delta, zoom);
        item.position = geometry::translate(start, item.size, delta, &self.config);
        true
    }

    /// Resize an item with a handle. `start` is the item's bounds at gesture
    /// start and `screen_delta` the total pointer delta since then.
    pub fn resize_item(
        &mut self,
        index: usize,
        handle: HandleKind,
        start: Rect,
        screen_delta: Vec2,
        zoom: f64,
    ) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            return false;
        };
        let delta = zoom::to_document_delta(screen_delta, zoom);
        let bounds = geometry::resize(start, handle, delta, &self.config);
        item.position = bounds.origin();
        item.size = bounds.size();
        true
    }

    /// Copy an item under a new id, offset and kept on the page, on top of
    /// the z-order. Returns the index of the copy.
    pub fn duplicate_item(&mut self, index: usize) -> Option<usize> {
        let mut copy = self.items.get(index)?.duplicate();
        let offset = self.config.duplicate_offset;
        copy.position = geometry::translate(copy.position, copy.size, offset, &self.config);
        self.items.push(copy);
        Some(self.items.len() - 1)
    }

    /// Swap an item with its neighbor in the collection.
    /// Returns the item's new index, or `None` if nothing moved.
    pub fn reorder(&mut self, index: usize, direction: ReorderDirection) -> Option<usize> {
        if index >= self.items.len() {
            return None;
        }
        let target = match direction {
            ReorderDirection::Forward if index + 1 < self.items.len() => index + 1,
            ReorderDirection::Backward if index > 0 => index - 1,
            _ => return None,
        };
        self.items.swap(index, target);
        Some(target)
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replace the whole collection, bringing each item within the page
    /// and up to the minimum size.
    pub fn replace_items(&mut self, items: Vec<CanvasItem>) {
        self.items = items
            .into_iter()
            .map(|mut item| {
                let (position, size) = geometry::clamp_to_page(item.position, item.size, &self.config);
                if position != item.position || size != item.size {
                    log::debug!("Normalized imported {} to the page", item.kind);
                }
                item.position = position;
                item.size = size;
                item
            })
            .collect();
    }
}

/// A gesture in progress.
#[derive(Debug, Clone)]
enum ActiveGesture {
    Manipulation(ManipulationState),
    Palette { drag: PaletteDrag, pointer: Point },
}

/// Apply one frame of a manipulation, computed from its start geometry.
fn apply_manipulation(
    document: &mut CanvasDocument,
    state: &ManipulationState,
    delta: Vec2,
    zoom: f64,
) -> bool {
    match state.kind {
        ManipulationKind::Move => {
            document.move_item_from(state.index, state.original.position, delta, zoom)
        }
        ManipulationKind::Resize(handle) => {
            document.resize_item(state.index, handle, state.original.bounds(), delta, zoom)
        }
    }
}

/// Index of `position` after the items at `index` and `target` swap.
fn follow_swap(position: usize, index: usize, target: usize) -> usize {
    if position == index {
        target
    } else if position == target {
        index
    } else {
        position
    }
}

/// Canvas state: the document plus zoom, selection and the active gesture.
#[derive(Debug, Clone)]
pub struct Canvas {
    document: CanvasDocument,
    pub zoom: Zoom,
    selection: Option<usize>,
    gesture: Option<ActiveGesture>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self::with_document(CanvasDocument::new())
    }

    pub fn with_config(config: CanvasConfig) -> Result<Self, ConfigError> {
        Ok(Self::with_document(CanvasDocument::with_config(config)?))
    }

    pub fn with_document(document: CanvasDocument) -> Self {
        Self {
            zoom: Zoom::from_config(document.config()),
            document,
            selection: None,
            gesture: None,
        }
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn items(&self) -> &[CanvasItem] {
        self.document.items()
    }

    // --- selection ---

    /// Select an item. Out-of-range indexes clear the selection.
    pub fn select(&mut self, index: usize) {
        self.selection = (index < self.document.len()).then_some(index);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected_item(&self) -> Option<&CanvasItem> {
        self.selection.and_then(|index| self.document.get(index))
    }

    // --- item operations ---

    /// Place a new item at a screen-space drop point using the current zoom.
    pub fn add_item(&mut self, kind: ItemKind, drop_point: Point, size: Size) -> usize {
        self.document.add_item(kind, drop_point, size, self.zoom.value())
    }

    pub fn remove_item(&mut self, index: usize) -> Option<CanvasItem> {
        let removed = self.document.remove_item(index)?;
        self.selection = match self.selection {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        let gesture_target_removed = match self.gesture.as_mut() {
            Some(ActiveGesture::Manipulation(state)) if state.index == index => true,
            Some(ActiveGesture::Manipulation(state)) => {
                if state.index > index {
                    state.index -= 1;
                }
                false
            }
            _ => false,
        };
        if gesture_target_removed {
            log::debug!("Dropping the gesture on removed item {}", index);
            self.gesture = None;
        }
        Some(removed)
    }

    /// Move an item by a screen-space delta using the current zoom.
    pub fn move_item(&mut self, index: usize, screen_delta: Vec2) -> bool {
        self.document.move_item(index, screen_delta, self.zoom.value())
    }

    /// Resize an item from its current bounds in a single step.
    pub fn resize_item(&mut self, index: usize, handle: HandleKind, screen_delta: Vec2) -> bool {
        match self.document.get(index) {
            Some(item) => {
                let start = item.bounds();
                self.document.resize_item(index, handle, start, screen_delta, self.zoom.value())
            }
            None => false,
        }
    }

    /// Duplicate an item and select the copy.
    pub fn duplicate_item(&mut self, index: usize) -> Option<usize> {
        let copy = self.document.duplicate_item(index)?;
        self.selection = Some(copy);
        Some(copy)
    }

    /// Swap an item with its neighbor; the selection and any active
    /// gesture follow the item.
    pub fn reorder(&mut self, index: usize, direction: ReorderDirection) -> Option<usize> {
        let target = self.document.reorder(index, direction)?;
        self.selection = self
            .selection
            .map(|selected| follow_swap(selected, index, target));
        if let Some(ActiveGesture::Manipulation(state)) = self.gesture.as_mut() {
            state.index = follow_swap(state.index, index, target);
        }
        Some(target)
    }

    /// Move the selected item one layer towards the front.
    pub fn bring_forward(&mut self) -> bool {
        self.selection
            .and_then(|index| self.reorder(index, ReorderDirection::Forward))
            .is_some()
    }

    /// Move the selected item one layer towards the back.
    pub fn send_backward(&mut self) -> bool {
        self.selection
            .and_then(|index| self.reorder(index, ReorderDirection::Backward))
            .is_some()
    }

    /// Delete the selected item.
    pub fn delete_selected(&mut self) -> Option<CanvasItem> {
        let index = self.selection?;
        self.remove_item(index)
    }

    /// Remove all items and the selection.
    pub fn clear(&mut self) {
        self.document.clear();
        self.selection = None;
        self.gesture = None;
    }

    /// Handle a key press. Returns true if the canvas acted on it.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        match key_action(event) {
            Some(KeyAction::DeleteSelected) => self.delete_selected().is_some(),
            None => false,
        }
    }

    // --- zoom ---

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom.zoom_out()
    }

    pub fn set_zoom(&mut self, value: f64) -> f64 {
        self.zoom.set(value)
    }

    pub fn reset_zoom(&mut self) -> f64 {
        self.zoom.reset()
    }

    // --- gestures ---

    /// Whether a gesture is in progress.
    pub fn is_gesturing(&self) -> bool {
        self.gesture.is_some()
    }

    /// Dispatch a gesture event. Returns the index of the affected item.
    pub fn handle_gesture(&mut self, target: GestureTarget, event: &GestureEvent) -> Option<usize> {
        match event.phase {
            GesturePhase::Start => self.begin_gesture(target, event.pointer),
            GesturePhase::Move => self.update_gesture(event.pointer, event.delta),
            GesturePhase::End => self.end_gesture(event.pointer, event.delta, event.drop_target),
        }
    }

    /// Start a gesture. Move and resize gestures capture the item's
    /// geometry now; every later frame is computed from it.
    pub fn begin_gesture(&mut self, target: GestureTarget, pointer: Point) -> Option<usize> {
        if self.gesture.is_some() {
            log::debug!("Starting a gesture while another is active; dropping the old one");
        }
        let (index, kind) = match target {
            GestureTarget::Palette(drag) => {
                self.gesture = Some(ActiveGesture::Palette { drag, pointer });
                return None;
            }
            GestureTarget::Move(index) => (index, ManipulationKind::Move),
            GestureTarget::Resize(index, handle) => (index, ManipulationKind::Resize(handle)),
        };
        let Some(original) = self.document.get(index).cloned() else {
            self.gesture = None;
            return None;
        };
        self.gesture = Some(ActiveGesture::Manipulation(ManipulationState::new(
            index, kind, pointer, original,
        )));
        self.selection = Some(index);
        Some(index)
    }

    /// Apply an intermediate frame. `delta` is the total screen-space delta
    /// since the gesture started.
    pub fn update_gesture(&mut self, pointer: Point, delta: Vec2) -> Option<usize> {
        let zoom = self.zoom.value();
        match self.gesture.as_mut()? {
            ActiveGesture::Palette { pointer: current, .. } => {
                *current = pointer;
                None
            }
            ActiveGesture::Manipulation(state) => {
                state.current_point = state.start_point + delta;
                apply_manipulation(&mut self.document, state, delta, zoom).then_some(state.index)
            }
        }
    }

    /// Finish the gesture and clear the gesture state.
    ///
    /// On the page, a manipulation applies its final frame and a palette
    /// drag places its item centered on the drop point. Dropping a moved
    /// item on the trash deletes it. Any other drop leaves the items as
    /// they were before the gesture.
    pub fn end_gesture(&mut self, pointer: Point, delta: Vec2, drop_target: DropTarget) -> Option<usize> {
        match self.gesture.take()? {
            ActiveGesture::Palette { drag, .. } => {
                if drop_target != DropTarget::Page {
                    log::debug!("Palette drop on {:?} ignored", drop_target);
                    return None;
                }
                let index = self.add_item(drag.kind, pointer, drag.default_size);
                self.selection = Some(index);
                Some(index)
            }
            ActiveGesture::Manipulation(state) => {
                let zoom = self.zoom.value();
                match (state.kind, drop_target) {
                    (ManipulationKind::Move, DropTarget::Trash) => {
                        self.remove_item(state.index);
                        None
                    }
                    (ManipulationKind::Move, DropTarget::Outside) => {
                        apply_manipulation(&mut self.document, &state, Vec2::ZERO, zoom)
                            .then_some(state.index)
                    }
                    _ => apply_manipulation(&mut self.document, &state, delta, zoom)
                        .then_some(state.index),
                }
            }
        }
    }

    /// Abort the gesture, restoring the item to its gesture-start geometry.
    pub fn cancel_gesture(&mut self) {
        if let Some(ActiveGesture::Manipulation(state)) = self.gesture.take() {
            let zoom = self.zoom.value();
            apply_manipulation(&mut self.document, &state, Vec2::ZERO, zoom);
        }
    }

    // --- import / export ---

    /// Replace the items with those decoded from a template in either
    /// schema. On error nothing changes. Returns the number of items loaded.
    pub fn import_json(&mut self, json: &str) -> TemplateResult<usize> {
        let items = template::decode(json)?;
        let count = items.len();
        self.document.replace_items(items);
        self.selection = None;
        self.gesture = None;
        log::info!("Imported {} items", count);
        Ok(count)
    }

    /// Encode the current items in the legacy schema.
    pub fn export(&self) -> TemplateResult<LegacyTemplate> {
        if self.document.is_empty() {
            return Err(TemplateError::EmptyCanvas);
        }
        Ok(template::encode(self.document.items()))
    }

    /// Encode the current items as pretty-printed legacy JSON.
    pub fn export_json(&self) -> TemplateResult<String> {
        template::to_json(&self.export()?)
    }

    /// Build a similarity search request body from the current items.
    pub fn search_request(&self) -> Result<SearchRequest, SearchError> {
        SearchRequest::from_items(self.document.items())
    }
}
