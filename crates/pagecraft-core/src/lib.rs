//! PageCraft Core Library
//!
//! Platform-agnostic page layout model: items on a fixed-size page, a zoom
//! transform, the resize and move solver, spatial relations between items and
//! the template codec.

pub mod canvas;
pub mod config;
pub mod geometry;
pub mod input;
pub mod item;
pub mod relations;
pub mod search;
pub mod selection;
pub mod storage;
pub mod template;
pub mod zoom;

pub use canvas::{Canvas, CanvasDocument, ReorderDirection};
pub use config::CanvasConfig;
pub use input::{DropTarget, GestureEvent, GesturePhase, GestureTarget, KeyEvent};
pub use item::{CanvasItem, ItemId, ItemKind};
pub use relations::{Direction, RelationSet};
pub use search::{SearchRequest, SearchTracker};
pub use selection::HandleKind;
pub use storage::{StorageError, StorageResult};
pub use template::{TemplateError, TemplateResult};
pub use zoom::Zoom;
