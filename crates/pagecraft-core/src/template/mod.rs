//! Template codec.
//!
//! Reads layouts from either the native template schema or the legacy
//! backend schema, and writes the legacy schema. The item collection is the
//! only input to encoding; relations are recomputed on every encode.

mod legacy;
mod native;

pub use legacy::{LegacyInstance, LegacyTemplate, RelativePosition, decode_legacy, encode};
pub use native::{
    NATIVE_VERSION, NativeElement, NativeRelations, NativeTemplate, NativeTemplateBody,
    decode_native, encode_native,
};

use crate::item::CanvasItem;
use serde_json::Value;
use thiserror::Error;

/// Template codec errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Unrecognized template schema")]
    UnrecognizedSchema,
    #[error("Malformed template: {0}")]
    Malformed(String),
    #[error("Nothing to export: the canvas is empty")]
    EmptyCanvas,
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// The two serialized layout schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Backend schema with `class_counts` and ordinal-suffixed instances.
    Legacy,
    /// Editor schema with `version` and `template.elements`.
    Native,
}

/// Detect the schema of a parsed document.
pub fn detect_schema(value: &Value) -> Option<Schema> {
    if value.get("class_counts").is_some() {
        Some(Schema::Legacy)
    } else if value.get("version").is_some() && value.get("template").is_some() {
        Some(Schema::Native)
    } else {
        None
    }
}

/// Decode a template in either schema.
pub fn decode(json: &str) -> TemplateResult<Vec<CanvasItem>> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| TemplateError::InvalidJson(e.to_string()))?;
    decode_value(&value)
}

/// Decode an already parsed template in either schema.
pub fn decode_value(value: &Value) -> TemplateResult<Vec<CanvasItem>> {
    match detect_schema(value) {
        Some(Schema::Legacy) => decode_legacy(value),
        Some(Schema::Native) => decode_native(value),
        None => Err(TemplateError::UnrecognizedSchema),
    }
}

/// Serialize a legacy template as pretty-printed JSON.
pub fn to_json(template: &LegacyTemplate) -> TemplateResult<String> {
    serde_json::to_string_pretty(template).map_err(|e| TemplateError::Malformed(e.to_string()))
}
