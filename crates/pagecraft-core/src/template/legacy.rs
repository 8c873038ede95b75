//! Legacy backend schema.
//!
//! Instances are keyed by ordinal-suffixed field names (`class_3`,
//! `relative_position_3`, ...). On decode the suffix is discovered by
//! scanning the instance's keys; the suffixed shape never leaves this module.

use super::{TemplateError, TemplateResult};
use crate::item::{CanvasItem, ItemKind, count_kinds};
use crate::relations;
use kurbo::{Point, Size};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

const INSTANCE_ID_PREFIX: &str = "instance_id_";
const CLASS_PREFIX: &str = "class_";
const RELATIVE_POSITION_PREFIX: &str = "relative_position_";

/// A template in the backend schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyTemplate {
    /// Item count per class, keyed `"{class}_element"`.
    pub class_counts: BTreeMap<String, usize>,
    /// Number of distinct classes present.
    pub category_count: usize,
    pub element_count: usize,
    /// Fresh opaque token, not derived from content.
    pub element_id: String,
    pub instances: Vec<LegacyInstance>,
}

/// One item of a legacy template.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyInstance {
    /// 1-based ordinal used as the key suffix.
    pub ordinal: usize,
    pub class: u8,
    pub position: RelativePosition,
}

/// Bounds and neighbor classes of an instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelativePosition {
    /// `[left, top, right, bottom]`.
    #[serde(serialize_with = "serialize_coords")]
    pub item: [f64; 4],
    pub above: Option<u8>,
    pub right: Option<u8>,
    pub left: Option<u8>,
    pub below: Option<u8>,
}

impl Serialize for LegacyInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(&format!("{INSTANCE_ID_PREFIX}{}", self.ordinal), &self.ordinal)?;
        map.serialize_entry(&format!("{CLASS_PREFIX}{}", self.ordinal), &self.class)?;
        map.serialize_entry(
            &format!("{RELATIVE_POSITION_PREFIX}{}", self.ordinal),
            &self.position,
        )?;
        map.end()
    }
}

/// Whole coordinates are written as integers.
fn serialize_coords<S: Serializer>(coords: &[f64; 4], serializer: S) -> Result<S::Ok, S::Error> {
    let mut seq = serializer.serialize_seq(Some(coords.len()))?;
    for &coord in coords {
        if coord.fract() == 0.0 && coord.abs() < 1e15 {
            seq.serialize_element(&(coord as i64))?;
        } else {
            seq.serialize_element(&coord)?;
        }
    }
    seq.end()
}

/// Encode items in collection order. Relations are recomputed here and
/// written as the neighbor's class number.
pub fn encode(items: &[CanvasItem]) -> LegacyTemplate {
    let counts = count_kinds(items);
    let class_counts = counts
        .iter()
        .map(|(kind, count)| (format!("{}_element", kind.class_id()), *count))
        .collect();
    let category_count = counts.values().filter(|&&count| count > 0).count();

    let class_of = |neighbor: Option<usize>| neighbor.map(|index| items[index].kind.class_id());
    let instances = items
        .iter()
        .zip(relations::analyze(items))
        .enumerate()
        .map(|(index, (item, relation))| LegacyInstance {
            ordinal: index + 1,
            class: item.kind.class_id(),
            position: RelativePosition {
                item: [item.position.x, item.position.y, item.right(), item.bottom()],
                above: class_of(relation.above),
                right: class_of(relation.right),
                left: class_of(relation.left),
                below: class_of(relation.below),
            },
        })
        .collect();

    let template = LegacyTemplate {
        class_counts,
        category_count,
        element_count: items.len(),
        element_id: Uuid::new_v4().simple().to_string(),
        instances,
    };
    log::info!(
        "Encoded {} items in {} categories",
        template.element_count,
        template.category_count
    );
    template
}

/// Find the ordinal suffix used by an instance's keys.
fn instance_ordinal(instance: &Map<String, Value>) -> Option<usize> {
    instance.keys().find_map(|key| {
        [INSTANCE_ID_PREFIX, CLASS_PREFIX, RELATIVE_POSITION_PREFIX]
            .iter()
            .find_map(|prefix| key.strip_prefix(prefix)?.parse().ok())
    })
}

/// Read a non-negative integer that may have been written as a float.
fn as_class_id(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0)
            .map(|f| f as u64)
    })
}

fn decode_instance(instance: &Value, fallback_ordinal: usize) -> Result<CanvasItem, String> {
    let map = instance
        .as_object()
        .ok_or_else(|| "instance is not an object".to_string())?;
    let ordinal = instance_ordinal(map).unwrap_or(fallback_ordinal);

    let class_id = map
        .get(&format!("{CLASS_PREFIX}{ordinal}"))
        .and_then(as_class_id)
        .ok_or_else(|| format!("missing {CLASS_PREFIX}{ordinal}"))?;
    let kind = ItemKind::from_class_id(class_id)
        .ok_or_else(|| format!("unmapped class id {class_id}"))?;

    let coords = map
        .get(&format!("{RELATIVE_POSITION_PREFIX}{ordinal}"))
        .and_then(|position| position.get("item"))
        .and_then(Value::as_array)
        .ok_or_else(|| format!("missing {RELATIVE_POSITION_PREFIX}{ordinal}.item"))?;
    let coords: Option<Vec<f64>> = coords.iter().map(Value::as_f64).collect();
    let Some(&[left, top, right, bottom]) = coords.as_deref() else {
        return Err(format!("{RELATIVE_POSITION_PREFIX}{ordinal}.item needs four numbers"));
    };

    Ok(CanvasItem::new(
        kind,
        Point::new(left, top),
        Size::new(right - left, bottom - top),
    ))
}

/// Decode a legacy template. Instances without a usable position or with an
/// unmapped class are skipped; the rest still decode.
pub fn decode_legacy(value: &Value) -> TemplateResult<Vec<CanvasItem>> {
    let instances = value
        .get("instances")
        .and_then(Value::as_array)
        .ok_or_else(|| TemplateError::Malformed("missing 'instances' array".to_string()))?;

    let mut items = Vec::with_capacity(instances.len());
    for (index, instance) in instances.iter().enumerate() {
        match decode_instance(instance, index + 1) {
            Ok(item) => items.push(item),
            Err(reason) => log::warn!("Skipping legacy instance {}: {}", index + 1, reason),
        }
    }

    if let Some(expected) = value.get("element_count").and_then(Value::as_u64) {
        if expected != items.len() as u64 {
            log::info!("Decoded {} of {} legacy instances", items.len(), expected);
        }
    }
    Ok(items)
}
