//! Native editor schema: `{ "version", "template": { "elements": [...] } }`.

use super::{TemplateError, TemplateResult};
use crate::config::DEFAULT_ITEM_SIZE;
use crate::item::{CanvasItem, ItemKind};
use crate::relations;
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version string written by [`encode_native`].
pub const NATIVE_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeTemplate {
    pub version: String,
    pub template: NativeTemplateBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeTemplateBody {
    #[serde(default)]
    pub elements: Vec<NativeElement>,
}

/// One element of a native template. `kind` stays a string so that unknown
/// types can be skipped instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeElement {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<NativeRelations>,
}

/// Neighbor ids per direction. Ignored on import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NativeRelations {
    #[serde(default)]
    pub above: Option<String>,
    #[serde(default)]
    pub below: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
}

/// Decode a native template. Every element gets a fresh id; elements of an
/// unknown type are skipped and a missing size falls back to the default.
pub fn decode_native(value: &Value) -> TemplateResult<Vec<CanvasItem>> {
    let body = value
        .get("template")
        .ok_or_else(|| TemplateError::Malformed("missing 'template'".to_string()))?;
    let body = NativeTemplateBody::deserialize(body)
        .map_err(|e| TemplateError::Malformed(e.to_string()))?;

    let mut items = Vec::with_capacity(body.elements.len());
    for element in body.elements {
        let kind = match element.kind.parse::<ItemKind>() {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("Skipping element '{}': {}", element.id, e);
                continue;
            }
        };
        let size = element.size.unwrap_or(DEFAULT_ITEM_SIZE);
        items.push(CanvasItem::new(kind, element.position, size));
    }
    log::info!("Decoded {} native elements", items.len());
    Ok(items)
}

/// Encode items in the native schema with relations written as item ids.
pub fn encode_native(items: &[CanvasItem]) -> NativeTemplate {
    let id_of = |neighbor: Option<usize>| neighbor.map(|index| items[index].id().to_string());
    let elements = items
        .iter()
        .zip(relations::analyze(items))
        .map(|(item, relation)| NativeElement {
            id: item.id().to_string(),
            kind: item.kind.name().to_string(),
            position: item.position,
            size: Some(item.size),
            relations: Some(NativeRelations {
                above: id_of(relation.above),
                below: id_of(relation.below),
                left: id_of(relation.left),
                right: id_of(relation.right),
            }),
        })
        .collect();

    NativeTemplate {
        version: NATIVE_VERSION.to_string(),
        template: NativeTemplateBody { elements },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_skips_unknown_types() {
        let doc = json!({
            "version": "1.0",
            "template": {"elements": [
                {"id": "a", "type": "text", "position": {"x": 10.0, "y": 20.0}, "size": {"width": 200.0, "height": 60.0}},
                {"id": "b", "type": "sidebar", "position": {"x": 0.0, "y": 0.0}},
                {"id": "c", "type": "figure", "position": {"x": 50.0, "y": 300.0},
                 "relations": {"above": "a", "below": null}}
            ]}
        });
        let items = decode_native(&doc).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, ItemKind::Text);
        assert_eq!(items[0].position, Point::new(10.0, 20.0));
        assert_eq!(items[0].size, Size::new(200.0, 60.0));
        assert_eq!(items[1].kind, ItemKind::Figure);
        assert_eq!(items[1].size, DEFAULT_ITEM_SIZE);
    }

    #[test]
    fn test_decode_mints_fresh_ids() {
        let id = uuid::Uuid::new_v4().to_string();
        let doc = json!({
            "version": "1.0",
            "template": {"elements": [
                {"id": id, "type": "list", "position": {"x": 0.0, "y": 0.0}}
            ]}
        });
        let items = decode_native(&doc).unwrap();
        assert_ne!(items[0].id().to_string(), id);
    }

    #[test]
    fn test_decode_malformed_elements() {
        let doc = json!({"version": "1.0", "template": {"elements": [{"type": "text"}]}});
        assert!(matches!(decode_native(&doc), Err(TemplateError::Malformed(_))));
        let empty = json!({"version": "1.0", "template": {}});
        assert!(decode_native(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_encode_native_relations_by_id() {
        let items = vec![
            CanvasItem::new(ItemKind::Text, Point::new(0.0, 0.0), Size::new(150.0, 80.0)),
            CanvasItem::new(ItemKind::Title, Point::new(0.0, 100.0), Size::new(150.0, 50.0)),
        ];
        let template = encode_native(&items);
        assert_eq!(template.version, NATIVE_VERSION);
        let title = &template.template.elements[1];
        assert_eq!(title.kind, "title");
        let relations = title.relations.as_ref().unwrap();
        assert_eq!(relations.above, Some(items[0].id().to_string()));
        assert_eq!(relations.below, None);

        let value = serde_json::to_value(&template).unwrap();
        assert_eq!(value["template"]["elements"][0]["type"], json!("text"));
        assert_eq!(value["template"]["elements"][0]["size"]["width"], json!(150.0));
    }

    #[test]
    fn test_native_reimport() {
        let items = vec![
            CanvasItem::new(ItemKind::Table, Point::new(40.0, 60.0), Size::new(300.0, 120.0)),
        ];
        let value = serde_json::to_value(encode_native(&items)).unwrap();
        let decoded = decode_native(&value).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].kind, ItemKind::Table);
        assert_eq!(decoded[0].bounds(), items[0].bounds());
    }
}
