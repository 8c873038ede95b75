//! Similarity search message shapes.
//!
//! Only the bodies are modeled here; sending them is up to the embedder.
//! [`SearchTracker`] makes sure a late response to an older request never
//! overwrites the results of a newer one.

use crate::item::{CanvasItem, ItemKind, count_kinds};
use crate::template::{self, TemplateResult};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Add some elements to the canvas before searching")]
    EmptyCanvas,
}

/// One item as sent to the layout search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchElement {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub position: Point,
    pub size: Size,
}

/// Body of a layout search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub elements: Vec<SearchElement>,
}

impl SearchRequest {
    /// Build a request from the items in collection order.
    pub fn from_items(items: &[CanvasItem]) -> Result<Self, SearchError> {
        if items.is_empty() {
            return Err(SearchError::EmptyCanvas);
        }
        let elements = items
            .iter()
            .map(|item| SearchElement {
                kind: item.kind,
                position: item.position,
                size: item.size,
            })
            .collect();
        Ok(Self { elements })
    }
}

/// Body of a search by per-kind counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSearch {
    pub text_count: usize,
    pub title_count: usize,
    pub list_count: usize,
    pub table_count: usize,
    pub figure_count: usize,
}

impl CountSearch {
    pub fn from_counts(counts: &BTreeMap<ItemKind, usize>) -> Self {
        let count = |kind| counts.get(&kind).copied().unwrap_or(0);
        Self {
            text_count: count(ItemKind::Text),
            title_count: count(ItemKind::Title),
            list_count: count(ItemKind::List),
            table_count: count(ItemKind::Table),
            figure_count: count(ItemKind::Figure),
        }
    }

    pub fn from_items(items: &[CanvasItem]) -> Self {
        Self::from_counts(&count_kinds(items))
    }

    pub fn total(&self) -> usize {
        self.text_count + self.title_count + self.list_count + self.table_count + self.figure_count
    }
}

/// One match as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchImage {
    pub image_url: String,
    #[serde(default)]
    pub json_content: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_scores: Option<Value>,
}

/// Body of a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub images: Vec<SearchImage>,
}

/// A search match ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarTemplate {
    /// Absolute image URL.
    pub image_url: String,
    pub similarity_score: Option<f64>,
    /// The matched template, in either schema.
    pub json_content: Value,
}

impl SimilarTemplate {
    /// Decode the matched template into items.
    pub fn items(&self) -> TemplateResult<Vec<CanvasItem>> {
        template::decode_value(&self.json_content)
    }
}

impl SearchResponse {
    /// Convert into display results. Relative image URLs are joined onto
    /// `base_url`.
    pub fn into_results(self, base_url: &str) -> Vec<SimilarTemplate> {
        self.images
            .into_iter()
            .map(|image| SimilarTemplate {
                image_url: absolute_url(&image.image_url, base_url),
                similarity_score: image.similarity_score,
                json_content: image.json_content,
            })
            .collect()
    }
}

fn absolute_url(url: &str, base_url: &str) -> String {
    if url.starts_with("http") {
        url.to_string()
    } else {
        format!("{}{}", base_url, url)
    }
}

/// Identifies one issued search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// Holds the results of the most recently issued search.
#[derive(Debug, Clone)]
pub struct SearchTracker {
    base_url: String,
    latest: u64,
    results: Vec<SimilarTemplate>,
}

impl SearchTracker {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            latest: 0,
            results: Vec::new(),
        }
    }

    /// Issue a token for a new request. Earlier tokens become stale.
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }

    /// Apply a response if it answers the latest request. Returns whether it
    /// was applied.
    pub fn accept(&mut self, token: RequestToken, response: SearchResponse) -> bool {
        if !self.is_current(token) {
            log::debug!(
                "Discarding stale search response {} (latest {})",
                token.0,
                self.latest
            );
            return false;
        }
        self.results = response.into_results(&self.base_url);
        log::info!("Search returned {} templates", self.results.len());
        true
    }

    pub fn results(&self) -> &[SimilarTemplate] {
        &self.results
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_IMAGE_BASE_URL;
    use serde_json::json;

    fn response(urls: &[&str]) -> SearchResponse {
        SearchResponse {
            images: urls
                .iter()
                .map(|url| SearchImage {
                    image_url: url.to_string(),
                    json_content: Value::Null,
                    json_file: None,
                    similarity_score: None,
                    detailed_scores: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_request_body() {
        let items = vec![CanvasItem::new(
            ItemKind::Table,
            Point::new(10.0, 20.0),
            Size::new(200.0, 100.0),
        )];
        let body = serde_json::to_value(SearchRequest::from_items(&items).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"elements": [{
                "type": "table",
                "position": {"x": 10.0, "y": 20.0},
                "size": {"width": 200.0, "height": 100.0}
            }]})
        );
    }

    #[test]
    fn test_empty_request_rejected() {
        assert!(matches!(SearchRequest::from_items(&[]), Err(SearchError::EmptyCanvas)));
    }

    #[test]
    fn test_count_search() {
        let items = vec![
            CanvasItem::new(ItemKind::Text, Point::ZERO, Size::new(150.0, 80.0)),
            CanvasItem::new(ItemKind::Text, Point::ZERO, Size::new(150.0, 80.0)),
            CanvasItem::new(ItemKind::Figure, Point::ZERO, Size::new(150.0, 80.0)),
        ];
        let counts = CountSearch::from_items(&items);
        assert_eq!(counts.text_count, 2);
        assert_eq!(counts.figure_count, 1);
        assert_eq!(counts.table_count, 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_parse_response_with_extra_fields() {
        let body = json!({
            "images": [{
                "image_url": "/static/a.png",
                "json_file": "a.json",
                "similarity_score": 0.92,
                "detailed_scores": {"iou": 0.8},
                "json_content": {"class_counts": {}, "instances": []}
            }],
            "query_time": 12
        });
        let response: SearchResponse = serde_json::from_value(body).unwrap();
        let results = response.into_results(DEFAULT_IMAGE_BASE_URL);
        assert_eq!(results[0].image_url, "http://localhost:5000/static/a.png");
        assert_eq!(results[0].similarity_score, Some(0.92));
        assert!(results[0].items().unwrap().is_empty());
    }

    #[test]
    fn test_absolute_urls_kept() {
        let results = response(&["https://cdn.example.com/x.png"]).into_results("http://base");
        assert_eq!(results[0].image_url, "https://cdn.example.com/x.png");
    }

    #[test]
    fn test_stale_response_discarded() {
        let mut tracker = SearchTracker::new("http://base");
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(!tracker.is_current(first));

        assert!(tracker.accept(second, response(&["/new.png"])));
        assert!(!tracker.accept(first, response(&["/old.png", "/old2.png"])));
        assert_eq!(tracker.results().len(), 1);
        assert_eq!(tracker.results()[0].image_url, "http://base/new.png");
    }

    #[test]
    fn test_late_response_before_newer_arrives() {
        let mut tracker = SearchTracker::new("http://base");
        let first = tracker.issue();
        let _second = tracker.issue();
        // The first request answers while the second is still in flight.
        assert!(!tracker.accept(first, response(&["/old.png"])));
        assert!(tracker.results().is_empty());
    }
}
