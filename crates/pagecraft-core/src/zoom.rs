//! Zoom transform between screen (pointer) space and document space.
//!
//! The zoom factor is a presentation multiplier only. Item geometry is always
//! stored in document units, so every screen-space quantity coming from a
//! gesture goes through [`to_document_delta`] before it reaches the model.

use crate::config::CanvasConfig;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Convert a screen-space delta to document space.
pub fn to_document_delta(screen_delta: Vec2, zoom: f64) -> Vec2 {
    screen_delta / zoom
}

/// Convert a screen-space point (relative to the page origin) to document space.
pub fn to_document_point(screen_point: Point, zoom: f64) -> Point {
    Point::new(screen_point.x / zoom, screen_point.y / zoom)
}

/// Convert a document-space length to screen pixels.
pub fn to_screen_length(doc_length: f64, zoom: f64) -> f64 {
    doc_length * zoom
}

/// Current zoom factor with its allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    /// Current zoom factor (1.0 = 100%).
    pub factor: f64,
    pub min: f64,
    pub max: f64,
    /// Increment for the zoom in/out controls.
    pub step: f64,
    /// Value restored by [`Zoom::reset`].
    pub default: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self::from_config(&CanvasConfig::default())
    }
}

impl Zoom {
    /// Create a zoom at the default factor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a zoom using the limits from a config.
    pub fn from_config(config: &CanvasConfig) -> Self {
        Self {
            factor: config.zoom_default,
            min: config.zoom_min,
            max: config.zoom_max,
            step: config.zoom_step,
            default: config.zoom_default,
        }
    }

    /// Current factor.
    pub fn value(&self) -> f64 {
        self.factor
    }

    /// Set the factor, clamped to the allowed range. Non-finite values are
    /// ignored. Returns the new factor.
    pub fn set(&mut self, value: f64) -> f64 {
        if !value.is_finite() {
            log::debug!("Ignoring non-finite zoom {}", value);
            return self.factor;
        }
        self.factor = value.clamp(self.min, self.max);
        self.factor
    }

    /// Step the factor up. Returns the new factor.
    pub fn zoom_in(&mut self) -> f64 {
        self.set(self.factor + self.step)
    }

    /// Step the factor down. Returns the new factor.
    pub fn zoom_out(&mut self) -> f64 {
        self.set(self.factor - self.step)
    }

    /// Restore the default factor. Returns the new factor.
    pub fn reset(&mut self) -> f64 {
        self.factor = self.default;
        self.factor
    }

    /// Zoom as a whole percentage for display.
    pub fn percent(&self) -> u32 {
        (self.factor * 100.0).round() as u32
    }

    /// Convert a screen delta using the current factor.
    pub fn document_delta(&self, screen_delta: Vec2) -> Vec2 {
        to_document_delta(screen_delta, self.factor)
    }

    /// Convert a screen point using the current factor.
    pub fn document_point(&self, screen_point: Point) -> Point {
        to_document_point(screen_point, self.factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zoom() {
        let zoom = Zoom::new();
        assert!((zoom.value() - 1.0).abs() < f64::EPSILON);
        assert_eq!(zoom.percent(), 100);
    }

    #[test]
    fn test_document_delta_scales_inversely() {
        let delta = Vec2::new(100.0, 40.0);
        let at_one = to_document_delta(delta, 1.0);
        let at_two = to_document_delta(delta, 2.0);
        assert!((at_one.x - 2.0 * at_two.x).abs() < f64::EPSILON);
        assert!((at_one.y - 2.0 * at_two.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_length_roundtrip() {
        let zoom = 1.5;
        let doc = 123.0;
        let screen = to_screen_length(doc, zoom);
        assert!((to_document_delta(Vec2::new(screen, 0.0), zoom).x - doc).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut zoom = Zoom::new();
        assert!((zoom.set(10.0) - 3.0).abs() < f64::EPSILON);
        assert!((zoom.set(0.01) - 0.3).abs() < f64::EPSILON);

        for _ in 0..50 {
            zoom.zoom_in();
        }
        assert!((zoom.value() - 3.0).abs() < f64::EPSILON);

        for _ in 0..50 {
            zoom.zoom_out();
        }
        assert!((zoom.value() - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_non_finite_zoom_ignored() {
        let mut zoom = Zoom::new();
        zoom.set(2.0);
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!((zoom.set(value) - 2.0).abs() < f64::EPSILON);
        }
        assert!(zoom.value().is_finite());
    }

    #[test]
    fn test_zoom_step_and_reset() {
        let mut zoom = Zoom::new();
        let stepped = zoom.zoom_in();
        assert!((stepped - 1.1).abs() < 1e-9);
        zoom.zoom_out();
        zoom.zoom_out();
        assert!((zoom.value() - 0.9).abs() < 1e-9);
        assert!((zoom.reset() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_document_point() {
        let mut zoom = Zoom::new();
        zoom.set(2.0);
        let point = zoom.document_point(Point::new(200.0, 100.0));
        assert!((point.x - 100.0).abs() < f64::EPSILON);
        assert!((point.y - 50.0).abs() < f64::EPSILON);
    }
}
