//! Text geometry: glyph-run bounding boxes and character counts.
//!
//! Boxes are approximate by design. The baseline origin comes from the text
//! item's transform; the extent comes from the reported width/height when the
//! access layer could estimate them, else from coarse device-space fallbacks.
//! They are used exclusively for overlap testing against reconstructed
//! overlay rectangles, never for rendering.

use crate::geometry::{DeviceRect, Viewport, VIEWPORT_SCALE};

/// Device-space width assumed per glyph when no width was reported.
pub const FALLBACK_GLYPH_WIDTH: f64 = 5.0;
/// Device-space line height assumed when no height was reported.
pub const FALLBACK_LINE_HEIGHT: f64 = 10.0;

/// One glyph run extracted from a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    /// Decoded text of the run. Glyph fidelity is not guaranteed; only the
    /// glyph count and whitespace structure matter here.
    pub text: String,
    /// Text matrix `[a, b, c, d, e, f]` in PDF user space; `e`/`f` are the
    /// baseline origin.
    pub transform: [f64; 6],
    /// Reported run width in user-space units, if known.
    pub width: Option<f64>,
    /// Reported run height in user-space units, if known.
    pub height: Option<f64>,
}

impl TextItem {
    /// Number of glyphs in the run.
    pub fn glyph_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Project every text item to its approximate device-space bounding box.
pub fn text_boxes(items: &[TextItem], viewport: &Viewport) -> Vec<DeviceRect> {
    items
        .iter()
        .map(|item| {
            let (vx, vy) = viewport.project_point(item.transform[4], item.transform[5]);
            let w = match item.width {
                Some(w) => w * VIEWPORT_SCALE,
                None => FALLBACK_GLYPH_WIDTH * item.glyph_count() as f64,
            };
            let h = match item.height {
                Some(h) => h * VIEWPORT_SCALE,
                None => FALLBACK_LINE_HEIGHT,
            };
            // vy is the baseline measured from the page top; the box extends
            // upward from it.
            DeviceRect::new(vx, vy - h, w, h)
        })
        .collect()
}

/// Count non-whitespace glyphs across all items.
pub fn count_text_chars(items: &[TextItem]) -> usize {
    items
        .iter()
        .map(|item| item.text.chars().filter(|c| !c.is_whitespace()).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, x: f64, y: f64) -> TextItem {
        TextItem {
            text: text.to_string(),
            transform: [1.0, 0.0, 0.0, 1.0, x, y],
            width: None,
            height: None,
        }
    }

    #[test]
    fn box_uses_baseline_origin() {
        let vp = Viewport::new(612.0, 792.0);
        let boxes = text_boxes(&[item("SSN 123-45-6789", 50.0, 700.0)], &vp);
        assert_eq!(boxes.len(), 1);
        let b = &boxes[0];
        assert!((b.x - 75.0).abs() < 1e-9);
        // Baseline at device y 138; box extends 10 units up.
        assert!((b.y - 128.0).abs() < 1e-9);
        assert!((b.h - FALLBACK_LINE_HEIGHT).abs() < 1e-9);
    }

    #[test]
    fn fallback_width_scales_with_glyph_count() {
        let vp = Viewport::new(612.0, 792.0);
        let boxes = text_boxes(&[item("abcd", 0.0, 100.0)], &vp);
        assert!((boxes[0].w - 20.0).abs() < 1e-9);
    }

    #[test]
    fn reported_extent_is_projected() {
        let vp = Viewport::new(612.0, 792.0);
        let mut it = item("hello", 10.0, 100.0);
        it.width = Some(40.0);
        it.height = Some(12.0);
        let boxes = text_boxes(&[it], &vp);
        assert!((boxes[0].w - 60.0).abs() < 1e-9);
        assert!((boxes[0].h - 18.0).abs() < 1e-9);
    }

    #[test]
    fn char_count_strips_whitespace() {
        let items = vec![item("SSN 123-45-6789", 0.0, 0.0), item(" \t\n", 0.0, 0.0)];
        assert_eq!(count_text_chars(&items), 14);
    }

    #[test]
    fn char_count_empty() {
        assert_eq!(count_text_chars(&[]), 0);
    }
}
