//! Risk scoring: combines per-page signals into a confidence and a verdict.
//!
//! The weights below are part of the audit contract. Changing any of them is
//! a schema-level change, not a tuning knob.

use serde::{Deserialize, Serialize};

use crate::geometry::DeviceRect;
use crate::rects::MAX_AREA_FRACTION;

/// Bonus when any reconstructed rectangle overlaps a text box.
pub const OVERLAP_BONUS: i32 = 40;
/// Bonus when the page carries at least one redaction annotation.
pub const ANNOTATION_BONUS: i32 = 50;
/// Bonus when the dark-rectangle area ratio sits in the moderate band.
pub const MODERATE_AREA_BONUS: i32 = 15;
/// Bonus when any rectangle is elongated at least 3:1 in either orientation.
pub const ELONGATION_BONUS: i32 = 10;
/// Penalty when the page has no meaningful text.
pub const NO_TEXT_PENALTY: i32 = 20;
/// Penalty when any rectangle covers more than 60% of the page.
pub const GIANT_RECT_PENALTY: i32 = 30;

/// Inclusive moderate-area band for the +15 bonus.
pub const MODERATE_AREA_MIN: f64 = 0.005;
/// Upper bound of the moderate-area band.
pub const MODERATE_AREA_MAX: f64 = 0.2;
/// Minimum elongation for the +10 bonus.
pub const ELONGATION_MIN: f64 = 3.0;
/// Minimum non-whitespace glyph count for `has_text`.
pub const TEXT_CHAR_THRESHOLD: usize = 20;
/// Confidence at or above which a page is flagged.
pub const FLAG_THRESHOLD: u8 = 20;

/// Binary per-page verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Risk {
    /// The page warrants review or cleaning.
    Flagged,
    /// No evidence of an improper redaction.
    None,
}

/// The raw evidence collected for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSignals {
    /// Whether the page has at least [`TEXT_CHAR_THRESHOLD`] non-whitespace
    /// glyphs.
    pub has_text: bool,
    /// Non-whitespace glyph count.
    pub text_chars: usize,
    /// Number of reconstructed dark rectangles.
    pub dark_rects: usize,
    /// Total dark-rectangle area divided by page area, rounded to 4 decimal
    /// places.
    pub dark_rect_area_ratio: f64,
    /// Number of redaction annotations.
    pub redact_annots: usize,
    /// Whether any dark rectangle intersects any text box.
    pub overlaps_text_likely: bool,
}

impl PageSignals {
    /// Derive `has_text` from a glyph count.
    pub fn has_text_for(text_chars: usize) -> bool {
        text_chars >= TEXT_CHAR_THRESHOLD
    }
}

/// Score one page.
///
/// `rects` must be the same reconstructed set the signals were derived from;
/// the scorer consults it for the elongation and page-coverage terms, which
/// signals alone do not capture. Returns the clamped confidence and verdict.
pub fn score_page(signals: &PageSignals, rects: &[DeviceRect], page_area: f64) -> (u8, Risk) {
    let mut score: i32 = 0;

    if signals.overlaps_text_likely {
        score += OVERLAP_BONUS;
    }
    if signals.redact_annots > 0 {
        score += ANNOTATION_BONUS;
    }
    if signals.dark_rect_area_ratio >= MODERATE_AREA_MIN
        && signals.dark_rect_area_ratio <= MODERATE_AREA_MAX
    {
        score += MODERATE_AREA_BONUS;
    }
    if rects.iter().any(|r| r.elongation() >= ELONGATION_MIN) {
        score += ELONGATION_BONUS;
    }
    if !signals.has_text {
        score -= NO_TEXT_PENALTY;
    }
    if page_area > 0.0
        && rects.iter().any(|r| r.area() / page_area > MAX_AREA_FRACTION)
    {
        score -= GIANT_RECT_PENALTY;
    }

    let confidence = score.clamp(0, 100) as u8;
    let risk = if confidence >= FLAG_THRESHOLD {
        Risk::Flagged
    } else {
        Risk::None
    };
    (confidence, risk)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals() -> PageSignals {
        PageSignals {
            has_text: true,
            text_chars: 100,
            dark_rects: 0,
            dark_rect_area_ratio: 0.0,
            redact_annots: 0,
            overlaps_text_likely: false,
        }
    }

    #[test]
    fn clean_page_scores_zero() {
        let (confidence, risk) = score_page(&signals(), &[], 1000.0);
        assert_eq!(confidence, 0);
        assert_eq!(risk, Risk::None);
    }

    #[test]
    fn overlap_alone_flags() {
        let mut s = signals();
        s.dark_rects = 1;
        s.overlaps_text_likely = true;
        let rect = DeviceRect::new(0.0, 0.0, 50.0, 50.0);
        let (confidence, risk) = score_page(&s, &[rect], 1_000_000.0);
        assert_eq!(confidence, 40);
        assert_eq!(risk, Risk::Flagged);
    }

    #[test]
    fn annotation_alone_flags() {
        let mut s = signals();
        s.redact_annots = 1;
        let (confidence, risk) = score_page(&s, &[], 1000.0);
        assert_eq!(confidence, 50);
        assert_eq!(risk, Risk::Flagged);
    }

    #[test]
    fn moderate_area_band_is_inclusive() {
        for ratio in [0.005, 0.1, 0.2] {
            let mut s = signals();
            s.dark_rect_area_ratio = ratio;
            let (confidence, _) = score_page(&s, &[], 1000.0);
            assert_eq!(confidence, 15, "ratio {ratio}");
        }
        for ratio in [0.0049, 0.2001] {
            let mut s = signals();
            s.dark_rect_area_ratio = ratio;
            let (confidence, _) = score_page(&s, &[], 1000.0);
            assert_eq!(confidence, 0, "ratio {ratio}");
        }
    }

    #[test]
    fn elongated_rect_adds_bonus() {
        let s = signals();
        let rect = DeviceRect::new(0.0, 0.0, 300.0, 100.0);
        let (confidence, _) = score_page(&s, &[rect], 10_000_000.0);
        assert_eq!(confidence, 10);
    }

    #[test]
    fn no_text_penalty_applies() {
        let mut s = signals();
        s.has_text = false;
        s.text_chars = 0;
        s.redact_annots = 1;
        let (confidence, risk) = score_page(&s, &[], 1000.0);
        assert_eq!(confidence, 30);
        assert_eq!(risk, Risk::Flagged);
    }

    #[test]
    fn confidence_never_negative() {
        let mut s = signals();
        s.has_text = false;
        let (confidence, risk) = score_page(&s, &[], 1000.0);
        assert_eq!(confidence, 0);
        assert_eq!(risk, Risk::None);
    }

    #[test]
    fn confidence_clamped_to_hundred() {
        let mut s = signals();
        s.overlaps_text_likely = true;
        s.redact_annots = 2;
        s.dark_rect_area_ratio = 0.05;
        s.dark_rects = 1;
        let rect = DeviceRect::new(0.0, 0.0, 600.0, 30.0);
        let (confidence, risk) = score_page(&s, &[rect], 10_000_000.0);
        assert_eq!(confidence, 100);
        assert_eq!(risk, Risk::Flagged);
    }

    #[test]
    fn flag_threshold_boundary() {
        // 15 (moderate) + 10 (elongation) = 25 >= 20 flags; 15 alone does not.
        let mut s = signals();
        s.dark_rect_area_ratio = 0.05;
        let (confidence, risk) = score_page(&s, &[], 1000.0);
        assert_eq!(confidence, 15);
        assert_eq!(risk, Risk::None);

        let rect = DeviceRect::new(0.0, 0.0, 300.0, 30.0);
        let (confidence, risk) = score_page(&s, &[rect], 10_000_000.0);
        assert_eq!(confidence, 25);
        assert_eq!(risk, Risk::Flagged);
    }

    #[test]
    fn scorer_is_pure() {
        let mut s = signals();
        s.overlaps_text_likely = true;
        let a = score_page(&s, &[], 1000.0);
        let b = score_page(&s, &[], 1000.0);
        assert_eq!(a, b);
    }

    #[test]
    fn risk_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Risk::Flagged).unwrap(), "\"flagged\"");
        assert_eq!(serde_json::to_string(&Risk::None).unwrap(), "\"none\"");
    }
}
