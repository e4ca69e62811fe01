//! Rectangle reconstruction from draw-operator streams.
//!
//! Interprets a lowered operator list into device-space filled rectangles
//! that plausibly act as redaction overlays: near-black, at least 5 units on
//! a side, neither speck-sized nor page-covering. The interpretation is
//! *shape-based* — it inspects argument tuples, not operator identities — and
//! keeps only the minimal state that the common overlay-authoring idiom
//! requires: the current fill color and the most recent pure translation.
//!
//! Unrecognized shapes are skipped without error. Over-detection is tolerated
//! (the scorer and area filters compensate); rectangles placed via scaling or
//! rotation are a known false negative.

use std::collections::HashSet;

use crate::geometry::{DeviceRect, Viewport};
use crate::ops::{ArgValue, DrawOp};

/// Minimum rectangle side length, in user-space units, before projection.
pub const MIN_SIDE: f64 = 5.0;
/// Inclusive per-channel darkness threshold for a fill to count as black.
pub const DARKNESS_MAX: f64 = 0.15;
/// Rectangles covering more than this fraction of the page are background.
pub const MAX_AREA_FRACTION: f64 = 0.6;
/// Relative floor for rectangle area (fraction of page area).
pub const MIN_AREA_FRACTION: f64 = 0.0005;
/// Absolute floor for rectangle area, in device units.
pub const MIN_AREA_ABS: f64 = 2000.0;

/// Upper bound on corner coordinates for corner-pair detection. Values at or
/// above this are assumed to be width/height, not a far corner.
const CORNER_COORD_MAX: f64 = 10000.0;

#[derive(Debug, Default)]
struct FillState {
    rgb: Option<(f64, f64, f64)>,
    gray: Option<f64>,
    translation: (f64, f64),
}

impl FillState {
    fn is_dark(&self) -> bool {
        if let Some((r, g, b)) = self.rgb {
            return r <= DARKNESS_MAX && g <= DARKNESS_MAX && b <= DARKNESS_MAX;
        }
        if let Some(g) = self.gray {
            return g <= DARKNESS_MAX;
        }
        false
    }
}

/// Reconstruct the deduplicated set of suspicious filled rectangles for one
/// page.
pub fn reconstruct_rects(ops: &[DrawOp], viewport: &Viewport) -> Vec<DeviceRect> {
    let mut state = FillState::default();
    let mut seen: HashSet<(i64, i64, i64, i64)> = HashSet::new();
    let mut rects = Vec::new();

    for op in ops {
        if let Some(nums) = op.numeric_args() {
            match nums.len() {
                6 => {
                    apply_transform(&mut state, &nums);
                    continue;
                }
                3 => {
                    state.rgb = Some((nums[0], nums[1], nums[2]));
                    state.gray = None;
                    continue;
                }
                1 => {
                    state.gray = Some(nums[0]);
                    state.rgb = None;
                    continue;
                }
                _ => {}
            }
        }

        // A single string argument may carry a CSS-style fill color.
        if op.args.len() == 1 {
            if let Some(rgb) = op.args[0].as_str().and_then(parse_hex_rgb) {
                state.rgb = Some(rgb);
                state.gray = None;
                continue;
            }
        }

        if let Some(coords) = coords_candidate(&op.args) {
            collect_rects(&coords, &state, viewport, &mut seen, &mut rects);
        }
    }

    rects
}

/// Track only the identity (ignored) and pure-translation matrix shapes.
fn apply_transform(state: &mut FillState, m: &[f64]) {
    let is_linear_identity = m[0] == 1.0 && m[1] == 0.0 && m[2] == 0.0 && m[3] == 1.0;
    if !is_linear_identity {
        return;
    }
    if m[4] == 0.0 && m[5] == 0.0 {
        return;
    }
    state.translation = (m[4], m[5]);
}

/// Locate the coordinate array inside an operator's arguments.
///
/// `args[1]` is used when it is an array of at least 4 numbers; failing that,
/// `args[2]` when it is an all-numeric array of at least 4 elements.
fn coords_candidate(args: &[ArgValue]) -> Option<Vec<f64>> {
    if let Some(arr) = args.get(1).and_then(ArgValue::as_array) {
        if arr.len() >= 4 {
            if let Some(nums) = all_numeric(arr) {
                return Some(nums);
            }
        }
    }
    if let Some(arr) = args.get(2).and_then(ArgValue::as_array) {
        if arr.len() >= 4 {
            if let Some(nums) = all_numeric(arr) {
                return Some(nums);
            }
        }
    }
    None
}

fn all_numeric(arr: &[ArgValue]) -> Option<Vec<f64>> {
    arr.iter().map(ArgValue::as_num).collect()
}

/// Walk the coordinate array in 4-number groups and emit every group that
/// survives the darkness, size, and area filters.
fn collect_rects(
    coords: &[f64],
    state: &FillState,
    viewport: &Viewport,
    seen: &mut HashSet<(i64, i64, i64, i64)>,
    out: &mut Vec<DeviceRect>,
) {
    if !state.is_dark() {
        return;
    }

    let page_area = viewport.area();
    for group in coords.chunks_exact(4) {
        let (mut x, mut y, w, h) = decode_group(group);
        x += state.translation.0;
        y += state.translation.1;
        let w = w.abs();
        let h = h.abs();
        if w < MIN_SIDE || h < MIN_SIDE {
            continue;
        }

        let rect = viewport.project_rect(x, y, x + w, y + h);
        let area = rect.area();
        if area / page_area > MAX_AREA_FRACTION {
            continue;
        }
        if area < MIN_AREA_ABS.max(page_area * MIN_AREA_FRACTION) {
            continue;
        }
        if seen.insert(rect.dedup_key()) {
            out.push(rect);
        }
    }
}

/// Decode one 4-number group as either a corner pair `(x1, y1, x2, y2)` or a
/// direct `(x, y, w, h)` tuple.
fn decode_group(g: &[f64]) -> (f64, f64, f64, f64) {
    let (n0, n1, n2, n3) = (g[0], g[1], g[2], g[3]);
    let corner_pair =
        n2 > n0 && n3 > n1 && n2 < CORNER_COORD_MAX && n3 < CORNER_COORD_MAX;
    if corner_pair {
        (n0, n1, n2 - n0, n3 - n1)
    } else {
        (n0, n1, n2, n3)
    }
}

/// Parse a `#RRGGBB` string into normalized RGB channels.
fn parse_hex_rgb(s: &str) -> Option<(f64, f64, f64)> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter_viewport() -> Viewport {
        Viewport::new(612.0, 792.0)
    }

    fn num(v: f64) -> ArgValue {
        ArgValue::Num(v)
    }

    fn nums(vs: &[f64]) -> Vec<ArgValue> {
        vs.iter().copied().map(ArgValue::Num).collect()
    }

    /// A fill-path op whose coordinate array sits at args[1].
    fn path_op(coords: &[f64]) -> DrawOp {
        DrawOp::new(
            "fillPath",
            vec![ArgValue::Array(vec![]), ArgValue::Array(nums(coords))],
        )
    }

    fn black_rgb() -> DrawOp {
        DrawOp::new("rg", nums(&[0.0, 0.0, 0.0]))
    }

    // --- Fill color shape detection ---

    #[test]
    fn black_rgb_rect_is_emitted() {
        let ops = vec![black_rgb(), path_op(&[48.0, 696.0, 180.0, 20.0])];
        let rects = reconstruct_rects(&ops, &letter_viewport());
        assert_eq!(rects.len(), 1);
        assert!((rects[0].w - 270.0).abs() < 1e-9);
        assert!((rects[0].h - 30.0).abs() < 1e-9);
    }

    #[test]
    fn no_fill_color_emits_nothing() {
        let ops = vec![path_op(&[48.0, 696.0, 180.0, 20.0])];
        assert!(reconstruct_rects(&ops, &letter_viewport()).is_empty());
    }

    #[test]
    fn light_rgb_emits_nothing() {
        let ops = vec![
            DrawOp::new("rg", nums(&[1.0, 1.0, 1.0])),
            path_op(&[48.0, 696.0, 180.0, 20.0]),
        ];
        assert!(reconstruct_rects(&ops, &letter_viewport()).is_empty());
    }

    #[test]
    fn darkness_threshold_is_inclusive() {
        let ops = vec![
            DrawOp::new("rg", nums(&[0.15, 0.15, 0.15])),
            path_op(&[48.0, 696.0, 180.0, 20.0]),
        ];
        assert_eq!(reconstruct_rects(&ops, &letter_viewport()).len(), 1);
    }

    #[test]
    fn just_above_darkness_threshold_is_rejected() {
        let ops = vec![
            DrawOp::new("rg", nums(&[0.1501, 0.0, 0.0])),
            path_op(&[48.0, 696.0, 180.0, 20.0]),
        ];
        assert!(reconstruct_rects(&ops, &letter_viewport()).is_empty());
    }

    #[test]
    fn dark_gray_fill_is_emitted() {
        let ops = vec![
            DrawOp::new("g", nums(&[0.0])),
            path_op(&[100.0, 100.0, 200.0, 20.0]),
        ];
        assert_eq!(reconstruct_rects(&ops, &letter_viewport()).len(), 1);
    }

    #[test]
    fn rgb_clears_gray_and_vice_versa() {
        // Dark gray then light RGB: the RGB set must win.
        let ops = vec![
            DrawOp::new("g", nums(&[0.0])),
            DrawOp::new("rg", nums(&[0.9, 0.9, 0.9])),
            path_op(&[100.0, 100.0, 200.0, 20.0]),
        ];
        assert!(reconstruct_rects(&ops, &letter_viewport()).is_empty());
    }

    #[test]
    fn hex_string_fill_color() {
        let ops = vec![
            DrawOp::new("setFillColor", vec![ArgValue::Str("#000000".into())]),
            path_op(&[100.0, 100.0, 200.0, 20.0]),
        ];
        assert_eq!(reconstruct_rects(&ops, &letter_viewport()).len(), 1);

        let ops = vec![
            DrawOp::new("setFillColor", vec![ArgValue::Str("#ff0000".into())]),
            path_op(&[100.0, 100.0, 200.0, 20.0]),
        ];
        assert!(reconstruct_rects(&ops, &letter_viewport()).is_empty());
    }

    // --- Transform handling ---

    #[test]
    fn pure_translation_is_applied_to_origin() {
        let ops = vec![
            DrawOp::new("cm", nums(&[1.0, 0.0, 0.0, 1.0, 40.0, 90.0])),
            black_rgb(),
            path_op(&[10.0, 10.0, 200.0, 20.0]),
        ];
        let rects = reconstruct_rects(&ops, &letter_viewport());
        assert_eq!(rects.len(), 1);
        assert!((rects[0].x - 75.0).abs() < 1e-9);
    }

    #[test]
    fn identity_matrix_is_ignored() {
        let ops = vec![
            DrawOp::new("cm", nums(&[1.0, 0.0, 0.0, 1.0, 40.0, 90.0])),
            DrawOp::new("cm", nums(&[1.0, 0.0, 0.0, 1.0, 0.0, 0.0])),
            black_rgb(),
            path_op(&[10.0, 10.0, 200.0, 20.0]),
        ];
        // Identity does not reset the earlier translation.
        let rects = reconstruct_rects(&ops, &letter_viewport());
        assert!((rects[0].x - 75.0).abs() < 1e-9);
    }

    #[test]
    fn scaling_matrix_is_skipped() {
        let ops = vec![
            DrawOp::new("cm", nums(&[2.0, 0.0, 0.0, 2.0, 40.0, 90.0])),
            black_rgb(),
            path_op(&[10.0, 10.0, 200.0, 20.0]),
        ];
        let rects = reconstruct_rects(&ops, &letter_viewport());
        // No translation composed; rect stays at its raw origin.
        assert!((rects[0].x - 15.0).abs() < 1e-9);
    }

    // --- Coordinate decoding ---

    #[test]
    fn corner_pair_group_is_converted() {
        // (10, 20, 200, 300) reads as corners, giving a 190x280 rect.
        let ops = vec![black_rgb(), path_op(&[10.0, 20.0, 200.0, 300.0])];
        let rects = reconstruct_rects(&ops, &letter_viewport());
        assert_eq!(rects.len(), 1);
        assert!((rects[0].w - 190.0 * 1.5).abs() < 1e-9);
        assert!((rects[0].h - 280.0 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn direct_xywh_group_is_kept() {
        // n3 < n1, so this cannot be a corner pair.
        let ops = vec![black_rgb(), path_op(&[48.0, 696.0, 180.0, 20.0])];
        let rects = reconstruct_rects(&ops, &letter_viewport());
        assert!((rects[0].w - 270.0).abs() < 1e-9);
    }

    #[test]
    fn coords_candidate_at_args2() {
        let op = DrawOp::new(
            "fillPath",
            vec![
                ArgValue::Array(vec![]),
                ArgValue::Str("marker".into()),
                ArgValue::Array(nums(&[48.0, 696.0, 180.0, 20.0])),
            ],
        );
        let rects = reconstruct_rects(&[black_rgb(), op], &letter_viewport());
        assert_eq!(rects.len(), 1);
    }

    #[test]
    fn multiple_groups_in_one_array() {
        let ops = vec![
            black_rgb(),
            path_op(&[48.0, 696.0, 180.0, 20.0, 48.0, 600.0, 180.0, 20.0]),
        ];
        assert_eq!(reconstruct_rects(&ops, &letter_viewport()).len(), 2);
    }

    #[test]
    fn trailing_partial_group_is_ignored() {
        let ops = vec![
            black_rgb(),
            path_op(&[48.0, 696.0, 180.0, 20.0, 7.0, 8.0]),
        ];
        assert_eq!(reconstruct_rects(&ops, &letter_viewport()).len(), 1);
    }

    // --- Size and area filters ---

    #[test]
    fn thin_sides_are_rejected() {
        let ops = vec![black_rgb(), path_op(&[100.0, 100.0, 400.0, 4.9])];
        assert!(reconstruct_rects(&ops, &letter_viewport()).is_empty());
    }

    #[test]
    fn speck_below_min_area_is_rejected() {
        // 25x10 user = 37.5x15 device = 562.5 < 2000.
        let ops = vec![black_rgb(), path_op(&[100.0, 100.0, 25.0, 10.0])];
        assert!(reconstruct_rects(&ops, &letter_viewport()).is_empty());
    }

    #[test]
    fn exactly_min_area_is_emitted() {
        // Device area exactly 2000: 50 x 40 device = 2000, from user 100/3 x 80/3.
        let vp = letter_viewport();
        assert!(vp.area() * MIN_AREA_FRACTION < MIN_AREA_ABS);
        let ops = vec![
            black_rgb(),
            path_op(&[100.0, 100.0, 100.0 / 3.0, 80.0 / 3.0]),
        ];
        let rects = reconstruct_rects(&ops, &vp);
        assert_eq!(rects.len(), 1);
        assert!((rects[0].area() - 2000.0).abs() < 1e-6);
    }

    #[test]
    fn page_covering_rect_is_rejected() {
        // 600x500 on a 600x800 page covers 62.5%.
        let vp = Viewport::new(600.0, 800.0);
        let ops = vec![black_rgb(), path_op(&[0.0, 0.0, 600.0, 500.0])];
        assert!(reconstruct_rects(&ops, &vp).is_empty());
    }

    #[test]
    fn exactly_sixty_percent_is_kept() {
        // Corners (0,0)-(600,480) on 600x800 cover exactly 0.6 — the limit
        // is exclusive.
        let vp = Viewport::new(600.0, 800.0);
        let ops = vec![black_rgb(), path_op(&[0.0, 0.0, 600.0, 480.0])];
        let rects = reconstruct_rects(&ops, &vp);
        assert_eq!(rects.len(), 1);
        assert!((rects[0].area() / vp.area() - 0.6).abs() < 1e-9);
    }

    // --- Dedup ---

    #[test]
    fn duplicate_rects_are_deduplicated() {
        let ops = vec![
            black_rgb(),
            path_op(&[48.0, 696.0, 180.0, 20.0]),
            path_op(&[48.0, 696.0, 180.0, 20.0]),
        ];
        assert_eq!(reconstruct_rects(&ops, &letter_viewport()).len(), 1);
    }

    // --- Robustness ---

    #[test]
    fn unrecognized_ops_are_skipped() {
        let ops = vec![
            DrawOp::new("Tf", vec![ArgValue::Str("F1".into()), num(12.0)]),
            DrawOp::new("weird", vec![ArgValue::Array(vec![ArgValue::Str("x".into())])]),
            black_rgb(),
            path_op(&[48.0, 696.0, 180.0, 20.0]),
        ];
        assert_eq!(reconstruct_rects(&ops, &letter_viewport()).len(), 1);
    }

    #[test]
    fn hex_parse_rejects_bad_input() {
        assert_eq!(parse_hex_rgb("#12345"), None);
        assert_eq!(parse_hex_rgb("123456"), None);
        assert_eq!(parse_hex_rgb("#zzzzzz"), None);
        assert_eq!(parse_hex_rgb("#000000"), Some((0.0, 0.0, 0.0)));
    }
}
