//! Lowering of content-stream operations into draw-operator shapes.
//!
//! Every operation passes through with typed arguments; path construction is
//! the exception. Path segments accumulate until a fill operator, which emits
//! a single synthetic `fillPath` operation whose second argument is the flat
//! coordinate array the reconstructor walks: `re` rectangles contribute their
//! `(x, y, w, h)` tuple, closed straight-edged subpaths contribute their
//! bounding box as a corner pair. A subpath counts as closed with an explicit
//! `h` or when its polyline returns to its start point (boxes drawn as
//! `m l l l l` with no ClosePath). Stroke-only and no-op painting discards
//! the path without emitting.

use lopdf::content::Content;
use redactcheck_core::{ArgValue, DrawOp};
use tracing::debug;

use crate::document::PdfFile;
use crate::error::BackendError;
use crate::streams;

/// Coordinate-group marker for an explicit `re` rectangle.
const SEG_RECT: f64 = 0.0;
/// Coordinate-group marker for a closed polyline bounding box.
const SEG_POLY: f64 = 1.0;

/// Tolerance for treating a subpath's start and end points as coincident.
const COINCIDENT_TOLERANCE: f64 = 1e-6;

/// Decode and lower all content streams of a page.
///
/// Streams that fail to decode are skipped (the reconstructor then sees
/// nothing from them); an unparseable operator stream yields an empty list.
pub fn page_draw_ops(doc: &PdfFile, page_id: lopdf::ObjectId) -> Result<Vec<DrawOp>, BackendError> {
    let bytes = streams::page_content_bytes(doc, page_id)?;
    let content = match Content::decode(&bytes) {
        Ok(content) => content,
        Err(e) => {
            debug!(page = ?page_id, error = %e, "content stream did not parse; skipping");
            return Ok(Vec::new());
        }
    };
    Ok(lower_operations(&content.operations))
}

fn lower_operations(operations: &[lopdf::content::Operation]) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(operations.len());
    let mut path = PathAccumulator::default();

    for operation in operations {
        let operator = operation.operator.as_str();
        match operator {
            "re" => {
                if let Some(nums) = numeric_operands(&operation.operands, 4) {
                    path.push_rect(&nums);
                }
            }
            "m" => {
                if let Some(nums) = numeric_operands(&operation.operands, 2) {
                    path.move_to(nums[0], nums[1]);
                }
            }
            "l" => {
                if let Some(nums) = numeric_operands(&operation.operands, 2) {
                    path.line_to(nums[0], nums[1]);
                }
            }
            "c" | "v" | "y" => path.mark_curved(),
            "h" => path.close(),
            "f" | "F" | "f*" | "B" | "B*" | "b" | "b*" => {
                if let Some(op) = path.take_fill_op() {
                    ops.push(op);
                }
            }
            "S" | "s" | "n" => path.clear(),
            _ => {
                if let Some(args) = convert_operands(&operation.operands) {
                    ops.push(DrawOp::new(operator, args));
                }
            }
        }
    }

    ops
}

/// Collects path segments between construction and painting.
#[derive(Debug, Default)]
struct PathAccumulator {
    /// Flat coordinate groups, 4 numbers each.
    coords: Vec<f64>,
    /// Group markers parallel to `coords` (one per group).
    kinds: Vec<f64>,
    /// Current polyline subpath.
    subpath: Vec<(f64, f64)>,
    curved: bool,
}

impl PathAccumulator {
    fn push_rect(&mut self, xywh: &[f64]) {
        self.coords.extend_from_slice(xywh);
        self.kinds.push(SEG_RECT);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        // A new subpath finalizes a coincidentally-closed previous one and
        // abandons the rest.
        self.close_if_coincident();
        self.subpath.clear();
        self.curved = false;
        self.subpath.push((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if !self.subpath.is_empty() {
            self.subpath.push((x, y));
        }
    }

    fn mark_curved(&mut self) {
        self.curved = true;
    }

    /// `h`: closing a straight-edged subpath of at least three points turns
    /// it into its bounding box, recorded as a corner pair.
    fn close(&mut self) {
        if !self.curved && self.subpath.len() >= 3 {
            let min_x = self.subpath.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
            let max_x = self
                .subpath
                .iter()
                .map(|p| p.0)
                .fold(f64::NEG_INFINITY, f64::max);
            let min_y = self.subpath.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
            let max_y = self
                .subpath
                .iter()
                .map(|p| p.1)
                .fold(f64::NEG_INFINITY, f64::max);
            // Degenerate boxes would be misread as width/height tuples.
            if max_x > min_x && max_y > min_y {
                self.coords.extend_from_slice(&[min_x, min_y, max_x, max_y]);
                self.kinds.push(SEG_POLY);
            }
        }
        self.subpath.clear();
        self.curved = false;
    }

    /// A straight-edged subpath whose polyline ends back at its start is
    /// closed even without a `ClosePath` segment.
    fn close_if_coincident(&mut self) {
        if self.curved || self.subpath.len() < 4 {
            return;
        }
        let first = self.subpath[0];
        let last = self.subpath[self.subpath.len() - 1];
        if (first.0 - last.0).abs() < COINCIDENT_TOLERANCE
            && (first.1 - last.1).abs() < COINCIDENT_TOLERANCE
        {
            self.close();
        }
    }

    fn take_fill_op(&mut self) -> Option<DrawOp> {
        self.close_if_coincident();
        let coords = std::mem::take(&mut self.coords);
        let kinds = std::mem::take(&mut self.kinds);
        self.clear();
        if coords.is_empty() {
            return None;
        }
        Some(DrawOp::new(
            "fillPath",
            vec![
                ArgValue::Array(kinds.into_iter().map(ArgValue::Num).collect()),
                ArgValue::Array(coords.into_iter().map(ArgValue::Num).collect()),
            ],
        ))
    }

    fn clear(&mut self) {
        self.coords.clear();
        self.kinds.clear();
        self.subpath.clear();
        self.curved = false;
    }
}

fn numeric_operands(operands: &[lopdf::Object], expected: usize) -> Option<Vec<f64>> {
    if operands.len() < expected {
        return None;
    }
    operands[..expected]
        .iter()
        .map(|o| match o {
            lopdf::Object::Integer(i) => Some(*i as f64),
            lopdf::Object::Real(f) => Some(*f as f64),
            _ => None,
        })
        .collect()
}

/// Convert operands to typed argument values.
///
/// Operand kinds outside the shape vocabulary (dictionaries, references,
/// booleans) make the whole operation irrelevant to shape matching, so the
/// operation is dropped.
fn convert_operands(operands: &[lopdf::Object]) -> Option<Vec<ArgValue>> {
    operands.iter().map(convert_operand).collect()
}

fn convert_operand(obj: &lopdf::Object) -> Option<ArgValue> {
    match obj {
        lopdf::Object::Integer(i) => Some(ArgValue::Num(*i as f64)),
        lopdf::Object::Real(f) => Some(ArgValue::Num(*f as f64)),
        lopdf::Object::Name(name) => Some(ArgValue::Str(String::from_utf8_lossy(name).into_owned())),
        lopdf::Object::String(bytes, _) => {
            Some(ArgValue::Str(String::from_utf8_lossy(bytes).into_owned()))
        }
        lopdf::Object::Array(items) => items
            .iter()
            .map(convert_operand)
            .collect::<Option<Vec<_>>>()
            .map(ArgValue::Array),
        _ => None,
    }
}
