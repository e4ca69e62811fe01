//! Text-item extraction.
//!
//! Walks the page's content operations tracking just enough text state to
//! place each glyph run: the text matrix (`Tm`), line moves (`Td`/`TD`/`T*`),
//! leading (`TL`), the current font size (`Tf`), and translation-only `cm`
//! updates. Glyphs are decoded byte-per-glyph; fidelity does not matter here,
//! only counts and rough placement.

use lopdf::content::Content;
use redactcheck_core::TextItem;
use tracing::debug;

use crate::document::PdfFile;
use crate::error::BackendError;
use crate::streams;

const IDENTITY: [f64; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Fraction of the font size assumed as average glyph advance.
const AVG_GLYPH_ADVANCE: f64 = 0.5;

/// Extract the glyph runs of a page.
pub fn page_text_items(
    doc: &PdfFile,
    page_id: lopdf::ObjectId,
) -> Result<Vec<TextItem>, BackendError> {
    let bytes = streams::page_content_bytes(doc, page_id)?;
    let content = match Content::decode(&bytes) {
        Ok(content) => content,
        Err(e) => {
            debug!(page = ?page_id, error = %e, "content stream did not parse; no text items");
            return Ok(Vec::new());
        }
    };

    let mut walker = TextWalker::default();
    for operation in &content.operations {
        walker.apply(operation);
    }
    Ok(walker.items)
}

#[derive(Debug)]
struct TextWalker {
    items: Vec<TextItem>,
    /// Current text matrix.
    tm: [f64; 6],
    /// Line matrix, reset target for `T*` and friends.
    lm: [f64; 6],
    leading: f64,
    font_size: f64,
    /// Accumulated translation-only `cm` offset.
    translation: (f64, f64),
    in_text: bool,
}

impl Default for TextWalker {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            tm: IDENTITY,
            lm: IDENTITY,
            leading: 0.0,
            font_size: 0.0,
            translation: (0.0, 0.0),
            in_text: false,
        }
    }
}

impl TextWalker {
    fn apply(&mut self, operation: &lopdf::content::Operation) {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "BT" => {
                self.in_text = true;
                self.tm = IDENTITY;
                self.lm = IDENTITY;
            }
            "ET" => self.in_text = false,
            "cm" => {
                if let Some(m) = numbers(operands, 6) {
                    // Track the same translation-only idiom the rectangle
                    // reconstructor handles.
                    if m[0] == 1.0 && m[1] == 0.0 && m[2] == 0.0 && m[3] == 1.0
                        && (m[4] != 0.0 || m[5] != 0.0)
                    {
                        self.translation = (m[4], m[5]);
                    }
                }
            }
            "Tm" => {
                if let Some(m) = numbers(operands, 6) {
                    self.tm = [m[0], m[1], m[2], m[3], m[4], m[5]];
                    self.lm = self.tm;
                }
            }
            "Td" => {
                if let Some(v) = numbers(operands, 2) {
                    self.move_line(v[0], v[1]);
                }
            }
            "TD" => {
                if let Some(v) = numbers(operands, 2) {
                    self.leading = -v[1];
                    self.move_line(v[0], v[1]);
                }
            }
            "T*" => self.next_line(),
            "TL" => {
                if let Some(v) = numbers(operands, 1) {
                    self.leading = v[0];
                }
            }
            "Tf" => {
                if operands.len() >= 2 {
                    if let Some(v) = numbers(&operands[1..], 1) {
                        self.font_size = v[0];
                    }
                }
            }
            "Tj" => {
                if let Some(text) = string_operand(operands.first()) {
                    self.show(&text);
                }
            }
            "'" => {
                self.next_line();
                if let Some(text) = string_operand(operands.first()) {
                    self.show(&text);
                }
            }
            "\"" => {
                self.next_line();
                if let Some(text) = string_operand(operands.get(2)) {
                    self.show(&text);
                }
            }
            "TJ" => {
                if let Some(lopdf::Object::Array(items)) = operands.first() {
                    for item in items {
                        if let Some(text) = string_operand(Some(item)) {
                            self.show(&text);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        // Translate the line matrix in text space: lm = [1 0 0 1 tx ty] x lm.
        self.lm[4] += tx * self.lm[0] + ty * self.lm[2];
        self.lm[5] += tx * self.lm[1] + ty * self.lm[3];
        self.tm = self.lm;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_line(0.0, -leading);
    }

    fn show(&mut self, text: &str) {
        if !self.in_text || text.is_empty() {
            return;
        }
        let glyphs = text.chars().count();
        let (width, height) = if self.font_size > 0.0 {
            (
                Some(AVG_GLYPH_ADVANCE * self.font_size * glyphs as f64),
                Some(self.font_size),
            )
        } else {
            (None, None)
        };
        let mut transform = self.tm;
        transform[4] += self.translation.0;
        transform[5] += self.translation.1;
        self.items.push(TextItem {
            text: text.to_string(),
            transform,
            width,
            height,
        });
        // Advance past the run so successive shows on one line do not stack.
        if let Some(w) = width {
            self.tm[4] += w * self.tm[0];
            self.tm[5] += w * self.tm[1];
        }
    }
}

fn numbers(operands: &[lopdf::Object], expected: usize) -> Option<Vec<f64>> {
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

/// Decode a string operand byte-per-glyph.
fn string_operand(obj: Option<&lopdf::Object>) -> Option<String> {
    match obj {
        Some(lopdf::Object::String(bytes, _)) => {
            Some(bytes.iter().map(|&b| b as char).collect())
        }
        _ => None,
    }
}
