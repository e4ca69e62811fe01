//! Parsed PDF document wrapper.
//!
//! Wraps [`lopdf::Document`] with an ordered page index and the handful of
//! page-tree lookups the pipeline needs. Encrypted documents that lopdf can
//! still parse structurally are kept: their streams will not decode, so the
//! pages simply yield no signals, which is the best-effort behavior the
//! contract asks for.

use tracing::warn;

use crate::error::BackendError;

/// A parsed PDF document.
pub struct PdfFile {
    inner: lopdf::Document,
    /// Ordered page ObjectIds, indexed by 0-based page number.
    page_ids: Vec<lopdf::ObjectId>,
}

impl std::fmt::Debug for PdfFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfFile")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

impl PdfFile {
    /// Parse a document from raw bytes.
    pub fn open(bytes: &[u8]) -> Result<Self, BackendError> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            warn!("document is encrypted; streams may not decode");
        }

        // get_pages returns a BTreeMap keyed by 1-based page number.
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();

        Ok(Self { inner, page_ids })
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// ObjectId of the page at `index` (0-based).
    pub fn page_id(&self, index: usize) -> Result<lopdf::ObjectId, BackendError> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            BackendError::Parse(format!(
                "page index {index} out of range (0..{})",
                self.page_ids.len()
            ))
        })
    }

    /// User-space page dimensions `(width, height)` from the MediaBox,
    /// walking up the page tree for inherited values.
    pub fn page_size(&self, page_id: lopdf::ObjectId) -> Result<(f64, f64), BackendError> {
        let obj = resolve_inherited(&self.inner, page_id, b"MediaBox")?
            .ok_or_else(|| BackendError::Parse("MediaBox not found on page or ancestors".into()))?;
        let array = obj
            .as_array()
            .map_err(|e| BackendError::Parse(format!("MediaBox is not an array: {e}")))?;
        if array.len() != 4 {
            return Err(BackendError::Parse(format!(
                "expected 4-element MediaBox, got {}",
                array.len()
            )));
        }
        let x0 = object_to_f64(&array[0])?;
        let y0 = object_to_f64(&array[1])?;
        let x1 = object_to_f64(&array[2])?;
        let y1 = object_to_f64(&array[3])?;
        Ok(((x1 - x0).abs(), (y1 - y0).abs()))
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }

    /// Mutable access to the underlying lopdf document.
    pub fn inner_mut(&mut self) -> &mut lopdf::Document {
        &mut self.inner
    }

    /// Serialize the document back to bytes.
    ///
    /// Content streams are recompressed for compactness; the output always
    /// carries the standard `%PDF-` header.
    pub fn serialize(&mut self) -> Result<Vec<u8>, BackendError> {
        self.inner.compress();
        let mut buf = Vec::new();
        self.inner
            .save_to(&mut buf)
            .map_err(|e| BackendError::Serialize(e.to_string()))?;
        Ok(buf)
    }
}

/// Look up a key in the page dictionary, walking up the page tree via
/// `/Parent` when the key is not present on the page itself.
pub(crate) fn resolve_inherited<'a>(
    doc: &'a lopdf::Document,
    page_id: lopdf::ObjectId,
    key: &[u8],
) -> Result<Option<&'a lopdf::Object>, BackendError> {
    let mut current_id = page_id;
    loop {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }

        match dict.get(b"Parent") {
            Ok(parent_obj) => {
                current_id = parent_obj
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &lopdf::Object) -> Result<f64, BackendError> {
    match obj {
        lopdf::Object::Integer(i) => Ok(*i as f64),
        lopdf::Object::Real(f) => Ok(*f as f64),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}
