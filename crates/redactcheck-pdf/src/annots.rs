//! Page annotation access.
//!
//! Reads annotation subtypes for the inspector and deletes whole `Annots`
//! arrays for the sanitizer. Malformed annotation entries are skipped, never
//! fatal: a page that cannot be inspected contributes no annotation signal.

use redactcheck_core::PageAnnotation;
use tracing::debug;

use crate::document::PdfFile;
use crate::error::BackendError;

/// Read the annotations of a page.
///
/// Entries that do not resolve to a dictionary with a name-valued `/Subtype`
/// are skipped.
pub fn page_annotations(doc: &PdfFile, page_id: lopdf::ObjectId) -> Vec<PageAnnotation> {
    let Ok(page_dict) = doc
        .inner()
        .get_object(page_id)
        .and_then(lopdf::Object::as_dict)
    else {
        return Vec::new();
    };

    let Ok(annots_obj) = page_dict.get(b"Annots") else {
        return Vec::new();
    };

    let annots_obj = deref(doc.inner(), annots_obj);
    let Ok(entries) = annots_obj.as_array() else {
        debug!(page = ?page_id, "Annots entry is not an array; ignoring");
        return Vec::new();
    };

    let mut annotations = Vec::with_capacity(entries.len());
    for entry in entries {
        let entry = deref(doc.inner(), entry);
        let subtype = entry
            .as_dict()
            .and_then(|dict| dict.get(b"Subtype"))
            .and_then(lopdf::Object::as_name);
        match subtype {
            Ok(name) => annotations.push(PageAnnotation {
                subtype: String::from_utf8_lossy(name).into_owned(),
            }),
            Err(e) => debug!(page = ?page_id, error = %e, "skipping malformed annotation"),
        }
    }
    annotations
}

/// Delete the page's `Annots` entry entirely.
///
/// Returns whether the page had one.
pub fn delete_page_annots(
    doc: &mut PdfFile,
    page_id: lopdf::ObjectId,
) -> Result<bool, BackendError> {
    let page_dict = doc
        .inner_mut()
        .get_object_mut(page_id)
        .and_then(lopdf::Object::as_dict_mut)
        .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;
    Ok(page_dict.remove(b"Annots").is_some())
}

/// Follow reference chains to the pointed-to object. Cycles are cut off
/// after a fixed depth; the last reference is returned unresolved.
fn deref<'a>(doc: &'a lopdf::Document, mut obj: &'a lopdf::Object) -> &'a lopdf::Object {
    for _ in 0..16 {
        match obj {
            lopdf::Object::Reference(id) => match doc.get_object(*id) {
                Ok(inner) => obj = inner,
                Err(_) => return obj,
            },
            _ => return obj,
        }
    }
    obj
}
