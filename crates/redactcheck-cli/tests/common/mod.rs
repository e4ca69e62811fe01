//! PDF fixtures for CLI integration tests.

use lopdf::{Object, Stream, dictionary};

/// Build a single-page PDF with the given content stream and annotation
/// subtypes.
pub fn pdf_with(content: &str, annot_subtypes: &[&str]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let pages_id = doc.new_object_id();

    let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));

    let annot_refs: Vec<Object> = annot_subtypes
        .iter()
        .map(|subtype| {
            let annot_id = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => *subtype,
                "Rect" => vec![
                    Object::Integer(100),
                    Object::Integer(700),
                    Object::Integer(200),
                    Object::Integer(750),
                ],
            });
            Object::Reference(annot_id)
        })
        .collect();

    let mut page_dict = dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        },
    };
    if !annot_refs.is_empty() {
        page_dict.set("Annots", annot_refs);
    }
    let page_id = doc.add_object(page_dict);

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1i64,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save fixture PDF");
    buf
}

/// A page whose text sits under a drawn black rectangle.
pub fn overlay_pdf() -> Vec<u8> {
    pdf_with(
        concat!(
            "BT /F1 12 Tf 50 700 Td (SSN 123-45-6789 CONFIDENTIAL) Tj ET\n",
            "0 0 0 rg\n",
            "48 696 180 20 re\n",
            "f",
        ),
        &[],
    )
}

/// Write bytes to a temp file that lives until dropped.
pub fn temp_pdf(bytes: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(bytes).unwrap();
    tmp.flush().unwrap();
    tmp
}
