//! In-memory PDF fixtures for the integration tests.

use lopdf::{Object, Stream, dictionary};

/// Declarative description of one fixture page.
#[derive(Debug, Clone)]
pub struct FixturePage {
    content: String,
    annot_subtypes: Vec<String>,
    media_box: (i64, i64),
}

impl FixturePage {
    /// A US Letter page with the given content stream.
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            annot_subtypes: Vec::new(),
            media_box: (612, 792),
        }
    }

    /// Add an annotation with the given subtype.
    pub fn with_annot(mut self, subtype: &str) -> Self {
        self.annot_subtypes.push(subtype.to_string());
        self
    }

    /// Override the default MediaBox.
    pub fn with_media_box(mut self, width: i64, height: i64) -> Self {
        self.media_box = (width, height);
        self
    }
}

/// Build a complete PDF with the given pages.
pub fn build_pdf(pages: &[FixturePage]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            page.content.clone().into_bytes(),
        ));

        let annot_refs: Vec<Object> = page
            .annot_subtypes
            .iter()
            .map(|subtype| {
                let annot_id = doc.add_object(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => subtype.as_str(),
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
                Object::Integer(page.media_box.0),
                Object::Integer(page.media_box.1),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => Object::Reference(font_id) },
            },
        };
        if !annot_refs.is_empty() {
            page_dict.set("Annots", annot_refs);
        }
        kids.push(Object::Reference(doc.add_object(page_dict)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
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

/// A page whose text sits under a drawn black rectangle (the classic
/// improper redaction).
pub fn overlay_page() -> FixturePage {
    FixturePage::new(concat!(
        "BT /F1 12 Tf 50 700 Td (SSN 123-45-6789 CONFIDENTIAL) Tj ET\n",
        "0 0 0 rg\n",
        "48 696 180 20 re\n",
        "f",
    ))
}

/// A page with enough text to count as textual and nothing else.
pub fn text_only_page() -> FixturePage {
    FixturePage::new("BT /F1 12 Tf 72 720 Td (Quarterly report, nothing hidden here) Tj ET")
}

/// A page with text and a redaction annotation but no drawn overlay.
pub fn redact_annot_page() -> FixturePage {
    FixturePage::new("BT /F1 12 Tf 72 720 Td (CLASSIFIED DOCUMENT - EYES ONLY) Tj ET")
        .with_annot("Redact")
}
