//! In-memory PDF builders shared by this crate's tests.

use lopdf::{Object, Stream, dictionary};

/// Declarative description of one test page.
#[derive(Debug, Clone)]
pub(crate) struct PageFixture {
    content: String,
    annot_subtypes: Vec<String>,
    media_box: (i64, i64),
}

impl PageFixture {
    /// Add an annotation with the given subtype.
    pub(crate) fn with_annot(mut self, subtype: &str) -> Self {
        self.annot_subtypes.push(subtype.to_string());
        self
    }

    /// Override the default US Letter MediaBox.
    #[allow(dead_code)]
    pub(crate) fn with_media_box(mut self, width: i64, height: i64) -> Self {
        self.media_box = (width, height);
        self
    }
}

/// A page with the given content stream, US Letter sized, no annotations.
pub(crate) fn page_builder(content: &str) -> PageFixture {
    PageFixture {
        content: content.to_string(),
        annot_subtypes: Vec::new(),
        media_box: (612, 792),
    }
}

/// Build a complete single-font PDF with the given pages.
pub(crate) fn minimal_pdf(pages: &[PageFixture]) -> Vec<u8> {
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
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}
