//! Output PDF assembly
//!
//! Serializes composed pages, in order, into a single PDF. Each page is one
//! full-bleed image XObject sized to the notebook canvas.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::error::{NotebookError, NotebookResult};
use super::types::OutputPage;

const PRODUCER: &str = concat!("notebook-server ", env!("CARGO_PKG_VERSION"));

/// Write `pages` into one PDF, preserving slice order
pub fn write_document(name: &str, pages: &[OutputPage]) -> NotebookResult<Vec<u8>> {
    if pages.is_empty() {
        return Err(NotebookError::EmptyDocument(name.to_string()));
    }

    let mut doc = Document::with_version("1.5");
    let page_tree_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = add_page(&mut doc, page_tree_id, page)?;
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        page_tree_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(kids.len() as i64)),
            ("Kids", Object::Array(kids)),
        ])),
    );

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(page_tree_id)),
    ]));
    let info_id = doc.add_object(Dictionary::from_iter([(
        "Producer",
        Object::string_literal(PRODUCER),
    )]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| NotebookError::PdfWrite(format!("Failed to save {}: {}", name, e)))?;

    tracing::debug!(name = %name, pages = pages.len(), bytes = output.len(), "Notebook PDF written");

    Ok(output)
}

fn add_page(doc: &mut Document, parent: ObjectId, page: &OutputPage) -> NotebookResult<ObjectId> {
    let (px_width, px_height) = page.image.dimensions();

    let mut image = Stream::new(
        Dictionary::from_iter([
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(px_width as i64)),
            ("Height", Object::Integer(px_height as i64)),
            ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
        ]),
        page.image.as_raw().clone(),
    );
    image.compress()?;
    let image_id = doc.add_object(image);

    let width = page.size.width;
    let height = page.size.height;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(width),
                    0.into(),
                    0.into(),
                    Object::Real(height),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));

    let resources = Dictionary::from_iter([(
        "XObject",
        Object::Dictionary(Dictionary::from_iter([("Im0", Object::Reference(image_id))])),
    )]);

    Ok(doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(parent)),
        (
            "MediaBox",
            Object::Array(vec![0.into(), 0.into(), Object::Real(width), Object::Real(height)]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ])))
}
