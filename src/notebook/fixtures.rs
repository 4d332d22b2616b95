//! PDF fixtures for tests
//!
//! Builds small documents in memory so tests never depend on files on disk.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};

/// PDF with one page per `(width, height)` entry, each marked with a dark block
pub fn pdf_with_pages(sizes: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let page_tree_id = doc.new_object_id();

    let kids: Vec<Object> = sizes
        .iter()
        .map(|&(width, height)| {
            let content = Content {
                operations: vec![
                    Operation::new("rg", vec![Object::Real(0.1), Object::Real(0.1), Object::Real(0.4)]),
                    Operation::new(
                        "re",
                        vec![
                            Object::Real(width * 0.25),
                            Object::Real(height * 0.25),
                            Object::Real(width * 0.5),
                            Object::Real(height * 0.5),
                        ],
                    ),
                    Operation::new("f", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                Dictionary::new(),
                content.encode().unwrap_or_default(),
            ));

            let page_id = doc.add_object(Dictionary::from_iter([
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(page_tree_id)),
                ("Contents", Object::Reference(content_id)),
                ("Resources", Object::Dictionary(Dictionary::new())),
                (
                    "MediaBox",
                    Object::Array(vec![0.into(), 0.into(), Object::Real(width), Object::Real(height)]),
                ),
            ]));
            Object::Reference(page_id)
        })
        .collect();

    finish(doc, page_tree_id, kids)
}

/// Structurally valid PDF whose page tree is empty
pub fn empty_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let page_tree_id = doc.new_object_id();
    finish(doc, page_tree_id, Vec::new())
}

fn finish(mut doc: Document, page_tree_id: lopdf::ObjectId, kids: Vec<Object>) -> Vec<u8> {
    let count = kids.len() as i64;
    doc.objects.insert(
        page_tree_id,
        Object::Dictionary(Dictionary::from_iter([
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ])),
    );

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(page_tree_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}
