//! PDF document writer built on `lopdf`.
//!
//! Each page gets its own content stream. A page with an image embeds the
//! bitmap as an uncompressed DeviceRGB XObject (alpha is dropped) and draws it
//! with a single `cm` + `Do` pair; the whole document is Flate-compressed on
//! save.
//!
//! PDF user space has its origin at the bottom-left, so placements arriving in
//! top-left coordinates are flipped by [`image_matrix`].

use super::writer::{DocumentError, DocumentWriter};
use crate::imaging::{Bitmap, Rect};
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::path::Path;

const CREATOR: &str = "page-assembler";
const TITLE: &str = "Image Compilation";

/// Transformation matrix placing a unit image square at `placement`.
///
/// `placement` uses a top-left origin; the result is in PDF user space.
pub fn image_matrix(placement: Rect, page_height_pt: f32) -> [f32; 6] {
    let pdf_y = page_height_pt - (placement.y + placement.height);
    [
        placement.width,
        0.0,
        0.0,
        placement.height,
        placement.x,
        pdf_y,
    ]
}

struct PdfState {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    width_pt: f32,
    height_pt: f32,
}

/// [`DocumentWriter`] producing a PDF file.
#[derive(Default)]
pub struct PdfWriter {
    state: Option<PdfState>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

fn rgb_bytes(bitmap: &Bitmap) -> Vec<u8> {
    bitmap
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect()
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

impl DocumentWriter for PdfWriter {
    fn begin(&mut self, width_pt: f32, height_pt: f32) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        self.state = Some(PdfState {
            doc,
            pages_id,
            page_ids: Vec::new(),
            width_pt,
            height_pt,
        });
    }

    fn write_page(
        &mut self,
        image: Option<&Bitmap>,
        placement: Option<Rect>,
    ) -> Result<(), DocumentError> {
        let state = self.state.as_mut().ok_or(DocumentError::NotStarted)?;
        let page_number = state.page_ids.len() + 1;

        let mut operations = Vec::new();
        let mut resources = Dictionary::new();

        if let (Some(bitmap), Some(rect)) = (image, placement) {
            let (width, height) = bitmap.dimensions();
            let xobject = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => Object::Integer(width as i64),
                    "Height" => Object::Integer(height as i64),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => Object::Integer(8),
                },
                rgb_bytes(bitmap),
            );
            let image_id = state.doc.add_object(xobject);
            resources = dictionary! {
                "XObject" => dictionary! { "Im0" => image_id },
            };

            let matrix = image_matrix(rect, state.height_pt);
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                matrix.iter().copied().map(real).collect(),
            ));
            operations.push(Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations }
            .encode()
            .map_err(|e| DocumentError::Encode {
                page: page_number,
                reason: e.to_string(),
            })?;
        let content_id = state
            .doc
            .add_object(Stream::new(Dictionary::new(), content));

        let page_id = state.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => state.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(state.width_pt),
                real(state.height_pt),
            ],
            "Contents" => content_id,
            "Resources" => resources,
        });
        state.page_ids.push(page_id);
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), DocumentError> {
        let mut state = self.state.take().ok_or(DocumentError::NotStarted)?;

        let kids: Vec<Object> = state.page_ids.iter().map(|id| (*id).into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(state.page_ids.len() as i64),
        };
        state
            .doc
            .objects
            .insert(state.pages_id, Object::Dictionary(pages));

        let catalog_id = state.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => state.pages_id,
        });
        let info_id = state.doc.add_object(dictionary! {
            "Creator" => Object::string_literal(CREATOR),
            "Title" => Object::string_literal(TITLE),
        });
        state.doc.trailer.set("Root", catalog_id);
        state.doc.trailer.set("Info", info_id);

        state.doc.compress();
        state.doc.save(path).map_err(|e| DocumentError::Save {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!(
            "Wrote {} pages to {}",
            state.page_ids.len(),
            path.display()
        );
        Ok(())
    }
}
