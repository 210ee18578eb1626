//! Document assembly: merge the saved page PNGs into one PDF.
//!
//! Each page image becomes a full-bleed `DeviceRGB` image XObject on its
//! own PDF page whose media box equals the pixel dimensions in points
//! (72 dpi, 1 px = 1 pt). The pages are emitted in list order, which the
//! capture loop guarantees is ascending page-number order.
//!
//! The images are reloaded from disk and normalised to RGB8 even though
//! their content is monochrome — a single colour space for every XObject
//! keeps the multi-frame encoding uniform.

use crate::error::CaptureError;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Merge `paths` (non-empty, in final page order) into a PDF at `out`.
///
/// The caller decides what to do about an empty run; passing no paths is
/// a programming error here.
pub fn assemble_pdf(paths: &[PathBuf], out: &Path) -> Result<(), CaptureError> {
    if paths.is_empty() {
        return Err(CaptureError::Internal(
            "assemble_pdf called with no pages".into(),
        ));
    }

    let mut doc = Document::with_version("1.5");
    let mut page_ids = Vec::with_capacity(paths.len());

    for (index, path) in paths.iter().enumerate() {
        let rgb = reload_rgb(path)?;
        let (width, height) = rgb.dimensions();

        let image_stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb.into_raw(),
        );
        let image_id = doc.add_object(image_stream);
        let image_name = format!("Im{index}");

        // Scale the unit image square up to the full media box.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        (width as i64).into(),
                        0.into(),
                        0.into(),
                        (height as i64).into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(image_name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content
            .encode()
            .map_err(|e| CaptureError::Internal(format!("content encoding failed: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => vec![0.into(), 0.into(), (width as i64).into(), (height as i64).into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    image_name => image_id,
                },
            },
        });
        page_ids.push(page_id);
        debug!("Placed '{}' as PDF page {}", path.display(), index + 1);
    }

    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.iter().map(|&id| id.into()).collect::<Vec<Object>>(),
        "Count" => page_ids.len() as i64,
    });

    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            dict.set("Parent", pages_id);
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.compress();
    doc.save(out).map_err(|e| CaptureError::Assembly {
        path: out.to_path_buf(),
        detail: e.to_string(),
    })?;

    info!("PDF created at {}", out.display());
    Ok(())
}

/// Reload a saved page image and normalise it to RGB8.
fn reload_rgb(path: &Path) -> Result<RgbImage, CaptureError> {
    let img = image::open(path).map_err(|e| CaptureError::Reload {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok(img.to_rgb8())
}
