//! Capture orchestration: the whole run, from first GET to finished PDF.
//!
//! ## Why eager and sequential?
//!
//! A teletext magazine is ~70 pages of a few kilobytes each; the whole
//! fetch fits comfortably in one blocking pass, and the upstream service
//! is a legacy endpoint that does not appreciate parallel hammering. The
//! loop awaits every page before requesting the next, so the saved-page
//! list is appended in ascending page order by construction — the
//! assembler never has to sort.

use crate::config::{CaptureConfig, DecodePolicy};
use crate::error::CaptureError;
use crate::output::{CaptureOutput, CaptureStats, PageOutcome, PageRecord};
use crate::pipeline::{assemble, fetch, filter, font::FooterFont, render};
use chrono::Local;
use image::GrayImage;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Result of pushing one fetched body through decode → filter → render.
#[derive(Debug)]
pub enum ProcessedPage {
    /// Non-blank; carries the transformed bitmap ready to write.
    Rendered(GrayImage),
    /// Every pixel identical — an empty slot.
    Blank,
    /// Body failed to decode and the policy says keep going.
    Undecodable { detail: String },
}

/// Decode, filter, and render one fetched page body.
///
/// This is the pure core of stage 2: no filesystem, no network. Exposed
/// so hosts and tests can drive the pipeline with synthetic bodies.
///
/// # Errors
/// [`CaptureError::Decode`] when the body is not a raster image and the
/// config says [`DecodePolicy::Abort`].
pub fn process_page(
    page: u32,
    bytes: &[u8],
    config: &CaptureConfig,
    font: &FooterFont,
) -> Result<ProcessedPage, CaptureError> {
    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            return match config.decode_policy {
                DecodePolicy::Abort => Err(CaptureError::Decode {
                    page,
                    detail: e.to_string(),
                }),
                DecodePolicy::Skip => Ok(ProcessedPage::Undecodable {
                    detail: e.to_string(),
                }),
            }
        }
    };

    if filter::is_uniform(&img) {
        info!("Skipped uniform color image for page {}", page);
        return Ok(ProcessedPage::Blank);
    }

    Ok(ProcessedPage::Rendered(render::render_page(
        &img,
        page,
        config.threshold,
        config.footer_height,
        font,
    )))
}

/// Run a full capture: fetch the page range, filter and render survivors,
/// and assemble them into a dated PDF.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(CaptureOutput)` on success — including runs where every page was
/// blank or failed (then `output.document` is `None` and no PDF exists).
///
/// # Errors
/// Returns `Err(CaptureError)` only for fatal conditions: transport-level
/// fetch failures, undecodable bodies under [`DecodePolicy::Abort`],
/// filesystem failures, or a broken assembly step.
pub async fn capture(config: &CaptureConfig) -> Result<CaptureOutput, CaptureError> {
    let total_start = Instant::now();
    info!(
        "Starting capture: channel {} pages [{}, {})",
        config.channel, config.start_page, config.end_page
    );

    // ── Step 1: Create the timestamped run directories ───────────────────
    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let run_dir = config.output_root.join(format!("{stamp}_teletext"));
    let images_dir = run_dir.join("images");
    std::fs::create_dir_all(&images_dir).map_err(|e| CaptureError::OutputDir {
        path: images_dir.clone(),
        source: e,
    })?;
    debug!("Run directory: {}", run_dir.display());

    // ── Step 2: Load the footer font once ────────────────────────────────
    let font = FooterFont::load();

    // ── Step 3: Fetch, filter, render — one page at a time ───────────────
    let client = fetch::build_client(config)?;
    let total_pages = config.page_count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_capture_start(total_pages);
    }

    let mut pages: Vec<PageRecord> = Vec::with_capacity(total_pages);
    let mut saved: Vec<PathBuf> = Vec::new();
    let mut fetch_duration_ms = 0u64;
    let mut render_duration_ms = 0u64;

    for page in config.start_page..config.end_page {
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page);
        }

        let fetch_start = Instant::now();
        let fetched = fetch::fetch_page(&client, config, page).await?;
        fetch_duration_ms += fetch_start.elapsed().as_millis() as u64;

        let outcome = match fetched {
            fetch::FetchOutcome::Failed(status) => PageOutcome::FetchFailed {
                status: status.as_u16(),
            },
            fetch::FetchOutcome::Ok(bytes) => {
                let render_start = Instant::now();
                let processed = process_page(page, &bytes, config, &font)?;
                let outcome = match processed {
                    ProcessedPage::Blank => PageOutcome::SkippedBlank,
                    ProcessedPage::Undecodable { detail } => PageOutcome::DecodeFailed { detail },
                    ProcessedPage::Rendered(img) => {
                        let path = images_dir.join(format!("teletext_{page}.png"));
                        render::write_png(&img, &path)?;
                        saved.push(path.clone());
                        PageOutcome::Saved { path }
                    }
                };
                render_duration_ms += render_start.elapsed().as_millis() as u64;
                outcome
            }
        };

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_done(page, &outcome);
        }
        pages.push(PageRecord { page, outcome });
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_capture_complete(saved.len(), total_pages);
    }

    // ── Step 4: Assemble the PDF (or report an empty run) ────────────────
    let mut assemble_duration_ms = 0u64;
    let document = if saved.is_empty() {
        info!("No images saved, PDF not created.");
        None
    } else {
        let pdf_path = run_dir.join(format!("Teletext {}.pdf", Local::now().format("%d.%m.%Y")));
        let assemble_start = Instant::now();
        // lopdf + image decoding are CPU-bound; keep them off the async
        // worker threads.
        let paths = saved.clone();
        let target = pdf_path.clone();
        tokio::task::spawn_blocking(move || assemble::assemble_pdf(&paths, &target))
            .await
            .map_err(|e| CaptureError::Internal(format!("Assembly task panicked: {e}")))??;
        assemble_duration_ms = assemble_start.elapsed().as_millis() as u64;
        Some(pdf_path)
    };

    // ── Step 5: Compute stats ────────────────────────────────────────────
    let stats = CaptureStats {
        requested_pages: total_pages,
        saved_pages: saved.len(),
        blank_pages: pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::SkippedBlank))
            .count(),
        failed_pages: pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::FetchFailed { .. }))
            .count(),
        undecodable_pages: pages
            .iter()
            .filter(|p| matches!(p.outcome, PageOutcome::DecodeFailed { .. }))
            .count(),
        fetch_duration_ms,
        render_duration_ms,
        assemble_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Capture complete: {}/{} pages saved, {}ms total",
        stats.saved_pages, stats.requested_pages, stats.total_duration_ms
    );

    Ok(CaptureOutput {
        document,
        pages,
        run_dir,
        stats,
    })
}

/// Synchronous wrapper around [`capture`].
///
/// Creates a temporary tokio runtime internally.
pub fn capture_sync(config: &CaptureConfig) -> Result<CaptureOutput, CaptureError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CaptureError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(capture(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    fn uniform_body() -> Vec<u8> {
        png_bytes(&RgbaImage::from_pixel(40, 25, Rgba([90, 90, 90, 255])))
    }

    fn content_body() -> Vec<u8> {
        let mut img = RgbaImage::from_pixel(40, 25, Rgba([0, 0, 0, 255]));
        for x in 5..20 {
            img.put_pixel(x, 10, Rgba([255, 255, 255, 255]));
        }
        png_bytes(&img)
    }

    #[test]
    fn content_page_is_rendered() {
        let config = CaptureConfig::default();
        let font = FooterFont::Bitmap;
        match process_page(102, &content_body(), &config, &font).unwrap() {
            ProcessedPage::Rendered(img) => {
                assert_eq!(img.dimensions(), (40, 25 + config.footer_height));
            }
            _ => panic!("expected Rendered"),
        }
    }

    #[test]
    fn uniform_page_is_blank() {
        let config = CaptureConfig::default();
        assert!(matches!(
            process_page(100, &uniform_body(), &config, &FooterFont::Bitmap).unwrap(),
            ProcessedPage::Blank
        ));
    }

    #[test]
    fn garbage_body_aborts_by_default() {
        let config = CaptureConfig::default();
        let err = process_page(104, b"not an image", &config, &FooterFont::Bitmap).unwrap_err();
        assert!(matches!(err, CaptureError::Decode { page: 104, .. }));
    }

    #[test]
    fn garbage_body_skips_under_skip_policy() {
        let config = CaptureConfig::builder()
            .decode_policy(DecodePolicy::Skip)
            .build()
            .unwrap();
        assert!(matches!(
            process_page(104, b"not an image", &config, &FooterFont::Bitmap).unwrap(),
            ProcessedPage::Undecodable { .. }
        ));
    }
}
