//! Run report types: what the capture did, page by page.
//!
//! [`CaptureOutput`] is returned even when no document was produced — the
//! `document` field is simply `None`. Everything is `serde`-serialisable so
//! the CLI `--json` mode (and any host application) gets a structured
//! record of the run without re-parsing log lines.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Full result of one capture run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureOutput {
    /// Path of the assembled PDF, or `None` when no page survived
    /// filtering (the run still counts as successful).
    pub document: Option<PathBuf>,

    /// Per-page records, in ascending page order.
    pub pages: Vec<PageRecord>,

    /// The timestamped run directory holding `images/` and the PDF.
    pub run_dir: PathBuf,

    /// Aggregate counters and stage timings.
    pub stats: CaptureStats,
}

impl CaptureOutput {
    /// Paths of the saved page images, in ascending page order.
    pub fn saved_paths(&self) -> Vec<&PathBuf> {
        self.pages
            .iter()
            .filter_map(|p| match &p.outcome {
                PageOutcome::Saved { path } => Some(path),
                _ => None,
            })
            .collect()
    }
}

/// What happened to a single requested page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Teletext page number.
    pub page: u32,
    /// Outcome for this page.
    pub outcome: PageOutcome,
}

/// Outcome taxonomy for one page.
///
/// Only `Saved` contributes to the assembled document; the other variants
/// document why a page is absent from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Fetched, non-blank, transformed, and written to disk.
    Saved { path: PathBuf },
    /// Every pixel matched the first one — an empty teletext slot.
    SkippedBlank,
    /// The endpoint answered with a non-200 status.
    FetchFailed { status: u16 },
    /// The 200 body failed to decode (recorded only under
    /// [`crate::config::DecodePolicy::Skip`]).
    DecodeFailed { detail: String },
}

/// Aggregate counters and stage timings for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Pages requested (`end_page - start_page`).
    pub requested_pages: usize,
    /// Pages written to disk and assembled.
    pub saved_pages: usize,
    /// Pages skipped as blank.
    pub blank_pages: usize,
    /// Pages with a non-200 response.
    pub failed_pages: usize,
    /// Pages skipped for undecodable bodies (Skip policy only).
    pub undecodable_pages: usize,
    /// Wall-clock time spent fetching, in milliseconds.
    pub fetch_duration_ms: u64,
    /// Wall-clock time spent filtering/rendering/writing pages.
    pub render_duration_ms: u64,
    /// Wall-clock time spent assembling the PDF.
    pub assemble_duration_ms: u64,
    /// Total run duration in milliseconds.
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_paths_filters_and_preserves_order() {
        let out = CaptureOutput {
            document: None,
            pages: vec![
                PageRecord {
                    page: 100,
                    outcome: PageOutcome::SkippedBlank,
                },
                PageRecord {
                    page: 101,
                    outcome: PageOutcome::Saved {
                        path: PathBuf::from("images/teletext_101.png"),
                    },
                },
                PageRecord {
                    page: 102,
                    outcome: PageOutcome::FetchFailed { status: 404 },
                },
                PageRecord {
                    page: 103,
                    outcome: PageOutcome::Saved {
                        path: PathBuf::from("images/teletext_103.png"),
                    },
                },
            ],
            run_dir: PathBuf::from("data/x"),
            stats: CaptureStats::default(),
        };
        let paths = out.saved_paths();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("teletext_101.png"));
        assert!(paths[1].ends_with("teletext_103.png"));
    }

    #[test]
    fn outcome_serialises_with_kind_tag() {
        let o = PageOutcome::FetchFailed { status: 404 };
        let json = serde_json::to_string(&o).unwrap();
        assert!(json.contains("\"kind\":\"fetch_failed\""), "got: {json}");
        assert!(json.contains("404"));
    }
}
