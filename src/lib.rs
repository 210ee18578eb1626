//! # teletext2pdf
//!
//! Capture broadcast teletext pages as images and assemble a dated,
//! e-reader-friendly PDF digest.
//!
//! ## Why this crate?
//!
//! Teletext is still where some broadcasters publish the tersest news
//! digest available — but reading it means sitting in front of a TV.
//! This crate pulls a channel's page range from the broadcaster's image
//! endpoint, drops the blank slots, re-renders each page as high-contrast
//! black-on-white with a page-number footer, merges everything into one
//! PDF, and optionally mails it to an e-reader address.
//!
//! ## Pipeline Overview
//!
//! ```text
//! page range [start, end)
//!  │
//!  ├─ 1. Fetch     one GET per page; non-200 pages are skipped
//!  ├─ 2. Filter    drop frames whose pixels are all identical (blank)
//!  ├─ 3. Render    grayscale → binarize → invert → "Page N" footer
//!  ├─ 4. Assemble  surviving pages, ascending, into one PDF
//!  └─ 5. Notify    mail the PDF as an attachment (optional)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use teletext2pdf::{capture, CaptureConfig, MailConfig, MailTransport, SmtpMailer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CaptureConfig::default();
//!     let output = capture(&config).await?;
//!
//!     if let Some(ref pdf) = output.document {
//!         let mail = MailConfig::from_env()?;
//!         SmtpMailer.send_document(&mail, pdf)?;
//!     } else {
//!         eprintln!("no pages survived filtering — nothing to send");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `ttx2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! teletext2pdf = { version = "0.3", default-features = false }
//! ```
//!
//! ## Execution model
//!
//! The page loop is deliberately sequential — one request in flight at a
//! time against a legacy endpoint — which also makes the ordering
//! invariant structural: the assembled PDF lists pages in ascending
//! page-number order because that is the only order anything ever runs
//! in. CPU-bound PDF assembly and the blocking SMTP send are kept off the
//! async worker threads via `spawn_blocking`.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod capture;
pub mod config;
pub mod error;
pub mod mailer;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use capture::{capture, capture_sync, process_page, ProcessedPage};
pub use config::{CaptureConfig, CaptureConfigBuilder, DecodePolicy, MailConfig};
pub use error::CaptureError;
pub use mailer::{MailTransport, SmtpMailer};
pub use output::{CaptureOutput, CaptureStats, PageOutcome, PageRecord};
pub use progress::{CaptureProgressCallback, NoopProgressCallback, ProgressCallback};
