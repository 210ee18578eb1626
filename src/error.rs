//! Error types for the teletext2pdf library.
//!
//! Only *fatal* conditions are errors here. A page that comes back with a
//! non-200 status, decodes to a blank (uniform) frame, or — under
//! [`crate::config::DecodePolicy::Skip`] — fails to decode is not an error
//! at all: it is recorded as a [`crate::output::PageOutcome`] in the run
//! report and the capture continues. The separation lets callers inspect
//! partial success rather than losing a whole evening's capture to one
//! empty teletext slot.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the teletext2pdf library.
///
/// Per-page conditions that the pipeline recovers from live in
/// [`crate::output::PageOutcome`] rather than here.
#[derive(Debug, Error)]
pub enum CaptureError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// A required mail credential or address is missing or empty.
    ///
    /// Raised before any network activity.
    #[error("Missing mail configuration: {field}\nSet the {env} environment variable or pass the corresponding flag.")]
    Configuration { field: &'static str, env: &'static str },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Fetch errors ──────────────────────────────────────────────────────
    /// The HTTP request for a page failed at the transport level
    /// (connection refused, DNS, timeout). A non-200 *response* is not
    /// fatal and is recorded as `PageOutcome::FetchFailed` instead.
    #[error("Request for page {page} failed: {reason}\nCheck your internet connection.")]
    Fetch { page: u32, reason: String },

    // ── Decode / render errors ────────────────────────────────────────────
    /// A 200 response body was not a decodable raster image.
    ///
    /// Only returned under [`crate::config::DecodePolicy::Abort`]; with
    /// `Skip` the page is recorded as `PageOutcome::DecodeFailed`.
    #[error("Page {page} returned undecodable image data: {detail}\nRe-run with --skip-bad-pages to skip such pages.")]
    Decode { page: u32, detail: String },

    /// Writing a rendered page image to disk failed.
    #[error("Failed to write page image '{path}': {detail}")]
    PageWrite { path: PathBuf, detail: String },

    // ── Assembly errors ───────────────────────────────────────────────────
    /// A file the pipeline just produced could not be read back
    /// (a saved page image during assembly, or the PDF for attachment).
    #[error("Failed to read back '{path}': {detail}")]
    Reload { path: PathBuf, detail: String },

    /// The assembled PDF could not be written.
    #[error("Failed to write PDF '{path}': {detail}")]
    Assembly { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the run directory tree.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Mail errors ───────────────────────────────────────────────────────
    /// A sender or recipient address did not parse as a mailbox.
    #[error("Invalid mail address '{address}': {detail}")]
    Address { address: String, detail: String },

    /// The SMTP session failed (connect, login, or send).
    ///
    /// The assembled PDF remains on disk; only delivery failed.
    #[error("SMTP delivery failed: {detail}")]
    Transmission { detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_display_names_env_var() {
        let e = CaptureError::Configuration {
            field: "sender address",
            env: "SENDER_EMAIL",
        };
        let msg = e.to_string();
        assert!(msg.contains("sender address"), "got: {msg}");
        assert!(msg.contains("SENDER_EMAIL"), "got: {msg}");
    }

    #[test]
    fn fetch_display_names_page() {
        let e = CaptureError::Fetch {
            page: 113,
            reason: "connection refused".into(),
        };
        assert!(e.to_string().contains("113"));
        assert!(e.to_string().contains("connection refused"));
    }

    #[test]
    fn decode_display_hints_skip_flag() {
        let e = CaptureError::Decode {
            page: 104,
            detail: "unsupported format".into(),
        };
        assert!(e.to_string().contains("--skip-bad-pages"));
    }

    #[test]
    fn transmission_display() {
        let e = CaptureError::Transmission {
            detail: "535 authentication failed".into(),
        };
        assert!(e.to_string().contains("535"));
    }
}
