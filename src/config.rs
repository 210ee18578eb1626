//! Configuration types for a teletext capture run.
//!
//! All capture behaviour is controlled through [`CaptureConfig`], built via
//! its [`CaptureConfigBuilder`]; mail delivery is controlled through the
//! separate [`MailConfig`]. Both are plain immutable values constructed at
//! process start and passed explicitly into the pipeline — there is no
//! hidden process-wide state and no import-time environment loading.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field.
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::CaptureError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default image endpoint of the Czech Television teletext service.
pub const DEFAULT_ENDPOINT: &str =
    "https://api-teletext.ceskatelevize.cz/services-old/teletext/picture.php";

/// Default mail relay (implicit TLS submission).
pub const DEFAULT_RELAY: &str = "smtp.seznam.cz";

/// Default mail relay port (SMTPS).
pub const DEFAULT_RELAY_PORT: u16 = 465;

/// Configuration for one capture run.
///
/// Built via [`CaptureConfig::builder()`] or using
/// [`CaptureConfig::default()`].
///
/// # Example
/// ```rust
/// use teletext2pdf::CaptureConfig;
///
/// let config = CaptureConfig::builder()
///     .channel("CT1")
///     .pages(100, 150)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CaptureConfig {
    /// Teletext channel identifier. Default: `"CT2"`.
    pub channel: String,

    /// First page number to fetch (inclusive). Default: 100.
    pub start_page: u32,

    /// One past the last page number to fetch (exclusive). Default: 170.
    pub end_page: u32,

    /// Base URL of the teletext image endpoint. Default: [`DEFAULT_ENDPOINT`].
    ///
    /// Overridable so tests and mirrors can point the fetcher elsewhere
    /// without touching the pipeline.
    pub endpoint: String,

    /// Directory under which timestamped run folders are created. Default: `data`.
    pub output_root: PathBuf,

    /// Binarisation threshold. Default: 128.
    ///
    /// A luminance value *strictly greater* than this becomes white before
    /// inversion. 128 splits the 8-bit range evenly and matches what the
    /// broadcast renderer emits for text vs. background.
    pub threshold: u8,

    /// Height in pixels of the white footer strip added below each page
    /// for the `"Page {N}"` label. Default: 20.
    pub footer_height: u32,

    /// Per-request timeout in seconds; 0 leaves the client at its library
    /// default (no timeout). Default: 30.
    pub fetch_timeout_secs: u64,

    /// What to do when a 200 response body fails to decode as an image.
    /// Default: [`DecodePolicy::Abort`].
    pub decode_policy: DecodePolicy,

    /// Optional progress callback fired per page. Default: none.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            channel: "CT2".to_string(),
            start_page: 100,
            end_page: 170,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output_root: PathBuf::from("data"),
            threshold: 128,
            footer_height: 20,
            fetch_timeout_secs: 30,
            decode_policy: DecodePolicy::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CaptureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureConfig")
            .field("channel", &self.channel)
            .field("start_page", &self.start_page)
            .field("end_page", &self.end_page)
            .field("endpoint", &self.endpoint)
            .field("output_root", &self.output_root)
            .field("threshold", &self.threshold)
            .field("footer_height", &self.footer_height)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("decode_policy", &self.decode_policy)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl CaptureConfig {
    /// Create a new builder for `CaptureConfig`.
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder {
            config: Self::default(),
        }
    }

    /// Number of pages the run will request.
    pub fn page_count(&self) -> usize {
        (self.end_page - self.start_page) as usize
    }
}

/// Builder for [`CaptureConfig`].
#[derive(Debug)]
pub struct CaptureConfigBuilder {
    config: CaptureConfig,
}

impl CaptureConfigBuilder {
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.config.channel = channel.into();
        self
    }

    /// Set the inclusive-exclusive page range `[start, end)`.
    pub fn pages(mut self, start: u32, end: u32) -> Self {
        self.config.start_page = start;
        self.config.end_page = end;
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.output_root = root.into();
        self
    }

    pub fn threshold(mut self, t: u8) -> Self {
        self.config.threshold = t;
        self
    }

    pub fn footer_height(mut self, px: u32) -> Self {
        self.config.footer_height = px.max(1);
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    pub fn decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.config.decode_policy = policy;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CaptureConfig, CaptureError> {
        let c = &self.config;
        if c.channel.is_empty() {
            return Err(CaptureError::InvalidConfig(
                "Channel must not be empty".into(),
            ));
        }
        if c.start_page >= c.end_page {
            return Err(CaptureError::InvalidConfig(format!(
                "Page range is empty: start {} must be below end {}",
                c.start_page, c.end_page
            )));
        }
        if c.endpoint.is_empty() {
            return Err(CaptureError::InvalidConfig(
                "Endpoint URL must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Behaviour when a 200 response body is not a decodable raster image.
///
/// The historical behaviour is to abort the whole run; `Skip` treats a bad
/// body like a failed fetch and continues with the remaining pages. Both
/// exist because neither is obviously right: a corrupt body may mean the
/// upstream service is broken for every page (abort saves time) or that
/// one slot carries a transient glitch (skip saves the run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodePolicy {
    /// Abort the run on the first undecodable page (default).
    #[default]
    Abort,
    /// Record the page as failed and continue.
    Skip,
}

/// Mail delivery configuration.
///
/// Constructed explicitly — via [`MailConfig::from_env`] or field by field
/// — and validated with [`MailConfig::validate`] before the notifier opens
/// any network session.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender mailbox; also the SMTP login name.
    pub sender: String,
    /// Sender credential for plain SMTP login.
    pub password: String,
    /// The single recipient mailbox.
    pub recipient: String,
    /// Message subject. Default: `"Teletext PDF"`.
    pub subject: String,
    /// Plain-text message body. Default: `"Please find the attached PDF."`.
    pub body: String,
    /// Mail relay host. Default: [`DEFAULT_RELAY`].
    pub relay: String,
    /// Mail relay port (implicit TLS). Default: [`DEFAULT_RELAY_PORT`].
    pub port: u16,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: String::new(),
            password: String::new(),
            recipient: String::new(),
            subject: "Teletext PDF".to_string(),
            body: "Please find the attached PDF.".to_string(),
            relay: DEFAULT_RELAY.to_string(),
            port: DEFAULT_RELAY_PORT,
        }
    }
}

impl fmt::Debug for MailConfig {
    // The credential never reaches logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("sender", &self.sender)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("subject", &self.subject)
            .field("relay", &self.relay)
            .field("port", &self.port)
            .finish()
    }
}

impl MailConfig {
    /// Load the mail configuration from the environment.
    ///
    /// Required: `SENDER_EMAIL`, `SENDER_PASSWORD`, `RECIPIENT_EMAIL`.
    /// Optional: `TTX2PDF_SUBJECT`, `TTX2PDF_BODY`, `SMTP_RELAY`,
    /// `SMTP_PORT`.
    pub fn from_env() -> Result<Self, CaptureError> {
        let mut cfg = Self {
            sender: std::env::var("SENDER_EMAIL").unwrap_or_default(),
            password: std::env::var("SENDER_PASSWORD").unwrap_or_default(),
            recipient: std::env::var("RECIPIENT_EMAIL").unwrap_or_default(),
            ..Self::default()
        };
        if let Ok(s) = std::env::var("TTX2PDF_SUBJECT") {
            cfg.subject = s;
        }
        if let Ok(b) = std::env::var("TTX2PDF_BODY") {
            cfg.body = b;
        }
        if let Ok(r) = std::env::var("SMTP_RELAY") {
            if !r.is_empty() {
                cfg.relay = r;
            }
        }
        if let Ok(p) = std::env::var("SMTP_PORT") {
            cfg.port = p.parse().map_err(|_| {
                CaptureError::InvalidConfig(format!("SMTP_PORT is not a port number: '{p}'"))
            })?;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the non-empty preconditions for delivery.
    ///
    /// Called by the notifier before it opens any network session, so a
    /// misconfigured run fails before the first byte leaves the machine.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.sender.is_empty() {
            return Err(CaptureError::Configuration {
                field: "sender address",
                env: "SENDER_EMAIL",
            });
        }
        if self.password.is_empty() {
            return Err(CaptureError::Configuration {
                field: "sender credential",
                env: "SENDER_PASSWORD",
            });
        }
        if self.recipient.is_empty() {
            return Err(CaptureError::Configuration {
                field: "recipient address",
                env: "RECIPIENT_EMAIL",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_broadcast_range() {
        let c = CaptureConfig::default();
        assert_eq!(c.channel, "CT2");
        assert_eq!(c.start_page, 100);
        assert_eq!(c.end_page, 170);
        assert_eq!(c.page_count(), 70);
        assert_eq!(c.threshold, 128);
        assert_eq!(c.footer_height, 20);
        assert_eq!(c.decode_policy, DecodePolicy::Abort);
    }

    #[test]
    fn builder_rejects_empty_range() {
        let err = CaptureConfig::builder().pages(150, 150).build().unwrap_err();
        assert!(err.to_string().contains("range"));
    }

    #[test]
    fn builder_rejects_inverted_range() {
        assert!(CaptureConfig::builder().pages(200, 100).build().is_err());
    }

    #[test]
    fn builder_rejects_empty_channel() {
        assert!(CaptureConfig::builder().channel("").build().is_err());
    }

    #[test]
    fn mail_validate_flags_each_missing_field() {
        let mut m = MailConfig {
            sender: "a@example.com".into(),
            password: "secret".into(),
            recipient: "b@example.com".into(),
            ..MailConfig::default()
        };
        assert!(m.validate().is_ok());

        m.sender.clear();
        assert!(matches!(
            m.validate(),
            Err(CaptureError::Configuration { env: "SENDER_EMAIL", .. })
        ));

        m.sender = "a@example.com".into();
        m.password.clear();
        assert!(matches!(
            m.validate(),
            Err(CaptureError::Configuration { env: "SENDER_PASSWORD", .. })
        ));

        m.password = "secret".into();
        m.recipient.clear();
        assert!(matches!(
            m.validate(),
            Err(CaptureError::Configuration { env: "RECIPIENT_EMAIL", .. })
        ));
    }

    #[test]
    fn mail_debug_redacts_password() {
        let m = MailConfig {
            sender: "a@example.com".into(),
            password: "hunter2".into(),
            recipient: "b@example.com".into(),
            ..MailConfig::default()
        };
        let dbg = format!("{m:?}");
        assert!(!dbg.contains("hunter2"), "got: {dbg}");
        assert!(dbg.contains("<redacted>"));
    }
}
