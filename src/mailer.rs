//! Notifier: deliver the assembled PDF as a mail attachment.
//!
//! The pipeline only knows the [`MailTransport`] trait — one operation,
//! "send this document with this configuration" — so alternate transports
//! (an HTTP mail API, a different relay, a test double) can be substituted
//! without touching the capture code. [`SmtpMailer`] is the production
//! implementation: one implicit-TLS session per invocation, plain login,
//! one message, no retry.

use crate::config::MailConfig;
use crate::error::CaptureError;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::path::Path;
use tracing::info;

/// Something that can deliver a document to the configured recipient.
pub trait MailTransport {
    /// Deliver `document` according to `mail`.
    ///
    /// Implementations must validate `mail` before any network activity.
    fn send_document(&self, mail: &MailConfig, document: &Path) -> Result<(), CaptureError>;
}

/// SMTP implementation over implicit TLS (SMTPS).
pub struct SmtpMailer;

impl MailTransport for SmtpMailer {
    fn send_document(&self, mail: &MailConfig, document: &Path) -> Result<(), CaptureError> {
        // Fail on missing credentials before a single byte goes out.
        mail.validate()?;

        let pdf_bytes = std::fs::read(document).map_err(|e| CaptureError::Reload {
            path: document.to_path_buf(),
            detail: e.to_string(),
        })?;
        let filename = document
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "teletext.pdf".to_string());

        let message = build_message(mail, &filename, pdf_bytes)?;

        let credentials = Credentials::new(mail.sender.clone(), mail.password.clone());
        let transport = SmtpTransport::relay(&mail.relay)
            .map_err(|e| CaptureError::Transmission {
                detail: format!("relay setup for {}: {e}", mail.relay),
            })?
            .port(mail.port)
            .credentials(credentials)
            .build();

        transport
            .send(&message)
            .map_err(|e| CaptureError::Transmission {
                detail: e.to_string(),
            })?;

        info!(
            "Email sent to {} with attachment {}",
            mail.recipient,
            document.display()
        );
        Ok(())
    }
}

/// Construct the message: plain-text body plus one PDF attachment named
/// after the document file.
fn build_message(
    mail: &MailConfig,
    filename: &str,
    pdf_bytes: Vec<u8>,
) -> Result<Message, CaptureError> {
    let from: Mailbox = mail.sender.parse().map_err(|e| CaptureError::Address {
        address: mail.sender.clone(),
        detail: format!("{e}"),
    })?;
    let to: Mailbox = mail.recipient.parse().map_err(|e| CaptureError::Address {
        address: mail.recipient.clone(),
        detail: format!("{e}"),
    })?;

    let pdf_type = ContentType::parse("application/pdf")
        .map_err(|e| CaptureError::Internal(format!("content type: {e}")))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(mail.body.clone()))
                .singlepart(Attachment::new(filename.to_string()).body(pdf_bytes, pdf_type)),
        )
        .map_err(|e| CaptureError::Internal(format!("message assembly: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_mail() -> MailConfig {
        MailConfig {
            sender: "digest@example.com".into(),
            password: "secret".into(),
            recipient: "reader@example.com".into(),
            ..MailConfig::default()
        }
    }

    #[test]
    fn message_carries_subject_body_and_attachment() {
        let message = build_message(&test_mail(), "Teletext 05.08.2026.pdf", b"%PDF-1.5".to_vec())
            .unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).into_owned();
        assert!(raw.contains("Subject: Teletext PDF"), "got: {raw}");
        assert!(raw.contains("application/pdf"));
        assert!(raw.contains("Teletext 05.08.2026.pdf"));
        assert!(raw.contains("Please find the attached PDF."));
    }

    #[test]
    fn bad_sender_address_is_reported() {
        let mut mail = test_mail();
        mail.sender = "not an address".into();
        let err = build_message(&mail, "x.pdf", Vec::new()).unwrap_err();
        assert!(matches!(err, CaptureError::Address { .. }));
    }

    #[test]
    fn missing_credentials_fail_before_any_network_io() {
        let mut mail = test_mail();
        mail.password.clear();
        // The document path is never touched: validation runs first.
        let err = SmtpMailer
            .send_document(&mail, Path::new("/nonexistent/doc.pdf"))
            .unwrap_err();
        assert!(matches!(err, CaptureError::Configuration { .. }));
    }

    #[test]
    fn missing_document_is_a_reload_error() {
        let err = SmtpMailer
            .send_document(&test_mail(), Path::new("/nonexistent/doc.pdf"))
            .unwrap_err();
        assert!(matches!(err, CaptureError::Reload { .. }));
    }
}
