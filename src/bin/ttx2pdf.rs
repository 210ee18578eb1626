//! CLI binary for teletext2pdf.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `CaptureConfig`/`MailConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use teletext2pdf::{
    capture, CaptureConfig, CaptureProgressCallback, DecodePolicy, MailConfig, MailTransport,
    PageOutcome, ProgressCallback, SmtpMailer,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live progress bar plus one log line per
/// resolved page.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by
    /// `on_capture_start` (called before any pages are requested).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_capture_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening run directory…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl CaptureProgressCallback for CliProgressCallback {
    fn on_capture_start(&self, total_pages: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Capturing");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Requesting {total_pages} teletext pages…"))
        ));
    }

    fn on_page_start(&self, page: u32) {
        self.bar.set_message(format!("page {page}"));
    }

    fn on_page_done(&self, page: u32, outcome: &PageOutcome) {
        let line = match outcome {
            PageOutcome::Saved { .. } => {
                format!("  {} Page {:>3}  saved", green("✓"), page)
            }
            PageOutcome::SkippedBlank => {
                format!("  {} Page {:>3}  {}", dim("·"), page, dim("blank"))
            }
            PageOutcome::FetchFailed { status } => {
                format!("  {} Page {:>3}  {}", red("✗"), page, red(&format!("HTTP {status}")))
            }
            PageOutcome::DecodeFailed { detail } => {
                let msg = if detail.len() > 60 {
                    format!("{}\u{2026}", &detail[..59])
                } else {
                    detail.clone()
                };
                format!("  {} Page {:>3}  {}", red("✗"), page, red(&msg))
            }
        };
        self.bar.println(line);
        self.bar.inc(1);
    }

    fn on_capture_complete(&self, saved: usize, total: usize) {
        self.bar.finish_and_clear();

        if saved == 0 {
            eprintln!("{} no pages survived filtering", red("✘"));
        } else {
            eprintln!(
                "{} {} of {} pages kept",
                green("✔"),
                bold(&saved.to_string()),
                total
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Capture the default range and mail the PDF
  SENDER_EMAIL=me@example.com SENDER_PASSWORD=... RECIPIENT_EMAIL=reader@example.com \
    ttx2pdf

  # Capture only, no email
  ttx2pdf --no-email

  # A different channel and range
  ttx2pdf --no-email --channel CT1 --start-page 100 --end-page 130

  # Keep going past undecodable pages
  ttx2pdf --no-email --skip-bad-pages

  # Structured run report
  ttx2pdf --no-email --json > report.json

ENVIRONMENT VARIABLES:
  SENDER_EMAIL            Sender mailbox (SMTP login name)
  SENDER_PASSWORD         Sender credential for plain SMTP login
  RECIPIENT_EMAIL         Recipient mailbox
  TELETEXT_CHANNEL        Channel identifier (default CT2)
  TELETEXT_START_PAGE     First page, inclusive (default 100)
  TELETEXT_END_PAGE       End page, exclusive (default 170)
  SMTP_RELAY              Mail relay host (default smtp.seznam.cz)
  SMTP_PORT               Mail relay port (default 465, implicit TLS)

OUTPUT LAYOUT:
  data/<YYYYMMDD_HHMMSS>_teletext/images/teletext_<page>.png
  data/<YYYYMMDD_HHMMSS>_teletext/Teletext <DD.MM.YYYY>.pdf
"#;

/// Capture teletext pages and assemble a dated PDF digest.
#[derive(Parser, Debug)]
#[command(
    name = "ttx2pdf",
    version,
    about = "Capture teletext pages and assemble a dated PDF digest",
    long_about = "Fetch a channel's teletext page range as images, drop blank slots, re-render \
each page as high-contrast black-on-white with a page-number footer, merge the survivors into \
one PDF, and optionally mail it as an attachment.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Teletext channel identifier.
    #[arg(long, env = "TELETEXT_CHANNEL", default_value = "CT2")]
    channel: String,

    /// First page number (inclusive).
    #[arg(long, env = "TELETEXT_START_PAGE", default_value_t = 100)]
    start_page: u32,

    /// End page number (exclusive).
    #[arg(long, env = "TELETEXT_END_PAGE", default_value_t = 170)]
    end_page: u32,

    /// Teletext image endpoint base URL.
    #[arg(long, env = "TTX2PDF_ENDPOINT",
          default_value = teletext2pdf::config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Directory for timestamped run folders.
    #[arg(long, env = "TTX2PDF_OUTPUT_ROOT", default_value = "data")]
    output_root: PathBuf,

    /// Sender mailbox (SMTP login name).
    #[arg(long, env = "SENDER_EMAIL")]
    sender: Option<String>,

    /// Sender credential for plain SMTP login.
    #[arg(long, env = "SENDER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Recipient mailbox.
    #[arg(long, env = "RECIPIENT_EMAIL")]
    recipient: Option<String>,

    /// Message subject.
    #[arg(long, env = "TTX2PDF_SUBJECT", default_value = "Teletext PDF")]
    subject: String,

    /// Plain-text message body.
    #[arg(long, env = "TTX2PDF_BODY", default_value = "Please find the attached PDF.")]
    body: String,

    /// Mail relay host (implicit TLS).
    #[arg(long, env = "SMTP_RELAY", default_value = teletext2pdf::config::DEFAULT_RELAY)]
    relay: String,

    /// Mail relay port.
    #[arg(long, env = "SMTP_PORT", default_value_t = teletext2pdf::config::DEFAULT_RELAY_PORT)]
    smtp_port: u16,

    /// Capture and assemble only; skip mail delivery entirely.
    #[arg(long, env = "TTX2PDF_NO_EMAIL")]
    no_email: bool,

    /// Skip pages whose 200 body fails to decode instead of aborting.
    #[arg(long, env = "TTX2PDF_SKIP_BAD_PAGES")]
    skip_bad_pages: bool,

    /// Per-request timeout in seconds (0 = library default).
    #[arg(long, env = "TTX2PDF_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Output the structured run report (CaptureOutput) as JSON.
    #[arg(long, env = "TTX2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "TTX2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TTX2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "TTX2PDF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    // In verbose mode we always want all logs regardless of progress.
    let filter = if cli.verbose { "debug" } else { filter };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // ── Mail configuration, validated before any HTTP activity ──────────
    let mail = if cli.no_email {
        None
    } else {
        let mail = MailConfig {
            sender: cli.sender.clone().unwrap_or_default(),
            password: cli.password.clone().unwrap_or_default(),
            recipient: cli.recipient.clone().unwrap_or_default(),
            subject: cli.subject.clone(),
            body: cli.body.clone(),
            relay: cli.relay.clone(),
            port: cli.smtp_port,
        };
        mail.validate()
            .context("Email credentials or recipient email not set")?;
        Some(mail)
    };

    // ── Build capture config ─────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn CaptureProgressCallback>)
    } else {
        None
    };

    let mut builder = CaptureConfig::builder()
        .channel(&cli.channel)
        .pages(cli.start_page, cli.end_page)
        .endpoint(&cli.endpoint)
        .output_root(&cli.output_root)
        .fetch_timeout_secs(cli.timeout)
        .decode_policy(if cli.skip_bad_pages {
            DecodePolicy::Skip
        } else {
            DecodePolicy::Abort
        });
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run capture ──────────────────────────────────────────────────────
    let output = capture(&config).await.context("Capture failed")?;

    if cli.json {
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialise run report")?;
        println!("{json}");
    } else if !cli.quiet {
        match output.document {
            Some(ref pdf) => eprintln!(
                "{}  {}/{} pages  {}ms  →  {}",
                green("✔"),
                output.stats.saved_pages,
                output.stats.requested_pages,
                output.stats.total_duration_ms,
                bold(&pdf.display().to_string()),
            ),
            None => eprintln!("{}  no images saved, PDF not created", cyan("⚠")),
        }
    }

    // ── Deliver ──────────────────────────────────────────────────────────
    if let (Some(mail), Some(pdf)) = (mail, output.document.clone()) {
        let recipient = mail.recipient.clone();
        // lettre's blocking transport; keep it off the async workers.
        tokio::task::spawn_blocking(move || SmtpMailer.send_document(&mail, &pdf))
            .await
            .context("Delivery task panicked")?
            .context("Delivery failed")?;

        if !cli.quiet && !cli.json {
            eprintln!("{}  emailed to {}", green("✉"), bold(&recipient));
        }
    }

    Ok(())
}
