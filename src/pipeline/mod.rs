//! Pipeline stages for teletext capture.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different document format) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ filter ──▶ render ──▶ assemble
//! (HTTP GET) (uniform?) (binarize   (PNG list →
//!                        + stamp)    one PDF)
//! ```
//!
//! 1. [`fetch`]    — one GET per page number; non-200 marks the page
//!    absent, transport failures are fatal
//! 2. [`filter`]   — drop pages whose pixels are all identical (blank
//!    teletext slots)
//! 3. [`render`]   — grayscale → binarize → invert → footer strip with a
//!    `"Page {N}"` stamp; [`font`] supplies the stamp face
//! 4. [`assemble`] — reload the saved PNGs and merge them, in page order,
//!    into a single multi-page PDF

pub mod assemble;
pub mod fetch;
pub mod filter;
pub mod font;
pub mod render;
