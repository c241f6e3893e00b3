//! Error types for the pdf2table library.
//!
//! The page resolver and the table normaliser never fail: they are total
//! functions over unreliable text. Errors only exist around them, in the
//! orchestration layer and its collaborators.
//!
//! * [`Pdf2TableError`]: **Fatal**. The batch cannot proceed (bad lexicon,
//!   invalid config, rejected credentials, quota exhausted, sink failure).
//!
//! * [`PageError`]: **Non-fatal**. A single page failed to render or could
//!   not be recognised after retries. Stored inside
//!   [`crate::output::PageResult`]; the other pages still contribute rows.
//!
//! * [`SourceError`]: a whole document could not be opened. Reported in the
//!   batch output for that document only.
//!
//! * [`RecognitionError`] and [`SinkError`] are what caller-supplied
//!   collaborators return; the orchestrator maps them onto the types above.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// All fatal errors returned by the pdf2table library.
#[derive(Debug, Error)]
pub enum Pdf2TableError {
    // ── Configuration errors ─────────────────────────────────────────────
    /// A keyword lexicon could not be parsed or compiled.
    #[error("Invalid lexicon: {reason}")]
    InvalidLexicon { reason: String },

    /// A lexicon file could not be read.
    #[error("Failed to read lexicon '{path}': {source}")]
    LexiconRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Recognition errors ───────────────────────────────────────────────
    /// The recognition service rejected the request (bad credentials, bad
    /// request). Retrying cannot help, so the whole batch stops.
    #[error("Recognition service rejected page {page} of '{document}': {detail}")]
    ClientError {
        document: String,
        page: usize,
        detail: String,
    },

    /// The recognition service kept rate-limiting after every retry.
    #[error("Rate limit still exceeded for page {page} of '{document}' after {attempts} attempts")]
    RateLimitExceeded {
        document: String,
        page: usize,
        attempts: u32,
    },

    // ── Output errors ────────────────────────────────────────────────────
    /// The output sink refused the combined table of a document.
    #[error("Failed to write tables for '{document}': {detail}")]
    SinkFailed { document: String, detail: String },

    // ── Catch-all ────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The document source could not render the page.
    #[error("Page {page}: rendering failed: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// Transient recognition failures outlasted every retry.
    #[error("Page {page}: recognition failed after {retries} retries: {detail}")]
    RecognitionFailed {
        page: usize,
        retries: u8,
        detail: String,
    },
}

/// Failure reported by a [`crate::pipeline::source::DocumentSource`].
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum SourceError {
    /// The file could not be opened or read.
    #[error("Cannot read document '{document}': {detail}")]
    Unreadable { document: String, detail: String },

    /// The file was read but is not a format the source understands.
    #[error("Unsupported document format for '{document}': {detail}")]
    Unsupported { document: String, detail: String },

    /// A single page could not be rasterised.
    #[error("Rendering page {page} of '{document}' failed: {detail}")]
    RenderFailed {
        document: String,
        page: usize,
        detail: String,
    },
}

/// Failure reported by a [`crate::pipeline::recognize::RecognitionService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    /// Bad credentials or a malformed request (HTTP 400/401/403).
    #[error("client error: {detail}")]
    ClientError { detail: String },

    /// Quota exhausted (HTTP 429). `retry_after` carries a server hint.
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    /// Anything else: network blips, 5xx, timeouts.
    #[error("transient failure: {detail}")]
    Transient { detail: String },
}

/// Failure reported by a [`crate::pipeline::sink::TableSink`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SinkError {
    pub message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_error_display() {
        let e = Pdf2TableError::ClientError {
            document: "docA.pdf".into(),
            page: 2,
            detail: "invalid key".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("docA.pdf"), "got: {msg}");
        assert!(msg.contains("page 2"), "got: {msg}");
        assert!(msg.contains("invalid key"), "got: {msg}");
    }

    #[test]
    fn rate_limit_display() {
        let e = Pdf2TableError::RateLimitExceeded {
            document: "report.pdf".into(),
            page: 1,
            attempts: 4,
        };
        assert!(e.to_string().contains("4 attempts"));
    }

    #[test]
    fn page_error_display() {
        let e = PageError::RecognitionFailed {
            page: 3,
            retries: 2,
            detail: "timeout".into(),
        };
        assert!(e.to_string().contains("Page 3"));
        assert!(e.to_string().contains("2 retries"));
    }

    #[test]
    fn source_error_serialises() {
        let e = SourceError::Unreadable {
            document: "x.pdf".into(),
            detail: "permission denied".into(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("Unreadable"));
        assert!(json.contains("permission denied"));
    }

    #[test]
    fn sink_error_message() {
        assert_eq!(SinkError::new("disk full").to_string(), "disk full");
    }
}
