//! # pdf2table
//!
//! Pull the tables a user asks for out of PDF documents, using a vision
//! model for recognition.
//!
//! ## Why this crate?
//!
//! Users rarely want every table of every file. They say "página 1 de docA
//! y la última de docB" or "pages 2-4". This crate turns such an instruction
//! into a page selection per document, sends only those pages for
//! recognition, and normalises the markdown tables that come back into
//! typed grids ready for a spreadsheet.
//!
//! ## Pipeline Overview
//!
//! ```text
//! instruction + documents
//!  │
//!  ├─ 1. Resolve    natural language → zero-indexed pages per document
//!  ├─ 2. Render     DocumentSource renders each selected page
//!  ├─ 3. Recognise  RecognitionService with retry/backoff, `concurrency` pages at a time
//!  ├─ 4. Parse      markdown pipe tables → rectangular grid
//!  ├─ 5. Normalise  "$1,234.50" → 1234.5
//!  └─ 6. Sink       combined table of each document, in batch order
//! ```
//!
//! Rendering, recognition, and output are traits. The resolver and the
//! normaliser are pure functions and can be used on their own:
//!
//! ```rust
//! use pdf2table::pages::resolve_global;
//! use pdf2table::table::{normalize_grid, parse_grid, CellValue};
//!
//! assert_eq!(resolve_global("páginas 1 a 3", 5).into_vec(), vec![0, 1, 2]);
//!
//! let grid = normalize_grid(&parse_grid("| item | price |\n|---|---|\n| Pen | $1,234.50 |"));
//! assert_eq!(grid.rows()[1][1], CellValue::Float(1234.5));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2table` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2table = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod lexicon;
pub mod output;
pub mod pages;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod table;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{PageError, Pdf2TableError, RecognitionError, SinkError, SourceError};
pub use extract::{extract_batch, extract_batch_sync, extract_document};
pub use lexicon::{LanguageKeywords, Lexicon, Ordinal};
pub use output::{
    BatchOutput, DocumentOutcome, DocumentReport, DocumentStats, DocumentTables, PageResult,
};
pub use pages::{PageResolver, PageSelection};
pub use pipeline::recognize::RecognitionService;
pub use pipeline::sink::TableSink;
pub use pipeline::source::{DocumentSource, PageImage};
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use table::{CellValue, Grid, NormalizedGrid};
