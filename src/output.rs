//! Result types produced by the extraction pipeline.
//!
//! Everything here is `Serialize` so callers (and the CLI `--json` mode) can
//! dump a whole batch for inspection or downstream processing.

use crate::error::{PageError, SourceError};
use crate::pages::PageSelection;
use crate::table::{Grid, NormalizedGrid};
use serde::Serialize;

/// Outcome of recognising one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Recognised markdown with code fences removed.
    pub markdown: String,
    /// Grid parsed from `markdown`; empty when the page held no table.
    pub grid: Grid,
    /// Retries spent before the final attempt.
    pub retries: u8,
    pub duration_ms: u64,
    /// Present when the page failed; `grid` is then empty.
    pub error: Option<PageError>,
}

impl PageResult {
    pub(crate) fn failed(page_num: usize, retries: u8, duration_ms: u64, error: PageError) -> Self {
        Self {
            page_num,
            markdown: String::new(),
            grid: Grid::default(),
            retries,
            duration_ms,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-document counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DocumentStats {
    pub total_pages: usize,
    pub selected_pages: usize,
    pub processed_pages: usize,
    pub failed_pages: usize,
    /// Pages that were recognised but yielded no rows.
    pub empty_pages: usize,
    pub rows: usize,
    pub columns: usize,
    pub duration_ms: u64,
}

/// Combined tables of one document, the unit handed to a
/// [`crate::pipeline::sink::TableSink`].
#[derive(Debug, Clone, Serialize)]
pub struct DocumentTables {
    /// Document name as passed to the batch.
    pub document: String,
    pub total_pages: usize,
    pub selection: PageSelection,
    /// Per-page results in page order.
    pub pages: Vec<PageResult>,
    /// Page grids stacked in page order, normalised when configured.
    pub table: NormalizedGrid,
    pub stats: DocumentStats,
}

impl DocumentTables {
    /// Markdown of every page that produced rows, in page order.
    pub fn markdown_sections(&self) -> impl Iterator<Item = (usize, &str)> {
        self.pages
            .iter()
            .filter(|p| p.is_ok() && !p.grid.is_empty())
            .map(|p| (p.page_num, p.markdown.as_str()))
    }
}

/// What happened to one document of a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    /// The instruction selected no page of this document.
    Skipped { total_pages: usize },
    /// The document source could not open it.
    Failed { error: SourceError },
    /// Pages were processed; `table` may still be empty.
    Extracted(DocumentTables),
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub document: String,
    pub outcome: DocumentOutcome,
}

impl DocumentReport {
    pub fn tables(&self) -> Option<&DocumentTables> {
        match &self.outcome {
            DocumentOutcome::Extracted(t) => Some(t),
            _ => None,
        }
    }
}

/// Result of [`crate::extract::extract_batch`].
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutput {
    pub reports: Vec<DocumentReport>,
    pub duration_ms: u64,
}

impl BatchOutput {
    /// Documents whose combined table has at least one row.
    pub fn extracted(&self) -> impl Iterator<Item = &DocumentTables> {
        self.reports
            .iter()
            .filter_map(DocumentReport::tables)
            .filter(|t| !t.table.is_empty())
    }

    pub fn skipped(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, DocumentOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, DocumentOutcome::Failed { .. }))
            .count()
    }
}
