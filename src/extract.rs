//! Batch extraction entry points.
//!
//! [`extract_batch`] walks a list of documents in order. For each one it
//! resolves the page selection from the user's instruction, recognises
//! the selected pages concurrently, stacks their tables into one grid and
//! hands that grid to the [`TableSink`].
//!
//! Pages of one document run `concurrency` at a time. Documents run one
//! after another, so sink calls arrive in batch order.

use crate::config::ExtractionConfig;
use crate::error::{PageError, Pdf2TableError};
use crate::output::{
    BatchOutput, DocumentOutcome, DocumentReport, DocumentStats, DocumentTables, PageResult,
};
use crate::pages::PageResolver;
use crate::pipeline::recognize::{process_page, RecognitionService};
use crate::pipeline::sink::TableSink;
use crate::pipeline::source::DocumentSource;
use crate::prompts::page_prompt;
use crate::table::{normalize_grid, CellValue, Grid, NormalizedGrid};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract the tables a natural-language instruction asks for from every
/// document of a batch.
///
/// # Arguments
/// * `documents`: document names understood by `source`, usually paths
/// * `instruction`: free-form request, e.g. `"página 1 de docA y la última de docB"`
/// * `source`: page counts and page images
/// * `recognizer`: turns page images into markdown tables
/// * `sink`: receives each non-empty combined table, in batch order
/// * `config`: retry, concurrency and normalisation settings
///
/// # Returns
/// `Ok(BatchOutput)` with one report per document, even if some documents
/// could not be opened or some pages failed.
///
/// # Errors
/// Returns `Err(Pdf2TableError)` only for fatal errors:
/// - The configured lexicon does not compile
/// - The recognition service rejected a request, or kept rate-limiting
/// - The sink refused a table
pub async fn extract_batch<D: AsRef<str>>(
    documents: &[D],
    instruction: &str,
    source: &dyn DocumentSource,
    recognizer: &dyn RecognitionService,
    sink: &dyn TableSink,
    config: &ExtractionConfig,
) -> Result<BatchOutput, Pdf2TableError> {
    let batch_start = Instant::now();
    let resolver = PageResolver::new(&config.lexicon)?;
    let roster: Vec<String> = documents
        .iter()
        .map(|d| document_name(d.as_ref()).to_string())
        .collect();
    info!("Starting batch of {} documents", documents.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(documents.len());
    }

    let mut reports = Vec::with_capacity(documents.len());
    for document in documents {
        let report = extract_document(
            document.as_ref(),
            instruction,
            &roster,
            source,
            recognizer,
            &resolver,
            config,
        )
        .await?;

        if let Some(tables) = report.tables().filter(|t| !t.table.is_empty()) {
            sink.write_document(tables)
                .await
                .map_err(|e| Pdf2TableError::SinkFailed {
                    document: tables.document.clone(),
                    detail: e.to_string(),
                })?;
            debug!("{}: handed {} rows to sink", tables.document, tables.table.row_count());
        }

        reports.push(report);
    }

    let output = BatchOutput {
        reports,
        duration_ms: batch_start.elapsed().as_millis() as u64,
    };
    let extracted = output.extracted().count();
    info!(
        "Batch complete: {} extracted, {} skipped, {} failed in {}ms",
        extracted,
        output.skipped(),
        output.failed(),
        output.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(documents.len(), extracted);
    }

    Ok(output)
}

/// Blocking wrapper around [`extract_batch`] for callers without a runtime.
///
/// Must not be called from inside a tokio runtime.
pub fn extract_batch_sync<D: AsRef<str>>(
    documents: &[D],
    instruction: &str,
    source: &dyn DocumentSource,
    recognizer: &dyn RecognitionService,
    sink: &dyn TableSink,
    config: &ExtractionConfig,
) -> Result<BatchOutput, Pdf2TableError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2TableError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract_batch(
            documents,
            instruction,
            source,
            recognizer,
            sink,
            config,
        ))
}

/// Process one document of a batch without touching the sink.
///
/// `roster` holds the base names of every document in the batch; the
/// current document is matched against it by its own base name.
pub async fn extract_document(
    document: &str,
    instruction: &str,
    roster: &[String],
    source: &dyn DocumentSource,
    recognizer: &dyn RecognitionService,
    resolver: &PageResolver,
    config: &ExtractionConfig,
) -> Result<DocumentReport, Pdf2TableError> {
    let start = Instant::now();

    // ── Step 1: Open document ────────────────────────────────────────────
    let total_pages = match source.page_count(document).await {
        Ok(n) => n,
        Err(error) => {
            warn!("{}: {}", document, error);
            return Ok(DocumentReport {
                document: document.to_string(),
                outcome: DocumentOutcome::Failed { error },
            });
        }
    };

    // ── Step 2: Resolve page selection ───────────────────────────────────
    let selection = resolver.resolve(
        instruction,
        total_pages,
        Some(document_name(document)),
        roster,
    );
    info!(
        "{}: {} pages, {} selected",
        document,
        total_pages,
        selection.len()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(document, total_pages, selection.len());
    }

    if selection.is_empty() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_document_complete(document, 0);
        }
        return Ok(DocumentReport {
            document: document.to_string(),
            outcome: DocumentOutcome::Skipped { total_pages },
        });
    }

    // ── Step 3: Recognise selected pages ─────────────────────────────────
    let prompt = page_prompt(config.prompt(), instruction);
    let pages: Vec<PageResult> = stream::iter(selection.page_numbers())
        .map(|page_num| extract_page(document, page_num, &prompt, source, recognizer, config))
        .buffered(config.concurrency)
        .try_collect()
        .await?;

    // ── Step 4: Assemble combined table ──────────────────────────────────
    let table = assemble_table(&pages, config.normalize_cells);
    let failed = pages.iter().filter(|p| !p.is_ok()).count();
    let stats = DocumentStats {
        total_pages,
        selected_pages: selection.len(),
        processed_pages: pages.len() - failed,
        failed_pages: failed,
        empty_pages: pages.iter().filter(|p| p.is_ok() && p.grid.is_empty()).count(),
        rows: table.row_count(),
        columns: table.column_count(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    if failed > 0 {
        warn!("{}: {}/{} pages failed", document, failed, pages.len());
    }
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_complete(document, stats.rows);
    }

    Ok(DocumentReport {
        document: document.to_string(),
        outcome: DocumentOutcome::Extracted(DocumentTables {
            document: document.to_string(),
            total_pages,
            selection,
            pages,
            table,
            stats,
        }),
    })
}

/// Render and recognise one page, reporting progress.
async fn extract_page(
    document: &str,
    page_num: usize,
    prompt: &str,
    source: &dyn DocumentSource,
    recognizer: &dyn RecognitionService,
    config: &ExtractionConfig,
) -> Result<PageResult, Pdf2TableError> {
    let start = Instant::now();
    if let Some(ref cb) = config.progress_callback {
        cb.on_page_start(document, page_num);
    }

    let result = match source.render_page(document, page_num).await {
        Ok(image) => {
            process_page(recognizer, document, page_num, &image, prompt, config).await?
        }
        Err(e) => {
            warn!("{}: {}", document, e);
            PageResult::failed(
                page_num,
                0,
                start.elapsed().as_millis() as u64,
                PageError::RenderFailed {
                    page: page_num,
                    detail: e.to_string(),
                },
            )
        }
    };

    if let Some(ref cb) = config.progress_callback {
        match &result.error {
            None => cb.on_page_complete(document, page_num, result.grid.row_count()),
            Some(e) => cb.on_page_error(document, page_num, &e.to_string()),
        }
    }
    Ok(result)
}

/// Stack the grids of successful pages in page order.
///
/// With `normalize` off every cell is kept as [`CellValue::Text`].
pub fn assemble_table(pages: &[PageResult], normalize: bool) -> NormalizedGrid {
    let combined = Grid::concat(
        pages
            .iter()
            .filter(|p| p.is_ok())
            .map(|p| p.grid.clone()),
    );
    if normalize {
        normalize_grid(&combined)
    } else {
        combined.map(|cell| CellValue::Text(cell.clone()))
    }
}

/// Final path component of a document name, for roster matching.
pub fn document_name(document: &str) -> &str {
    document
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(document)
}
