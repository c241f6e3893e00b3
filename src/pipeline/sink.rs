//! Output hand-off for combined document tables.

use crate::error::SinkError;
use crate::output::DocumentTables;
use async_trait::async_trait;

/// Receives the combined table of every document that produced rows,
/// in batch order.
///
/// A spreadsheet writer appending one sheet per document, a database
/// loader, or a test double collecting tables in memory all fit here.
/// Returning an error stops the batch.
#[async_trait]
pub trait TableSink: Send + Sync {
    async fn write_document(&self, tables: &DocumentTables) -> Result<(), SinkError>;
}
