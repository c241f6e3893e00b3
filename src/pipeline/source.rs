//! Document access: page counts and rendered page images.

use crate::error::SourceError;
use async_trait::async_trait;

/// A rendered page, ready to send to a [`super::recognize::RecognitionService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    pub data: Vec<u8>,
    /// MIME type of `data`, e.g. `image/png`.
    pub mime_type: String,
}

impl PageImage {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    pub fn png(data: Vec<u8>) -> Self {
        Self::new(data, "image/png")
    }
}

/// Opens documents by name and renders individual pages.
///
/// `document` is the name as passed to the batch (typically a path). Page
/// numbers are 1-indexed.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Number of pages in `document`.
    async fn page_count(&self, document: &str) -> Result<usize, SourceError>;

    /// Rasterise one page.
    async fn render_page(&self, document: &str, page_num: usize)
        -> Result<PageImage, SourceError>;
}
