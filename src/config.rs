//! Configuration types for table extraction.
//!
//! All orchestration behaviour is controlled through [`ExtractionConfig`],
//! built via its [`ExtractionConfigBuilder`]. The page resolver and the
//! table normaliser take no configuration beyond the [`Lexicon`] carried
//! here; everything else tunes how the recognition service is driven.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on well-documented
//! defaults for the rest. Setters clamp obviously wrong values and
//! [`ExtractionConfigBuilder::build`] rejects the combinations that cannot
//! be clamped into something sensible.

use crate::error::Pdf2TableError;
use crate::lexicon::Lexicon;
use crate::progress::ProgressCallback;
use std::fmt;

/// Upper bound on retries per page; [`crate::output::PageResult::retries`] is a `u8`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Configuration for an extraction batch.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2table::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .concurrency(2)
///     .max_retries(5)
///     .normalize_cells(false)
///     .build()
///     .unwrap();
/// assert_eq!(config.concurrency, 2);
/// ```
#[derive(Clone)]
pub struct ExtractionConfig {
    /// Pages of one document recognised concurrently. Default: 4.
    ///
    /// Recognition is network-bound. Documents are still processed one
    /// after another so the sink sees them in batch order.
    pub concurrency: usize,

    /// Retries per page after the first attempt. Default: 3.
    ///
    /// Applies separately to rate-limit responses and transient failures.
    /// Client errors are never retried.
    pub max_retries: u32,

    /// Initial delay before retrying a transient failure, doubled after each
    /// attempt: 500 ms → 1 s → 2 s. Default: 500.
    pub retry_backoff_ms: u64,

    /// Base delay for rate-limit retries, grown linearly: 10 s → 20 s → 30 s.
    /// A `retry_after` hint from the service takes precedence. Default: 10 000.
    pub rate_limit_backoff_ms: u64,

    /// Recognition prompt. If None, uses [`crate::prompts::DEFAULT_TABLE_PROMPT`].
    pub prompt: Option<String>,

    /// Coerce cells to numbers where they read as one. Default: true.
    ///
    /// When off, every cell of the combined table is kept as text.
    pub normalize_cells: bool,

    /// Keyword tables for the page resolver. Default: English and Spanish.
    pub lexicon: Lexicon,

    /// Receiver for per-document and per-page events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_retries: 3,
            retry_backoff_ms: 500,
            rate_limit_backoff_ms: 10_000,
            prompt: None,
            normalize_cells: true,
            lexicon: Lexicon::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("concurrency", &self.concurrency)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("rate_limit_backoff_ms", &self.rate_limit_backoff_ms)
            .field("prompt", &self.prompt.as_ref().map(|p| p.len()))
            .field("normalize_cells", &self.normalize_cells)
            .field("languages", &self.lexicon.languages.keys().collect::<Vec<_>>())
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Prompt sent with every page.
    pub fn prompt(&self) -> &str {
        self.prompt
            .as_deref()
            .unwrap_or(crate::prompts::DEFAULT_TABLE_PROMPT)
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n.min(MAX_RETRIES_LIMIT);
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn rate_limit_backoff_ms(mut self, ms: u64) -> Self {
        self.config.rate_limit_backoff_ms = ms;
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    pub fn normalize_cells(mut self, v: bool) -> Self {
        self.config.normalize_cells = v;
        self
    }

    pub fn lexicon(mut self, lexicon: Lexicon) -> Self {
        self.config.lexicon = lexicon;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, Pdf2TableError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(Pdf2TableError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.max_retries > MAX_RETRIES_LIMIT {
            return Err(Pdf2TableError::InvalidConfig(format!(
                "max_retries must be ≤ {MAX_RETRIES_LIMIT}, got {}",
                c.max_retries
            )));
        }
        if c.prompt.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(Pdf2TableError::InvalidConfig(
                "Prompt must not be blank".into(),
            ));
        }
        if c.lexicon.page_words().next().is_none() {
            return Err(Pdf2TableError::InvalidConfig(
                "Lexicon defines no page words".into(),
            ));
        }
        Ok(self.config)
    }
}
