//! Recognition: send a page image to the service and parse the answer.
//!
//! This module is intentionally thin. Prompt text lives in
//! [`crate::prompts`] and table parsing in [`crate::table`]; what remains
//! here is retry and error classification.
//!
//! ## Retry Strategy
//!
//! Failures are sorted by what a retry can achieve:
//!
//! | Failure | Wait | When retries run out |
//! |---------|------|----------------------|
//! | `ClientError` | never retried | fatal [`Pdf2TableError::ClientError`] |
//! | `RateLimited` | `retry_after`, else `rate_limit_backoff_ms * (n + 1)` | fatal [`Pdf2TableError::RateLimitExceeded`] |
//! | `Transient` | `retry_backoff_ms * 2^n` | [`PageError::RecognitionFailed`] on the page |
//!
//! A rejected credential or an exhausted quota will fail every remaining
//! page in the same way, so those stop the batch. A flaky page only costs
//! its own rows.

use super::source::PageImage;
use crate::config::ExtractionConfig;
use crate::error::{PageError, Pdf2TableError, RecognitionError};
use crate::output::PageResult;
use crate::table::{parse_grid, strip_code_fences};
use async_trait::async_trait;
use std::time::Instant;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// A vision model (or OCR service) that turns a page image into
/// markdown-like text.
#[async_trait]
pub trait RecognitionService: Send + Sync {
    async fn recognize(&self, image: &PageImage, prompt: &str)
        -> Result<String, RecognitionError>;
}

/// Recognise one page and parse its table rows.
///
/// Returns `Ok` with a populated [`PageResult`] on success and also when
/// transient failures outlast the retries (then `result.error` is set).
/// Returns `Err` only for the fatal cases in the module table.
pub async fn process_page(
    service: &dyn RecognitionService,
    document: &str,
    page_num: usize,
    image: &PageImage,
    prompt: &str,
    config: &ExtractionConfig,
) -> Result<PageResult, Pdf2TableError> {
    let start = Instant::now();
    let mut rate_limited: u32 = 0;
    let mut transient: u32 = 0;

    loop {
        let retries = (rate_limited + transient) as u8;

        let err = match service.recognize(image, prompt).await {
            Ok(text) => {
                let markdown = strip_code_fences(&text);
                let grid = parse_grid(&markdown);
                let duration = start.elapsed();
                debug!(
                    "{document} page {page_num}: {} rows, {} retries, {:?}",
                    grid.row_count(),
                    retries,
                    duration
                );
                return Ok(PageResult {
                    page_num,
                    markdown,
                    grid,
                    retries,
                    duration_ms: duration.as_millis() as u64,
                    error: None,
                });
            }
            Err(e) => e,
        };

        match err {
            RecognitionError::ClientError { detail } => {
                warn!("{document} page {page_num}: client error: {detail}");
                return Err(Pdf2TableError::ClientError {
                    document: document.to_string(),
                    page: page_num,
                    detail,
                });
            }
            RecognitionError::RateLimited { retry_after } => {
                if rate_limited >= config.max_retries {
                    return Err(Pdf2TableError::RateLimitExceeded {
                        document: document.to_string(),
                        page: page_num,
                        attempts: rate_limited + 1,
                    });
                }
                let wait = retry_after.unwrap_or_else(|| rate_limit_wait(config, rate_limited));
                rate_limited += 1;
                warn!(
                    "{document} page {page_num}: rate limited, retry {}/{} after {:?}",
                    rate_limited, config.max_retries, wait
                );
                sleep(wait).await;
            }
            RecognitionError::Transient { detail } => {
                if transient >= config.max_retries {
                    warn!("{document} page {page_num}: giving up: {detail}");
                    return Ok(PageResult::failed(
                        page_num,
                        retries,
                        start.elapsed().as_millis() as u64,
                        PageError::RecognitionFailed {
                            page: page_num,
                            retries,
                            detail,
                        },
                    ));
                }
                let backoff = transient_backoff_ms(config, transient);
                transient += 1;
                warn!(
                    "{document} page {page_num}: {detail}, retry {}/{} after {}ms",
                    transient, config.max_retries, backoff
                );
                sleep(Duration::from_millis(backoff)).await;
            }
        }
    }
}

/// Linear wait before rate-limit retry `n + 1`.
fn rate_limit_wait(config: &ExtractionConfig, n: u32) -> Duration {
    Duration::from_millis(
        config
            .rate_limit_backoff_ms
            .saturating_mul(u64::from(n) + 1),
    )
}

/// Exponential backoff in ms before transient retry `n + 1`.
fn transient_backoff_ms(config: &ExtractionConfig, n: u32) -> u64 {
    config
        .retry_backoff_ms
        .saturating_mul(2u64.saturating_pow(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted answers, then keeps returning the last one.
    struct Scripted {
        answers: Mutex<VecDeque<Result<String, RecognitionError>>>,
        calls: Mutex<usize>,
    }

    impl Scripted {
        fn new(answers: Vec<Result<String, RecognitionError>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl RecognitionService for Scripted {
        async fn recognize(
            &self,
            _image: &PageImage,
            _prompt: &str,
        ) -> Result<String, RecognitionError> {
            *self.calls.lock().unwrap() += 1;
            let mut answers = self.answers.lock().unwrap();
            if answers.len() > 1 {
                answers.pop_front().unwrap()
            } else {
                answers.front().cloned().unwrap()
            }
        }
    }

    fn fast_config(max_retries: u32) -> ExtractionConfig {
        ExtractionConfig::builder()
            .max_retries(max_retries)
            .retry_backoff_ms(0)
            .rate_limit_backoff_ms(0)
            .build()
            .unwrap()
    }

    fn image() -> PageImage {
        PageImage::png(vec![0x89, b'P', b'N', b'G'])
    }

    fn transient() -> Result<String, RecognitionError> {
        Err(RecognitionError::Transient {
            detail: "503".into(),
        })
    }

    #[tokio::test]
    async fn success_strips_fences_and_parses() {
        let svc = Scripted::new(vec![Ok("```markdown\n| a | b |\n|---|---|\n| 1 | 2 |\n```".into())]);
        let r = process_page(&svc, "doc.pdf", 1, &image(), "p", &fast_config(3))
            .await
            .unwrap();
        assert!(r.is_ok());
        assert_eq!(r.markdown, "| a | b |\n|---|---|\n| 1 | 2 |");
        assert_eq!(r.grid.row_count(), 2);
        assert_eq!(r.retries, 0);
    }

    #[tokio::test]
    async fn transient_then_success_counts_retries() {
        let svc = Scripted::new(vec![transient(), transient(), Ok("| x |".into())]);
        let r = process_page(&svc, "doc.pdf", 4, &image(), "p", &fast_config(3))
            .await
            .unwrap();
        assert!(r.is_ok());
        assert_eq!(r.retries, 2);
        assert_eq!(svc.calls(), 3);
    }

    #[tokio::test]
    async fn transient_exhaustion_is_a_page_error() {
        let svc = Scripted::new(vec![transient()]);
        let r = process_page(&svc, "doc.pdf", 2, &image(), "p", &fast_config(2))
            .await
            .unwrap();
        assert_eq!(svc.calls(), 3);
        assert!(r.grid.is_empty());
        assert!(matches!(
            r.error,
            Some(PageError::RecognitionFailed { page: 2, retries: 2, .. })
        ));
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let svc = Scripted::new(vec![Err(RecognitionError::ClientError {
            detail: "403 forbidden".into(),
        })]);
        let err = process_page(&svc, "doc.pdf", 1, &image(), "p", &fast_config(3))
            .await
            .unwrap_err();
        assert_eq!(svc.calls(), 1);
        assert!(matches!(err, Pdf2TableError::ClientError { page: 1, .. }));
    }

    #[tokio::test]
    async fn rate_limit_exhaustion_is_fatal() {
        let svc = Scripted::new(vec![Err(RecognitionError::RateLimited { retry_after: None })]);
        let err = process_page(&svc, "doc.pdf", 3, &image(), "p", &fast_config(1))
            .await
            .unwrap_err();
        assert_eq!(svc.calls(), 2);
        assert!(matches!(
            err,
            Pdf2TableError::RateLimitExceeded { page: 3, attempts: 2, .. }
        ));
    }

    #[tokio::test]
    async fn retry_after_hint_is_honoured() {
        let svc = Scripted::new(vec![
            Err(RecognitionError::RateLimited {
                retry_after: Some(Duration::from_millis(1)),
            }),
            Ok("| ok |".into()),
        ]);
        let r = process_page(&svc, "doc.pdf", 1, &image(), "p", &fast_config(1))
            .await
            .unwrap();
        assert_eq!(r.retries, 1);
        assert_eq!(r.grid.rows()[0], vec!["ok"]);
    }

    #[tokio::test]
    async fn empty_answer_means_no_rows() {
        let svc = Scripted::new(vec![Ok("  ".into())]);
        let r = process_page(&svc, "doc.pdf", 1, &image(), "p", &fast_config(0))
            .await
            .unwrap();
        assert!(r.is_ok());
        assert!(r.grid.is_empty());
    }

    #[test]
    fn backoff_schedules() {
        let config = ExtractionConfig::builder()
            .retry_backoff_ms(500)
            .rate_limit_backoff_ms(10_000)
            .build()
            .unwrap();
        assert_eq!(transient_backoff_ms(&config, 0), 500);
        assert_eq!(transient_backoff_ms(&config, 3), 4_000);
        assert_eq!(rate_limit_wait(&config, 0), Duration::from_secs(10));
        assert_eq!(rate_limit_wait(&config, 2), Duration::from_secs(30));
    }

    #[test]
    fn huge_backoffs_saturate() {
        let config = ExtractionConfig::builder()
            .retry_backoff_ms(u64::MAX / 2)
            .rate_limit_backoff_ms(u64::MAX)
            .build()
            .unwrap();
        assert_eq!(transient_backoff_ms(&config, 10), u64::MAX);
        assert_eq!(rate_limit_wait(&config, 9), Duration::from_millis(u64::MAX));
    }
}
