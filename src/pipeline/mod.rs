//! Pipeline stages and the collaborator seams of the extraction pipeline.
//!
//! The crate never touches PDF bytes, HTTP, or spreadsheets itself. Those
//! are caller-supplied implementations of three traits, which keeps every
//! stage testable with in-memory fakes.
//!
//! ## Data Flow
//!
//! ```text
//! source ──▶ recognize ──▶ table::parse ──▶ sink
//! (pages)    (service +     (grid)          (combined
//!             retry)                         document table)
//! ```
//!
//! 1. [`source`]: page counts and rendered page images per document
//! 2. [`recognize`]: drive the recognition service with retry/backoff; the
//!    only stage that waits on the network
//! 3. [`sink`]: receive each document's combined table

pub mod recognize;
pub mod sink;
pub mod source;
