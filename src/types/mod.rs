//! Public types exposed by the `sitemap-core` crate.

pub mod options;
pub mod record;
pub mod report;

pub use options::{FailurePolicy, GeneratorOptions, GeneratorOptionsBuilder};
pub use record::{GeneratedFile, Manifest, Recency, UrlRecord, sort_by_recency};
pub use report::{CleanupReport, GenerationReport, GenerationStatus, SourceFailure};
