// Candidate intake: text extraction, enrichment, and the preview/apply pipeline.

pub mod extractor;
pub mod handlers;
pub mod pipeline;

pub use extractor::PdfTextExtractor;
pub use pipeline::{Enricher, IntakePipeline};
