//! Heuristic summaries of property registry extracts.

mod document;
mod normalizer;
mod patterns;
mod summarizer;

pub use document::{summarize_document, DocumentTextExtractor, PlainTextExtractor};
pub use summarizer::{PatternSummarizer, RegistrySummarizer, RegistrySummary, ADDRESS_PLACEHOLDER};
