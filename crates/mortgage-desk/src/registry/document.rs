use super::summarizer::{RegistrySummarizer, RegistrySummary};

/// Page separator emitted by common PDF-to-text tools.
const FORM_FEED: char = '\u{000c}';

/// Capability that turns an uploaded document into plain text, one entry per page.
pub trait DocumentTextExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Vec<String>;
}

/// Accepts text that was already extracted upstream. Invalid UTF-8 is replaced
/// rather than rejected, and pages are split on form feeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl DocumentTextExtractor for PlainTextExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Vec<String> {
        let text = String::from_utf8_lossy(bytes);
        text.split(FORM_FEED)
            .map(str::to_string)
            .filter(|page| !page.trim().is_empty())
            .collect()
    }
}

pub fn summarize_document<E, S>(extractor: &E, summarizer: &S, bytes: &[u8]) -> RegistrySummary
where
    E: DocumentTextExtractor + ?Sized,
    S: RegistrySummarizer + ?Sized,
{
    let pages = extractor.extract_pages(bytes);
    tracing::debug!(pages = pages.len(), "summarizing registry document");
    summarizer.extract_summary(&pages.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PatternSummarizer;

    #[test]
    fn splits_pages_on_form_feed() {
        let pages = PlainTextExtractor.extract_pages(b"page one\x0cpage two\x0c  \n");
        assert_eq!(pages, vec!["page one".to_string(), "page two".to_string()]);
    }

    #[test]
    fn liens_on_separate_pages_are_all_collected() {
        let bytes = "채권최고액 금500,000,000원\u{000c}채권최고액 금300,000,000원".as_bytes();
        let summary = summarize_document(&PlainTextExtractor, &PatternSummarizer, bytes);
        assert_eq!(summary.liens, vec![500_000_000, 300_000_000]);
        assert_eq!(summary.total_lien_exposure(), 800_000_000);
    }
}
