use super::normalizer::normalize_text;
use super::patterns::{all_captures, first_capture, parse_amount, RE_ADDRESS, RE_OWNER, RE_SECURED_CLAIM};
use serde::Serialize;
use std::collections::BTreeSet;

/// Shown when no address field could be located in the document text.
pub const ADDRESS_PLACEHOLDER: &str = "주소 확인 불가";

/// Best-effort digest of a property registry extract (등기사항전부증명서).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub address: String,
    pub owners: BTreeSet<String>,
    pub liens: Vec<u128>,
}

impl RegistrySummary {
    /// Saturates at `u128::MAX` rather than wrapping.
    pub fn total_lien_exposure(&self) -> u128 {
        self.liens
            .iter()
            .fold(0u128, |total, lien| total.saturating_add(*lien))
    }

    pub fn address_found(&self) -> bool {
        self.address != ADDRESS_PLACEHOLDER
    }
}

/// Capability for turning registry text into a summary. Implementations are
/// heuristic: they do not verify that the text came from an authentic document.
pub trait RegistrySummarizer: Send + Sync {
    fn extract_summary(&self, document_text: &str) -> RegistrySummary;
}

/// Regex-based summarizer tuned to the standard registry layout. Non-standard
/// layouts will produce false negatives (placeholders and empty fields).
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternSummarizer;

impl RegistrySummarizer for PatternSummarizer {
    fn extract_summary(&self, document_text: &str) -> RegistrySummary {
        let text = normalize_text(document_text);

        let address = first_capture(&RE_ADDRESS, &text)
            .unwrap_or_else(|| ADDRESS_PLACEHOLDER.to_string());
        let owners = all_captures(&RE_OWNER, &text).into_iter().collect();
        let liens = all_captures(&RE_SECURED_CLAIM, &text)
            .iter()
            .filter_map(|raw| parse_amount(raw))
            .collect();

        RegistrySummary {
            address,
            owners,
            liens,
        }
    }
}
