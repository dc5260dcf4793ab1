use metrics_exporter_prometheus::PrometheusHandle;
use mortgage_desk::admin::AdminStore;
use mortgage_desk::desk::DeskService;
use mortgage_desk::lending::LoanStructure;
use mortgage_desk::pricing::MockKbPriceLookup;
use mortgage_desk::registry::PatternSummarizer;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type DeskApp = DeskService<MockKbPriceLookup, PatternSummarizer>;

/// Desk service over the CSV tables in `data_dir`, with the bundled price
/// lookup and pattern summarizer.
pub(crate) fn build_service(data_dir: &Path) -> DeskApp {
    let store = Arc::new(AdminStore::new(data_dir));
    DeskService::new(
        store,
        Arc::new(MockKbPriceLookup::default()),
        Arc::new(PatternSummarizer),
    )
}

pub(crate) fn parse_structure(raw: &str) -> Result<LoanStructure, String> {
    raw.parse()
}

/// Parses won amounts as loan officers type them: "877,000,000", "13.6억",
/// or "87,700만".
pub(crate) fn parse_won(raw: &str) -> Result<Decimal, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.strip_suffix('원').unwrap_or(cleaned.as_str());

    let (digits, multiplier) = if let Some(value) = cleaned.strip_suffix('억') {
        (value, Decimal::new(100_000_000, 0))
    } else if let Some(value) = cleaned.strip_suffix('만') {
        (value, Decimal::new(10_000, 0))
    } else {
        (cleaned, Decimal::ONE)
    };

    let amount = Decimal::from_str(digits)
        .map_err(|err| format!("failed to parse '{raw}' as a won amount ({err})"))?;
    Ok((amount * multiplier).normalize())
}

pub(crate) fn parse_decimal(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|err| format!("failed to parse '{raw}' ({err})"))
}
