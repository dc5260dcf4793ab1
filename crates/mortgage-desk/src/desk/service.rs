use std::sync::{Arc, Mutex, RwLock};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::admin::{AdminError, AdminStore, ClientRecord, NewClient};
use crate::lending::{
    CapacityAssessment, DeductionRegion, DeductionTable, Lender, LenderTable, LendingConfig,
    LoanCapacityCalculator, LoanRequest, LoanRequestError, LoanStructure,
};
use crate::pricing::{PriceEstimate, PriceLookup};
use crate::registry::{
    summarize_document, DocumentTextExtractor, PlainTextExtractor, RegistrySummarizer,
    RegistrySummary,
};

/// Quote inputs as submitted by a loan officer. Either `property_value` or
/// `address` must be present; the address is resolved through the price lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteInput {
    #[serde(default)]
    pub property_value: Option<Decimal>,
    #[serde(default)]
    pub address: Option<String>,
    pub existing_loan_balance: Decimal,
    pub loan_structure: LoanStructure,
    pub region_key: String,
    #[serde(default)]
    pub trust_or_mci_exempt: bool,
    pub credit_score: u16,
    #[serde(default)]
    pub senior_bond_ratio: Option<Decimal>,
}

/// Resolved request plus its assessment. `price_estimate` is set when the value came from a lookup.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub request: LoanRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_estimate: Option<PriceEstimate>,
    pub assessment: CapacityAssessment,
}

/// Client registration where the valuation may be left to the price lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSubmission {
    pub name: String,
    pub property_address: String,
    #[serde(default)]
    pub kb_price: Option<Decimal>,
    pub existing_loan: Decimal,
    pub credit_score: u16,
    pub loan_structure: LoanStructure,
    #[serde(default)]
    pub memo: Option<String>,
}

/// Quoting and admin operations over a swappable configuration snapshot.
pub struct DeskService<P, S> {
    store: Arc<AdminStore>,
    config: RwLock<Arc<LendingConfig>>,
    // Serializes admin edits from validation through publish.
    edit_lock: Mutex<()>,
    prices: Arc<P>,
    summarizer: Arc<S>,
    extractor: Arc<dyn DocumentTextExtractor>,
}

impl<P, S> DeskService<P, S>
where
    P: PriceLookup + 'static,
    S: RegistrySummarizer + 'static,
{
    /// Loads the persisted tables once; missing or malformed files fall back to defaults.
    pub fn new(store: Arc<AdminStore>, prices: Arc<P>, summarizer: Arc<S>) -> Self {
        let config = store.load_lending_config();
        info!(
            lenders = config.lenders.lenders().len(),
            regions = config.deductions.regions().len(),
            "lending configuration loaded"
        );
        Self::with_config(config, store, prices, summarizer)
    }

    pub fn with_config(
        config: LendingConfig,
        store: Arc<AdminStore>,
        prices: Arc<P>,
        summarizer: Arc<S>,
    ) -> Self {
        Self {
            store,
            config: RwLock::new(Arc::new(config)),
            edit_lock: Mutex::new(()),
            prices,
            summarizer,
            extractor: Arc::new(PlainTextExtractor),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn DocumentTextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Configuration in effect right now. Callers keep the snapshot for the whole
    /// calculation, so concurrent admin edits never mix into a running quote.
    pub fn snapshot(&self) -> Arc<LendingConfig> {
        match self.config.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    pub fn quote(&self, input: QuoteInput) -> Result<Quote, DeskError> {
        let (property_value, price_estimate) =
            match (input.property_value, input.address.as_deref()) {
                (Some(value), _) => (value, None),
                (None, Some(address)) if !address.trim().is_empty() => {
                    let estimate = self.prices.lookup_price(address);
                    (estimate.price, Some(estimate))
                }
                _ => return Err(DeskError::MissingValuation),
            };

        let request = LoanRequest {
            property_value,
            existing_loan_balance: input.existing_loan_balance,
            loan_structure: input.loan_structure,
            region_key: input.region_key,
            trust_or_mci_exempt: input.trust_or_mci_exempt,
            credit_score: input.credit_score,
            senior_bond_ratio: input
                .senior_bond_ratio
                .unwrap_or_else(crate::lending::domain::default_senior_bond_ratio),
        };
        request.validate()?;

        let calculator = LoanCapacityCalculator::new(self.snapshot());
        let assessment = calculator.assess(&request);

        Ok(Quote {
            request,
            price_estimate,
            assessment,
        })
    }

    pub fn lookup_price(&self, address: &str) -> PriceEstimate {
        self.prices.lookup_price(address)
    }

    pub fn summarize_text(&self, text: &str) -> RegistrySummary {
        self.summarizer.extract_summary(text)
    }

    pub fn summarize_document(&self, bytes: &[u8]) -> RegistrySummary {
        summarize_document(self.extractor.as_ref(), self.summarizer.as_ref(), bytes)
    }

    pub fn lenders(&self) -> Vec<Lender> {
        self.snapshot().lenders.lenders().to_vec()
    }

    pub fn regions(&self) -> Vec<DeductionRegion> {
        self.snapshot().deductions.regions().to_vec()
    }

    /// The new table is written to disk before it becomes visible to quotes.
    pub fn replace_lenders(&self, lenders: Vec<Lender>) -> Result<LenderTable, DeskError> {
        let _edit = self.edit_lock.lock().map_err(|_| AdminError::Poisoned)?;
        let table = LenderTable::new(lenders).map_err(AdminError::from)?;
        self.store.save_lenders(&table)?;

        let current = self.snapshot();
        self.publish(LendingConfig {
            lenders: table.clone(),
            deductions: current.deductions.clone(),
        });
        Ok(table)
    }

    pub fn replace_regions(
        &self,
        regions: Vec<DeductionRegion>,
    ) -> Result<DeductionTable, DeskError> {
        let _edit = self.edit_lock.lock().map_err(|_| AdminError::Poisoned)?;
        let table = DeductionTable::new(regions).map_err(AdminError::from)?;
        self.store.save_regions(&table)?;

        let current = self.snapshot();
        self.publish(LendingConfig {
            lenders: current.lenders.clone(),
            deductions: table.clone(),
        });
        Ok(table)
    }

    pub fn clients(&self) -> Result<Vec<ClientRecord>, DeskError> {
        Ok(self.store.clients()?)
    }

    pub fn register_client(
        &self,
        submission: ClientSubmission,
        today: NaiveDate,
    ) -> Result<ClientRecord, DeskError> {
        let kb_price = match submission.kb_price {
            Some(price) => price,
            None => self.prices.lookup_price(&submission.property_address).price,
        };

        let client = NewClient {
            name: submission.name,
            property_address: submission.property_address,
            kb_price,
            existing_loan: submission.existing_loan,
            credit_score: submission.credit_score,
            loan_structure: submission.loan_structure,
            memo: submission.memo,
        };
        Ok(self.store.register_client(client, today)?)
    }

    fn publish(&self, config: LendingConfig) {
        let next = Arc::new(config);
        match self.config.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

/// Error raised by the desk service.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("either property_value or address is required")]
    MissingValuation,
    #[error(transparent)]
    InvalidRequest(#[from] LoanRequestError),
    #[error(transparent)]
    Admin(#[from] AdminError),
}

impl DeskError {
    /// True when the caller supplied something unusable, as opposed to a storage failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DeskError::MissingValuation
                | DeskError::InvalidRequest(_)
                | DeskError::Admin(
                    AdminError::Validation(_)
                        | AdminError::Region(_)
                        | AdminError::InvalidClient(_)
                )
        )
    }
}
