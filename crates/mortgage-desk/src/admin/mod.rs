//! CSV-backed admin panel for the lender, region and client tables.

pub mod domain;
mod parser;
pub mod store;

pub use domain::{ClientRecord, NewClient};
pub use store::{AdminStore, TableLoadError, CLIENTS_FILE, LENDERS_FILE, REGIONS_FILE};

use crate::lending::{LenderValidationError, RegionValidationError};

/// Failure raised by admin edits. Loading never raises; see [`AdminStore::load_lending_config`].
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    Validation(#[from] LenderValidationError),
    #[error(transparent)]
    Region(#[from] RegionValidationError),
    #[error("invalid client: {0}")]
    InvalidClient(String),
    #[error(transparent)]
    Table(TableLoadError),
    #[error("failed to write admin table: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode admin table: {0}")]
    Csv(#[from] csv::Error),
    #[error("admin store lock poisoned")]
    Poisoned,
}
