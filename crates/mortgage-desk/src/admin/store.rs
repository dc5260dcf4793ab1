use super::domain::{ClientRecord, NewClient};
use super::parser::{read_rows, write_rows, ClientRow, LenderRow, RegionRow};
use super::AdminError;
use crate::lending::{
    DeductionRegion, DeductionTable, Lender, LenderTable, LenderValidationError, LendingConfig,
    RegionValidationError,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

pub const LENDERS_FILE: &str = "lenders.csv";
pub const REGIONS_FILE: &str = "regions.csv";
pub const CLIENTS_FILE: &str = "clients.csv";

/// Why a persisted table could not be used. Always recovered by falling back to
/// the built-in tables.
#[derive(Debug, thiserror::Error)]
pub enum TableLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed rows in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("invalid lender in {path}: {source}")]
    Lender {
        path: PathBuf,
        source: LenderValidationError,
    },
    #[error("invalid region in {path}: {source}")]
    Region {
        path: PathBuf,
        source: RegionValidationError,
    },
    #[error("{path} contains no lenders")]
    Empty { path: PathBuf },
}

/// Flat-file persistence for the admin tables under one directory.
#[derive(Debug)]
pub struct AdminStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl AdminStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the persisted configuration, substituting the built-in table for any
    /// file that is absent or malformed. Never fails.
    pub fn load_lending_config(&self) -> LendingConfig {
        let lenders = match self.read_lenders() {
            Ok(Some(table)) => table,
            Ok(None) => {
                info!(dir = %self.root.display(), "no lender table on disk, using built-in partners");
                LenderTable::standard()
            }
            Err(err) => {
                warn!(error = %err, "lender table unusable, using built-in partners");
                LenderTable::standard()
            }
        };

        let deductions = match self.read_regions() {
            Ok(Some(table)) => table,
            Ok(None) => DeductionTable::standard(),
            Err(err) => {
                warn!(error = %err, "region table unusable, using built-in deductions");
                DeductionTable::standard()
            }
        };

        LendingConfig {
            lenders,
            deductions,
        }
    }

    pub fn read_lenders(&self) -> Result<Option<LenderTable>, TableLoadError> {
        let path = self.root.join(LENDERS_FILE);
        let Some(rows) = read_table::<LenderRow>(&path)? else {
            return Ok(None);
        };
        if rows.is_empty() {
            return Err(TableLoadError::Empty { path });
        }

        let lenders = rows.into_iter().map(Lender::from).collect();
        LenderTable::new(lenders)
            .map(Some)
            .map_err(|source| TableLoadError::Lender { path, source })
    }

    pub fn read_regions(&self) -> Result<Option<DeductionTable>, TableLoadError> {
        let path = self.root.join(REGIONS_FILE);
        let Some(rows) = read_table::<RegionRow>(&path)? else {
            return Ok(None);
        };

        let regions: Vec<DeductionRegion> = rows.into_iter().map(DeductionRegion::from).collect();
        DeductionTable::new(regions)
            .map(Some)
            .map_err(|source| TableLoadError::Region { path, source })
    }

    pub fn save_lenders(&self, table: &LenderTable) -> Result<(), AdminError> {
        let rows: Vec<LenderRow> = table.lenders().iter().map(LenderRow::from).collect();
        let _guard = self.write_lock.lock().map_err(|_| AdminError::Poisoned)?;
        self.replace_file(LENDERS_FILE, &rows)?;
        info!(count = rows.len(), "lender table saved");
        Ok(())
    }

    pub fn save_regions(&self, table: &DeductionTable) -> Result<(), AdminError> {
        let rows: Vec<RegionRow> = table.regions().iter().map(RegionRow::from).collect();
        let _guard = self.write_lock.lock().map_err(|_| AdminError::Poisoned)?;
        self.replace_file(REGIONS_FILE, &rows)?;
        info!(count = rows.len(), "region table saved");
        Ok(())
    }

    pub fn clients(&self) -> Result<Vec<ClientRecord>, AdminError> {
        let path = self.root.join(CLIENTS_FILE);
        let rows = read_table::<ClientRow>(&path).map_err(AdminError::Table)?;
        Ok(rows
            .unwrap_or_default()
            .into_iter()
            .map(ClientRecord::from)
            .collect())
    }

    /// Appends a client with the next sequential id.
    pub fn register_client(
        &self,
        client: NewClient,
        registered_on: NaiveDate,
    ) -> Result<ClientRecord, AdminError> {
        client.validate().map_err(AdminError::InvalidClient)?;

        let _guard = self.write_lock.lock().map_err(|_| AdminError::Poisoned)?;
        let mut clients = self.clients()?;
        let next_id = clients.iter().map(|record| record.id).max().unwrap_or(0) + 1;
        let record = client.into_record(next_id, registered_on);
        clients.push(record.clone());

        let rows: Vec<ClientRow> = clients.iter().map(ClientRow::from).collect();
        self.replace_file(CLIENTS_FILE, &rows)?;
        info!(client_id = record.id, "client registered");
        Ok(record)
    }

    /// Writes to a sibling temp file and renames it over the target so readers
    /// never observe a half-written table.
    fn replace_file<T: Serialize>(&self, name: &str, rows: &[T]) -> Result<(), AdminError> {
        fs::create_dir_all(&self.root)?;
        let target = self.root.join(name);
        let staging = self.root.join(format!("{name}.tmp"));

        let file = File::create(&staging)?;
        write_rows(BufWriter::new(file), rows)?;
        fs::rename(&staging, &target)?;
        Ok(())
    }
}

fn read_table<T>(path: &Path) -> Result<Option<Vec<T>>, TableLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(TableLoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    read_rows(file).map(Some).map_err(|source| TableLoadError::Csv {
        path: path.to_path_buf(),
        source,
    })
}
