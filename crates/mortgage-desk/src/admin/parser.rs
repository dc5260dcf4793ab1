use crate::lending::{DeductionRegion, Lender, LenderId, LoanStructure};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::{Read, Write};

use super::domain::ClientRecord;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LenderRow {
    id: String,
    display_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    ltv_max: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    rate_min: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    rate_max: Decimal,
}

impl From<LenderRow> for Lender {
    fn from(row: LenderRow) -> Self {
        Lender {
            id: LenderId(row.id),
            display_name: row.display_name,
            ltv_max: row.ltv_max,
            rate_min: row.rate_min,
            rate_max: row.rate_max,
        }
    }
}

impl From<&Lender> for LenderRow {
    fn from(lender: &Lender) -> Self {
        Self {
            id: lender.id.0.clone(),
            display_name: lender.display_name.clone(),
            ltv_max: lender.ltv_max,
            rate_min: lender.rate_min,
            rate_max: lender.rate_max,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RegionRow {
    region_key: String,
    #[serde(with = "rust_decimal::serde::str")]
    deduction_amount: Decimal,
}

impl From<RegionRow> for DeductionRegion {
    fn from(row: RegionRow) -> Self {
        DeductionRegion {
            region_key: row.region_key,
            deduction_amount: row.deduction_amount,
        }
    }
}

impl From<&DeductionRegion> for RegionRow {
    fn from(region: &DeductionRegion) -> Self {
        Self {
            region_key: region.region_key.clone(),
            deduction_amount: region.deduction_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ClientRow {
    id: u32,
    name: String,
    property_address: String,
    #[serde(with = "rust_decimal::serde::str")]
    kb_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    existing_loan: Decimal,
    credit_score: u16,
    loan_structure: LoanStructure,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    memo: Option<String>,
    registered_on: NaiveDate,
}

impl From<ClientRow> for ClientRecord {
    fn from(row: ClientRow) -> Self {
        ClientRecord {
            id: row.id,
            name: row.name,
            property_address: row.property_address,
            kb_price: row.kb_price,
            existing_loan: row.existing_loan,
            credit_score: row.credit_score,
            loan_structure: row.loan_structure,
            memo: row.memo,
            registered_on: row.registered_on,
        }
    }
}

impl From<&ClientRecord> for ClientRow {
    fn from(record: &ClientRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            property_address: record.property_address.clone(),
            kb_price: record.kb_price,
            existing_loan: record.existing_loan,
            credit_score: record.credit_score,
            loan_structure: record.loan_structure,
            memo: record.memo.clone(),
            registered_on: record.registered_on,
        }
    }
}

pub(crate) fn read_rows<R, T>(reader: R) -> Result<Vec<T>, csv::Error>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize::<T>().collect()
}

pub(crate) fn write_rows<W, T>(writer: W, rows: &[T]) -> Result<(), csv::Error>
where
    W: Write,
    T: Serialize,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn lender_rows_keep_exact_decimals() {
        let csv = "id,display_name,ltv_max,rate_min,rate_max\n애큐온저축은행, 애큐온 ,0.85,5.8,6.9\n";
        let rows: Vec<LenderRow> = read_rows(csv.as_bytes()).expect("rows parse");
        let lender = Lender::from(rows.into_iter().next().expect("one row"));

        assert_eq!(lender.display_name, "애큐온");
        assert_eq!(lender.ltv_max, dec!(0.85));
        assert_eq!(lender.rate_max, dec!(6.9));
    }

    #[test]
    fn client_rows_treat_blank_memo_as_missing() {
        let csv = "id,name,property_address,kb_price,existing_loan,credit_score,loan_structure,memo,registered_on\n\
3,강성엽,경기도 성남시 분당구 정자동 1,1360000000,877000000,850,refinance,,2026-01-02\n";
        let rows: Vec<ClientRow> = read_rows(csv.as_bytes()).expect("rows parse");
        let record = ClientRecord::from(rows.into_iter().next().expect("one row"));

        assert_eq!(record.id, 3);
        assert_eq!(record.loan_structure, LoanStructure::Refinance);
        assert!(record.memo.is_none());
        assert_eq!(
            record.registered_on,
            NaiveDate::from_ymd_opt(2026, 1, 2).expect("valid date")
        );
    }

    #[test]
    fn malformed_numbers_are_reported() {
        let csv = "region_key,deduction_amount\n서울,오천만원\n";
        let result: Result<Vec<RegionRow>, _> = read_rows(csv.as_bytes());
        assert!(result.is_err());
    }
}
