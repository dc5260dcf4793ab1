use std::fs;
use std::sync::Arc;

use chrono::NaiveDate;
use mortgage_desk::admin::{AdminStore, NewClient, LENDERS_FILE, REGIONS_FILE};
use mortgage_desk::lending::{
    DeductionRegion, DeductionTable, Lender, LenderTable, LendingConfig, LoanCapacityCalculator,
    LoanRequest, LoanStructure,
};
use rust_decimal_macros::dec;

fn seoul_refinance() -> LoanRequest {
    LoanRequest {
        property_value: dec!(1000000000),
        existing_loan_balance: dec!(500000000),
        loan_structure: LoanStructure::Refinance,
        region_key: "서울".to_string(),
        trust_or_mci_exempt: false,
        credit_score: 800,
        senior_bond_ratio: dec!(1.2),
    }
}

#[test]
fn empty_directory_loads_built_in_tables() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = AdminStore::new(dir.path().join("not-yet-created"));

    assert_eq!(store.load_lending_config(), LendingConfig::standard());
}

#[test]
fn malformed_files_fall_back_per_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join(LENDERS_FILE),
        "id,display_name,ltv_max,rate_min,rate_max\nbroken,Broken,not-a-number,5,6\n",
    )
    .expect("write lenders");
    fs::write(
        dir.path().join(REGIONS_FILE),
        "region_key,deduction_amount\n서울,60000000\n",
    )
    .expect("write regions");

    let config = AdminStore::new(dir.path()).load_lending_config();

    assert_eq!(config.lenders, LenderTable::standard());
    assert_eq!(config.deductions.lookup("서울"), dec!(60000000));
    assert_eq!(config.deductions.lookup("광역시"), dec!(25000000));
}

#[test]
fn saved_tables_drive_the_next_calculation() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = AdminStore::new(dir.path());

    let lenders = LenderTable::new(vec![
        Lender::new("신한저축은행", "신한", dec!(0.75), dec!(6.0), dec!(7.0)).expect("valid"),
    ])
    .expect("table");
    store.save_lenders(&lenders).expect("lenders saved");
    store
        .save_regions(&DeductionTable::new(vec![DeductionRegion {
            region_key: "서울".to_string(),
            deduction_amount: dec!(50000000),
        }])
        .expect("valid regions"))
        .expect("regions saved");
    assert!(!dir.path().join(format!("{LENDERS_FILE}.tmp")).exists());

    let reloaded = store.load_lending_config();
    assert_eq!(reloaded.lenders, lenders);

    let offers = LoanCapacityCalculator::new(Arc::new(reloaded)).calculate(&seoul_refinance());
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].deduction_applied, dec!(50000000));
    assert_eq!(offers[0].net_new_cash, dec!(200000000));
    assert_eq!(offers[0].estimated_rate, dec!(6.5));
}

#[test]
fn clients_accumulate_with_sequential_ids() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = AdminStore::new(dir.path());
    let day = NaiveDate::from_ymd_opt(2026, 3, 9).expect("valid date");

    for name in ["강성엽", "정하늘"] {
        store
            .register_client(
                NewClient {
                    name: name.to_string(),
                    property_address: "서울특별시 송파구 잠실동 40".to_string(),
                    kb_price: dec!(2750000000),
                    existing_loan: dec!(900000000),
                    credit_score: 910,
                    loan_structure: LoanStructure::Subordinate,
                    memo: None,
                },
                day,
            )
            .expect("client registered");
    }

    let clients = store.clients().expect("clients load");
    assert_eq!(
        clients.iter().map(|client| client.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(clients[1].name, "정하늘");
    assert_eq!(clients[1].registered_on, day);
    assert_eq!(clients[1].kb_price, dec!(2750000000));
}
