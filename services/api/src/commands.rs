use crate::infra::{build_service, parse_decimal, parse_structure, parse_won, DeskApp};
use chrono::Local;
use clap::{Args, Subcommand};
use mortgage_desk::config::AppConfig;
use mortgage_desk::desk::{ClientSubmission, Quote, QuoteInput};
use mortgage_desk::error::AppError;
use mortgage_desk::lending::views::{manwon_label, to_manwon};
use mortgage_desk::lending::{
    DeductionRegion, Lender, LenderId, LoanStructure, OfferRow, QuoteSheet,
};
use mortgage_desk::registry::RegistrySummary;
use mortgage_desk::telemetry;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Property value in won ("1360000000", "13.6억"). Omit to look up --address
    #[arg(long, value_parser = parse_won)]
    pub(crate) value: Option<Decimal>,
    /// Address used for the market price lookup when --value is absent
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// Outstanding principal on the existing loan
    #[arg(long, value_parser = parse_won)]
    pub(crate) existing_loan: Decimal,
    /// refinance/대환 or subordinate/후순위
    #[arg(long, value_parser = parse_structure)]
    pub(crate) structure: LoanStructure,
    /// Region category used for the deposit deduction
    #[arg(long, default_value = "그외")]
    pub(crate) region: String,
    /// Borrower carries trust or mortgage credit insurance; no deduction applies
    #[arg(long)]
    pub(crate) exempt: bool,
    /// NICE credit score
    #[arg(long)]
    pub(crate) score: u16,
    /// Registered-maximum multiplier on the senior lien (defaults to 1.2)
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) senior_ratio: Option<Decimal>,
    /// List lenders whose new cash did not clear zero
    #[arg(long)]
    pub(crate) show_excluded: bool,
    /// Print the quote as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
    /// Override DESK_DATA_DIR for the admin tables
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct KbPriceArgs {
    /// Free-text apartment address
    pub(crate) address: String,
}

#[derive(Args, Debug)]
pub(crate) struct RegistrySummaryArgs {
    /// Text extracted from a registry PDF; pages may be separated by form feeds
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Print the summary as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AdminArgs {
    /// Override DESK_DATA_DIR for the admin tables
    #[arg(long, global = true)]
    pub(crate) data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) command: AdminCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum AdminCommand {
    /// Partner lender guidelines
    Lenders {
        #[command(subcommand)]
        command: LenderCommand,
    },
    /// Region deposit deductions
    Regions {
        #[command(subcommand)]
        command: RegionCommand,
    },
    /// Registered borrowers
    Clients {
        #[command(subcommand)]
        command: ClientCommand,
    },
}

#[derive(Subcommand, Debug)]
pub(crate) enum LenderCommand {
    List,
    /// Add a lender, replacing any existing entry with the same id
    Add(LenderArgs),
}

#[derive(Args, Debug)]
pub(crate) struct LenderArgs {
    #[arg(long)]
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) ltv: Decimal,
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) rate_min: Decimal,
    #[arg(long, value_parser = parse_decimal)]
    pub(crate) rate_max: Decimal,
}

#[derive(Subcommand, Debug)]
pub(crate) enum RegionCommand {
    List,
    /// Add a region, replacing any existing entry with the same key
    Add(RegionArgs),
}

#[derive(Args, Debug)]
pub(crate) struct RegionArgs {
    #[arg(long)]
    pub(crate) key: String,
    #[arg(long, value_parser = parse_won)]
    pub(crate) amount: Decimal,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ClientCommand {
    List,
    Add(ClientArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ClientArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) address: String,
    /// Market price; looked up from the address when omitted
    #[arg(long, value_parser = parse_won)]
    pub(crate) kb_price: Option<Decimal>,
    #[arg(long, value_parser = parse_won)]
    pub(crate) existing_loan: Decimal,
    #[arg(long)]
    pub(crate) score: u16,
    #[arg(long, value_parser = parse_structure)]
    pub(crate) structure: LoanStructure,
    #[arg(long)]
    pub(crate) memo: Option<String>,
}

/// Opens the desk over the configured data directory, with logging on stderr.
fn open_desk(data_dir: Option<PathBuf>) -> Result<DeskApp, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(dir) = data_dir {
        config.desk.data_dir = dir;
    }
    telemetry::init(&config.telemetry)?;
    Ok(build_service(&config.desk.data_dir))
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        value,
        address,
        existing_loan,
        structure,
        region,
        exempt,
        score,
        senior_ratio,
        show_excluded,
        json,
        data_dir,
    } = args;

    let service = open_desk(data_dir)?;
    let quote = service.quote(QuoteInput {
        property_value: value,
        address,
        existing_loan_balance: existing_loan,
        loan_structure: structure,
        region_key: region,
        trust_or_mci_exempt: exempt,
        credit_score: score,
        senior_bond_ratio: senior_ratio,
    })?;

    if json {
        print_json(&quote);
    } else {
        render_quote(&quote, show_excluded);
    }
    Ok(())
}

pub(crate) fn run_kb_price(args: KbPriceArgs) -> Result<(), AppError> {
    let service = open_desk(None)?;
    let estimate = service.lookup_price(&args.address);
    println!(
        "{} -> {} ({})",
        args.address.trim(),
        manwon_label(to_manwon(estimate.price)),
        estimate.source_label
    );
    Ok(())
}

pub(crate) fn run_registry_summary(args: RegistrySummaryArgs) -> Result<(), AppError> {
    let bytes = std::fs::read(&args.file)?;
    let service = open_desk(None)?;
    let summary = service.summarize_document(&bytes);

    if args.json {
        print_json(&summary);
    } else {
        render_registry_summary(&summary);
    }
    Ok(())
}

pub(crate) fn run_admin(args: AdminArgs) -> Result<(), AppError> {
    let service = open_desk(args.data_dir)?;

    match args.command {
        AdminCommand::Lenders {
            command: LenderCommand::List,
        } => render_lenders(&service.lenders()),
        AdminCommand::Lenders {
            command: LenderCommand::Add(lender),
        } => {
            let lender = Lender {
                id: LenderId(lender.id.trim().to_string()),
                display_name: lender.name,
                ltv_max: lender.ltv,
                rate_min: lender.rate_min,
                rate_max: lender.rate_max,
            };
            let mut lenders = service.lenders();
            match lenders.iter_mut().find(|existing| existing.id == lender.id) {
                Some(existing) => *existing = lender,
                None => lenders.push(lender),
            }
            let table = service.replace_lenders(lenders)?;
            render_lenders(table.lenders());
        }
        AdminCommand::Regions {
            command: RegionCommand::List,
        } => render_regions(&service.regions()),
        AdminCommand::Regions {
            command: RegionCommand::Add(region),
        } => {
            let region = DeductionRegion {
                region_key: region.key.trim().to_string(),
                deduction_amount: region.amount,
            };
            let mut regions = service.regions();
            match regions
                .iter_mut()
                .find(|existing| existing.region_key == region.region_key)
            {
                Some(existing) => *existing = region,
                None => regions.push(region),
            }
            let table = service.replace_regions(regions)?;
            render_regions(table.regions());
        }
        AdminCommand::Clients {
            command: ClientCommand::List,
        } => {
            let clients = service.clients()?;
            if clients.is_empty() {
                println!("No clients registered");
            }
            for client in clients {
                println!(
                    "#{} {} | {} | 시세 {} | 기존 {} | {}점 | {} | {}",
                    client.id,
                    client.name,
                    client.property_address,
                    manwon_label(to_manwon(client.kb_price)),
                    manwon_label(to_manwon(client.existing_loan)),
                    client.credit_score,
                    client.loan_structure.label(),
                    client.registered_on
                );
                if let Some(memo) = client.memo {
                    println!("    memo: {memo}");
                }
            }
        }
        AdminCommand::Clients {
            command: ClientCommand::Add(client),
        } => {
            let record = service.register_client(
                ClientSubmission {
                    name: client.name,
                    property_address: client.address,
                    kb_price: client.kb_price,
                    existing_loan: client.existing_loan,
                    credit_score: client.score,
                    loan_structure: client.structure,
                    memo: client.memo,
                },
                Local::now().date_naive(),
            )?;
            println!(
                "Registered client #{} {} (시세 {})",
                record.id,
                record.name,
                manwon_label(to_manwon(record.kb_price))
            );
        }
    }

    Ok(())
}

fn render_quote(quote: &Quote, show_excluded: bool) {
    let sheet = QuoteSheet::new(&quote.request, &quote.assessment);
    let summary = &sheet.summary;

    println!("Mortgage desk quote ({})", summary.structure_label);
    println!(
        "- 시세 {} | 기존 대출 {} | 신용점수 {}",
        summary.property_value_label, summary.existing_loan_label, summary.credit_score_label
    );
    if let Some(estimate) = &quote.price_estimate {
        println!("- 시세 출처: {}", estimate.source_label);
    }
    if quote.request.trust_or_mci_exempt {
        println!("- 신탁/MCI 적용: 방공제 없음");
    } else {
        println!("- 지역: {}", quote.request.region_key);
    }

    if sheet.rows.is_empty() {
        println!("\nNo partner lender clears the existing balance for this request");
    } else {
        println!();
        for (index, row) in sheet.rows.iter().enumerate() {
            println!("{}", offer_line(index + 1, row));
        }
    }

    if let Some(best) = &sheet.best {
        println!(
            "\nBest offer: {} | 신규 현금 {} at {}%",
            best.display_name,
            manwon_label(best.net_new_cash_manwon),
            best.estimated_rate
        );
    }

    if show_excluded && !quote.assessment.excluded.is_empty() {
        println!("\nExcluded lenders:");
        for excluded in &quote.assessment.excluded {
            println!(
                "  - {}: {}",
                excluded.display_name,
                manwon_label(to_manwon(excluded.net_new_cash))
            );
        }
    }
}

fn offer_line(rank: usize, row: &OfferRow) -> String {
    format!(
        "{rank:>2}. {} | LTV {} | 예상금리 {}% ({}) | 한도 {} | 신규 현금 {}",
        row.display_name,
        row.ltv_label,
        row.estimated_rate,
        row.rate_range,
        manwon_label(row.total_limit_manwon),
        manwon_label(row.net_new_cash_manwon)
    )
}

fn render_registry_summary(summary: &RegistrySummary) {
    println!("Registry summary");
    println!("- 주소: {}", summary.address);
    if summary.owners.is_empty() {
        println!("- 소유자: 확인 불가");
    } else {
        let owners: Vec<&str> = summary.owners.iter().map(String::as_str).collect();
        println!("- 소유자: {}", owners.join(", "));
    }
    if summary.liens.is_empty() {
        println!("- 채권최고액: 없음");
    } else {
        for (index, lien) in summary.liens.iter().enumerate() {
            println!(
                "  {}. 채권최고액 {}",
                index + 1,
                lien_label(*lien)
            );
        }
        println!(
            "- 합계: {}",
            lien_label(summary.total_lien_exposure())
        );
    }
}

fn lien_label(won: u128) -> String {
    i64::try_from(won / 10_000)
        .map(manwon_label)
        .unwrap_or_else(|_| format!("{won}원"))
}

fn render_lenders(lenders: &[Lender]) {
    for lender in lenders {
        println!(
            "{} ({}) | LTV {} | 금리 {}",
            lender.id,
            lender.display_name,
            lender.ltv_max.normalize(),
            lender.rate_range()
        );
    }
}

fn render_regions(regions: &[DeductionRegion]) {
    for region in regions {
        println!(
            "{} | 방공제 {}",
            region.region_key,
            manwon_label(to_manwon(region.deduction_amount))
        );
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("JSON output unavailable: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortgage_desk::lending::{LoanCapacityCalculator, LoanRequest};
    use rust_decimal::Decimal;

    #[test]
    fn offer_lines_read_in_manwon() {
        let request = LoanRequest {
            property_value: Decimal::new(1_360_000_000, 0),
            existing_loan_balance: Decimal::new(877_000_000, 0),
            loan_structure: LoanStructure::Refinance,
            region_key: "그외".to_string(),
            trust_or_mci_exempt: true,
            credit_score: 850,
            senior_bond_ratio: Decimal::new(12, 1),
        };
        let assessment = LoanCapacityCalculator::standard().assess(&request);
        let sheet = QuoteSheet::new(&request, &assessment);

        assert_eq!(
            offer_line(1, &sheet.rows[0]),
            " 1. OK저축 | LTV 90% | 예상금리 8.25% (7.5~9.5%) | 한도 122,400만원 | 신규 현금 34,700만원"
        );
    }

    #[test]
    fn lien_labels_fall_back_to_won_beyond_i64() {
        assert_eq!(lien_label(800_000_000), "80,000만원");
        assert_eq!(lien_label(u128::MAX), format!("{}원", u128::MAX));
    }
}
