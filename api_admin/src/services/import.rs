use common::error::{AppError, Res};
use db::dtos::voucher::VoucherImportRequest;
use serde::Serialize;
use thiserror::Error;

use crate::state::AdminState;

const CODE_COLUMN: &str = "username";

#[derive(Error, Debug, PartialEq)]
pub enum ImportError {
    #[error("CSV must contain a 'Username' column.")]
    MissingUsernameColumn,

    #[error("CSV must contain a header row and at least one voucher row.")]
    EmptyFile,

    #[error("No voucher codes found in the 'Username' column of the file.")]
    NoVoucherCodes,

    #[error("The selected WIFI plan '{0}' is not valid.")]
    UnknownPlan(String),
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub plan_id: String,
    pub plan_name: String,
    pub inserted: u64,
}

fn cells(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().replace('"', ""))
        .collect()
}

/// Pulls voucher codes out of a hotspot user export.
///
/// Lines are split on commas without any quoting rules, and quotes are
/// stripped from every cell. Blank lines are skipped, as are rows whose
/// `Username` cell is empty or missing. A leading byte-order mark is ignored.
pub fn parse_voucher_codes(csv: &str) -> Result<Vec<String>, ImportError> {
    let csv = csv.strip_prefix('\u{feff}').unwrap_or(csv);
    let lines: Vec<&str> = csv.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(ImportError::EmptyFile);
    }

    let column = cells(lines[0])
        .iter()
        .position(|header| header.eq_ignore_ascii_case(CODE_COLUMN))
        .ok_or(ImportError::MissingUsernameColumn)?;

    let codes: Vec<String> = lines[1..]
        .iter()
        .filter_map(|line| cells(line).into_iter().nth(column))
        .filter(|code| !code.is_empty())
        .collect();

    if codes.is_empty() {
        return Err(ImportError::NoVoucherCodes);
    }
    Ok(codes)
}

/// Adds the codes in `csv` as unused vouchers of `plan_id`.
///
/// Nothing is written unless the whole file parses.
pub async fn import_vouchers(state: &AdminState, plan_id: &str, csv: &str) -> Res<ImportSummary> {
    let plan = state
        .catalog
        .find(plan_id)
        .ok_or_else(|| ImportError::UnknownPlan(plan_id.to_string()))?;

    let codes = parse_voucher_codes(csv)?;

    let inserted = state
        .store
        .import_vouchers(VoucherImportRequest {
            plan_id: plan.id.clone(),
            codes,
        })
        .await?;

    state.cache.invalidate(&plan.id);
    log::info!("Imported {} vouchers into plan {}", inserted, plan.id);

    Ok(ImportSummary {
        plan_id: plan.id.clone(),
        plan_name: plan.name.clone(),
        inserted,
    })
}
