//! Building the payload handed to the submission sink.
//!
//! The engine's job ends at a valid, error-free offer; what the sink does
//! with the payload (PDF, e-mail, webhook) is outside this crate. Signature
//! exports are passed through verbatim.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::money::{group_thousands, parse_amount};
use crate::types::{FormFeatures, FormState};
use crate::validation::{validate, ValidationErrors};

/// Characters of the property address kept in the PDF file name.
const FILENAME_ADDRESS_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    #[serde(flatten)]
    pub state: FormState,
    pub show_deposits: bool,
    pub show_finance: bool,
    pub show_building_pest: bool,
    /// Initial plus balance deposit, formatted; blank when deposits are hidden.
    pub total_deposit: String,
    pub submitted_at: String,
    pub pdf_filename: String,
}

/// Validate and, if clean, produce the submission payload. Fields of hidden
/// sections are blanked so the sink never sees stale values.
pub fn build_submission(
    state: &FormState,
    features: &FormFeatures,
    now: DateTime<Utc>,
) -> Result<SubmissionPayload, ValidationErrors> {
    let errors = validate(state, features);
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut gated = state.clone();
    let total_deposit = if features.show_deposits {
        let initial = parse_amount(&state.price.initial_deposit).unwrap_or(0);
        let balance = parse_amount(&state.price.balance_deposit).unwrap_or(0);
        group_thousands(initial + balance)
    } else {
        gated.price.initial_deposit.clear();
        gated.price.balance_deposit.clear();
        gated.price.balance_deposit_terms.clear();
        String::new()
    };
    if !features.show_building_pest {
        gated.conditions.inspection_date.clear();
    }
    if !features.show_finance {
        gated.conditions.finance_date.clear();
        gated.conditions.finance_pre_approved = false;
    }

    Ok(SubmissionPayload {
        pdf_filename: pdf_filename(&state.property_address, now),
        state: gated,
        show_deposits: features.show_deposits,
        show_finance: features.show_finance,
        show_building_pest: features.show_building_pest,
        total_deposit,
        submitted_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// `Offer_<address>_<date>.pdf`, address reduced to `[A-Za-z0-9_]`.
pub fn pdf_filename(address: &str, now: DateTime<Utc>) -> String {
    let slug: String = address
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(FILENAME_ADDRESS_CHARS)
        .collect();
    format!("Offer_{slug}_{}.pdf", now.format("%Y-%m-%d"))
}
