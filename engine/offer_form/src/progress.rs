//! # Progress
//!
//! Two derived views over a [`FormState`], recomputed on every read:
//!
//! - [`calculate_progress`]: a weighted completion count whose denominator
//!   grows with the number of buyers.
//! - [`section_status`]: a per-section classification for the stepper.
//!
//! ## Weights
//!
//! | Unit group                  | Units | Satisfied when                                  |
//! |-----------------------------|-------|-------------------------------------------------|
//! | agent, property, price      | 3     | each field filled                               |
//! | solicitor                   | 1     | "to be advised", or email and phone             |
//! | each individual buyer       | 2 + 4 | first name, surname; email, phone, address, signature |
//! | each entity buyer           | 3 + 4 | entity name, ABN, ACN; email, phone, address, signature |
//!
//! The section thresholds are UX heuristics and are kept as named constants.

use serde::{Deserialize, Serialize};

use crate::buyers::Buyer;
use crate::types::{FormFeatures, FormState, TextField};

/// Units that exist regardless of the buyers: agent, property, price.
pub const BASE_UNITS: u32 = 3;
/// The solicitor group counts as a single disjunctive unit.
pub const SOLICITOR_UNITS: u32 = 1;
/// Email, phone, address and signature, for every buyer.
pub const BUYER_SHARED_UNITS: u32 = 4;
/// Filled condition dates needed before the conditions step reads complete.
pub const CONDITIONS_COMPLETE_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub completed: u32,
    pub total: u32,
    pub percentage: u32,
}

/// Stepper sections, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Agent,
    Property,
    Buyer,
    Solicitor,
    Price,
    Conditions,
    Signature,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Agent,
        Section::Property,
        Section::Buyer,
        Section::Solicitor,
        Section::Price,
        Section::Conditions,
        Section::Signature,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Agent => "Agent",
            Self::Property => "Property",
            Self::Buyer => "Buyer",
            Self::Solicitor => "Solicitor",
            Self::Price => "Price",
            Self::Conditions => "Conditions",
            Self::Signature => "Sign",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionStatus {
    Empty,
    Partial,
    Complete,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionProgress {
    pub section: Section,
    pub label: &'static str,
    pub status: SectionStatus,
}

// ─────────────────────────────────────────────────────────
// Weighted completion
// ─────────────────────────────────────────────────────────

pub fn calculate_progress(state: &FormState) -> ProgressSnapshot {
    let mut completed = 0u32;
    let mut total = BASE_UNITS + SOLICITOR_UNITS;

    for field in [
        TextField::AgentName,
        TextField::PropertyAddress,
        TextField::PurchasePrice,
    ] {
        completed += u32::from(state.is_filled(field));
    }

    completed += u32::from(solicitor_satisfied(state));

    for buyer in &state.buyers {
        let (done, units) = buyer_units(buyer);
        completed += done;
        total += units;
    }

    ProgressSnapshot {
        completed,
        total,
        percentage: percentage(completed, total),
    }
}

/// `(completed, total)` units contributed by one buyer.
fn buyer_units(buyer: &Buyer) -> (u32, u32) {
    let names = buyer.name_fields();
    let mut done = names.iter().filter(|f| buyer.is_filled(**f)).count() as u32;
    done += Buyer::contact_fields()
        .iter()
        .filter(|f| buyer.is_filled(**f))
        .count() as u32;
    done += u32::from(buyer.has_signature());
    (done, names.len() as u32 + BUYER_SHARED_UNITS)
}

fn percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) * 100.0 / f64::from(total)).round() as u32
}

fn solicitor_satisfied(state: &FormState) -> bool {
    state.solicitor.to_be_advised
        || (state.is_filled(TextField::SolicitorEmail) && state.is_filled(TextField::SolicitorPhone))
}

// ─────────────────────────────────────────────────────────
// Section status
// ─────────────────────────────────────────────────────────

pub fn section_status(state: &FormState, section: Section, features: &FormFeatures) -> SectionStatus {
    match section {
        Section::Agent => fields_status(state, &[TextField::AgentName]),
        Section::Property => fields_status(state, &[TextField::PropertyAddress]),
        Section::Buyer => buyer_status(state),
        Section::Solicitor => solicitor_status(state),
        Section::Price => price_status(state, features),
        Section::Conditions => conditions_status(state, features),
        Section::Signature => signature_status(state),
    }
}

/// Every section with its status, in stepper order.
pub fn section_statuses(state: &FormState, features: &FormFeatures) -> Vec<SectionProgress> {
    Section::ALL
        .iter()
        .map(|&section| SectionProgress {
            section,
            label: section.label(),
            status: section_status(state, section, features),
        })
        .collect()
}

/// Generic rule: all filled -> complete, some -> partial, none -> empty.
/// A section with no required fields is optional.
fn fields_status(state: &FormState, fields: &[TextField]) -> SectionStatus {
    if fields.is_empty() {
        return SectionStatus::Optional;
    }
    let filled = fields.iter().filter(|f| state.is_filled(**f)).count();
    ratio_status(filled, fields.len())
}

fn ratio_status(satisfied: usize, total: usize) -> SectionStatus {
    if total > 0 && satisfied == total {
        SectionStatus::Complete
    } else if satisfied > 0 {
        SectionStatus::Partial
    } else {
        SectionStatus::Empty
    }
}

fn buyer_status(state: &FormState) -> SectionStatus {
    let complete = state
        .buyers
        .iter()
        .filter(|b| b.has_name() && b.has_contact())
        .count();
    ratio_status(complete, state.buyers.len())
}

fn signature_status(state: &FormState) -> SectionStatus {
    let signed = state.buyers.iter().filter(|b| b.has_signature()).count();
    ratio_status(signed, state.buyers.len())
}

fn price_status(state: &FormState, features: &FormFeatures) -> SectionStatus {
    if features.show_deposits {
        fields_status(
            state,
            &[
                TextField::PurchasePrice,
                TextField::InitialDeposit,
                TextField::BalanceDeposit,
            ],
        )
    } else {
        fields_status(state, &[TextField::PurchasePrice])
    }
}

/// Condition dates in play: finance and inspection follow their feature
/// switches, settlement is always asked for.
pub fn condition_fields(features: &FormFeatures) -> Vec<TextField> {
    let mut fields = Vec::with_capacity(3);
    if features.show_finance {
        fields.push(TextField::FinanceDate);
    }
    if features.show_building_pest {
        fields.push(TextField::InspectionDate);
    }
    fields.push(TextField::SettlementDate);
    fields
}

fn conditions_status(state: &FormState, features: &FormFeatures) -> SectionStatus {
    let fields = condition_fields(features);
    let filled = fields.iter().filter(|f| state.is_filled(**f)).count();
    let threshold = CONDITIONS_COMPLETE_THRESHOLD.min(fields.len());
    if !fields.is_empty() && filled >= threshold {
        SectionStatus::Complete
    } else if filled > 0 {
        SectionStatus::Partial
    } else {
        SectionStatus::Optional
    }
}

fn solicitor_status(state: &FormState) -> SectionStatus {
    if state.solicitor.to_be_advised {
        return SectionStatus::Complete;
    }
    let filled = [TextField::SolicitorEmail, TextField::SolicitorPhone]
        .iter()
        .filter(|f| state.is_filled(**f))
        .count();
    ratio_status(filled, 2)
}
