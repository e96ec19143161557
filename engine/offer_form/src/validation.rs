//! Field-level validation of a [`FormState`].
//!
//! `validate` is pure: the same state and features always produce the same
//! mapping, and an empty mapping means the offer can be submitted.

use std::collections::BTreeMap;

use crate::buyers::{buyer_error_key, Buyer};
use crate::types::{FormFeatures, FormState, TextField};

/// Field key -> human-readable message. Ordered, so two runs over the same
/// state compare equal.
pub type ValidationErrors = BTreeMap<String, String>;

/// Always-required top-level fields and their messages.
const REQUIRED: &[(TextField, &str)] = &[
    (TextField::AgentName, "Selling Agent is required"),
    (TextField::PropertyAddress, "Property Address is required"),
    (TextField::PurchasePrice, "Purchase Price is required"),
];

const DEPOSITS: &[(TextField, &str)] = &[
    (TextField::InitialDeposit, "Initial Deposit is required"),
    (TextField::BalanceDeposit, "Balance Deposit is required"),
];

const SOLICITOR_CONTACT: &[(TextField, &str)] = &[
    (TextField::SolicitorEmail, "Solicitor Email is required"),
    (TextField::SolicitorPhone, "Solicitor Phone is required"),
];

pub fn validate(state: &FormState, features: &FormFeatures) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    require_all(state, REQUIRED, &mut errors);
    if features.show_deposits {
        require_all(state, DEPOSITS, &mut errors);
    }
    if !state.solicitor.to_be_advised {
        require_all(state, SOLICITOR_CONTACT, &mut errors);
    }

    for (index, buyer) in state.buyers.iter().enumerate() {
        validate_buyer(index, buyer, &mut errors);
    }

    errors
}

fn require_all(state: &FormState, rules: &[(TextField, &str)], errors: &mut ValidationErrors) {
    for (field, message) in rules {
        if !state.is_filled(*field) {
            errors.insert(field.key().to_string(), (*message).to_string());
        }
    }
}

fn validate_buyer(index: usize, buyer: &Buyer, errors: &mut ValidationErrors) {
    let ordinal = index + 1;
    for field in buyer.name_fields().iter().chain(Buyer::contact_fields()) {
        if !buyer.is_filled(*field) {
            errors.insert(
                buyer_error_key(index, field.as_str()),
                format!("Buyer {ordinal} {} is required", field.label()),
            );
        }
    }
    if !buyer.has_signature() {
        errors.insert(
            buyer_error_key(index, "signature"),
            format!("Buyer {ordinal} Signature is required"),
        );
    }
}
