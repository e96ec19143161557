//! Engine-wide error types.
//!
//! Validation failures are not errors in this sense: they are data, returned
//! as a [`crate::ValidationErrors`] mapping. `FormError` covers the mutations
//! the store refuses outright, plus serialization of drafts.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    /// A mutation would break a structural rule of the form, e.g. removing
    /// the only buyer. Nothing is mutated when this is returned.
    #[error("{0}")]
    InvariantViolation(String),

    #[error("buyer {index} does not exist (form has {len} buyers)")]
    BuyerOutOfRange { index: usize, len: usize },

    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FormError>;
