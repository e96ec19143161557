//! # Offer Form Engine
//!
//! State and interaction rules for a property purchase offer: who is buying,
//! what they pay, the conditions they attach, and each buyer's hand-drawn
//! signature. The crate has no I/O; callers inject today's date and the
//! clock, and own persistence and timers.
//!
//! | Concern            | Entry point(s)                                          |
//! |--------------------|---------------------------------------------------------|
//! | Mutation           | [`FormStore::apply`] with a [`FormCommand`]             |
//! | Signature capture  | [`SignaturePad`], driven by [`FormCommand::Pen`]        |
//! | Validation         | [`validate`]                                            |
//! | Progress           | [`calculate_progress`], [`section_status`]              |
//! | Drafts             | [`encode_draft`], [`restore_draft`]                     |
//! | Prefill            | [`FormState::apply_prefill`]                            |
//! | Submission         | [`build_submission`]                                    |
//!
//! ## Architecture
//!
//! [`FormState`] is plain serializable data. [`FormStore`] wraps it with the
//! interaction state that must not be persisted (signature canvases, focus,
//! shown errors) and is the only writer. Progress and validation are pure
//! functions of the state and are recomputed on every read.

pub mod buyers;
pub mod capture;
pub mod draft;
pub mod error;
pub mod money;
pub mod prefill;
pub mod progress;
pub mod raster;
pub mod store;
pub mod stroke;
pub mod submission;
pub mod types;
pub mod validation;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_draft;
#[cfg(test)]
mod test_scenarios;
#[cfg(test)]
mod test_signature;

pub use buyers::{Buyer, BuyerCollection, BuyerField};
pub use capture::{Bounds, PadEvent, PointerSample, SignaturePad, SignatureUpdate};
pub use draft::{decode_draft, encode_draft, restore_draft, DraftSnapshot};
pub use error::{FormError, Result};
pub use prefill::{Branding, Prefill};
pub use progress::{
    calculate_progress, section_status, section_statuses, ProgressSnapshot, Section,
    SectionProgress, SectionStatus,
};
pub use raster::{Canvas, CanvasSize};
pub use store::{Applied, FormCommand, FormStore};
pub use stroke::{Point, Signature, Stroke};
pub use submission::{build_submission, SubmissionPayload};
pub use types::{
    Agent, Conditions, CoolingOffPeriod, DepositPercent, FlagField, FormFeatures, FormState,
    Price, Solicitor, TextField,
};
pub use validation::{validate, ValidationErrors};
