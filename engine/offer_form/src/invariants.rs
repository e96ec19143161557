#![allow(dead_code)]

//! Assertions shared by the scenario tests. Each one panics with a message
//! naming the broken property.

use crate::buyers::Buyer;
use crate::progress::{calculate_progress, BASE_UNITS, BUYER_SHARED_UNITS, SOLICITOR_UNITS};
use crate::raster::{rasterize, CanvasSize};
use crate::store::FormStore;
use crate::stroke::Signature;
use crate::types::{FormFeatures, FormState};
use crate::validation::validate;

/// The buyer list is never empty.
pub fn assert_has_buyer(state: &FormState) {
    assert!(!state.buyers.is_empty(), "form has no buyers");
}

/// One signature pad per buyer, and the active buyer points at one of them.
pub fn assert_pads_track_buyers(store: &FormStore) {
    let buyers = store.state().buyers.len();
    assert_eq!(
        store.pad_count(),
        buyers,
        "{} pads for {} buyers",
        store.pad_count(),
        buyers
    );
    assert!(
        store.active_buyer() < buyers,
        "active buyer {} out of range for {} buyers",
        store.active_buyer(),
        buyers
    );
}

/// The progress denominator is the fixed units plus each buyer's units.
pub fn assert_progress_total(state: &FormState) {
    let expected = BASE_UNITS
        + SOLICITOR_UNITS
        + state
            .buyers
            .iter()
            .map(|b: &Buyer| b.name_fields().len() as u32 + BUYER_SHARED_UNITS)
            .sum::<u32>();
    let progress = calculate_progress(state);
    assert_eq!(progress.total, expected, "progress total drifted");
    assert!(
        progress.completed <= progress.total,
        "completed {} exceeds total {}",
        progress.completed,
        progress.total
    );
    assert!(progress.percentage <= 100, "percentage above 100");
}

/// Validation is a pure read.
pub fn assert_validation_stable(state: &FormState, features: &FormFeatures) {
    let before = state.clone();
    let first = validate(state, features);
    let second = validate(state, features);
    assert_eq!(first, second, "validation is not idempotent");
    assert_eq!(*state, before, "validation mutated the form");
}

/// The stored export is exactly what replaying the strokes would produce.
pub fn assert_export_matches_strokes(signature: &Signature, size: CanvasSize) {
    if signature.strokes.is_empty() {
        assert!(signature.export.is_none(), "export kept after last stroke went");
        return;
    }
    let expected = rasterize(&signature.strokes, size).to_data_uri();
    assert_eq!(
        signature.export.as_deref(),
        Some(expected.as_str()),
        "export does not match replayed strokes"
    );
}

/// Every property above, for a store mid-session.
pub fn assert_store_consistent(store: &FormStore, features: &FormFeatures, size: CanvasSize) {
    assert_has_buyer(store.state());
    assert_pads_track_buyers(store);
    assert_progress_total(store.state());
    assert_validation_stable(store.state(), features);
    for buyer in &store.state().buyers {
        assert_export_matches_strokes(&buyer.signature, size);
    }
}
