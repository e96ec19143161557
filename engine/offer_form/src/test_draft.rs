use chrono::NaiveDate;

use crate::draft::DRAFT_MAX_AGE_MS;
use crate::raster::CanvasSize;
use crate::{
    encode_draft, restore_draft, Agent, BuyerField, FormCommand, FormState, FormStore, PadEvent,
    PointerSample, Prefill,
};

const NOW: i64 = 1_780_000_000_000;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

fn base() -> FormState {
    FormState::new(today())
}

fn edited_store() -> FormStore {
    let mut store = FormStore::new(today(), CanvasSize::default());
    for command in [
        FormCommand::SelectAgent {
            agent: Agent {
                name: "General Office".into(),
                ..Agent::default()
            },
        },
        FormCommand::AddBuyer,
        FormCommand::UpdateBuyer {
            index: 1,
            field: BuyerField::EntityName,
            value: "Silva Holdings".into(),
        },
        FormCommand::ToggleEntity { index: 1 },
        FormCommand::Pen {
            buyer: 0,
            event: PadEvent::Down(PointerSample::mouse(20.0, 20.0)),
            bounds: Default::default(),
        },
        FormCommand::Pen {
            buyer: 0,
            event: PadEvent::Move(PointerSample::mouse(120.0, 60.0)),
            bounds: Default::default(),
        },
        FormCommand::Pen {
            buyer: 0,
            event: PadEvent::Up,
            bounds: Default::default(),
        },
    ] {
        store.apply(command, today()).unwrap();
    }
    store
}

#[test]
fn test_fresh_draft_round_trips_through_restore() {
    let store = edited_store();
    let raw = encode_draft(store.state(), NOW - 60_000).unwrap();
    let restored = restore_draft(&raw, &base(), NOW, DRAFT_MAX_AGE_MS).expect("draft kept");
    assert_eq!(restored, *store.state());
    assert!(restored.buyers.get(1).unwrap().is_entity);
    assert!(restored.buyers.get(0).unwrap().has_signature());
}

#[test]
fn test_draft_at_max_age_is_ignored() {
    let raw = encode_draft(edited_store().state(), NOW - DRAFT_MAX_AGE_MS).unwrap();
    assert!(restore_draft(&raw, &base(), NOW, DRAFT_MAX_AGE_MS).is_none());

    let raw = encode_draft(edited_store().state(), NOW - DRAFT_MAX_AGE_MS + 1).unwrap();
    assert!(restore_draft(&raw, &base(), NOW, DRAFT_MAX_AGE_MS).is_some());
}

#[test]
fn test_corrupt_drafts_are_discarded() {
    let corrupt = vec![
        String::new(),
        "not json".to_string(),
        r#"{"timestamp":"yesterday"}"#.to_string(),
        format!(r#"{{"buyers":[],"timestamp":{NOW}}}"#),
        format!(r#"{{"buyers":"one","timestamp":{NOW}}}"#),
        format!(r#"{{"propertyAddress":"x","timestamp":{}}}"#, i64::MIN),
    ];
    for raw in &corrupt {
        assert!(
            restore_draft(raw, &base(), NOW, DRAFT_MAX_AGE_MS).is_none(),
            "accepted {raw:?}"
        );
    }
}

#[test]
fn test_restored_state_drives_a_working_store() {
    let raw = encode_draft(edited_store().state(), NOW).unwrap();
    let restored = restore_draft(&raw, &base(), NOW, DRAFT_MAX_AGE_MS).unwrap();
    let mut store = FormStore::from_state(restored, CanvasSize::default());
    assert_eq!(store.pad_count(), 2);
    assert!(!store.pad(0).unwrap().canvas().is_blank());

    store
        .apply(FormCommand::UndoSignature { buyer: 0 }, today())
        .unwrap();
    assert!(!store.state().buyers.get(0).unwrap().has_signature());
}

#[test]
fn test_prefill_lands_on_top_of_defaults() {
    let prefill: Prefill = serde_json::from_str(
        r#"{"agentName":"Hayley Jones","propertyAddress":"9 Ocean St","logoUrl":"/logo.png"}"#,
    )
    .unwrap();
    assert!(prefill.is_active());

    let mut state = base();
    state.apply_prefill(&prefill, None);
    assert_eq!(state.agent.name, "Hayley Jones");
    assert_eq!(state.property_address, "9 Ocean St");
    assert_eq!(prefill.branding().logo_url.as_deref(), Some("/logo.png"));
}
