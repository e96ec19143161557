use chrono::NaiveDate;

use crate::invariants::{assert_pads_track_buyers, assert_progress_total, assert_store_consistent};
use crate::{
    calculate_progress, section_status, validate, Agent, BuyerField, DepositPercent, FlagField,
    FormCommand, FormError, FormFeatures, FormStore, PadEvent, PointerSample, Section,
    SectionStatus, TextField,
};
use crate::raster::CanvasSize;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

fn size() -> CanvasSize {
    CanvasSize {
        width: 120,
        height: 40,
    }
}

fn setup() -> FormStore {
    FormStore::new(today(), size())
}

fn apply(store: &mut FormStore, command: FormCommand) {
    store.apply(command, today()).unwrap();
}

fn set_text(store: &mut FormStore, field: TextField, value: &str) {
    apply(
        store,
        FormCommand::SetText {
            field,
            value: value.into(),
        },
    );
}

fn set_buyer(store: &mut FormStore, index: usize, field: BuyerField, value: &str) {
    apply(
        store,
        FormCommand::UpdateBuyer {
            index,
            field,
            value: value.into(),
        },
    );
}

fn sign(store: &mut FormStore, buyer: usize) {
    for event in [
        PadEvent::Down(PointerSample::mouse(10.0, 10.0)),
        PadEvent::Move(PointerSample::mouse(40.0, 20.0)),
        PadEvent::Up,
    ] {
        apply(
            store,
            FormCommand::Pen {
                buyer,
                event,
                bounds: Default::default(),
            },
        );
    }
}

fn fill_individual(store: &mut FormStore, index: usize) {
    set_buyer(store, index, BuyerField::FirstName, "Ana");
    set_buyer(store, index, BuyerField::Surname, "Silva");
    set_buyer(store, index, BuyerField::Email, "ana@example.com");
    set_buyer(store, index, BuyerField::Phone, "0400 000 000");
    set_buyer(store, index, BuyerField::Address, "1 Main St, Dapto");
}

fn fill_top_level(store: &mut FormStore) {
    apply(
        store,
        FormCommand::SelectAgent {
            agent: Agent {
                name: "General Office".into(),
                ..Agent::default()
            },
        },
    );
    set_text(store, TextField::PropertyAddress, "12 Lake Pde, Dapto NSW 2530");
    set_text(store, TextField::PurchasePrice, "850000");
    apply(
        store,
        FormCommand::SetFlag {
            field: FlagField::SolicitorToBeAdvised,
            value: true,
        },
    );
}

#[test]
fn test_fresh_store_is_consistent() {
    let store = setup();
    assert_eq!(store.state().buyers.len(), 1);
    assert_eq!(store.active_buyer(), 0);
    assert_eq!(store.revision(), 0);
    assert_store_consistent(&store, &FormFeatures::default(), size());
}

#[test]
fn test_everything_but_signature_leaves_one_error() {
    let mut store = setup();
    fill_top_level(&mut store);
    fill_individual(&mut store, 0);

    let features = FormFeatures::default();
    let errors = validate(store.state(), &features);
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert_eq!(errors["buyer0_signature"], "Buyer 1 Signature is required");
    assert_eq!(
        section_status(store.state(), Section::Signature, &features),
        SectionStatus::Empty
    );

    sign(&mut store, 0);
    assert!(validate(store.state(), &features).is_empty());
    assert_eq!(
        section_status(store.state(), Section::Signature, &features),
        SectionStatus::Complete
    );
    assert_store_consistent(&store, &features, size());
}

#[test]
fn test_one_buyer_missing_phone_makes_buyer_section_partial() {
    let mut store = setup();
    fill_individual(&mut store, 0);
    store.add_buyer(today());
    fill_individual(&mut store, 1);
    set_buyer(&mut store, 1, BuyerField::Phone, "");

    assert_eq!(
        section_status(store.state(), Section::Buyer, &FormFeatures::default()),
        SectionStatus::Partial
    );
    assert_pads_track_buyers(&store);
}

#[test]
fn test_removing_the_last_buyer_is_rejected_without_side_effects() {
    let mut store = setup();
    set_buyer(&mut store, 0, BuyerField::FirstName, "Ana");
    let before = store.state().clone();
    let revision = store.revision();

    let err = store
        .apply(FormCommand::RemoveBuyer { index: 0 }, today())
        .unwrap_err();
    assert!(matches!(err, FormError::InvariantViolation(_)));
    assert_eq!(err.to_string(), "You must have at least one buyer.");
    assert_eq!(*store.state(), before);
    assert_eq!(store.revision(), revision);
    assert_pads_track_buyers(&store);
}

#[test]
fn test_remove_moves_focus_to_previous_buyer() {
    let mut store = setup();
    store.add_buyer(today());
    store.add_buyer(today());
    assert_eq!(store.active_buyer(), 2);

    assert_eq!(store.remove_buyer(2).unwrap(), 1);
    assert_eq!(store.active_buyer(), 1);
    assert_eq!(store.remove_buyer(0).unwrap(), 0);
    assert_eq!(store.active_buyer(), 0);
    assert_pads_track_buyers(&store);
}

#[test]
fn test_out_of_range_buyer_commands_are_rejected() {
    let mut store = setup();
    let err = store
        .apply(
            FormCommand::UpdateBuyer {
                index: 3,
                field: BuyerField::Email,
                value: "x@example.com".into(),
            },
            today(),
        )
        .unwrap_err();
    assert!(matches!(err, FormError::BuyerOutOfRange { index: 3, len: 1 }));
    assert!(store
        .apply(FormCommand::UndoSignature { buyer: 1 }, today())
        .is_err());
    assert!(store
        .apply(FormCommand::SetActiveBuyer { index: 1 }, today())
        .is_err());
    assert_eq!(store.revision(), 0);
}

#[test]
fn test_progress_total_tracks_buyer_variants() {
    let mut store = setup();
    assert_eq!(calculate_progress(store.state()).total, 10);

    store.add_buyer(today());
    apply(&mut store, FormCommand::ToggleEntity { index: 1 });
    assert_eq!(calculate_progress(store.state()).total, 10 + 3 + 4);
    assert_progress_total(store.state());

    apply(&mut store, FormCommand::ToggleEntity { index: 1 });
    assert_eq!(calculate_progress(store.state()).total, 10 + 2 + 4);
}

#[test]
fn test_double_toggle_keeps_fields_of_both_variants() {
    let mut store = setup();
    set_buyer(&mut store, 0, BuyerField::FirstName, "Ana");
    apply(&mut store, FormCommand::ToggleEntity { index: 0 });
    set_buyer(&mut store, 0, BuyerField::EntityName, "Silva Pty Ltd");
    let snapshot = store.state().buyers.get(0).unwrap().clone();

    apply(&mut store, FormCommand::ToggleEntity { index: 0 });
    apply(&mut store, FormCommand::ToggleEntity { index: 0 });
    assert_eq!(*store.state().buyers.get(0).unwrap(), snapshot);
    assert_eq!(store.state().buyers.get(0).unwrap().first_name, "Ana");
}

#[test]
fn test_price_entry_formats_and_derives_deposits() {
    let mut store = setup();
    set_text(&mut store, TextField::PurchasePrice, "850000");
    let price = &store.state().price;
    assert_eq!(price.purchase_price, "850,000");
    assert_eq!(price.initial_deposit, "2,125");
    assert_eq!(price.balance_deposit, "82,875");

    apply(
        &mut store,
        FormCommand::SetBalanceDepositPercent {
            percent: DepositPercent::Five,
        },
    );
    assert_eq!(store.state().price.balance_deposit, "40,375");
    assert_eq!(
        section_status(store.state(), Section::Price, &FormFeatures::default()),
        SectionStatus::Complete
    );
}

#[test]
fn test_zero_or_empty_price_reads_empty() {
    let features = FormFeatures::default();
    for input in ["$0", ""] {
        let mut store = setup();
        set_text(&mut store, TextField::PurchasePrice, input);
        assert_eq!(store.state().price.initial_deposit, "");
        assert_eq!(
            section_status(store.state(), Section::Price, &features),
            SectionStatus::Empty,
            "price {input:?}"
        );
        assert!(validate(store.state(), &features).contains_key("purchasePrice"));
    }
}

#[test]
fn test_solicitor_to_be_advised_clears_contact_details() {
    let mut store = setup();
    set_text(&mut store, TextField::SolicitorCompany, "Smith Legal");
    set_text(&mut store, TextField::SolicitorEmail, "law@example.com");
    apply(
        &mut store,
        FormCommand::SetFlag {
            field: FlagField::SolicitorToBeAdvised,
            value: true,
        },
    );
    let solicitor = &store.state().solicitor;
    assert!(solicitor.to_be_advised);
    assert_eq!(solicitor.company, "");
    assert_eq!(solicitor.email, "");
    assert!(!validate(store.state(), &FormFeatures::default()).contains_key("solicitorEmail"));
}

#[test]
fn test_editing_a_field_hides_its_shown_error() {
    let mut store = setup();
    store.record_errors(validate(store.state(), &FormFeatures::default()));
    assert!(store.shown_errors().contains_key("agentName"));
    assert!(store.shown_errors().contains_key("buyer0_email"));

    set_text(&mut store, TextField::PropertyAddress, "3 Station St");
    set_buyer(&mut store, 0, BuyerField::Email, "a@example.com");
    assert!(!store.shown_errors().contains_key("propertyAddress"));
    assert!(!store.shown_errors().contains_key("buyer0_email"));
    assert!(store.shown_errors().contains_key("agentName"));

    sign(&mut store, 0);
    assert!(!store.shown_errors().contains_key("buyer0_signature"));
}

#[test]
fn test_unchanged_values_do_not_advance_revision() {
    let mut store = setup();
    set_text(&mut store, TextField::PropertyAddress, "3 Station St");
    let revision = store.revision();
    let applied = store
        .apply(
            FormCommand::SetText {
                field: TextField::PropertyAddress,
                value: "3 Station St".into(),
            },
            today(),
        )
        .unwrap();
    assert!(!applied.changed);
    assert_eq!(store.revision(), revision);
}

#[test]
fn test_commands_deserialize_from_camel_case_json() {
    let raw = r#"[
        {"type":"updateBuyer","index":0,"field":"firstName","value":"Ana"},
        {"type":"setText","field":"propertyAddress","value":"7 Hill St"},
        {"type":"pen","buyer":0,"event":{"type":"down","clientX":5,"clientY":5}},
        {"type":"pen","buyer":0,"event":{"type":"move","touches":[{"clientX":25,"clientY":15}]}},
        {"type":"pen","buyer":0,"event":{"type":"leave"}},
        {"type":"setBalanceDepositPercent","percent":"5"}
    ]"#;
    let commands: Vec<FormCommand> = serde_json::from_str(raw).unwrap();
    let mut store = setup();
    for command in commands {
        apply(&mut store, command);
    }
    let state = store.state();
    assert_eq!(state.buyers.get(0).unwrap().first_name, "Ana");
    assert_eq!(state.property_address, "7 Hill St");
    assert_eq!(state.buyers.get(0).unwrap().signature.strokes.len(), 1);
    assert_eq!(state.price.balance_deposit_percent, DepositPercent::Five);
}

#[test]
fn test_clear_form_resets_everything() {
    let mut store = setup();
    fill_top_level(&mut store);
    store.add_buyer(today());
    sign(&mut store, 1);
    store.record_errors(validate(store.state(), &FormFeatures::default()));

    apply(&mut store, FormCommand::ClearForm);
    assert_eq!(*store.state(), crate::FormState::new(today()));
    assert_eq!(store.active_buyer(), 0);
    assert!(store.shown_errors().is_empty());
    assert!(store.pad(0).unwrap().canvas().is_blank());
    assert_store_consistent(&store, &FormFeatures::default(), size());
}
