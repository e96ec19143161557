use chrono::NaiveDate;

use crate::invariants::assert_export_matches_strokes;
use crate::raster::{rasterize, CanvasSize, DATA_URI_PREFIX};
use crate::{
    Bounds, FormCommand, FormState, FormStore, PadEvent, PointerSample, SignatureUpdate, Stroke,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()
}

fn size() -> CanvasSize {
    CanvasSize {
        width: 96,
        height: 48,
    }
}

fn setup() -> FormStore {
    FormStore::new(today(), size())
}

/// Draw one stroke through `points` on `buyer`'s pad, returning the update
/// reported when the pointer lifts.
fn draw(store: &mut FormStore, buyer: usize, points: &[(f32, f32)]) -> Option<SignatureUpdate> {
    let bounds = Bounds {
        left: 100.0,
        top: 200.0,
    };
    let mut events = Vec::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        let sample = PointerSample::mouse(x + bounds.left, y + bounds.top);
        events.push(if i == 0 {
            PadEvent::Down(sample)
        } else {
            PadEvent::Move(sample)
        });
    }
    events.push(PadEvent::Up);

    let mut last = None;
    for event in events {
        let applied = store
            .apply(
                FormCommand::Pen {
                    buyer,
                    event,
                    bounds,
                },
                today(),
            )
            .unwrap();
        last = applied.signature;
    }
    last
}

fn export_of(store: &FormStore, buyer: usize) -> Option<String> {
    store.state().buyers.get(buyer).unwrap().signature.export.clone()
}

const FIRST: &[(f32, f32)] = &[(5.0, 5.0), (30.0, 12.0), (60.0, 30.0)];
const SECOND: &[(f32, f32)] = &[(10.0, 40.0), (80.0, 8.0)];
const THIRD: &[(f32, f32)] = &[(85.0, 40.0)];

#[test]
fn test_pointer_up_exports_the_signature() {
    let mut store = setup();
    let update = draw(&mut store, 0, FIRST).expect("stroke committed");
    let SignatureUpdate::Exported(uri) = update else {
        panic!("expected an export");
    };
    assert!(uri.starts_with(DATA_URI_PREFIX));
    assert_eq!(export_of(&store, 0).as_deref(), Some(uri.as_str()));
    assert!(store.state().buyers.get(0).unwrap().has_signature());
}

#[test]
fn test_undo_restores_the_export_of_the_earlier_strokes() {
    let mut reference = setup();
    draw(&mut reference, 0, FIRST);
    draw(&mut reference, 0, SECOND);
    let expected = export_of(&reference, 0);

    let mut store = setup();
    draw(&mut store, 0, FIRST);
    draw(&mut store, 0, SECOND);
    draw(&mut store, 0, THIRD);
    assert_ne!(export_of(&store, 0), expected);

    let applied = store
        .apply(FormCommand::UndoSignature { buyer: 0 }, today())
        .unwrap();
    assert!(applied.changed);
    assert_eq!(export_of(&store, 0), expected);
    assert_eq!(store.pad(0).unwrap().canvas(), reference.pad(0).unwrap().canvas());
}

#[test]
fn test_undoing_the_only_stroke_clears_the_signature() {
    let mut store = setup();
    draw(&mut store, 0, FIRST);
    let applied = store
        .apply(FormCommand::UndoSignature { buyer: 0 }, today())
        .unwrap();
    assert_eq!(applied.signature, Some(SignatureUpdate::Cleared));
    assert_eq!(export_of(&store, 0), None);
    assert!(store.pad(0).unwrap().canvas().is_blank());

    let again = store
        .apply(FormCommand::UndoSignature { buyer: 0 }, today())
        .unwrap();
    assert!(!again.changed);
    assert_eq!(again.signature, None);
}

#[test]
fn test_tap_commits_a_visible_dot() {
    let mut store = setup();
    draw(&mut store, 0, THIRD);
    let signature = &store.state().buyers.get(0).unwrap().signature;
    assert_eq!(signature.strokes.len(), 1);
    assert!(!store.pad(0).unwrap().canvas().is_blank());
    assert_export_matches_strokes(signature, size());
}

#[test]
fn test_incremental_capture_matches_replay() {
    let mut store = setup();
    draw(&mut store, 0, FIRST);
    draw(&mut store, 0, THIRD);
    draw(&mut store, 0, SECOND);
    let signature = &store.state().buyers.get(0).unwrap().signature;
    assert_eq!(*store.pad(0).unwrap().canvas(), rasterize(&signature.strokes, size()));
    assert_export_matches_strokes(signature, size());
}

#[test]
fn test_pads_are_independent_per_buyer() {
    let mut store = setup();
    store.add_buyer(today());
    draw(&mut store, 1, FIRST);
    assert_eq!(export_of(&store, 0), None);
    assert!(export_of(&store, 1).is_some());

    store
        .apply(FormCommand::ClearSignature { buyer: 1 }, today())
        .unwrap();
    assert_eq!(export_of(&store, 1), None);
    assert!(store.state().buyers.get(1).unwrap().signature.strokes.is_empty());
}

#[test]
fn test_removing_a_buyer_keeps_the_remaining_pads_aligned() {
    let mut store = setup();
    store.add_buyer(today());
    store.add_buyer(today());
    draw(&mut store, 2, SECOND);
    let kept = export_of(&store, 2);

    store.remove_buyer(1).unwrap();
    assert_eq!(export_of(&store, 1), kept);
    store
        .apply(FormCommand::UndoSignature { buyer: 1 }, today())
        .unwrap();
    assert_eq!(export_of(&store, 1), None);
    assert!(store.pad(1).unwrap().canvas().is_blank());
}

#[test]
fn test_restored_store_can_undo_persisted_strokes() {
    let mut store = setup();
    draw(&mut store, 0, FIRST);
    let one_stroke = export_of(&store, 0);
    draw(&mut store, 0, SECOND);

    let state: FormState = store.state().clone();
    let mut restored = FormStore::from_state(state, size());
    restored
        .apply(FormCommand::UndoSignature { buyer: 0 }, today())
        .unwrap();
    assert_eq!(export_of(&restored, 0), one_stroke);
}

#[test]
fn test_signature_persists_strokes_as_point_lists() {
    let mut store = setup();
    draw(&mut store, 0, SECOND);
    let json = serde_json::to_value(&store.state().buyers.get(0).unwrap().signature).unwrap();
    let strokes: Vec<Stroke> = serde_json::from_value(json["strokes"].clone()).unwrap();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].len(), SECOND.len());
    assert_eq!(strokes[0].points()[0].x, 10.0);
}
