use super::*;
use crate::palette::{HOVER_PALETTE, NORMAL_PALETTE};
use crate::surface::{Fragment, TextSurface};

const TEXT: &str = "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMN";

fn engine_over(text: &str) -> OverlayEngine<TextSurface> {
    OverlayEngine::new(TextSurface::from_text(text))
}

fn create_over(
    engine: &mut OverlayEngine<TextSurface>,
    start: usize,
    len: usize,
) -> AnnotationId {
    engine
        .surface_mut()
        .set_selection(Some(CharRange::new(start, len)));
    engine
        .create_from_selection(AnnotationKind::Claim)
        .expect("creation should succeed")
}

#[test]
fn creating_nested_annotations_composites_the_overlap() {
    let mut engine = engine_over(TEXT);

    let x = create_over(&mut engine, 10, 30);
    assert_eq!(engine.annotations().len(), 1);
    assert_eq!(engine.annotations()[0].id, x);
    assert_eq!(engine.annotations()[0].kind, AnnotationKind::Claim);
    assert!(!engine.annotations()[0].hover);
    assert_eq!(engine.regions().len(), 1);
    assert_eq!(engine.regions()[0].color, Some(NORMAL_PALETTE[0]));

    let y = create_over(&mut engine, 20, 10);
    let regions = engine.regions();
    assert_eq!(regions.len(), 3);
    assert_eq!(regions[0].range, CharRange::new(10, 10));
    assert_eq!(regions[0].ids, vec![x.clone()]);
    assert_eq!(regions[1].range, CharRange::new(20, 10));
    assert_eq!(regions[1].ids, vec![x.clone(), y.clone()]);
    assert_eq!(regions[2].range, CharRange::new(30, 10));

    // the overlap blends `y` on top of `x`, both unhovered
    let expected = NORMAL_PALETTE[1].over(NORMAL_PALETTE[0]);
    assert_eq!(regions[1].color, Some(expected));
    assert_eq!(regions[0].color, Some(NORMAL_PALETTE[0]));
}

#[test]
fn hover_recolors_only_regions_containing_the_id() {
    let mut engine = engine_over(TEXT);
    let _x = create_over(&mut engine, 10, 30);
    let y = create_over(&mut engine, 20, 10);

    engine.toggle_hover(&y);

    let regions = engine.regions();
    assert_eq!(regions[0].color, Some(NORMAL_PALETTE[0]));
    assert_eq!(regions[2].color, Some(NORMAL_PALETTE[0]));
    let expected = HOVER_PALETTE[1].over(NORMAL_PALETTE[0]);
    assert_eq!(regions[1].color, Some(expected));

    engine.toggle_hover(&y);
    let expected = NORMAL_PALETTE[1].over(NORMAL_PALETTE[0]);
    assert_eq!(engine.regions()[1].color, Some(expected));
}

#[test]
fn collapsed_selection_creates_nothing() {
    let mut engine = engine_over(TEXT);
    engine.surface_mut().set_selection(Some(CharRange::new(5, 0)));
    assert_eq!(engine.create_from_selection(AnnotationKind::Claim), None);
    assert!(engine.annotations().is_empty());
    assert!(engine.regions().is_empty());
    assert!(engine.take_events().is_empty());
}

#[test]
fn missing_selection_creates_nothing() {
    let mut engine = engine_over(TEXT);
    assert_eq!(engine.create_from_selection(AnnotationKind::Claim), None);
    assert!(engine.annotations().is_empty());
}

#[test]
fn whitespace_only_selection_creates_nothing() {
    let mut engine = engine_over("words   more");
    engine.surface_mut().set_selection(Some(CharRange::new(5, 3)));
    assert_eq!(engine.create_from_selection(AnnotationKind::Claim), None);
    assert!(engine.annotations().is_empty());
}

#[test]
fn seeded_marks_are_adopted_into_the_store() {
    let surface = TextSurface::from_fragments([
        Fragment::plain("intro "),
        Fragment::marked("first", vec![AnnotationId::from("a")]),
        Fragment::plain(" middle "),
        Fragment::marked("second", vec![AnnotationId::from("b")]),
    ]);
    let mut engine = OverlayEngine::new(surface);

    let ids: Vec<_> = engine.annotations().iter().map(|a| a.id.clone()).collect();
    assert_eq!(ids, vec![AnnotationId::from("a"), AnnotationId::from("b")]);
    assert_eq!(engine.regions().len(), 2);
    assert_eq!(engine.regions()[0].color, Some(NORMAL_PALETTE[0]));
    assert_eq!(engine.regions()[1].color, Some(NORMAL_PALETTE[1]));

    let events = engine.take_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], ChangeEvent::Created { annotation } if annotation.id == AnnotationId::from("a")));
}

#[test]
fn pointer_movement_drives_hover_state() {
    let surface = TextSurface::from_fragments([
        Fragment::plain("intro "),
        Fragment::marked("marked", vec![AnnotationId::from("a")]),
        Fragment::plain(" tail"),
    ]);
    let mut engine = OverlayEngine::new(surface);
    engine.take_events();

    engine.pointer_at(Some(8));
    assert!(engine.annotations()[0].hover);
    let events = engine.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], ChangeEvent::Hover { id, hover: true } if *id == AnnotationId::from("a")));

    // moving within the same annotation emits nothing further
    engine.pointer_at(Some(9));
    assert!(engine.take_events().is_empty());

    // moving onto unmarked text leaves the annotation
    engine.pointer_at(Some(2));
    assert!(!engine.annotations()[0].hover);

    engine.pointer_at(Some(8));
    engine.pointer_left();
    assert!(!engine.annotations()[0].hover);
}

#[test]
fn create_emits_a_created_event() {
    let mut engine = engine_over(TEXT);
    let id = create_over(&mut engine, 0, 5);
    let events = engine.take_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], ChangeEvent::Created { annotation } if annotation.id == id));
}

#[test]
fn color_at_resolves_region_membership() {
    let mut engine = engine_over(TEXT);
    create_over(&mut engine, 10, 5);
    assert_eq!(engine.color_at(12), Some(NORMAL_PALETTE[0]));
    assert_eq!(engine.color_at(3), None);
    assert_eq!(engine.color_at(999), None);
}
