use super::*;

fn id(name: &str) -> AnnotationId {
    AnnotationId::from(name)
}

#[test]
fn fragments_seed_runs_with_document_offsets() {
    let surface = TextSurface::from_fragments([
        Fragment::plain("plain "),
        Fragment::marked("marked", vec![id("a")]),
        Fragment::plain(" tail"),
    ]);

    assert_eq!(surface.text(), "plain marked tail");
    assert_eq!(surface.len_chars(), 17);

    let regions = surface.regions();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].range, CharRange::new(6, 6));
    assert_eq!(regions[0].ids, vec![id("a")]);
}

#[test]
fn adjacent_fragments_with_identical_marks_merge() {
    let surface = TextSurface::from_fragments([
        Fragment::marked("one ", vec![id("a")]),
        Fragment::marked("two", vec![id("a")]),
    ]);
    assert_eq!(surface.regions().len(), 1);
    assert_eq!(surface.regions()[0].range, CharRange::new(0, 7));
}

#[test]
fn apply_mark_on_unmarked_text_succeeds() {
    let mut surface = TextSurface::from_text("hello world");
    let outcome = surface.apply_mark(CharRange::new(0, 5), &id("a"));
    assert_eq!(outcome, ApplyOutcome::Applied);

    let regions = surface.regions();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].range, CharRange::new(0, 5));
    assert_eq!(regions[0].ids, vec![id("a")]);
    assert_eq!(surface.text(), "hello world");
}

#[test]
fn apply_mark_signals_conflict_without_mutating() {
    let mut surface = TextSurface::from_text("hello world");
    surface.apply_mark(CharRange::new(0, 5), &id("a"));
    let before = surface.regions();

    let outcome = surface.apply_mark(CharRange::new(3, 5), &id("b"));
    assert_eq!(outcome, ApplyOutcome::Conflict);
    assert_eq!(surface.regions(), before);
}

#[test]
fn reapplying_the_same_mark_is_not_a_conflict() {
    let mut surface = TextSurface::from_text("hello world");
    surface.apply_mark(CharRange::new(0, 8), &id("a"));
    let outcome = surface.apply_mark(CharRange::new(2, 4), &id("a"));
    assert_eq!(outcome, ApplyOutcome::Applied);

    let regions = surface.regions();
    assert_eq!(regions.len(), 1);
    assert_eq!(regions[0].ids, vec![id("a")]);
}

#[test]
fn split_and_tag_build_union_regions() {
    let mut surface = TextSurface::from_text("hello world");
    surface.apply_mark(CharRange::new(0, 11), &id("a"));

    surface.split_at(3);
    surface.split_at(7);
    for run in surface.runs_in(CharRange::new(3, 4)) {
        surface.tag_run(run.index, &id("b"));
    }
    surface.normalize();

    let regions = surface.regions();
    assert_eq!(regions.len(), 3);
    assert_eq!(regions[0].ids, vec![id("a")]);
    assert_eq!(regions[1].range, CharRange::new(3, 4));
    assert_eq!(regions[1].ids, vec![id("a"), id("b")]);
    assert_eq!(regions[2].ids, vec![id("a")]);
}

#[test]
fn tag_run_is_idempotent() {
    let mut surface = TextSurface::from_text("text");
    surface.apply_mark(CharRange::new(0, 4), &id("a"));
    let index = surface.runs_in(CharRange::new(0, 4))[0].index;
    surface.tag_run(index, &id("a"));
    assert_eq!(surface.regions()[0].ids, vec![id("a")]);
}

#[test]
fn ids_at_resolves_offsets_and_tolerates_out_of_bounds() {
    let mut surface = TextSurface::from_text("hello world");
    surface.apply_mark(CharRange::new(6, 5), &id("a"));

    assert!(surface.ids_at(0).is_empty());
    assert_eq!(surface.ids_at(6), vec![id("a")]);
    assert_eq!(surface.ids_at(10), vec![id("a")]);
    assert!(surface.ids_at(11).is_empty());
    assert!(surface.ids_at(999).is_empty());
}

#[test]
fn regions_for_collects_all_runs_of_one_annotation() {
    let mut surface = TextSurface::from_fragments([
        Fragment::marked("one", vec![id("a")]),
        Fragment::plain(" and "),
        Fragment::marked("two", vec![id("a")]),
    ]);
    let regions = surface.regions_for(&id("a"));
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].range, CharRange::new(0, 3));
    assert_eq!(regions[1].range, CharRange::new(8, 3));
    assert!(surface.regions_for(&id("b")).is_empty());
}

#[test]
fn mutation_queues_region_change_events() {
    let mut surface = TextSurface::from_text("hello world");
    assert!(surface.take_events().is_empty());

    surface.apply_mark(CharRange::new(0, 5), &id("a"));
    assert_eq!(surface.take_events(), vec![SurfaceEvent::RegionsChanged]);
    assert!(surface.take_events().is_empty());
}

#[test]
fn selection_is_clamped_to_document_bounds() {
    let mut surface = TextSurface::from_text("short");
    surface.set_selection(Some(CharRange::new(2, 100)));
    assert_eq!(surface.selection(), Some(CharRange::new(2, 3)));

    surface.set_selection(Some(CharRange::new(100, 4)));
    assert_eq!(surface.selection(), Some(CharRange::new(5, 0)));

    surface.set_selection(None);
    assert_eq!(surface.selection(), None);
}
