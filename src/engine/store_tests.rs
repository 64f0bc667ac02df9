use super::*;

#[test]
fn create_appends_in_creation_order_with_hover_off() {
    let mut store = AnnotationStore::new();
    let first = store.create(AnnotationKind::Claim);
    let second = store.create(AnnotationKind::Claim);

    assert_ne!(first.id, second.id);
    assert_eq!(store.len(), 2);
    assert_eq!(store.annotations()[0].id, first.id);
    assert_eq!(store.annotations()[1].id, second.id);
    assert!(!store.annotations()[0].hover);
}

#[test]
fn generated_ids_are_long_alphanumeric() {
    let id = AnnotationId::generate();
    assert_eq!(id.as_str().len(), 21);
    assert!(id.as_str().chars().all(|ch| ch.is_ascii_alphanumeric()));
}

#[test]
fn set_hover_reports_changes_and_tolerates_unknown_ids() {
    let mut store = AnnotationStore::new();
    let annotation = store.create(AnnotationKind::Claim);

    assert!(store.set_hover(&annotation.id, true));
    assert_eq!(store.hover(&annotation.id), Some(true));
    // setting the same value again is not a change
    assert!(!store.set_hover(&annotation.id, true));
    assert!(store.set_hover(&annotation.id, false));

    // never-seen id: a no-op, not a fault
    assert!(!store.set_hover(&AnnotationId::from("missing"), true));
    assert_eq!(store.len(), 1);
}

#[test]
fn adopt_registers_seeded_ids_once() {
    let mut store = AnnotationStore::new();
    let id = AnnotationId::from("seeded");

    assert!(store.adopt(&id, AnnotationKind::Claim));
    assert!(!store.adopt(&id, AnnotationKind::Claim));
    assert_eq!(store.len(), 1);
    assert_eq!(store.hover(&id), Some(false));
}
