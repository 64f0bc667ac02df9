use super::AnnotationId;

/// An edge-triggered hover transition for one annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HoverChange {
    pub id: AnnotationId,
    pub hovered: bool,
}

impl HoverChange {
    fn entered(id: &AnnotationId) -> Self {
        Self {
            id: id.clone(),
            hovered: true,
        }
    }

    fn left(id: AnnotationId) -> Self {
        Self { id, hovered: false }
    }
}

/// Point-sampled hover tracking.
///
/// Every pointer position is resolved to the set of annotation ids under it
/// and diffed against the previous sample, so transitions are emitted
/// exactly once per edge: an annotation backed by several disjoint or
/// nested regions sees no duplicate notifications while the pointer moves
/// between them.
#[derive(Debug, Default)]
pub struct HoverTracker {
    hovered: Vec<AnnotationId>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> &[AnnotationId] {
        &self.hovered
    }

    /// Diff the ids under the pointer against the previous sample. Ids no
    /// longer present leave first, then newly present ids enter, each
    /// reported once.
    pub fn sample(&mut self, ids: &[AnnotationId]) -> Vec<HoverChange> {
        let mut changes = Vec::new();
        let mut next = Vec::with_capacity(ids.len());

        for id in self.hovered.drain(..) {
            if ids.contains(&id) {
                next.push(id);
            } else {
                changes.push(HoverChange::left(id));
            }
        }
        for id in ids {
            if !next.contains(id) {
                next.push(id.clone());
                changes.push(HoverChange::entered(id));
            }
        }

        self.hovered = next;
        changes
    }

    /// The pointer left the surface entirely: everything hovered leaves.
    pub fn clear(&mut self) -> Vec<HoverChange> {
        self.hovered.drain(..).map(HoverChange::left).collect()
    }
}
