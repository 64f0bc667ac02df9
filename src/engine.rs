use std::collections::VecDeque;

use tracing::debug;

use crate::palette::{PaletteMap, Rgba};
use crate::surface::{CharRange, MarkSurface};

mod formatter;
mod hover;
mod store;

pub use hover::{HoverChange, HoverTracker};
pub use store::{Annotation, AnnotationId, AnnotationKind, AnnotationStore};

/// Mirror of one rendered region, kept consistent with the surface and the
/// store: its id set and its current composite color.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionState {
    pub range: CharRange,
    pub ids: Vec<AnnotationId>,
    pub color: Option<Rgba>,
}

/// Change notification for reactive consumers (the annotation list UI).
#[derive(Clone, Debug)]
pub enum ChangeEvent {
    Created { annotation: Annotation },
    Hover { id: AnnotationId, hover: bool },
}

/// The overlay engine session: one per active document.
///
/// Owns the annotation store, the palette assignment, the hover tracker and
/// a region mirror, and keeps them consistent with the host surface. All
/// operations are synchronous with the event that triggered them; in
/// particular, newly appearing regions are instrumented within the same
/// call that made them appear, never on a later tick.
pub struct OverlayEngine<S: MarkSurface> {
    surface: S,
    store: AnnotationStore,
    palette: PaletteMap,
    tracker: HoverTracker,
    regions: Vec<RegionState>,
    events: VecDeque<ChangeEvent>,
}

impl<S: MarkSurface> OverlayEngine<S> {
    pub fn new(surface: S) -> Self {
        let mut engine = Self {
            surface,
            store: AnnotationStore::new(),
            palette: PaletteMap::new(),
            tracker: HoverTracker::new(),
            regions: Vec::new(),
            events: VecDeque::new(),
        };
        engine.reconcile();
        engine
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Annotations in creation order, for list rendering.
    pub fn annotations(&self) -> &[Annotation] {
        self.store.annotations()
    }

    /// The current region mirror, in document order.
    pub fn regions(&self) -> &[RegionState] {
        &self.regions
    }

    /// Composite color of the region covering `offset`, if any.
    pub fn color_at(&self, offset: usize) -> Option<Rgba> {
        self.regions
            .iter()
            .find(|region| region.range.contains(offset))
            .and_then(|region| region.color)
    }

    /// Stable base (non-hover) color assigned to an annotation.
    pub fn base_color(&mut self, id: &AnnotationId) -> Rgba {
        self.palette.color_for(id, false)
    }

    /// Create an annotation over the current selection.
    ///
    /// A collapsed selection, a selection outside the editable surface or a
    /// selection with empty trimmed text is silently rejected: no id is
    /// generated and the store is not touched.
    pub fn create_from_selection(&mut self, kind: AnnotationKind) -> Option<AnnotationId> {
        let range = self.surface.selection()?;
        if range.is_collapsed() || range.end() > self.surface.len_chars() {
            return None;
        }
        if self.surface.text_in(range).trim().is_empty() {
            return None;
        }

        let annotation = self.store.create(kind);
        formatter::apply_annotation(&mut self.surface, range, &annotation.id);
        debug!(id = %annotation.id, start = range.start, len = range.len, "annotation created");
        self.events.push_back(ChangeEvent::Created {
            annotation: annotation.clone(),
        });
        self.reconcile();
        Some(annotation.id)
    }

    /// Update an annotation's hover flag and recolor exactly the regions
    /// whose id set contains it. Unknown ids and no-op updates are ignored.
    pub fn set_hover(&mut self, id: &AnnotationId, hover: bool) {
        if !self.store.set_hover(id, hover) {
            return;
        }
        debug!(id = %id, hover, "hover changed");
        self.events.push_back(ChangeEvent::Hover {
            id: id.clone(),
            hover,
        });
        self.recolor(id);
    }

    /// Explicit UI toggle, functionally identical to a pointer-driven hover
    /// change.
    pub fn toggle_hover(&mut self, id: &AnnotationId) {
        let Some(current) = self.store.hover(id) else {
            return;
        };
        self.set_hover(id, !current);
    }

    /// Point-sampled hover update: `offset` is the character under the
    /// pointer, or `None` when the pointer is over the surface but not over
    /// text. Each emitted transition is forwarded one at a time, so
    /// intermediate sequences stay individually observable.
    pub fn pointer_at(&mut self, offset: Option<usize>) {
        let ids = match offset {
            Some(offset) => self.surface.ids_at(offset),
            None => Vec::new(),
        };
        for change in self.tracker.sample(&ids) {
            self.set_hover(&change.id, change.hovered);
        }
    }

    /// The pointer left the editing surface entirely.
    pub fn pointer_left(&mut self) {
        for change in self.tracker.clear() {
            self.set_hover(&change.id, change.hovered);
        }
    }

    /// Drain pending change notifications.
    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        self.events.drain(..).collect()
    }

    /// Rebuild the region mirror from the surface: adopt ids the store has
    /// not seen yet (pre-marked seed content) and compute composite colors.
    /// Idempotent, and run synchronously inside every mutating operation so
    /// a region can never receive pointer events before it is wired up.
    fn reconcile(&mut self) {
        self.surface.take_events();

        let Self {
            surface,
            store,
            palette,
            regions,
            events,
            ..
        } = self;

        regions.clear();
        for region in surface.regions() {
            for id in &region.ids {
                if store.adopt(id, AnnotationKind::Claim)
                    && let Some(annotation) = store.get(id)
                {
                    debug!(id = %id, "adopted seeded annotation");
                    events.push_back(ChangeEvent::Created {
                        annotation: annotation.clone(),
                    });
                }
            }
            let color = palette.composite(&region.ids, |id| store.hover(id).unwrap_or(false));
            regions.push(RegionState {
                range: region.range,
                ids: region.ids,
                color,
            });
        }
    }

    /// Targeted recoloring: only mirror entries containing `id` are
    /// recomputed. An id the store cannot resolve composites as not
    /// hovered rather than failing the pass.
    fn recolor(&mut self, id: &AnnotationId) {
        let Self {
            store,
            palette,
            regions,
            ..
        } = self;
        for region in regions.iter_mut().filter(|region| region.ids.contains(id)) {
            region.color = palette.composite(&region.ids, |id| store.hover(id).unwrap_or(false));
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;

#[cfg(test)]
#[path = "engine/store_tests.rs"]
mod store_tests;
