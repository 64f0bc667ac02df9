use std::collections::VecDeque;

use crate::engine::AnnotationId;

/// A half-open character range `[start, start + len)` in document
/// coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharRange {
    pub start: usize,
    pub len: usize,
}

impl CharRange {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_collapsed(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }
}

/// One piece of seed content: a text fragment, optionally pre-marked with
/// annotation ids. The initial document is an ordered sequence of these.
#[derive(Clone, Debug)]
pub struct Fragment {
    pub text: String,
    pub ids: Vec<AnnotationId>,
}

impl Fragment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ids: Vec::new(),
        }
    }

    pub fn marked(text: impl Into<String>, ids: Vec<AnnotationId>) -> Self {
        Self {
            text: text.into(),
            ids,
        }
    }
}

/// Outcome of the host's default single-value mark application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The range already carries a different mark; the caller has to fall
    /// back to splitting the affected runs.
    Conflict,
}

/// Notification that the set of rendered regions changed after a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    RegionsChanged,
}

/// A contiguous rendered run of content carrying one or more annotation
/// ids. Regions are derived from the surface's runs; a single annotation
/// may be realized as several disjoint regions.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub range: CharRange,
    pub ids: Vec<AnnotationId>,
}

/// Position of one run within the surface, handed out so a caller can
/// split and re-tag runs without holding a borrow on the surface.
#[derive(Clone, Debug)]
pub struct RunRef {
    pub index: usize,
    pub range: CharRange,
    pub ids: Vec<AnnotationId>,
}

/// Contract of the host text-editing surface.
///
/// Any component that supports range-scoped tagging and range splitting can
/// implement this; the overlay engine only relies on these operations plus
/// the region-change notifications from `take_events`.
pub trait MarkSurface {
    fn len_chars(&self) -> usize;

    /// Current user selection, in document coordinates.
    fn selection(&self) -> Option<CharRange>;

    fn text_in(&self, range: CharRange) -> String;

    /// The host's default single-value formatting: succeeds only when no
    /// offset inside `range` already carries a different mark.
    fn apply_mark(&mut self, range: CharRange, id: &AnnotationId) -> ApplyOutcome;

    /// Split the run containing `offset` so that `offset` becomes a run
    /// boundary. A no-op when it already is one.
    fn split_at(&mut self, offset: usize);

    /// Runs overlapping `range`, in document order.
    fn runs_in(&self, range: CharRange) -> Vec<RunRef>;

    /// Add `id` to the run's mark set. Idempotent.
    fn tag_run(&mut self, index: usize, id: &AnnotationId);

    /// Re-merge adjacent runs with identical mark sets and emit a region
    /// change notification.
    fn normalize(&mut self);

    /// Mark set at a single offset, for pointer hit-testing. Empty when the
    /// offset is unmarked or out of bounds.
    fn ids_at(&self, offset: usize) -> Vec<AnnotationId>;

    /// All currently rendered regions, in document order.
    fn regions(&self) -> Vec<Region>;

    /// The regions realizing a single annotation.
    fn regions_for(&self, id: &AnnotationId) -> Vec<Region>;

    /// Drain pending region-change notifications.
    fn take_events(&mut self) -> Vec<SurfaceEvent>;
}

#[derive(Clone, Debug)]
struct Run {
    text: String,
    ids: Vec<AnnotationId>,
}

impl Run {
    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A run borrowed from the surface, with its resolved document range.
#[derive(Clone, Copy, Debug)]
pub struct RunSlice<'a> {
    pub range: CharRange,
    pub text: &'a str,
    pub ids: &'a [AnnotationId],
}

/// In-memory host surface: a flat sequence of non-overlapping runs, each
/// carrying the ordered set of annotation ids covering it. The id order
/// within a run is the order the marks were applied, which for annotations
/// created through the engine equals creation order.
#[derive(Debug, Default)]
pub struct TextSurface {
    runs: Vec<Run>,
    selection: Option<CharRange>,
    events: VecDeque<SurfaceEvent>,
}

impl TextSurface {
    pub fn from_fragments(fragments: impl IntoIterator<Item = Fragment>) -> Self {
        let runs = fragments
            .into_iter()
            .filter(|fragment| !fragment.text.is_empty())
            .map(|fragment| Run {
                text: fragment.text,
                ids: fragment.ids,
            })
            .collect();
        let mut surface = Self {
            runs,
            selection: None,
            events: VecDeque::new(),
        };
        surface.merge_adjacent();
        surface
    }

    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_fragments([Fragment::plain(text)])
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Set (or clear) the user selection, clamped to document bounds.
    pub fn set_selection(&mut self, range: Option<CharRange>) {
        let total = self.len_chars();
        self.selection = range.map(|range| {
            let start = range.start.min(total);
            CharRange::new(start, range.len.min(total - start))
        });
    }

    /// Runs with their resolved ranges, in document order. This is the
    /// rendering layer's view of the document.
    pub fn run_slices(&self) -> Vec<RunSlice<'_>> {
        let mut start = 0;
        let mut slices = Vec::with_capacity(self.runs.len());
        for run in &self.runs {
            let len = run.char_len();
            slices.push(RunSlice {
                range: CharRange::new(start, len),
                text: &run.text,
                ids: &run.ids,
            });
            start += len;
        }
        slices
    }

    /// Locate the run containing `offset`, returning the run index and the
    /// char offset within it. `None` past the end of the document.
    fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        let mut start = 0;
        for (index, run) in self.runs.iter().enumerate() {
            let len = run.char_len();
            if offset < start + len {
                return Some((index, offset - start));
            }
            start += len;
        }
        None
    }

    fn split_run(&mut self, index: usize, at: usize) {
        let run = &mut self.runs[index];
        let byte = char_to_byte_idx(&run.text, at);
        let right = run.text.split_off(byte);
        let ids = run.ids.clone();
        self.runs.insert(index + 1, Run { text: right, ids });
    }

    fn merge_adjacent(&mut self) {
        let mut i = 0;
        while i + 1 < self.runs.len() {
            if self.runs[i].ids == self.runs[i + 1].ids {
                let right = self.runs.remove(i + 1);
                self.runs[i].text.push_str(&right.text);
            } else {
                i += 1;
            }
        }
    }
}

impl MarkSurface for TextSurface {
    fn len_chars(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    fn selection(&self) -> Option<CharRange> {
        self.selection
    }

    fn text_in(&self, range: CharRange) -> String {
        self.text()
            .chars()
            .skip(range.start)
            .take(range.len)
            .collect()
    }

    fn apply_mark(&mut self, range: CharRange, id: &AnnotationId) -> ApplyOutcome {
        let total = self.len_chars();
        let range = CharRange::new(range.start.min(total), range.len.min(total.saturating_sub(range.start)));
        if range.is_collapsed() {
            return ApplyOutcome::Applied;
        }

        for run in self.runs_in(range) {
            if !run.ids.is_empty() && run.ids.as_slice() != std::slice::from_ref(id) {
                return ApplyOutcome::Conflict;
            }
        }

        self.split_at(range.start);
        self.split_at(range.end());
        for run in self.runs_in(range) {
            if run.ids.is_empty() {
                self.runs[run.index].ids.push(id.clone());
            }
        }
        self.normalize();
        ApplyOutcome::Applied
    }

    fn split_at(&mut self, offset: usize) {
        if let Some((index, within)) = self.locate(offset)
            && within > 0
        {
            self.split_run(index, within);
        }
    }

    fn runs_in(&self, range: CharRange) -> Vec<RunRef> {
        self.run_slices()
            .iter()
            .enumerate()
            .filter(|(_, slice)| slice.range.start < range.end() && range.start < slice.range.end())
            .map(|(index, slice)| RunRef {
                index,
                range: slice.range,
                ids: slice.ids.to_vec(),
            })
            .collect()
    }

    fn tag_run(&mut self, index: usize, id: &AnnotationId) {
        let Some(run) = self.runs.get_mut(index) else {
            return;
        };
        if !run.ids.contains(id) {
            run.ids.push(id.clone());
        }
    }

    fn normalize(&mut self) {
        self.merge_adjacent();
        self.events.push_back(SurfaceEvent::RegionsChanged);
    }

    fn ids_at(&self, offset: usize) -> Vec<AnnotationId> {
        self.locate(offset)
            .map(|(index, _)| self.runs[index].ids.clone())
            .unwrap_or_default()
    }

    fn regions(&self) -> Vec<Region> {
        self.run_slices()
            .iter()
            .filter(|slice| !slice.ids.is_empty())
            .map(|slice| Region {
                range: slice.range,
                ids: slice.ids.to_vec(),
            })
            .collect()
    }

    fn regions_for(&self, id: &AnnotationId) -> Vec<Region> {
        self.regions()
            .into_iter()
            .filter(|region| region.ids.contains(id))
            .collect()
    }

    fn take_events(&mut self) -> Vec<SurfaceEvent> {
        self.events.drain(..).collect()
    }
}

pub(crate) fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}

#[cfg(test)]
#[path = "surface_tests.rs"]
mod surface_tests;
