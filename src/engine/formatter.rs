use tracing::trace;

use super::AnnotationId;
use crate::surface::{ApplyOutcome, CharRange, MarkSurface};

/// Apply `id` over `range` so that it coexists with any annotation already
/// covering an overlapping or nested range.
///
/// The host's default single-value formatting is tried first. When the host
/// signals a conflict, the affected runs are split at the boundaries of the
/// new range and `id` is added to the mark set of every run inside it, so
/// each resulting region carries the union of ids for its sub-range. Runs
/// outside the range, and every other id's coverage inside it, are left
/// untouched. Re-applying an id already covering a sub-range adds no
/// duplicate membership.
pub(crate) fn apply_annotation<S: MarkSurface>(
    surface: &mut S,
    range: CharRange,
    id: &AnnotationId,
) {
    if range.is_collapsed() {
        return;
    }

    if surface.apply_mark(range, id) == ApplyOutcome::Applied {
        return;
    }

    trace!(id = %id, start = range.start, len = range.len, "mark conflict, splitting runs");
    surface.split_at(range.start);
    surface.split_at(range.end());
    for run in surface.runs_in(range) {
        if run.range.start >= range.start && run.range.end() <= range.end() {
            surface.tag_run(run.index, id);
        }
    }
    surface.normalize();
}
