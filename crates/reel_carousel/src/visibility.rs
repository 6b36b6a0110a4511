//! Picking the current slide from an intersection batch

use reel_dom::{ElementId, IntersectionEntry};

/// Index of the slide a batch makes current, if any
///
/// Considers only intersecting entries for known slides. The largest
/// visible ratio wins; equal ratios go to the lower slide index.
pub(crate) fn visible_slide(entries: &[IntersectionEntry], slides: &[ElementId]) -> Option<usize> {
    entries
        .iter()
        .filter(|entry| entry.is_intersecting)
        .filter_map(|entry| {
            slides
                .iter()
                .position(|&slide| slide == entry.target)
                .map(|index| (index, entry.ratio))
        })
        .fold(None, |best: Option<(usize, f32)>, (index, ratio)| match best {
            Some((best_index, best_ratio))
                if best_ratio > ratio || (best_ratio == ratio && best_index < index) =>
            {
                best
            }
            _ => Some((index, ratio)),
        })
        .map(|(index, _)| index)
}
