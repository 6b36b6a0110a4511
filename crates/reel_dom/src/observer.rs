//! Intersection observation
//!
//! An observer watches a set of targets against a root element's client
//! rectangle. Each evaluation computes the visible ratio of every target
//! and reports only the targets whose intersecting state changed since the
//! last report. A freshly observed target is always reported once.

use std::rc::Rc;

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};

use crate::error::Result;
use crate::host::Host;
use crate::tree::{Document, ElementId};

new_key_type! {
    /// Handle to an intersection observer
    pub struct ObserverId;
}

/// Observer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Element whose client rectangle acts as the viewport
    pub root: ElementId,
    /// Visible ratio at or above which a target counts as intersecting
    pub threshold: f32,
}

impl ObserverOptions {
    pub fn new(root: ElementId, threshold: f32) -> Self {
        Self {
            root,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }
}

/// One target's state in an observer batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    /// Visible fraction of the target's area, `0.0..=1.0`
    pub ratio: f32,
    pub is_intersecting: bool,
}

/// Callback receiving one batch of changed entries
pub type ObserverCallback = Rc<dyn Fn(&mut Host, &[IntersectionEntry])>;

struct ObserverRecord {
    options: ObserverOptions,
    callback: ObserverCallback,
    /// Last reported intersecting state, `None` until first reported
    targets: IndexMap<ElementId, Option<bool>>,
}

#[derive(Default)]
pub(crate) struct ObserverSet {
    observers: SlotMap<ObserverId, ObserverRecord>,
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ObserverSet {
    pub(crate) fn create(&mut self, options: ObserverOptions, callback: ObserverCallback) -> ObserverId {
        self.observers.insert(ObserverRecord {
            options,
            callback,
            targets: IndexMap::new(),
        })
    }

    /// Start observing `target`; returns false if the observer is gone
    pub(crate) fn observe(&mut self, id: ObserverId, target: ElementId) -> bool {
        let Some(record) = self.observers.get_mut(id) else {
            return false;
        };
        record.targets.entry(target).or_insert(None);
        true
    }

    pub(crate) fn unobserve(&mut self, id: ObserverId, target: ElementId) -> bool {
        self.observers
            .get_mut(id)
            .is_some_and(|record| record.targets.shift_remove(&target).is_some())
    }

    pub(crate) fn disconnect(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id).is_some()
    }

    pub(crate) fn target_count(&self, id: ObserverId) -> usize {
        self.observers.get(id).map_or(0, |record| record.targets.len())
    }

    /// Compute pending batches, recording the reported states
    ///
    /// Targets whose geometry cannot be resolved are skipped for this round.
    pub(crate) fn evaluate(&mut self, doc: &Document) -> Vec<(ObserverCallback, Vec<IntersectionEntry>)> {
        let mut batches = Vec::new();

        for (id, record) in self.observers.iter_mut() {
            let root = record.options.root;
            let mut entries = Vec::new();

            for (&target, last) in record.targets.iter_mut() {
                let ratio = match doc.intersection_ratio(target, root) {
                    Ok(ratio) => ratio,
                    Err(err) => {
                        tracing::trace!("observer {:?} skipped {:?}: {}", id, target, err);
                        continue;
                    }
                };
                let is_intersecting = ratio > 0.0 && ratio >= record.options.threshold;

                if *last != Some(is_intersecting) {
                    *last = Some(is_intersecting);
                    entries.push(IntersectionEntry {
                        target,
                        ratio,
                        is_intersecting,
                    });
                }
            }

            if !entries.is_empty() {
                batches.push((Rc::clone(&record.callback), entries));
            }
        }

        batches
    }
}

impl Document {
    /// Fraction of `target`'s client rectangle visible inside `root`'s
    ///
    /// A zero-area target counts as fully visible when it lies inside the root.
    pub fn intersection_ratio(&self, target: ElementId, root: ElementId) -> Result<f32> {
        let target_rect = self.client_rect(target)?;
        let root_rect = self.client_rect(root)?;

        let area = target_rect.area();
        if area <= 0.0 {
            return Ok(if target_rect.is_within(&root_rect) { 1.0 } else { 0.0 });
        }

        Ok(target_rect
            .intersection(&root_rect)
            .map_or(0.0, |visible| (visible.area() / area).min(1.0)))
    }
}
