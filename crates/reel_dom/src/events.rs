//! Element event listeners
//!
//! Listeners are stored per (element, event type) in registration order.
//! Dispatch snapshots the listener list first, so a listener may add or
//! remove listeners (including itself) while an event is in flight.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::host::Host;
use crate::tree::ElementId;

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Event kinds routed to elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
}

/// An event being dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventType,
    /// Element the event was dispatched to
    pub target: ElementId,
    /// Element whose listener is running (differs from `target` while bubbling)
    pub current_target: ElementId,
}

/// Callback invoked for an event
pub type ListenerCallback = Rc<dyn Fn(&mut Host, &Event)>;

struct ListenerRecord {
    element: ElementId,
    kind: EventType,
    callback: ListenerCallback,
}

#[derive(Default)]
pub(crate) struct ListenerMap {
    records: SlotMap<ListenerId, ListenerRecord>,
    by_target: FxHashMap<(ElementId, EventType), SmallVec<[ListenerId; 2]>>,
}

impl std::fmt::Debug for ListenerMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerMap")
            .field("listeners", &self.records.len())
            .finish()
    }
}

impl ListenerMap {
    pub(crate) fn add(
        &mut self,
        element: ElementId,
        kind: EventType,
        callback: ListenerCallback,
    ) -> ListenerId {
        let id = self.records.insert(ListenerRecord {
            element,
            kind,
            callback,
        });
        self.by_target.entry((element, kind)).or_default().push(id);
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let Some(record) = self.records.remove(id) else {
            return false;
        };
        if let Some(ids) = self.by_target.get_mut(&(record.element, record.kind)) {
            ids.retain(|&mut other| other != id);
            if ids.is_empty() {
                self.by_target.remove(&(record.element, record.kind));
            }
        }
        true
    }

    /// Snapshot of the listeners currently registered for a target
    pub(crate) fn snapshot(
        &self,
        element: ElementId,
        kind: EventType,
    ) -> Vec<(ListenerId, ListenerCallback)> {
        self.by_target
            .get(&(element, kind))
            .map(|ids| {
                ids.iter()
                    .filter_map(|&id| {
                        self.records
                            .get(id)
                            .map(|record| (id, Rc::clone(&record.callback)))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn contains(&self, id: ListenerId) -> bool {
        self.records.contains_key(id)
    }

    pub(crate) fn count(&self, element: ElementId, kind: EventType) -> usize {
        self.by_target
            .get(&(element, kind))
            .map_or(0, |ids| ids.len())
    }
}
