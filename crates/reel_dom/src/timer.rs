//! Timers on the host's virtual clock
//!
//! Intervals and timeouts are keyed by [`TimerId`]. Clearing is idempotent:
//! clearing an id that already fired (timeouts) or was cleared is a no-op
//! that reports `false`.

use std::rc::Rc;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::host::Host;

new_key_type! {
    /// Handle to a scheduled timer
    pub struct TimerId;
}

/// Callback invoked when a timer fires
pub type TimerCallback = Rc<dyn Fn(&mut Host, TimerId)>;

struct TimerRecord {
    deadline: Duration,
    period: Option<Duration>,
    /// Registration order, breaks ties between equal deadlines
    seq: u64,
    callback: TimerCallback,
}

/// Pending timers ordered by deadline
#[derive(Default)]
pub(crate) struct TimerQueue {
    timers: SlotMap<TimerId, TimerRecord>,
    next_seq: u64,
}

impl std::fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.timers.len())
            .finish()
    }
}

impl TimerQueue {
    pub(crate) fn schedule(
        &mut self,
        now: Duration,
        delay: Duration,
        period: Option<Duration>,
        callback: TimerCallback,
    ) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.timers.insert(TimerRecord {
            deadline: now + delay,
            period,
            seq,
            callback,
        })
    }

    pub(crate) fn clear(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    pub(crate) fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    pub(crate) fn len(&self) -> usize {
        self.timers.len()
    }

    /// Earliest timer due at or before `until`
    pub(crate) fn next_due(&self, until: Duration) -> Option<(TimerId, Duration)> {
        self.timers
            .iter()
            .filter(|(_, timer)| timer.deadline <= until)
            .min_by_key(|(_, timer)| (timer.deadline, timer.seq))
            .map(|(id, timer)| (id, timer.deadline))
    }

    /// Take the callback for a firing timer and reschedule or drop it
    pub(crate) fn fire(&mut self, id: TimerId) -> Option<TimerCallback> {
        let timer = self.timers.get_mut(id)?;
        let callback = Rc::clone(&timer.callback);

        match timer.period {
            Some(period) => {
                timer.deadline += period;
                timer.seq = self.next_seq;
                self.next_seq += 1;
            }
            None => {
                self.timers.remove(id);
            }
        }

        Some(callback)
    }
}
