//! One-shot autoplay latch

use reel_dom::TimerId;

/// Holds the autoplay interval until the first manual navigation
///
/// Cancelling hands the timer back exactly once. Later cancels return
/// `None`, and a cancelled latch cannot be armed again.
#[derive(Debug, Default)]
pub(crate) struct AutoplayLatch {
    timer: Option<TimerId>,
    released: bool,
}

impl AutoplayLatch {
    /// Store the running interval; ignored once released
    pub(crate) fn arm(&mut self, timer: TimerId) -> bool {
        if self.released || self.timer.is_some() {
            return false;
        }
        self.timer = Some(timer);
        true
    }

    pub(crate) fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Release the latch, returning the timer to clear on the first call only
    pub(crate) fn release(&mut self) -> Option<TimerId> {
        if self.released {
            return None;
        }
        self.released = true;
        self.timer.take()
    }
}
