use std::sync::{Arc, Condvar, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct SlotState {
    latest: Option<u8>,
    closed: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // A panic while holding the lock cannot leave the slot inconsistent.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Worker side. Dropping it closes the slot.
#[derive(Debug)]
pub struct ProgressSender {
    shared: Arc<Shared>,
}

/// Front-end side.
#[derive(Debug)]
pub struct ProgressReceiver {
    shared: Arc<Shared>,
}

/// Single-slot progress channel between the batch worker and a front end.
///
/// The slot holds at most one value. Publishing overwrites whatever the
/// receiver has not picked up yet, so a slow front end only ever sees the
/// latest percentage. Progress is monotonic, so the dropped intermediate
/// values carry nothing the latest one lacks.
pub fn progress_slot() -> (ProgressSender, ProgressReceiver) {
    let shared = Arc::new(Shared::default());
    (
        ProgressSender {
            shared: Arc::clone(&shared),
        },
        ProgressReceiver { shared },
    )
}

impl ProgressSender {
    pub fn publish(&self, percent: u8) {
        let mut state = self.shared.lock();
        state.latest = Some(percent);
        drop(state);
        self.shared.ready.notify_all();
    }
}

impl Drop for ProgressSender {
    fn drop(&mut self) {
        self.shared.lock().closed = true;
        self.shared.ready.notify_all();
    }
}

impl ProgressReceiver {
    /// Take the latest unread value without blocking.
    pub fn try_take(&self) -> Option<u8> {
        self.shared.lock().latest.take()
    }

    /// Block until a new value is published, returning `None` once the
    /// sender is gone and nothing is left to read.
    pub fn recv(&self) -> Option<u8> {
        let mut state = self.shared.lock();
        loop {
            if let Some(p) = state.latest.take() {
                return Some(p);
            }
            if state.closed {
                return None;
            }
            state = self
                .shared
                .ready
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }
}
