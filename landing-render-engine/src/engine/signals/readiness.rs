use bevy::prelude::*;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type ReadyCallback = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct ReadinessInner {
    ready: bool,
    next_id: u64,
    pending: Vec<(u64, ReadyCallback)>,
}

/// Latched, multi-subscriber notification set once the hero model resolves.
///
/// Cloning yields another handle to the same signal. Callbacks run on the
/// thread that calls [`ReadinessSignal::set_ready`], in subscription order,
/// and never while the internal lock is held, so a callback may subscribe
/// again (it fires immediately) or query the signal.
#[derive(Resource, Clone, Default)]
pub struct ReadinessSignal {
    inner: Arc<Mutex<ReadinessInner>>,
}

impl ReadinessSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ReadinessInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    /// Flip to ready and drain the queue. Later calls do nothing.
    pub fn set_ready(&self) {
        let pending = {
            let mut inner = self.lock();
            if inner.ready {
                return;
            }
            inner.ready = true;
            std::mem::take(&mut inner.pending)
        };

        for (_, callback) in pending {
            callback();
        }
    }

    /// Run `callback` once the signal is ready.
    ///
    /// Fires synchronously when the signal is already set. The returned
    /// handle removes the callback if it is still pending; dropping the handle
    /// leaves the subscription in place.
    pub fn on_ready<F>(&self, callback: F) -> Unsubscribe
    where
        F: FnOnce() + Send + 'static,
    {
        let mut inner = self.lock();
        if inner.ready {
            drop(inner);
            callback();
            return Unsubscribe::fired();
        }

        let id = inner.next_id;
        inner.next_id += 1;
        inner.pending.push((id, Box::new(callback)));

        Unsubscribe {
            signal: Arc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }
}

/// Handle returned by [`ReadinessSignal::on_ready`].
pub struct Unsubscribe {
    signal: Weak<Mutex<ReadinessInner>>,
    id: Option<u64>,
}

impl Unsubscribe {
    fn fired() -> Self {
        Self {
            signal: Weak::new(),
            id: None,
        }
    }

    /// Remove the callback from the queue. Returns whether it was still pending.
    pub fn unsubscribe(self) -> bool {
        let (Some(id), Some(signal)) = (self.id, self.signal.upgrade()) else {
            return false;
        };

        let mut inner = signal.lock().unwrap_or_else(PoisonError::into_inner);
        let before = inner.pending.len();
        inner.pending.retain(|(pending_id, _)| *pending_id != id);
        inner.pending.len() != before
    }
}
