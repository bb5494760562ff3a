use std::{
    sync::{Arc, OnceLock},
    time::{Duration, Instant},
};

use super::error::CancelReason;

/// Cooperative cancellation shared by every worker of a search.
///
/// Clones observe the same state. A signal fires when [`cancel`](Self::cancel) is
/// called, when its deadline passes, or when the parent it was derived from fires.
/// The first reason recorded wins and never changes afterwards.
#[derive(Clone, Debug, Default)]
pub struct CancellationSignal {
    inner: Arc<SignalState>,
}

#[derive(Debug, Default)]
struct SignalState {
    reason: OnceLock<CancelReason>,
    deadline: Option<Instant>,
    parent: Option<CancellationSignal>,
}

impl CancellationSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            inner: Arc::new(SignalState {
                reason: OnceLock::new(),
                deadline: Some(deadline),
                parent: None,
            }),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Derives a signal that fires whenever `self` fires, but can also be cancelled
    /// on its own without affecting `self`. The child inherits the parent's deadline.
    pub fn child(&self) -> Self {
        Self {
            inner: Arc::new(SignalState {
                reason: OnceLock::new(),
                deadline: self.inner.deadline,
                parent: Some(self.clone()),
            }),
        }
    }

    /// Fires the signal. Returns `false` if it had already fired.
    pub fn cancel(&self) -> bool {
        self.fire(CancelReason::Cancelled)
    }

    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// The reason this signal fired, if it has.
    ///
    /// Called before every scanned row: ancestors are only asked for a recorded reason,
    /// and the clock is read at most once, against the inherited deadline.
    pub fn reason(&self) -> Option<CancelReason> {
        if let Some(reason) = self.inner.reason.get() {
            return Some(*reason);
        }

        if let Some(reason) = self.inner.parent.as_ref().and_then(|p| p.recorded()) {
            self.fire(reason);
            return self.inner.reason.get().copied();
        }

        if let Some(deadline) = self.inner.deadline {
            if Instant::now() >= deadline {
                self.fire(CancelReason::DeadlineExceeded);
                return self.inner.reason.get().copied();
            }
        }

        None
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// `Err` with the firing reason once the signal has fired.
    #[inline]
    pub fn check(&self) -> Result<(), CancelReason> {
        match self.reason() {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// First reason recorded on this signal or any ancestor, without reading the clock.
    fn recorded(&self) -> Option<CancelReason> {
        let mut current = Some(self);
        while let Some(signal) = current {
            if let Some(reason) = signal.inner.reason.get() {
                return Some(*reason);
            }
            current = signal.inner.parent.as_ref();
        }
        None
    }

    fn fire(&self, reason: CancelReason) -> bool {
        self.inner.reason.set(reason).is_ok()
    }
}
