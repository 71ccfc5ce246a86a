//! Blocks resubmission while a request is in flight.
//!
//! A page holds one [`RequestGate`] per action (for example the predict
//! button). Submitting while the previous request is still pending is
//! refused instead of starting a second request.
//!
//! The gate is [`Clone`] so a front end that runs submissions concurrently
//! (several tasks sharing one page) can hand each task a handle. Callers
//! that already serialise requests through `&mut` access never contend.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Admits at most one request at a time.
#[derive(Debug, Clone, Default)]
pub struct RequestGate {
    busy: Arc<AtomicBool>,
}

/// Proof that a request was admitted. The gate reopens when this is dropped.
#[derive(Debug)]
pub struct RequestPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for RequestPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl RequestGate {
    /// Whether a request is currently in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Admits a request, or returns `None` if one is already pending.
    #[must_use]
    pub fn try_begin(&self) -> Option<RequestPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RequestPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    /// Runs `request` if the gate is open. Returns `None` without polling
    /// `request` when another request is pending.
    pub async fn run<F: Future>(&self, request: F) -> Option<F::Output> {
        let Some(_permit) = self.try_begin() else {
            log::debug!("Request already in flight, ignoring resubmission");
            return None;
        };
        Some(request.await)
    }
}
