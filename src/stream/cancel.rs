//! Cancellation tokens
//!
//! A token is a shared flag plus a broadcast signal. The flag is what
//! producers poll between node visits; the signal is a channel whose only
//! sender is dropped on cancel, so every clone of the receiver becomes ready
//! at once and a producer blocked on a full buffer can `select!` on it.
//!
//! Tokens chain upstream: a pipeline stage's token is `downstream()` of the
//! token of the stream it reads. Cancelling a token cancels its whole
//! upstream chain and leaves downstream tokens untouched.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;

/// Shared, idempotent cancellation signal
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

struct TokenInner {
    cancelled: AtomicBool,
    /// Dropped exactly once, on the first cancel
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
    upstream: Option<CancelToken>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    /// Create a root token
    pub fn new() -> Self {
        Self::with_upstream(None)
    }

    fn with_upstream(upstream: Option<CancelToken>) -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        CancelToken {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                signal,
                upstream,
            }),
        }
    }

    /// Create a token whose cancellation also cancels this one
    pub fn downstream(&self) -> Self {
        Self::with_upstream(Some(self.clone()))
    }

    /// Cancel this token and every token upstream of it
    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            drop(self.inner.trigger.lock().take());
        }
        if let Some(upstream) = &self.inner.upstream {
            upstream.cancel();
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Receiver that becomes ready (disconnected) once the token is cancelled
    #[inline]
    pub fn signal(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}
