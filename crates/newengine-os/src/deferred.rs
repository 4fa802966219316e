use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::{HostError, HostResult};

pub type DeferredCall = Box<dyn FnOnce() + Send + 'static>;

/// Calls queued for the main loop.
///
/// Producers hold a [`DeferredSender`] and may live on any thread.
/// The owning context is the only consumer and drains once per iteration,
/// on whichever thread currently owns it.
pub struct DeferredQueue {
    tx: Sender<DeferredCall>,
    rx: Receiver<DeferredCall>,
}

impl Default for DeferredQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    #[inline]
    pub fn sender(&self) -> DeferredSender {
        DeferredSender {
            tx: self.tx.clone(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Runs queued calls until the queue is empty, including calls queued
    /// while flushing. Returns how many ran.
    pub fn flush(&self) -> usize {
        let mut n = 0usize;
        while let Ok(call) = self.rx.try_recv() {
            call();
            n += 1;
        }
        n
    }
}

#[derive(Clone)]
pub struct DeferredSender {
    tx: Sender<DeferredCall>,
}

impl DeferredSender {
    pub fn call_deferred<F>(&self, f: F) -> HostResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .send(Box::new(f))
            .map_err(|_| HostError::Failed("deferred queue is closed".into()))
    }
}
