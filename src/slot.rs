//! One-shot result slots for the thread-based strategy.
//!
//! A slot carries exactly one hit count from one worker to the aggregator.
//! [`ResultSender::send`] consumes the sender and [`ResultReceiver::wait`]
//! consumes the receiver, so a slot is written at most once and read at most
//! once. The read blocks until the write lands, which is what makes detaching a
//! worker thread safe: a value observed through the receiver was the worker's
//! final action. A sender dropped without a value (the worker panicked or
//! returned early) wakes the receiver with [`HandleError::Abandoned`].

use tokio::sync::oneshot;

use crate::aggregator::ResultHandle;
use crate::error::HandleError;

pub fn channel() -> (ResultSender, ResultReceiver) {
    let (tx, rx) = oneshot::channel();
    (ResultSender { tx }, ResultReceiver { rx })
}

/// Producer side, owned by exactly one worker.
#[derive(Debug)]
pub struct ResultSender {
    tx: oneshot::Sender<u64>,
}

impl ResultSender {
    /// Publish the worker's hit count. A receiver that has already gone away
    /// is not an error for the worker.
    pub fn send(self, hits: u64) {
        let _ = self.tx.send(hits);
    }
}

/// Consumer side, owned by the aggregator.
#[derive(Debug)]
pub struct ResultReceiver {
    rx: oneshot::Receiver<u64>,
}

impl ResultReceiver {
    /// Block the calling thread until the worker writes its result.
    ///
    /// Must not be called from inside an async runtime.
    pub fn wait(self) -> Result<u64, HandleError> {
        self.rx.blocking_recv().map_err(|_| HandleError::Abandoned)
    }
}

impl ResultHandle for ResultReceiver {
    fn resolve(self) -> Result<u64, HandleError> {
        self.wait()
    }
}
