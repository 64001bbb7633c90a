use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::internal::data_types::SourceId;
use crate::internal::events::InternalCmd;

/// one-shot expiry callbacks, keyed by source
pub trait ExpiryTimer {
    /// arms a timer for `deadline`, replacing any timer already pending for the source
    fn schedule(&mut self, source: &str, deadline: Instant);
    fn cancel(&mut self, source: &str);
    fn cancel_all(&mut self);
}

/// spawns a sleeping task per source. when it wakes, an `InternalCmd::Expired` is sent back to
/// the background thread, which owns the buffer
pub struct TokioTimer {
    cmd_tx: mpsc::UnboundedSender<InternalCmd>,
    pending: HashMap<SourceId, JoinHandle<()>>,
}

impl TokioTimer {
    pub fn new(cmd_tx: mpsc::UnboundedSender<InternalCmd>) -> Self {
        Self {
            cmd_tx,
            pending: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl ExpiryTimer for TokioTimer {
    fn schedule(&mut self, source: &str, deadline: Instant) {
        // finished tasks are left in the map until their source is touched again
        self.pending.retain(|_, handle| !handle.is_finished());

        let tx = self.cmd_tx.clone();
        let src: SourceId = source.into();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Err(e) = tx.send(InternalCmd::Expired {
                source: src.clone(),
                deadline,
            }) {
                log::debug!("failed to deliver expiry for source {}: {}", &src, e);
            }
        });
        if let Some(old) = self.pending.insert(source.into(), handle) {
            old.abort();
        }
    }

    fn cancel(&mut self, source: &str) {
        if let Some(handle) = self.pending.remove(source) {
            handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}

impl Drop for TokioTimer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
