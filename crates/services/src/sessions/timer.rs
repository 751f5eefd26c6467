use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use super::engine::AdvanceTicket;

/// Delivers an [`AdvanceTicket`] back to the event loop once the reveal delay passes.
///
/// At most one delivery is pending. Scheduling again, [`RevealTimer::cancel`], or
/// dropping the timer aborts the pending one. Must be used inside a tokio runtime.
#[derive(Debug, Default)]
pub struct RevealTimer {
    pending: Option<JoinHandle<()>>,
}

impl RevealTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        ticket: AdvanceTicket,
        delay: Duration,
        tx: UnboundedSender<AdvanceTicket>,
    ) {
        self.cancel();
        debug!(?ticket, ?delay, "auto-advance scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // the receiver is gone once the session has been torn down
            let _ = tx.send(ticket);
        }));
    }

    /// Abort the pending delivery. Returns whether one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                debug!("auto-advance cancelled");
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RevealTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
