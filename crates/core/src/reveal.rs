//! Cancellable fixed-interval loops that simulate streaming.
//!
//! The backend returns a complete response in one shot; the screen
//! reveals it progressively with two independent loops built on this
//! primitive: one appends sentences to the visible bubble, the other
//! appends queued bubbles to the message list. Both run until their
//! closure reports [`Step::Done`] or the owner cancels them.

use std::time::Duration;

use tokio::select;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

/// What a tick closure wants the loop to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Keep ticking.
    Continue,
    /// Stop the loop.
    Done,
}

/// Handle to a running reveal loop.
///
/// Dropping the handle does not stop the loop; the owner is expected to
/// call [`RevealHandle::cancel`] on every exit path. Cancelling an
/// already-stopped loop is a no-op.
pub struct RevealHandle {
    kill_tx: watch::Sender<bool>,
}

impl RevealHandle {
    /// Stops the loop. No further ticks fire after this returns,
    /// though a tick already dispatched may still be in flight.
    #[inline]
    pub fn cancel(&self) {
        self.kill_tx.send(true).ok();
    }
}

/// Spawns a loop that invokes `tick` once per `period` until the
/// closure returns [`Step::Done`] or the handle is cancelled. The first
/// tick fires one full period after the call.
pub fn spawn<F>(period: Duration, mut tick: F) -> RevealHandle
where
    F: FnMut() -> Step + Send + 'static,
{
    let (kill_tx, mut kill_rx) = watch::channel(false);
    tokio::spawn(async move {
        debug!("reveal loop started");
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            select! {
                biased;

                _ = kill_rx.changed() => {
                    debug!("reveal loop cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if tick() == Step::Done {
                        break;
                    }
                }
            }
        }
        debug!("reveal loop terminated");
    });
    RevealHandle { kill_tx }
}
