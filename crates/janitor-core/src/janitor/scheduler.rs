// Copyright 2025 Dotanuki Labs
// SPDX-License-Identifier: MIT

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{oneshot, watch};

pub const DEFAULT_CLEANUP_DELAY: Duration = Duration::from_secs(30);

const ARMED: u8 = 0;
const FIRED: u8 = 1;
const CANCELLED: u8 = 2;

pub type ScheduledCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

struct PendingRun {
    state: Arc<AtomicU8>,
    cancellation: Option<oneshot::Sender<()>>,
    settled: watch::Receiver<bool>,
}

impl PendingRun {
    fn cancel(&mut self) -> bool {
        let cancelled = self
            .state
            .compare_exchange(ARMED, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();

        if let Some(sender) = self.cancellation.take() {
            let _ = sender.send(());
        }

        cancelled
    }

    fn is_armed(&self) -> bool {
        self.state.load(Ordering::SeqCst) == ARMED
    }
}

/// Runs a single callback once, after a fixed delay, unless cancelled before the delay elapses.
///
/// Scheduling again before the timer fires replaces the pending timer. Cancelling after the
/// timer fired does nothing and never interrupts a callback already running. Dropping the
/// scheduler cancels a pending timer.
///
/// Requires a running tokio runtime when `schedule` is called.
pub struct RunOnceScheduler {
    delay: Duration,
    callback: ScheduledCallback,
    pending: Mutex<Option<PendingRun>>,
}

impl RunOnceScheduler {
    pub fn new<F>(callback: F, delay: Duration) -> Self
    where
        F: Fn() -> BoxFuture<'static, ()> + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<PendingRun>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn schedule(&self) {
        let mut pending = self.pending();

        if let Some(mut previous) = pending.take()
            && previous.cancel()
        {
            log::debug!("[janitor.scheduler] replacing pending run");
        }

        let state = Arc::new(AtomicU8::new(ARMED));
        let (cancellation, cancelled) = oneshot::channel::<()>();
        let (settle, settled) = watch::channel(false);

        let delay = self.delay;
        let callback = self.callback.clone();
        let run_state = state.clone();

        tokio::spawn(async move {
            let elapsed = tokio::select! {
                _ = tokio::time::sleep(delay) => true,
                _ = cancelled => false,
            };

            let fired = elapsed
                && run_state
                    .compare_exchange(ARMED, FIRED, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok();

            if fired {
                callback().await;
            } else {
                run_state.store(CANCELLED, Ordering::SeqCst);
            }

            settle.send_replace(true);
        });

        *pending = Some(PendingRun {
            state,
            cancellation: Some(cancellation),
            settled,
        });
    }

    /// Returns whether a pending run was actually cancelled
    pub fn cancel(&self) -> bool {
        let cancelled = self.pending().as_mut().is_some_and(PendingRun::cancel);

        if cancelled {
            log::info!("[janitor.scheduler] pending run cancelled");
        }

        cancelled
    }

    pub fn is_scheduled(&self) -> bool {
        self.pending().as_ref().is_some_and(PendingRun::is_armed)
    }

    /// Waits until the latest scheduled run settles, either cancelled or fully executed
    pub async fn join(&self) {
        let maybe_settled = self.pending().as_ref().map(|run| run.settled.clone());

        let Some(mut settled) = maybe_settled else {
            return;
        };

        if settled.wait_for(|done| *done).await.is_err() {
            log::warn!("[janitor.scheduler] scheduled run ended abruptly");
        }
    }
}

impl Drop for RunOnceScheduler {
    fn drop(&mut self) {
        let _ = self.cancel();
    }
}
