//! Cancellable quiet-period timer.
//!
//! Every pushed value replaces the pending one and restarts the timer; the
//! value still pending when the timer fires is handed to the apply callback.
//! A single worker task owns the timer, so at most one value is pending at a
//! time and superseded values are dropped without ever being applied.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::debug;

enum DebounceInput<T> {
    Value { value: T, at: Instant },
    Cancel,
}

pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<DebounceInput<T>>,
    worker: JoinHandle<()>,
    quiet: Duration,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the timer task on the current Tokio runtime.
    pub fn spawn<F>(quiet: Duration, apply: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_timer(quiet, rx, apply));
        Self { tx, worker, quiet }
    }

    /// Restarts the quiet period with `value` pending.
    pub fn push(&self, value: T) {
        let input = DebounceInput::Value {
            value,
            at: Instant::now(),
        };
        if self.tx.send(input).is_err() {
            debug!("debounce worker stopped; dropping input");
        }
    }

    /// Drops the pending value, if any.
    pub fn cancel(&self) {
        let _ = self.tx.send(DebounceInput::Cancel);
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run_timer<T, F>(quiet: Duration, mut rx: mpsc::UnboundedReceiver<DebounceInput<T>>, mut apply: F)
where
    F: FnMut(T),
{
    let mut pending: Option<T> = None;
    let timer = sleep_until(Instant::now() + quiet);
    tokio::pin!(timer);

    loop {
        // queued input first: a cancel must win over an expired timer
        tokio::select! {
            biased;

            input = rx.recv() => match input {
                Some(DebounceInput::Value { value, at }) => {
                    pending = Some(value);
                    timer.as_mut().reset(at + quiet);
                }
                Some(DebounceInput::Cancel) => {
                    pending = None;
                }
                None => break,
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(value) = pending.take() {
                    apply(value);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/debounce_tests.rs"]
mod tests;
