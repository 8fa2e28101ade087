//! Trailing-edge debouncer.
//!
//! Values pushed in quick succession collapse into one: the handler runs with
//! the last value once no new value has arrived for the quiet period.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawn the debouncing task on the current runtime.
    pub fn spawn<F, Fut>(quiet: Duration, mut handler: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                let Some(value) = pending.take() else {
                    match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    }
                    continue;
                };

                tokio::select! {
                    next = rx.recv() => match next {
                        Some(newer) => pending = Some(newer),
                        // Owner dropped; an unsent value is abandoned.
                        None => break,
                    },
                    _ = tokio::time::sleep(quiet) => handler(value).await,
                }
            }
        });
        Self { tx, task }
    }

    /// Submit a value; returns false once the task has stopped.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
