//! Collects JSON RPC envelopes issued within one batch window so they go out
//! to the node as a single batch request.
//!
//! The queue itself does not send anything. The first push of a window tells
//! its caller to schedule a flush (on the transport's serialization lock),
//! and that flush waits for the window to close before taking everything
//! that was pushed in the meantime. Pushes that happen after the take open
//! the next window, so they never join a batch that is already in flight.

use std::{num::NonZeroUsize, sync::Mutex, time::Duration};

/// Batching configuration.
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    /// Caps the number of envelopes in one wire request. Windows holding
    /// more are sent as several consecutive batches. `None` sends every
    /// window as a single request.
    pub max_batch_len: Option<NonZeroUsize>,
    /// Extra time a window stays open after its first envelope, before the
    /// queue has to settle.
    pub batch_delay: Duration,
}

#[derive(Debug)]
pub struct BatchQueue<T> {
    state: Mutex<State<T>>,
    config: Configuration,
}

#[derive(Debug)]
struct State<T> {
    items: Vec<T>,
    flush_scheduled: bool,
}

impl<T> BatchQueue<T> {
    pub fn new(config: Configuration) -> Self {
        Self {
            state: Mutex::new(State {
                items: Vec::new(),
                flush_scheduled: false,
            }),
            config,
        }
    }

    /// Appends `item` to the current window. Returns `true` if this opened
    /// the window, in which case the caller has to schedule exactly one
    /// flush.
    pub fn push(&self, item: T) -> bool {
        let mut state = self.state.lock().unwrap();
        state.items.push(item);
        !std::mem::replace(&mut state.flush_scheduled, true)
    }

    /// Waits until the current window closes: after `batch_delay`, once the
    /// queue length is unchanged across a scheduler yield.
    ///
    /// A caller that keeps pushing in every tick keeps the window open.
    pub async fn close_window(&self) {
        if !self.config.batch_delay.is_zero() {
            tokio::time::sleep(self.config.batch_delay).await;
        }
        loop {
            let before = self.len();
            tokio::task::yield_now().await;
            if self.len() == before {
                break;
            }
        }
    }

    /// Takes everything queued so far, split into wire sized batches, and
    /// resets the window.
    pub fn take(&self) -> Vec<Vec<T>> {
        let items = {
            let mut state = self.state.lock().unwrap();
            state.flush_scheduled = false;
            std::mem::take(&mut state.items)
        };
        if items.is_empty() {
            return Vec::new();
        }

        let Some(max_batch_len) = self.config.max_batch_len else {
            return vec![items];
        };
        let max_batch_len = max_batch_len.get();
        let mut batches = Vec::with_capacity(items.len().div_ceil(max_batch_len));
        let mut items = items.into_iter().peekable();
        while items.peek().is_some() {
            batches.push(items.by_ref().take(max_batch_len).collect());
        }
        batches
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
