//! Per key FIFO serialization of async work.
//!
//! Every key owns a queue of jobs. The first submission for an idle key
//! spawns a runner task which pops and awaits jobs one at a time until the
//! queue is drained and then removes the queue again, so idle keys cost
//! nothing. Submissions arriving while a queue exists are only appended.

use {
    dashmap::{DashMap, mapref::entry::Entry},
    futures::{FutureExt as _, future::BoxFuture},
    std::{
        collections::VecDeque,
        fmt::{self, Debug, Formatter},
        future::Future,
        panic::AssertUnwindSafe,
        sync::{Arc, Mutex},
    },
    tokio::sync::oneshot,
};

/// Jobs are only ever moved in and out of the queue. The mutex makes the
/// table `Sync` for futures that are merely `Send`.
type Job = Mutex<BoxFuture<'static, ()>>;

/// Table of serialization queues keyed by string. Cloning yields another
/// handle to the same table.
#[derive(Clone, Default)]
pub struct LockTable {
    queues: Arc<DashMap<String, VecDeque<Job>>>,
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `task` to run once all work previously submitted for `key`
    /// has finished.
    ///
    /// The task is enqueued immediately, not when the returned future is
    /// first polled, so submission order is call order. Dropping the returned
    /// future does not cancel the task.
    pub fn acquire<T, F, Fut>(
        &self,
        key: impl Into<String>,
        task: F,
    ) -> impl Future<Output = T> + Send + 'static
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let key = key.into();
        let (sender, receiver) = oneshot::channel();
        let task = observe::request_id::bind_current(async move { task().await });
        let job = async move {
            match AssertUnwindSafe(task).catch_unwind().await {
                Ok(output) => {
                    let _ = sender.send(output);
                }
                // Dropping the sender hands the failure to this task's caller
                // only; the rest of the queue keeps going.
                Err(_) => tracing::warn!("serialized task panicked"),
            }
        }
        .boxed();

        if self.enqueue(&key, Mutex::new(job)) {
            self.spawn_runner(key);
        }

        // Resumes the task's panic in its own caller.
        async move { receiver.await.expect("serialized task panicked") }
    }

    /// Returns `true` if nothing is queued or running for `key`.
    pub fn is_idle(&self, key: &str) -> bool {
        !self.queues.contains_key(key)
    }

    /// Number of keys with queued or running work.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Appends `job` to the queue of `key` and returns whether the queue was
    /// newly created, i.e. whether the caller has to start a runner.
    fn enqueue(&self, key: &str, job: Job) -> bool {
        match self.queues.entry(key.to_string()) {
            Entry::Occupied(mut queue) => {
                queue.get_mut().push_back(job);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(VecDeque::from([job]));
                true
            }
        }
    }

    fn spawn_runner(&self, key: String) {
        let queues = self.queues.clone();
        tokio::task::spawn(async move {
            tracing::trace!(%key, "lock runner started");
            loop {
                let next = queues.get_mut(&key).and_then(|mut queue| queue.pop_front());
                if let Some(job) = next {
                    job.into_inner()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .await;
                    continue;
                }
                if let Some((_, queue)) = queues.remove_if(&key, |_, queue| queue.is_empty()) {
                    assert!(queue.is_empty(), "lock queue for {key} removed while not empty");
                    break;
                }
                // Either a job was appended between the pop and the removal
                // attempt, in which case we go around again, or somebody else
                // removed a queue this runner still owns.
                assert!(
                    queues.contains_key(&key),
                    "lock queue for {key} vanished while its runner was active"
                );
            }
            tracing::trace!(%key, "lock runner finished");
        });
    }
}

impl Debug for LockTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockTable")
            .field("active_keys", &self.queues.len())
            .finish()
    }
}
