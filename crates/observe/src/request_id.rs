//! Task local request ids.
//!
//! A caller can tag everything it does with one id by running its futures
//! inside [`scoped`]. The RPC transports read the id back with [`current`]
//! and forward it in the `X-REQUEST-ID` header so node side logs can be
//! matched with ours. Work that hops onto another task (the serialization
//! lock runs queued work on its own task) keeps the id by wrapping it with
//! [`bind_current`] before handing it over.
use std::future::Future;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Returns the id of the current task or `None` outside of a [`scoped`]
/// future.
pub fn current() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

/// Runs `future` with `id` as its request id.
pub async fn scoped<F>(id: String, future: F) -> F::Output
where
    F: Future,
{
    REQUEST_ID.scope(id, future).await
}

/// Captures the request id of the calling task (if any) and returns a future
/// that runs `future` with that id, no matter which task ends up polling it.
pub fn bind_current<F>(future: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let id = current();
    async move {
        match id {
            Some(id) => scoped(id, future).await,
            None => future.await,
        }
    }
}
