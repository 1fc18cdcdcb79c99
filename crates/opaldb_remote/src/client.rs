//! Remote client and its execution context.

use crate::collection::RemoteCollection;
use crate::completion::Completion;
use crate::error::{RemoteError, RemoteResult};
use crate::transport::RemoteTransport;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Shared state behind a [`RemoteClient`] and its collections.
pub(crate) struct ClientInner {
    transport: Arc<dyn RemoteTransport>,
    // Taken in Drop so shutdown never blocks a finalizer thread.
    runtime: Option<Runtime>,
}

impl ClientInner {
    /// Returns a clone of the transport for a dispatched job.
    pub(crate) fn transport(&self) -> Arc<dyn RemoteTransport> {
        Arc::clone(&self.transport)
    }

    /// Runs `job` on the execution context and fulfills `completion` with
    /// its result.
    pub(crate) fn dispatch<T, F>(&self, job: F, completion: Completion<T>)
    where
        T: Send + 'static,
        F: FnOnce() -> RemoteResult<T> + Send + 'static,
    {
        match self.runtime.as_ref() {
            Some(runtime) => {
                runtime.spawn_blocking(move || completion.complete(job()));
            }
            None => completion.complete(Err(RemoteError::Cancelled)),
        }
    }
}

impl Drop for ClientInner {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            // Queued jobs are dropped; their completions deliver
            // cancellation. Jobs already running finish on detached
            // workers and complete normally.
            runtime.shutdown_background();
        }
    }
}

/// A client for a remote document service.
///
/// The client owns a small multi-thread runtime: the execution context on
/// which every operation runs and every completion fires. Collections
/// obtained from the client keep the context alive, so releasing the
/// client while collections are still in use is safe.
pub struct RemoteClient {
    inner: Arc<ClientInner>,
}

impl RemoteClient {
    /// Creates a client over the given transport.
    pub fn new(transport: impl RemoteTransport + 'static) -> RemoteResult<Self> {
        Self::with_transport(Arc::new(transport))
    }

    /// Creates a client over a shared transport.
    pub fn with_transport(transport: Arc<dyn RemoteTransport>) -> RemoteResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("opaldb-remote")
            .enable_all()
            .build()
            .map_err(|e| RemoteError::Executor(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                runtime: Some(runtime),
            }),
        })
    }

    /// Returns a proxy for the named collection.
    pub fn collection(&self, database: &str, collection: &str) -> RemoteCollection {
        RemoteCollection::new(Arc::clone(&self.inner), database, collection)
    }
}

impl std::fmt::Debug for RemoteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClient").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;

    #[test]
    fn client_creates_collections() {
        let client = RemoteClient::new(MockTransport::new()).unwrap();
        let collection = client.collection("test_data", "events");
        assert_eq!(collection.database(), "test_data");
        assert_eq!(collection.name(), "events");
    }

    #[test]
    fn collections_outlive_the_client() {
        let client = RemoteClient::new(MockTransport::new()).unwrap();
        let collection = client.collection("test_data", "events");
        drop(client);

        // The shared execution context is still alive.
        assert_eq!(collection.database(), "test_data");
    }
}
