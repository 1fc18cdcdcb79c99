//! Single-shot operation completions.

use crate::error::{RemoteError, RemoteResult};

type Observer<T> = Box<dyn FnOnce(RemoteResult<T>) + Send>;

/// A single-shot observer of an asynchronous operation's result.
///
/// The observer is invoked exactly once: by [`Completion::complete`], or
/// with [`RemoteError::Cancelled`] if the completion is dropped
/// unfulfilled (for example because the execution context shut down with
/// the operation still queued). `complete` consumes the completion, so a
/// second fulfillment is unrepresentable.
pub struct Completion<T> {
    observer: Option<Observer<T>>,
}

impl<T> Completion<T> {
    /// Creates a completion from an observer callback.
    ///
    /// The observer must be `Send`: it may run on any thread of the
    /// client's execution context.
    pub fn new(observer: impl FnOnce(RemoteResult<T>) + Send + 'static) -> Self {
        Self {
            observer: Some(Box::new(observer)),
        }
    }

    /// Fulfills the completion with the operation's result.
    pub fn complete(mut self, result: RemoteResult<T>) {
        if let Some(observer) = self.observer.take() {
            observer(result);
        }
    }
}

impl<T> Drop for Completion<T> {
    fn drop(&mut self) {
        if let Some(observer) = self.observer.take() {
            tracing::debug!("completion dropped unfulfilled, delivering cancellation");
            observer(Err(RemoteError::Cancelled));
        }
    }
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("fulfilled", &self.observer.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn complete_invokes_observer_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let completion = Completion::new(move |result: RemoteResult<i64>| {
            assert_eq!(result.unwrap(), 7);
            seen.fetch_add(1, Ordering::SeqCst);
        });
        completion.complete(Ok(7));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_without_complete_delivers_cancellation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let completion = Completion::new(move |result: RemoteResult<i64>| {
            assert!(matches!(result, Err(RemoteError::Cancelled)));
            seen.fetch_add(1, Ordering::SeqCst);
        });
        drop(completion);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn complete_then_drop_invokes_observer_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        {
            let completion =
                Completion::new(move |_: RemoteResult<()>| {
                    seen.fetch_add(1, Ordering::SeqCst);
                });
            completion.complete(Ok(()));
            // completion already consumed; nothing further happens at scope end
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_results_are_passed_through() {
        let completion = Completion::new(|result: RemoteResult<i64>| {
            assert!(matches!(result, Err(RemoteError::Service(_))));
        });
        completion.complete(Err(RemoteError::Service("boom".into())));
    }
}
