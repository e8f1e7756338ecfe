//! Left-to-right aggregation over independent fallible sources.
//!
//! [`and`] and [`or`] combine an ordered sequence of [`Fetch`] sources
//! (ready containers, futures, or thunks) into one aggregate container.
//! Elements are resolved strictly sequentially in index order, never
//! scatter-gather, so short-circuiting also guarantees that later thunks
//! never run and later futures are never polled.

use crate::outcome::{Outcome, err, ok};
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// One element of an aggregate call: a container that may still need to be
/// produced or awaited.
///
/// A closed set of source shapes, matched exhaustively by
/// [`Fetch::resolve`]. All stored callbacks and futures are `Send + 'static`
/// so aggregates can cross executor threads.
#[must_use]
pub enum Fetch<T, E> {
    /// A container that already exists.
    Ready(Outcome<T, E>),
    /// A container still being produced; awaited on resolution.
    Deferred(BoxFuture<'static, Outcome<T, E>>),
    /// A synchronous thunk; invoked on resolution.
    Thunk(Box<dyn FnOnce() -> Outcome<T, E> + Send>),
    /// An asynchronous thunk; invoked, then awaited, on resolution.
    ThunkDeferred(Box<dyn FnOnce() -> BoxFuture<'static, Outcome<T, E>> + Send>),
}

impl<T, E> Fetch<T, E> {
    /// Wraps an existing container.
    #[inline]
    pub const fn ready(outcome: Outcome<T, E>) -> Self {
        Self::Ready(outcome)
    }

    /// Wraps a future of a container.
    #[inline]
    pub fn defer<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Outcome<T, E>> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    /// Wraps a synchronous thunk producing a container.
    #[inline]
    pub fn thunk<F>(f: F) -> Self
    where
        F: FnOnce() -> Outcome<T, E> + Send + 'static,
    {
        Self::Thunk(Box::new(f))
    }

    /// Wraps an asynchronous thunk producing a container.
    #[inline]
    pub fn thunk_defer<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Outcome<T, E>> + Send + 'static,
    {
        Self::ThunkDeferred(Box::new(
            move || -> BoxFuture<'static, Outcome<T, E>> { Box::pin(f()) },
        ))
    }

    /// Produces the container: invokes the thunk if there is one, then
    /// awaits if the result is still pending.
    pub async fn resolve(self) -> Outcome<T, E> {
        match self {
            Self::Ready(outcome) => outcome,
            Self::Deferred(future) => future.await,
            Self::Thunk(f) => f(),
            Self::ThunkDeferred(f) => f().await,
        }
    }

    pub(crate) const fn label(&self) -> &'static str {
        match self {
            Self::Ready(_) => "ready",
            Self::Deferred(_) => "deferred",
            Self::Thunk(_) => "thunk",
            Self::ThunkDeferred(_) => "thunk_defer",
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Fetch<T, E> {
    #[inline]
    fn from(outcome: Outcome<T, E>) -> Self {
        Self::Ready(outcome)
    }
}

impl<T: fmt::Debug, E: fmt::Debug> fmt::Debug for Fetch<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(outcome) => f.debug_tuple("Ready").field(outcome).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
            Self::Thunk(_) => f.write_str("Thunk(..)"),
            Self::ThunkDeferred(_) => f.write_str("ThunkDeferred(..)"),
        }
    }
}

/// Resolves `sources` left to right, stopping at the first failure.
///
/// A failed element is returned immediately; later elements are never
/// resolved and later thunks never run. If every element succeeds, the
/// unwrapped payloads are returned in input order, independent of any
/// completion timing, as `ok(Vec<T>)`. An empty input yields `ok(vec![])`.
///
/// # Examples
///
/// ```rust
/// use shunt::aggregate::{self, Fetch};
/// use shunt::ok;
///
/// # tokio_test::block_on(async {
/// let out = aggregate::and(vec![
///     Fetch::ready(ok::<_, String>(1)),
///     Fetch::thunk(|| ok(2)),
///     Fetch::thunk_defer(|| async { ok(3) }),
/// ])
/// .await;
/// assert_eq!(out, ok(vec![1, 2, 3]));
/// # });
/// ```
pub async fn and<T, E, I>(sources: I) -> Outcome<Vec<T>, E>
where
    I: IntoIterator<Item = Fetch<T, E>>,
{
    let mut values = Vec::new();
    for (index, source) in sources.into_iter().enumerate() {
        match source.resolve().await {
            Outcome::Ok(value) => values.push(value),
            Outcome::Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(index, "aggregate::and short-circuited on failure");
                #[cfg(not(feature = "tracing"))]
                let _ = index;
                return err(error);
            }
        }
    }
    ok(values)
}

/// Resolves `sources` left to right, stopping at the first success.
///
/// A successful element is returned immediately; later elements are never
/// resolved and later thunks never run. If every element fails, the last
/// failure encountered is returned.
///
/// # Panics
///
/// Panics on an empty input: there is no failure to report and no success
/// to return. Callers must supply at least one source.
pub async fn or<T, E, I>(sources: I) -> Outcome<T, E>
where
    I: IntoIterator<Item = Fetch<T, E>>,
{
    let mut last_error = None;
    for (index, source) in sources.into_iter().enumerate() {
        match source.resolve().await {
            Outcome::Ok(value) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(index, "aggregate::or short-circuited on success");
                #[cfg(not(feature = "tracing"))]
                let _ = index;
                return ok(value);
            }
            Outcome::Err(error) => last_error = Some(error),
        }
    }
    match last_error {
        Some(error) => err(error),
        None => panic!("aggregate::or requires at least one source"),
    }
}
