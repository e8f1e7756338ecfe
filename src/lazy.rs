//! Deferred evaluation pipeline over success-or-failure containers.
//!
//! A [`Lazy`] records an ordered chain of combinator steps against a source
//! that may not exist yet (a ready container, a future of one, or a thunk)
//! and runs nothing until [`Lazy::eval`]. Synchronous and asynchronous steps
//! mix freely in one chain; evaluation walks the steps strictly in
//! attachment order, awaiting each asynchronous callback before the next
//! step runs. Once the state is failed, every success-only step is skipped
//! (its callback never invoked) until an `or`/`or_else` flips the state
//! back, and vice versa.
//!
//! ```rust
//! use shunt::{lazy, ok};
//!
//! # tokio_test::block_on(async {
//! let out = lazy(ok::<_, String>(1))
//!     .map(|n| n + 1)
//!     .filter_or(|n| *n > 1, |n| format!("{n} is too small"))
//!     .eval()
//!     .await;
//! assert_eq!(out, ok(2));
//! # });
//! ```

use crate::aggregate::Fetch;
use crate::outcome::{Filtered, Outcome};
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;

/// Wraps `source` in a pipeline without evaluating it.
///
/// Accepts anything convertible to a [`Fetch`]: a ready [`Outcome`] or an
/// explicitly constructed future/thunk source.
pub fn lazy<T, E>(source: impl Into<Fetch<T, E>>) -> Lazy<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    Lazy::new(source.into())
}

/// A deferred combinator pipeline, consumed once by [`Lazy::eval`].
///
/// Every fluent call consumes the builder and returns a new one with the
/// step appended; no user-supplied callback runs before `eval()`. The
/// `Display` impl renders a structural trace of the recorded chain, purely
/// diagnostic and not load-bearing for evaluation.
#[must_use = "a Lazy pipeline does nothing until `eval()` is awaited"]
pub struct Lazy<T, E> {
    step: BoxFuture<'static, Outcome<T, E>>,
    trace: Trace,
}

#[derive(Debug, Clone)]
struct Trace {
    source: &'static str,
    ops: Vec<&'static str>,
}

impl Trace {
    fn push(mut self, op: &'static str) -> Self {
        self.ops.push(op);
        self
    }
}

fn applied(op: &'static str, applies: bool) {
    #[cfg(feature = "tracing")]
    tracing::trace!(op, applies, "pipeline step");
    #[cfg(not(feature = "tracing"))]
    let _ = (op, applies);
}

impl<T, E> Lazy<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Wraps `source` without evaluating it.
    pub fn new(source: Fetch<T, E>) -> Self {
        let label = source.label();
        Self {
            step: Box::pin(source.resolve()),
            trace: Trace {
                source: label,
                ops: Vec::new(),
            },
        }
    }

    /// Appends a `map` step: transforms the success payload, re-wrapping
    /// the result in `Ok`. Skipped on a failed state.
    pub fn map<U, F>(self, f: F) -> Lazy<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("map", state.is_ok());
                state.map(f)
            }),
            trace: trace.push("map"),
        }
    }

    /// Appends an asynchronous `map` step; the produced future is awaited
    /// and its output re-wrapped in `Ok`. Skipped on a failed state.
    pub fn map_async<U, F, Fut>(self, f: F) -> Lazy<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("map_async", state.is_ok());
                match state {
                    Outcome::Ok(value) => Outcome::Ok(f(value).await),
                    Outcome::Err(error) => Outcome::Err(error),
                }
            }),
            trace: trace.push("map_async"),
        }
    }

    /// Appends an `and` step: substitutes `other` on a successful state,
    /// returned verbatim. Skipped on a failed state.
    pub fn and<U>(self, other: Outcome<U, E>) -> Lazy<U, E>
    where
        U: Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("and", state.is_ok());
                state.and(other)
            }),
            trace: trace.push("and"),
        }
    }

    /// Appends an `and_then` step: applies `f` to the success payload and
    /// adopts its result verbatim. Skipped (callback not invoked) on a
    /// failed state.
    pub fn and_then<U, F>(self, f: F) -> Lazy<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Outcome<U, E> + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("and_then", state.is_ok());
                state.and_then(f)
            }),
            trace: trace.push("and_then"),
        }
    }

    /// Appends an asynchronous `and_then` step; the produced future is
    /// awaited before the next step runs. Skipped on a failed state.
    pub fn and_then_async<U, F, Fut>(self, f: F) -> Lazy<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Outcome<U, E>> + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("and_then_async", state.is_ok());
                match state {
                    Outcome::Ok(value) => f(value).await,
                    Outcome::Err(error) => Outcome::Err(error),
                }
            }),
            trace: trace.push("and_then_async"),
        }
    }

    /// Appends an `or` step: substitutes `other` on a failed state,
    /// returned verbatim. Skipped on a successful state.
    pub fn or<F2>(self, other: Outcome<T, F2>) -> Lazy<T, F2>
    where
        F2: Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("or", state.is_err());
                state.or(other)
            }),
            trace: trace.push("or"),
        }
    }

    /// Appends an `or_else` step: applies `f` to the error value and adopts
    /// its result verbatim. Skipped (callback not invoked) on a successful
    /// state.
    pub fn or_else<F2, O>(self, f: O) -> Lazy<T, F2>
    where
        F2: Send + 'static,
        O: FnOnce(E) -> Outcome<T, F2> + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("or_else", state.is_err());
                state.or_else(f)
            }),
            trace: trace.push("or_else"),
        }
    }

    /// Appends an asynchronous `or_else` step; the produced future is
    /// awaited before the next step runs. Skipped on a successful state.
    pub fn or_else_async<F2, O, Fut>(self, f: O) -> Lazy<T, F2>
    where
        F2: Send + 'static,
        O: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = Outcome<T, F2>> + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("or_else_async", state.is_err());
                match state {
                    Outcome::Ok(value) => Outcome::Ok(value),
                    Outcome::Err(error) => f(error).await,
                }
            }),
            trace: trace.push("or_else_async"),
        }
    }

    /// Appends a `filter` step downgrading a rejected payload to the
    /// deterministic default failure [`Filtered`]. Skipped on an
    /// already-failed state.
    pub fn filter<P>(self, pred: P) -> Lazy<T, E>
    where
        P: FnOnce(&T) -> bool + Send + 'static,
        T: fmt::Debug,
        E: From<Filtered>,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("filter", state.is_ok());
                state.filter_or(pred, |value| E::from(Filtered::of(&value)))
            }),
            trace: trace.push("filter"),
        }
    }

    /// Appends a `filter` step with a caller-supplied failure constructor
    /// receiving the rejected payload. Skipped on an already-failed state.
    pub fn filter_or<P, G>(self, pred: P, on_fail: G) -> Lazy<T, E>
    where
        P: FnOnce(&T) -> bool + Send + 'static,
        G: FnOnce(T) -> E + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("filter_or", state.is_ok());
                state.filter_or(pred, on_fail)
            }),
            trace: trace.push("filter_or"),
        }
    }

    /// Appends a `filter` step whose predicate is asynchronous; its boolean
    /// result is awaited before deciding. The predicate receives a reference
    /// but must return an owned (`'static`) future, so it clones what it
    /// needs. Skipped on an already-failed state.
    pub fn filter_or_async<P, Fut, G>(self, pred: P, on_fail: G) -> Lazy<T, E>
    where
        P: FnOnce(&T) -> Fut + Send + 'static,
        Fut: Future<Output = bool> + Send + 'static,
        G: FnOnce(T) -> E + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("filter_or_async", state.is_ok());
                match state {
                    Outcome::Ok(value) => {
                        if pred(&value).await {
                            Outcome::Ok(value)
                        } else {
                            Outcome::Err(on_fail(value))
                        }
                    }
                    Outcome::Err(error) => Outcome::Err(error),
                }
            }),
            trace: trace.push("filter_or_async"),
        }
    }

    /// Appends a `tee` step running `f` for its side effect on the success
    /// payload; the state passes through unchanged. Skipped on a failed
    /// state.
    pub fn tee<F>(self, f: F) -> Lazy<T, E>
    where
        F: FnOnce(&T) + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("tee", state.is_ok());
                state.tee(f)
            }),
            trace: trace.push("tee"),
        }
    }

    /// Appends an asynchronous `tee` step; its side effect completes before
    /// the next step runs. The callback receives a reference but must return
    /// an owned (`'static`) future. Skipped on a failed state.
    pub fn tee_async<F, Fut>(self, f: F) -> Lazy<T, E>
    where
        F: FnOnce(&T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Self { step, trace } = self;
        Lazy {
            step: Box::pin(async move {
                let state = step.await;
                applied("tee_async", state.is_ok());
                match state {
                    Outcome::Ok(value) => {
                        f(&value).await;
                        Outcome::Ok(value)
                    }
                    Outcome::Err(error) => Outcome::Err(error),
                }
            }),
            trace: trace.push("tee_async"),
        }
    }

    /// Evaluates the pipeline: resolves the source, walks the recorded
    /// steps strictly in attachment order, and returns the final container
    /// as-is. The sole execution entry point; consumes the pipeline.
    pub async fn eval(self) -> Outcome<T, E> {
        #[cfg(feature = "tracing")]
        tracing::trace!(pipeline = %self, "evaluating pipeline");
        self.step.await
    }
}

impl<T, E> fmt::Display for Lazy<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lazy(<{}>)", self.trace.source)?;
        for op in &self.trace.ops {
            write!(f, ".{op}(..)")?;
        }
        Ok(())
    }
}

impl<T, E> fmt::Debug for Lazy<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("source", &self.trace.source)
            .field("ops", &self.trace.ops)
            .finish_non_exhaustive()
    }
}
