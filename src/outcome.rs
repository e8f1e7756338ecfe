//! The success-or-failure container, its combinators, and panic capture.
//!
//! [`Outcome`] models success (`Ok`) or failure (`Err`) of a computation,
//! built with the [`ok`] and [`err`] factories. [`capture`] and
//! [`capture_async`] are the explicit helpers that route a host panic into
//! the modeled-failure channel as a [`Caught`] error.

use crate::maybe::Maybe;
use futures::FutureExt as _;
use std::any::Any;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use thiserror::Error;

/// Creates a successful [`Outcome`] holding `value`.
///
/// # Examples
///
/// ```rust
/// use shunt::{ok, Outcome};
///
/// let out: Outcome<i32, String> = ok(1);
/// assert!(out.is_ok());
/// ```
#[inline]
pub const fn ok<T, E>(value: T) -> Outcome<T, E> {
    Outcome::Ok(value)
}

/// Creates a failed [`Outcome`] holding `error`.
#[inline]
pub const fn err<T, E>(error: E) -> Outcome<T, E> {
    Outcome::Err(error)
}

/// Success-or-failure container: a payload (`Ok`) or an error value (`Err`).
///
/// The failure branch is a first-class value threaded explicitly through
/// every combinator, never panicked implicitly. [`Outcome::unwrap`] and
/// [`Outcome::expect`] are the only conversions from modeled failure back
/// into a host panic. Instances are immutable: combinators consume the
/// receiver and return a (possibly new) container.
///
/// With the `serde` feature enabled, `Outcome` serializes to the plain
/// tagged shape `{"ok": true, "value": v}` / `{"ok": false, "error": e}` and
/// deserializes from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub enum Outcome<T, E> {
    /// The computation succeeded.
    Ok(T),
    /// The computation failed.
    Err(E),
}

impl<T, E> Outcome<T, E> {
    /// Returns `true` on the success branch.
    #[inline]
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    /// Returns `true` on the failure branch.
    #[inline]
    #[must_use]
    pub const fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    /// Converts from `&Outcome<T, E>` to `Outcome<&T, &E>`.
    #[inline]
    pub const fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Self::Ok(value) => Outcome::Ok(value),
            Self::Err(error) => Outcome::Err(error),
        }
    }

    /// Returns `other` on success, otherwise keeps the receiver's error.
    ///
    /// The substituted container is returned verbatim, not re-wrapped.
    #[inline]
    pub fn and<U>(self, other: Outcome<U, E>) -> Outcome<U, E> {
        match self {
            Self::Ok(_) => other,
            Self::Err(error) => Outcome::Err(error),
        }
    }

    /// Applies `f` to the success payload and returns its result verbatim.
    ///
    /// `f` is never invoked on the failure branch.
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> Outcome<U, E>,
    {
        match self {
            Self::Ok(value) => f(value),
            Self::Err(error) => Outcome::Err(error),
        }
    }

    /// Returns `other` on failure, otherwise keeps the success payload.
    #[inline]
    pub fn or<F>(self, other: Outcome<T, F>) -> Outcome<T, F> {
        match self {
            Self::Ok(value) => Outcome::Ok(value),
            Self::Err(_) => other,
        }
    }

    /// Applies `f` to the error value and returns its result verbatim.
    ///
    /// `f` is never invoked on the success branch.
    #[inline]
    pub fn or_else<F, O>(self, f: O) -> Outcome<T, F>
    where
        O: FnOnce(E) -> Outcome<T, F>,
    {
        match self {
            Self::Ok(value) => Outcome::Ok(value),
            Self::Err(error) => f(error),
        }
    }

    /// Transforms the success payload with `f`, re-wrapping the result in
    /// `Ok`. No-op on the failure branch: `f` is never invoked.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::Err(error) => Outcome::Err(error),
        }
    }

    /// Transforms the error value with `f`. No-op on the success branch.
    #[inline]
    pub fn map_err<F, O>(self, f: O) -> Outcome<T, F>
    where
        O: FnOnce(E) -> F,
    {
        match self {
            Self::Ok(value) => Outcome::Ok(value),
            Self::Err(error) => Outcome::Err(f(error)),
        }
    }

    /// Keeps the success payload only if `pred` accepts it, downgrading to
    /// the deterministic default failure [`Filtered`] (built from the
    /// payload's debug form) otherwise. No-op on an already-failed instance.
    #[inline]
    pub fn filter<P>(self, pred: P) -> Outcome<T, E>
    where
        P: FnOnce(&T) -> bool,
        T: Debug,
        E: From<Filtered>,
    {
        self.filter_or(pred, |value| E::from(Filtered::of(&value)))
    }

    /// Keeps the success payload only if `pred` accepts it, downgrading to
    /// failure via the caller-supplied constructor `on_fail` (which receives
    /// the rejected payload) otherwise. No-op on an already-failed instance.
    #[inline]
    pub fn filter_or<P, G>(self, pred: P, on_fail: G) -> Outcome<T, E>
    where
        P: FnOnce(&T) -> bool,
        G: FnOnce(T) -> E,
    {
        match self {
            Self::Ok(value) => {
                if pred(&value) {
                    Self::Ok(value)
                } else {
                    Self::Err(on_fail(value))
                }
            }
            Self::Err(error) => Self::Err(error),
        }
    }

    /// Runs `f` for its side effect on the success payload, then returns the
    /// receiver unchanged. `f` is never invoked on the failure branch.
    #[inline]
    pub fn tee<F>(self, f: F) -> Outcome<T, E>
    where
        F: FnOnce(&T),
    {
        if let Self::Ok(value) = &self {
            f(value);
        }
        self
    }

    /// Returns the success payload.
    ///
    /// # Panics
    ///
    /// Panics on the failure branch with the error's debug form. This is the
    /// conversion point from modeled failure into a host panic; prefer
    /// [`Outcome::unwrap_or_else`] for a non-panicking fallback.
    #[inline]
    #[track_caller]
    pub fn unwrap(self) -> T
    where
        E: Debug,
    {
        match self {
            Self::Ok(value) => value,
            Self::Err(error) => panic!("called `Outcome::unwrap()` on an `Err` value: {error:?}"),
        }
    }

    /// Returns the success payload.
    ///
    /// # Panics
    ///
    /// Panics with `msg` (and the error's debug form) on the failure branch.
    #[inline]
    #[track_caller]
    pub fn expect(self, msg: &str) -> T
    where
        E: Debug,
    {
        match self {
            Self::Ok(value) => value,
            Self::Err(error) => panic!("{msg}: {error:?}"),
        }
    }

    /// Returns the success payload or `default`.
    #[inline]
    #[must_use]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Ok(value) => value,
            Self::Err(_) => default,
        }
    }

    /// Returns the success payload or computes one from the error value.
    #[inline]
    #[must_use]
    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Self::Ok(value) => value,
            Self::Err(error) => f(error),
        }
    }

    /// Bridges into the optional family: `Ok(v)` becomes `Some(v)`, `Err(_)`
    /// becomes `None`. The error value is discarded and unrecoverable
    /// afterwards. Total, never panics.
    #[inline]
    pub fn into_maybe(self) -> Maybe<T> {
        match self {
            Self::Ok(value) => Maybe::Some(value),
            Self::Err(_) => Maybe::None,
        }
    }

    /// Returns an iterator over the at-most-one success payload.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: Result::from(self.as_ref()).ok().into_iter(),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    #[inline]
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error) => Self::Err(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    #[inline]
    fn from(outcome: Outcome<T, E>) -> Self {
        match outcome {
            Outcome::Ok(value) => Ok(value),
            Outcome::Err(error) => Err(error),
        }
    }
}

/// Collects an iterator of containers into one container of a `Vec`,
/// short-circuiting to the first failure encountered.
impl<T, E> FromIterator<Outcome<T, E>> for Outcome<Vec<T>, E> {
    fn from_iter<I: IntoIterator<Item = Outcome<T, E>>>(iter: I) -> Self {
        let mut values = Vec::new();
        for item in iter {
            match item {
                Outcome::Ok(value) => values.push(value),
                Outcome::Err(error) => return Outcome::Err(error),
            }
        }
        Outcome::Ok(values)
    }
}

/// Owning iterator over an [`Outcome`]: one element on success, zero on
/// failure.
#[derive(Debug, Clone)]
pub struct IntoIter<T> {
    inner: std::option::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> std::iter::FusedIterator for IntoIter<T> {}

/// Borrowing iterator over an [`Outcome`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    inner: std::option::IntoIter<&'a T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> std::iter::FusedIterator for Iter<'_, T> {}

impl<T, E> IntoIterator for Outcome<T, E> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: Result::from(self).ok().into_iter(),
        }
    }
}

impl<'a, T, E> IntoIterator for &'a Outcome<T, E> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: Display, E: Display> Display for Outcome<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok(value) => write!(f, "ok({value})"),
            Self::Err(error) => write!(f, "err({error})"),
        }
    }
}

/// Deterministic default failure produced when a `filter` predicate rejects
/// a payload and no caller-supplied failure constructor was given. Carries
/// the rejected payload's debug form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("value rejected by filter: {0}")]
pub struct Filtered(pub String);

impl Filtered {
    /// Builds the default failure from the rejected payload.
    #[must_use]
    pub fn of<T: Debug>(value: &T) -> Self {
        Self(format!("{value:?}"))
    }
}

/// Error produced by [`capture`] and [`capture_async`] when the wrapped
/// computation panicked. Carries the panic payload rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("captured panic: {0}")]
pub struct Caught(pub String);

impl Caught {
    fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&'static str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "opaque panic payload".to_owned());
        Self(message)
    }
}

/// Runs `f`, converting a panic into `err(Caught)` instead of unwinding.
///
/// This is the only synchronous place a host panic is routed into the
/// modeled-failure channel; everywhere else a panicking callback unwinds
/// past the combinators unmodified. The closure is treated as unwind-safe.
///
/// # Examples
///
/// ```rust
/// use shunt::outcome::capture;
///
/// let out = capture(|| -> i32 { panic!("x") });
/// assert!(out.is_err());
///
/// assert_eq!(capture(|| 7), shunt::ok(7));
/// ```
pub fn capture<T, F>(f: F) -> Outcome<T, Caught>
where
    F: FnOnce() -> T,
{
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Outcome::Ok(value),
        Err(payload) => Outcome::Err(Caught::from_payload(payload.as_ref())),
    }
}

/// Awaits `future`, converting a panic during polling into `err(Caught)`.
///
/// The asynchronous counterpart of [`capture`]; the future is treated as
/// unwind-safe.
pub async fn capture_async<T, Fut>(future: Fut) -> Outcome<T, Caught>
where
    Fut: Future<Output = T>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(value) => Outcome::Ok(value),
        Err(payload) => Outcome::Err(Caught::from_payload(payload.as_ref())),
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Outcome;
    use serde::de::{Deserialize, Deserializer, Error as _};
    use serde::ser::{Serialize, SerializeStruct as _, Serializer};

    impl<T: Serialize, E: Serialize> Serialize for Outcome<T, E> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Outcome::Ok(value) => {
                    let mut state = serializer.serialize_struct("Outcome", 2)?;
                    state.serialize_field("ok", &true)?;
                    state.serialize_field("value", value)?;
                    state.end()
                }
                Outcome::Err(error) => {
                    let mut state = serializer.serialize_struct("Outcome", 2)?;
                    state.serialize_field("ok", &false)?;
                    state.serialize_field("error", error)?;
                    state.end()
                }
            }
        }
    }

    // The normalizer: accepts the plain tagged-object shape, with `value`
    // and `error` optional when the tag says they are absent.
    #[derive(serde::Deserialize)]
    #[serde(rename = "Outcome")]
    struct Repr<T, E> {
        ok: bool,
        value: Option<T>,
        error: Option<E>,
    }

    impl<'de, T, E> Deserialize<'de> for Outcome<T, E>
    where
        T: Deserialize<'de>,
        E: Deserialize<'de>,
    {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = Repr::<T, E>::deserialize(deserializer)?;
            match (repr.ok, repr.value, repr.error) {
                (true, Some(value), _) => Ok(Outcome::Ok(value)),
                (true, None, _) => Err(D::Error::missing_field("value")),
                (false, _, Some(error)) => Ok(Outcome::Err(error)),
                (false, _, None) => Err(D::Error::missing_field("error")),
            }
        }
    }
}
