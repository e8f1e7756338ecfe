//! The optional-value container and its combinators.
//!
//! [`Maybe`] models presence (`Some`) or absence (`None`) of a value. The
//! [`some`] and [`none`] factories build instances; [`Maybe::ok_or`] and
//! [`Maybe::into_outcome`] bridge absence into the failure channel of the
//! success-or-failure family.

use crate::outcome::Outcome;
use std::fmt::Display;
use thiserror::Error;

/// Creates a [`Maybe`] holding `value`.
///
/// # Examples
///
/// ```rust
/// use shunt::{some, Maybe};
///
/// let m = some(5);
/// assert_eq!(m, Maybe::Some(5));
/// ```
#[inline]
pub const fn some<T>(value: T) -> Maybe<T> {
    Maybe::Some(value)
}

/// Creates an empty [`Maybe`].
///
/// # Examples
///
/// ```rust
/// use shunt::{none, Maybe};
///
/// let m: Maybe<i32> = none();
/// assert!(m.is_none());
/// ```
#[inline]
#[must_use]
pub const fn none<T>() -> Maybe<T> {
    Maybe::None
}

/// Optional value: either a present payload (`Some`) or absence (`None`).
///
/// Exactly one tag is active per instance and only the active tag's payload
/// exists. Instances are immutable: every combinator consumes the receiver
/// and returns a (possibly new) container.
///
/// With the `serde` feature enabled, `Maybe` serializes to the plain tagged
/// shape `{"some": true, "value": v}` / `{"some": false}` and deserializes
/// from it; that is the JSON round-trip contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[must_use]
pub enum Maybe<T> {
    /// A value is present.
    Some(T),
    /// No value.
    None,
}

impl<T> Maybe<T> {
    /// Returns `true` if a value is present.
    #[inline]
    #[must_use]
    pub const fn is_some(&self) -> bool {
        matches!(self, Maybe::Some(_))
    }

    /// Returns `true` if no value is present.
    #[inline]
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Maybe::None)
    }

    /// Converts from `&Maybe<T>` to `Maybe<&T>`.
    #[inline]
    pub const fn as_ref(&self) -> Maybe<&T> {
        match self {
            Self::Some(value) => Maybe::Some(value),
            Self::None => Maybe::None,
        }
    }

    /// Returns `other` if a value is present, otherwise keeps `None`.
    ///
    /// The substituted container is returned verbatim, not re-wrapped.
    #[inline]
    pub fn and<U>(self, other: Maybe<U>) -> Maybe<U> {
        match self {
            Self::Some(_) => other,
            Self::None => Maybe::None,
        }
    }

    /// Applies `f` to a present value and returns its result verbatim.
    ///
    /// `f` is never invoked on `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shunt::{none, some};
    ///
    /// let doubled = some(5).and_then(|n| if n > 3 { some(n * 2) } else { none() });
    /// assert_eq!(doubled.unwrap(), 10);
    /// ```
    #[inline]
    pub fn and_then<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> Maybe<U>,
    {
        match self {
            Self::Some(value) => f(value),
            Self::None => Maybe::None,
        }
    }

    /// Returns `other` if empty, otherwise keeps the present value.
    #[inline]
    pub fn or(self, other: Maybe<T>) -> Maybe<T> {
        match self {
            Self::Some(value) => Self::Some(value),
            Self::None => other,
        }
    }

    /// Invokes `f` if empty and returns its result verbatim.
    ///
    /// `f` is never invoked on `Some`.
    #[inline]
    pub fn or_else<F>(self, f: F) -> Maybe<T>
    where
        F: FnOnce() -> Maybe<T>,
    {
        match self {
            Self::Some(value) => Self::Some(value),
            Self::None => f(),
        }
    }

    /// Transforms a present value with `f`, re-wrapping the result in `Some`.
    ///
    /// No-op on `None`: `f` is never invoked.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Maybe<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Some(value) => Maybe::Some(f(value)),
            Self::None => Maybe::None,
        }
    }

    /// Keeps a present value only if `pred` accepts it, downgrading to
    /// `None` otherwise. No-op on an already-empty container.
    #[inline]
    pub fn filter<P>(self, pred: P) -> Maybe<T>
    where
        P: FnOnce(&T) -> bool,
    {
        if let Self::Some(value) = self {
            if pred(&value) {
                return Self::Some(value);
            }
        }
        Self::None
    }

    /// Runs `f` for its side effect on a present value, then returns the
    /// receiver unchanged. `f` is never invoked on `None`.
    #[inline]
    pub fn tee<F>(self, f: F) -> Maybe<T>
    where
        F: FnOnce(&T),
    {
        if let Self::Some(value) = &self {
            f(value);
        }
        self
    }

    /// Returns the contained value.
    ///
    /// # Panics
    ///
    /// Panics if the container is `None`. This is the conversion point from
    /// modeled absence into a host panic; prefer [`Maybe::unwrap_or_else`]
    /// for a non-panicking fallback.
    #[inline]
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self {
            Self::Some(value) => value,
            Self::None => panic!("called `Maybe::unwrap()` on a `None` value"),
        }
    }

    /// Returns the contained value.
    ///
    /// # Panics
    ///
    /// Panics with `msg` if the container is `None`.
    #[inline]
    #[track_caller]
    pub fn expect(self, msg: &str) -> T {
        match self {
            Self::Some(value) => value,
            Self::None => panic!("{msg}"),
        }
    }

    /// Returns the contained value or `default`.
    #[inline]
    #[must_use]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Some(value) => value,
            Self::None => default,
        }
    }

    /// Returns the contained value or computes one from `f`.
    #[inline]
    #[must_use]
    pub fn unwrap_or_else<F>(self, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        match self {
            Self::Some(value) => value,
            Self::None => f(),
        }
    }

    /// Bridges into the success-or-failure family: `Some(v)` becomes
    /// `Ok(v)`, `None` becomes `Err(error)`. Total, never panics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use shunt::{err, none, ok, some};
    ///
    /// assert_eq!(some(5).ok_or("missing"), ok(5));
    /// assert_eq!(none::<i32>().ok_or("missing"), err("missing"));
    /// ```
    #[inline]
    pub fn ok_or<E>(self, error: E) -> Outcome<T, E> {
        match self {
            Self::Some(value) => Outcome::Ok(value),
            Self::None => Outcome::Err(error),
        }
    }

    /// Like [`Maybe::ok_or`], computing the error lazily. `f` is never
    /// invoked on `Some`.
    #[inline]
    pub fn ok_or_else<E, F>(self, f: F) -> Outcome<T, E>
    where
        F: FnOnce() -> E,
    {
        match self {
            Self::Some(value) => Outcome::Ok(value),
            Self::None => Outcome::Err(f()),
        }
    }

    /// Bridges into the success-or-failure family with the default error
    /// value [`Missing`].
    #[inline]
    pub fn into_outcome(self) -> Outcome<T, Missing> {
        self.ok_or(Missing)
    }

    /// Returns an iterator over the at-most-one present value.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: Option::from(self.as_ref()).into_iter(),
        }
    }
}

impl<T> Default for Maybe<T> {
    /// Returns `Maybe::None` as the neutral default
    #[inline]
    fn default() -> Self {
        Self::None
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    #[inline]
    fn from(option: Option<T>) -> Self {
        match option {
            Some(value) => Self::Some(value),
            None => Self::None,
        }
    }
}

impl<T> From<Maybe<T>> for Option<T> {
    #[inline]
    fn from(maybe: Maybe<T>) -> Self {
        match maybe {
            Maybe::Some(value) => Some(value),
            Maybe::None => None,
        }
    }
}

/// Collects an iterator of containers into one container of a `Vec`,
/// short-circuiting to `None` at the first empty element.
impl<T> FromIterator<Maybe<T>> for Maybe<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Maybe<T>>>(iter: I) -> Self {
        let mut values = Vec::new();
        for item in iter {
            match item {
                Maybe::Some(value) => values.push(value),
                Maybe::None => return Maybe::None,
            }
        }
        Maybe::Some(values)
    }
}

/// Owning iterator over a [`Maybe`]: one element when present, zero when not.
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

/// Borrowing iterator over a [`Maybe`].
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

impl<T> IntoIterator for Maybe<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    #[inline]
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: Option::from(self).into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Maybe<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Default error used when an empty [`Maybe`] is bridged into the failure
/// channel without a caller-supplied error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("no value present")]
pub struct Missing;

impl<T: Display> Display for Maybe<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Some(value) => write!(f, "some({value})"),
            Self::None => write!(f, "none"),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Maybe;
    use serde::de::{Deserialize, Deserializer, Error as _};
    use serde::ser::{Serialize, SerializeStruct as _, Serializer};

    impl<T: Serialize> Serialize for Maybe<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Maybe::Some(value) => {
                    let mut state = serializer.serialize_struct("Maybe", 2)?;
                    state.serialize_field("some", &true)?;
                    state.serialize_field("value", value)?;
                    state.end()
                }
                Maybe::None => {
                    let mut state = serializer.serialize_struct("Maybe", 1)?;
                    state.serialize_field("some", &false)?;
                    state.end()
                }
            }
        }
    }

    // The normalizer: accepts the plain tagged-object shape, with `value`
    // optional when the tag says it is absent.
    #[derive(serde::Deserialize)]
    #[serde(rename = "Maybe")]
    struct Repr<T> {
        some: bool,
        value: Option<T>,
    }

    impl<'de, T: Deserialize<'de>> Deserialize<'de> for Maybe<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = Repr::<T>::deserialize(deserializer)?;
            match (repr.some, repr.value) {
                (true, Some(value)) => Ok(Maybe::Some(value)),
                (true, None) => Err(D::Error::missing_field("value")),
                (false, _) => Ok(Maybe::None),
            }
        }
    }
}
