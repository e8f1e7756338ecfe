//! # Shunt - serializable containers with short-circuiting pipelines.
//!
//! Shunt provides two algebraic container types, [`Maybe`] for optional
//! values and [`Outcome`] for success-or-failure, as plain,
//! JSON-serializable tagged data with a chainable combinator API, plus a
//! deferred ("lazy") evaluation pipeline that unifies synchronous and
//! asynchronous steps into one short-circuiting chain.
//!
//! ## Overview
//!
//! - **Tagged containers**: [`Maybe`] (`Some`/`None`) and [`Outcome`]
//!   (`Ok`/`Err`), built with the [`some`], [`none`], [`ok`] and [`err`]
//!   factories. Exactly one tag is active; only its payload is readable or
//!   serialized.
//! - **Eager combinators**: `and`/`or`/`and_then`/`or_else`/`map`/`filter`/
//!   `unwrap`/`tee` on both families, each a total function over the
//!   variant. A success container iterates as one element, a failure as
//!   zero.
//! - **Deferred pipeline**: [`lazy`] records steps against a source that
//!   may still be pending and runs nothing until `eval()`; see [`Lazy`].
//! - **Aggregators**: [`aggregate::and`] and [`aggregate::or`] resolve an
//!   ordered list of independent sources strictly left to right with
//!   deterministic short-circuiting.
//! - **Bridges**: total conversions between the two families and the
//!   standard library's `Option`/`Result`.
//!
//! ## Quick Start
//!
//! ```rust
//! use shunt::{err, ok, Outcome};
//!
//! fn half(n: i32) -> Outcome<i32, String> {
//!     if n % 2 == 0 { ok(n / 2) } else { err(format!("{n} is odd")) }
//! }
//!
//! let out = half(8).and_then(half).map(|n| n + 1);
//! assert_eq!(out.unwrap(), 3);
//!
//! // The failure branch short-circuits: later callbacks never run.
//! let out = half(3).and_then(half).map(|n| n + 1);
//! assert!(out.is_err());
//! ```
//!
//! ## Error handling
//!
//! Modeled failure (`None`/`Err`) is a value, threaded explicitly through
//! every combinator. Host panics raised inside user callbacks propagate
//! unmodified, except through [`outcome::capture`] and
//! [`outcome::capture_async`], which convert them into `err(`[`Caught`]`)`.
//! `unwrap`/`expect` are the only conversions back from modeled failure
//! into a panic.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for [`Maybe`] and
//!   [`Outcome`] using the plain tagged-object shape
//! - `tracing`: Emit trace-level events as pipeline steps apply or skip

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod lazy;
pub mod maybe;
pub mod outcome;

pub use aggregate::Fetch;
pub use lazy::{Lazy, lazy};
pub use maybe::{Maybe, Missing, none, some};
pub use outcome::{Caught, Filtered, Outcome, err, ok};
