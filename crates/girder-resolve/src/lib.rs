//! Marshalling rule resolution for the vtable-binding generator.
//!
//! Given a type descriptor, a direction, and the populated registry, this
//! crate decides how a value crosses the native/managed boundary. The result
//! is a closed [`MarshallStrategy`] tag the emitters match on exhaustively.
//! Resolution either succeeds or fails with a diagnostic naming the exact
//! struct, field, and parameter; no strategy is ever guessed.

pub mod error;
pub mod resolver;
pub mod strategy;

pub use error::ResolveError;
pub use resolver::{resolve_field, resolve_plain_field, ResolvedField, ResolvedParam, ResolvedReturn};
pub use strategy::{Direction, MarshallStrategy};
