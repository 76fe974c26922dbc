//! Core types and the reservation engine for Deskbook.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement the traits in [`store`]; the engine in
//! [`lifecycle`] is generic over them.

pub mod calendar;
pub mod clock;
pub mod conflict;
pub mod error;
pub mod group;
pub mod lifecycle;
pub mod reservation;
pub mod space;
pub mod store;

pub use error::{Error, ErrorKind, Result, ValidationError};
pub use lifecycle::Engine;
