//! Core types and errors for hdkey.

#![forbid(unsafe_code)]

mod curve;
mod error;

pub use curve::{CurveTag, KeyFamilyKind};
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
