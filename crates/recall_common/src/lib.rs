//! Shared foundational types used across the recall workspace.
//!
//! Currently this is the [`Fingerprint`] digest that names every cache entry.

#![warn(missing_docs)]

pub mod fingerprint;

pub use fingerprint::{Fingerprint, ParseFingerprintError};
