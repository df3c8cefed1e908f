//! Shared foundational types for the Strobe simulation runtime.
//!
//! This crate provides the fixed-width bit vector used for every signal
//! value in the simulator, together with the errors its operations can
//! produce.

#![warn(missing_docs)]

pub mod bits;
pub mod error;

pub use bits::Bits;
pub use error::BitsError;
