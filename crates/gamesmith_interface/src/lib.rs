//! Trait definitions for Gamesmith.
//!
//! The generative backend is an external capability with no guaranteed output
//! schema. Everything downstream talks to it through [`GameGenerator`], so the
//! real remote client and deterministic test stubs are interchangeable.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::GameGenerator;
