#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Shared utilities for bundleplan.
//!
//! Pure helpers with no logging/tracing dependencies. Logging belongs to the
//! CLI crate.

pub mod fs;
pub mod hash;
