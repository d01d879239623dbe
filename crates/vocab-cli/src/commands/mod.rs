//! CLI command implementations.
//!
//! Each command returns `Ok(false)` when it ran but found a problem.

pub mod check;
pub mod inspect;
