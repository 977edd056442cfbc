//! Pure section policy: term propagation and access decisions.
//!
//! # Responsibility
//! - Hold every decision rule as a function of explicit inputs.
//! - Stay free of storage, logging and process-wide state.
//!
//! # Invariants
//! - No function here fails; empty input resolves to restrictive output.

pub mod access;
pub mod propagation;
pub mod term_set;
