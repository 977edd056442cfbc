//! Section assignment store contract and persistence implementation.
//!
//! # Responsibility
//! - Define the data access surface consumed by the section service.
//! - Isolate SQLite query details from policy and orchestration.
//!
//! # Invariants
//! - Store APIs return semantic errors (`*NotFound`, `CycleDetected`) in
//!   addition to DB transport errors.

pub mod section_store;
pub mod sqlite_store;
