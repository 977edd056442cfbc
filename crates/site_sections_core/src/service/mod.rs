//! Section use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls and pure policy into host-facing operations.
//! - Keep hosts decoupled from storage details.

pub mod section_service;
