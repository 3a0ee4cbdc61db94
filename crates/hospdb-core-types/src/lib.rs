//! Core types shared across HospDB facilities
//!
//! This crate provides foundational types used by the error, logging and
//! connection layers:
//!
//! - **Schema constants**: Canonical field keys and event names
//! - **Sensitive data**: `Sensitive<T>` marker for credential redaction

pub mod schema;
pub mod sensitive;

pub use sensitive::Sensitive;
