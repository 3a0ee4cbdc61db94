//! Structured logging facility for HospDB
//!
//! - Single initialization point via `init(profile)`
//! - Lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! The service layer owns lifecycle logging. The store and the model only
//! emit `tracing::debug!` for internals.
//!
//! # Usage
//!
//! ```rust
//! use hospdb_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};

#[doc(hidden)]
pub mod __private {
    pub use hospdb_core_types::schema;
    pub use tracing;
}
