//! Canonical logging macros
//!
//! Every lifecycle event carries `component`, `op` and `event`; end events add
//! `duration_ms`, error events add `err_kind` and `err_code`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use hospdb_core::log_op_start;
/// log_op_start!("store");
/// log_op_start!("store", entity_kind = "Ward");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::logging_facility::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__private::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::logging_facility::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__private::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use hospdb_core::log_op_end;
/// log_op_end!("store", duration_ms = 3, object_id = 12);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::logging_facility::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__private::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::logging_facility::__private::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__private::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into `ExError` and records its kind and code.
///
/// # Example
///
/// ```
/// # use hospdb_core::{log_op_error, errors::ModelError};
/// let err = ModelError::NonPositiveBedCount { count: 0 };
/// log_op_error!("create_ward", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::logging_facility::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__private::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            message = ex_err.message(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::logging_facility::__private::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__private::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            message = ex_err.message(),
            $($field)*
        );
    }};
}
