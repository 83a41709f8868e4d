//! Logging macros
//!
//! Thin wrappers over `tracing` so every module logs through the same
//! entry points. The subscriber itself is installed by the server binary.

/// Logging macros with a clean API
pub mod logging {

    /// Info level logging - general information messages
    #[macro_export]
    macro_rules! log_info {
        ($($arg:tt)*) => {{
            tracing::info!($($arg)*);
        }};
    }

    /// Warning level logging - potentially problematic situations
    #[macro_export]
    macro_rules! log_warn {
        ($($arg:tt)*) => {{
            tracing::warn!($($arg)*);
        }};
    }

    /// Error level logging - error conditions
    #[macro_export]
    macro_rules! log_error {
        ($($arg:tt)*) => {{
            tracing::error!($($arg)*);
        }};
    }

    /// Debug level logging - detailed information for debugging
    #[macro_export]
    macro_rules! log_debug {
        ($($arg:tt)*) => {{
            tracing::debug!($($arg)*);
        }};
    }

    /// Trace level logging - very detailed tracing information
    #[macro_export]
    macro_rules! log_trace {
        ($($arg:tt)*) => {{
            tracing::trace!($($arg)*);
        }};
    }
}
