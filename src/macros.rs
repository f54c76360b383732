//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!` and log the result
//! with an empty context through anything implementing [`Log`](crate::Log),
//! so they work the same for loggers and channels.
//!
//! # Examples
//!
//! ```
//! use channel_logger::prelude::*;
//! use channel_logger::{context, info};
//!
//! let logger = Logger::new("app");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Through a channel, with structured fields
//! let audit = logger.channel("audit");
//! audit.info("login", context! { "user" => 7, "admin" => false });
//! ```

/// Log a formatted message at an explicit severity.
///
/// # Examples
///
/// ```
/// # use channel_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use channel_logger::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        use $crate::Log as _;
        $logger.log($level, &format!($($arg)+), $crate::Context::new())
    }};
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Notice, $($arg)+)
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Critical, $($arg)+)
    };
}

#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Alert, $($arg)+)
    };
}

#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Severity::Emergency, $($arg)+)
    };
}

/// Build a [`Context`](crate::Context) from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use channel_logger::context;
///
/// let ctx = context! { "user" => 7, "path" => "/login" };
/// assert_eq!(ctx.len(), 2);
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut context = $crate::Context::new();
        $(context.insert($key, $value);)+
        context
    }};
}
