//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// - 0: Success
/// - 1: General error
/// - 2: Usage error (clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Snapshot, record or config not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;
}

/// Environment variables read by the CLI.
pub mod env {
    /// Data directory override
    pub const DATA: &str = "STOREFRONT_DATA";

    /// Config file override
    pub const CONFIG: &str = "STOREFRONT_CONFIG";

    /// Log filter directives (`tracing-subscriber` syntax)
    pub const LOG: &str = "STOREFRONT_LOG";
}
