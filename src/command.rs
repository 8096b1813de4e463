//! Command implementations for the CLI binary.

/// Local webhook fulfillment over stdin/stdout.
pub mod handle;

/// Direct release publication from the command line.
pub mod release;
