//! Exit code constants for the hydrant CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config or WDL, invalid state)
//! - 2: Missing input (config file, WDL file or referenced task not found)
//! - 3: External tool failure (docker, java)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, malformed config or WDL, invalid state.
pub const USER_ERROR: i32 = 1;

/// A required file or a referenced task does not exist.
pub const NOT_FOUND: i32 = 2;

/// An external tool could not be launched or exited non-zero.
pub const TOOL_FAILURE: i32 = 3;
