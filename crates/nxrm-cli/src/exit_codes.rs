//! Exit codes for CLI operations
//!
//! Any fatal error exits with [`ERROR`]. Outcomes such as "already exists"
//! or "was not found" on an update or delete are not errors.

/// Success - operation completed, including skipped creates and missing deletes
pub const SUCCESS: i32 = 0;

/// General error - validation, server, transport or configuration failure
pub const ERROR: i32 = 1;
