//! Process exit codes (BSD sysexits.h compatible).

/// Successful termination, also used after printing help or the version.
pub const OK: i32 = 0;

/// Command line usage error: the tool's own arguments did not parse or
/// named no known command.
pub const USAGE: i32 = 64;

/// Data format error: an invalid schema file, or arguments that do not parse
/// against a user-supplied schema.
pub const DATAERR: i32 = 65;

/// Cannot open input.
pub const NOINPUT: i32 = 66;

/// Internal software error.
pub const SOFTWARE: i32 = 70;

/// Input/output error.
pub const IOERR: i32 = 74;

/// Configuration error.
pub const CONFIG: i32 = 78;
