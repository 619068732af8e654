//! CLI exit code registry.
//!
//! Exit codes are part of the shell contract: batch scripts key off
//! them. Add new codes here, not inline.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - file not found, unreadable CSV, write failure.
pub const EXIT_IO: u8 = 3;

/// Completion-service key not configured.
pub const EXIT_LLM_MISSING_KEY: u8 = 10;
