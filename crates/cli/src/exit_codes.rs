//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, no CSV)       |
//! | 3       | Universal        | I/O error (read/write CSV or config)     |
//! | 50-59   | enrich           | Enrichment adapters and recipients       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-3)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, or no CSV loaded for an action that needs one.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - input CSV unreadable, output or config not writable.
pub const EXIT_IO: u8 = 3;

// =============================================================================
// Enrichment (50-59)
// =============================================================================

/// No API key provided (flag, env var and keys.json all empty).
pub const EXIT_ENRICH_NOT_AUTH: u8 = 50;

/// Auth rejected by upstream (401/403).
pub const EXIT_ENRICH_AUTH: u8 = 51;

/// Request rejected by upstream (400/422).
pub const EXIT_ENRICH_VALIDATION: u8 = 52;

/// Upstream error (other non-2xx, API error body), network failure,
/// or a response that is not JSON.
pub const EXIT_ENRICH_UPSTREAM: u8 = 54;

/// `enrich all`: at least one adapter failed. Successful merges are kept.
pub const EXIT_ENRICH_PARTIAL: u8 = 57;

/// `emails`: no email column, or the column has no addresses.
pub const EXIT_NO_RECIPIENTS: u8 = 58;
