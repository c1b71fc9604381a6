//! CLI Exit Code Registry
//!
//! Single source of truth for `extaudit` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | Usage error (clap reports these itself)                   |
//! | 3    | Discrepancies found (`run --strict` only)                 |
//! | 4    | Invalid taxonomy; nothing was compared                    |
//! | 5    | Input could not be read or parsed                         |
//! | 6    | Output could not be written                               |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// At least one category is `policy_only` or `disclosure_only`.
/// Only returned when `--strict` is passed.
pub const EXIT_DISCREPANCY: u8 = 3;

/// Taxonomy failed to parse or validate (e.g. a category with no patterns).
pub const EXIT_INVALID_TAXONOMY: u8 = 4;

/// Batch input unreadable or not the expected JSON shape.
pub const EXIT_INPUT: u8 = 5;

/// Could not write the JSON or CSV output file.
pub const EXIT_OUTPUT: u8 = 6;
