//! CLI Exit Code Registry
//!
//! Single source of truth for the `iaa` exit codes.
//! Scripts rely on them, so codes are never reused.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success, report written                              |
//! | 2    | Usage error (bad or missing arguments)               |
//! | 3    | IO error (read input or config, write report)        |
//! | 4    | Malformed input file                                 |
//! | 5    | A comparable token has no analysis marked correct    |
//! | 6    | Kappa undefined (nothing comparable, saturated `pe`) |
//! | 7    | Invalid config file                                  |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Map it in `error_exit_code`

use iaa_agreement::AgreementError;

/// Success - statistics printed and report written.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
/// Matches the code clap exits with on its own parse errors.
#[allow(dead_code)]
pub const EXIT_USAGE: u8 = 2;

/// Cannot read an input or config file, or cannot write the report.
pub const EXIT_IO: u8 = 3;

/// An annotation file is not well-formed or lacks required markup.
pub const EXIT_MALFORMED_INPUT: u8 = 4;

/// A token present in both files has no analysis marked correct.
pub const EXIT_MISSING_SELECTION: u8 = 5;

/// Kappa is undefined for some category.
pub const EXIT_DEGENERATE: u8 = 6;

/// Config file does not parse or fails validation.
pub const EXIT_INVALID_CONFIG: u8 = 7;

/// Map an engine error to its exit code.
pub fn error_exit_code(err: &AgreementError) -> u8 {
    match err {
        AgreementError::MalformedInput { .. } => EXIT_MALFORMED_INPUT,
        AgreementError::MissingSelection { .. } => EXIT_MISSING_SELECTION,
        AgreementError::DegenerateAgreement { .. } => EXIT_DEGENERATE,
        AgreementError::ConfigParse(_) | AgreementError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
    }
}
