//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Record errors
//! - 3xx: Config errors
//! - 6xx: Storage errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for `--machine` output and HTTP error bodies.
///
/// Each variant maps to a numeric code (e.g., `NotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Record errors (1xx)
    // ========================================
    /// E101: No user matches the identifier
    NotFound,
    /// E102: Payload shape or key is invalid
    InvalidArgument,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file or value is invalid
    ConfigInvalid,
    /// E302: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: A write violated a table constraint
    IntegrityViolation,
    /// E602: Connectivity, timeout or unclassified backend failure
    StoreUnavailable,
    /// E603: JSON encoding or decoding failed
    SerializationError,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Filesystem or socket operation failed
    IoError,
    /// E902: Unexpected failure, e.g. a panicked worker task
    InternalError,
}

impl ErrorCode {
    /// Numeric code used in `E<nnn>` strings.
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::NotFound => 101,
            Self::InvalidArgument => 102,

            Self::ConfigInvalid => 301,
            Self::ConfigMissingRequired => 302,

            Self::IntegrityViolation => 601,
            Self::StoreUnavailable => 602,
            Self::SerializationError => 603,

            Self::IoError => 901,
            Self::InternalError => 902,
        }
    }

    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Short recovery hint for humans reading the error.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::NotFound => "Check the identifier. Run `userdb user list` to see existing users",
            Self::InvalidArgument => "Patch keys must be one of: first_name, last_name. Values must be text, number or boolean",
            Self::ConfigInvalid => "Check TOML syntax in the config file and the USERDB_* environment variables",
            Self::ConfigMissingRequired => "Set the missing value in userdb.toml or through its USERDB_* environment variable",
            Self::IntegrityViolation => "The write conflicts with an existing row. Check the identifier and retry",
            Self::StoreUnavailable => "Check that the database file is reachable and not locked by another process",
            Self::SerializationError => "The JSON payload could not be processed. Check the request body",
            Self::IoError => "File operation failed. Check the path exists and permissions are correct",
            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
        }
    }

    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::NotFound
            | Self::InvalidArgument
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::IntegrityViolation
            | Self::StoreUnavailable
            | Self::IoError => true,

            Self::SerializationError | Self::InternalError => false,
        }
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "record",
            3 => "config",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }

    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::NotFound,
            Self::InvalidArgument,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::IntegrityViolation,
            Self::StoreUnavailable,
            Self::SerializationError,
            Self::IoError,
            Self::InternalError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
