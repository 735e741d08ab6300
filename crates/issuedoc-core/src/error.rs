use std::fmt;

use crate::codec::{DecodeError, EncodeError, ValidationError};
use crate::model::NarrowError;
use crate::store::StoreError;

/// Machine-readable error codes for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    DocumentMalformed,
    MissingRequiredField,
    InvalidVariantCombination,
    NotABugVariant,
    NotAFeatureRequestVariant,
    EncodeFailed,
    StoreUnavailable,
    StoreRowUnreadable,
    InvalidTableName,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::DocumentMalformed => "E2001",
            Self::MissingRequiredField => "E2002",
            Self::InvalidVariantCombination => "E2003",
            Self::NotABugVariant => "E2004",
            Self::NotAFeatureRequestVariant => "E2005",
            Self::EncodeFailed => "E3001",
            Self::StoreUnavailable => "E4001",
            Self::StoreRowUnreadable => "E4002",
            Self::InvalidTableName => "E4003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::DocumentMalformed => "Document is not well-formed",
            Self::MissingRequiredField => "Required field missing",
            Self::InvalidVariantCombination => "Invalid variant combination",
            Self::NotABugVariant => "Issue is not a bug",
            Self::NotAFeatureRequestVariant => "Issue is not a feature request",
            Self::EncodeFailed => "Issue could not be encoded",
            Self::StoreUnavailable => "Document store unavailable",
            Self::StoreRowUnreadable => "Stored document unreadable",
            Self::InvalidTableName => "Invalid store table name",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in .issuedoc/config.toml and retry."),
            Self::DocumentMalformed => Some("Send a single JSON object per document."),
            Self::MissingRequiredField => {
                Some("Provide a non-zero / non-empty value for the named field.")
            }
            Self::InvalidVariantCombination => Some(
                "Provide either severity + version_affected (bug) or sponsor_id (feature request), not both.",
            ),
            Self::NotABugVariant | Self::NotAFeatureRequestVariant => None,
            Self::EncodeFailed => Some("Retry once. If persistent, report a bug with logs."),
            Self::StoreUnavailable => Some("Check the database path and run `idoc init`."),
            Self::StoreRowUnreadable => None,
            Self::InvalidTableName => {
                Some("Use letters, digits and underscores, not starting with a digit.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Any failure along the decode -> validate -> narrow -> encode -> store path.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Narrow(#[from] NarrowError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IssueError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Decode(_) => ErrorCode::DocumentMalformed,
            Self::Validation(ValidationError::MissingRequiredField(_)) => {
                ErrorCode::MissingRequiredField
            }
            Self::Validation(ValidationError::InvalidVariantCombination(_)) => {
                ErrorCode::InvalidVariantCombination
            }
            Self::Narrow(NarrowError::NotABugVariant { .. }) => ErrorCode::NotABugVariant,
            Self::Narrow(NarrowError::NotAFeatureRequestVariant { .. }) => {
                ErrorCode::NotAFeatureRequestVariant
            }
            Self::Encode(_) => ErrorCode::EncodeFailed,
            Self::Store(err) => err.code(),
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }

    /// True when the document itself was fine but held the other variant.
    #[must_use]
    pub const fn is_wrong_variant(&self) -> bool {
        matches!(self, Self::Narrow(_))
    }
}
