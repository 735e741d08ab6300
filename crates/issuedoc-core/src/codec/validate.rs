//! Required-field and variant-exclusivity checks.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. Header fields: `id`, `reporter_id`, `priority` non-zero, `status`
//!    non-empty.
//! 2. Bug payload, if present: `severity` then `version_affected` non-empty.
//! 3. Feature-request payload, if present: `sponsor_id` non-zero.
//! 4. Exactly one payload present.
//!
//! Zero and the empty string are indistinguishable from "not provided"; a
//! document with `"priority": 0` is missing its priority.

use std::fmt;

use crate::model::{Issue, IssueDocument, IssueVariant};

/// A field that must hold a non-default value.
///
/// Displayed by its document key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Id,
    ReporterId,
    Priority,
    Status,
    Severity,
    VersionAffected,
    SponsorId,
}

impl RequiredField {
    /// Document key for this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ReporterId => "reporter_id",
            Self::Priority => "priority",
            Self::Status => "status",
            Self::Severity => "severity",
            Self::VersionAffected => "version_affected",
            Self::SponsorId => "sponsor_id",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which illegal payload combination was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantConflict {
    /// Both bug and feature-request payloads present.
    Both,
    /// Neither payload present.
    Neither,
}

impl fmt::Display for VariantConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Both => "both bug and feature-request fields are present",
            Self::Neither => "neither bug nor feature-request fields are present",
        })
    }
}

/// Why a decoded document is not a valid issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field '{0}'")]
    MissingRequiredField(RequiredField),
    #[error("invalid variant combination: {0}")]
    InvalidVariantCombination(VariantConflict),
}

/// Validate a decoded document and return the typed [`Issue`].
///
/// # Errors
///
/// Returns the first [`ValidationError`] in check order (see module docs).
pub fn validate(doc: &IssueDocument) -> Result<Issue, ValidationError> {
    Issue::try_from(doc.clone())
}

impl TryFrom<IssueDocument> for Issue {
    type Error = ValidationError;

    fn try_from(doc: IssueDocument) -> Result<Self, Self::Error> {
        check(&doc)?;
        let variant = match (doc.bug, doc.feature_request) {
            (Some(bug), None) => IssueVariant::Bug(bug),
            (None, Some(request)) => IssueVariant::FeatureRequest(request),
            (Some(_), Some(_)) => {
                return Err(ValidationError::InvalidVariantCombination(
                    VariantConflict::Both,
                ));
            }
            (None, None) => {
                return Err(ValidationError::InvalidVariantCombination(
                    VariantConflict::Neither,
                ));
            }
        };
        Ok(Self::new(doc.header, variant))
    }
}

fn check(doc: &IssueDocument) -> Result<(), ValidationError> {
    let header = &doc.header;
    require_number(header.id, RequiredField::Id)?;
    require_number(header.reporter_id, RequiredField::ReporterId)?;
    require_number(header.priority, RequiredField::Priority)?;
    require_text(&header.status, RequiredField::Status)?;

    if let Some(bug) = &doc.bug {
        require_text(&bug.severity, RequiredField::Severity)?;
        require_text(&bug.version_affected, RequiredField::VersionAffected)?;
    }

    if let Some(request) = &doc.feature_request {
        require_number(request.sponsor_id, RequiredField::SponsorId)?;
    }

    Ok(())
}

const fn require_number(value: i64, field: RequiredField) -> Result<(), ValidationError> {
    if value == 0 {
        Err(ValidationError::MissingRequiredField(field))
    } else {
        Ok(())
    }
}

fn require_text(value: &str, field: RequiredField) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::MissingRequiredField(field))
    } else {
        Ok(())
    }
}
