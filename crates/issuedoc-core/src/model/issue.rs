use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    Bug,
    FeatureRequest,
}

impl IssueKind {
    /// Return the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bug => "bug",
            Self::FeatureRequest => "feature-request",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields every issue carries regardless of variant.
///
/// Zero and the empty string mean "not provided"; there is no separate
/// presence flag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct IssueHeader {
    pub id: i64,
    pub reporter_id: i64,
    pub priority: i64,
    pub status: String,
}

/// Payload of the bug variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BugDetails {
    pub severity: String,
    pub version_affected: String,
}

/// Payload of the feature-request variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FeatureRequestDetails {
    pub sponsor_id: i64,
}

/// The variant an issue holds. Exactly one, always.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IssueVariant {
    Bug(BugDetails),
    FeatureRequest(FeatureRequestDetails),
}

impl IssueVariant {
    #[must_use]
    pub const fn kind(&self) -> IssueKind {
        match self {
            Self::Bug(_) => IssueKind::Bug,
            Self::FeatureRequest(_) => IssueKind::FeatureRequest,
        }
    }
}

/// A validated issue.
///
/// Obtained from [`crate::codec::validate`] (or `Issue::try_from` on an
/// [`IssueDocument`]) or built directly with [`Issue::new`]. Serializes to the
/// flat document shape, see [`crate::codec::encode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Issue {
    pub header: IssueHeader,
    pub variant: IssueVariant,
}

impl Issue {
    #[must_use]
    pub const fn new(header: IssueHeader, variant: IssueVariant) -> Self {
        Self { header, variant }
    }

    #[must_use]
    pub const fn id(&self) -> i64 {
        self.header.id
    }

    #[must_use]
    pub const fn kind(&self) -> IssueKind {
        self.variant.kind()
    }

    /// True iff this issue holds bug details.
    #[must_use]
    pub const fn is_bug(&self) -> bool {
        matches!(self.variant, IssueVariant::Bug(_))
    }

    /// True iff this issue holds feature-request details.
    #[must_use]
    pub const fn is_feature_request(&self) -> bool {
        matches!(self.variant, IssueVariant::FeatureRequest(_))
    }

    /// Narrow to a [`BugIssue`].
    ///
    /// # Errors
    ///
    /// Returns [`NarrowError::NotABugVariant`] if this is a feature request.
    pub fn into_bug(self) -> Result<BugIssue, NarrowError> {
        match self.variant {
            IssueVariant::Bug(details) => Ok(BugIssue {
                header: self.header,
                details,
            }),
            IssueVariant::FeatureRequest(_) => Err(NarrowError::NotABugVariant { id: self.header.id }),
        }
    }

    /// Narrow to a [`FeatureRequestIssue`].
    ///
    /// # Errors
    ///
    /// Returns [`NarrowError::NotAFeatureRequestVariant`] if this is a bug.
    pub fn into_feature_request(self) -> Result<FeatureRequestIssue, NarrowError> {
        match self.variant {
            IssueVariant::FeatureRequest(details) => Ok(FeatureRequestIssue {
                header: self.header,
                details,
            }),
            IssueVariant::Bug(_) => Err(NarrowError::NotAFeatureRequestVariant {
                id: self.header.id,
            }),
        }
    }
}

/// A bug-only record: the common fields plus [`BugDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BugIssue {
    #[serde(flatten)]
    pub header: IssueHeader,
    #[serde(flatten)]
    pub details: BugDetails,
}

/// A feature-request-only record: the common fields plus
/// [`FeatureRequestDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FeatureRequestIssue {
    #[serde(flatten)]
    pub header: IssueHeader,
    #[serde(flatten)]
    pub details: FeatureRequestDetails,
}

impl From<BugIssue> for Issue {
    fn from(bug: BugIssue) -> Self {
        Self::new(bug.header, IssueVariant::Bug(bug.details))
    }
}

impl From<FeatureRequestIssue> for Issue {
    fn from(request: FeatureRequestIssue) -> Self {
        Self::new(request.header, IssueVariant::FeatureRequest(request.details))
    }
}

/// Narrowing was requested for a variant the issue does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NarrowError {
    #[error("issue {id} is not a bug")]
    NotABugVariant { id: i64 },
    #[error("issue {id} is not a feature request")]
    NotAFeatureRequestVariant { id: i64 },
}

/// A decoded but not yet validated issue.
///
/// Both variant payloads are independent options here, so the illegal
/// both/neither combinations can be represented and rejected by validation.
/// A payload is `Some` as soon as any of its keys was present in the
/// document, even if the others were missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueDocument {
    pub header: IssueHeader,
    pub bug: Option<BugDetails>,
    pub feature_request: Option<FeatureRequestDetails>,
}

impl IssueDocument {
    /// True iff bug details are present.
    #[must_use]
    pub const fn is_bug(&self) -> bool {
        self.bug.is_some()
    }

    /// True iff feature-request details are present.
    #[must_use]
    pub const fn is_feature_request(&self) -> bool {
        self.feature_request.is_some()
    }
}

impl From<Issue> for IssueDocument {
    fn from(issue: Issue) -> Self {
        let (bug, feature_request) = match issue.variant {
            IssueVariant::Bug(details) => (Some(details), None),
            IssueVariant::FeatureRequest(details) => (None, Some(details)),
        };
        Self {
            header: issue.header,
            bug,
            feature_request,
        }
    }
}
