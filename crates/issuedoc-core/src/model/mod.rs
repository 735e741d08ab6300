//! The issue data model: header fields, the two variants and the
//! narrowed single-variant records.

pub mod issue;

pub use issue::{
    BugDetails, BugIssue, FeatureRequestDetails, FeatureRequestIssue, Issue, IssueDocument,
    IssueHeader, IssueKind, IssueVariant, NarrowError,
};
