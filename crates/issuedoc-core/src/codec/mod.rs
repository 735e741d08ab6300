//! Document codec: flat JSON bytes <-> typed issue.
//!
//! The stored shape is one flat object:
//!
//! ```text
//! { "id": int, "reporter_id": int, "priority": int, "status": string,
//!   "severity"?: string, "version_affected"?: string,   // bug
//!   "sponsor_id"?: int }                                  // feature request
//! ```
//!
//! Unknown keys are ignored on decode and never written on encode. A bug
//! payload is considered present when either of its keys is present; the
//! feature-request payload when `sponsor_id` is present. A variant key
//! holding `null` still marks its payload present, with an empty value that
//! validation then reports as missing. `null` in a header key reads as zero.
//! Whether the resulting combination is legal is decided by
//! [`validate`], not here.
//!
//! # Usage
//!
//! ```
//! use issuedoc_core::codec::{decode, encode, validate};
//!
//! let raw = br#"{"id":3,"reporter_id":33,"priority":3,"status":"new","sponsor_id":333}"#;
//! let doc = decode(raw).unwrap();
//! let issue = validate(&doc).unwrap();
//! assert!(issue.is_feature_request());
//! assert_eq!(decode(&encode(&issue).unwrap()).unwrap(), doc);
//! ```

pub mod validate;

pub use validate::{RequiredField, ValidationError, VariantConflict, validate};

use crate::error::IssueError;
use crate::model::{
    BugDetails, FeatureRequestDetails, Issue, IssueDocument, IssueHeader, IssueVariant,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Input bytes are not a well-formed issue document.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Not parseable as JSON at all.
    #[error("document is not well-formed JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    /// Valid JSON, but the top level is not an object.
    #[error("document must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },
    /// A known key holds a value of the wrong type.
    #[error("document field has the wrong type: {0}")]
    InvalidField(#[source] serde_json::Error),
}

/// An issue could not be serialized. Not expected for validated values.
#[derive(Debug, thiserror::Error)]
#[error("failed to encode issue document: {0}")]
pub struct EncodeError(#[from] serde_json::Error);

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

/// Inbound shape. Header keys fall back to their zero value whether missing
/// or `null`. Variant keys keep presence apart from value: the outer `Option`
/// is `Some` whenever the key appears, even as `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    id: Option<i64>,
    reporter_id: Option<i64>,
    priority: Option<i64>,
    status: Option<String>,
    #[serde(deserialize_with = "present")]
    severity: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    version_affected: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    sponsor_id: Option<Option<i64>>,
}

/// Only called for keys that appear in the object.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl From<RawDocument> for IssueDocument {
    fn from(raw: RawDocument) -> Self {
        let bug = if raw.severity.is_some() || raw.version_affected.is_some() {
            Some(BugDetails {
                severity: raw.severity.flatten().unwrap_or_default(),
                version_affected: raw.version_affected.flatten().unwrap_or_default(),
            })
        } else {
            None
        };

        Self {
            header: IssueHeader {
                id: raw.id.unwrap_or_default(),
                reporter_id: raw.reporter_id.unwrap_or_default(),
                priority: raw.priority.unwrap_or_default(),
                status: raw.status.unwrap_or_default(),
            },
            bug,
            feature_request: raw.sponsor_id.map(|sponsor_id| FeatureRequestDetails {
                sponsor_id: sponsor_id.unwrap_or_default(),
            }),
        }
    }
}

/// Outbound shape, borrowed from an [`Issue`]. Only the held variant's keys
/// are emitted.
#[derive(Debug, Serialize)]
struct FlatDocument<'a> {
    id: i64,
    reporter_id: i64,
    priority: i64,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_affected: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sponsor_id: Option<i64>,
}

impl<'a> From<&'a Issue> for FlatDocument<'a> {
    fn from(issue: &'a Issue) -> Self {
        let header = &issue.header;
        let mut flat = Self {
            id: header.id,
            reporter_id: header.reporter_id,
            priority: header.priority,
            status: &header.status,
            severity: None,
            version_affected: None,
            sponsor_id: None,
        };
        match &issue.variant {
            IssueVariant::Bug(details) => {
                flat.severity = Some(&details.severity);
                flat.version_affected = Some(&details.version_affected);
            }
            IssueVariant::FeatureRequest(details) => {
                flat.sponsor_id = Some(details.sponsor_id);
            }
        }
        flat
    }
}

impl Serialize for Issue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FlatDocument::from(self).serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Decode raw document bytes into an unvalidated [`IssueDocument`].
///
/// # Errors
///
/// Returns a [`DecodeError`] if the bytes are not JSON, the top level is
/// not an object, or a known key has the wrong type.
pub fn decode(raw: &[u8]) -> Result<IssueDocument, DecodeError> {
    let value: Value = serde_json::from_slice(raw).map_err(DecodeError::Malformed)?;

    if !value.is_object() {
        return Err(DecodeError::NotAnObject {
            found: json_type_name(&value),
        });
    }

    let raw_doc = RawDocument::deserialize(value).map_err(DecodeError::InvalidField)?;
    let doc = IssueDocument::from(raw_doc);
    debug!(
        id = doc.header.id,
        bug = doc.is_bug(),
        feature_request = doc.is_feature_request(),
        "decoded issue document"
    );
    Ok(doc)
}

/// Encode a validated [`Issue`] as flat document bytes.
///
/// # Errors
///
/// Returns an [`EncodeError`] if serialization fails, which indicates a
/// defect rather than bad input.
pub fn encode(issue: &Issue) -> Result<Vec<u8>, EncodeError> {
    Ok(serde_json::to_vec(issue)?)
}

/// Decode then validate.
///
/// # Errors
///
/// Returns [`IssueError::Decode`] or [`IssueError::Validation`] for the first
/// failing step.
pub fn parse_issue(raw: &[u8]) -> Result<Issue, IssueError> {
    let doc = decode(raw)?;
    Ok(Issue::try_from(doc)?)
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IssueKind;

    const BUG: &str = r#"{"id":1,"reporter_id":11,"priority":1,"status":"new","severity":"low","version_affected":"1.0.0"}"#;
    const FEATURE: &str =
        r#"{"id":3,"reporter_id":33,"priority":3,"status":"new","sponsor_id":333}"#;

    #[test]
    fn decode_bug_document() {
        let doc = decode(BUG.as_bytes()).expect("decodes");
        assert_eq!(doc.header.id, 1);
        assert_eq!(doc.header.reporter_id, 11);
        assert_eq!(doc.header.status, "new");
        assert!(doc.is_bug());
        assert!(!doc.is_feature_request());
        let bug = doc.bug.expect("bug payload");
        assert_eq!(bug.severity, "low");
        assert_eq!(bug.version_affected, "1.0.0");
    }

    #[test]
    fn decode_feature_request_document() {
        let doc = decode(FEATURE.as_bytes()).expect("decodes");
        assert!(!doc.is_bug());
        assert_eq!(
            doc.feature_request,
            Some(FeatureRequestDetails { sponsor_id: 333 })
        );
    }

    #[test]
    fn partial_bug_keys_still_mark_bug_present() {
        let doc = decode(br#"{"id":5,"severity":"high"}"#).expect("decodes");
        let bug = doc.bug.expect("bug payload present");
        assert_eq!(bug.severity, "high");
        assert_eq!(bug.version_affected, "");
    }

    #[test]
    fn lone_version_affected_marks_bug_present() {
        let doc = decode(br#"{"version_affected":"2.0"}"#).expect("decodes");
        assert!(doc.is_bug());
    }

    #[test]
    fn null_variant_keys_still_mark_payload_present() {
        let doc = decode(br#"{"id":1,"severity":null,"version_affected":null,"sponsor_id":null}"#)
            .expect("decodes");
        assert_eq!(doc.bug, Some(BugDetails::default()));
        assert_eq!(
            doc.feature_request,
            Some(FeatureRequestDetails { sponsor_id: 0 })
        );
    }

    #[test]
    fn null_severity_on_feature_request_is_not_dropped() {
        let raw = br#"{"id":3,"reporter_id":33,"priority":3,"status":"new","sponsor_id":333,"severity":null}"#;
        let doc = decode(raw).expect("decodes");
        assert!(doc.is_bug());
        assert!(doc.is_feature_request());
        assert_eq!(
            validate(&doc),
            Err(ValidationError::MissingRequiredField(RequiredField::Severity))
        );
    }

    #[test]
    fn null_header_keys_read_as_zero() {
        let doc = decode(br#"{"id":null,"status":null,"sponsor_id":9}"#).expect("decodes");
        assert_eq!(doc.header, IssueHeader::default());
        assert!(doc.is_feature_request());
    }

    #[test]
    fn missing_header_fields_default_to_zero() {
        let doc = decode(b"{}").expect("empty object decodes");
        assert_eq!(doc, IssueDocument::default());
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = decode(b"{\"id\": 1,").expect_err("truncated");
        assert!(matches!(err, DecodeError::Malformed(_)));

        let err = decode(b"not json").expect_err("garbage");
        assert!(matches!(err, DecodeError::Malformed(_)));
    }

    #[test]
    fn non_object_is_rejected() {
        let err = decode(b"[1, 11, 1, \"new\"]").expect_err("array");
        assert!(matches!(err, DecodeError::NotAnObject { found: "array" }));

        let err = decode(b"42").expect_err("number");
        assert!(matches!(err, DecodeError::NotAnObject { found: "number" }));
    }

    #[test]
    fn wrong_field_type_is_rejected() {
        let err = decode(br#"{"id":"one"}"#).expect_err("string id");
        assert!(matches!(err, DecodeError::InvalidField(_)));

        let err = decode(br#"{"id":1.5}"#).expect_err("fractional id");
        assert!(matches!(err, DecodeError::InvalidField(_)));

        let err = decode(br#"{"status":7}"#).expect_err("numeric status");
        assert!(matches!(err, DecodeError::InvalidField(_)));
    }

    #[test]
    fn encode_emits_only_held_variant_keys() {
        let issue = parse_issue(FEATURE.as_bytes()).expect("valid");
        let value: Value = serde_json::from_slice(&encode(&issue).expect("encodes")).expect("json");
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 5);
        assert_eq!(obj["sponsor_id"], 333);
        assert!(!obj.contains_key("severity"));
        assert!(!obj.contains_key("version_affected"));
    }

    #[test]
    fn encode_drops_unknown_keys() {
        let raw = br#"{"id":4,"reporter_id":44,"priority":4,"status":"new","severity":"high","version_affected":"1.0.0","extra":"extra data"}"#;
        let issue = parse_issue(raw).expect("valid");
        let encoded = encode(&issue).expect("encodes");
        let value: Value = serde_json::from_slice(&encoded).expect("json");
        assert!(value.get("extra").is_none());
        assert_eq!(decode(&encoded).expect("decodes"), IssueDocument::from(issue));
    }

    #[test]
    fn round_trip_matches_decoded_document() {
        for raw in [BUG, FEATURE] {
            let doc = decode(raw.as_bytes()).expect("decodes");
            let issue = validate(&doc).expect("valid");
            let again = decode(&encode(&issue).expect("encodes")).expect("decodes");
            assert_eq!(again, doc);
            assert_eq!(validate(&again).expect("still valid"), issue);
        }
    }

    #[test]
    fn parse_issue_reports_first_failing_step() {
        let err = parse_issue(b"nope").expect_err("decode fails");
        assert!(matches!(err, IssueError::Decode(_)));

        let err = parse_issue(br#"{"id":1}"#).expect_err("validation fails");
        assert!(matches!(
            err,
            IssueError::Validation(ValidationError::MissingRequiredField(
                RequiredField::ReporterId
            ))
        ));

        let issue = parse_issue(BUG.as_bytes()).expect("valid");
        assert_eq!(issue.kind(), IssueKind::Bug);
    }
}
