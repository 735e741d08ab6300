//! Writer and reader flows over a [`DocumentStore`].
//!
//! - [`ingest`]: decode, validate, re-encode and store one document. Invalid
//!   documents are never written.
//! - [`seed_raw`]: store documents verbatim, valid or not.
//! - [`read_narrowed`]: scan the store once and keep the documents that
//!   validate and narrow to the requested variant. Each document is handled
//!   on its own: a failure is recorded as a [`Rejection`] and the scan
//!   carries on.

use tracing::{debug, info, warn};

use crate::codec::{decode, encode, parse_issue};
use crate::error::IssueError;
use crate::model::{BugIssue, FeatureRequestIssue, Issue, NarrowError};
use crate::store::{DocumentStore, StoreError};

/// The six documents the reader demo seeds: two clean bugs, a feature
/// request, a bug with an unknown key, a bug missing `version_affected`,
/// and a document carrying both variants.
pub const SAMPLE_DOCUMENTS: [&str; 6] = [
    r#"{"id":1,"reporter_id":11,"priority":1,"status":"new","severity":"low","version_affected":"1.0.0"}"#,
    r#"{"id":2,"reporter_id":22,"priority":2,"status":"new","severity":"middle","version_affected":"1.0.0"}"#,
    r#"{"id":3,"reporter_id":33,"priority":3,"status":"new","sponsor_id":333}"#,
    r#"{"id":4,"reporter_id":44,"priority":4,"status":"new","severity":"high","version_affected":"1.0.0","extra":"extra data"}"#,
    r#"{"id":5,"reporter_id":55,"priority":5,"status":"new","severity":"high"}"#,
    r#"{"id":6,"reporter_id":66,"priority":6,"status":"new","severity":"high","version_affected":"1.0.0","sponsor_id":666}"#,
];

/// One document that did not make it into a [`BatchReport`].
#[derive(Debug)]
pub struct Rejection {
    /// Position in the scan (0-based).
    pub index: usize,
    /// The document's `id`, when it decoded far enough to have a non-zero one.
    pub id: Option<i64>,
    pub error: IssueError,
}

/// Outcome of a full scan.
#[derive(Debug)]
pub struct BatchReport<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<Rejection>,
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

impl<T> BatchReport<T> {
    /// Documents seen (accepted + rejected).
    #[must_use]
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    /// True if nothing was rejected.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Rejections caused by bad documents, leaving out well-formed documents
    /// of the other variant.
    pub fn invalid(&self) -> impl Iterator<Item = &Rejection> {
        self.rejected.iter().filter(|r| !r.error.is_wrong_variant())
    }
}

/// Validate one document and write its canonical encoding.
///
/// Unknown keys in `raw` are dropped; what is stored is `encode` of the
/// validated issue.
///
/// # Errors
///
/// Returns the decode, validation, encode or store error; nothing is
/// written on failure.
pub fn ingest<S>(store: &mut S, raw: &[u8]) -> Result<Issue, IssueError>
where
    S: DocumentStore + ?Sized,
{
    let issue = parse_issue(raw)?;
    let doc = encode(&issue)?;
    store.write_one(&doc)?;
    info!(id = issue.id(), kind = %issue.kind(), "stored issue");
    Ok(issue)
}

/// Write documents verbatim, without decoding or validating them.
///
/// Returns the number written.
///
/// # Errors
///
/// Stops at the first failed write and returns its [`StoreError`].
pub fn seed_raw<S, I, D>(store: &mut S, docs: I) -> Result<usize, StoreError>
where
    S: DocumentStore + ?Sized,
    I: IntoIterator<Item = D>,
    D: AsRef<[u8]>,
{
    let mut written = 0usize;
    for doc in docs {
        store.write_one(doc.as_ref())?;
        written += 1;
    }
    info!(written, "seeded raw documents");
    Ok(written)
}

/// Scan the store and narrow every valid document with `narrow`.
///
/// # Errors
///
/// Returns a [`StoreError`] only if the scan itself cannot start. Per-document
/// failures, including unreadable rows, end up in [`BatchReport::rejected`].
pub fn read_narrowed<S, T, F>(store: &S, mut narrow: F) -> Result<BatchReport<T>, StoreError>
where
    S: DocumentStore + ?Sized,
    F: FnMut(Issue) -> Result<T, NarrowError>,
{
    let rows = store.read_all()?;
    let mut report = BatchReport::default();

    for (index, row) in rows.into_iter().enumerate() {
        let mut id = None;
        let outcome = row.map_err(IssueError::from).and_then(|raw| {
            let doc = decode(&raw)?;
            id = (doc.header.id != 0).then_some(doc.header.id);
            let issue = Issue::try_from(doc)?;
            Ok(narrow(issue)?)
        });

        match outcome {
            Ok(item) => report.accepted.push(item),
            Err(error) => {
                if error.is_wrong_variant() {
                    debug!(index, ?id, "skipping document of the other variant");
                } else {
                    warn!(index, ?id, code = %error.code(), %error, "skipping invalid document");
                }
                report.rejected.push(Rejection { index, id, error });
            }
        }
    }

    info!(
        total = report.total(),
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "scanned document store"
    );
    Ok(report)
}

/// Every valid bug in the store.
///
/// # Errors
///
/// See [`read_narrowed`].
pub fn collect_bugs<S>(store: &S) -> Result<BatchReport<BugIssue>, StoreError>
where
    S: DocumentStore + ?Sized,
{
    read_narrowed(store, Issue::into_bug)
}

/// Every valid feature request in the store.
///
/// # Errors
///
/// See [`read_narrowed`].
pub fn collect_feature_requests<S>(
    store: &S,
) -> Result<BatchReport<FeatureRequestIssue>, StoreError>
where
    S: DocumentStore + ?Sized,
{
    read_narrowed(store, Issue::into_feature_request)
}

/// Every valid issue in the store, regardless of variant.
///
/// # Errors
///
/// See [`read_narrowed`].
pub fn collect_issues<S>(store: &S) -> Result<BatchReport<Issue>, StoreError>
where
    S: DocumentStore + ?Sized,
{
    read_narrowed(store, Ok)
}
