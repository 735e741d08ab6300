//! issuedoc-core library.
//!
//! An [`Issue`](model::Issue) is exactly one of two variants, bug or feature
//! request. It travels to and from an opaque document store as a flat JSON
//! object; [`codec`] turns bytes into a candidate [`IssueDocument`](model::IssueDocument),
//! [`codec::validate`] enforces the required-field and exclusivity rules, and
//! [`flow`] wires both ends to a [`DocumentStore`](store::DocumentStore).
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums in the library; every error maps to
//!   a stable [`ErrorCode`](error::ErrorCode). `anyhow::Result` only at the
//!   config boundary.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).

pub mod codec;
pub mod config;
pub mod error;
pub mod flow;
pub mod model;
pub mod store;

pub use codec::{decode, encode, parse_issue, validate};
pub use error::{ErrorCode, IssueError};
pub use model::{Issue, IssueDocument, IssueKind};
