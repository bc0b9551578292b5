//! # callgrid - Call-Tree Flattening Core
//!
//! callgrid converts the hierarchical call tree of a recorded distributed
//! trace into the flat, ordered, identifier-linked sequence of display rows
//! that a viewer renders as an indented call stack.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              Upstream (outside this crate)               │
//! │   stored spans ──► span aligner ──► CallTree             │
//! └───────────────────────┬──────────────────────────────────┘
//!                         │ depth-first traversal
//!                         ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                 callgrid (this crate)                    │
//! │                                                          │
//! │  ┌────────────┐   ┌────────────────┐   ┌─────────────┐  │
//! │  │  flatten   │──▶│ RecordBuilder  │──▶│   Records   │  │
//! │  │  (driver)  │   │ (ids, linkage) │   │   (rows)    │  │
//! │  └────────────┘   └───────┬────────┘   └─────────────┘  │
//! │                           │                              │
//! │                           ▼                              │
//! │                   ┌───────────────┐                      │
//! │                   │  resolve_api  │                      │
//! │                   │  (3-way       │                      │
//! │                   │   fallback)   │                      │
//! │                   └───────────────┘                      │
//! └───────────────────────┬──────────────────────────────────┘
//!                         │ serialized rows
//!                         ▼
//!              presentation / transport layer
//! ```
//!
//! ## Module Structure
//!
//! - [`calltree`]: arena-backed call tree with depth-first traversal
//! - [`span`]: span alignments, annotations, API metadata
//! - [`registry`]: service type / annotation key lookup contracts
//! - [`api`]: per-span title/class/description resolution
//! - [`record`]: the flat display rows, ready to serialize
//! - [`builder`]: id assignment, parent linkage, row emission
//! - [`flatten`]: depth-first driver producing the full row sequence
//! - [`domain`]: newtype ids and error types
//!
//! ## Key Invariants
//!
//! - Record ids are 1..=N within one conversion run, assigned in visit
//!   order; 0 is reserved on the wire for "no parent" and is
//!   unrepresentable as a [`RecordId`].
//! - Every row's parent id is an id assigned earlier in the same run; the
//!   root span row alone has no parent.
//! - Title resolution never fails: malformed descriptors fall back to
//!   their raw text, spans without API metadata fall back to registry
//!   error names or a fixed generic title.
//!
//! A [`RecordBuilder`] is scoped to one conversion run on one thread. The
//! call tree is fully materialized before conversion starts, so conversion
//! is synchronous and always runs to completion (or aborts with a
//! [`ConvertError`] on a structurally broken tree).

pub mod api;
pub mod builder;
pub mod calltree;
pub mod domain;
pub mod flatten;
pub mod record;
pub mod registry;
pub mod span;

pub use api::{resolve_api, Api, ApiDescription, DescriptorParser};
pub use builder::{simple_exception_name, RecordBuilder};
pub use calltree::{CallTree, NodeId};
pub use domain::{ConvertError, DescriptorParseError, RecordId};
pub use flatten::flatten;
pub use record::{Record, RecordKind, SpanDetail};
pub use span::SpanAlignment;
