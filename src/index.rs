//! In-memory inverted index.
//!
//! The index is a list of immutable [`Segment`]s wrapped in an
//! [`IndexSnapshot`]. Writers never modify a published snapshot; they build
//! the next one and hand it back for publication:
//!
//! - a full build writes fresh segments, merging them after each source,
//! - an upsert shares every existing segment and appends a one-document
//!   segment.

pub mod builder;
pub mod posting;
pub mod segment;
pub mod snapshot;

pub use builder::{BuildSummary, IndexBuilder};
pub use posting::{DocOrdinal, Posting, PostingList};
pub use segment::{Segment, SegmentWriter};
pub use snapshot::IndexSnapshot;
