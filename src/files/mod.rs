//! File records and the collection built from paginated list responses.
//!
//! Handles alias-based field resolution, envelope normalization,
//! id-based page merging and media classification.

pub mod classify;
pub mod collection;
pub mod format;
pub mod normalize;
pub mod resolve;
pub mod schema;
pub mod thumbnail;

pub use classify::{classify, MediaKind, PrimaryAction};
pub use collection::{merge_by_id, FileCollection};
pub use normalize::{normalize_items, normalize_page, normalize_pagination};
pub use resolve::resolve_field;
pub use schema::{CategoryFilter, FileId, FileRecord, PageInfo};
pub use thumbnail::Thumbnail;
