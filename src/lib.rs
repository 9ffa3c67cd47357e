//! filedeck: client for per-user remote file stores.
//!
//! Normalizes loosely shaped list responses into one deduplicated,
//! incrementally paginated collection and keeps it consistent across
//! searches, filters, selections and deletions.

pub mod api;
pub mod browser;
pub mod config;
pub mod error;
pub mod files;
pub mod identity;

pub use api::{Endpoints, FileApi, HttpFileApi, ListQuery};
pub use browser::{BrowserSettings, FileBrowser, OpenAction};
pub use config::Config;
pub use error::{ApiError, BrowserError};
pub use files::{FileCollection, FileId, FileRecord, MediaKind};
pub use identity::{UserId, UserIdentity};
