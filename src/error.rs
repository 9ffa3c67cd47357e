use crate::files::FileId;
use thiserror::Error;

/// Failure talking to the file API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Server returned {status} for {path}")]
    Status { status: u16, path: String },
}

/// Failure of a browser operation, carrying the message shown to the user.
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("No signed-in user")]
    NoActiveUser,
    #[error("File has no id")]
    MissingId,
    #[error("No file with id {}", join_ids(.0))]
    NotLoaded(Vec<FileId>),
    #[error("{message}")]
    Mutation {
        message: &'static str,
        #[source]
        source: ApiError,
    },
}

pub const LIST_FAILURE_MESSAGE: &str = "Failed to load files. Please try again.";
pub const DELETE_FAILURE_MESSAGE: &str = "Failed to remove file.";
pub const BULK_DELETE_FAILURE_MESSAGE: &str = "Failed to remove files.";
pub const PREVIEW_FAILURE_MESSAGE: &str = "Failed to load file.";

impl ApiError {
    /// Inline message for a failed list fetch.
    pub fn list_message(&self) -> String {
        match self {
            Self::Status { .. } => LIST_FAILURE_MESSAGE.to_string(),
            Self::Transport(err) => err.to_string(),
        }
    }
}

impl BrowserError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

fn join_ids(ids: &[FileId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_failures_read_uniformly() {
        let err = ApiError::Status { status: 503, path: "/api/UserFiles".into() };
        assert_eq!(err.list_message(), LIST_FAILURE_MESSAGE);
        assert_eq!(err.to_string(), "Server returned 503 for /api/UserFiles");
    }

    #[test]
    fn mutation_errors_show_their_alert() {
        let err = BrowserError::Mutation {
            message: BULK_DELETE_FAILURE_MESSAGE,
            source: ApiError::Status { status: 500, path: "/api/UserFiles".into() },
        };
        assert_eq!(err.user_message(), "Failed to remove files.");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn unknown_ids_are_listed() {
        let err = BrowserError::NotLoaded(vec![FileId::Int(4), FileId::from("x")]);
        assert_eq!(err.user_message(), "No file with id 4, x");
    }
}
