use crate::error::{ApiError, PREVIEW_FAILURE_MESSAGE};
use crate::files::{FileId, MediaKind};
use tracing::{debug, warn};

/// What the preview surface currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewContent {
    /// Text body still loading.
    Loading,
    /// Media rendered straight from the stream URL.
    Stream,
    Text(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub file_id: FileId,
    pub name: String,
    pub kind: MediaKind,
    pub url: String,
    pub content: PreviewContent,
}

/// Handle for an outstanding text load; stale once the preview changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewTicket {
    generation: u64,
    pub file_id: FileId,
}

#[derive(Debug, Clone, Default)]
pub struct PreviewState {
    current: Option<Preview>,
    generation: u64,
}

impl PreviewState {
    pub fn current(&self) -> Option<&Preview> {
        self.current.as_ref()
    }

    /// Show a preview. Text kinds return a ticket for loading the body.
    pub fn open(
        &mut self,
        file_id: FileId,
        name: String,
        kind: MediaKind,
        url: String,
    ) -> Option<PreviewTicket> {
        self.generation += 1;
        let content = if kind == MediaKind::Text {
            PreviewContent::Loading
        } else {
            PreviewContent::Stream
        };
        debug!(%file_id, %kind, "opening preview");
        self.current = Some(Preview {
            file_id: file_id.clone(),
            name,
            kind,
            url,
            content,
        });
        (kind == MediaKind::Text).then_some(PreviewTicket {
            generation: self.generation,
            file_id,
        })
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.current = None;
    }

    /// Apply a loaded text body. Returns false when the ticket is stale.
    pub fn complete(&mut self, ticket: PreviewTicket, result: Result<String, ApiError>) -> bool {
        if ticket.generation != self.generation {
            debug!(file_id = %ticket.file_id, "ignoring text for a closed preview");
            return false;
        }
        let Some(preview) = self.current.as_mut() else {
            return false;
        };
        preview.content = match result {
            Ok(text) => PreviewContent::Text(text),
            Err(err) => {
                warn!(file_id = %ticket.file_id, error = %err, "preview load failed");
                PreviewContent::Failed(PREVIEW_FAILURE_MESSAGE.to_string())
            }
        };
        true
    }

    /// The renderer could not play or display streamed media.
    pub fn media_failed(&mut self) {
        if let Some(preview) = self.current.as_mut() {
            let message = preview.kind.load_failure_message();
            preview.content = PreviewContent::Failed(message.to_string());
        }
    }
}
