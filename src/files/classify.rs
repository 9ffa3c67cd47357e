use super::schema::FileRecord;
use std::fmt;

/// How a record is presented and opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Text,
    File,
}

/// Primary action a record offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Play,
    Preview,
    Open,
}

impl PrimaryAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Preview => "Preview",
            Self::Open => "Open",
        }
    }
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::File => "file",
        }
    }

    fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        match mime.split_once('/')?.0 {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    fn from_category(category: &str) -> Option<Self> {
        match category {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Everything except plain files opens in the in-app preview.
    pub fn is_previewable(self) -> bool {
        !matches!(self, Self::File)
    }

    pub fn primary_action(self) -> PrimaryAction {
        match self {
            Self::Video | Self::Audio => PrimaryAction::Play,
            Self::Image | Self::Text => PrimaryAction::Preview,
            Self::File => PrimaryAction::Open,
        }
    }

    /// Message shown inside the preview when the media cannot be rendered.
    pub fn load_failure_message(self) -> &'static str {
        match self {
            Self::Image => "Unable to load image.",
            Self::Video => "Unable to load video.",
            Self::Audio => "Unable to load audio.",
            Self::Text => "Unable to load text.",
            Self::File => "Unable to load file.",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Mime type prefix first, then the recognized category words, else `File`.
pub fn classify(record: &FileRecord) -> MediaKind {
    record
        .mime_type()
        .and_then(MediaKind::from_mime)
        .or_else(|| record.category().as_deref().and_then(MediaKind::from_category))
        .unwrap_or(MediaKind::File)
}

impl FileRecord {
    pub fn media_kind(&self) -> MediaKind {
        classify(self)
    }
}
