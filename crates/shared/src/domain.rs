use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};

/// Container extension that is treated as video even when the MIME type is missing.
pub const VIDEO_EXTENSION_FALLBACK: &str = ".mov";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MediaId(pub String);

impl MediaId {
    /// Identity derived from file attributes. Distinct files sharing name, timestamp
    /// and size map to the same id.
    pub fn from_attributes(name: &str, last_modified: i64, size: u64) -> Self {
        Self(format!("{name}-{last_modified}-{size}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classifies a selected file, returning `None` for anything that is neither
    /// an image nor a video.
    pub fn classify(mime_type: &str, name: &str) -> Option<Self> {
        let mime_type = mime_type.to_ascii_lowercase();
        let has_video_extension = name
            .to_ascii_lowercase()
            .ends_with(VIDEO_EXTENSION_FALLBACK);

        if mime_type.starts_with("video/") || has_video_extension {
            Some(Self::Video)
        } else if mime_type.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted media entry. Records are immutable once written; a put with the
/// same id replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    pub id: MediaId,
    pub name: String,
    pub kind: MediaKind,
    pub blob: Arc<[u8]>,
    pub order: i64,
}

/// A raw file offered for ingestion, as produced by a picker or a drop.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub mime_type: String,
    /// Last-modified timestamp in milliseconds since the UNIX epoch.
    pub last_modified: i64,
    pub size: u64,
    pub bytes: Arc<[u8]>,
}

impl FileInput {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        last_modified: i64,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            last_modified,
            size: bytes.len() as u64,
            bytes,
        }
    }

    pub fn id(&self) -> MediaId {
        MediaId::from_attributes(&self.name, self.last_modified, self.size)
    }

    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::classify(&self.mime_type, &self.name)
    }
}
