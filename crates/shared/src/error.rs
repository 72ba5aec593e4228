use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    StorageUnavailable,
    WriteFailed,
    ReadFailed,
    UnsupportedFile,
}

#[derive(Debug, Error)]
pub enum MediaStoreError {
    #[error("media store unavailable: {source}")]
    StorageUnavailable { source: anyhow::Error },
    #[error("write failed for media {id}: {source}")]
    WriteFailed { id: String, source: anyhow::Error },
    #[error("reading persisted media failed: {source}")]
    ReadFailed { source: anyhow::Error },
    #[error("unsupported file '{name}' (mime type '{mime_type}')")]
    UnsupportedFile { name: String, mime_type: String },
}

impl MediaStoreError {
    pub fn unavailable(source: impl Into<anyhow::Error>) -> Self {
        Self::StorageUnavailable {
            source: source.into(),
        }
    }

    pub fn write_failed(id: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::WriteFailed {
            id: id.into(),
            source: source.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::StorageUnavailable { .. } => ErrorCode::StorageUnavailable,
            Self::WriteFailed { .. } => ErrorCode::WriteFailed,
            Self::ReadFailed { .. } => ErrorCode::ReadFailed,
            Self::UnsupportedFile { .. } => ErrorCode::UnsupportedFile,
        }
    }
}
