use std::path::Path;

use crate::domain::entities::record::Record;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    Message(String),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ReadError {}

/// Produces one snapshot: an ordered record sequence restricted to the
/// catalogue's fields, header and trailing footer row already discarded.
pub trait SnapshotReader: Send + Sync {
    fn read_snapshot(&self, path: &Path) -> Result<Vec<Record>, ReadError>;
}
