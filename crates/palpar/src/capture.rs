//! Screenshot persistence and report attachments.
//!
//! A capture is written to the configured screenshot directory under a
//! timestamped name, and registered with an [`AttachmentSink`] so the
//! surrounding test report can embed it. The sink is a seam: the library
//! ships an in-memory implementation, report backends provide their own.

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::result::{PalparError, PalparResult};

/// Longest composed capture file name before falling back to timestamp-only.
pub const MAX_CAPTURE_NAME_LEN: usize = 200;

/// Build the capture file name for `doc` at `millis`.
///
/// The name is `{doc}.{millis}.png`; when that reaches 200 characters the
/// doc part is dropped entirely and the name is `{millis}.png`.
#[must_use]
pub fn capture_file_name(doc: &str, millis: i64) -> String {
    let name = format!("{doc}.{millis}.png");
    if name.len() >= MAX_CAPTURE_NAME_LEN {
        format!("{millis}.png")
    } else {
        name
    }
}

/// A file registered with the test report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique attachment id
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Where the file was stored
    pub path: PathBuf,
    /// MIME type of the payload
    pub media_type: String,
    /// Base64-encoded payload, for reports serialized to JSON
    pub payload_base64: String,
}

impl Attachment {
    /// Create a PNG attachment from raw bytes.
    #[must_use]
    pub fn png(name: impl Into<String>, path: impl Into<PathBuf>, data: &[u8]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            path: path.into(),
            media_type: "image/png".to_string(),
            payload_base64: base64::engine::general_purpose::STANDARD.encode(data),
        }
    }

    /// Decode the payload back to raw bytes.
    pub fn payload(&self) -> PalparResult<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.payload_base64)
            .map_err(|e| PalparError::CaptureError {
                message: format!("attachment payload is not valid base64: {e}"),
            })
    }
}

/// Receives attachments on behalf of a test-reporting backend.
pub trait AttachmentSink {
    /// Register an attachment with the report.
    fn attach(&mut self, attachment: Attachment) -> PalparResult<()>;
}

/// In-memory sink collecting attachments, for tests and simple reports.
#[derive(Debug, Default)]
pub struct MemorySink {
    attachments: Vec<Attachment>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All collected attachments.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }
}

impl AttachmentSink for MemorySink {
    fn attach(&mut self, attachment: Attachment) -> PalparResult<()> {
        self.attachments.push(attachment);
        Ok(())
    }
}

/// Writes captures under a fixed directory.
#[derive(Debug, Clone)]
pub struct CaptureStore {
    dir: PathBuf,
}

impl CaptureStore {
    /// Create a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist PNG bytes for `doc`, returning the stored path.
    ///
    /// # Errors
    ///
    /// Returns [`PalparError::Io`] when the directory or file cannot be
    /// written.
    pub fn save(&self, doc: &str, png: &[u8]) -> PalparResult<PathBuf> {
        let millis = chrono::Utc::now().timestamp_millis();
        self.save_at(doc, millis, png)
    }

    /// Persist PNG bytes with an explicit timestamp.
    pub fn save_at(&self, doc: &str, millis: i64, png: &[u8]) -> PalparResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(capture_file_name(doc, millis));
        std::fs::write(&path, png)?;
        tracing::info!(path = %path.display(), "capture stored");
        Ok(path)
    }
}
