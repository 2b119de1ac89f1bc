//! Image uploads
//!
//! The bytes go to a blob storage collaborator; the editor only ever sees
//! the resulting URL. Each upload is tracked by its own ticket, so several
//! uploads can be in flight and finishing one never hides the others.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EditorError, EditorResult, StorageError};
use crate::parse::escape_attr;

/// Blob storage collaborator
pub trait BlobStore {
    /// Store `bytes` under `key` and return a URL that resolves to them
    fn upload(&self, bytes: &[u8], key: &str) -> Result<String, StorageError>;
}

/// A file picked by the user
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    #[serde(default)]
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn ensure_image(&self) -> EditorResult<()> {
        let is_image = match self.mime_type.split_once('/') {
            Some((top, sub)) => top.trim().eq_ignore_ascii_case("image") && !sub.trim().is_empty(),
            None => false,
        };
        if is_image {
            Ok(())
        } else {
            Err(EditorError::NotAnImage {
                name: self.name.clone(),
                mime_type: self.mime_type.clone(),
            })
        }
    }
}

/// One in-flight upload
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicket {
    pub id: Uuid,
    /// Storage key the host should upload the bytes under
    pub key: String,
    pub file_name: String,
}

/// Pending uploads in the order they were started
#[derive(Clone, Debug, Default)]
pub struct UploadQueue {
    pending: Vec<UploadTicket>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new upload for `file` and hand out its ticket
    pub fn begin(&mut self, file: &ImageFile, prefix: &str, now_ms: u64) -> EditorResult<UploadTicket> {
        file.ensure_image()?;
        let ticket = UploadTicket {
            id: Uuid::new_v4(),
            key: storage_key(prefix, now_ms, &file.name),
            file_name: file.name.clone(),
        };
        log::debug!("upload {} started for {}", ticket.id, ticket.key);
        self.pending.push(ticket.clone());
        Ok(ticket)
    }

    /// Remove a ticket from the queue
    pub fn finish(&mut self, id: Uuid) -> EditorResult<UploadTicket> {
        let index = self
            .pending
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| EditorError::UnknownUpload(id.to_string()))?;
        Ok(self.pending.remove(index))
    }

    pub fn is_uploading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> &[UploadTicket] {
        &self.pending
    }
}

/// Storage key for an uploaded file: `{prefix}/{timestamp}_{name}`
///
/// The name keeps letters, digits, dots, dashes and underscores; anything
/// else becomes `_` so the key is safe to use as an object path.
pub fn storage_key(prefix: &str, now_ms: u64, file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let name = if sanitized.is_empty() { "image" } else { &sanitized };
    format!("{}/{}_{}", prefix.trim_end_matches('/'), now_ms, name)
}

/// Inline image element for an uploaded asset
pub fn image_markup(url: &str, alt: &str) -> String {
    format!(
        "<img src=\"{}\" alt=\"{}\" style=\"max-width: 100%;\">",
        escape_attr(url),
        escape_attr(alt)
    )
}

/// Blob store kept in memory, used by tests and native hosts
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    base_url: String,
    objects: std::cell::RefCell<Vec<(String, Vec<u8>)>>,
    fail_with: Option<StorageError>,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// A store whose every upload fails with `error`
    pub fn failing(error: StorageError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.borrow().iter().map(|(k, _)| k.clone()).collect()
    }
}

impl BlobStore for MemoryBlobStore {
    fn upload(&self, bytes: &[u8], key: &str) -> Result<String, StorageError> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        self.objects.borrow_mut().push((key.to_string(), bytes.to_vec()));
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> ImageFile {
        ImageFile::new(name, "image/png", vec![0x89, 0x50])
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(
            storage_key("lesson-images", 1700000000000, "cell diagram (1).png"),
            "lesson-images/1700000000000_cell_diagram__1_.png"
        );
        assert_eq!(storage_key("imgs/", 5, "../x.jpg"), "imgs/5_x.jpg");
        assert_eq!(storage_key("imgs", 5, ""), "imgs/5_image");
    }

    #[test]
    fn test_rejects_non_images() {
        let mut queue = UploadQueue::new();
        let pdf = ImageFile::new("notes.pdf", "application/pdf", Vec::new());
        assert!(matches!(
            queue.begin(&pdf, "lesson-images", 0),
            Err(EditorError::NotAnImage { .. })
        ));
        assert!(!queue.is_uploading());
        assert!(ImageFile::new("x", "image", Vec::new()).ensure_image().is_err());
    }

    #[test]
    fn test_queue_tracks_each_ticket() {
        let mut queue = UploadQueue::new();
        let a = queue.begin(&png("a.png"), "p", 1).unwrap();
        let b = queue.begin(&png("b.png"), "p", 2).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(queue.pending_count(), 2);

        queue.finish(a.id).unwrap();
        assert!(queue.is_uploading());
        queue.finish(b.id).unwrap();
        assert!(!queue.is_uploading());

        assert!(matches!(queue.finish(b.id), Err(EditorError::UnknownUpload(_))));
    }

    #[test]
    fn test_image_markup_escapes() {
        assert_eq!(
            image_markup("https://cdn.test/a.png?x=1&y=2", "a \"b\".png"),
            "<img src=\"https://cdn.test/a.png?x=1&amp;y=2\" alt=\"a &quot;b&quot;.png\" style=\"max-width: 100%;\">"
        );
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryBlobStore::new("https://cdn.test/");
        let url = store.upload(&[1, 2], "p/1_a.png").unwrap();
        assert_eq!(url, "https://cdn.test/p/1_a.png");
        assert_eq!(store.keys(), vec!["p/1_a.png".to_string()]);

        let failing = MemoryBlobStore::failing(StorageError::Network("offline".into()));
        assert!(failing.upload(&[], "k").is_err());
    }
}
