//! In-flight form state
//!
//! [`FormInput`] is the ephemeral, caller-owned map of raw field values (and
//! attachment metadata) for one submission attempt. The record store never
//! sees it; only a [`crate::record::Record`] built from it is persisted.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Raw field values plus attachment metadata for one attempt.
#[derive(Debug, Clone, Default)]
pub struct FormInput {
    values: BTreeMap<String, String>,
    attachments: BTreeMap<String, Attachment>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: &str, value: &str) {
        self.values.insert(field.to_string(), value.to_string());
    }

    /// Attach file metadata to a field. The field's string value is set to
    /// the file name so an attachment counts as a non-empty value.
    pub fn attach(&mut self, field: &str, attachment: Attachment) {
        self.values
            .insert(field.to_string(), attachment.file_name.clone());
        self.attachments.insert(field.to_string(), attachment);
    }

    /// Raw value of a field; absent fields read as empty.
    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn attachment(&self, field: &str) -> Option<&Attachment> {
        self.attachments.get(field)
    }

    /// Opaque handle passed to custom checks.
    pub fn handle<'a>(&'a self, field: &str) -> FieldHandle<'a> {
        FieldHandle {
            raw: self.value(field),
            attachment: self.attachment(field),
        }
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

/// View of one field's original state, for custom checks whose validity
/// depends on more than the string value.
#[derive(Debug, Clone, Copy)]
pub struct FieldHandle<'a> {
    /// The untrimmed value as entered.
    pub raw: &'a str,
    /// Attachment metadata, when a file is attached to this field.
    pub attachment: Option<&'a Attachment>,
}

/// Metadata and decoded bytes for a file attached to a field.
///
/// Only the metadata participates in validation; the bytes are available to
/// the caller but are never inlined into a persisted record.
#[derive(Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    bytes: Vec<u8>,
}

impl Attachment {
    /// Read a file into an attachment. This is the explicit asynchronous
    /// replacement for the callback-based reader in browser form code:
    /// awaited before submission, never mutating outer state.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = guess_content_type(&file_name).to_string();
        Ok(Self {
            size_bytes: bytes.len() as u64,
            file_name,
            content_type,
            bytes,
        })
    }

    /// Build an attachment from already-decoded bytes.
    pub fn from_bytes(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_read_as_empty() {
        let input = FormInput::new();
        assert_eq!(input.value("phone"), "");
        assert!(input.attachment("photo").is_none());
    }

    #[test]
    fn attach_sets_the_string_value() {
        let mut input = FormInput::new();
        input.attach(
            "photo",
            Attachment::from_bytes("me.png", "image/png", vec![0u8; 16]),
        );
        assert_eq!(input.value("photo"), "me.png");
        let handle = input.handle("photo");
        assert_eq!(handle.attachment.unwrap().size_bytes, 16);
    }

    #[test]
    fn content_type_guessed_from_extension() {
        assert_eq!(guess_content_type("photo.JPG"), "image/jpeg");
        assert_eq!(guess_content_type("photo.png"), "image/png");
        assert_eq!(guess_content_type("notes.txt"), "application/octet-stream");
    }
}
