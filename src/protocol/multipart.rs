//! Multipart upload bodies for the `add` endpoint.
//!
//! A [`MultipartBody`] is a plain list of [`Part`]s; building one does no I/O.
//! The transport turns it into the actual `multipart/form-data` stream.
//!
//! Every part is sent under the `file` field. For directory uploads the part's
//! filename is the file's relative path, and the cluster rebuilds the tree from
//! those paths. Content types are taken from [`FileWithName::content_type`] when
//! set, otherwise guessed from the extension, otherwise `application/octet-stream`.
//!
//! # Examples
//!
//! ```
//! use cluster_http_client::FileWithName;
//! use cluster_http_client::protocol::MultipartBody;
//!
//! let body = MultipartBody::directory(vec![
//!     FileWithName::new("site/index.html", "<h1>hi</h1>"),
//!     FileWithName::new("site/data.bin", vec![0u8, 1, 2]),
//! ]);
//! assert_eq!(body.len(), 2);
//! assert_eq!(body.parts()[0].content_type, "text/html");
//! assert_eq!(body.parts()[1].content_type, "application/octet-stream");
//! ```

use super::constants::{CAR_CONTENT_TYPE, FILE_FIELD, OCTET_STREAM};
use crate::types::FileWithName;
use bytes::Bytes;

/// One named part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Form field name.
    pub field: String,
    /// Filename sent in `Content-Disposition`.
    pub file_name: String,
    /// Part `Content-Type`.
    pub content_type: String,
    /// Part payload.
    pub contents: Bytes,
}

impl Part {
    fn from_file(file: FileWithName, fallback: Option<&str>) -> Self {
        let content_type = match (file.content_type, fallback) {
            (Some(explicit), _) => explicit,
            (None, Some(fallback)) => fallback.to_string(),
            (None, None) => guess_content_type(&file.name),
        };
        Part {
            field: FILE_FIELD.to_string(),
            file_name: file.name,
            content_type,
            contents: file.contents,
        }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

/// A multipart request body: an ordered list of parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartBody {
    parts: Vec<Part>,
}

impl MultipartBody {
    /// An empty body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Body with a single file part.
    pub fn single(file: FileWithName) -> Self {
        let mut body = Self::new();
        body.push_file(file);
        body
    }

    /// Body with one part per file, in the given order.
    pub fn directory<I>(files: I) -> Self
    where
        I: IntoIterator<Item = FileWithName>,
    {
        let mut body = Self::new();
        for file in files {
            body.push_file(file);
        }
        body
    }

    /// Body holding one CAR archive.
    pub fn car(file: FileWithName) -> Self {
        MultipartBody {
            parts: vec![Part::from_file(file, Some(CAR_CONTENT_TYPE))],
        }
    }

    /// Append a file part.
    pub fn push_file(&mut self, file: FileWithName) {
        self.parts.push(Part::from_file(file, None));
    }

    /// Append an already-built part.
    pub fn push_part(&mut self, part: Part) {
        self.parts.push(part);
    }

    /// Parts in upload order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Consume the body into its parts.
    pub fn into_parts(self) -> Vec<Part> {
        self.parts
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether there are no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Sum of part payload sizes.
    pub fn content_length(&self) -> usize {
        self.parts.iter().map(Part::len).sum()
    }
}

/// Content type for `name` based on its extension.
pub fn guess_content_type(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| OCTET_STREAM.to_string())
}
