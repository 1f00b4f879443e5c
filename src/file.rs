//! Binary file values attached to forms.

use crate::body::Buffer;
use mime::Mime;
use std::{fmt, fs, io, path::Path};

/// A binary file attached to a form, such as an uploaded image.
///
/// The payload is held in memory and shared: cloning a `File` never copies
/// the bytes, so a file can be referenced from any number of encoded fields
/// and multipart parts while its data stays owned in one place.
#[derive(Clone)]
pub struct File {
    data: Buffer,
    name: Option<String>,
    content_type: Option<Mime>,
}

impl File {
    /// Create a file from a byte buffer.
    ///
    /// Static buffers (`&'static [u8]`, `&'static str`) and `Arc<[u8]>` are
    /// used as-is. Other buffers are moved behind a reference count once.
    pub fn from_bytes<B>(bytes: B) -> Self
    where
        B: AsRef<[u8]> + 'static,
    {
        Self {
            data: Buffer::from_bytes_static(bytes).into_shared(),
            name: None,
            content_type: None,
        }
    }

    /// Read a file from disk into memory.
    ///
    /// The filename is taken from the last component of the path.
    pub fn read(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = Self::from_bytes(fs::read(path)?);

        Ok(match path.file_name() {
            Some(name) => file.with_name(name.to_string_lossy()),
            None => file,
        })
    }

    /// Set the filename reported for this file.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the content type reported for this file.
    pub fn with_content_type(mut self, content_type: Mime) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Get the filename, if one was set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Get the content type, if one was set.
    pub fn content_type(&self) -> Option<&Mime> {
        self.content_type.as_ref()
    }

    /// Get the file contents.
    pub fn bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    /// Get the size of the file contents in bytes.
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    /// Returns true if the file has no contents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn into_buffer(self) -> Buffer {
        self.data
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.content_type == other.content_type
            && self.bytes() == other.bytes()
    }
}

impl fmt::Debug for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.len())
            .finish()
    }
}
