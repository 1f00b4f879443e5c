//! Provides the request body type produced by multipart forms.

use crate::file::File;
use futures_lite::io::AsyncRead;
use std::{
    fmt,
    io::{self, Cursor, Read},
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

/// Contains the body of an asynchronous HTTP request.
///
/// This type is used to encapsulate the underlying stream or region of memory
/// where the contents of the body are stored. An [`AsyncBody`] can be created
/// from many types of sources using the [`Into`](std::convert::Into) trait or
/// one of its constructor functions.
///
/// Multipart forms built by [`FormDataBuilder`](crate::forms::FormDataBuilder)
/// are assembled from bodies, and a finished
/// [`FormData`](crate::forms::FormData) converts back into one so it can be
/// handed to whatever transport sends the request.
pub struct AsyncBody(Inner);

/// All possible body implementations.
enum Inner {
    /// An empty body.
    Empty,

    /// A body stored in memory.
    Buffer(Cursor<Buffer>),

    /// An asynchronous reader.
    Reader(Pin<Box<dyn AsyncRead + Send + Sync>>, Option<u64>),
}

/// An in-memory byte buffer that is either borrowed for the life of the
/// program, owned, or shared with other values.
#[derive(Clone)]
pub(crate) enum Buffer {
    Static(&'static [u8]),
    Owned(Vec<u8>),
    Shared(Arc<[u8]>),
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        match self {
            Self::Static(bytes) => bytes,
            Self::Owned(bytes) => bytes,
            Self::Shared(bytes) => bytes,
        }
    }
}

impl AsyncBody {
    /// Create a new empty body.
    ///
    /// An empty body represents the *absence* of a body, which is semantically
    /// different than the presence of a body of zero length.
    pub const fn empty() -> Self {
        Self(Inner::Empty)
    }

    /// Create a new body from a potentially static byte buffer.
    ///
    /// The body will have a known length equal to the number of bytes given.
    ///
    /// This will try to prevent a copy if the type passed in can be re-used,
    /// otherwise the buffer will be copied first. This method guarantees to not
    /// require a copy for the following types:
    ///
    /// - `&'static [u8]`
    /// - `&'static str`
    /// - `Arc<[u8]>`
    ///
    /// # Examples
    ///
    /// ```
    /// use flatform::AsyncBody;
    ///
    /// // Create a body from a static string.
    /// let body = AsyncBody::from_bytes_static("hello world");
    /// ```
    #[inline]
    pub fn from_bytes_static<B>(bytes: B) -> Self
    where
        B: AsRef<[u8]> + 'static,
    {
        Self::from_buffer(Buffer::from_bytes_static(bytes))
    }

    pub(crate) fn from_buffer(buffer: Buffer) -> Self {
        Self(Inner::Buffer(Cursor::new(buffer)))
    }

    /// Create a streaming body that reads from the given reader.
    ///
    /// The body will have an unknown length, which in turn makes the length
    /// of any form containing it unknown.
    pub fn from_reader<R>(read: R) -> Self
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        Self(Inner::Reader(Box::pin(read), None))
    }

    /// Create a streaming body with a known length.
    ///
    /// Giving a value for `length` that doesn't actually match how much data
    /// the reader will produce may result in errors when sending the body in a
    /// request.
    pub fn from_reader_sized<R>(read: R, length: u64) -> Self
    where
        R: AsyncRead + Send + Sync + 'static,
    {
        Self(Inner::Reader(Box::pin(read), Some(length)))
    }

    /// Report if this body is empty.
    ///
    /// This is not necessarily the same as checking for `self.len() ==
    /// Some(0)`. Since HTTP message bodies are optional, there is a semantic
    /// difference between the absence of a body and the presence of a
    /// zero-length body. This method will only return `true` for the former.
    pub fn is_empty(&self) -> bool {
        matches!(self.0, Inner::Empty)
    }

    /// Get the size of the body, if known.
    ///
    /// The value reported by this method is used to set the `Content-Length`
    /// for outgoing requests.
    pub fn len(&self) -> Option<u64> {
        match &self.0 {
            Inner::Empty => Some(0),
            Inner::Buffer(bytes) => Some(bytes.get_ref().as_ref().len() as u64),
            Inner::Reader(_, len) => *len,
        }
    }

    /// If this body is repeatable, reset the body stream back to the start of
    /// the content. Returns `false` if the body cannot be reset.
    pub fn reset(&mut self) -> bool {
        match &mut self.0 {
            Inner::Empty => true,
            Inner::Buffer(cursor) => {
                cursor.set_position(0);
                true
            }
            Inner::Reader(_, _) => false,
        }
    }
}

impl Buffer {
    #[inline]
    pub(crate) fn from_bytes_static<B>(bytes: B) -> Self
    where
        B: AsRef<[u8]> + 'static,
    {
        castaway::match_type!(bytes, {
            Buffer as bytes => bytes,
            &'static [u8] as bytes => Self::Static(bytes),
            &'static str as bytes => Self::Static(bytes.as_bytes()),
            Arc<[u8]> as bytes => Self::Shared(bytes),
            Vec<u8> as bytes => Self::Owned(bytes),
            String as bytes => Self::Owned(bytes.into_bytes()),
            bytes => Self::Owned(bytes.as_ref().to_vec()),
        })
    }

    /// Convert into a buffer that can be cloned without copying.
    pub(crate) fn into_shared(self) -> Self {
        match self {
            Self::Owned(bytes) => Self::Shared(bytes.into()),
            buffer => buffer,
        }
    }
}

impl AsyncRead for AsyncBody {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        match &mut self.0 {
            Inner::Empty => Poll::Ready(Ok(0)),
            Inner::Buffer(cursor) => Poll::Ready(cursor.read(buf)),
            Inner::Reader(read, _) => AsyncRead::poll_read(read.as_mut(), cx, buf),
        }
    }
}

impl Default for AsyncBody {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<()> for AsyncBody {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}

impl From<Vec<u8>> for AsyncBody {
    fn from(body: Vec<u8>) -> Self {
        Self::from_buffer(Buffer::Owned(body))
    }
}

impl From<&'_ [u8]> for AsyncBody {
    fn from(body: &[u8]) -> Self {
        body.to_vec().into()
    }
}

impl From<String> for AsyncBody {
    fn from(body: String) -> Self {
        body.into_bytes().into()
    }
}

impl From<&'_ str> for AsyncBody {
    fn from(body: &str) -> Self {
        body.as_bytes().into()
    }
}

impl From<File> for AsyncBody {
    fn from(file: File) -> Self {
        Self::from_buffer(file.into_buffer())
    }
}

impl From<&'_ File> for AsyncBody {
    fn from(file: &File) -> Self {
        file.clone().into()
    }
}

impl<T: Into<Self>> From<Option<T>> for AsyncBody {
    fn from(body: Option<T>) -> Self {
        match body {
            Some(body) => body.into(),
            None => Self::empty(),
        }
    }
}

impl fmt::Debug for AsyncBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.len() {
            Some(len) => write!(f, "AsyncBody({})", len),
            None => write!(f, "AsyncBody(?)"),
        }
    }
}
