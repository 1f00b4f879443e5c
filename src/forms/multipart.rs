use std::{
    borrow::Cow,
    collections::VecDeque,
    io,
    iter::repeat_with,
    pin::Pin,
    task::{Context, Poll},
};

use futures_lite::{
    io::{Chain, Cursor},
    ready,
    AsyncRead,
    AsyncReadExt,
};
use http::header::{HeaderName, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};

use crate::{
    encode::{Field, FieldValue},
    error::Error,
    file::File,
    AsyncBody,
};

type PartReader = Chain<Chain<Cursor<Vec<u8>>, AsyncBody>, &'static [u8]>;

/// Filename sent for files that were not given one.
const DEFAULT_FILENAME: &str = "blob";

/// Builder for constructing a multipart form.
///
/// Generates a multipart form body as described in [RFC
/// 7578](https://datatracker.ietf.org/doc/html/rfc7578).
///
/// # Examples
///
/// ```
/// use flatform::{encode, forms::FormDataBuilder, map, File};
///
/// let input = map! {
///     "name" => "Acme",
///     "icon" => File::from_bytes("<svg/>").with_name("icon.svg"),
/// };
///
/// let form = FormDataBuilder::new().fields(encode(&input)).build().unwrap();
///
/// assert!(form.content_type().starts_with("multipart/form-data; boundary="));
/// ```
#[derive(Debug)]
#[must_use = "builders have no effect if unused"]
pub struct FormDataBuilder {
    boundary: String,
    fields: Vec<FormPart>,
}

impl FormDataBuilder {
    /// Create a new form builder with a random boundary.
    pub fn new() -> Self {
        Self::with_boundary(generate_boundary())
    }

    /// Create a new form builder that uses the given boundary.
    ///
    /// The boundary must not appear anywhere in the content of the form.
    pub fn with_boundary<S: Into<String>>(boundary: S) -> Self {
        Self {
            boundary: boundary.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field to this form with a given name and value.
    ///
    /// Duplicate fields with the same name are allowed and will be preserved in
    /// the order they are added.
    pub fn field<N, V>(self, name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<AsyncBody>,
    {
        self.part(FormPart::new(name, value))
    }

    /// Append a file to this form with a given name.
    pub fn file<N>(self, name: N, file: &File) -> Self
    where
        N: Into<String>,
    {
        self.part(FormPart::file(name, file))
    }

    /// Append encoded fields to this form, in order.
    ///
    /// Text fields become plain parts and file fields become file parts that
    /// share the payload of the original file.
    pub fn fields<'a, I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field<'a>>,
    {
        for field in fields {
            let (name, value) = field.into_parts();

            self.fields.push(match value {
                FieldValue::Text(text) => FormPart::new(name, text),
                FieldValue::File(file) => FormPart::file(name, file),
            });
        }

        self
    }

    /// Append a part to this form.
    pub fn part(mut self, part: FormPart) -> Self {
        self.fields.push(part);
        self
    }

    /// Build the form.
    ///
    /// Fails if a custom header added to one of the parts was invalid.
    pub fn build(self) -> Result<FormData, Error> {
        let boundary = self.boundary;

        let parts = self
            .fields
            .into_iter()
            .map(|field| field.into_writer(boundary.as_str()))
            .collect::<Result<VecDeque<_>, _>>()?;

        let terminator = Cursor::new(format!("--{}--\r\n", &boundary).into_bytes());

        // Try to compute the size of the body we will write. This can only be
        // determined if all parts contain values that are also sized.
        let len = parts
            .iter()
            .map(|part| {
                Some(
                    part.get_ref().0.get_ref().1.len()?
                        + part.get_ref().0.get_ref().0.get_ref().len() as u64
                        + part.get_ref().1.len() as u64,
                )
            })
            .fold(Some(0), |a, b| Some(a? + b?))
            .map(|size| size + terminator.get_ref().len() as u64);

        tracing::debug!(parts = parts.len(), ?len, "built multipart form");

        Ok(FormData {
            content_type: format!("multipart/form-data; boundary={}", boundary),
            boundary,
            len,
            parts,
            terminator,
        })
    }
}

impl Default for FormDataBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A single part of a multipart form representing a single field.
#[derive(Debug)]
pub struct FormPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    headers: Vec<(HeaderName, HeaderValue)>,
    value: AsyncBody,
    error: Option<http::Error>,
}

impl FormPart {
    /// Create a new form part with a name and value.
    pub fn new<N, V>(name: N, value: V) -> Self
    where
        N: Into<String>,
        V: Into<AsyncBody>,
    {
        FormPart {
            name: name.into(),
            filename: None,
            content_type: None,
            headers: Vec::new(),
            value: value.into(),
            error: None,
        }
    }

    /// Create a form part carrying a file.
    ///
    /// The filename and content type are taken from the file, falling back to
    /// `blob` and `application/octet-stream`.
    pub fn file<N>(name: N, file: &File) -> Self
    where
        N: Into<String>,
    {
        let filename = file.name().unwrap_or(DEFAULT_FILENAME).to_owned();
        let content_type = file
            .content_type()
            .unwrap_or(&mime::APPLICATION_OCTET_STREAM)
            .to_string();

        Self::new(name, file)
            .filename(filename)
            .content_type(content_type)
    }

    /// Set the filename of this form part.
    pub fn filename(mut self, filename: String) -> Self {
        self.filename = Some(filename);
        self
    }

    /// Set the content type of this form part.
    pub fn content_type(mut self, content_type: String) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// Append a custom header to this form part.
    ///
    /// An invalid header name or value is reported when the form is built.
    pub fn header<K, V>(mut self, name: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        if self.error.is_none() {
            let header: Result<_, http::Error> = <HeaderName as TryFrom<K>>::try_from(name)
                .map_err(Into::into)
                .and_then(|name| {
                    <HeaderValue as TryFrom<V>>::try_from(value)
                        .map(|value| (name, value))
                        .map_err(Into::into)
                });

            match header {
                Ok(header) => self.headers.push(header),
                Err(e) => self.error = Some(e),
            }
        }

        self
    }

    fn into_writer(self, boundary: &str) -> Result<PartReader, Error> {
        if let Some(e) = self.error {
            return Err(e.into());
        }

        let mut header = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"",
            boundary,
            escape(&self.name)
        );

        if let Some(filename) = self.filename.as_ref() {
            header.push_str("; filename=\"");
            header.push_str(&escape(filename));
            header.push('"');
        }

        header.push_str("\r\n");

        if let Some(content_type) = self.content_type.as_ref() {
            header.push_str("Content-Type: ");
            header.push_str(content_type);
            header.push_str("\r\n");
        }

        let mut header = header.into_bytes();

        for (name, value) in self.headers {
            header.extend_from_slice(name.as_ref());
            header.extend_from_slice(b": ");
            header.extend_from_slice(value.as_ref());
            header.extend_from_slice(b"\r\n");
        }

        header.extend_from_slice(b"\r\n");

        Ok(Cursor::new(header).chain(self.value).chain(&b"\r\n"[..]))
    }
}

/// A multipart form body.
#[derive(Debug)]
pub struct FormData {
    boundary: String,
    content_type: String,
    len: Option<u64>,
    parts: VecDeque<PartReader>,
    terminator: Cursor<Vec<u8>>,
}

impl FormData {
    /// Get the boundary separating the parts of this form.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Get the value of the `Content-Type` header to send with this form.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Get the size of the form body, if every part has a known size.
    pub fn len(&self) -> Option<u64> {
        self.len
    }

    /// Returns true if the form has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Turn a request builder into a request carrying this form.
    ///
    /// Sets the `Content-Type` header, and `Content-Length` when the size of
    /// the form is known.
    ///
    /// ```
    /// use flatform::forms::FormDataBuilder;
    /// use http::Request;
    ///
    /// let request = FormDataBuilder::new()
    ///     .field("name", "Acme")
    ///     .build()
    ///     .unwrap()
    ///     .into_request(Request::post("https://example.com/api/partners"))
    ///     .unwrap();
    ///
    /// assert!(request.headers().contains_key("content-length"));
    /// ```
    pub fn into_request(
        self,
        builder: http::request::Builder,
    ) -> Result<http::Request<AsyncBody>, Error> {
        let mut builder = builder.header(CONTENT_TYPE, self.content_type.as_str());

        if let Some(len) = self.len {
            builder = builder.header(CONTENT_LENGTH, len);
        }

        Ok(builder.body(self.into())?)
    }
}

impl From<FormData> for AsyncBody {
    fn from(form: FormData) -> Self {
        if let Some(len) = form.len {
            AsyncBody::from_reader_sized(form, len)
        } else {
            AsyncBody::from_reader(form)
        }
    }
}

impl AsyncRead for FormData {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        while let Some(part) = self.parts.front_mut() {
            match ready!(AsyncRead::poll_read(Pin::new(part), cx, buf)) {
                Ok(0) => {
                    // This part has finished being read, discard it and move to
                    // the next one.
                    self.parts.pop_front();
                }
                result => return Poll::Ready(result),
            }
        }

        AsyncRead::poll_read(Pin::new(&mut self.terminator), cx, buf)
    }
}

/// Percent-encode the characters that would break out of a quoted header
/// parameter, the same way browsers do for form field names.
fn escape(value: &str) -> Cow<'_, str> {
    if !value.contains(&['"', '\r', '\n'][..]) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 4);

    for c in value.chars() {
        match c {
            '"' => escaped.push_str("%22"),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            c => escaped.push(c),
        }
    }

    Cow::Owned(escaped)
}

fn generate_boundary() -> String {
    repeat_with(fastrand::alphanumeric).take(24).collect()
}
