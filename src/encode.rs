//! Flattening nested values into form fields.

use crate::{
    config::{EncoderBuilder, EncoderConfig, FileListKeys},
    file::File,
    key::FlatKey,
    value::{Map, Value},
};

/// The value of a single encoded field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue<'a> {
    /// The string form of a primitive.
    Text(String),
    /// A file borrowed from the encoded input.
    File(&'a File),
}

/// A single flat form field produced by the encoder.
#[derive(Clone, Debug, PartialEq)]
pub struct Field<'a> {
    key: String,
    value: FieldValue<'a>,
}

impl<'a> Field<'a> {
    /// Create a text field.
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::Text(value.into()),
        }
    }

    /// Create a file field.
    pub fn file(key: impl Into<String>, file: &'a File) -> Self {
        Self {
            key: key.into(),
            value: FieldValue::File(file),
        }
    }

    /// Get the flat key of this field.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value of this field.
    pub fn value(&self) -> &FieldValue<'a> {
        &self.value
    }

    /// Get the value as text, if it is not a file.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(text) => Some(text),
            FieldValue::File(_) => None,
        }
    }

    /// Get the value as a file, if it is one.
    pub fn as_file(&self) -> Option<&'a File> {
        match self.value {
            FieldValue::File(file) => Some(file),
            FieldValue::Text(_) => None,
        }
    }

    /// Split into key and value.
    pub fn into_parts(self) -> (String, FieldValue<'a>) {
        (self.key, self.value)
    }
}

/// Flattens a mapping into an ordered list of form fields.
///
/// Traversal is depth-first and keeps the order of the input:
///
/// - null values, and primitives whose string form is empty, produce nothing;
/// - nested mappings extend the key with `.name`;
/// - sequences extend the key with `[index]`, counting from zero;
/// - a file list repeats the same key once per file;
/// - a file is passed through by reference, never copied or stringified.
///
/// Encoding never fails.
///
/// # Examples
///
/// ```
/// use flatform::{map, Encoder};
///
/// let input = map! {
///     "name" => "Acme",
///     "tagIds" => vec![1, 2],
/// };
///
/// let fields = Encoder::new().encode(&input);
/// let keys = fields.iter().map(|field| field.key()).collect::<Vec<_>>();
///
/// assert_eq!(keys, ["name", "tagIds[0]", "tagIds[1]"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    config: EncoderConfig,
}

impl Encoder {
    /// Create an encoder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for an encoder with custom configuration.
    pub fn builder() -> EncoderBuilder {
        EncoderBuilder::new()
    }

    pub(crate) fn with_config(config: EncoderConfig) -> Self {
        Self { config }
    }

    /// Encode every entry of a mapping, using each mapping key as the root of
    /// its fields.
    ///
    /// Mapping keys are copied into flat keys as-is. Distinct leaves always
    /// get distinct keys unless a mapping key itself contains `.`, `[` or
    /// `]`: `{"a.b": 1, "a": {"b": 2}}` encodes both leaves as `a.b`.
    #[tracing::instrument(level = "trace", skip(self, input), fields(entries = input.len()))]
    pub fn encode<'a>(&self, input: &'a Map) -> Vec<Field<'a>> {
        let mut fields = Vec::with_capacity(input.len());

        for (name, value) in input {
            self.encode_into(&mut FlatKey::new(name), value, &mut fields);
        }

        tracing::trace!(fields = fields.len(), "encoded form");
        fields
    }

    /// Encode a single value under the given root key.
    pub fn encode_value<'a>(&self, key: &str, value: &'a Value) -> Vec<Field<'a>> {
        let mut fields = Vec::new();
        self.encode_into(&mut FlatKey::new(key), value, &mut fields);
        fields
    }

    fn encode_into<'a>(&self, key: &mut FlatKey, value: &'a Value, fields: &mut Vec<Field<'a>>) {
        match value {
            Value::Null => {
                tracing::trace!(%key, "omitting null value");
            }
            Value::Primitive(primitive) => {
                let text = primitive.to_string();

                if text.is_empty() && self.config.omit_empty_strings {
                    tracing::trace!(%key, "omitting empty value");
                } else {
                    fields.push(Field::text(key.as_str(), text));
                }
            }
            Value::File(file) => fields.push(Field::file(key.as_str(), file)),
            Value::Files(files) => match self.config.file_list_keys {
                FileListKeys::Repeat => {
                    fields.extend(files.iter().map(|file| Field::file(key.as_str(), file)));
                }
                FileListKeys::Indexed => {
                    let mark = key.len();

                    for (index, file) in files.iter().enumerate() {
                        key.push_index(index);
                        fields.push(Field::file(key.as_str(), file));
                        key.truncate(mark);
                    }
                }
            },
            Value::Sequence(items) => {
                let mark = key.len();

                for (index, item) in items.iter().enumerate() {
                    key.push_index(index);
                    self.encode_into(key, item, fields);
                    key.truncate(mark);
                }
            }
            Value::Mapping(map) => {
                let mark = key.len();

                for (name, item) in map {
                    key.push_field(name);
                    self.encode_into(key, item, fields);
                    key.truncate(mark);
                }
            }
        }
    }
}

/// Flatten a mapping into form fields using the default [`Encoder`].
///
/// Every leaf that is not null or empty produces exactly one field, except
/// file lists which produce one field per file. Flat keys are unique as long
/// as no mapping key contains `.`, `[` or `]`; such keys are written
/// verbatim and may collide with the keys of nested values.
///
/// # Examples
///
/// ```
/// use flatform::{encode, map, File, Value};
///
/// let input = map! {
///     "name" => "Acme",
///     "website" => Value::Null,
///     "icon" => File::from_bytes("<svg/>").with_name("icon.svg"),
/// };
///
/// let fields = encode(&input);
///
/// assert_eq!(fields.len(), 2);
/// assert_eq!(fields[0].as_text(), Some("Acme"));
/// assert_eq!(fields[1].as_file().and_then(|file| file.name()), Some("icon.svg"));
/// ```
pub fn encode(input: &Map) -> Vec<Field<'_>> {
    Encoder::default().encode(input)
}
