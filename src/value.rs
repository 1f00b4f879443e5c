//! The tree of values a form is built from.

use crate::file::File;
use indexmap::IndexMap;
use std::fmt;

/// A value that can be flattened into form fields.
///
/// Values form a tree: every child is owned by its parent, so an input can
/// never contain a cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An absent value. Never produces a field.
    Null,
    /// A string, number or boolean leaf.
    Primitive(Primitive),
    /// A single binary file.
    File(File),
    /// Several files submitted for the same field, such as a multi-image
    /// upload.
    Files(Vec<File>),
    /// An ordered list of values.
    Sequence(Vec<Value>),
    /// A nested object.
    Mapping(Map),
}

impl Value {
    /// Create a file list value.
    pub fn files<I>(files: I) -> Self
    where
        I: IntoIterator<Item = File>,
    {
        Self::Files(files.into_iter().collect())
    }

    /// Returns true if this value is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the primitive if this value is one.
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Self::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    /// Get the string if this value is a string primitive.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Primitive(Primitive::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Get the nested mapping if this value is one.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

/// A leaf value that has a canonical string form.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// A string, sent as-is.
    String(String),
    /// A signed integer.
    Integer(i64),
    /// An unsigned integer too large for [`Primitive::Integer`].
    Unsigned(u64),
    /// A floating point number.
    Float(f64),
    /// A boolean, sent as `true` or `false`.
    Bool(bool),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Unsigned(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

macro_rules! impl_primitive_from {
    ($($variant:ident($target:ty): $($t:ty),+;)*) => {
        $(
            $(
                impl From<$t> for Primitive {
                    fn from(value: $t) -> Self {
                        Self::$variant(<$target>::from(value))
                    }
                }

                impl From<$t> for Value {
                    fn from(value: $t) -> Self {
                        Self::Primitive(value.into())
                    }
                }
            )+
        )*
    };
}

impl_primitive_from! {
    String(String): String, &str, Box<str>;
    Integer(i64): i8, i16, i32, i64, u8, u16, u32;
    Unsigned(u64): u64;
    Float(f64): f32, f64;
    Bool(bool): bool;
}

impl From<usize> for Primitive {
    fn from(value: usize) -> Self {
        Self::Unsigned(value as u64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Self::Primitive(value.into())
    }
}

impl From<isize> for Primitive {
    fn from(value: isize) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Self::Primitive(value.into())
    }
}

impl From<Primitive> for Value {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

impl From<File> for Value {
    fn from(file: File) -> Self {
        Self::File(file)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Mapping(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A string-keyed mapping that remembers insertion order.
///
/// Two mappings are equal only if they hold the same entries in the same
/// order, since order decides the order of the encoded fields.
///
/// Keys are written into flat keys verbatim. Keys containing `.`, `[` or `]`
/// can collide with the keys of nested values (`"a.b"` and `"a" => {"b"}`
/// both encode to `a.b`), so avoid them when the fields must be decodable.
#[derive(Clone, Debug, Default)]
pub struct Map {
    entries: IndexMap<String, Value>,
}

impl Map {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mapping with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the previous value for the key.
    ///
    /// Replacing an existing key keeps its original position. The key is
    /// used as-is in flat keys, see the type docs for keys containing `.`,
    /// `[` or `]`.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.entries.insert(key.into(), value.into())
    }

    /// Insert a value and return the mapping, for building maps inline.
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.insert(key, value);
        self
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Get a mutable reference to the value for a key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Remove a key, returning its value. Later entries shift down, keeping
    /// their relative order.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Returns true if the mapping contains the key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Get the value for a key, inserting [`Value::Null`] first if missing.
    pub(crate) fn get_or_insert_null(&mut self, key: &str) -> &mut Value {
        let index = match self.entries.get_index_of(key) {
            Some(index) => index,
            None => self.entries.insert_full(key.to_owned(), Value::Null).0,
        };

        &mut self.entries[index]
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

/// Iterator over the entries of a [`Map`].
#[derive(Debug)]
pub struct Iter<'a>(indexmap::map::Iter<'a, String, Value>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a str, &'a Value);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Map {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
