//! Rebuilding nested values from flat form fields.

use crate::{
    encode::{Field, FieldValue},
    error::DecodeError,
    key::{self, Segment},
    value::{Map, Primitive, Value},
};

/// The furthest a single key may index past the current end of a sequence.
/// Each field can add at most this many nulls, so a key like
/// `a[4294967295]` cannot allocate a huge sequence while fields emitted in
/// order grow a sequence without limit.
const MAX_INDEX_GAP: usize = 1 << 16;

/// Rebuild a mapping from flat form fields.
///
/// This is the inverse of [`encode`](crate::encode), up to what encoding
/// discards: text values come back as string primitives, omitted leaves stay
/// absent, and gaps left in sequences by omitted elements are filled with
/// [`Value::Null`]. Files sharing a key are collected into a
/// [`Value::Files`] list; a key with a single file decodes to
/// [`Value::File`].
///
/// # Examples
///
/// ```
/// use flatform::{decode, encode, map, Value};
///
/// let input = map! {
///     "assets" => vec![map! { "asset" => "a.png", "isCovered" => true }],
/// };
///
/// let decoded = decode(encode(&input)).unwrap();
/// let asset = decoded.get("assets")
///     .and_then(|assets| match assets {
///         Value::Sequence(items) => items[0].as_map(),
///         _ => None,
///     })
///     .and_then(|asset| asset.get("isCovered"));
///
/// assert_eq!(asset, Some(&Value::from("true")));
/// ```
pub fn decode<'a, I>(fields: I) -> Result<Map, DecodeError>
where
    I: IntoIterator<Item = Field<'a>>,
{
    let mut map = Map::new();

    for field in fields {
        let (path, value) = field.into_parts();
        let segments = key::parse(&path)?;

        let (root, rest) = match segments.split_first() {
            Some((Segment::Field(root), rest)) => (*root, rest),
            _ => return Err(DecodeError::invalid_key(&path, "missing root segment")),
        };

        place(map.get_or_insert_null(root), rest, value, &path)?;
    }

    Ok(map)
}

/// Rebuild a mapping from plain text key-value pairs, such as fields parsed
/// from a submitted form.
pub fn decode_text<I, K, V>(pairs: I) -> Result<Map, DecodeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    decode(pairs.into_iter().map(|(key, value)| Field::text(key, value)))
}

fn place(
    slot: &mut Value,
    rest: &[Segment<'_>],
    value: FieldValue<'_>,
    key: &str,
) -> Result<(), DecodeError> {
    let (segment, rest) = match rest.split_first() {
        Some(split) => split,
        None => return set_leaf(slot, value, key),
    };

    match segment {
        Segment::Field(name) => {
            if slot.is_null() {
                *slot = Value::Mapping(Map::new());
            }

            match slot {
                Value::Mapping(map) => place(map.get_or_insert_null(name), rest, value, key),
                _ => Err(conflict(key)),
            }
        }
        Segment::Index(index) => {
            if slot.is_null() {
                *slot = Value::Sequence(Vec::new());
            }

            match slot {
                Value::Sequence(items) => {
                    if index.saturating_sub(items.len()) >= MAX_INDEX_GAP {
                        return Err(DecodeError::invalid_key(key, "index is too large"));
                    }

                    if items.len() <= *index {
                        items.resize(*index + 1, Value::Null);
                    }

                    place(&mut items[*index], rest, value, key)
                }
                _ => Err(conflict(key)),
            }
        }
    }
}

fn set_leaf(slot: &mut Value, value: FieldValue<'_>, key: &str) -> Result<(), DecodeError> {
    match slot {
        Value::Null => {
            *slot = match value {
                FieldValue::Text(text) => Value::Primitive(Primitive::String(text)),
                FieldValue::File(file) => Value::File(file.clone()),
            };
        }
        Value::File(first) => match value {
            FieldValue::File(file) => {
                let files = vec![first.clone(), file.clone()];
                *slot = Value::Files(files);
            }
            FieldValue::Text(_) => return Err(duplicate(key)),
        },
        Value::Files(files) => match value {
            FieldValue::File(file) => files.push(file.clone()),
            FieldValue::Text(_) => return Err(duplicate(key)),
        },
        Value::Primitive(_) => return Err(duplicate(key)),
        Value::Sequence(_) | Value::Mapping(_) => return Err(conflict(key)),
    }

    Ok(())
}

fn duplicate(key: &str) -> DecodeError {
    DecodeError::DuplicateKey {
        key: key.to_owned(),
    }
}

fn conflict(key: &str) -> DecodeError {
    DecodeError::Conflict {
        key: key.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode, File};

    #[test]
    fn decode_nested_text() {
        let map = decode_text(vec![
            ("name", "Acme"),
            ("seo.title", "Home"),
            ("tags[0]", "a"),
            ("tags[1]", "b"),
        ])
        .unwrap();

        assert_eq!(
            map,
            crate::map! {
                "name" => "Acme",
                "seo" => crate::map! { "title" => "Home" },
                "tags" => vec!["a", "b"],
            }
        );
    }

    #[test]
    fn gaps_become_null() {
        let map = decode_text(vec![("tags[2]", "c")]).unwrap();

        assert_eq!(
            map.get("tags"),
            Some(&Value::Sequence(vec![Value::Null, Value::Null, Value::from("c")]))
        );
    }

    #[test]
    fn out_of_order_indices() {
        let map = decode_text(vec![("tags[1]", "b"), ("tags[0]", "a")]).unwrap();

        assert_eq!(map.get("tags"), Some(&Value::from(vec!["a", "b"])));
    }

    #[test]
    fn repeated_file_keys_collect_into_list() {
        let first = File::from_bytes("one");
        let second = File::from_bytes("two");

        let map = decode(vec![Field::file("photos", &first), Field::file("photos", &second)]).unwrap();

        assert_eq!(map.get("photos"), Some(&Value::files(vec![first, second])));
    }

    #[test]
    fn single_file() {
        let icon = File::from_bytes("<svg/>");
        let map = decode(encode(&crate::map! { "icon" => icon.clone() })).unwrap();

        assert_eq!(map.get("icon"), Some(&Value::File(icon)));
    }

    #[test]
    fn repeated_text_key() {
        let error = decode_text(vec![("name", "a"), ("name", "b")]).unwrap_err();

        assert_eq!(error, DecodeError::DuplicateKey { key: "name".into() });
    }

    #[test]
    fn text_and_file_under_one_key() {
        let file = File::from_bytes("x");
        let error = decode(vec![Field::text("icon", "x"), Field::file("icon", &file)]).unwrap_err();

        assert_eq!(error, DecodeError::DuplicateKey { key: "icon".into() });
    }

    #[test]
    fn leaf_then_container() {
        let error = decode_text(vec![("a", "1"), ("a.b", "2")]).unwrap_err();

        assert_eq!(error, DecodeError::Conflict { key: "a.b".into() });
    }

    #[test]
    fn container_then_leaf() {
        let error = decode_text(vec![("a.b", "2"), ("a", "1")]).unwrap_err();

        assert_eq!(error, DecodeError::Conflict { key: "a".into() });
    }

    #[test]
    fn mapping_then_sequence() {
        let error = decode_text(vec![("a.b", "1"), ("a[0]", "2")]).unwrap_err();

        assert_eq!(error, DecodeError::Conflict { key: "a[0]".into() });
    }

    #[test]
    fn long_sequences_grow_in_steps() {
        let pairs = (0..70_000).map(|i| (format!("tags[{}]", i), i.to_string()));
        let map = decode_text(pairs).unwrap();

        match map.get("tags") {
            Some(Value::Sequence(items)) => {
                assert_eq!(items.len(), 70_000);
                assert_eq!(items[69_999], Value::from("69999"));
            }
            other => panic!("expected a sequence, got {:?}", other),
        }
    }

    #[test]
    fn index_far_past_the_end() {
        let error = decode_text(vec![("a[0]", "x"), ("a[65537]", "y")]).unwrap_err();

        assert_eq!(error.key(), "a[65537]");
        assert!(decode_text(vec![("a[0]", "x"), ("a[65536]", "y")]).is_ok());
    }

    #[test]
    fn huge_index() {
        let error = decode_text(vec![("a[4294967295]", "x")]).unwrap_err();

        assert!(matches!(error, DecodeError::InvalidKey { .. }));
    }
}
