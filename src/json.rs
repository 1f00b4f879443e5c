//! Conversions from serde data into form values.
//!
//! Request types usually derive `Serialize` for their plain fields. Files
//! cannot pass through serde, so the usual pattern is to convert the
//! serializable part with [`to_map`] and insert the files afterwards:
//!
//! ```
//! use flatform::{json::to_map, File};
//!
//! #[derive(serde::Serialize)]
//! #[serde(rename_all = "camelCase")]
//! struct CreatePartner {
//!     name: String,
//!     tag_ids: Vec<u32>,
//! }
//!
//! let mut form = to_map(&CreatePartner {
//!     name: "Acme".into(),
//!     tag_ids: vec![1, 2],
//! })
//! .unwrap();
//! form.insert("icon", File::from_bytes("<svg/>").with_name("icon.svg"));
//!
//! let fields = flatform::encode(&form);
//! assert_eq!(fields.len(), 4);
//! ```

#![cfg(feature = "json")]

use crate::{
    error::Error,
    value::{Map, Primitive, Value},
};
use serde::Serialize;

/// Serialize a value into a form mapping.
///
/// The value must serialize to a JSON object, since the top-level entries
/// become the root segments of the field keys. Field order follows the
/// order serde emits them in.
pub fn to_map<T>(value: &T) -> Result<Map, Error>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value)? {
        serde_json::Value::Object(object) => Ok(object.into()),
        other => {
            tracing::debug!(kind = json_kind(&other), "cannot use serialized value as a form");
            Err(Error::NotAMapping)
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Primitive(Primitive::Bool(b)),
            serde_json::Value::Number(n) => Self::Primitive(number(&n)),
            serde_json::Value::String(s) => Self::Primitive(Primitive::String(s)),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(object) => Self::Mapping(object.into()),
        }
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Map {
    fn from(object: serde_json::Map<String, serde_json::Value>) -> Self {
        object
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect()
    }
}

fn number(n: &serde_json::Number) -> Primitive {
    if let Some(n) = n.as_i64() {
        Primitive::Integer(n)
    } else if let Some(n) = n.as_u64() {
        Primitive::Unsigned(n)
    } else {
        // Every number that is not an integer is representable as f64.
        Primitive::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn convert_scalars() {
        assert_eq!(Value::from(json!(null)), Value::Null);
        assert_eq!(Value::from(json!(true)), Value::from(true));
        assert_eq!(Value::from(json!(-4)), Value::Primitive(Primitive::Integer(-4)));
        assert_eq!(
            Value::from(json!(u64::MAX)),
            Value::Primitive(Primitive::Unsigned(u64::MAX))
        );
        assert_eq!(Value::from(json!(0.25)), Value::Primitive(Primitive::Float(0.25)));
        assert_eq!(Value::from(json!("hi")), Value::from("hi"));
    }

    #[test]
    fn convert_nested() {
        let value = Value::from(json!({
            "assets": [{ "asset": "a.png", "isCovered": true }],
        }));

        assert_eq!(
            value,
            Value::Mapping(crate::map! {
                "assets" => vec![crate::map! { "asset" => "a.png", "isCovered" => true }],
            })
        );
    }

    #[test]
    fn top_level_must_be_object() {
        assert!(matches!(to_map(&[1, 2, 3]), Err(Error::NotAMapping)));
        assert!(matches!(to_map("text"), Err(Error::NotAMapping)));
    }

    #[test]
    fn struct_field_order_is_kept() {
        #[derive(Serialize)]
        struct Slider {
            title: String,
            order: u32,
            active: bool,
        }

        let map = to_map(&Slider {
            title: "Spring".into(),
            order: 2,
            active: true,
        })
        .unwrap();

        assert_eq!(map.keys().collect::<Vec<_>>(), ["title", "order", "active"]);
    }
}
