#![allow(dead_code, unused_macros)]

use flatform::{Field, FieldValue};
use std::{env, sync::Once};

pub fn logging() {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        env::set_var("RUST_BACKTRACE", "1");
        env::set_var("RUST_LOG", "flatform=trace");
        env_logger::try_init().ok();
    });
}

/// Render fields as `(key, text)` pairs, with files shown by name.
pub fn pairs(fields: &[Field<'_>]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|field| {
            let value = match field.value() {
                FieldValue::Text(text) => text.clone(),
                FieldValue::File(file) => format!("<file:{}>", file.name().unwrap_or("blob")),
            };

            (field.key().to_owned(), value)
        })
        .collect()
}

/// Build the expected output of [`pairs`] from string literals.
macro_rules! pairs {
    ($($key:expr => $value:expr),* $(,)?) => {
        vec![$(($key.to_string(), $value.to_string())),*]
    };
}
