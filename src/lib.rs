//! Flatten nested request objects into `multipart/form-data` fields.
//!
//! REST backends that accept file uploads usually take their whole request as
//! a multipart form, with nested data addressed by bracket and dot notation:
//!
//! ```text
//! name              = Acme
//! tagIds[0]         = 1
//! assets[0].asset   = a.png
//! photos            = <file>
//! photos            = <file>
//! ```
//!
//! This crate turns a tree of [`Value`]s into exactly that list of
//! [`Field`]s, and optionally into a ready-to-send multipart body.
//!
//! # Encoding
//!
//! [`encode`] walks a [`Map`] depth-first and produces one field per leaf:
//!
//! - null values and empty strings are left out entirely;
//! - nested mappings extend the key with `.name`;
//! - sequences extend the key with `[index]`;
//! - file lists repeat the same key once per file;
//! - files are passed through by reference and never copied.
//!
//! ```
//! use flatform::{encode, map, File, Value};
//!
//! let photo = |name: &str| File::from_bytes(vec![0u8; 16]).with_name(name);
//!
//! let portfolio = map! {
//!     "title" => "Spring campaign",
//!     "tagIds" => vec![1, 2, 3],
//!     "assets" => vec![map! { "asset" => "a.png", "isCovered" => true }],
//!     "photos" => Value::files(vec![photo("one.jpg"), photo("two.jpg")]),
//!     "description" => Value::Null,
//! };
//!
//! let keys = encode(&portfolio)
//!     .iter()
//!     .map(|field| field.key().to_owned())
//!     .collect::<Vec<_>>();
//!
//! assert_eq!(keys, [
//!     "title",
//!     "tagIds[0]", "tagIds[1]", "tagIds[2]",
//!     "assets[0].asset", "assets[0].isCovered",
//!     "photos", "photos",
//! ]);
//! ```
//!
//! Use [`Encoder::builder`] to change how file lists are keyed or whether
//! empty strings are kept, and [`decode`] to rebuild a mapping from fields.
//!
//! # Sending
//!
//! [`forms::FormDataBuilder`] turns encoded fields into an RFC 7578 body that
//! can be read as an `AsyncRead` stream or attached to an [`http::Request`].
//!
//! # Feature flags
//!
//! - `json`: convert `serde` types into form values, see the [`json`]
//!   module. Disabled by default.
//!
//! # Logging
//!
//! Events are emitted with [`tracing`], which also forwards to the `log`
//! crate when no tracing subscriber is installed.

#![deny(unsafe_code)]
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]

pub use http;

#[macro_use]
mod macros;

pub mod body;
mod config;
mod decode;
mod encode;
pub mod error;
mod file;
pub mod forms;
#[cfg(feature = "json")]
pub mod json;
pub mod key;
pub mod value;

pub use crate::{
    body::AsyncBody,
    config::{EncoderBuilder, FileListKeys},
    decode::{decode, decode_text},
    encode::{encode, Encoder, Field, FieldValue},
    error::{DecodeError, Error},
    file::File,
    value::{Map, Primitive, Value},
};
