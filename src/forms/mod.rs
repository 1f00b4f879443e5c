//! Building `multipart/form-data` request bodies from encoded fields.

mod multipart;

pub use multipart::{FormData, FormDataBuilder, FormPart};
