//! Encoder configuration.

use crate::encode::Encoder;

/// How the fields of a file list are keyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FileListKeys {
    /// Every file in the list is sent under the same key, once per file.
    ///
    /// Receivers that collect repeated multipart fields into a list expect
    /// this form.
    #[default]
    Repeat,

    /// Each file gets its own indexed key (`photos[0]`, `photos[1]`, ...),
    /// the same way other sequences are keyed.
    Indexed,
}

#[derive(Clone, Debug)]
pub(crate) struct EncoderConfig {
    pub(crate) file_list_keys: FileListKeys,
    pub(crate) omit_empty_strings: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            file_list_keys: FileListKeys::Repeat,
            omit_empty_strings: true,
        }
    }
}

/// An encoder builder is used to create an [`Encoder`] with custom
/// configuration.
///
/// The defaults produce the same output as [`encode`](crate::encode).
///
/// # Examples
///
/// ```
/// use flatform::{Encoder, FileListKeys};
///
/// let encoder = Encoder::builder()
///     .file_list_keys(FileListKeys::Indexed)
///     .omit_empty_strings(false)
///     .build();
/// ```
#[derive(Clone, Debug, Default)]
#[must_use = "builders have no effect if unused"]
pub struct EncoderBuilder {
    config: EncoderConfig,
}

impl EncoderBuilder {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how file lists are keyed.
    ///
    /// The default is [`FileListKeys::Repeat`].
    pub fn file_list_keys(mut self, keys: FileListKeys) -> Self {
        self.config.file_list_keys = keys;
        self
    }

    /// Set whether primitives that stringify to an empty string are left out.
    ///
    /// The default is `true`, which treats `""` the same as null. Disable
    /// this if the receiver needs to tell an empty value from a missing one.
    pub fn omit_empty_strings(mut self, omit: bool) -> Self {
        self.config.omit_empty_strings = omit;
        self
    }

    /// Build an [`Encoder`] with the configuration set on this builder.
    pub fn build(self) -> Encoder {
        Encoder::with_config(self.config)
    }
}
