//! Captured call arguments.
//!
//! Arguments are encoded as soon as they are captured, so an [`Invocation`]
//! is immutable, cheap to fingerprint, and fails early on values that cannot
//! be serialized. Each argument keeps two encodings: the cache's binary
//! format, which callables decode their arguments back from, and a canonical
//! form with map entries in key order, which is what gets fingerprinted.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Write as _};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::canonical;
use crate::codec;
use crate::error::CacheError;

/// Upper bound on the characters kept from an argument's preview.
const PREVIEW_CAPTURE_CHARS: usize = 256;

/// A single encoded argument with an optional human-readable preview.
#[derive(Clone, Debug)]
struct Argument {
    encoded: Vec<u8>,
    canonical: Vec<u8>,
    preview: Option<String>,
}

impl Argument {
    fn capture<T: Serialize + Debug + ?Sized>(value: &T) -> Result<Self, CacheError> {
        let canonical = canonical::encode(value)?;
        let preview = match canonical::as_str(&canonical) {
            Some(text) => Some(text.chars().take(PREVIEW_CAPTURE_CHARS).collect()),
            None => render_preview(value),
        };
        Ok(Self {
            encoded: codec::encode(value)?,
            canonical,
            preview,
        })
    }

    fn opaque<T: Serialize + ?Sized>(value: &T) -> Result<Self, CacheError> {
        Ok(Self {
            encoded: codec::encode(value)?,
            canonical: canonical::encode(value)?,
            preview: None,
        })
    }

    fn decode<T: DeserializeOwned>(&self, label: &str) -> Result<T, CacheError> {
        codec::decode(&self.encoded).map_err(|reason| CacheError::Serialization {
            reason: format!("argument {label}: {reason}"),
        })
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Argument {}

/// Positional and named arguments for one call of a callable.
///
/// Named arguments are kept sorted by key so that two invocations built in a
/// different order fingerprint identically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Invocation {
    positional: Vec<Argument>,
    named: BTreeMap<String, Argument>,
}

impl Invocation {
    /// Creates an invocation with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    ///
    /// String arguments are previewed as-is, everything else through its
    /// `Debug` output.
    pub fn with_arg<T: Serialize + Debug + ?Sized>(mut self, value: &T) -> Result<Self, CacheError> {
        self.positional.push(Argument::capture(value)?);
        Ok(self)
    }

    /// Appends a positional argument that has no preview.
    ///
    /// Progress messages for invocations with opaque arguments fall back to
    /// the callable's name alone.
    pub fn with_opaque_arg<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, CacheError> {
        self.positional.push(Argument::opaque(value)?);
        Ok(self)
    }

    /// Sets a named argument, replacing any previous value for `key`.
    pub fn with_named<T: Serialize + Debug + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, CacheError> {
        self.named.insert(key.into(), Argument::capture(value)?);
        Ok(self)
    }

    /// Sets a named argument that has no preview.
    pub fn with_opaque_named<T: Serialize + ?Sized>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, CacheError> {
        self.named.insert(key.into(), Argument::opaque(value)?);
        Ok(self)
    }

    /// Decodes the positional argument at `index`.
    pub fn positional<T: DeserializeOwned>(&self, index: usize) -> Result<T, CacheError> {
        let label = format!("#{index}");
        self.positional
            .get(index)
            .ok_or_else(|| CacheError::MissingArgument {
                argument: label.clone(),
            })?
            .decode(&label)
    }

    /// Decodes the named argument `key`.
    pub fn named<T: DeserializeOwned>(&self, key: &str) -> Result<T, CacheError> {
        self.named
            .get(key)
            .ok_or_else(|| CacheError::MissingArgument {
                argument: key.to_string(),
            })?
            .decode(key)
    }

    /// Decodes the named argument `key`, or returns `None` if it is absent.
    pub fn named_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.named.get(key) {
            Some(arg) => arg.decode(key).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the number of positional arguments.
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    /// Returns the number of named arguments.
    pub fn named_len(&self) -> usize {
        self.named.len()
    }

    /// Returns `true` if the invocation carries no arguments at all.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }

    pub(crate) fn positional_encodings(&self) -> Vec<&[u8]> {
        self.positional.iter().map(|a| a.canonical.as_slice()).collect()
    }

    pub(crate) fn named_encodings(&self) -> BTreeMap<&str, &[u8]> {
        self.named
            .iter()
            .map(|(k, a)| (k.as_str(), a.canonical.as_slice()))
            .collect()
    }

    pub(crate) fn positional_previews(&self) -> impl Iterator<Item = Option<&str>> {
        self.positional.iter().map(|a| a.preview.as_deref())
    }

    pub(crate) fn named_previews(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.named
            .iter()
            .map(|(k, a)| (k.as_str(), a.preview.as_deref()))
    }
}

/// `fmt::Write` sink that keeps at most `remaining` characters.
struct BoundedWriter {
    buf: String,
    remaining: usize,
}

impl fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars().take(self.remaining) {
            self.buf.push(c);
            self.remaining -= 1;
        }
        Ok(())
    }
}

/// Renders a bounded `Debug` preview; `None` if the formatter reports an error.
fn render_preview<T: Debug + ?Sized>(value: &T) -> Option<String> {
    let mut writer = BoundedWriter {
        buf: String::new(),
        remaining: PREVIEW_CAPTURE_CHARS,
    };
    write!(writer, "{value:?}").ok()?;
    Some(writer.buf)
}
