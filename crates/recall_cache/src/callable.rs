//! Callables and their normalized instruction text.
//!
//! A callable is identified for caching purposes by the text of its body, not
//! by its name: editing the body changes every fingerprint derived from it,
//! so stale results are never served after a code change. The [`callable!`]
//! macro captures the body with `stringify!`; hand-written [`Callable`]
//! implementations supply their own [`Instructions`], typically a source
//! digest or an explicit version tag.
//!
//! [`callable!`]: crate::callable!

use std::marker::PhantomData;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::invocation::Invocation;

/// Placeholder substituted for runtime memory addresses.
const ADDRESS_PLACEHOLDER: &str = "ADDRESS";

/// Matches renderings such as `<closure> at 0x55d1c3a4b2c0`.
static ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"at 0x[0-9a-f]+").expect("address pattern is valid"));

/// Replaces every `at 0x<hex>` token with a fixed placeholder.
///
/// Pointer values differ between runs, so instruction text that embeds them
/// would otherwise never produce the same fingerprint twice.
pub fn normalize_instruction(text: &str) -> String {
    ADDRESS_PATTERN
        .replace_all(text, ADDRESS_PLACEHOLDER)
        .into_owned()
}

/// The ordered, address-normalized instruction listing of a callable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Instructions(Vec<String>);

impl Instructions {
    /// Builds a listing from individual instructions, normalizing each one.
    pub fn new<I, S>(instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            instructions
                .into_iter()
                .map(|i| normalize_instruction(i.as_ref()))
                .collect(),
        )
    }

    /// Splits body source text into statements on `;` and line breaks.
    ///
    /// Surrounding whitespace is dropped and empty statements are skipped.
    pub fn from_source(source: &str) -> Self {
        Self::new(
            source
                .split([';', '\n'])
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    /// Appends an explicit version tag to the listing.
    pub fn with_version(mut self, tag: &str) -> Self {
        self.0.push(normalize_instruction(&format!("@version {tag}")));
        self
    }

    /// Returns the normalized instructions in order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of instructions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the listing is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A unit of logic whose results can be memoized.
///
/// Implementations must be pure with respect to their [`Invocation`]: the
/// same arguments and the same instructions must always yield an equal
/// output, since a cached output is returned in place of calling again.
pub trait Callable {
    /// The result type, persisted with the cache's binary format.
    type Output: Serialize + DeserializeOwned;

    /// The callable's own failure type. Failures are never cached.
    type Error;

    /// Human-readable name, used in progress messages and logs.
    fn name(&self) -> &str;

    /// The normalized instruction listing that identifies this callable's logic.
    fn instructions(&self) -> Instructions;

    /// Runs the callable.
    fn call(&self, invocation: &Invocation) -> Result<Self::Output, Self::Error>;
}

/// A [`Callable`] backed by a closure and its captured body text.
///
/// Usually built through the [`callable!`](crate::callable!) macro.
pub struct FnCallable<F, T, E> {
    name: String,
    instructions: Instructions,
    func: F,
    _marker: PhantomData<fn() -> Result<T, E>>,
}

impl<F, T, E> FnCallable<F, T, E>
where
    F: Fn(&Invocation) -> Result<T, E>,
{
    /// Wraps `func`, deriving its instructions from `source`.
    pub fn new(name: impl Into<String>, source: &str, func: F) -> Self {
        Self::with_instructions(name, Instructions::from_source(source), func)
    }

    /// Wraps `func` with an explicit instruction listing.
    pub fn with_instructions(name: impl Into<String>, instructions: Instructions, func: F) -> Self {
        Self {
            name: name.into(),
            instructions,
            func,
            _marker: PhantomData,
        }
    }

    /// Tags the callable with a version, invalidating results cached under
    /// any other tag.
    pub fn version(mut self, tag: &str) -> Self {
        self.instructions = self.instructions.with_version(tag);
        self
    }
}

impl<F, T, E> Callable for FnCallable<F, T, E>
where
    F: Fn(&Invocation) -> Result<T, E>,
    T: Serialize + DeserializeOwned,
{
    type Output = T;
    type Error = E;

    fn name(&self) -> &str {
        &self.name
    }

    fn instructions(&self) -> Instructions {
        self.instructions.clone()
    }

    fn call(&self, invocation: &Invocation) -> Result<T, E> {
        (self.func)(invocation)
    }
}

/// Builds a [`FnCallable`] whose instructions are the closure body's source text.
///
/// ```ignore
/// let double = callable!("double", |inv| -> Result<i64, CacheError> {
///     let x: i64 = inv.positional(0)?;
///     Ok(x * 2)
/// });
/// ```
#[macro_export]
macro_rules! callable {
    ($name:expr, |$inv:ident| -> $ret:ty $body:block) => {
        $crate::FnCallable::new(
            $name,
            stringify!($body),
            |$inv: &$crate::Invocation| -> $ret { $body },
        )
    };
}
