//! Cache key derivation.
//!
//! The key for a call is the XXH3-128 digest of the bincode encoding of the
//! ordered triple (positional arguments, named arguments, instruction text).
//! Every part of the triple has a canonical encoding: arguments are stored
//! in a form with map entries in key order and named arguments are sorted,
//! so equal values hash equally across processes regardless of object
//! identity. The instruction text ends with the callable's output type, so
//! callables that share a body but decode to different types never share an
//! entry.

use recall_common::Fingerprint;

use crate::callable::Callable;
use crate::codec;
use crate::error::CacheError;
use crate::invocation::Invocation;

/// Derives fingerprints for (callable, invocation) pairs.
pub struct FingerprintComputer;

impl FingerprintComputer {
    /// Computes the fingerprint of one call.
    ///
    /// The callable's name is deliberately not part of the key: two callables
    /// with identical instruction text share cache entries.
    pub fn compute<C: Callable + ?Sized>(
        callable: &C,
        invocation: &Invocation,
    ) -> Result<Fingerprint, CacheError> {
        let bytes = Self::canonical_bytes(callable, invocation)?;
        Ok(Fingerprint::from_bytes(&bytes))
    }

    /// Returns the canonical byte sequence that is hashed into the fingerprint.
    pub fn canonical_bytes<C: Callable + ?Sized>(
        callable: &C,
        invocation: &Invocation,
    ) -> Result<Vec<u8>, CacheError> {
        let mut text = callable.instructions().as_slice().to_vec();
        // type_name is not stable across compiler releases; an upgrade only
        // costs a cold cache.
        text.push(format!("@output {}", std::any::type_name::<C::Output>()));
        let triple = (
            invocation.positional_encodings(),
            invocation.named_encodings(),
            text,
        );
        codec::encode(&triple)
    }
}
