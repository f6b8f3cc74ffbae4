//! Human-readable descriptions of pending calls.

use crate::invocation::Invocation;

/// Describes a call for progress display, e.g. `Caching:\ndouble(3).`
///
/// Each argument preview is cut to `preview_chars` characters and named
/// arguments render as `key=value`. If any argument has no preview (opaque,
/// or its `Debug` impl failed) the description falls back to the name alone,
/// `Caching:\ndouble()`. This never fails.
pub fn describe_call(name: &str, invocation: &Invocation, preview_chars: usize) -> String {
    try_describe(name, invocation, preview_chars).unwrap_or_else(|| format!("Caching:\n{name}()"))
}

fn try_describe(name: &str, invocation: &Invocation, preview_chars: usize) -> Option<String> {
    let mut parts = Vec::with_capacity(invocation.positional_len() + invocation.named_len());
    for preview in invocation.positional_previews() {
        parts.push(truncate(preview?, preview_chars).to_string());
    }
    for (key, preview) in invocation.named_previews() {
        parts.push(format!("{key}={}", truncate(preview?, preview_chars)));
    }
    Some(format!("Caching:\n{name}({}).", parts.join(", ")))
}

/// Returns the first `max` characters of `s`.
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
