//! String interning for identifiers, string literals, and filenames.
//!
//! Every name that flows through the pipeline — identifiers, string literal
//! values, filenames embedded in `Location`s — is interned here and referred
//! to by a small `Copy` handle ([`StringId`]) rather than cloned or
//! reference-counted. This keeps tokens, AST nodes, and types cheap to copy
//! and cheap to compare, which matters because every phase re-walks the same
//! identifiers repeatedly (scope lookup, constructor lookup, FFI lookup).
//!
//! StringIds are stable for the lifetime of the [`Interner`] that produced
//! them: interning the same string twice returns the same id.

use std::sync::LazyLock;

use ahash::AHashMap;
use unicode_normalization::UnicodeNormalization;

/// Index into an [`Interner`]'s storage.
///
/// `u32` rather than `usize` to keep tokens and AST nodes small; a single
/// compilation unit will never intern more than a few billion distinct
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct StringId(u32);

impl StringId {
    /// Creates a `StringId` from a raw index. Only meaningful together with
    /// the `Interner` that produced it.
    #[must_use]
    pub fn from_index(index: u32) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Single-byte ASCII strings, built once and shared by every interner.
///
/// Mirrors the "small strings are free" trick: single ASCII characters are
/// common enough (field names, operators rendered in diagnostics) that it's
/// worth never allocating for them.
static ASCII_STRS: LazyLock<[&'static str; 128]> = LazyLock::new(|| {
    std::array::from_fn(|i| {
        let s = char::from(u8::try_from(i).expect("index in 0..128 always fits in u8")).to_string();
        &*Box::leak(s.into_boxed_str())
    })
});

const ASCII_OFFSET: u32 = 0;
const HEAP_OFFSET: u32 = 128;

/// Owns the per-compilation-unit string table.
///
/// Strings are normalized to NFC before interning (spec §3: "Identifiers are
/// NFC-normalized at lex time", §4.3: "Strings are NFC-normalized after
/// decoding") so that two source spellings of the same string always
/// produce the same `StringId` — see the NFC-idempotence property in
/// spec §8.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: AHashMap<Box<str>, StringId>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, normalizing to NFC first. Returns the existing id if
    /// this (normalized) string was already interned.
    pub fn intern(&mut self, s: &str) -> StringId {
        if s.len() == 1
            && let Some(b) = s.as_bytes().first().copied()
            && b.is_ascii()
        {
            return StringId(ASCII_OFFSET + u32::from(b));
        }
        let normalized: String = s.nfc().collect();
        if let Some(&id) = self.lookup.get(normalized.as_str()) {
            return id;
        }
        let id = StringId(HEAP_OFFSET + u32::try_from(self.strings.len()).expect("fewer than u32::MAX interns"));
        let boxed: Box<str> = normalized.into_boxed_str();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, id);
        id
    }

    /// Resolves a `StringId` back to its string contents.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this interner.
    #[must_use]
    pub fn resolve(&self, id: StringId) -> &str {
        let idx = id.index() as u32;
        if idx < HEAP_OFFSET {
            return ASCII_STRS[(idx - ASCII_OFFSET) as usize];
        }
        &self.strings[(idx - HEAP_OFFSET) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_twice_returns_same_id() {
        let mut interner = Interner::new();
        let a = interner.intern("hello");
        let b = interner.intern("hello");
        assert_eq!(a, b);
    }

    #[test]
    fn interning_normalizes_to_nfc() {
        let mut interner = Interner::new();
        // "é" as a single precomposed scalar vs. "e" + combining acute accent.
        let precomposed = interner.intern("caf\u{e9}");
        let decomposed = interner.intern("cafe\u{301}");
        assert_eq!(precomposed, decomposed);
    }

    #[test]
    fn ascii_single_chars_are_stable_without_heap_growth() {
        let mut interner = Interner::new();
        let a = interner.intern("x");
        assert_eq!(interner.resolve(a), "x");
        assert!(interner.strings.is_empty(), "ascii single chars should not grow the heap table");
    }
}
