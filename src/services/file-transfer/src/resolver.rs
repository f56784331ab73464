//! Upload filename resolution
//!
//! Turns the filename a client put in its multipart `Content-Disposition`
//! into a display name and a sequence of storage candidates. Resolution never
//! fails: every decode step either succeeds or falls back to its input.

use std::collections::HashSet;

use tracing::debug;

/// Characters that are illegal in filenames on at least one common filesystem
pub const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Outcome of a single decode step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The step applied and produced a new value
    Decoded(String),
    /// The step did not apply; the previous value is carried through
    Fallback(String),
}

impl DecodeOutcome {
    pub fn into_inner(self) -> String {
        match self {
            DecodeOutcome::Decoded(value) | DecodeOutcome::Fallback(value) => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, DecodeOutcome::Fallback(_))
    }
}

/// Reverse the common mis-decoding of UTF-8 filename bytes as Latin-1.
///
/// Only applies when every char fits in a single byte and the resulting
/// bytes form valid UTF-8.
pub fn repair_latin1(raw: &str) -> DecodeOutcome {
    let bytes: Option<Vec<u8>> = raw
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect();

    match bytes.map(String::from_utf8) {
        Some(Ok(repaired)) => DecodeOutcome::Decoded(repaired),
        _ => DecodeOutcome::Fallback(raw.to_string()),
    }
}

/// Percent-decode with URI component rules.
///
/// Every `%` must be followed by two hex digits and the decoded bytes must be
/// UTF-8, otherwise the input is returned unchanged. `+` is kept literally.
pub fn percent_decode(value: String) -> DecodeOutcome {
    if !has_valid_escapes(&value) {
        return DecodeOutcome::Fallback(value);
    }

    match urlencoding::decode(&value) {
        Ok(decoded) => DecodeOutcome::Decoded(decoded.into_owned()),
        Err(_) => DecodeOutcome::Fallback(value),
    }
}

fn has_valid_escapes(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Replace filesystem-illegal characters with `_`
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// Decode and sanitize a raw client filename.
///
/// The result is both the name shown to users and the first storage
/// candidate.
pub fn display_name(raw: &str) -> String {
    let repaired = repair_latin1(raw);
    if repaired.is_fallback() && !raw.is_ascii() {
        debug!("Filename {:?} is not Latin-1 encoded UTF-8, keeping it", raw);
    }

    let decoded = match percent_decode(repaired.into_inner()) {
        DecodeOutcome::Decoded(value) => value,
        DecodeOutcome::Fallback(value) => {
            debug!("Filename {:?} has malformed percent escapes, keeping it", value);
            value
        }
    };

    sanitize(&decoded)
}

/// Split a filename into base name and extension (extension keeps its dot).
///
/// Leading dots belong to the base name, so `.bashrc` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if !name[..idx].chars().all(|c| c == '.') => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Storage name candidates: `name`, then `base(1)ext`, `base(2)ext`, ...
#[derive(Debug, Clone)]
pub struct NameCandidates {
    name: String,
    counter: u64,
}

impl NameCandidates {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            counter: 0,
        }
    }

    /// Produce the next candidate; the sequence is unbounded
    pub fn next_candidate(&mut self) -> String {
        let candidate = if self.counter == 0 {
            self.name.clone()
        } else {
            let (base, ext) = split_extension(&self.name);
            format!("{}({}){}", base, self.counter, ext)
        };
        self.counter += 1;
        candidate
    }
}

impl Iterator for NameCandidates {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.next_candidate())
    }
}

/// Candidates for a raw client filename
pub fn candidates(raw: &str) -> NameCandidates {
    NameCandidates::new(display_name(raw))
}

/// Resolve a raw filename against a snapshot of the names already on disk
pub fn resolve(raw: &str, existing: &HashSet<String>) -> String {
    let mut candidates = candidates(raw);
    loop {
        let candidate = candidates.next_candidate();
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
}
