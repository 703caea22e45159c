// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unique name generation.

use alloc::format;
use alloc::string::String;

/// Splits a trailing `.NNN` numeric suffix off `name`.
fn stem(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, digits)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => stem,
        _ => name,
    }
}

/// Returns `name` if `is_taken` rejects it, otherwise the first free
/// `stem.001`, `stem.002`, ... where `stem` is `name` without any numeric
/// suffix.
pub fn unique_name(name: &str, mut is_taken: impl FnMut(&str) -> bool) -> String {
    if !is_taken(name) {
        return name.into();
    }
    let stem = stem(name);
    let mut n: u32 = 1;
    loop {
        let candidate = format!("{stem}.{n:03}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
