// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query sanitization

/// Normalize raw query text into a safe, length-bounded form.
///
/// Trims surrounding whitespace, collapses runs of CR/LF/tab and any other
/// whitespace into single spaces, then truncates to `max_len` characters
/// (character count, not bytes). Pure and idempotent; worst case returns
/// an empty string.
pub fn sanitize(raw: &str, max_len: usize) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    let mut count = 0usize;

    for c in raw.trim().chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            if count >= max_len {
                break;
            }
            out.push(' ');
            count += 1;
            pending_space = false;
        }
        if count >= max_len {
            break;
        }
        out.push(c);
        count += 1;
    }

    // Truncation can leave a trailing separator
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_and_collapses() {
        assert_eq!(sanitize("  cats\n\tdogs  ", 400), "cats dogs");
        assert_eq!(sanitize("a  \r\n  b \t c", 400), "a b c");
    }

    #[test]
    fn test_idempotent() {
        for q in ["  cats\n\tdogs  ", "plain", "", " \t\r\n ", "a    b"] {
            let once = sanitize(q, 400);
            assert_eq!(sanitize(&once, 400), once);
        }
    }

    #[test]
    fn test_length_bound_is_characters() {
        let long = "é".repeat(500);
        let out = sanitize(&long, 400);
        assert_eq!(out.chars().count(), 400);

        // Truncation never ends on a separator
        let spaced = "ab ".repeat(200);
        let out = sanitize(&spaced, 5);
        assert_eq!(out, "ab ab");
    }

    #[test]
    fn test_whitespace_only_becomes_empty() {
        assert_eq!(sanitize(" \t \n ", 400), "");
    }

    #[test]
    fn test_zero_max_len() {
        assert_eq!(sanitize("anything", 0), "");
    }
}
