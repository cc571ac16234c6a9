/// Lexical context the translator is currently in.
#[derive(Clone)]
pub(super) enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

/// Read an ASCII digit run starting at `start`; returns the end index and the digits.
pub(super) fn scan_digits(bytes: &[u8], start: usize) -> Option<(usize, &str)> {
    let mut idx = start;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        idx += 1;
    }
    if idx == start {
        None
    } else {
        std::str::from_utf8(&bytes[start..idx])
            .ok()
            .map(|digits| (idx, digits))
    }
}

pub(super) fn starts_with_at(bytes: &[u8], idx: usize, pat: &[u8]) -> bool {
    bytes.len() >= idx + pat.len() && &bytes[idx..idx + pat.len()] == pat
}

pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    starts_with_at(bytes, idx, b"--")
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    starts_with_at(bytes, idx, b"/*")
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    starts_with_at(bytes, idx, b"*/")
}

/// Recognise a `$tag$` opener at `start`. Returns the tag and the index of the closing `$`.
pub(super) fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }

    // `$1$` is a placeholder followed by a dollar, not a tag
    if idx < bytes.len() && !bytes[start + 1..idx].first().is_some_and(u8::is_ascii_digit) {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

/// Whether the `$tag$` closer starts at `idx`.
pub(super) fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len()
        && bytes[idx + 1..end] == *tag.as_bytes()
        && bytes.get(end) == Some(&b'$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_scanned_until_non_digit() {
        assert_eq!(scan_digits(b"$12 ", 1), Some((3, "12")));
        assert_eq!(scan_digits(b"$x", 1), None);
    }

    #[test]
    fn dollar_tags() {
        assert_eq!(try_start_dollar_quote(b"$fn$ body", 0), Some(("fn".to_string(), 3)));
        assert_eq!(try_start_dollar_quote(b"$$ body", 0), Some((String::new(), 1)));
        assert_eq!(try_start_dollar_quote(b"$1 ", 0), None);
        assert!(matches_tag(b"x $fn$", 2, "fn"));
    }
}
