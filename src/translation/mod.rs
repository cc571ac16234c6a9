use std::borrow::Cow;

mod scanner;

use scanner::{
    State, is_block_comment_end, is_block_comment_start, is_line_comment_start, matches_tag,
    scan_digits, try_start_dollar_quote,
};

use crate::types::Dialect;

/// Rewrite placeholders for the target dialect.
///
/// * `Dialect::Postgres`: every bare `?` becomes the next `$n` (counting from `$1`),
///   `?N` becomes `$N`, and `??` is an escaped literal `?` (needed for JSONB operators).
/// * `Dialect::Standard`: `$N` becomes `?N`; bare `?` is left alone.
///
/// Quoted strings, identifiers, comments and dollar-quoted blocks are copied verbatim.
/// Returns a borrowed `Cow` when nothing needed rewriting.
///
/// ```rust
/// use tablekit::prelude::*;
///
/// let sql = translate_placeholders("SELECT * FROM t WHERE a = ? AND b = '?'", Dialect::Postgres);
/// assert_eq!(sql, "SELECT * FROM t WHERE a = $1 AND b = '?'");
/// ```
#[must_use]
pub fn translate_placeholders(sql: &str, target: Dialect) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    let mut state = State::Normal;
    let mut idx = 0;
    let mut next_param = 1usize;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        // index of the last byte this step consumes
        let mut last = idx + utf8_len(b) - 1;
        let mut replacement: Option<String> = None;
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                _ if is_line_comment_start(bytes, idx) => {
                    state = State::LineComment;
                    last = idx + 1;
                }
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    last = idx + 1;
                }
                b'$' => {
                    if let Some((tag, close)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        last = close;
                    } else if target == Dialect::Standard
                        && let Some((digits_end, digits)) = scan_digits(bytes, idx + 1)
                    {
                        replacement = Some(format!("?{digits}"));
                        last = digits_end - 1;
                    }
                }
                b'?' if target == Dialect::Postgres => {
                    if bytes.get(idx + 1) == Some(&b'?') {
                        replacement = Some("?".to_string());
                        last = idx + 1;
                    } else if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1) {
                        replacement = Some(format!("${digits}"));
                        last = digits_end - 1;
                    } else {
                        replacement = Some(format!("${next_param}"));
                        next_param += 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        last = idx + 1; // escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        last = idx + 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    last = idx + 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    last = idx + 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    last = idx + tag.len() + 1;
                    state = State::Normal;
                }
            }
        }

        match replacement {
            Some(text) => {
                let buf = out.get_or_insert_with(|| sql[..idx].to_string());
                buf.push_str(&text);
            }
            None => {
                if let Some(buf) = out.as_mut() {
                    buf.push_str(&sql[idx..=last]);
                }
            }
        }
        idx = last + 1;
    }

    match out {
        Some(buf) => Cow::Owned(buf),
        None => Cow::Borrowed(sql),
    }
}

fn utf8_len(first: u8) -> usize {
    match first {
        0xF0..=0xFF => 4,
        0xE0..=0xEF => 3,
        0xC0..=0xDF => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_bare_placeholders_for_postgres() {
        let sql = "SELECT * FROM t WHERE a = ? AND b IN (?, ?)";
        let res = translate_placeholders(sql, Dialect::Postgres);
        assert_eq!(res, "SELECT * FROM t WHERE a = $1 AND b IN ($2, $3)");
    }

    #[test]
    fn translates_numbered_sqlite_to_postgres() {
        let sql = "select * from t where a = ?1 and b = ?2";
        let res = translate_placeholders(sql, Dialect::Postgres);
        assert_eq!(res, "select * from t where a = $1 and b = $2");
    }

    #[test]
    fn translates_postgres_to_standard() {
        let sql = "insert into t values($1, $2)";
        let res = translate_placeholders(sql, Dialect::Standard);
        assert_eq!(res, "insert into t values(?1, ?2)");
    }

    #[test]
    fn double_question_mark_is_a_literal() {
        let sql = "SELECT doc ?? 'key' FROM t WHERE id = ?";
        let res = translate_placeholders(sql, Dialect::Postgres);
        assert_eq!(res, "SELECT doc ? 'key' FROM t WHERE id = $1");
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "select '?', ? -- ?\n/* ? /* ? */ */ from t where a = ? and b = 'it''s ?'";
        let res = translate_placeholders(sql, Dialect::Postgres);
        assert_eq!(
            res,
            "select '?', $1 -- ?\n/* ? /* ? */ */ from t where a = $2 and b = 'it''s ?'"
        );
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let sql = "$foo$ select $1 from t $foo$ where a = $1";
        let res = translate_placeholders(sql, Dialect::Standard);
        assert_eq!(res, "$foo$ select $1 from t $foo$ where a = ?1");
    }

    #[test]
    fn keeps_non_ascii_text_intact() {
        let sql = "SELECT 'çay' AS drink, ? AS note";
        let res = translate_placeholders(sql, Dialect::Postgres);
        assert_eq!(res, "SELECT 'çay' AS drink, $1 AS note");
        let sql = "SELECT ? AS été";
        assert_eq!(translate_placeholders(sql, Dialect::Postgres), "SELECT $1 AS été");
    }

    #[test]
    fn untouched_sql_is_borrowed() {
        let sql = "select * from t where a = ?";
        let res = translate_placeholders(sql, Dialect::Standard);
        assert!(matches!(res, Cow::Borrowed(_)));
    }
}
