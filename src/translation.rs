use std::borrow::Cow;

enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    BracketQuoted,
    LineComment,
    BlockComment(u32),
}

fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'-' && bytes.get(idx + 1) == Some(&b'-')
}

fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'/' && bytes.get(idx + 1) == Some(&b'*')
}

fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes[idx] == b'*' && bytes.get(idx + 1) == Some(&b'/')
}

/// Rewrite positional `?` placeholders into numbered `@P1..@PN` parameters.
///
/// The pooled driver only accepts named parameters, so each `?` occurrence in
/// parameter position becomes the next `@PN` name, in order. A lightweight
/// state machine skips string literals, `[bracket]`-quoted identifiers, `--`
/// line comments, and nested `/* */` block comments; doubled quotes inside
/// literals are honored. Untouched text is copied over as whole `str` slices
/// between replacements, so multi-byte UTF-8 passes through intact. Returns a
/// borrowed `Cow` when the text contains no placeholders.
#[must_use]
pub fn translate_qmarks(sql: &str) -> Cow<'_, str> {
    let mut out: Option<String> = None;
    // Start of the input span not yet copied into `out`
    let mut copy_from = 0;
    let mut state = State::Normal;
    let mut next_param = 1u32;
    let bytes = sql.as_bytes();
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'[' => state = State::BracketQuoted,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => state = State::BlockComment(1),
                b'?' => {
                    let buf = out.get_or_insert_with(String::new);
                    buf.push_str(&sql[copy_from..idx]);
                    buf.push_str("@P");
                    buf.push_str(&next_param.to_string());
                    next_param += 1;
                    copy_from = idx + 1;
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::BracketQuoted => {
                if b == b']' {
                    if bytes.get(idx + 1) == Some(&b']') {
                        idx += 1;
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
                } else if is_block_comment_end(bytes, idx) {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                }
            }
        }

        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copy_from..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_placeholders_in_order() {
        let sql = "SELECT * FROM t WHERE a = ? AND b = ? AND c = ?";
        let res = translate_qmarks(sql);
        assert_eq!(res, "SELECT * FROM t WHERE a = @P1 AND b = @P2 AND c = @P3");
    }

    #[test]
    fn query_without_placeholders_borrows() {
        let sql = "SELECT 1";
        let res = translate_qmarks(sql);
        assert!(matches!(res, Cow::Borrowed(_)));
        assert_eq!(res, sql);
    }

    #[test]
    fn skips_inside_literals_and_comments() {
        let sql = "SELECT '?', a -- ?\n/* ? */ FROM t WHERE b = ?";
        let res = translate_qmarks(sql);
        assert_eq!(res, "SELECT '?', a -- ?\n/* ? */ FROM t WHERE b = @P1");
    }

    #[test]
    fn skips_bracket_quoted_identifiers() {
        let sql = "SELECT [weird?name] FROM t WHERE x = ?";
        let res = translate_qmarks(sql);
        assert_eq!(res, "SELECT [weird?name] FROM t WHERE x = @P1");
    }

    #[test]
    fn honors_doubled_quote_escapes() {
        let sql = "SELECT 'it''s a ?' , ? FROM t";
        let res = translate_qmarks(sql);
        assert_eq!(res, "SELECT 'it''s a ?' , @P1 FROM t");
    }

    #[test]
    fn handles_nested_block_comments() {
        let sql = "/* outer /* inner ? */ still ? */ SELECT ?";
        let res = translate_qmarks(sql);
        assert_eq!(res, "/* outer /* inner ? */ still ? */ SELECT @P1");
    }

    #[test]
    fn non_ascii_text_survives_rewriting() {
        let sql = "SELECT ? AS v, 'café' AS s";
        let res = translate_qmarks(sql);
        assert_eq!(res, "SELECT @P1 AS v, 'café' AS s");

        // Multi-byte text on both sides of a placeholder stays intact
        let sql = "SELECT N'naïve', ?, N'über' FROM [tablé] WHERE x = ?";
        let res = translate_qmarks(sql);
        assert_eq!(res, "SELECT N'naïve', @P1, N'über' FROM [tablé] WHERE x = @P2");
    }

    #[test]
    fn ten_placeholders_get_distinct_names() {
        let sql = "?,?,?,?,?,?,?,?,?,?";
        let res = translate_qmarks(sql);
        assert_eq!(res, "@P1,@P2,@P3,@P4,@P5,@P6,@P7,@P8,@P9,@P10");
    }
}
