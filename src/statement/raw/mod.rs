mod parsers;
mod scanner;

use parsers::{
    is_block_comment_end, is_block_comment_start, is_cast, is_escaped_quote,
    is_line_comment_start,
};
use scanner::{State, scan_digits, scan_identifier};

use super::{BindSite, Segment, Statement};

/// Split SQL text into literal segments and bind-sites.
///
/// Works on bytes; every split point sits on an ASCII marker, so slicing the
/// original `&str` stays on character boundaries.
pub(super) fn split_bind_sites(sql: &str) -> Statement {
    let bytes = sql.as_bytes();
    let mut segments = Vec::new();
    let mut state = State::Normal;
    let mut literal_start = 0;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::Backtick,
                b'[' => state = State::Bracketed,
                _ if is_line_comment_start(bytes, idx) => {
                    state = State::LineComment;
                    idx += 1;
                }
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment;
                    idx += 1;
                }
                _ if is_cast(bytes, idx) => idx += 1,
                b'?' => {
                    let end = scan_digits(bytes, idx + 1);
                    push_sql(&mut segments, &sql[literal_start..idx]);
                    segments.push(Segment::Bind(BindSite::Positional));
                    literal_start = end;
                    idx = end;
                    continue;
                }
                b':' | b'@' | b'$' => {
                    if let Some(end) = scan_identifier(bytes, idx + 1) {
                        push_sql(&mut segments, &sql[literal_start..idx]);
                        segments.push(Segment::Bind(BindSite::Named(
                            sql[idx + 1..end].to_string(),
                        )));
                        literal_start = end;
                        idx = end;
                        continue;
                    }
                }
                _ => {}
            },
            State::SingleQuoted | State::DoubleQuoted | State::Backtick => {
                let quote = match state {
                    State::SingleQuoted => b'\'',
                    State::DoubleQuoted => b'"',
                    _ => b'`',
                };
                if is_escaped_quote(bytes, idx, quote) {
                    idx += 1;
                } else if b == quote {
                    state = State::Normal;
                }
            }
            State::Bracketed => {
                if b == b']' {
                    state = State::Normal;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment => {
                if is_block_comment_end(bytes, idx) {
                    state = State::Normal;
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    push_sql(&mut segments, &sql[literal_start..]);
    Statement::from_segments(segments)
}

fn push_sql(segments: &mut Vec<Segment>, sql: &str) {
    if !sql.is_empty() {
        segments.push(Segment::Sql(sql.to_string()));
    }
}
