pub(super) fn is_line_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'-') && bytes.get(idx + 1) == Some(&b'-')
}

pub(super) fn is_block_comment_start(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'/') && bytes.get(idx + 1) == Some(&b'*')
}

pub(super) fn is_block_comment_end(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b'*') && bytes.get(idx + 1) == Some(&b'/')
}

/// `::` cast operator; neither colon starts a named site.
pub(super) fn is_cast(bytes: &[u8], idx: usize) -> bool {
    bytes.get(idx) == Some(&b':') && bytes.get(idx + 1) == Some(&b':')
}

/// A doubled delimiter inside a quoted run is an escaped delimiter, not its end.
pub(super) fn is_escaped_quote(bytes: &[u8], idx: usize, quote: u8) -> bool {
    bytes[idx] == quote && bytes.get(idx + 1) == Some(&quote)
}
