/// True for the field separators the protocol allows: space and tab.
pub fn is_separator(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Split a body into fields.
///
/// Runs of separators collapse, so no token is ever empty.
pub fn tokenize(body: &str) -> Vec<&str> {
    body.split(is_separator).filter(|t| !t.is_empty()).collect()
}
