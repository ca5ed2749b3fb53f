//! Tokens shared by several cell languages.

use std::sync::LazyLock;

use regex::Regex;

/// FieldName grammar.
pub static FIELD_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").expect("Invalid field name regex"));

/// Non-blank lines of a cell; `\r\n`, `\n` and `\r` all end a line.
pub fn cell_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
}

pub fn is_field_name(token: &str) -> bool {
    FIELD_NAME_REGEX.is_match(token)
}

/// Splits `key:value` at the first colon; the key is lowercased.
pub fn split_key_value(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim().to_lowercase(), value.trim()))
}
