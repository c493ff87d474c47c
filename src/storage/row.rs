//! Row payload encoding
//!
//! A row is its string fields joined by `FIELD_SEPARATOR`. There is no
//! escaping: a value containing the separator splits into extra fields
//! when read back. The text protocol sends rows the same way, so a row whose
//! text matches a terminal response line ends the response early on the
//! client side (see `protocol::is_terminal_line`).

/// Separator between fields in a stored row
pub const FIELD_SEPARATOR: char = ',';

/// Encode field values into a row payload
pub fn encode_row<S: AsRef<str>>(values: &[S]) -> Vec<u8> {
    let mut payload = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            payload.push(FIELD_SEPARATOR);
        }
        payload.push_str(value.as_ref());
    }
    payload.into_bytes()
}

/// Split a stored row payload back into field values
pub fn decode_row(payload: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(payload)
        .split(FIELD_SEPARATOR)
        .map(str::to_string)
        .collect()
}
