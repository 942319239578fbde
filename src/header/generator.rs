//! Oversized header values for probing server header-size limits.

/// Characters the synthetic value is built from, repeated in order.
pub const HEADER_ALPHABET: &str = "abcdefghij";

/// `HEADER_ALPHABET` repeated 791 times.
pub const DEFAULT_HEADER_LEN: usize = 7910;

/// Non-standard header that carries the synthetic value.
pub const DEFAULT_HEADER_NAME: &str = "CONTRIVEDHEADDR";

/// Build a header value of exactly `len` bytes by cycling through
/// [`HEADER_ALPHABET`].
pub fn synthetic_header(len: usize) -> String {
    HEADER_ALPHABET.chars().cycle().take(len).collect()
}
