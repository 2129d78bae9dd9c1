//! Random names and data for test fixtures
//!
//! For richer fake data reach for a dedicated crate; these helpers only cover
//! identifiers, file names and byte payloads.

use rand::{Rng, RngCore};

pub const NUMERIC: &str = "0123456789";
pub const UPPER_ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const LOWER_ALPHA: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPER_ALPHANUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const LOWER_ALPHANUMERIC: &str = "abcdefghijklmnopqrstuvwxyz0123456789";
pub const MIXED_ALPHANUMERIC: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789abcdefghijklmnopqrstuvwxyz0123456789";

/// Mixed alphanumerics with underscores repeated to raise their frequency
pub const ALPHANUMERIC_IDENTIFIER: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789abcdefghijklmnopqrstuvwxyz0123456789______";

/// Build a string of `length` characters drawn uniformly from `alphabet`.
///
/// Characters repeated in the alphabet are proportionally more likely.
/// An empty alphabet yields an empty string.
pub fn build_random_string(alphabet: &str, length: usize) -> String {
    let chars: Vec<char> = alphabet.chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect()
}

/// Random identifier suitable as a generated test name
pub fn random_identifier(length: usize) -> String {
    build_random_string(ALPHANUMERIC_IDENTIFIER, length)
}

/// Random `xxxxxxxx.xxx` file name that does not touch the file system
pub fn random_file_name() -> String {
    format!(
        "{}.{}",
        build_random_string(LOWER_ALPHANUMERIC, 8),
        build_random_string(LOWER_ALPHANUMERIC, 3)
    )
}

/// `len` random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut buffer = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buffer);
    buffer
}
