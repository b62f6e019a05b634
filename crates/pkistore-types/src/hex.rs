//! Hex identity encoding for content addresses.
//!
//! Catalog rows are keyed by the hex form of an object's thumbprint. The
//! stored form is uppercase (`0-9A-F`); every comparison in the workspace
//! goes through [`hex_eq`] and is case-insensitive.

use crate::error::TypeError;

/// Encode bytes as uppercase hex, two digits per byte, in input order.
///
/// The result length is always `2 * bytes.len()`.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Map a single hex digit to its value.
///
/// Accepts `0-9`, `A-F` and `a-f`; anything else is
/// [`TypeError::InvalidHexDigit`].
pub fn hex_digit_value(c: char) -> Result<u8, TypeError> {
    match c {
        '0'..='9' => Ok(c as u8 - b'0'),
        'A'..='F' => Ok(c as u8 - b'A' + 10),
        'a'..='f' => Ok(c as u8 - b'a' + 10),
        _ => Err(TypeError::InvalidHexDigit(c)),
    }
}

/// Decode a hex string into bytes, consuming two digits at a time.
///
/// A trailing unpaired character is silently ignored: decoding stops at the
/// first position where a full pair is no longer available. This lenient
/// behavior is part of the hash-parsing contract; callers that require an
/// even-length input must check the length themselves. Invalid digits inside
/// a pair still fail with [`TypeError::InvalidHexDigit`].
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, TypeError> {
    let chars: Vec<char> = s.chars().collect();
    let mut out = Vec::with_capacity(chars.len() / 2);
    for pair in chars.chunks_exact(2) {
        let hi = hex_digit_value(pair[0])?;
        let lo = hex_digit_value(pair[1])?;
        out.push(hi * 16 + lo);
    }
    Ok(out)
}

/// Case-insensitive equality between two hex strings.
pub fn hex_eq(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_is_uppercase_and_ordered() {
        assert_eq!(bytes_to_hex(&[0xaa, 0xbb, 0x01]), "AABB01");
        assert_eq!(bytes_to_hex(&[]), "");
    }

    #[test]
    fn digit_values() {
        assert_eq!(hex_digit_value('0').unwrap(), 0);
        assert_eq!(hex_digit_value('9').unwrap(), 9);
        assert_eq!(hex_digit_value('A').unwrap(), 10);
        assert_eq!(hex_digit_value('f').unwrap(), 15);
    }

    #[test]
    fn digit_rejects_non_hex() {
        for c in ['g', 'G', ' ', '-', 'z', '!'] {
            assert_eq!(hex_digit_value(c), Err(TypeError::InvalidHexDigit(c)));
        }
    }

    #[test]
    fn decode_mixed_case() {
        assert_eq!(hex_to_bytes("AaBb01").unwrap(), vec![0xaa, 0xbb, 0x01]);
    }

    #[test]
    fn decode_ignores_trailing_unpaired_char() {
        // Lenient: the dangling "C" is dropped, not an error.
        assert_eq!(hex_to_bytes("AABBC").unwrap(), vec![0xaa, 0xbb]);
        assert_eq!(hex_to_bytes("A").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn decode_rejects_invalid_digit_inside_pair() {
        assert_eq!(
            hex_to_bytes("AAZZ"),
            Err(TypeError::InvalidHexDigit('Z'))
        );
    }

    #[test]
    fn hex_eq_is_case_insensitive() {
        assert!(hex_eq("aabb01", "AABB01"));
        assert!(!hex_eq("AABB01", "AABB02"));
    }

    proptest! {
        #[test]
        fn roundtrip(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let encoded = bytes_to_hex(&bytes);
            prop_assert_eq!(encoded.len(), bytes.len() * 2);
            prop_assert_eq!(hex_to_bytes(&encoded).unwrap(), bytes);
        }

        #[test]
        fn valid_even_hex_roundtrips_up_to_case(s in "[0-9a-fA-F]{0,64}") {
            let even = &s[..s.len() - s.len() % 2];
            let bytes = hex_to_bytes(even).unwrap();
            prop_assert!(hex_eq(&bytes_to_hex(&bytes), even));
        }
    }
}
