//! Decoding of caller-supplied prelude bytecode.

use crate::error::HexFormatError;
use alloy_primitives::Bytes;

const HEX_PREFIX: &str = "0x";

/// Raw bytes injected ahead of a contract's compiled bytecode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prelude(Bytes);

impl Prelude {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        encode_hex(&self.0)
    }
}

/// Decodes a `0x`-prefixed hex string into a [`Prelude`].
///
/// The prefix is checked before any digit is looked at, and every digit is
/// checked before the length. `"0x"` alone decodes to an empty prelude.
/// Positions count characters of `input`, prefix included.
pub fn decode_prelude(input: &str) -> Result<Prelude, HexFormatError> {
    let Some(digits) = input.strip_prefix(HEX_PREFIX) else {
        return Err(HexFormatError::MissingPrefix {
            input: input.to_string(),
        });
    };

    // hex::decode works on bytes, so a multi-byte char would be reported as
    // its first UTF-8 byte
    if let Some((index, digit)) = digits
        .chars()
        .enumerate()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(HexFormatError::InvalidDigit {
            digit,
            position: index + HEX_PREFIX.len(),
        });
    }

    // all ASCII from here on, so bytes and chars agree
    if digits.len() % 2 != 0 {
        return Err(HexFormatError::OddLength {
            digits: digits.len(),
        });
    }

    hex::decode(digits).map(Prelude::new).map_err(|err| {
        match err {
            hex::FromHexError::InvalidHexCharacter { c, index } => {
                HexFormatError::InvalidDigit {
                    digit: c,
                    position: index + HEX_PREFIX.len(),
                }
            }
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                HexFormatError::OddLength {
                    digits: digits.len(),
                }
            }
        }
    })
}

/// Lowercase, `0x`-prefixed hex rendering of `bytes`.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("{HEX_PREFIX}{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_prefixed_hex() {
        let prelude = decode_prelude("0x6002").unwrap();
        assert_eq!(prelude.as_bytes(), &[0x60, 0x02]);
        assert_eq!(prelude.len(), 2);
    }

    #[test]
    fn accepts_uppercase_digits() {
        let prelude = decode_prelude("0xC0DE").unwrap();
        assert_eq!(prelude.as_bytes(), &[0xc0, 0xde]);
    }

    #[test]
    fn round_trips_lowercase_hex() {
        for input in ["0x", "0x00", "0xc0de", "0x6002600360045b", "0xffffffffffffffff"] {
            assert_eq!(decode_prelude(input).unwrap().to_hex(), input);
        }
    }

    #[test]
    fn bare_prefix_is_empty_prelude() {
        let prelude = decode_prelude("0x").unwrap();
        assert!(prelude.is_empty());
    }

    #[test]
    fn missing_prefix_is_rejected() {
        assert_eq!(
            decode_prelude("c0de"),
            Err(HexFormatError::MissingPrefix {
                input: "c0de".to_string()
            })
        );
        // uppercase marker is not the marker
        assert!(matches!(
            decode_prelude("0Xc0de"),
            Err(HexFormatError::MissingPrefix { .. })
        ));
        assert!(matches!(
            decode_prelude(""),
            Err(HexFormatError::MissingPrefix { .. })
        ));
    }

    #[test]
    fn odd_digit_count_is_rejected() {
        assert_eq!(
            decode_prelude("0xabc"),
            Err(HexFormatError::OddLength { digits: 3 })
        );
    }

    #[test]
    fn invalid_digit_reports_position_in_input() {
        assert_eq!(
            decode_prelude("0x60zz"),
            Err(HexFormatError::InvalidDigit {
                digit: 'z',
                position: 4
            })
        );
    }

    #[test]
    fn invalid_digit_wins_over_odd_length() {
        assert_eq!(
            decode_prelude("0x6g1"),
            Err(HexFormatError::InvalidDigit {
                digit: 'g',
                position: 3
            })
        );
    }

    #[test]
    fn non_ascii_digit_is_reported_as_typed() {
        // 'é' is two bytes but one digit
        assert_eq!(
            decode_prelude("0xé0"),
            Err(HexFormatError::InvalidDigit {
                digit: 'é',
                position: 2
            })
        );
        assert_eq!(
            decode_prelude("0xéé"),
            Err(HexFormatError::InvalidDigit {
                digit: 'é',
                position: 2
            })
        );
        assert_eq!(
            decode_prelude("0x60é"),
            Err(HexFormatError::InvalidDigit {
                digit: 'é',
                position: 4
            })
        );
    }

    #[test]
    fn non_ascii_message_names_the_character() {
        let message = decode_prelude("0xé0").unwrap_err().to_string();
        assert_eq!(message, "prelude has invalid hex digit `é` at position 2");
    }

    #[test]
    fn error_message_shows_expected_format() {
        let message = decode_prelude("c0de").unwrap_err().to_string();
        assert!(message.contains("0xc0de"), "{message}");
    }
}
