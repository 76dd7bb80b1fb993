//! Literal operand parsing: byte-string constants and integer literals.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use data_encoding::BASE32_NOPAD;

use crate::types::AssemblerError;

// Standard alphabet, padding optional on input.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Base32,
    Base64,
}

impl Encoding {
    fn from_keyword(token: &str) -> Option<Self> {
        match token {
            "b32" | "base32" => Some(Self::Base32),
            "b64" | "base64" => Some(Self::Base64),
            _ => None,
        }
    }

    fn from_inline(token: &str) -> Option<(Self, &str)> {
        [
            ("base32(", Self::Base32),
            ("b32(", Self::Base32),
            ("base64(", Self::Base64),
            ("b64(", Self::Base64),
        ]
        .into_iter()
        .find_map(|(prefix, encoding)| token.strip_prefix(prefix).map(|rest| (encoding, rest)))
    }

    fn decode(self, payload: &str) -> Result<Vec<u8>, AssemblerError> {
        match self {
            Self::Base32 => BASE32_NOPAD
                .decode(payload.trim_end_matches('=').as_bytes())
                .map_err(|e| {
                    AssemblerError::InvalidByteConstant(format!("base32 {payload:?}: {e}"))
                }),
            Self::Base64 => BASE64.decode(payload).map_err(|e| {
                AssemblerError::InvalidByteConstant(format!("base64 {payload:?}: {e}"))
            }),
        }
    }
}

/// Parses one byte-string literal from the front of `args`, returning the
/// decoded bytes together with the tokens it did not consume.
pub fn parse_byte_constant<'a, 'b>(
    args: &'a [&'b str],
) -> Result<(Vec<u8>, &'a [&'b str]), AssemblerError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(AssemblerError::InvalidByteConstant(
            "missing byte constant".to_string(),
        ));
    };

    if let Some(encoding) = Encoding::from_keyword(first) {
        let Some((payload, rest)) = rest.split_first() else {
            return Err(AssemblerError::InvalidByteConstant(format!(
                "{first} expects a payload"
            )));
        };
        return Ok((encoding.decode(payload)?, rest));
    }

    if let Some(digits) = first.strip_prefix("0x") {
        let bytes = hex::decode(digits)
            .map_err(|e| AssemblerError::InvalidByteConstant(format!("{first}: {e}")))?;
        return Ok((bytes, rest));
    }

    if let Some((encoding, inline)) = Encoding::from_inline(first) {
        let payload = inline.strip_suffix(')').ok_or_else(|| {
            AssemblerError::InvalidByteConstant(format!("unterminated {first}"))
        })?;
        return Ok((encoding.decode(payload)?, rest));
    }

    Err(AssemblerError::InvalidByteConstant(format!(
        "could not parse byte constant args {args:?}"
    )))
}

/// Parses every byte-string literal in `args`, as listed by `bytecblock`.
pub fn parse_byte_constants(mut args: &[&str]) -> Result<Vec<Vec<u8>>, AssemblerError> {
    let mut values = Vec::new();
    while !args.is_empty() {
        let (value, rest) = parse_byte_constant(args)?;
        values.push(value);
        args = rest;
    }
    Ok(values)
}

/// Parses an unsigned integer literal.
///
/// Accepted forms: decimal (`42`), hexadecimal (`0x2a`), octal (`0o52` or a
/// leading zero as in `052`) and binary (`0b101010`). Prefixes are
/// case-insensitive. Signs, separators and values above `u64::MAX` are
/// rejected.
pub fn parse_uint(text: &str) -> Result<u64, AssemblerError> {
    let invalid = || AssemblerError::InvalidInteger(text.to_string());
    let lower = text.to_ascii_lowercase();
    let (digits, radix) = if let Some(d) = lower.strip_prefix("0x") {
        (d, 16)
    } else if let Some(d) = lower.strip_prefix("0o") {
        (d, 8)
    } else if let Some(d) = lower.strip_prefix("0b") {
        (d, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    // from_str_radix tolerates a leading '+', the grammar does not.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    u64::from_str_radix(digits, radix).map_err(|_| invalid())
}

/// Parses an index operand. Negative values are returned as-is so that the
/// caller can report them against the right pool.
pub fn parse_index(text: &str) -> Result<i64, AssemblerError> {
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let value = i64::try_from(parse_uint(magnitude)?)
        .map_err(|_| AssemblerError::InvalidInteger(text.to_string()))?;
    Ok(if negative { -value } else { value })
}
