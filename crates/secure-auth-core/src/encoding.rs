//! Conversion between the host's wide (UTF-16) text and UTF-8.

use zeroize::{Zeroize, Zeroizing};

use crate::error::UnexpectedError;
use crate::unexpected;

/// Convert NUL-terminated (or unterminated) UTF-16 text to UTF-8 bytes.
///
/// Conversion stops at the first NUL unit, like a C wide string. Unpaired
/// surrogates fail with `utf8_conversion_failed` before any output is
/// produced.
///
/// # Example
///
/// ```
/// use secure_auth_core::encoding::wide_to_utf8;
///
/// let wide: Vec<u16> = "key\0garbage".encode_utf16().collect();
/// assert_eq!(wide_to_utf8(&wide).unwrap().as_slice(), b"key");
///
/// assert!(wide_to_utf8(&[0xD800]).is_err());
/// ```
pub fn wide_to_utf8(wide: &[u16]) -> Result<Zeroizing<Vec<u8>>, UnexpectedError> {
    let end = wide.iter().position(|&unit| unit == 0).unwrap_or(wide.len());
    let units = &wide[..end];

    // Validate and size first so the output is allocated exactly once and
    // never reallocated (a reallocation would leave an unwiped copy behind).
    let mut len = 0;
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(c) => len += c.len_utf8(),
            Err(_) => return Err(unexpected!(Utf8ConversionFailed)),
        }
    }

    let mut out = Zeroizing::new(Vec::with_capacity(len));
    let mut scratch = [0u8; 4];
    for c in char::decode_utf16(units.iter().copied()).filter_map(Result::ok) {
        out.extend_from_slice(c.encode_utf8(&mut scratch).as_bytes());
    }
    scratch.zeroize();

    Ok(out)
}

/// Convert UTF-8 text to UTF-16 code units, for feeding a wide input control.
pub fn utf8_to_wide(text: &str) -> Zeroizing<Vec<u16>> {
    Zeroizing::new(text.encode_utf16().collect())
}
