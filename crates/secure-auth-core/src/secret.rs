//! Bounded, maskable storage for the text a user is typing.
//!
//! The buffer holds UTF-16 code units, the host's native wide encoding.
//! Content lives in [`Zeroizing`] storage, is wiped whenever it is replaced,
//! and is handed out exactly once through [`SecretBuffer::consume`].

use std::fmt;

use zeroize::{Zeroize, Zeroizing};

/// Default upper bound on the secret length, in UTF-16 code units.
pub const MAX_INPUT_LEN: usize = 256;

/// Glyph shown in place of each character while the buffer is masked.
pub const DEFAULT_MASK_CHAR: char = '*';

/// Number of leading units of `units` that fit in `max` without splitting a
/// surrogate pair.
///
/// When the cut would leave a high surrogate as the last unit, that unit is
/// dropped too, so a bounded prefix of valid text is always valid text.
///
/// ```
/// use secure_auth_core::secret::bounded_len;
///
/// let key: Vec<u16> = "abc\u{1F511}".encode_utf16().collect();
/// assert_eq!(bounded_len(&key, 4), 3);
/// assert_eq!(bounded_len(&key, 5), 5);
/// ```
pub fn bounded_len(units: &[u16], max: usize) -> usize {
    if units.len() <= max {
        return units.len();
    }
    match units[..max].last() {
        Some(&unit) if is_high_surrogate(unit) => max - 1,
        _ => max,
    }
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// Raw secret text plus its display policy.
///
/// Masking only changes the glyph reported by
/// [`display_mask`](SecretBuffer::display_mask); toggling it never touches
/// the stored text.
pub struct SecretBuffer {
    raw: Zeroizing<Vec<u16>>,
    max_len: usize,
    masked: bool,
    mask_char: char,
}

impl SecretBuffer {
    /// Create an empty, masked buffer bounded to [`MAX_INPUT_LEN`].
    pub fn new() -> Self {
        Self::with_limit(MAX_INPUT_LEN, DEFAULT_MASK_CHAR)
    }

    /// Create an empty, masked buffer with a custom bound and mask glyph.
    pub fn with_limit(max_len: usize, mask_char: char) -> Self {
        Self {
            raw: Zeroizing::new(Vec::with_capacity(max_len)),
            max_len,
            masked: true,
            mask_char,
        }
    }

    /// Replace the content, silently truncating to the bound.
    ///
    /// The previous content is wiped first. A surrogate pair straddling the
    /// bound is dropped whole.
    pub fn set_text(&mut self, units: &[u16]) {
        self.raw.zeroize();
        let len = bounded_len(units, self.max_len);
        self.raw.extend_from_slice(&units[..len]);
    }

    /// Flip between masked and plain display.
    pub fn toggle_mask(&mut self) {
        self.masked = !self.masked;
    }

    /// Take the content, leaving the buffer empty.
    ///
    /// A second call in a row returns an empty vector.
    pub fn consume(&mut self) -> Zeroizing<Vec<u16>> {
        Zeroizing::new(std::mem::take(&mut *self.raw))
    }

    /// Wipe the content without returning it.
    pub fn clear(&mut self) {
        self.raw.zeroize();
    }

    /// Mask glyph the display layer should use right now, if any.
    pub fn display_mask(&self) -> Option<char> {
        self.masked.then_some(self.mask_char)
    }

    pub fn is_masked(&self) -> bool {
        self.masked
    }

    pub fn mask_char(&self) -> char {
        self.mask_char
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Number of stored UTF-16 code units.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl Default for SecretBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// Manual Debug implementation to avoid exposing the secret
impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("raw", &"[REDACTED]")
            .field("len", &self.raw.len())
            .field("max_len", &self.max_len)
            .field("masked", &self.masked)
            .finish()
    }
}
