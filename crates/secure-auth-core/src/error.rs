//! Error taxonomy shared across the plugin.
//!
//! Failures are split into three tiers that never blend into each other:
//!
//! - [`UnexpectedError`]: environment or internal anomalies. Carries the
//!   function and line where it was raised, for developers only.
//! - [`ValidationError`]: contract violations a caller should have prevented
//!   (bad key length, missing parameter, unsupported combination).
//! - [`InformationalError`]: expected conditions the user must be told about,
//!   optionally with a link explaining what to do next.
//!
//! Every kind resolves its text through an exhaustive `match`, so adding a
//! kind without a message is a compile error. Constructing an error has no
//! side effects: nothing here logs or touches I/O.
//!
//! # Example
//!
//! ```
//! use secure_auth_core::error::{InfoKind, PluginError, Tier};
//! use secure_auth_core::{inform, unexpected};
//!
//! fn decrypt(len: usize) -> secure_auth_core::Result<()> {
//!     if len == 0 {
//!         return Err(inform!(FileEmpty).into());
//!     }
//!     Err(unexpected!(FileReadFailed).into())
//! }
//!
//! let err = decrypt(0).unwrap_err();
//! assert_eq!(err.tier(), Tier::Informational);
//! assert!(matches!(err, PluginError::Informational(e) if e.kind() == InfoKind::FileEmpty));
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Kinds of unexpected (internal) errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnexpectedKind {
    Unexpected,
    NoEditorPointer,
    NoEditorHandle,
    NoFilePath,
    Utf8ConversionFailed,
    WideConversionFailed,
    PrefFileReadFailed,
    PrefFileParseFailed,
    HeaderWriteFailed,
    FileWriteFailed,
    FileReadFailed,
}

impl UnexpectedKind {
    /// Every kind, in declaration order.
    pub const ALL: [UnexpectedKind; 11] = [
        UnexpectedKind::Unexpected,
        UnexpectedKind::NoEditorPointer,
        UnexpectedKind::NoEditorHandle,
        UnexpectedKind::NoFilePath,
        UnexpectedKind::Utf8ConversionFailed,
        UnexpectedKind::WideConversionFailed,
        UnexpectedKind::PrefFileReadFailed,
        UnexpectedKind::PrefFileParseFailed,
        UnexpectedKind::HeaderWriteFailed,
        UnexpectedKind::FileWriteFailed,
        UnexpectedKind::FileReadFailed,
    ];

    /// The message template for this kind.
    pub fn message(self) -> &'static str {
        match self {
            UnexpectedKind::Unexpected => "unexpected error",
            UnexpectedKind::NoEditorPointer => "failed to get the editor component",
            UnexpectedKind::NoEditorHandle => "failed to get the editor window handle",
            UnexpectedKind::NoFilePath => "failed to get the path of the current file",
            UnexpectedKind::Utf8ConversionFailed => "failed to convert text to UTF-8",
            UnexpectedKind::WideConversionFailed => "failed to convert text to wide characters",
            UnexpectedKind::PrefFileReadFailed => "failed to read the preferences file",
            UnexpectedKind::PrefFileParseFailed => "failed to parse the preferences file",
            UnexpectedKind::HeaderWriteFailed => "failed to write the header",
            UnexpectedKind::FileWriteFailed => "failed to write the file",
            UnexpectedKind::FileReadFailed => "failed to read the file",
        }
    }

    /// Stable snake_case code.
    pub fn code(self) -> &'static str {
        match self {
            UnexpectedKind::Unexpected => "unexpected",
            UnexpectedKind::NoEditorPointer => "no_editor_pointer",
            UnexpectedKind::NoEditorHandle => "no_editor_handle",
            UnexpectedKind::NoFilePath => "no_file_path",
            UnexpectedKind::Utf8ConversionFailed => "utf8_conversion_failed",
            UnexpectedKind::WideConversionFailed => "wide_conversion_failed",
            UnexpectedKind::PrefFileReadFailed => "pref_file_read_failed",
            UnexpectedKind::PrefFileParseFailed => "pref_file_parse_failed",
            UnexpectedKind::HeaderWriteFailed => "header_write_failed",
            UnexpectedKind::FileWriteFailed => "file_write_failed",
            UnexpectedKind::FileReadFailed => "file_read_failed",
        }
    }
}

impl fmt::Display for UnexpectedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An internal error with the location it was raised from.
///
/// `Display` renders only the kind's message; use [`diagnostic`] when the
/// origin should be included (logs, bug reports).
///
/// Prefer the [`unexpected!`](crate::unexpected) macro, which captures the
/// enclosing function and line automatically.
///
/// [`diagnostic`]: UnexpectedError::diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .kind.message())]
pub struct UnexpectedError {
    kind: UnexpectedKind,
    function: &'static str,
    line: u32,
}

impl UnexpectedError {
    pub fn new(kind: UnexpectedKind, function: &'static str, line: u32) -> Self {
        Self {
            kind,
            function,
            line,
        }
    }

    pub fn kind(&self) -> UnexpectedKind {
        self.kind
    }

    /// Fully qualified path of the function that raised the error.
    pub fn function(&self) -> &'static str {
        self.function
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// The message followed by the raise site, e.g.
    /// `failed to read the file (crate::io::load, line 42)`.
    pub fn diagnostic(&self) -> String {
        format!(
            "{} ({}, line {})",
            self.kind.message(),
            self.function,
            self.line
        )
    }
}

/// Causes of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    InvalidKeyPresetId,
    InvalidMode,
    InvalidKeyLength,
    InvalidPbkdf2,
    InvalidBcrypt,
    InvalidScrypt,
    InvalidSaltLength,
    InvalidBcryptSaltLength,
    InvalidLineLength,
    InvalidHashDigestLength,
    InvalidHeader,
    InvalidHeaderVersion,
    InvalidHmacData,
    InvalidHmacHash,
    InvalidCipher,
    InvalidEncoding,
    InvalidKeyDerivation,
    InvalidSalt,
    InvalidIv,
    InvalidTag,
    InvalidAadFlag,
    InvalidHash,
    InvalidHashKey,
    InvalidCmdlineAction,
    InvalidConvertTargetEncoding,
    InvalidEol,
    InvalidUppercase,
    MissingHeader,
    MissingKeyLength,
    MissingCipherMode,
    MissingHmacKey,
    MissingIv,
    MissingSalt,
    MissingPassword,
    HashWithoutKeySupport,
    HashRequiresKey,
    CmdlineOnlyUtf8,
}

impl ValidationKind {
    /// Every kind, in declaration order.
    pub const ALL: [ValidationKind; 37] = [
        ValidationKind::InvalidKeyPresetId,
        ValidationKind::InvalidMode,
        ValidationKind::InvalidKeyLength,
        ValidationKind::InvalidPbkdf2,
        ValidationKind::InvalidBcrypt,
        ValidationKind::InvalidScrypt,
        ValidationKind::InvalidSaltLength,
        ValidationKind::InvalidBcryptSaltLength,
        ValidationKind::InvalidLineLength,
        ValidationKind::InvalidHashDigestLength,
        ValidationKind::InvalidHeader,
        ValidationKind::InvalidHeaderVersion,
        ValidationKind::InvalidHmacData,
        ValidationKind::InvalidHmacHash,
        ValidationKind::InvalidCipher,
        ValidationKind::InvalidEncoding,
        ValidationKind::InvalidKeyDerivation,
        ValidationKind::InvalidSalt,
        ValidationKind::InvalidIv,
        ValidationKind::InvalidTag,
        ValidationKind::InvalidAadFlag,
        ValidationKind::InvalidHash,
        ValidationKind::InvalidHashKey,
        ValidationKind::InvalidCmdlineAction,
        ValidationKind::InvalidConvertTargetEncoding,
        ValidationKind::InvalidEol,
        ValidationKind::InvalidUppercase,
        ValidationKind::MissingHeader,
        ValidationKind::MissingKeyLength,
        ValidationKind::MissingCipherMode,
        ValidationKind::MissingHmacKey,
        ValidationKind::MissingIv,
        ValidationKind::MissingSalt,
        ValidationKind::MissingPassword,
        ValidationKind::HashWithoutKeySupport,
        ValidationKind::HashRequiresKey,
        ValidationKind::CmdlineOnlyUtf8,
    ];

    pub fn message(self) -> &'static str {
        match self {
            ValidationKind::InvalidKeyPresetId => "invalid key preset id",
            ValidationKind::InvalidMode => "invalid cipher mode",
            ValidationKind::InvalidKeyLength => "invalid key length",
            ValidationKind::InvalidPbkdf2 => "invalid pbkdf2 parameters",
            ValidationKind::InvalidBcrypt => "invalid bcrypt parameters",
            ValidationKind::InvalidScrypt => "invalid scrypt parameters",
            ValidationKind::InvalidSaltLength => "invalid salt length",
            ValidationKind::InvalidBcryptSaltLength => "bcrypt requires a salt length of 16 bytes",
            ValidationKind::InvalidLineLength => "invalid line length",
            ValidationKind::InvalidHashDigestLength => "invalid hash digest length",
            ValidationKind::InvalidHeader => "invalid header",
            ValidationKind::InvalidHeaderVersion => "invalid header version",
            ValidationKind::InvalidHmacData => "invalid hmac data",
            ValidationKind::InvalidHmacHash => "invalid hmac hash algorithm",
            ValidationKind::InvalidCipher => "invalid cipher",
            ValidationKind::InvalidEncoding => "invalid encoding",
            ValidationKind::InvalidKeyDerivation => "invalid key derivation",
            ValidationKind::InvalidSalt => "invalid salt",
            ValidationKind::InvalidIv => "invalid iv",
            ValidationKind::InvalidTag => "invalid authentication tag",
            ValidationKind::InvalidAadFlag => "invalid aad flag",
            ValidationKind::InvalidHash => "invalid hash algorithm",
            ValidationKind::InvalidHashKey => "invalid hash key",
            ValidationKind::InvalidCmdlineAction => "invalid command line action",
            ValidationKind::InvalidConvertTargetEncoding => "invalid target encoding for conversion",
            ValidationKind::InvalidEol => "invalid end of line setting",
            ValidationKind::InvalidUppercase => "invalid uppercase setting",
            ValidationKind::MissingHeader => "header missing",
            ValidationKind::MissingKeyLength => "key length missing",
            ValidationKind::MissingCipherMode => "cipher mode missing",
            ValidationKind::MissingHmacKey => "hmac key missing",
            ValidationKind::MissingIv => "iv missing",
            ValidationKind::MissingSalt => "salt missing",
            ValidationKind::MissingPassword => "password missing",
            ValidationKind::HashWithoutKeySupport => "the selected hash algorithm does not support keys",
            ValidationKind::HashRequiresKey => "the selected hash algorithm requires a key",
            ValidationKind::CmdlineOnlyUtf8 => "the command line only supports utf8 input",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ValidationKind::InvalidKeyPresetId => "invalid_key_preset_id",
            ValidationKind::InvalidMode => "invalid_mode",
            ValidationKind::InvalidKeyLength => "invalid_key_length",
            ValidationKind::InvalidPbkdf2 => "invalid_pbkdf2",
            ValidationKind::InvalidBcrypt => "invalid_bcrypt",
            ValidationKind::InvalidScrypt => "invalid_scrypt",
            ValidationKind::InvalidSaltLength => "invalid_salt_length",
            ValidationKind::InvalidBcryptSaltLength => "invalid_bcrypt_salt_length",
            ValidationKind::InvalidLineLength => "invalid_line_length",
            ValidationKind::InvalidHashDigestLength => "invalid_hash_digest_length",
            ValidationKind::InvalidHeader => "invalid_header",
            ValidationKind::InvalidHeaderVersion => "invalid_header_version",
            ValidationKind::InvalidHmacData => "invalid_hmac_data",
            ValidationKind::InvalidHmacHash => "invalid_hmac_hash",
            ValidationKind::InvalidCipher => "invalid_cipher",
            ValidationKind::InvalidEncoding => "invalid_encoding",
            ValidationKind::InvalidKeyDerivation => "invalid_key_derivation",
            ValidationKind::InvalidSalt => "invalid_salt",
            ValidationKind::InvalidIv => "invalid_iv",
            ValidationKind::InvalidTag => "invalid_tag",
            ValidationKind::InvalidAadFlag => "invalid_aad_flag",
            ValidationKind::InvalidHash => "invalid_hash",
            ValidationKind::InvalidHashKey => "invalid_hash_key",
            ValidationKind::InvalidCmdlineAction => "invalid_cmdline_action",
            ValidationKind::InvalidConvertTargetEncoding => "invalid_convert_target_encoding",
            ValidationKind::InvalidEol => "invalid_eol",
            ValidationKind::InvalidUppercase => "invalid_uppercase",
            ValidationKind::MissingHeader => "missing_header",
            ValidationKind::MissingKeyLength => "missing_key_length",
            ValidationKind::MissingCipherMode => "missing_cipher_mode",
            ValidationKind::MissingHmacKey => "missing_hmac_key",
            ValidationKind::MissingIv => "missing_iv",
            ValidationKind::MissingSalt => "missing_salt",
            ValidationKind::MissingPassword => "missing_password",
            ValidationKind::HashWithoutKeySupport => "hash_without_key_support",
            ValidationKind::HashRequiresKey => "hash_requires_key",
            ValidationKind::CmdlineOnlyUtf8 => "cmdline_only_utf8",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A caller contract violation with a fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", .kind.message())]
pub struct ValidationError {
    kind: ValidationKind,
}

impl ValidationError {
    pub fn new(kind: ValidationKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ValidationKind {
        self.kind
    }
}

impl From<ValidationKind> for ValidationError {
    fn from(kind: ValidationKind) -> Self {
        Self::new(kind)
    }
}

/// User-facing conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoKind {
    FileEmpty,
    HmacAuthFailed,
    BadHeaderVersion,
    NoTextSelected,
    NoConvertTextSelected,
}

impl InfoKind {
    /// Every kind, in declaration order.
    pub const ALL: [InfoKind; 5] = [
        InfoKind::FileEmpty,
        InfoKind::HmacAuthFailed,
        InfoKind::BadHeaderVersion,
        InfoKind::NoTextSelected,
        InfoKind::NoConvertTextSelected,
    ];

    pub fn message(self) -> &'static str {
        match self {
            InfoKind::FileEmpty => "The file is empty.",
            InfoKind::HmacAuthFailed => "HMAC authentication failed! The data may have been tampered with or the key is wrong.",
            InfoKind::BadHeaderVersion => "The header was written by a newer version of this plugin.",
            InfoKind::NoTextSelected => "No text selected.",
            InfoKind::NoConvertTextSelected => "Select the text you want to convert first.",
        }
    }

    /// Link to a page explaining how to resolve the condition.
    pub fn url(self) -> Option<&'static str> {
        match self {
            InfoKind::HmacAuthFailed => Some("https://en.wikipedia.org/wiki/HMAC"),
            InfoKind::BadHeaderVersion => {
                Some("https://github.com/jeanpaulrichter/nppcrypt/releases")
            }
            InfoKind::FileEmpty | InfoKind::NoTextSelected | InfoKind::NoConvertTextSelected => {
                None
            }
        }
    }

    /// Text shown in place of the raw URL.
    pub fn url_caption(self) -> Option<&'static str> {
        match self {
            InfoKind::HmacAuthFailed => Some("what is HMAC?"),
            InfoKind::BadHeaderVersion => Some("download the latest version"),
            InfoKind::FileEmpty | InfoKind::NoTextSelected | InfoKind::NoConvertTextSelected => {
                None
            }
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            InfoKind::FileEmpty => "file_empty",
            InfoKind::HmacAuthFailed => "hmac_auth_failed",
            InfoKind::BadHeaderVersion => "bad_header_version",
            InfoKind::NoTextSelected => "no_text_selected",
            InfoKind::NoConvertTextSelected => "no_convert_text_selected",
        }
    }
}

impl fmt::Display for InfoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A condition to show the user directly, possibly with a help link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", .kind.message())]
pub struct InformationalError {
    kind: InfoKind,
}

impl InformationalError {
    pub fn new(kind: InfoKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> InfoKind {
        self.kind
    }

    pub fn url(&self) -> Option<&'static str> {
        self.kind.url()
    }

    pub fn url_caption(&self) -> Option<&'static str> {
        self.kind.url_caption()
    }
}

impl From<InfoKind> for InformationalError {
    fn from(kind: InfoKind) -> Self {
        Self::new(kind)
    }
}

/// Which tier an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Unexpected,
    Validation,
    Informational,
}

/// Any error raised by the plugin.
///
/// Conversions only wrap; the tier of the original error is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error(transparent)]
    Unexpected(#[from] UnexpectedError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Informational(#[from] InformationalError),
}

impl PluginError {
    pub fn tier(&self) -> Tier {
        match self {
            PluginError::Unexpected(_) => Tier::Unexpected,
            PluginError::Validation(_) => Tier::Validation,
            PluginError::Informational(_) => Tier::Informational,
        }
    }

    /// Stable code of the underlying kind.
    pub fn code(&self) -> &'static str {
        match self {
            PluginError::Unexpected(e) => e.kind().code(),
            PluginError::Validation(e) => e.kind().code(),
            PluginError::Informational(e) => e.kind().code(),
        }
    }
}

/// Result type using [`PluginError`].
pub type Result<T> = std::result::Result<T, PluginError>;

/// Expands to the path of the enclosing function.
#[doc(hidden)]
#[macro_export]
macro_rules! function_path {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

/// Builds an [`UnexpectedError`](crate::error::UnexpectedError) tagged with
/// the enclosing function and the current line.
///
/// ```
/// use secure_auth_core::error::UnexpectedKind;
/// use secure_auth_core::unexpected;
///
/// let err = unexpected!(NoFilePath);
/// assert_eq!(err.kind(), UnexpectedKind::NoFilePath);
/// assert!(err.line() > 0);
/// ```
#[macro_export]
macro_rules! unexpected {
    ($kind:ident) => {
        $crate::error::UnexpectedError::new(
            $crate::error::UnexpectedKind::$kind,
            $crate::function_path!(),
            ::std::line!(),
        )
    };
}

/// Builds a [`ValidationError`](crate::error::ValidationError).
#[macro_export]
macro_rules! invalid {
    ($kind:ident) => {
        $crate::error::ValidationError::new($crate::error::ValidationKind::$kind)
    };
}

/// Builds an [`InformationalError`](crate::error::InformationalError).
#[macro_export]
macro_rules! inform {
    ($kind:ident) => {
        $crate::error::InformationalError::new($crate::error::InfoKind::$kind)
    };
}
