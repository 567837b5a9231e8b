//! Page-size normalization and page-token codec.
//!
//! A token is the standard padded base-64 encoding of the decimal text of a
//! zero-based offset (`10` -> `"10"` -> `"MTA="`). The empty string stands
//! for offset 0 on input and for "no further page" on output.
//!
//! Offsets address positions in the live ordering, so rows inserted or
//! deleted between two page fetches shift the window: a later page can skip
//! or repeat entries. Callers that need stable iteration under writes must
//! not rely on these tokens.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Page size used when the caller passes zero or a negative value.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest page size served; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Decoding failure for caller-supplied page tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTokenError {
    Encoding(base64::DecodeError),
    NotUtf8,
    NotAnOffset(String),
}

impl Display for PageTokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encoding(err) => write!(f, "invalid page token: {err}"),
            Self::NotUtf8 => write!(f, "invalid page token: payload is not UTF-8"),
            Self::NotAnOffset(text) => {
                write!(f, "invalid page token: `{text}` is not a valid offset")
            }
        }
    }
}

impl Error for PageTokenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encoding(err) => Some(err),
            Self::NotUtf8 | Self::NotAnOffset(_) => None,
        }
    }
}

impl From<base64::DecodeError> for PageTokenError {
    fn from(value: base64::DecodeError) -> Self {
        Self::Encoding(value)
    }
}

/// Maps a requested page size onto the served range, silently.
///
/// - `<= 0` -> `DEFAULT_PAGE_SIZE`
/// - `> MAX_PAGE_SIZE` -> `MAX_PAGE_SIZE`
pub fn normalize_page_size(page_size: i32) -> u32 {
    match u32::try_from(page_size) {
        Ok(0) | Err(_) => DEFAULT_PAGE_SIZE,
        Ok(value) if value > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        Ok(value) => value,
    }
}

pub fn encode_page_token(offset: u64) -> String {
    BASE64.encode(offset.to_string())
}

/// Decodes a page token into an offset.
///
/// The offset must fit in `i64` because SQLite binds it as a signed integer.
pub fn decode_page_token(token: &str) -> Result<u64, PageTokenError> {
    if token.is_empty() {
        return Ok(0);
    }

    let bytes = BASE64.decode(token)?;
    let text = String::from_utf8(bytes).map_err(|_| PageTokenError::NotUtf8)?;
    match text.parse::<i64>() {
        Ok(offset) if offset >= 0 => Ok(offset.unsigned_abs()),
        _ => Err(PageTokenError::NotAnOffset(text)),
    }
}

/// Token for the page after `offset + returned`, or empty at the end.
pub fn next_page_token(offset: u64, returned: usize, total_count: u64) -> String {
    let next_offset = offset.saturating_add(returned as u64);
    if next_offset < total_count {
        encode_page_token(next_offset)
    } else {
        String::new()
    }
}
