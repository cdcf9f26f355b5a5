//! # xknife
//!
//! Small, stateless helpers for text encoding and nested data lookup.
//!
//! ## Text codec
//!
//! Text is taken as UTF-16 code units (`&[u16]`) so that ill-formed input can
//! be represented and rejected:
//!
//! - [`encode`] / [`decode`]: text to and from Base64 of its UTF-8 bytes.
//!   Input containing a lone surrogate yields `None` and a `tracing` warning.
//! - [`blob_to_base64`]: stream any [`tokio::io::AsyncRead`] into Base64.
//! - [`to_unicode_escape`] / [`from_unicode_escape`]: `\uXXXX` escaping per
//!   code unit, plus [`to_unicode_escape_surrogate_aware`] which escapes per
//!   code point.
//!
//! ```
//! use xknife::{decode, encode, text::to_utf16};
//!
//! let encoded = encode(&to_utf16("Hello")).unwrap();
//! assert_eq!(encoded, "SGVsbG8=");
//! assert_eq!(decode(&to_utf16(&encoded))?.as_deref(), Some("Hello"));
//!
//! // Lone surrogates are rejected
//! assert_eq!(encode(&[0xD800]), None);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Key/value seeker
//!
//! [`extract`] walks a [`serde_json::Value`] depth-first with an explicit
//! stack and collects every value stored under each requested key.

pub mod decoder;
pub mod encoder;
pub mod seeker;
pub mod text;

#[cfg(test)]
mod test_util;

pub use decoder::{decode, decode_str, from_unicode_escape, from_unicode_escape_to_string};
pub use encoder::{
    blob_to_base64, bytes_to_base64, encode, encode_str, to_unicode_escape,
    to_unicode_escape_surrogate_aware, to_unicode_escape_with,
};
pub use seeker::{extract, extract_json, Extraction};
pub use text::{check_well_formed, is_well_formed, EscapeOptions, LoneSurrogate, SurrogateKind};
