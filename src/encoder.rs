//! Base64 and unicode-escape encoding

use crate::text::{check_well_formed, display_lossy, EscapeOptions, ESCAPE_PREFIX};
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::write::EncoderStringWriter;
use base64::Engine;
use std::fmt::Write as _;
use std::io::Write as _;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

/// Read size used when streaming a binary payload
pub const BLOB_CHUNK_SIZE: usize = 8 * 1024;

/// Encode UTF-16 text as Base64 of its UTF-8 bytes.
///
/// Returns `None` (and logs a warning) if `text` contains a lone surrogate.
pub fn encode(text: &[u16]) -> Option<String> {
    if let Err(err) = check_well_formed(text) {
        warn!(
            error = %err,
            "Cannot process a string with lone surrogates: [{}]",
            display_lossy(text)
        );
        return None;
    }

    // Well-formed input converts without replacement
    let utf8 = String::from_utf16_lossy(text);
    Some(bytes_to_base64(utf8.as_bytes()))
}

/// Encode Rust text as Base64 of its UTF-8 bytes
pub fn encode_str(text: &str) -> String {
    bytes_to_base64(text.as_bytes())
}

/// Encode raw bytes as standard padded Base64
pub fn bytes_to_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Read a binary payload to the end and encode it as Base64.
///
/// The payload is consumed in [`BLOB_CHUNK_SIZE`] pieces and streamed into
/// the encoder, so only the encoded output is held in memory.
pub async fn blob_to_base64<R>(mut reader: R) -> Result<String>
where
    R: AsyncRead + Unpin,
{
    let mut writer = EncoderStringWriter::new(&STANDARD);
    let mut chunk = vec![0u8; BLOB_CHUNK_SIZE];
    let mut total = 0usize;

    loop {
        let read = reader
            .read(&mut chunk)
            .await
            .context("Failed to read binary payload")?;
        if read == 0 {
            break;
        }
        writer
            .write_all(&chunk[..read])
            .context("Failed to encode binary payload")?;
        total += read;
    }

    let encoded = writer.into_inner();
    debug!(bytes = total, encoded_len = encoded.len(), "Encoded binary payload");
    Ok(encoded)
}

/// Escape every UTF-16 code unit as `\uXXXX` (lowercase hex).
///
/// Supplementary-plane characters come out as two escapes, one per
/// surrogate. Lone surrogates are escaped like any other unit.
pub fn to_unicode_escape(text: &[u16]) -> String {
    let mut output = String::with_capacity(text.len() * 6);
    for &unit in text {
        push_escape(&mut output, u32::from(unit));
    }
    output
}

/// Escape every code point as `\u` followed by at least four hex digits.
///
/// Surrogate pairs are combined first, so code points above `U+FFFF` get
/// five or six digits (e.g. `\u1f600`). Such escapes do not decode back
/// through [`crate::decoder::from_unicode_escape`]. Lone surrogates are
/// escaped as their own code unit.
pub fn to_unicode_escape_surrogate_aware(text: &[u16]) -> String {
    let mut output = String::with_capacity(text.len() * 6);
    for decoded in char::decode_utf16(text.iter().copied()) {
        let code_point = match decoded {
            Ok(ch) => u32::from(ch),
            Err(err) => u32::from(err.unpaired_surrogate()),
        };
        push_escape(&mut output, code_point);
    }
    output
}

/// Escape `text` using the mode selected by `options`
pub fn to_unicode_escape_with(text: &[u16], options: &EscapeOptions) -> String {
    if options.surrogate_aware {
        to_unicode_escape_surrogate_aware(text)
    } else {
        to_unicode_escape(text)
    }
}

fn push_escape(output: &mut String, value: u32) {
    output.push_str(ESCAPE_PREFIX);
    // Writing into a String cannot fail
    let _ = write!(output, "{:04x}", value);
}
