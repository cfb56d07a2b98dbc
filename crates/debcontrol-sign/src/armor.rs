//! Clear-sign armor (RFC 4880 section 7).
//!
//! Format:
//! ```text
//! -----BEGIN PGP SIGNED MESSAGE-----
//! Hash: SHA512
//!
//! Package: hello
//! - --dash-escaped line
//! -----BEGIN PGP SIGNATURE-----
//!
//! q83vEjRWeJA...
//! =njUN
//! -----END PGP SIGNATURE-----
//! ```
//!
//! Lines are read with trailing spaces, tabs and CR removed. The signed
//! bytes are the text lines joined with CRLF, without a final line ending.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::EnvelopeError;

/// The first bytes of any ASCII-armored block.
pub const ARMOR_PREFIX: &[u8] = b"-----BEGIN PGP ";

const SIGNED_MESSAGE_BEGIN: &str = "-----BEGIN PGP SIGNED MESSAGE-----";
const SIGNATURE_BEGIN: &str = "-----BEGIN PGP SIGNATURE-----";
const SIGNATURE_END: &str = "-----END PGP SIGNATURE-----";

/// Base64 line width inside the signature block.
const LINE_WIDTH: usize = 64;

const CRC24_INIT: u32 = 0x00B7_04CE;
const CRC24_POLY: u32 = 0x0186_4CFB;

/// A signature block, detached from the text it signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetachedSignature {
    /// Armor headers of the signature block (`Key: Value`).
    pub headers: Vec<(String, String)>,
    /// Decoded signature body.
    pub body: Vec<u8>,
}

/// A decoded clear-signed message.
#[derive(Debug, Clone)]
pub struct ClearSigned {
    /// Values of the `Hash:` armor headers.
    pub hash_algorithms: Vec<String>,
    /// The cleartext, one `\n` after each line.
    pub plaintext: String,
    /// The bytes covered by the signature.
    pub signed_bytes: Vec<u8>,
    pub signature: DetachedSignature,
}

/// Iterator over armor lines: split on LF, trailing CR/space/tab removed.
struct ArmorLines<'a> {
    rest: &'a str,
}

impl<'a> ArmorLines<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn expect_line(&mut self, what: &str) -> Result<&'a str, EnvelopeError> {
        self.next()
            .ok_or_else(|| EnvelopeError::malformed(format!("unexpected end of input, {what}")))
    }
}

impl<'a> Iterator for ArmorLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let line = match self.rest.find('\n') {
            Some(i) => {
                let line = &self.rest[..i];
                self.rest = &self.rest[i + 1..];
                line
            }
            None => std::mem::take(&mut self.rest),
        };
        Some(line.trim_end_matches(['\r', ' ', '\t']))
    }
}

/// Split text into the lines a signature covers.
pub fn signable_lines(text: &str) -> Vec<&str> {
    ArmorLines::new(text).collect()
}

/// The canonical signed form of a list of lines: joined with CRLF.
pub fn canonical_text(lines: &[&str]) -> Vec<u8> {
    lines.join("\r\n").into_bytes()
}

/// CRC-24 checksum used by the armor checksum line.
pub fn crc24(data: &[u8]) -> u32 {
    let mut crc = CRC24_INIT;
    for &byte in data {
        crc ^= u32::from(byte) << 16;
        for _ in 0..8 {
            crc <<= 1;
            if crc & 0x0100_0000 != 0 {
                crc ^= CRC24_POLY;
            }
        }
    }
    crc & 0x00FF_FFFF
}

fn read_headers(lines: &mut ArmorLines<'_>) -> Result<Vec<(String, String)>, EnvelopeError> {
    let mut headers = Vec::new();
    loop {
        let line = lines.expect_line("reading armor headers")?;
        if line.is_empty() {
            return Ok(headers);
        }
        let (key, value) = line
            .split_once(": ")
            .ok_or_else(|| EnvelopeError::malformed(format!("invalid armor header {line:?}")))?;
        headers.push((key.to_string(), value.to_string()));
    }
}

/// Decode a clear-signed message.
///
/// Anything after the signature end marker is ignored.
pub fn decode_clearsigned(data: &[u8]) -> Result<ClearSigned, EnvelopeError> {
    let text = std::str::from_utf8(data)
        .map_err(|e| EnvelopeError::malformed(format!("not valid UTF-8: {e}")))?;
    let mut lines = ArmorLines::new(text);

    let first = lines.expect_line("expected signed message marker")?;
    if first != SIGNED_MESSAGE_BEGIN {
        return Err(EnvelopeError::malformed(format!(
            "expected {SIGNED_MESSAGE_BEGIN:?}, found {first:?}"
        )));
    }

    let hash_algorithms = read_headers(&mut lines)?
        .into_iter()
        .filter(|(key, _)| key == "Hash")
        .flat_map(|(_, value)| {
            value
                .split(',')
                .map(|name| name.trim().to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    let mut text_lines = Vec::new();
    loop {
        let line = lines.expect_line("missing signature block")?;
        if line == SIGNATURE_BEGIN {
            break;
        }
        let line = match line.strip_prefix('-') {
            Some(rest) => rest.strip_prefix(' ').ok_or_else(|| {
                EnvelopeError::malformed(format!("invalid dash-escaped line {line:?}"))
            })?,
            None => line,
        };
        text_lines.push(line);
    }

    let headers = read_headers(&mut lines)?;

    let mut encoded = String::new();
    let mut checksum = None;
    loop {
        let line = lines.expect_line("missing signature end marker")?;
        if line == SIGNATURE_END {
            break;
        }
        if checksum.is_some() {
            return Err(EnvelopeError::malformed("data after armor checksum"));
        }
        match line.strip_prefix('=') {
            Some(crc) => checksum = Some(crc),
            None => encoded.push_str(line),
        }
    }

    let body = BASE64.decode(encoded.as_bytes())?;
    if let Some(crc) = checksum {
        let crc = BASE64.decode(crc.as_bytes())?;
        if crc.len() != 3 {
            return Err(EnvelopeError::malformed("armor checksum must be 3 bytes"));
        }
        let expected = (u32::from(crc[0]) << 16) | (u32::from(crc[1]) << 8) | u32::from(crc[2]);
        let actual = crc24(&body);
        if expected != actual {
            return Err(EnvelopeError::ChecksumMismatch { expected, actual });
        }
    }

    let mut plaintext = String::with_capacity(text.len());
    for line in &text_lines {
        plaintext.push_str(line);
        plaintext.push('\n');
    }

    Ok(ClearSigned {
        hash_algorithms,
        plaintext,
        signed_bytes: canonical_text(&text_lines),
        signature: DetachedSignature { headers, body },
    })
}

/// Encode lines and a signature as a clear-signed message.
pub fn encode_clearsigned(lines: &[&str], hash_name: &str, signature: &DetachedSignature) -> String {
    let mut out = String::new();

    out.push_str(SIGNED_MESSAGE_BEGIN);
    out.push('\n');
    out.push_str(&format!("Hash: {hash_name}\n\n"));

    for line in lines {
        if line.starts_with('-') {
            out.push_str("- ");
        }
        out.push_str(line);
        out.push('\n');
    }

    out.push_str(SIGNATURE_BEGIN);
    out.push('\n');
    for (key, value) in &signature.headers {
        out.push_str(&format!("{key}: {value}\n"));
    }
    out.push('\n');

    let b64 = BASE64.encode(&signature.body);
    let mut start = 0;
    while start < b64.len() {
        let end = (start + LINE_WIDTH).min(b64.len());
        out.push_str(&b64[start..end]);
        out.push('\n');
        start = end;
    }

    let crc = crc24(&signature.body);
    let crc_bytes = [(crc >> 16) as u8, (crc >> 8) as u8, crc as u8];
    out.push('=');
    out.push_str(&BASE64.encode(crc_bytes));
    out.push('\n');

    out.push_str(SIGNATURE_END);
    out.push('\n');
    out
}
