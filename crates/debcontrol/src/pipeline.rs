//! The decode/encode pipeline.
//!
//! Decoding runs the signature envelope first and the paragraph scanner
//! second: clear-signed input is fully read, decoded and verified before
//! a single paragraph is produced. Encoding renders records through the
//! structural mapper and can optionally wrap the result in a clear-sign
//! envelope.

use std::io::BufRead;

use debcontrol_core::{render, render_all, ControlRecord, Paragraph, ParagraphReader};
use debcontrol_sign::{open, ClearSigner, Cleartext, SignerIdentity, Verification};

use crate::error::{Error, Result};

/// Configuration for the [`Decoder`].
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    /// Reject input that is not clear-signed.
    pub require_signature: bool,
}

/// Paragraphs decoded from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub paragraphs: Vec<Paragraph>,
    /// Identity of the verified signer, when the input was signed and checked.
    pub signer: Option<SignerIdentity>,
}

/// Decodes optionally clear-signed paragraph documents.
#[derive(Debug, Clone)]
pub struct Decoder<'k> {
    verification: Verification<'k>,
    config: DecoderConfig,
}

impl<'k> Decoder<'k> {
    pub fn new(verification: Verification<'k>) -> Self {
        Self::with_config(verification, DecoderConfig::default())
    }

    pub fn with_config(verification: Verification<'k>, config: DecoderConfig) -> Self {
        Self {
            verification,
            config,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a whole document.
    ///
    /// All-or-nothing: on any error no paragraphs are returned.
    pub fn decode<R: BufRead>(&self, reader: R) -> Result<Decoded> {
        let mut stream = self.stream(reader)?;
        let paragraphs = stream.by_ref().collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            count = paragraphs.len(),
            signed = stream.is_signed(),
            "decoded paragraphs"
        );
        Ok(Decoded {
            paragraphs,
            signer: stream.signer,
        })
    }

    /// Open a document for incremental decoding.
    ///
    /// The envelope is resolved (and verified) before this returns. The
    /// stream then yields paragraphs one by one; on a syntax error it
    /// yields the error once and stops, so the paragraphs before it remain
    /// usable.
    pub fn stream<R: BufRead>(&self, reader: R) -> Result<DecodeStream<R>> {
        let opened = open(reader, &self.verification)?;
        if self.config.require_signature && !opened.signed {
            tracing::warn!("rejecting unsigned input");
            return Err(Error::UnsignedData);
        }

        Ok(DecodeStream {
            reader: ParagraphReader::new(opened.cleartext),
            signer: opened.signer,
            signed: opened.signed,
        })
    }
}

/// Incremental paragraph stream over a decoded envelope.
#[derive(Debug)]
pub struct DecodeStream<R> {
    reader: ParagraphReader<Cleartext<R>>,
    signer: Option<SignerIdentity>,
    signed: bool,
}

impl<R: BufRead> DecodeStream<R> {
    pub fn signer(&self) -> Option<&SignerIdentity> {
        self.signer.as_ref()
    }

    /// Whether the input carried a clear-sign envelope.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// Line number of the last line the scanner consumed.
    pub fn line_number(&self) -> usize {
        self.reader.line_number()
    }
}

impl<R: BufRead> Iterator for DecodeStream<R> {
    type Item = Result<Paragraph>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next().map(|item| item.map_err(Error::from))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Free functions
// ─────────────────────────────────────────────────────────────────────────────

/// Decode a document with the default configuration.
pub fn decode<R: BufRead>(reader: R, verification: Verification<'_>) -> Result<Decoded> {
    Decoder::new(verification).decode(reader)
}

/// Render one record as paragraph text.
pub fn encode<T: ControlRecord>(record: &T) -> Result<String> {
    Ok(render(record)?)
}

/// Render several records as one document.
pub fn encode_all<'r, T, I>(records: I) -> Result<String>
where
    T: ControlRecord + 'r,
    I: IntoIterator<Item = &'r T>,
{
    Ok(render_all(records)?)
}

/// Render one record and wrap it in a clear-sign envelope.
pub fn encode_signed<T: ControlRecord>(record: &T, signer: &ClearSigner) -> Result<String> {
    let text = render(record)?;
    Ok(signer.sign_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use std::sync::OnceLock;

    use debcontrol_core::{FieldDescriptor, FieldValue, Schema, ToFieldValue};
    use debcontrol_sign::{Ed25519Keyring, SigningKeypair, VerificationError};

    fn init_tracing() {
        static ONCE: OnceLock<()> = OnceLock::new();
        ONCE.get_or_init(|| {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
                )
                .with_test_writer()
                .init();
        });
    }

    struct Binary {
        package: String,
        architecture: Vec<String>,
        installed_size: u64,
        ratio: f64,
    }

    impl ControlRecord for Binary {
        fn schema() -> Schema<Self> {
            Schema::new()
                .field(FieldDescriptor::new("Package", |b: &Binary| b.package.to_field_value()))
                .field(FieldDescriptor::new("Architecture", |b: &Binary| {
                    b.architecture.to_field_value()
                }))
                .field(
                    FieldDescriptor::new("installed_size", |b: &Binary| {
                        b.installed_size.to_field_value()
                    })
                    .key("Installed-Size"),
                )
                .field(FieldDescriptor::new("Ratio", |b: &Binary| b.ratio.to_field_value()).skip())
        }
    }

    struct Broken;

    impl ControlRecord for Broken {
        fn schema() -> Schema<Self> {
            Schema::new().field(FieldDescriptor::new("Weight", |_: &Broken| {
                FieldValue::Unsupported("f64")
            }))
        }
    }

    fn binary(name: &str) -> Binary {
        Binary {
            package: name.to_string(),
            architecture: vec!["amd64".into(), "arm64".into()],
            installed_size: 120,
            ratio: 0.5,
        }
    }

    fn keypair() -> SigningKeypair {
        SigningKeypair::from_seed(&[0x5a; 32])
    }

    const DOC: &str = "Package: hello\nVersion: 1.0\n\nPackage: world\n";

    #[test]
    fn test_decode_unsigned() {
        init_tracing();
        let decoded = decode(Cursor::new(DOC), Verification::Unverified).unwrap();

        assert_eq!(decoded.paragraphs.len(), 2);
        assert_eq!(decoded.paragraphs[0].get("Version"), Some("1.0"));
        assert_eq!(decoded.paragraphs[1].get("Package"), Some("world"));
        assert!(decoded.signer.is_none());
    }

    #[test]
    fn test_decode_signed_and_verified() {
        init_tracing();
        let armored = ClearSigner::new(keypair()).sign_text(DOC);
        let keyring = Ed25519Keyring::new().with_key(keypair().public_key());

        let decoded = decode(Cursor::new(armored), Verification::Verify(&keyring)).unwrap();
        assert_eq!(decoded.paragraphs.len(), 2);
        assert_eq!(
            decoded.signer.map(|s| s.key_id()),
            Some(keypair().public_key().key_id())
        );
    }

    #[test]
    fn test_decode_signed_wrong_key_yields_nothing() {
        init_tracing();
        let armored = ClearSigner::new(keypair()).sign_text(DOC);
        let keyring = Ed25519Keyring::new().with_key(SigningKeypair::from_seed(&[1; 32]).public_key());

        let err = decode(Cursor::new(armored), Verification::Verify(&keyring)).unwrap_err();
        assert!(matches!(
            err,
            Error::Verification(VerificationError::UnknownSigner(_))
        ));
    }

    #[test]
    fn test_require_signature() {
        let config = DecoderConfig {
            require_signature: true,
        };
        let decoder = Decoder::with_config(Verification::Unverified, config);

        assert!(matches!(
            decoder.decode(Cursor::new(DOC)),
            Err(Error::UnsignedData)
        ));

        let armored = ClearSigner::new(keypair()).sign_text(DOC);
        assert_eq!(decoder.decode(Cursor::new(armored)).unwrap().paragraphs.len(), 2);
    }

    #[test]
    fn test_decode_is_all_or_nothing() {
        let err = decode(
            Cursor::new("A: 1\n\nBadLine\n\n"),
            Verification::Unverified,
        )
        .unwrap_err();
        assert_eq!(err.syntax_line(), Some("BadLine"));
    }

    #[test]
    fn test_stream_yields_prefix_before_error() {
        let decoder = Decoder::new(Verification::Unverified);
        let mut stream = decoder
            .stream(Cursor::new("A: 1\n\nB: 2\n\nBadLine\n\nC: 3\n"))
            .unwrap();

        assert_eq!(stream.next().unwrap().unwrap().get("A"), Some("1"));
        assert_eq!(stream.next().unwrap().unwrap().get("B"), Some("2"));
        assert!(matches!(stream.next(), Some(Err(Error::Parse(_)))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_encode_record() {
        let text = encode(&binary("hello")).unwrap();
        assert_eq!(
            text,
            "Package: hello\nArchitecture: amd64 arm64\nInstalled-Size: 120\n"
        );
    }

    #[test]
    fn test_encode_unsupported_field() {
        assert!(matches!(encode(&Broken), Err(Error::Marshal(_))));
    }

    #[test]
    fn test_encode_all_then_decode() {
        let records = [binary("a"), binary("b"), binary("c")];
        let text = encode_all(&records).unwrap();

        let decoded = decode(Cursor::new(text), Verification::Unverified).unwrap();
        let names: Vec<_> = decoded
            .paragraphs
            .iter()
            .map(|p| p.get("Package").unwrap_or_default())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_encode_signed_then_decode() {
        let signer = ClearSigner::new(keypair());
        let armored = encode_signed(&binary("hello"), &signer).unwrap();
        let keyring: Ed25519Keyring = [signer.public_key()].into_iter().collect();

        let decoded = Decoder::new(Verification::Verify(&keyring))
            .decode(Cursor::new(armored))
            .unwrap();
        assert!(decoded.signer.is_some());
        assert_eq!(decoded.paragraphs[0].get("Installed-Size"), Some("120"));
    }

    #[test]
    fn test_decode_from_file() {
        let armored = ClearSigner::new(keypair()).sign_text(DOC);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(armored.as_bytes()).unwrap();

        let reader = std::io::BufReader::new(std::fs::File::open(file.path()).unwrap());
        let keyring = Ed25519Keyring::new().with_key(keypair().public_key());
        let decoded = decode(reader, Verification::Verify(&keyring)).unwrap();

        assert_eq!(decoded.paragraphs.len(), 2);
        assert!(decoded.signer.is_some());
    }

    #[test]
    fn test_decoder_shared_across_threads() {
        let armored = ClearSigner::new(keypair()).sign_text(DOC);
        let keyring = Ed25519Keyring::new().with_key(keypair().public_key());
        let decoder = Decoder::new(Verification::Verify(&keyring));

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| decoder.decode(Cursor::new(armored.as_str())).unwrap()))
                .collect();
            for handle in handles {
                let decoded = handle.join().unwrap();
                assert_eq!(decoded.paragraphs.len(), 2);
                assert!(decoded.signer.is_some());
            }
        });
    }
}
