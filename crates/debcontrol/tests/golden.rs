//! Golden vectors and end-to-end decode scenarios.

use std::io::Cursor;

use debcontrol::sign::VerificationError;
use debcontrol::{decode, Decoder, DecoderConfig, Error, Verification};
use debcontrol_testkit::{all_vectors, multi_party_fixtures, TestFixture, SAMPLE_DOCUMENT};

#[test]
fn test_all_golden_vectors() {
    for vector in all_vectors() {
        let result = decode(Cursor::new(vector.input), Verification::Unverified);
        match vector.expected_paragraphs() {
            Some(expected) => {
                let decoded = result.unwrap_or_else(|e| panic!("{}: {e}", vector.name));
                assert_eq!(decoded.paragraphs, expected, "{}", vector.name);
            }
            None => {
                let err = result.expect_err(vector.name);
                assert!(err.syntax_line().is_some(), "{}: {err}", vector.name);
            }
        }
    }
}

#[test]
fn test_golden_vectors_report() {
    for (name, passed) in debcontrol_testkit::verify_all_vectors() {
        assert!(passed, "vector failed: {name}");
    }
}

#[test]
fn test_sample_document() {
    let decoded = decode(Cursor::new(SAMPLE_DOCUMENT), Verification::Unverified).unwrap();

    assert_eq!(decoded.paragraphs.len(), 2);
    assert_eq!(decoded.paragraphs[0].get("Source"), Some("hello"));
    assert_eq!(
        decoded.paragraphs[1].get("Description"),
        Some(
            "example package based on GNU hello\n\
             The GNU hello program produces a familiar, friendly greeting.\n\
             \n\
             It is an example of the GNU coding standards."
        )
    );
}

#[test]
fn test_signed_with_matching_keyring() {
    let fixture = TestFixture::with_seed([0x11; 32]);
    let keyring = fixture.keyring();

    let decoded = decode(
        Cursor::new(fixture.signed_sample()),
        Verification::Verify(&keyring),
    )
    .unwrap();

    let plain = decode(Cursor::new(SAMPLE_DOCUMENT), Verification::Unverified).unwrap();
    assert_eq!(decoded.paragraphs, plain.paragraphs);
    assert_eq!(
        decoded.signer.unwrap().fingerprint(),
        &fixture.public_key().fingerprint()
    );
}

#[test]
fn test_signed_with_other_keyring() {
    let parties = multi_party_fixtures(2);
    let keyring = parties[1].keyring();

    let err = decode(
        Cursor::new(parties[0].signed_sample()),
        Verification::Verify(&keyring),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Verification(VerificationError::UnknownSigner(_))
    ));
}

#[test]
fn test_signed_without_keyring() {
    let fixture = TestFixture::with_seed([0x22; 32]);

    let decoded = decode(
        Cursor::new(fixture.signed_sample()),
        Verification::Unverified,
    )
    .unwrap();

    assert_eq!(decoded.paragraphs.len(), 2);
    assert!(decoded.signer.is_none());
}

#[test]
fn test_tampered_signed_document() {
    let fixture = TestFixture::with_seed([0x33; 32]);
    let keyring = fixture.keyring();
    let tampered = fixture
        .signed_sample()
        .replace("Package: hello", "Package: evil");

    let err = decode(Cursor::new(tampered), Verification::Verify(&keyring)).unwrap_err();
    assert!(matches!(
        err,
        Error::Verification(VerificationError::BadSignature(_))
    ));
}

#[test]
fn test_require_signature() {
    let fixture = TestFixture::with_seed([0x44; 32]);
    let keyring = fixture.keyring();
    let decoder = Decoder::with_config(
        Verification::Verify(&keyring),
        DecoderConfig {
            require_signature: true,
        },
    );

    assert!(matches!(
        decoder.decode(Cursor::new(SAMPLE_DOCUMENT)),
        Err(Error::UnsignedData)
    ));
    assert!(decoder
        .decode(Cursor::new(fixture.signed_sample()))
        .unwrap()
        .signer
        .is_some());
}

#[test]
fn test_stream_signed_document() {
    let fixture = TestFixture::with_seed([0x55; 32]);
    let keyring = fixture.keyring();
    let decoder = Decoder::new(Verification::Verify(&keyring));

    let stream = decoder.stream(Cursor::new(fixture.signed_sample())).unwrap();
    assert!(stream.is_signed());
    assert!(stream.signer().is_some());

    let packages: Vec<_> = stream
        .map(|p| p.unwrap().get("Package").map(str::to_owned))
        .collect();
    assert_eq!(packages, [None, Some("hello".to_string())]);
}
