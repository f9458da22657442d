//! Unit tests for content fingerprints

use signalwatch::detector::fingerprint;

#[test]
fn test_fingerprint_is_sha256_hex() {
    assert_eq!(
        fingerprint(""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
    assert_eq!(
        fingerprint("abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_fingerprint_is_deterministic() {
    let body = "<html><body><h1>USDC integration</h1></body></html>";
    assert_eq!(fingerprint(body), fingerprint(&body.to_string()));
}

#[test]
fn test_fingerprint_changes_with_content() {
    assert_ne!(fingerprint("<p>usdc</p>"), fingerprint("<p>usdc </p>"));
}
