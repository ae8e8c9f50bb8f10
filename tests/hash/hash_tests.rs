// Tests for the digest provider and streaming hash computation

use std::fs;
use std::io::Cursor;

use tempfile::TempDir;
use treehash::hash::{Algorithm, HashComputer, HashRegistry, HashWalkError};

use super::common::SHA256_HI;

#[test]
fn test_compute_hash_sha256() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hello.txt");
    fs::write(&path, b"hello world").unwrap();

    let computer = HashComputer::new();
    let result = computer.compute_hash(&path, Algorithm::Sha256).unwrap();

    assert_eq!(result.algorithm, Algorithm::Sha256);
    assert_eq!(
        result.hash,
        "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
    );
    assert_eq!(result.file_path, path);
}

#[test]
fn test_known_vectors() {
    let computer = HashComputer::new();
    let cases = [
        (Algorithm::Sha256, b"hi".as_slice(), SHA256_HI),
        (Algorithm::Md5, b"hi".as_slice(), "49f68a5c8493ec2c0bf489821c21fc3b"),
        (Algorithm::Sha1, b"hi".as_slice(), "c22b5f9178342609428d6f51b2c5af4c0bde6a42"),
        (Algorithm::Crc32, b"hi".as_slice(), "d8932aac"),
        (Algorithm::Crc64, b"123456789".as_slice(), "b90956c775a41001"),
        (
            Algorithm::Sha3_256,
            b"".as_slice(),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a",
        ),
        (
            Algorithm::Blake2b256,
            b"hi".as_slice(),
            "6815cb4aeb1580a91ef673e63ff03bdb6e855c3a896db3f2765e03281a61134a",
        ),
        (
            Algorithm::Blake2s256,
            b"hi".as_slice(),
            "f509150e97310e8e59d0a328a6cf9042d104c94c3bbf21c8ed9e6957ef1e5a64",
        ),
        (
            Algorithm::Blake3,
            b"".as_slice(),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262",
        ),
    ];

    for (algorithm, input, expected) in cases {
        assert_eq!(computer.compute_bytes(input, algorithm), expected, "{}", algorithm);
    }
}

#[test]
fn test_every_algorithm_has_declared_length() {
    let computer = HashComputer::new();
    for algorithm in Algorithm::ALL {
        let hex = computer.compute_bytes(b"treehash", algorithm);
        assert_eq!(hex.len() * 4, algorithm.output_bits(), "{}", algorithm);
        assert_eq!(algorithm.hasher().output_size() * 8, algorithm.output_bits());
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}

#[test]
fn test_names_round_trip_through_from_name() {
    for algorithm in Algorithm::ALL {
        assert_eq!(Algorithm::from_name(algorithm.name()), Some(algorithm));
    }
    assert_eq!(Algorithm::from_name("SHA-256"), Some(Algorithm::Sha256));
    assert_eq!(Algorithm::from_name("blake2b"), Some(Algorithm::Blake2b512));
    assert_eq!(Algorithm::from_name("rot13"), None);
}

#[test]
fn test_unsupported_algorithm_falls_back_to_sha256() {
    assert_eq!(HashRegistry::resolve("not-a-hash"), Algorithm::Sha256);

    let mut hasher = HashRegistry::get_hasher("not-a-hash");
    hasher.update(b"hi");
    assert_eq!(hex::encode(hasher.finalize()), SHA256_HI);
}

#[test]
fn test_hashers_are_independent() {
    let mut a = Algorithm::Sha256.hasher();
    let b = Algorithm::Sha256.hasher();
    a.update(b"hi");
    assert_eq!(hex::encode(a.finalize()), SHA256_HI);
    assert_eq!(
        hex::encode(b.finalize()),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn test_streaming_matches_single_update() {
    // Small buffer forces many reads
    let data: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let streamed = HashComputer::with_buffer_size(7)
        .compute_reader(Cursor::new(&data), Algorithm::Blake3)
        .unwrap();
    let whole = HashComputer::new().compute_bytes(&data, Algorithm::Blake3);
    assert_eq!(streamed, whole);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = HashComputer::new()
        .compute_hash(&dir.path().join("missing"), Algorithm::Md5)
        .unwrap_err();
    assert!(matches!(err, HashWalkError::FileNotFound { .. }));
    assert!(err.is_io());
}

#[test]
fn test_list_algorithms() {
    let list = HashRegistry::list_algorithms();
    assert_eq!(list.len(), Algorithm::ALL.len());
    assert_eq!(list.iter().filter(|a| a.default).count(), 1);
    let crc = list.iter().find(|a| a.name == "crc32").unwrap();
    assert!(!crc.cryptographic);
    assert_eq!(crc.output_bits, 32);
}
