// Hash computation module
// Algorithm registry (digest provider) and streaming file hashing

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use blake3::Hasher as Blake3Hasher;
use crc::{Crc, CRC_32_ISO_HDLC, CRC_64_GO_ISO};
use serde::Serialize;
use sha2::Digest;
use tracing::warn;
use xxhash_rust::xxh3::Xxh3;

use super::error::{HashWalkError, Result};

/// Trait for hash algorithm implementations
pub trait Hasher: Send {
    /// Update the hasher with new data
    fn update(&mut self, data: &[u8]);

    /// Finalize the hash and return the result
    fn finalize(self: Box<Self>) -> Vec<u8>;

    /// Get the output size in bytes
    fn output_size(&self) -> usize;
}

/// Any RustCrypto digest (md5, sha1, sha2, sha3, blake2, whirlpool)
pub struct DigestWrapper<D>(D);

impl<D: Digest + Send> Hasher for DigestWrapper<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.0, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        Digest::finalize(self.0).to_vec()
    }

    fn output_size(&self) -> usize {
        <D as Digest>::output_size()
    }
}

static CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
static CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_GO_ISO);

// Checksums are rendered big-endian so the hex matches the usual
// `%08x` / `%016x` rendering of the integer.
pub struct Crc32Wrapper(crc::Digest<'static, u32>);

impl Hasher for Crc32Wrapper {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().to_be_bytes().to_vec()
    }

    fn output_size(&self) -> usize {
        4
    }
}

pub struct Crc64Wrapper(crc::Digest<'static, u64>);

impl Hasher for Crc64Wrapper {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().to_be_bytes().to_vec()
    }

    fn output_size(&self) -> usize {
        8
    }
}

// BLAKE3 wrapper
//
// With the rayon feature enabled, update_rayon() splits large buffers across
// the rayon pool. Not on a worker pool thread: a join there may steal another
// file task onto the same thread while this one still holds its cache slot.
pub struct Blake3Wrapper(Blake3Hasher);

impl Hasher for Blake3Wrapper {
    fn update(&mut self, data: &[u8]) {
        if data.len() > 128 * 1024 && rayon::current_thread_index().is_none() {
            self.0.update_rayon(data);
        } else {
            self.0.update(data);
        }
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.finalize().as_bytes().to_vec()
    }

    fn output_size(&self) -> usize {
        32
    }
}

// XXH3 64-bit
pub struct Xxh3Wrapper(Xxh3);

impl Hasher for Xxh3Wrapper {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.digest().to_be_bytes().to_vec()
    }

    fn output_size(&self) -> usize {
        8
    }
}

// XXH3 128-bit
pub struct Xxh128Wrapper(Xxh3);

impl Hasher for Xxh128Wrapper {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.0.digest128().to_be_bytes().to_vec()
    }

    fn output_size(&self) -> usize {
        16
    }
}

/// Closed set of supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    Crc32,
    Crc64,
    Md5,
    Sha1,
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Sha3_224,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b256,
    Blake2b512,
    Blake2s256,
    Blake3,
    Whirlpool,
    Xxh3,
    Xxh128,
}

impl Algorithm {
    pub const ALL: [Algorithm; 19] = [
        Algorithm::Crc32,
        Algorithm::Crc64,
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Sha3_224,
        Algorithm::Sha3_256,
        Algorithm::Sha3_384,
        Algorithm::Sha3_512,
        Algorithm::Blake2b256,
        Algorithm::Blake2b512,
        Algorithm::Blake2s256,
        Algorithm::Blake3,
        Algorithm::Whirlpool,
        Algorithm::Xxh3,
        Algorithm::Xxh128,
    ];

    /// Look up an algorithm by identifier (case-insensitive, common aliases accepted)
    pub fn from_name(name: &str) -> Option<Self> {
        let alg = match name.trim().to_lowercase().as_str() {
            "crc32" => Algorithm::Crc32,
            "crc64" => Algorithm::Crc64,
            "md5" => Algorithm::Md5,
            "sha1" | "sha-1" => Algorithm::Sha1,
            "sha224" | "sha-224" => Algorithm::Sha224,
            "sha256" | "sha-256" => Algorithm::Sha256,
            "sha384" | "sha-384" => Algorithm::Sha384,
            "sha512" | "sha-512" => Algorithm::Sha512,
            "sha3-224" => Algorithm::Sha3_224,
            "sha3-256" => Algorithm::Sha3_256,
            "sha3-384" => Algorithm::Sha3_384,
            "sha3-512" => Algorithm::Sha3_512,
            "blake2b-256" => Algorithm::Blake2b256,
            "blake2b" | "blake2b-512" => Algorithm::Blake2b512,
            "blake2s" | "blake2s-256" => Algorithm::Blake2s256,
            "blake3" => Algorithm::Blake3,
            "whirlpool" => Algorithm::Whirlpool,
            "xxh3" => Algorithm::Xxh3,
            "xxh128" => Algorithm::Xxh128,
            _ => return None,
        };
        Some(alg)
    }

    /// Canonical identifier, as accepted by `from_name`
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Crc32 => "crc32",
            Algorithm::Crc64 => "crc64",
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Sha3_224 => "sha3-224",
            Algorithm::Sha3_256 => "sha3-256",
            Algorithm::Sha3_384 => "sha3-384",
            Algorithm::Sha3_512 => "sha3-512",
            Algorithm::Blake2b256 => "blake2b-256",
            Algorithm::Blake2b512 => "blake2b-512",
            Algorithm::Blake2s256 => "blake2s-256",
            Algorithm::Blake3 => "blake3",
            Algorithm::Whirlpool => "whirlpool",
            Algorithm::Xxh3 => "xxh3",
            Algorithm::Xxh128 => "xxh128",
        }
    }

    pub fn output_bits(self) -> usize {
        match self {
            Algorithm::Crc32 => 32,
            Algorithm::Crc64 | Algorithm::Xxh3 => 64,
            Algorithm::Md5 | Algorithm::Xxh128 => 128,
            Algorithm::Sha1 => 160,
            Algorithm::Sha224 | Algorithm::Sha3_224 => 224,
            Algorithm::Sha256
            | Algorithm::Sha3_256
            | Algorithm::Blake2b256
            | Algorithm::Blake2s256
            | Algorithm::Blake3 => 256,
            Algorithm::Sha384 | Algorithm::Sha3_384 => 384,
            Algorithm::Sha512
            | Algorithm::Sha3_512
            | Algorithm::Blake2b512
            | Algorithm::Whirlpool => 512,
        }
    }

    pub fn is_cryptographic(self) -> bool {
        !matches!(
            self,
            Algorithm::Crc32 | Algorithm::Crc64 | Algorithm::Xxh3 | Algorithm::Xxh128
        )
    }

    /// Fresh, independent hasher for one stream
    pub fn hasher(self) -> Box<dyn Hasher> {
        match self {
            Algorithm::Crc32 => Box::new(Crc32Wrapper(CRC32.digest())),
            Algorithm::Crc64 => Box::new(Crc64Wrapper(CRC64.digest())),
            Algorithm::Md5 => Box::new(DigestWrapper(md5::Md5::new())),
            Algorithm::Sha1 => Box::new(DigestWrapper(sha1::Sha1::new())),
            Algorithm::Sha224 => Box::new(DigestWrapper(sha2::Sha224::new())),
            Algorithm::Sha256 => Box::new(DigestWrapper(sha2::Sha256::new())),
            Algorithm::Sha384 => Box::new(DigestWrapper(sha2::Sha384::new())),
            Algorithm::Sha512 => Box::new(DigestWrapper(sha2::Sha512::new())),
            Algorithm::Sha3_224 => Box::new(DigestWrapper(sha3::Sha3_224::new())),
            Algorithm::Sha3_256 => Box::new(DigestWrapper(sha3::Sha3_256::new())),
            Algorithm::Sha3_384 => Box::new(DigestWrapper(sha3::Sha3_384::new())),
            Algorithm::Sha3_512 => Box::new(DigestWrapper(sha3::Sha3_512::new())),
            Algorithm::Blake2b256 => Box::new(DigestWrapper(
                blake2::Blake2b::<blake2::digest::consts::U32>::new(),
            )),
            Algorithm::Blake2b512 => Box::new(DigestWrapper(blake2::Blake2b512::new())),
            Algorithm::Blake2s256 => Box::new(DigestWrapper(blake2::Blake2s256::new())),
            Algorithm::Blake3 => Box::new(Blake3Wrapper(Blake3Hasher::new())),
            Algorithm::Whirlpool => Box::new(DigestWrapper(whirlpool::Whirlpool::new())),
            Algorithm::Xxh3 => Box::new(Xxh3Wrapper(Xxh3::new())),
            Algorithm::Xxh128 => Box::new(Xxh128Wrapper(Xxh3::new())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Information about a hash algorithm
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmInfo {
    pub name: String,
    pub output_bits: usize,
    pub cryptographic: bool,
    pub default: bool,
}

/// Registry for hash algorithms
pub struct HashRegistry;

impl HashRegistry {
    /// Resolve an identifier, falling back to the default with a warning
    pub fn resolve(algorithm: &str) -> Algorithm {
        match Algorithm::from_name(algorithm) {
            Some(alg) => alg,
            None => {
                let fallback = Algorithm::default();
                warn!(
                    "unsupported hash algorithm {} falling back to {}",
                    algorithm, fallback
                );
                fallback
            }
        }
    }

    /// Get a hasher instance for the specified algorithm identifier
    pub fn get_hasher(algorithm: &str) -> Box<dyn Hasher> {
        Self::resolve(algorithm).hasher()
    }

    /// List all available hash algorithms
    pub fn list_algorithms() -> Vec<AlgorithmInfo> {
        Algorithm::ALL
            .iter()
            .map(|alg| AlgorithmInfo {
                name: alg.name().to_string(),
                output_bits: alg.output_bits(),
                cryptographic: alg.is_cryptographic(),
                default: *alg == Algorithm::default(),
            })
            .collect()
    }
}

/// Result of a hash computation
#[derive(Debug, Clone)]
pub struct HashResult {
    pub algorithm: Algorithm,
    pub hash: String, // hex-encoded
    pub file_path: PathBuf,
}

/// Hash computer with streaming I/O
#[derive(Debug, Clone)]
pub struct HashComputer {
    buffer_size: usize,
}

impl HashComputer {
    /// Create a new HashComputer with default buffer size (1MB)
    pub fn new() -> Self {
        Self {
            buffer_size: 1024 * 1024,
        }
    }

    /// Create a new HashComputer with custom buffer size
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Compute the digest of a file by streaming its contents
    pub fn compute_hash(&self, path: &Path, algorithm: Algorithm) -> Result<HashResult> {
        let file = File::open(path).map_err(|e| {
            HashWalkError::from_io_error(e, "opening", Some(path.to_path_buf()))
        })?;

        let hash = self.compute_reader(file, algorithm).map_err(|e| {
            HashWalkError::from_io_error(e, "reading", Some(path.to_path_buf()))
        })?;

        Ok(HashResult {
            algorithm,
            hash,
            file_path: path.to_path_buf(),
        })
    }

    /// Stream any reader through a fresh hasher and return the lowercase hex digest
    pub fn compute_reader<R: Read>(&self, mut reader: R, algorithm: Algorithm) -> std::io::Result<String> {
        let mut hasher = algorithm.hasher();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(hex::encode(hasher.finalize()))
    }

    /// Digest of an in-memory buffer
    pub fn compute_bytes(&self, data: &[u8], algorithm: Algorithm) -> String {
        let mut hasher = algorithm.hasher();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }
}

impl Default for HashComputer {
    fn default() -> Self {
        Self::new()
    }
}
