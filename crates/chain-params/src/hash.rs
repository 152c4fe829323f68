//! Block header hashing strategies
//!
//! The hash function varies per chain family while every other parameter
//! varies per chain, so a single strategy instance is shared by all records
//! of a family.

use std::fmt;

use sha2::{Digest, Sha256};
use sha3::{Keccak256, Sha3_256};

use crate::{Error, Result};

/// Length of a standard Bitcoin-style block header
pub const STANDARD_HEADER_LEN: usize = 80;

/// Scrypt cost parameter (log2 of N = 1024) used by the Litecoin family
const SCRYPT_LOG_N: u8 = 10;

/// 32-byte block identifier
///
/// Stored in the internal byte order produced by the hash function. The
/// `Display` form is byte-reversed hex, which is how explorers and node RPCs
/// print block hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeaderHash([u8; 32]);

impl HeaderHash {
    /// Wrap raw digest bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes in internal order
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Byte-reversed hex, as displayed by explorers
    pub fn to_hex(&self) -> String {
        let mut reversed = self.0;
        reversed.reverse();
        hex::encode(reversed)
    }
}

impl fmt::Display for HeaderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for HeaderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HeaderHash").field(&self.to_hex()).finish()
    }
}

impl AsRef<[u8]> for HeaderHash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Capability that derives a block's canonical identifier from its header
///
/// Sealed: every implementation lives in this crate and checks the header
/// length before hashing. The raw hash functions are not reachable through
/// this trait.
///
/// ```compile_fail
/// use chain_params::{HeaderHashStrategy, KeccakStrategy};
///
/// let strategy = KeccakStrategy::default();
/// let _ = strategy.digest(&[0u8; 79]);
/// ```
pub trait HeaderHashStrategy: sealed::Sealed + fmt::Debug + Send + Sync {
    /// Policy name, e.g. `"sha256d"`
    fn name(&self) -> &'static str;

    /// Exact header length this strategy accepts
    fn header_len(&self) -> usize;

    /// Hash raw header bytes
    ///
    /// Fails with [`Error::MalformedHeader`] unless `header` is exactly
    /// [`header_len`](Self::header_len) bytes.
    fn compute_header_hash(&self, header: &[u8]) -> Result<HeaderHash>;
}

fn check_header_len(expected: usize, header: &[u8]) -> Result<()> {
    if header.len() != expected {
        return Err(Error::MalformedHeader {
            expected,
            actual: header.len(),
        });
    }
    Ok(())
}

/// SHA-256 applied twice, over any input length
pub(crate) fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// SHA-256d header hash (Bitcoin and its direct descendants)
#[derive(Debug, Clone)]
pub struct DoubleSha256Strategy {
    header_len: usize,
}

impl DoubleSha256Strategy {
    /// Strategy for a custom header length
    pub const fn new(header_len: usize) -> Self {
        Self { header_len }
    }
}

impl Default for DoubleSha256Strategy {
    fn default() -> Self {
        Self::new(STANDARD_HEADER_LEN)
    }
}

impl sealed::Sealed for DoubleSha256Strategy {}

impl HeaderHashStrategy for DoubleSha256Strategy {
    fn name(&self) -> &'static str {
        "sha256d"
    }

    fn header_len(&self) -> usize {
        self.header_len
    }

    fn compute_header_hash(&self, header: &[u8]) -> Result<HeaderHash> {
        check_header_len(self.header_len, header)?;
        Ok(HeaderHash(double_sha256(header)))
    }
}

/// Padding rule of the Keccak pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeccakVariant {
    /// Original Keccak submission padding (what pre-FIPS `sha3_256` helpers produced)
    #[default]
    Keccak256,
    /// FIPS-202 SHA3-256 padding
    Sha3,
}

/// Single 256-bit Keccak pass over the header
#[derive(Debug, Clone)]
pub struct KeccakStrategy {
    variant: KeccakVariant,
    header_len: usize,
}

impl KeccakStrategy {
    /// Strategy for a given variant and header length
    pub const fn new(variant: KeccakVariant, header_len: usize) -> Self {
        Self {
            variant,
            header_len,
        }
    }

    /// FIPS-202 SHA3-256 over a standard header
    pub const fn sha3_256() -> Self {
        Self::new(KeccakVariant::Sha3, STANDARD_HEADER_LEN)
    }

    /// Padding variant in use
    pub fn variant(&self) -> KeccakVariant {
        self.variant
    }

    fn hash(&self, header: &[u8]) -> HeaderHash {
        let bytes: [u8; 32] = match self.variant {
            KeccakVariant::Keccak256 => Keccak256::digest(header).into(),
            KeccakVariant::Sha3 => Sha3_256::digest(header).into(),
        };
        HeaderHash(bytes)
    }
}

impl Default for KeccakStrategy {
    fn default() -> Self {
        Self::new(KeccakVariant::Keccak256, STANDARD_HEADER_LEN)
    }
}

impl sealed::Sealed for KeccakStrategy {}

impl HeaderHashStrategy for KeccakStrategy {
    fn name(&self) -> &'static str {
        match self.variant {
            KeccakVariant::Keccak256 => "keccak",
            KeccakVariant::Sha3 => "sha3_256",
        }
    }

    fn header_len(&self) -> usize {
        self.header_len
    }

    fn compute_header_hash(&self, header: &[u8]) -> Result<HeaderHash> {
        check_header_len(self.header_len, header)?;
        Ok(self.hash(header))
    }
}

/// Scrypt(N=1024, r=1, p=1) header hash with the header as password and salt
#[derive(Debug, Clone)]
pub struct ScryptStrategy {
    params: scrypt::Params,
    header_len: usize,
}

impl ScryptStrategy {
    /// Litecoin-family parameters for a custom header length
    pub fn new(header_len: usize) -> Result<Self> {
        let params = scrypt::Params::new(SCRYPT_LOG_N, 1, 1, 32)
            .map_err(|e| Error::Hashing(format!("scrypt parameters rejected: {e}")))?;
        Ok(Self { params, header_len })
    }

    /// Litecoin-family parameters over a standard header
    pub fn litecoin() -> Result<Self> {
        Self::new(STANDARD_HEADER_LEN)
    }

    fn hash(&self, header: &[u8]) -> Result<HeaderHash> {
        let mut out = [0u8; 32];
        scrypt::scrypt(header, header, &self.params, &mut out)
            .map_err(|e| Error::Hashing(format!("scrypt failed: {e}")))?;
        Ok(HeaderHash(out))
    }
}

impl sealed::Sealed for ScryptStrategy {}

impl HeaderHashStrategy for ScryptStrategy {
    fn name(&self) -> &'static str {
        "scrypt"
    }

    fn header_len(&self) -> usize {
        self.header_len
    }

    fn compute_header_hash(&self, header: &[u8]) -> Result<HeaderHash> {
        check_header_len(self.header_len, header)?;
        self.hash(header)
    }
}
