//! Chain parameter records

use std::fmt;
use std::sync::Arc;

use crate::address::{self, AddressKind};
use crate::hash::{self, DoubleSha256Strategy, HeaderHash, HeaderHashStrategy};
use crate::{Error, Result};

/// Default number of decimal places of a coin unit
pub const DEFAULT_DECIMALS: u8 = 8;

/// Default P2PKH version byte
pub const DEFAULT_ADDRESS_VERSION: u8 = 0x00;

/// Default P2SH version byte
pub const DEFAULT_SCRIPT_ADDRESS_VERSION: u8 = 0x05;

/// A 4-byte network magic identifying peer-protocol messages
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Magic(pub [u8; 4]);

impl Magic {
    /// Parse a magic from a byte slice that must be exactly four bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; 4] = bytes.try_into().map_err(|_| Error::InvalidFieldLength {
            field: "magic",
            expected: 4,
            actual: bytes.len(),
        })?;
        Ok(Self(array))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for Magic {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Magic").field(&hex::encode(self.0)).finish()
    }
}

impl fmt::Display for Magic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Immutable parameters of one chain
///
/// Hashing is not part of the record's identity: the record holds a shared
/// reference to the strategy of its chain family.
#[derive(Debug, Clone)]
pub struct ChainParams {
    name: String,
    symbol: String,
    address_version: u8,
    script_address_version: u8,
    magic: Magic,
    decimals: u8,
    conf_file_name: Option<String>,
    rpc_port: Option<u16>,
    hash_strategy: Arc<dyn HeaderHashStrategy>,
}

impl ChainParams {
    /// Start building a record
    pub fn builder(name: impl Into<String>, symbol: impl Into<String>) -> ChainParamsBuilder {
        ChainParamsBuilder::new(name, symbol)
    }

    /// Human-readable chain name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticker code
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// P2PKH address version byte
    pub fn address_version(&self) -> u8 {
        self.address_version
    }

    /// P2SH address version byte
    pub fn script_address_version(&self) -> u8 {
        self.script_address_version
    }

    /// Network magic
    pub fn magic(&self) -> Magic {
        self.magic
    }

    /// Decimal places of the coin unit
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Node configuration file name, if known
    pub fn conf_file_name(&self) -> Option<&str> {
        self.conf_file_name.as_deref()
    }

    /// Default node RPC port, if known
    pub fn rpc_port(&self) -> Option<u16> {
        self.rpc_port
    }

    /// Bound header hash strategy
    pub fn hash_strategy(&self) -> &Arc<dyn HeaderHashStrategy> {
        &self.hash_strategy
    }

    /// Canonical block identifier for raw header bytes
    pub fn compute_header_hash(&self, header: &[u8]) -> Result<HeaderHash> {
        self.hash_strategy.compute_header_hash(header)
    }

    /// Transaction id (double SHA-256 for every chain family)
    pub fn transaction_hash(&self, tx: &[u8]) -> HeaderHash {
        HeaderHash::from_bytes(hash::double_sha256(tx))
    }

    /// Pay-to-pubkey-hash address for a HASH160
    pub fn p2pkh_address(&self, hash160: &[u8; 20]) -> String {
        address::encode_address(self.address_version, hash160)
    }

    /// Pay-to-script-hash address for a HASH160
    pub fn p2sh_address(&self, hash160: &[u8; 20]) -> String {
        address::encode_address(self.script_address_version, hash160)
    }

    /// Decode an address and check it belongs to this chain
    pub fn classify_address(&self, address: &str) -> Result<(AddressKind, [u8; 20])> {
        let (version, hash160) = address::decode_address(address)?;
        if version == self.address_version {
            Ok((AddressKind::PubKeyHash, hash160))
        } else if version == self.script_address_version {
            Ok((AddressKind::ScriptHash, hash160))
        } else {
            Err(Error::InvalidAddress(format!(
                "version byte 0x{version:02x} is not used by {}",
                self.name
            )))
        }
    }
}

/// Typed construction of a [`ChainParams`]
///
/// Byte fields are taken as slices and checked for exact length in
/// [`build`](Self::build). Unset fields fall back to the Bitcoin defaults.
#[derive(Debug, Clone)]
pub struct ChainParamsBuilder {
    name: String,
    symbol: String,
    address_version: Vec<u8>,
    script_address_version: Vec<u8>,
    magic: Option<Vec<u8>>,
    decimals: u8,
    conf_file_name: Option<String>,
    rpc_port: Option<u16>,
    hash_strategy: Option<Arc<dyn HeaderHashStrategy>>,
}

impl ChainParamsBuilder {
    /// New builder with default version bytes and no magic
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            address_version: vec![DEFAULT_ADDRESS_VERSION],
            script_address_version: vec![DEFAULT_SCRIPT_ADDRESS_VERSION],
            magic: None,
            decimals: DEFAULT_DECIMALS,
            conf_file_name: None,
            rpc_port: None,
            hash_strategy: None,
        }
    }

    /// P2PKH version (must be one byte)
    pub fn address_version(mut self, bytes: &[u8]) -> Self {
        self.address_version = bytes.to_vec();
        self
    }

    /// P2SH version (must be one byte)
    pub fn script_address_version(mut self, bytes: &[u8]) -> Self {
        self.script_address_version = bytes.to_vec();
        self
    }

    /// Network magic (must be four bytes)
    pub fn magic(mut self, bytes: &[u8]) -> Self {
        self.magic = Some(bytes.to_vec());
        self
    }

    /// Decimal places
    pub fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Node configuration file name
    pub fn conf_file_name(mut self, name: impl Into<String>) -> Self {
        self.conf_file_name = Some(name.into());
        self
    }

    /// Default node RPC port
    pub fn rpc_port(mut self, port: u16) -> Self {
        self.rpc_port = Some(port);
        self
    }

    /// Header hash strategy shared with the rest of the chain family
    pub fn hash_strategy(mut self, strategy: Arc<dyn HeaderHashStrategy>) -> Self {
        self.hash_strategy = Some(strategy);
        self
    }

    /// Validate field lengths and produce the record
    pub fn build(self) -> Result<ChainParams> {
        let address_version = single_byte("address_version", &self.address_version)?;
        let script_address_version =
            single_byte("script_address_version", &self.script_address_version)?;
        let magic = Magic::from_slice(self.magic.as_deref().unwrap_or_default())?;

        let hash_strategy = self
            .hash_strategy
            .unwrap_or_else(|| Arc::new(DoubleSha256Strategy::default()));

        Ok(ChainParams {
            name: self.name,
            symbol: self.symbol,
            address_version,
            script_address_version,
            magic,
            decimals: self.decimals,
            conf_file_name: self.conf_file_name,
            rpc_port: self.rpc_port,
            hash_strategy,
        })
    }
}

fn single_byte(field: &'static str, bytes: &[u8]) -> Result<u8> {
    match bytes {
        [b] => Ok(*b),
        _ => Err(Error::InvalidFieldLength {
            field,
            expected: 1,
            actual: bytes.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::KeccakStrategy;

    fn smartcash() -> ChainParamsBuilder {
        ChainParams::builder("Smartcash", "SMT")
            .address_version(&[0x63])
            .script_address_version(&[0x18])
            .magic(&[0x5c, 0xa1, 0xab, 0x1e])
            .hash_strategy(Arc::new(KeccakStrategy::default()))
    }

    #[test]
    fn test_build_smartcash() {
        let params = smartcash().build().unwrap();
        assert_eq!(params.name(), "Smartcash");
        assert_eq!(params.symbol(), "SMT");
        assert_eq!(params.address_version(), 0x63);
        assert_eq!(params.script_address_version(), 0x18);
        assert_eq!(params.magic(), Magic([0x5c, 0xa1, 0xab, 0x1e]));
        assert_eq!(params.decimals(), DEFAULT_DECIMALS);
        assert_eq!(params.hash_strategy().name(), "keccak");
    }

    #[test]
    fn test_defaults() {
        let params = ChainParams::builder("Bitcoin", "BTC")
            .magic(&[0xf9, 0xbe, 0xb4, 0xd9])
            .build()
            .unwrap();
        assert_eq!(params.address_version(), 0x00);
        assert_eq!(params.script_address_version(), 0x05);
        assert_eq!(params.hash_strategy().name(), "sha256d");
        assert!(params.conf_file_name().is_none());
        assert!(params.rpc_port().is_none());
    }

    #[test]
    fn test_two_byte_version_rejected() {
        let err = smartcash().address_version(&[0x00, 0x63]).build().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFieldLength { field: "address_version", expected: 1, actual: 2 }
        ));

        let err = smartcash().script_address_version(&[0x18, 0x00]).build().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFieldLength { field: "script_address_version", expected: 1, actual: 2 }
        ));

        let err = smartcash().address_version(&[]).build().unwrap_err();
        assert!(matches!(err, Error::InvalidFieldLength { actual: 0, .. }));
    }

    #[test]
    fn test_three_byte_magic_rejected() {
        let err = smartcash().magic(&[0x5c, 0xa1, 0xab]).build().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFieldLength { field: "magic", expected: 4, actual: 3 }
        ));
    }

    #[test]
    fn test_missing_magic_rejected() {
        let err = ChainParams::builder("NoMagic", "NMG").build().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFieldLength { field: "magic", expected: 4, actual: 0 }
        ));
    }

    #[test]
    fn test_header_hash_delegates_to_strategy() {
        let params = smartcash().build().unwrap();
        let header = [0u8; 80];
        let direct = KeccakStrategy::default().compute_header_hash(&header).unwrap();
        assert_eq!(params.compute_header_hash(&header).unwrap(), direct);
        assert!(matches!(
            params.compute_header_hash(&header[..79]),
            Err(Error::MalformedHeader { expected: 80, actual: 79 })
        ));
    }

    #[test]
    fn test_transaction_hash_ignores_header_strategy() {
        let params = smartcash().build().unwrap();
        let tx = b"arbitrary transaction bytes";
        assert_eq!(
            params.transaction_hash(tx).as_bytes(),
            &hash::double_sha256(tx)
        );
    }

    #[test]
    fn test_magic_debug() {
        assert_eq!(format!("{:?}", Magic([0x5c, 0xa1, 0xab, 0x1e])), "Magic(\"5ca1ab1e\")");
        assert_eq!(Magic([0xf9, 0xbe, 0xb4, 0xd9]).to_string(), "f9beb4d9");
    }

    #[test]
    fn test_records_share_strategy() {
        let strategy: Arc<dyn HeaderHashStrategy> = Arc::new(KeccakStrategy::default());
        let a = smartcash().hash_strategy(strategy.clone()).build().unwrap();
        let b = ChainParams::builder("Other", "OTH")
            .magic(&[1, 2, 3, 4])
            .hash_strategy(strategy.clone())
            .build()
            .unwrap();
        assert!(Arc::ptr_eq(a.hash_strategy(), b.hash_strategy()));
    }
}
