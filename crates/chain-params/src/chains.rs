//! Built-in chain definitions
//!
//! Each hash family is instantiated once and shared by every chain in it.

use std::sync::Arc;

use crate::hash::{DoubleSha256Strategy, HeaderHashStrategy, KeccakStrategy, ScryptStrategy};
use crate::record::ChainParams;
use crate::registry::ChainRegistry;
use crate::Result;

/// Smartcash P2PKH version byte
///
/// Older definitions carried the Bitcoin values `0x00`/`0x05`; the later
/// definition with `0x63`/`0x18` is authoritative.
pub const SMARTCASH_ADDRESS_VERSION: u8 = 0x63;

/// Smartcash P2SH version byte
pub const SMARTCASH_SCRIPT_ADDRESS_VERSION: u8 = 0x18;

/// Smartcash network magic
pub const SMARTCASH_MAGIC: [u8; 4] = [0x5c, 0xa1, 0xab, 0x1e];

impl ChainRegistry {
    /// Registry populated with the built-in chains
    ///
    /// This is the single initialisation entry point for the built-in set;
    /// callers own the returned registry and pass it where it is needed.
    pub fn with_builtin_chains() -> Result<Self> {
        let mut registry = Self::new();
        for params in builtin_chains()? {
            registry.register(params)?;
        }
        tracing::info!("Initialised registry with {} built-in chains", registry.len());
        Ok(registry)
    }
}

/// Build the built-in chain records
pub fn builtin_chains() -> Result<Vec<ChainParams>> {
    let sha256d: Arc<dyn HeaderHashStrategy> = Arc::new(DoubleSha256Strategy::default());
    let keccak: Arc<dyn HeaderHashStrategy> = Arc::new(KeccakStrategy::default());
    let scrypt: Arc<dyn HeaderHashStrategy> = Arc::new(ScryptStrategy::litecoin()?);

    Ok(vec![
        ChainParams::builder("Bitcoin", "BTC")
            .address_version(&[0x00])
            .script_address_version(&[0x05])
            .magic(&[0xf9, 0xbe, 0xb4, 0xd9])
            .conf_file_name("bitcoin.conf")
            .rpc_port(8332)
            .hash_strategy(sha256d.clone())
            .build()?,
        ChainParams::builder("Testnet", "BC0")
            .address_version(&[0x6f])
            .script_address_version(&[0xc4])
            .magic(&[0x0b, 0x11, 0x09, 0x07])
            .conf_file_name("bitcoin.conf")
            .rpc_port(18332)
            .hash_strategy(sha256d.clone())
            .build()?,
        ChainParams::builder("Namecoin", "NMC")
            .address_version(&[0x34])
            .script_address_version(&[0x0d])
            .magic(&[0xf9, 0xbe, 0xb4, 0xfe])
            .conf_file_name("namecoin.conf")
            .rpc_port(8336)
            .hash_strategy(sha256d)
            .build()?,
        ChainParams::builder("Litecoin", "LTC")
            .address_version(&[0x30])
            .script_address_version(&[0x32])
            .magic(&[0xfb, 0xc0, 0xb6, 0xdb])
            .conf_file_name("litecoin.conf")
            .rpc_port(9332)
            .hash_strategy(scrypt)
            .build()?,
        ChainParams::builder("Smartcash", "SMT")
            .address_version(&[SMARTCASH_ADDRESS_VERSION])
            .script_address_version(&[SMARTCASH_SCRIPT_ADDRESS_VERSION])
            .magic(&SMARTCASH_MAGIC)
            .conf_file_name("smartcash.conf")
            .rpc_port(9679)
            .hash_strategy(keccak)
            .build()?,
    ])
}
