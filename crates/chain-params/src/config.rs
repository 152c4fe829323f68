//! Chain definitions loaded from JSON
//!
//! Byte fields are hex strings so a definition reads the same way the chain
//! constants are usually written:
//!
//! ```json
//! {
//!   "chains": [
//!     { "name": "Smartcash", "code3": "SMT", "address_version": "63",
//!       "script_addr_vers": "18", "magic": "5ca1ab1e", "policy": "keccak" }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hash::{
    DoubleSha256Strategy, HeaderHashStrategy, KeccakStrategy, KeccakVariant, ScryptStrategy,
    STANDARD_HEADER_LEN,
};
use crate::record::{ChainParams, DEFAULT_ADDRESS_VERSION, DEFAULT_SCRIPT_ADDRESS_VERSION};
use crate::registry::ChainRegistry;
use crate::{Error, Result};

/// Header hash policy of a chain family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashPolicy {
    /// Double SHA-256
    #[default]
    Sha256d,
    /// Keccak-256 (original padding)
    Keccak,
    /// FIPS-202 SHA3-256
    #[serde(rename = "sha3_256")]
    Sha3,
    /// Scrypt N=1024, r=1, p=1
    Scrypt,
}

impl HashPolicy {
    fn strategy(self, header_len: usize) -> Result<Arc<dyn HeaderHashStrategy>> {
        Ok(match self {
            Self::Sha256d => Arc::new(DoubleSha256Strategy::new(header_len)),
            Self::Keccak => Arc::new(KeccakStrategy::new(KeccakVariant::Keccak256, header_len)),
            Self::Sha3 => Arc::new(KeccakStrategy::new(KeccakVariant::Sha3, header_len)),
            Self::Scrypt => Arc::new(ScryptStrategy::new(header_len)?),
        })
    }
}

fn default_header_len() -> usize {
    STANDARD_HEADER_LEN
}

fn default_address_version() -> String {
    hex::encode([DEFAULT_ADDRESS_VERSION])
}

fn default_script_addr_vers() -> String {
    hex::encode([DEFAULT_SCRIPT_ADDRESS_VERSION])
}

/// One chain as written in a definitions file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDefinition {
    /// Chain name
    pub name: String,
    /// Ticker code
    pub code3: String,
    /// P2PKH version, hex
    #[serde(default = "default_address_version")]
    pub address_version: String,
    /// P2SH version, hex
    #[serde(default = "default_script_addr_vers")]
    pub script_addr_vers: String,
    /// Network magic, hex
    pub magic: String,
    /// Header hash policy
    #[serde(default)]
    pub policy: HashPolicy,
    /// Expected header length
    #[serde(default = "default_header_len")]
    pub header_len: usize,
    /// Decimal places
    #[serde(default)]
    pub decimals: Option<u8>,
    /// Node configuration file name
    #[serde(default)]
    pub conf_file_name: Option<String>,
    /// Default node RPC port
    #[serde(default)]
    pub rpc_port: Option<u16>,
}

impl ChainDefinition {
    fn build(&self, strategy: Arc<dyn HeaderHashStrategy>) -> Result<ChainParams> {
        let mut builder = ChainParams::builder(&self.name, &self.code3)
            .address_version(&decode_hex("address_version", &self.address_version)?)
            .script_address_version(&decode_hex("script_addr_vers", &self.script_addr_vers)?)
            .magic(&decode_hex("magic", &self.magic)?)
            .hash_strategy(strategy);

        if let Some(decimals) = self.decimals {
            builder = builder.decimals(decimals);
        }
        if let Some(conf) = &self.conf_file_name {
            builder = builder.conf_file_name(conf);
        }
        if let Some(port) = self.rpc_port {
            builder = builder.rpc_port(port);
        }

        builder.build()
    }
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| Error::Config(format!("{field} {value:?}: {e}")))
}

/// Set of chain definitions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainsConfig {
    /// Start from the built-in chains before adding these definitions
    #[serde(default)]
    pub include_builtin: bool,
    /// Chain definitions
    #[serde(default)]
    pub chains: Vec<ChainDefinition>,
}

impl ChainsConfig {
    /// Parse definitions from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read definitions from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        tracing::debug!("Loading chain definitions from {}", path.display());
        Self::from_json_str(&json)
    }

    /// Build and register every definition
    ///
    /// Definitions with the same policy and header length share one strategy
    /// instance. The first invalid or duplicate definition aborts the build.
    pub fn into_registry(self) -> Result<ChainRegistry> {
        let mut registry = if self.include_builtin {
            ChainRegistry::with_builtin_chains()?
        } else {
            ChainRegistry::new()
        };

        let mut strategies: HashMap<(HashPolicy, usize), Arc<dyn HeaderHashStrategy>> =
            HashMap::new();

        for definition in &self.chains {
            let key = (definition.policy, definition.header_len);
            let strategy = match strategies.get(&key) {
                Some(strategy) => strategy.clone(),
                None => {
                    let strategy = definition.policy.strategy(definition.header_len)?;
                    strategies.insert(key, strategy.clone());
                    strategy
                }
            };
            registry.register(definition.build(strategy)?)?;
        }

        tracing::info!(
            "Built chain registry with {} chains ({} from definitions)",
            registry.len(),
            self.chains.len()
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMARTCASH_JSON: &str = r#"{
        "chains": [
            {
                "name": "Smartcash",
                "code3": "SMT",
                "address_version": "63",
                "script_addr_vers": "18",
                "magic": "5ca1ab1e",
                "policy": "keccak",
                "conf_file_name": "smartcash.conf",
                "rpc_port": 9679
            }
        ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let config = ChainsConfig::from_json_str(SMARTCASH_JSON).unwrap();
        assert!(!config.include_builtin);
        assert_eq!(config.chains[0].policy, HashPolicy::Keccak);
        assert_eq!(config.chains[0].header_len, 80);

        let registry = config.into_registry().unwrap();
        let smt = registry.lookup_by_magic([0x5c, 0xa1, 0xab, 0x1e]).unwrap();
        assert_eq!(smt.name(), "Smartcash");
        assert_eq!(smt.address_version(), 0x63);
        assert_eq!(smt.rpc_port(), Some(9679));
        assert_eq!(smt.hash_strategy().name(), "keccak");
    }

    #[test]
    fn test_defaults_applied() {
        let json = r#"{ "chains": [ { "name": "Plain", "code3": "PLN", "magic": "01020304" } ] }"#;
        let registry = ChainsConfig::from_json_str(json).unwrap().into_registry().unwrap();
        let chain = registry.lookup_by_symbol("PLN").unwrap();
        assert_eq!(chain.address_version(), 0x00);
        assert_eq!(chain.script_address_version(), 0x05);
        assert_eq!(chain.decimals(), 8);
        assert_eq!(chain.hash_strategy().name(), "sha256d");
    }

    #[test]
    fn test_bad_lengths_surface_as_field_errors() {
        let json = r#"{ "chains": [ { "name": "Bad", "code3": "BAD",
            "address_version": "0063", "magic": "01020304" } ] }"#;
        let err = ChainsConfig::from_json_str(json).unwrap().into_registry().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFieldLength { field: "address_version", expected: 1, actual: 2 }
        ));

        let json = r#"{ "chains": [ { "name": "Bad", "code3": "BAD", "magic": "010203" } ] }"#;
        let err = ChainsConfig::from_json_str(json).unwrap().into_registry().unwrap_err();
        assert!(matches!(err, Error::InvalidFieldLength { field: "magic", actual: 3, .. }));
    }

    #[test]
    fn test_bad_hex_and_json() {
        let json = r#"{ "chains": [ { "name": "Bad", "code3": "BAD", "magic": "zzzzzzzz" } ] }"#;
        let err = ChainsConfig::from_json_str(json).unwrap().into_registry().unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        assert!(matches!(ChainsConfig::from_json_str("{ not json"), Err(Error::Config(_))));

        let json = r#"{ "chains": [ { "name": "X", "code3": "X", "magic": "01020304",
            "policy": "x11" } ] }"#;
        assert!(matches!(ChainsConfig::from_json_str(json), Err(Error::Config(_))));
    }

    #[test]
    fn test_strategies_shared_per_policy() {
        let json = r#"{ "chains": [
            { "name": "A", "code3": "AAA", "magic": "00000001", "policy": "keccak" },
            { "name": "B", "code3": "BBB", "magic": "00000002", "policy": "keccak" },
            { "name": "C", "code3": "CCC", "magic": "00000003", "policy": "keccak", "header_len": 112 },
            { "name": "D", "code3": "DDD", "magic": "00000004", "policy": "sha3_256" }
        ] }"#;
        let registry = ChainsConfig::from_json_str(json).unwrap().into_registry().unwrap();
        let a = registry.lookup_by_name("A").unwrap();
        let b = registry.lookup_by_name("B").unwrap();
        let c = registry.lookup_by_name("C").unwrap();
        let d = registry.lookup_by_name("D").unwrap();

        assert!(Arc::ptr_eq(a.hash_strategy(), b.hash_strategy()));
        assert!(!Arc::ptr_eq(a.hash_strategy(), c.hash_strategy()));
        assert_eq!(c.hash_strategy().header_len(), 112);
        assert_eq!(d.hash_strategy().name(), "sha3_256");
    }

    #[test]
    fn test_include_builtin_then_duplicate() {
        let config = ChainsConfig {
            include_builtin: true,
            ..ChainsConfig::from_json_str(SMARTCASH_JSON).unwrap()
        };
        let err = config.into_registry().unwrap_err();
        assert!(matches!(err, Error::DuplicateChain { field: "name", .. }));
    }
}
