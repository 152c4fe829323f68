//! Chain parameter registry
//!
//! This crate provides per-chain constants (name, ticker code, address
//! version bytes, network magic) bound to a header hashing strategy, and a
//! registry that resolves chains by name, symbol or magic bytes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod chains;
pub mod config;
pub mod hash;
pub mod record;
pub mod registry;

pub use address::{decode_address, encode_address, AddressKind};
pub use config::{ChainDefinition, ChainsConfig, HashPolicy};
pub use hash::{
    DoubleSha256Strategy, HeaderHash, HeaderHashStrategy, KeccakStrategy, KeccakVariant,
    ScryptStrategy, STANDARD_HEADER_LEN,
};
pub use record::{ChainParams, ChainParamsBuilder, Magic};
pub use registry::ChainRegistry;

/// Error types for chain parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A chain with the same name or symbol is already registered
    #[error("Duplicate chain {field}: {value}")]
    DuplicateChain {
        /// Which unique field collided ("name" or "symbol")
        field: &'static str,
        /// The colliding value
        value: String,
    },

    /// No chain matches the lookup key
    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    /// A byte-valued field has the wrong length
    #[error("Invalid length for {field}: expected {expected} bytes, got {actual}")]
    InvalidFieldLength {
        /// Field name
        field: &'static str,
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// Header bytes do not match the strategy's expected length
    #[error("Malformed header: expected {expected} bytes, got {actual}")]
    MalformedHeader {
        /// Required header length
        expected: usize,
        /// Supplied header length
        actual: usize,
    },

    /// Address string could not be decoded or does not belong to the chain
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Hash function rejected its parameters
    #[error("Hashing error: {0}")]
    Hashing(String),

    /// Chain definitions could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reading chain definitions failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for chain parameter operations
pub type Result<T> = std::result::Result<T, Error>;
