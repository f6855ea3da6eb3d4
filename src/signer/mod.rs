//! Signers: the kinds of signing device the wallet drives, what firmware they
//! run, and the capability used to hand them a transaction.

mod compatibility;
mod external;
mod version;

pub use compatibility::{signer_compatibility, supports_fee_market, SignerCompatibility, TxFormat};
pub use external::{ExternalSigner, RawSignature, WalletSigner};
pub use version::AppVersion;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignerType {
    /// Software keystore derived from a mnemonic.
    Seed,
    /// Software keystore holding raw private keys.
    Ring,
    Ledger,
    Trezor,
    Lattice,
    /// Smart-account signer acting through a DAO agent.
    Aragon,
    #[serde(other)]
    Unknown,
}

impl SignerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignerType::Seed => "seed",
            SignerType::Ring => "ring",
            SignerType::Ledger => "ledger",
            SignerType::Trezor => "trezor",
            SignerType::Lattice => "lattice",
            SignerType::Aragon => "aragon",
            SignerType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SignerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignerType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "seed" => SignerType::Seed,
            "ring" => SignerType::Ring,
            "ledger" => SignerType::Ledger,
            "trezor" => SignerType::Trezor,
            "lattice" => SignerType::Lattice,
            "aragon" => SignerType::Aragon,
            _ => SignerType::Unknown,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerSummary {
    #[serde(rename = "type")]
    pub signer_type: SignerType,
    #[serde(default)]
    pub app_version: AppVersion,
    /// Hardware sub-variant, e.g. "Trezor One" vs "Trezor T".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl SignerSummary {
    pub fn new(signer_type: SignerType, app_version: AppVersion) -> Self {
        Self {
            signer_type,
            app_version,
            model: None,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }
}
