//! Transaction request values and the stateless operations over them:
//! fee population, london → legacy downgrade, intent classification and the
//! external-signing handshake.

mod classify;
mod downgrade;
mod fees;
mod populate;
mod sign;

pub use classify::{classify_transaction, RecipientType, TransactionRequest, TxClassification};
pub use downgrade::london_to_legacy;
pub use fees::{exceeds_max_fee, max_fee, total_fee};
pub use populate::populate;
pub use sign::{build_transaction, sign, PendingSignature, SignedTransaction};

use crate::consts::{TX_TYPE_ACCESS_LIST, TX_TYPE_FEE_MARKET, TX_TYPE_LEGACY};
use crate::helpers::{int_to_hex, parse_hex_quantity};
use crate::{prelude::*, Error};
use ethers::types::transaction::eip2930::AccessList;
use ethers::types::U256;
use serde::{Deserialize, Serialize};

/// Who supplied the fee fields that are currently active on a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum GasFeesSource {
    User,
    Dapp,
    Frame,
}

/// A transaction request as submitted by a dapp, all quantities hex-encoded.
///
/// Either `gas_price` (types 0 and 1) or the `max_fee_per_gas` /
/// `max_priority_fee_per_gas` pair (type 2) carries the fee.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    pub chain_id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(alias = "gas", default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_list: Option<AccessList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_fees_source: Option<GasFeesSource>,
}

/// EIP-2718 transaction envelope type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxType {
    Legacy,
    AccessList,
    FeeMarket,
}

impl TxType {
    pub fn from_id(id: u64) -> Option<Self> {
        match id {
            TX_TYPE_LEGACY => Some(TxType::Legacy),
            TX_TYPE_ACCESS_LIST => Some(TxType::AccessList),
            TX_TYPE_FEE_MARKET => Some(TxType::FeeMarket),
            _ => None,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            TxType::Legacy => TX_TYPE_LEGACY,
            TxType::AccessList => TX_TYPE_ACCESS_LIST,
            TxType::FeeMarket => TX_TYPE_FEE_MARKET,
        }
    }

    pub fn to_hex(&self) -> String {
        int_to_hex(U256::from(self.id()))
    }

    pub fn supports_base_fee(&self) -> bool {
        matches!(self, TxType::FeeMarket)
    }
}

impl TransactionData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parsed chain id; decimal strings are accepted alongside hex.
    pub fn chain_id(&self) -> Result<u64> {
        let raw = self.chain_id.trim();
        let parsed = if raw.starts_with("0x") || raw.starts_with("0X") {
            parse_hex_quantity(raw).filter(|id| id.bits() <= 64).map(|id| id.as_u64())
        } else {
            raw.parse().ok()
        };
        parsed.ok_or_else(|| Error::parse("chainId", &self.chain_id))
    }

    /// The envelope type; an absent `type` means legacy.
    pub fn tx_type(&self) -> Result<TxType> {
        let Some(raw) = self.tx_type.as_deref() else {
            return Ok(TxType::Legacy);
        };
        parse_hex_quantity(raw)
            .filter(|id| id.bits() <= 64)
            .and_then(|id| TxType::from_id(id.as_u64()))
            .ok_or_else(|| Error::parse("type", raw))
    }

    /// True only for a well-formed type 2 transaction.
    pub fn uses_base_fee(&self) -> bool {
        matches!(self.tx_type(), Ok(TxType::FeeMarket))
    }
}
