//! Read model of the fee-market snapshot maintained outside this crate.

use crate::helpers::{optional_hex_quantity, require_hex_quantity};
use crate::{prelude::*, Error};
use ethers::types::U256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Gas {
    pub price: GasPrice,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GasPrice {
    pub levels: GasPriceLevels,
    /// Present only once a fee-market estimate has been computed for the chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fees: Option<FeeMarketEstimate>,
}

/// Legacy gas price levels, hex-encoded wei.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GasPriceLevels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeeMarketEstimate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_base_fee_per_gas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<String>,
}

impl Gas {
    /// Snapshot with only legacy price levels.
    pub fn legacy(levels: GasPriceLevels) -> Self {
        Self {
            price: GasPrice { levels, fees: None },
        }
    }

    pub fn with_fees(mut self, fees: FeeMarketEstimate) -> Self {
        self.price.fees = Some(fees);
        self
    }

    pub fn fees(&self) -> Option<&FeeMarketEstimate> {
        self.price.fees.as_ref()
    }

    /// The "fast" level, used when a dapp supplies no usable gas price.
    pub fn fast_price(&self) -> Result<U256> {
        let fast = self
            .price
            .levels
            .fast
            .as_deref()
            .ok_or_else(|| Error::parse("gas.price.levels.fast", ""))?;
        require_hex_quantity("gas.price.levels.fast", fast)
    }
}

impl FeeMarketEstimate {
    pub fn new(max_base_fee_per_gas: &str, max_priority_fee_per_gas: &str) -> Self {
        Self {
            max_base_fee_per_gas: Some(max_base_fee_per_gas.to_string()),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas.to_string()),
        }
    }

    pub fn max_base_fee(&self) -> Result<Option<U256>> {
        optional_hex_quantity(
            "gas.price.fees.maxBaseFeePerGas",
            self.max_base_fee_per_gas.as_deref(),
        )
    }

    pub fn max_priority_fee(&self) -> Result<Option<U256>> {
        optional_hex_quantity(
            "gas.price.fees.maxPriorityFeePerGas",
            self.max_priority_fee_per_gas.as_deref(),
        )
    }
}
