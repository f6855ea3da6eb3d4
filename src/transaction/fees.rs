use super::TransactionData;
use crate::consts::{
    DEFAULT_FEE_CAP, ETHER_FEE_CAP, ETHER_FEE_CHAINS, FANTOM_FEE_CAP, FANTOM_FEE_CHAINS,
    WEI_PER_ETHER,
};
use crate::helpers::require_hex_quantity;
use crate::{prelude::*, Error};
use ethers::types::U256;

/// Upper bound, in wei, the wallet allows a single transaction to spend on fees.
pub fn max_fee(tx: &TransactionData) -> Result<U256> {
    let chain_id = tx.chain_id()?;
    let cap = if ETHER_FEE_CHAINS.contains(&chain_id) {
        ETHER_FEE_CAP
    } else if FANTOM_FEE_CHAINS.contains(&chain_id) {
        FANTOM_FEE_CAP
    } else {
        DEFAULT_FEE_CAP
    };
    Ok(U256::from(cap) * U256::from(WEI_PER_ETHER))
}

/// `gasLimit * maxFeePerGas` for fee-market transactions, `gasLimit * gasPrice` otherwise.
pub fn total_fee(tx: &TransactionData) -> Result<U256> {
    let gas_limit = require_hex_quantity("gasLimit", tx.gas_limit.as_deref().unwrap_or_default())?;
    let per_gas = if tx.uses_base_fee() {
        require_hex_quantity(
            "maxFeePerGas",
            tx.max_fee_per_gas.as_deref().unwrap_or_default(),
        )?
    } else {
        require_hex_quantity("gasPrice", tx.gas_price.as_deref().unwrap_or_default())?
    };
    gas_limit
        .checked_mul(per_gas)
        .ok_or_else(|| Error::parse("gasLimit", "fee overflows 256 bits"))
}

pub fn exceeds_max_fee(tx: &TransactionData) -> Result<bool> {
    Ok(total_fee(tx)? > max_fee(tx)?)
}
