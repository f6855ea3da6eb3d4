use super::{TransactionData, TxType};
use log::debug;

/// Projects a type 2 transaction onto the legacy envelope for signers that
/// cannot produce fee-market transactions: `gasPrice` takes the old
/// `maxFeePerGas` and both fee-market fields are dropped. Anything else is
/// returned as is.
pub fn london_to_legacy(raw_tx: &TransactionData) -> TransactionData {
    if !raw_tx.uses_base_fee() {
        return raw_tx.clone();
    }

    debug!(
        "Downgrading fee-market transaction on chain {} to legacy",
        raw_tx.chain_id
    );
    let mut tx = raw_tx.clone();
    tx.tx_type = Some(TxType::Legacy.to_hex());
    tx.gas_price = tx.max_fee_per_gas.take();
    tx.max_priority_fee_per_gas = None;
    tx
}
