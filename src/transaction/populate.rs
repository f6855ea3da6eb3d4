use super::{GasFeesSource, TransactionData, TxType};
use crate::chain::Ruleset;
use crate::consts::{EIP_ACCESS_LIST, EIP_FEE_MARKET};
use crate::gas::Gas;
use crate::helpers::{int_to_hex, is_hex_quantity, parse_hex_quantity};
use crate::{prelude::*, Error};
use log::debug;

/// Normalizes the transaction type and fills missing fee fields from the gas
/// snapshot.
///
/// Without fee-market support on the chain (or without a fee-market estimate in
/// the snapshot) the result is a legacy-family transaction priced at the
/// snapshot's `fast` level unless the dapp supplied a usable `gasPrice`.
/// Otherwise the result is a type 2 transaction; a request that already carries
/// both fee-market fields is returned untouched.
///
/// Fee fields synthesized here are marked [`GasFeesSource::Frame`] when the
/// dapp supplied none of them. A field that must be synthesized but has no
/// snapshot value to fall back on is a [`Error::GenericParse`].
pub fn populate<R: Ruleset + ?Sized>(
    raw_tx: &TransactionData,
    ruleset: &R,
    gas: &Gas,
) -> Result<TransactionData> {
    let mut tx = raw_tx.clone();

    let fees = match gas.fees() {
        Some(fees) if ruleset.is_activated_eip(EIP_FEE_MARKET) => fees,
        _ => {
            let tx_type = if ruleset.is_activated_eip(EIP_ACCESS_LIST) {
                TxType::AccessList
            } else {
                TxType::Legacy
            };
            tx.tx_type = Some(tx_type.to_hex());

            if !is_hex_quantity(raw_tx.gas_price.as_deref()) {
                let gas_price = gas.fast_price()?;
                debug!(
                    "No usable gasPrice on chain {}, using fast level {gas_price}",
                    raw_tx.chain_id
                );
                tx.gas_price = Some(int_to_hex(gas_price));
                tx.gas_fees_source = Some(GasFeesSource::Frame);
            }
            return Ok(tx);
        }
    };

    let max_fee_missing = !is_hex_quantity(raw_tx.max_fee_per_gas.as_deref());
    let priority_fee_missing = !is_hex_quantity(raw_tx.max_priority_fee_per_gas.as_deref());

    if !max_fee_missing && !priority_fee_missing {
        return Ok(raw_tx.clone());
    }

    tx.tx_type = Some(TxType::FeeMarket.to_hex());
    if max_fee_missing && priority_fee_missing {
        tx.gas_fees_source = Some(GasFeesSource::Frame);
    }

    let snapshot_priority_fee = if priority_fee_missing {
        fees.max_priority_fee()?
    } else {
        None
    };
    let priority_fee = snapshot_priority_fee.or_else(|| {
        raw_tx
            .max_priority_fee_per_gas
            .as_deref()
            .and_then(parse_hex_quantity)
    });

    if max_fee_missing {
        if let Some(max_base_fee) = fees.max_base_fee()? {
            let priority_fee = priority_fee.ok_or_else(|| {
                missing("maxPriorityFeePerGas", raw_tx.max_priority_fee_per_gas.as_deref())
            })?;
            let max_fee = priority_fee
                .checked_add(max_base_fee)
                .ok_or_else(|| Error::parse("maxFeePerGas", "overflow"))?;
            debug!("Computed maxFeePerGas {max_fee} = {priority_fee} + {max_base_fee}");
            tx.max_fee_per_gas = Some(int_to_hex(max_fee));
        }
    }

    if priority_fee_missing {
        let priority_fee = priority_fee.ok_or_else(|| {
            missing("maxPriorityFeePerGas", raw_tx.max_priority_fee_per_gas.as_deref())
        })?;
        debug!("Using snapshot maxPriorityFeePerGas {priority_fee}");
        tx.max_priority_fee_per_gas = Some(int_to_hex(priority_fee));
    }

    if !is_hex_quantity(tx.max_fee_per_gas.as_deref()) {
        return Err(missing("maxFeePerGas", raw_tx.max_fee_per_gas.as_deref()));
    }

    Ok(tx)
}

fn missing(field: &str, value: Option<&str>) -> Error {
    Error::parse(field, value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainRuleset, Hardfork};
    use crate::gas::{FeeMarketEstimate, GasPriceLevels};

    fn levels() -> GasPriceLevels {
        GasPriceLevels {
            slow: Some("0x2540be400".to_string()),
            standard: Some("0x3b9aca000".to_string()),
            fast: Some("0x4a817c800".to_string()),
            ..Default::default()
        }
    }

    fn fee_market_gas() -> Gas {
        Gas::legacy(levels()).with_fees(FeeMarketEstimate::new("0x174876e800", "0x3b9aca00"))
    }

    fn request() -> TransactionData {
        TransactionData {
            chain_id: "0x1".to_string(),
            to: Some("0x6635f83421bf059cd8111f180f0727128685bae4".to_string()),
            value: Some("0x0".to_string()),
            gas_limit: Some("0x5208".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn pre_berlin_chain_gets_type_zero_and_fast_price() {
        let ruleset = ChainRuleset::new(1, Hardfork::Istanbul);
        let tx = populate(&request(), &ruleset, &fee_market_gas()).unwrap();
        assert_eq!(tx.tx_type.as_deref(), Some("0x0"));
        assert_eq!(tx.gas_price.as_deref(), Some("0x4a817c800"));
        assert_eq!(tx.gas_fees_source, Some(GasFeesSource::Frame));
        assert_eq!(tx.max_fee_per_gas, None);
        assert_eq!(tx.max_priority_fee_per_gas, None);
    }

    #[test]
    fn berlin_chain_gets_type_one_and_keeps_dapp_price() {
        let ruleset = ChainRuleset::new(1, Hardfork::Berlin);
        let mut raw = request();
        raw.gas_price = Some("0x3b9aca00".to_string());
        raw.gas_fees_source = Some(GasFeesSource::Dapp);

        let tx = populate(&raw, &ruleset, &fee_market_gas()).unwrap();
        assert_eq!(tx.tx_type.as_deref(), Some("0x1"));
        assert_eq!(tx.gas_price.as_deref(), Some("0x3b9aca00"));
        assert_eq!(tx.gas_fees_source, Some(GasFeesSource::Dapp));
    }

    #[test]
    fn london_chain_without_fee_estimate_stays_legacy() {
        let ruleset = ChainRuleset::new(1, Hardfork::London);
        let mut raw = request();
        raw.gas_price = Some("not hex".to_string());

        let tx = populate(&raw, &ruleset, &Gas::legacy(levels())).unwrap();
        assert_eq!(tx.tx_type.as_deref(), Some("0x1"));
        assert_eq!(tx.gas_price.as_deref(), Some("0x4a817c800"));
        assert_eq!(tx.gas_fees_source, Some(GasFeesSource::Frame));
        assert_eq!(tx.max_fee_per_gas, None);
    }

    #[test]
    fn legacy_branch_without_fast_level_is_a_parse_error() {
        let ruleset = ChainRuleset::new(1, Hardfork::Berlin);
        let result = populate(&request(), &ruleset, &Gas::default());
        assert!(matches!(result, Err(Error::GenericParse { .. })));
    }

    #[test]
    fn fills_both_fee_market_fields_from_snapshot() {
        let ruleset = ChainRuleset::new(1, Hardfork::London);
        let tx = populate(&request(), &ruleset, &fee_market_gas()).unwrap();
        assert_eq!(tx.tx_type.as_deref(), Some("0x2"));
        assert_eq!(tx.gas_fees_source, Some(GasFeesSource::Frame));
        assert_eq!(tx.max_priority_fee_per_gas.as_deref(), Some("0x3b9aca00"));
        // 1 gwei + 100 gwei
        assert_eq!(tx.max_fee_per_gas.as_deref(), Some("0x178411b200"));
    }

    #[test]
    fn dapp_priority_fee_feeds_computed_max_fee() {
        let ruleset = ChainRuleset::new(1, Hardfork::London);
        let mut raw = request();
        raw.max_priority_fee_per_gas = Some("0x77359400".to_string());
        raw.gas_fees_source = Some(GasFeesSource::Dapp);

        let tx = populate(&raw, &ruleset, &fee_market_gas()).unwrap();
        assert_eq!(tx.max_priority_fee_per_gas.as_deref(), Some("0x77359400"));
        // 2 gwei + 100 gwei
        assert_eq!(tx.max_fee_per_gas.as_deref(), Some("0x17bfac7c00"));
        assert_eq!(tx.gas_fees_source, Some(GasFeesSource::Dapp));
    }

    #[test]
    fn snapshot_priority_fee_is_ignored_when_dapp_supplies_one() {
        let ruleset = ChainRuleset::new(1, Hardfork::London);
        let gas = Gas::legacy(levels()).with_fees(FeeMarketEstimate::new("0x10", "garbage"));
        let mut raw = request();
        raw.max_priority_fee_per_gas = Some("0x2".to_string());

        let tx = populate(&raw, &ruleset, &gas).unwrap();
        assert_eq!(tx.max_fee_per_gas.as_deref(), Some("0x12"));
        assert_eq!(tx.max_priority_fee_per_gas.as_deref(), Some("0x2"));
    }

    #[test]
    fn dapp_max_fee_is_kept_when_only_priority_is_missing() {
        let ruleset = ChainRuleset::new(1, Hardfork::London);
        let mut raw = request();
        raw.max_fee_per_gas = Some("0x2540be400".to_string());

        let tx = populate(&raw, &ruleset, &fee_market_gas()).unwrap();
        assert_eq!(tx.max_fee_per_gas.as_deref(), Some("0x2540be400"));
        assert_eq!(tx.max_priority_fee_per_gas.as_deref(), Some("0x3b9aca00"));
        assert_eq!(tx.gas_fees_source, None);
    }

    #[test]
    fn both_dapp_fee_fields_return_request_unchanged() {
        let ruleset = ChainRuleset::new(1, Hardfork::London);
        let mut raw = request();
        raw.tx_type = Some("0x2".to_string());
        raw.max_fee_per_gas = Some("0x2540be400".to_string());
        raw.max_priority_fee_per_gas = Some("0x1".to_string());
        raw.gas_fees_source = Some(GasFeesSource::Dapp);

        assert_eq!(populate(&raw, &ruleset, &fee_market_gas()).unwrap(), raw);
    }

    #[test]
    fn uncomputable_max_fee_is_a_parse_error() {
        let ruleset = ChainRuleset::new(1, Hardfork::London);
        let gas = Gas::legacy(levels()).with_fees(FeeMarketEstimate {
            max_base_fee_per_gas: None,
            max_priority_fee_per_gas: Some("0x1".to_string()),
        });
        assert!(matches!(
            populate(&request(), &ruleset, &gas),
            Err(Error::GenericParse { .. })
        ));
    }

    #[test]
    fn populate_is_idempotent_once_filled() {
        let ruleset = ChainRuleset::new(1, Hardfork::London);
        let gas = fee_market_gas();
        let once = populate(&request(), &ruleset, &gas).unwrap();
        let twice = populate(&once, &ruleset, &gas).unwrap();
        assert_eq!(once, twice);
    }
}
