use super::{TransactionData, TxType};
use crate::chain::{Hardfork, Ruleset, RulesetResolver};
use crate::consts::{
    EIP_ACCESS_LIST, EIP_FEE_MARKET, EIP_REPLAY_PROTECTION, HARDFORK_BERLIN, HARDFORK_LONDON,
};
use crate::helpers::{decode_hex_bytes, parse_hex_quantity};
use crate::signer::{ExternalSigner, RawSignature};
use crate::{prelude::*, Error};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::transaction::eip2930::Eip2930TransactionRequest;
use ethers::types::{
    Address, Bytes, Eip1559TransactionRequest, NameOrAddress, Signature, TransactionRequest, H256,
    U256, U64,
};
use futures_util::future::BoxFuture;
use log::{debug, info};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A transaction carrying a signature that has been checked against its payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    /// The request fields the signature was merged into.
    pub data: TransactionData,
    /// Signature as returned by the signer, `0x`-prefixed.
    pub raw_signature: RawSignature,
    /// Canonical transaction with `from` set to the recovered signer.
    pub tx: TypedTransaction,
    /// Signature with `v` in the form the envelope encodes.
    pub signature: Signature,
    pub hardfork: Hardfork,
    from: Address,
}

impl SignedTransaction {
    pub fn from(&self) -> Address {
        self.from
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.tx.chain_id().map(|id| id.as_u64())
    }

    /// EIP-2718 encoded bytes ready for `eth_sendRawTransaction`.
    pub fn rlp(&self) -> Bytes {
        self.tx.rlp_signed(&self.signature)
    }

    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(self.rlp()))
    }

    pub fn hash(&self) -> H256 {
        self.tx.hash(&self.signature)
    }
}

/// A signature request handed to an external signer. Resolves once the signer
/// answers and the signature has been merged and re-validated.
///
/// Dropping it abandons the request; nothing outside it is affected.
pub struct PendingSignature {
    /// The transaction given to the signer.
    pub unsigned: TypedTransaction,
    /// Digest the signer is expected to sign.
    pub sighash: H256,
    pub hardfork: Hardfork,
    future: BoxFuture<'static, Result<SignedTransaction>>,
}

impl std::fmt::Debug for PendingSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSignature")
            .field("unsigned", &self.unsigned)
            .field("sighash", &self.sighash)
            .field("hardfork", &self.hardfork)
            .finish_non_exhaustive()
    }
}

impl Future for PendingSignature {
    type Output = Result<SignedTransaction>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

/// Builds the transaction under its chain's ruleset and hands it to `signer`.
///
/// Ruleset resolution and transaction building fail here, before the signer
/// is contacted. The returned [`PendingSignature`] applies no timeout.
pub fn sign<R, S>(raw_tx: &TransactionData, resolver: &R, signer: &S) -> Result<PendingSignature>
where
    R: RulesetResolver,
    R::Ruleset: Send + 'static,
    S: ExternalSigner + ?Sized,
{
    let chain_id = raw_tx.chain_id().map_err(build_error)?;
    let hardfork_name = if raw_tx.uses_base_fee() {
        HARDFORK_LONDON
    } else {
        HARDFORK_BERLIN
    };
    let ruleset = resolver.resolve(chain_id, hardfork_name)?;
    let hardfork = ruleset.hardfork();

    let unsigned = build_transaction(raw_tx, &ruleset)?;
    let sighash = unsigned.sighash();
    info!("Requesting signature for chain {chain_id} ({hardfork}) transaction {sighash:?}");

    let signing = signer.sign_transaction(unsigned.clone());
    let raw_tx = raw_tx.clone();
    let future = Box::pin(async move {
        let raw_signature = signing.await?;
        merge_signature(&raw_tx, &ruleset, raw_signature)
    });

    Ok(PendingSignature {
        unsigned,
        sighash,
        hardfork,
        future,
    })
}

/// Merges a signer's answer into the request and checks that the signature
/// belongs to the rebuilt transaction.
fn merge_signature<R: Ruleset>(
    raw_tx: &TransactionData,
    ruleset: &R,
    raw_signature: RawSignature,
) -> Result<SignedTransaction> {
    let raw_signature = raw_signature.normalized();
    let mut tx = build_transaction(raw_tx, ruleset)
        .map_err(|e| Error::SignatureMerge(e.to_string()))?;
    let tx_type = raw_tx.tx_type().map_err(|e| Error::SignatureMerge(e.to_string()))?;

    let (v, r, s) = raw_signature.components()?;
    if r.is_zero() || s.is_zero() {
        return Err(Error::SignatureMerge("r and s must be non-zero".to_string()));
    }
    let recovery_id = recovery_id(v, ruleset.chain_id())?;
    let v = match tx_type {
        TxType::Legacy if ruleset.is_activated_eip(EIP_REPLAY_PROTECTION) => {
            eip155_v(recovery_id, ruleset.chain_id())?
        }
        // Pre-spuriousDragon rulesets, or resolvers reporting EIP-155 inactive.
        TxType::Legacy => u64::from(recovery_id) + 27,
        TxType::AccessList | TxType::FeeMarket => u64::from(recovery_id),
    };
    let signature = Signature { r, s, v };

    let from = signature
        .recover(tx.sighash())
        .map_err(|e| Error::SignatureMerge(e.to_string()))?;
    if let Some(expected) = raw_tx.from.as_deref() {
        let expected = parse_address("from", expected)
            .map_err(|e| Error::SignatureMerge(e.to_string()))?;
        if expected != from {
            return Err(Error::SignatureMerge(format!(
                "signature recovers to {from:?}, expected {expected:?}"
            )));
        }
    }
    tx.set_from(from);
    debug!("Signature recovered to {from:?}");

    Ok(SignedTransaction {
        data: raw_tx.clone(),
        raw_signature,
        tx,
        signature,
        hardfork: ruleset.hardfork(),
        from,
    })
}

/// Recovery id from a `v` in any of the forms signers return: 0/1, 27/28 or
/// EIP-155 (`chain_id * 2 + 35/36`).
fn recovery_id(v: u64, chain_id: u64) -> Result<u8> {
    match v {
        0 | 1 => Ok(v as u8),
        27 | 28 => Ok((v - 27) as u8),
        v if v >= 35 => {
            let signed_for = (v - 35) / 2;
            if signed_for != chain_id {
                return Err(Error::SignatureMerge(format!(
                    "v {v} was produced for chain {signed_for}, expected {chain_id}"
                )));
            }
            Ok(((v - 35) % 2) as u8)
        }
        v => Err(Error::SignatureMerge(format!("invalid v {v}"))),
    }
}

/// `chain_id * 2 + 35 + recovery_id`; chain ids too large to encode are rejected.
fn eip155_v(recovery_id: u8, chain_id: u64) -> Result<u64> {
    chain_id
        .checked_mul(2)
        .and_then(|v| v.checked_add(35 + u64::from(recovery_id)))
        .ok_or_else(|| {
            Error::SignatureMerge(format!("chain id {chain_id} is too large for an EIP-155 v"))
        })
}

/// Builds the canonical typed transaction for `raw_tx` under `ruleset`.
///
/// Fails on malformed fields, a chain id that differs from the ruleset's, a
/// type the ruleset has not activated, and fee fields that do not match the type.
pub fn build_transaction<R: Ruleset + ?Sized>(
    raw_tx: &TransactionData,
    ruleset: &R,
) -> Result<TypedTransaction> {
    let chain_id = raw_tx.chain_id().map_err(build_error)?;
    if chain_id != ruleset.chain_id() {
        return Err(Error::TransactionBuild(format!(
            "chain id {chain_id} does not match ruleset chain {}",
            ruleset.chain_id()
        )));
    }
    let tx_type = raw_tx.tx_type().map_err(build_error)?;

    let from = raw_tx
        .from
        .as_deref()
        .map(|from| parse_address("from", from))
        .transpose()?;
    let to = match raw_tx.to.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(to) => Some(NameOrAddress::Address(parse_address("to", to)?)),
    };
    let nonce = quantity_or_zero("nonce", raw_tx.nonce.as_deref())?;
    let value = quantity_or_zero("value", raw_tx.value.as_deref())?;
    let gas = quantity_or_zero("gasLimit", raw_tx.gas_limit.as_deref())?;
    let data = match raw_tx.data.as_deref() {
        Some(data) => Bytes::from(decode_hex_bytes("data", data).map_err(build_error)?),
        None => Bytes::default(),
    };
    let access_list = raw_tx.access_list.clone().unwrap_or_default();

    let tx = match tx_type {
        TxType::FeeMarket => {
            require_eip(ruleset, EIP_FEE_MARKET, tx_type)?;
            let max_fee = required_quantity("maxFeePerGas", raw_tx.max_fee_per_gas.as_deref())?;
            let priority_fee = required_quantity(
                "maxPriorityFeePerGas",
                raw_tx.max_priority_fee_per_gas.as_deref(),
            )?;
            if priority_fee > max_fee {
                return Err(Error::TransactionBuild(format!(
                    "maxPriorityFeePerGas {priority_fee} exceeds maxFeePerGas {max_fee}"
                )));
            }

            let mut request = Eip1559TransactionRequest::new();
            request.from = from;
            request.to = to;
            request.gas = Some(gas);
            request.value = Some(value);
            request.data = Some(data);
            request.nonce = Some(nonce);
            request.access_list = access_list;
            request.max_fee_per_gas = Some(max_fee);
            request.max_priority_fee_per_gas = Some(priority_fee);
            request.chain_id = Some(U64::from(chain_id));
            TypedTransaction::Eip1559(request)
        }
        TxType::AccessList | TxType::Legacy => {
            let gas_price = required_quantity("gasPrice", raw_tx.gas_price.as_deref())?;

            let mut request = TransactionRequest::new();
            request.from = from;
            request.to = to;
            request.gas = Some(gas);
            request.gas_price = Some(gas_price);
            request.value = Some(value);
            request.data = Some(data);
            request.nonce = Some(nonce);
            request.chain_id = Some(U64::from(chain_id));

            if tx_type == TxType::AccessList {
                require_eip(ruleset, EIP_ACCESS_LIST, tx_type)?;
                TypedTransaction::Eip2930(Eip2930TransactionRequest::new(request, access_list))
            } else {
                TypedTransaction::Legacy(request)
            }
        }
    };
    Ok(tx)
}

fn require_eip<R: Ruleset + ?Sized>(ruleset: &R, eip: u64, tx_type: TxType) -> Result<()> {
    if ruleset.is_activated_eip(eip) {
        Ok(())
    } else {
        Err(Error::TransactionBuild(format!(
            "type {} transactions need EIP-{eip}, not active at {} on chain {}",
            tx_type.id(),
            ruleset.hardfork(),
            ruleset.chain_id()
        )))
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address> {
    value
        .trim()
        .parse::<Address>()
        .map_err(|_| Error::TransactionBuild(format!("{field} {value:?} is not an address")))
}

fn quantity_or_zero(field: &str, value: Option<&str>) -> Result<U256> {
    match value {
        None => Ok(U256::zero()),
        Some(value) => required_quantity(field, Some(value)),
    }
}

fn required_quantity(field: &str, value: Option<&str>) -> Result<U256> {
    value.and_then(parse_hex_quantity).ok_or_else(|| {
        Error::TransactionBuild(format!(
            "{field} {:?} is not a valid hex quantity",
            value.unwrap_or_default()
        ))
    })
}

fn build_error(e: Error) -> Error {
    match e {
        Error::GenericParse { .. } => Error::TransactionBuild(e.to_string()),
        other => other,
    }
}
