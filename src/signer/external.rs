use crate::helpers::{add_hex_prefix, int_to_hex, require_hex_quantity};
use crate::{prelude::*, Error};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Signature, U256};
use futures_util::future::{self, BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Signature components as returned by a signing device. Devices are not
/// consistent about the `0x` prefix, so use [`RawSignature::normalized`]
/// before reading them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawSignature {
    pub v: String,
    pub r: String,
    pub s: String,
}

impl RawSignature {
    pub fn new(v: &str, r: &str, s: &str) -> Self {
        Self {
            v: v.to_string(),
            r: r.to_string(),
            s: s.to_string(),
        }
    }

    pub fn normalized(&self) -> Self {
        Self {
            v: add_hex_prefix(self.v.trim()),
            r: add_hex_prefix(self.r.trim()),
            s: add_hex_prefix(self.s.trim()),
        }
    }

    /// Parses the components; `v` is returned as sent, without normalization.
    pub(crate) fn components(&self) -> Result<(u64, U256, U256)> {
        let normalized = self.normalized();
        let merge_err = |e: Error| Error::SignatureMerge(e.to_string());
        let v = require_hex_quantity("v", &normalized.v).map_err(merge_err)?;
        let r = require_hex_quantity("r", &normalized.r).map_err(merge_err)?;
        let s = require_hex_quantity("s", &normalized.s).map_err(merge_err)?;
        if v.bits() > 64 {
            return Err(Error::SignatureMerge(format!("v {} is out of range", normalized.v)));
        }
        Ok((v.as_u64(), r, s))
    }
}

impl From<Signature> for RawSignature {
    fn from(signature: Signature) -> Self {
        Self {
            v: int_to_hex(U256::from(signature.v)),
            r: int_to_hex(signature.r),
            s: int_to_hex(signature.s),
        }
    }
}

/// Capability that asks a signing device to sign a built transaction.
///
/// The returned future may wait on a human confirming on hardware, so it can
/// take arbitrarily long; callers impose their own timeout and may drop it.
pub trait ExternalSigner {
    fn sign_transaction(&self, tx: TypedTransaction) -> BoxFuture<'static, Result<RawSignature>>;
}

impl<F, Fut> ExternalSigner for F
where
    F: Fn(TypedTransaction) -> Fut,
    Fut: Future<Output = Result<RawSignature>> + Send + 'static,
{
    fn sign_transaction(&self, tx: TypedTransaction) -> BoxFuture<'static, Result<RawSignature>> {
        self(tx).boxed()
    }
}

/// Software keystore signer backed by a local private key.
#[derive(Debug, Clone)]
pub struct WalletSigner {
    wallet: LocalWallet,
}

impl WalletSigner {
    pub fn new(wallet: LocalWallet) -> Self {
        Self { wallet }
    }

    pub fn from_private_key(key: &str) -> Result<Self> {
        let wallet = key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| Error::Wallet(e.to_string()))?;
        Ok(Self::new(wallet))
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

impl ExternalSigner for WalletSigner {
    fn sign_transaction(&self, tx: TypedTransaction) -> BoxFuture<'static, Result<RawSignature>> {
        let result = self
            .wallet
            .sign_transaction_sync(&tx)
            .map(RawSignature::from)
            .map_err(|e| Error::SignerFailure(e.to_string()));
        future::ready(result).boxed()
    }
}
