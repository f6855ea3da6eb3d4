//! Transaction core for a multi-signer EVM wallet.
//!
//! A dapp request flows through [`populate`] (type and fee fields filled from
//! the gas snapshot), optionally [`london_to_legacy`] when the chosen signer
//! cannot produce fee-market transactions (see [`signer_compatibility`]), and
//! finally [`sign`], which hands the built transaction to an external signer
//! and validates what comes back. [`classify_transaction`] labels the intent
//! of the original request independently of that pipeline.

pub mod chain;
mod consts;
mod errors;
pub mod gas;
mod helpers;
pub mod prelude;
pub mod signer;
pub mod transaction;

pub use chain::{ChainRegistry, ChainRuleset, Hardfork, Ruleset, RulesetResolver};
pub use consts::{EIP_ACCESS_LIST, EIP_FEE_MARKET, EIP_REPLAY_PROTECTION};
pub use errors::Error;
pub use gas::{FeeMarketEstimate, Gas, GasPrice, GasPriceLevels};
pub use helpers::{add_hex_prefix, int_to_hex, is_hex_quantity, parse_hex_quantity};
pub use signer::{
    signer_compatibility, supports_fee_market, AppVersion, ExternalSigner, RawSignature,
    SignerCompatibility, SignerSummary, SignerType, TxFormat, WalletSigner,
};
pub use transaction::{
    build_transaction, classify_transaction, exceeds_max_fee, london_to_legacy, max_fee, populate,
    sign, total_fee, GasFeesSource, PendingSignature, RecipientType, SignedTransaction,
    TransactionData, TransactionRequest, TxClassification, TxType,
};
