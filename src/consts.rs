/// EIP-1559: fee market change (london).
pub const EIP_FEE_MARKET: u64 = 1559;
/// EIP-2930: optional access lists (berlin).
pub const EIP_ACCESS_LIST: u64 = 2930;
/// EIP-155: replay protection.
pub const EIP_REPLAY_PROTECTION: u64 = 155;

pub const HARDFORK_LONDON: &str = "london";
pub const HARDFORK_BERLIN: &str = "berlin";

pub const TX_TYPE_LEGACY: u64 = 0;
pub const TX_TYPE_ACCESS_LIST: u64 = 1;
pub const TX_TYPE_FEE_MARKET: u64 = 2;

pub const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

/// Chains whose fees are paid in ETH; capped at 2 ETH per transaction.
pub const ETHER_FEE_CHAINS: [u64; 13] = [1, 3, 4, 5, 6, 10, 42, 61, 62, 63, 69, 42161, 421611];
pub const ETHER_FEE_CAP: u64 = 2;

/// Fantom mainnet and testnet; capped at 250 FTM.
pub const FANTOM_FEE_CHAINS: [u64; 2] = [250, 4002];
pub const FANTOM_FEE_CAP: u64 = 250;

pub const DEFAULT_FEE_CAP: u64 = 10;

pub const CUSTOM_CHAIN_IDS_ENV: &str = "CUSTOM_CHAIN_IDS";
pub const CUSTOM_CHAIN_HARDFORK_ENV: &str = "CUSTOM_CHAIN_HARDFORK";
