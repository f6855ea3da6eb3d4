use super::{ChainRuleset, Hardfork, RulesetResolver};
use crate::consts::{CUSTOM_CHAIN_HARDFORK_ENV, CUSTOM_CHAIN_IDS_ENV};
use crate::helpers::parse_hex_quantity;
use crate::{prelude::*, Error};
use lazy_static::lazy_static;
use log::debug;
use std::collections::HashMap;
use std::env;

lazy_static! {
    /// Chains with published hardfork schedules, with the newest hardfork each reached.
    static ref BUILTIN_CHAINS: HashMap<u64, Hardfork> = HashMap::from([
        (1, Hardfork::Shanghai),
        (3, Hardfork::Merge),
        (4, Hardfork::London),
        (5, Hardfork::Shanghai),
        (42, Hardfork::London),
        (11155111, Hardfork::Shanghai),
    ]);
}

/// Default [`RulesetResolver`]: the built-in chains plus any registered custom chains.
#[derive(Debug, Clone)]
pub struct ChainRegistry {
    chains: HashMap<u64, Hardfork>,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self {
            chains: BUILTIN_CHAINS.clone(),
        }
    }
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a chain, supporting every hardfork up to and including `newest`.
    pub fn with_chain(mut self, chain_id: u64, newest: Hardfork) -> Self {
        self.chains.insert(chain_id, newest);
        self
    }

    /// Built-in chains plus `CUSTOM_CHAIN_IDS` (comma separated, decimal or
    /// `0x` hex), each capped at `CUSTOM_CHAIN_HARDFORK` (default london).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let newest = match env::var(CUSTOM_CHAIN_HARDFORK_ENV) {
            Ok(name) => name
                .parse::<Hardfork>()
                .map_err(|e| Error::Config(format!("{CUSTOM_CHAIN_HARDFORK_ENV}: {e}")))?,
            Err(_) => Hardfork::London,
        };

        let mut registry = Self::default();
        if let Ok(ids) = env::var(CUSTOM_CHAIN_IDS_ENV) {
            for id in ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                let chain_id = parse_chain_id(id).ok_or_else(|| {
                    Error::Config(format!("{CUSTOM_CHAIN_IDS_ENV}: invalid chain id {id:?}"))
                })?;
                debug!("Registering custom chain {chain_id} up to {newest}");
                registry = registry.with_chain(chain_id, newest);
            }
        }
        Ok(registry)
    }

    pub fn supports(&self, chain_id: u64) -> bool {
        self.chains.contains_key(&chain_id)
    }
}

fn parse_chain_id(id: &str) -> Option<u64> {
    if id.starts_with("0x") || id.starts_with("0X") {
        parse_hex_quantity(id).filter(|v| v.bits() <= 64).map(|v| v.as_u64())
    } else {
        id.parse().ok()
    }
}

impl RulesetResolver for ChainRegistry {
    type Ruleset = ChainRuleset;

    fn resolve(&self, chain_id: u64, hardfork: &str) -> Result<ChainRuleset> {
        let newest = self
            .chains
            .get(&chain_id)
            .ok_or_else(|| Error::RulesetResolution(format!("unknown chain id {chain_id}")))?;
        let hardfork: Hardfork = hardfork.parse()?;
        if hardfork > *newest {
            return Err(Error::RulesetResolution(format!(
                "chain {chain_id} does not support hardfork {hardfork} (newest is {newest})"
            )));
        }
        Ok(ChainRuleset::new(chain_id, hardfork))
    }
}
