//! Chain rulesets: which protocol rules are active for a chain at a hardfork.
//!
//! The pipeline only ever asks a ruleset whether an EIP is active, so anything
//! implementing [`RulesetResolver`] can stand in for [`ChainRegistry`].

mod registry;

pub use registry::ChainRegistry;

use crate::consts::{EIP_ACCESS_LIST, EIP_FEE_MARKET, EIP_REPLAY_PROTECTION};
use crate::{prelude::*, Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Active protocol rules for one chain at one hardfork.
pub trait Ruleset {
    fn chain_id(&self) -> u64;
    fn hardfork(&self) -> Hardfork;
    fn is_activated_eip(&self, eip: u64) -> bool;
}

/// Resolves `(chain id, hardfork name)` to a [`Ruleset`].
pub trait RulesetResolver {
    type Ruleset: Ruleset;

    /// Fails with [`Error::RulesetResolution`] for unknown chains or hardforks.
    fn resolve(&self, chain_id: u64, hardfork: &str) -> Result<Self::Ruleset>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Hardfork {
    Chainstart,
    Homestead,
    TangerineWhistle,
    SpuriousDragon,
    Byzantium,
    Constantinople,
    Petersburg,
    Istanbul,
    MuirGlacier,
    Berlin,
    London,
    ArrowGlacier,
    GrayGlacier,
    Merge,
    Shanghai,
}

impl Hardfork {
    pub const ALL: [Hardfork; 15] = [
        Hardfork::Chainstart,
        Hardfork::Homestead,
        Hardfork::TangerineWhistle,
        Hardfork::SpuriousDragon,
        Hardfork::Byzantium,
        Hardfork::Constantinople,
        Hardfork::Petersburg,
        Hardfork::Istanbul,
        Hardfork::MuirGlacier,
        Hardfork::Berlin,
        Hardfork::London,
        Hardfork::ArrowGlacier,
        Hardfork::GrayGlacier,
        Hardfork::Merge,
        Hardfork::Shanghai,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Hardfork::Chainstart => "chainstart",
            Hardfork::Homestead => "homestead",
            Hardfork::TangerineWhistle => "tangerineWhistle",
            Hardfork::SpuriousDragon => "spuriousDragon",
            Hardfork::Byzantium => "byzantium",
            Hardfork::Constantinople => "constantinople",
            Hardfork::Petersburg => "petersburg",
            Hardfork::Istanbul => "istanbul",
            Hardfork::MuirGlacier => "muirGlacier",
            Hardfork::Berlin => "berlin",
            Hardfork::London => "london",
            Hardfork::ArrowGlacier => "arrowGlacier",
            Hardfork::GrayGlacier => "grayGlacier",
            Hardfork::Merge => "merge",
            Hardfork::Shanghai => "shanghai",
        }
    }

    /// Hardfork that introduced a transaction-relevant EIP.
    fn introducing(eip: u64) -> Option<Hardfork> {
        match eip {
            EIP_REPLAY_PROTECTION => Some(Hardfork::SpuriousDragon),
            EIP_ACCESS_LIST | 2718 | 2929 => Some(Hardfork::Berlin),
            EIP_FEE_MARKET | 3198 | 3529 | 3541 => Some(Hardfork::London),
            3675 => Some(Hardfork::Merge),
            3651 | 3855 | 3860 | 4895 => Some(Hardfork::Shanghai),
            _ => None,
        }
    }

    pub fn activates(&self, eip: u64) -> bool {
        Self::introducing(eip).map_or(false, |introduced| *self >= introduced)
    }
}

impl fmt::Display for Hardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Hardfork {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Hardfork::ALL
            .into_iter()
            .find(|h| h.name().eq_ignore_ascii_case(wanted))
            .or(match wanted.to_ascii_lowercase().as_str() {
                "paris" => Some(Hardfork::Merge),
                "frontier" => Some(Hardfork::Chainstart),
                _ => None,
            })
            .ok_or_else(|| Error::RulesetResolution(format!("unknown hardfork {s:?}")))
    }
}

/// A resolved `(chain id, hardfork)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainRuleset {
    pub chain_id: u64,
    pub hardfork: Hardfork,
}

impl ChainRuleset {
    pub fn new(chain_id: u64, hardfork: Hardfork) -> Self {
        Self { chain_id, hardfork }
    }
}

impl Ruleset for ChainRuleset {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn hardfork(&self) -> Hardfork {
        self.hardfork
    }

    fn is_activated_eip(&self, eip: u64) -> bool {
        self.hardfork.activates(eip)
    }
}
