use super::{AppVersion, SignerSummary, SignerType};
use crate::transaction::TransactionData;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxFormat {
    Legacy,
    London,
}

/// Whether a signer can produce a transaction in the format it is being asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignerCompatibility {
    pub signer: SignerType,
    pub tx: TxFormat,
    pub compatible: bool,
}

/// Firmware gate for EIP-1559 support per signer kind.
pub fn supports_fee_market(
    signer_type: SignerType,
    version: AppVersion,
    model: Option<&str>,
) -> bool {
    let AppVersion {
        major,
        minor,
        patch,
    } = version;

    match signer_type {
        SignerType::Seed | SignerType::Ring => true,
        SignerType::Ledger => major >= 2 || (major >= 1 && minor >= 9),
        SignerType::Trezor => {
            let is_trezor_one = model.map_or(false, |m| m.eq_ignore_ascii_case("trezor one"));
            if is_trezor_one {
                major >= 2 || (major >= 1 && (minor > 10 || (minor == 10 && patch >= 4)))
            } else {
                major >= 3
                    || (major == 2 && minor >= 5)
                    || (major == 2 && minor == 4 && patch >= 2)
            }
        }
        // Kept as shipped: any 1.x firmware passes regardless of minor.
        SignerType::Lattice => major >= 1 || minor >= 11,
        SignerType::Aragon | SignerType::Unknown => false,
    }
}

/// Advisory check used by the UI; signing itself never consults it.
pub fn signer_compatibility(tx: &TransactionData, signer: &SignerSummary) -> SignerCompatibility {
    if !tx.uses_base_fee() {
        return SignerCompatibility {
            signer: signer.signer_type,
            tx: TxFormat::Legacy,
            compatible: true,
        };
    }

    let compatible = supports_fee_market(
        signer.signer_type,
        signer.app_version,
        signer.model.as_deref(),
    );
    debug!(
        "Signer {} v{} fee-market compatible: {compatible}",
        signer.signer_type, signer.app_version
    );
    SignerCompatibility {
        signer: signer.signer_type,
        tx: TxFormat::London,
        compatible,
    }
}
