use super::TransactionData;
use crate::helpers::strip_hex_prefix;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxClassification {
    ContractDeploy,
    SendData,
    ContractCall,
    NativeTransfer,
}

/// What the UI layer knows about the destination address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    External,
    Contract,
    #[serde(other)]
    Unknown,
}

/// A transaction request together with the recipient hint supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub params: TransactionData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_type: Option<RecipientType>,
}

impl TransactionRequest {
    pub fn new(params: TransactionData, recipient_type: Option<RecipientType>) -> Self {
        Self {
            params,
            recipient_type,
        }
    }

    pub fn classify(&self) -> TxClassification {
        classify_transaction(self)
    }
}

/// Labels the intent of a request. Deployment wins over everything, and data
/// sent to an external account is checked before contract calls.
pub fn classify_transaction(request: &TransactionRequest) -> TxClassification {
    let params = &request.params;
    let to = params.to.as_deref().map(str::trim).unwrap_or_default();
    if to.is_empty() {
        return TxClassification::ContractDeploy;
    }

    let payload = strip_hex_prefix(params.data.as_deref().unwrap_or("0x"));
    let is_external = request.recipient_type == Some(RecipientType::External);

    if is_external && !payload.is_empty() {
        TxClassification::SendData
    } else if !is_external && payload.chars().any(|c| c != '0') {
        TxClassification::ContractCall
    } else {
        TxClassification::NativeTransfer
    }
}
