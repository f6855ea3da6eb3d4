use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Failed to parse {field}: {value:?} is not a valid hex quantity")]
    GenericParse { field: String, value: String },
    #[error("Ruleset resolution error: {0}")]
    RulesetResolution(String),
    #[error("Transaction build error: {0}")]
    TransactionBuild(String),
    #[error("Signer failure: {0}")]
    SignerFailure(String),
    #[error("Signature merge error: {0}")]
    SignatureMerge(String),
    #[error("Json parse error {0:?}")]
    JsonParse(String),
    #[error("Wallet error {0:?}")]
    Wallet(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn parse(field: &str, value: &str) -> Self {
        Error::GenericParse {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::JsonParse(e.to_string())
    }
}
