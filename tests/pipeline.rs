use ethers::signers::{LocalWallet, Signer};
use ethers::types::transaction::eip2718::TypedTransaction;
use frame_tx::{
    classify_transaction, london_to_legacy, populate, sign, signer_compatibility, AppVersion,
    ChainRegistry, ChainRuleset, Error, FeeMarketEstimate, Gas, GasFeesSource, GasPriceLevels,
    Hardfork, RawSignature, RecipientType, SignerSummary, SignerType, TransactionData,
    TransactionRequest, TxClassification, TxFormat, WalletSigner,
};
use std::time::Duration;

/// Test data builders
mod test_data {
    use super::*;

    // Key was randomly generated for testing and shouldn't be used with any real funds
    pub const TEST_KEY: &str = "e908f86dbb4d55ac876378565aafeabc187f6690f046459397b17d9b9a19688e";
    pub const RECIPIENT: &str = "0x6635f83421bf059cd8111f180f0727128685bae4";

    pub fn dapp_request() -> TransactionData {
        TransactionData {
            chain_id: "0x1".to_string(),
            nonce: Some("0x3".to_string()),
            to: Some(RECIPIENT.to_string()),
            value: Some("0x2386f26fc10000".to_string()),
            data: Some("0x".to_string()),
            gas_limit: Some("0x5208".to_string()),
            ..Default::default()
        }
    }

    pub fn levels() -> GasPriceLevels {
        GasPriceLevels {
            slow: Some("0x2540be400".to_string()),
            standard: Some("0x37e11d600".to_string()),
            fast: Some("0x4a817c800".to_string()),
            ..Default::default()
        }
    }

    pub fn fee_market_gas() -> Gas {
        // base fee 100 gwei, tip 2 gwei
        Gas::legacy(levels()).with_fees(FeeMarketEstimate::new("0x174876e800", "0x77359400"))
    }

    pub fn london() -> ChainRuleset {
        ChainRuleset::new(1, Hardfork::London)
    }

    pub fn wallet() -> LocalWallet {
        TEST_KEY.parse().unwrap()
    }
}

/// Fee population properties
mod populate_tests {
    use super::*;

    #[test]
    fn legacy_chains_never_get_fee_market_fields() {
        for (hardfork, expected_type) in [(Hardfork::Istanbul, "0x0"), (Hardfork::Berlin, "0x1")] {
            let ruleset = ChainRuleset::new(1, hardfork);
            let tx = populate(&test_data::dapp_request(), &ruleset, &test_data::fee_market_gas())
                .unwrap();
            assert_eq!(tx.tx_type.as_deref(), Some(expected_type));
            assert_eq!(tx.gas_price.as_deref(), Some("0x4a817c800"));
            assert_eq!(tx.gas_fees_source, Some(GasFeesSource::Frame));
            assert!(tx.max_fee_per_gas.is_none());
            assert!(tx.max_priority_fee_per_gas.is_none());
        }
    }

    #[test]
    fn fee_market_fields_are_synthesized_exactly() {
        let tx = populate(
            &test_data::dapp_request(),
            &test_data::london(),
            &test_data::fee_market_gas(),
        )
        .unwrap();
        assert_eq!(tx.tx_type.as_deref(), Some("0x2"));
        assert_eq!(tx.gas_fees_source, Some(GasFeesSource::Frame));
        assert_eq!(tx.max_priority_fee_per_gas.as_deref(), Some("0x77359400"));
        assert_eq!(tx.max_fee_per_gas.as_deref(), Some("0x17bfac7c00"));
    }

    #[test]
    fn sum_does_not_lose_precision_on_large_values() {
        // 2^70 + 2^70 + 1 overflows f64's 53 bit mantissa
        let gas = Gas::legacy(test_data::levels()).with_fees(FeeMarketEstimate::new(
            "0x400000000000000000",
            "0x400000000000000001",
        ));
        let tx = populate(&test_data::dapp_request(), &test_data::london(), &gas).unwrap();
        assert_eq!(tx.max_fee_per_gas.as_deref(), Some("0x800000000000000001"));
    }

    #[test]
    fn dapp_supplied_fee_market_fields_pass_through() {
        let mut raw = test_data::dapp_request();
        raw.tx_type = Some("0x2".to_string());
        raw.max_fee_per_gas = Some("0x1".to_string());
        raw.max_priority_fee_per_gas = Some("0x1".to_string());
        raw.gas_fees_source = Some(GasFeesSource::Dapp);

        let tx = populate(&raw, &test_data::london(), &test_data::fee_market_gas()).unwrap();
        assert_eq!(tx, raw);
    }
}

/// Signer compatibility and downgrade
mod compatibility_tests {
    use super::*;

    #[test]
    fn old_ledger_gets_a_legacy_transaction() {
        let populated = populate(
            &test_data::dapp_request(),
            &test_data::london(),
            &test_data::fee_market_gas(),
        )
        .unwrap();
        let ledger = SignerSummary::new(SignerType::Ledger, AppVersion::new(1, 8, 0));

        let compatibility = signer_compatibility(&populated, &ledger);
        assert_eq!(compatibility.tx, TxFormat::London);
        assert!(!compatibility.compatible);

        let legacy = london_to_legacy(&populated);
        assert_eq!(legacy.tx_type.as_deref(), Some("0x0"));
        assert_eq!(legacy.gas_price, populated.max_fee_per_gas);
        assert!(legacy.max_fee_per_gas.is_none());
        assert!(legacy.max_priority_fee_per_gas.is_none());
        assert!(signer_compatibility(&legacy, &ledger).compatible);
    }

    #[test]
    fn downgrade_matches_documented_example() {
        let tx = TransactionData {
            chain_id: "0x1".to_string(),
            tx_type: Some("0x2".to_string()),
            max_fee_per_gas: Some("0x64".to_string()),
            max_priority_fee_per_gas: Some("0x5".to_string()),
            ..Default::default()
        };
        let json = london_to_legacy(&tx).to_json().unwrap();
        assert_eq!(json, r#"{"chainId":"0x1","type":"0x0","gasPrice":"0x64"}"#);
    }
}

/// Intent classification
mod classification_tests {
    use super::*;

    fn classify(to: Option<&str>, data: &str, recipient: RecipientType) -> TxClassification {
        let params = TransactionData {
            chain_id: "0x1".to_string(),
            to: to.map(str::to_string),
            data: Some(data.to_string()),
            ..Default::default()
        };
        classify_transaction(&TransactionRequest::new(params, Some(recipient)))
    }

    #[test]
    fn classifies_each_intent() {
        let to = Some(test_data::RECIPIENT);
        assert_eq!(
            classify(None, "0xabcd", RecipientType::External),
            TxClassification::ContractDeploy
        );
        assert_eq!(
            classify(to, "0xabcd", RecipientType::External),
            TxClassification::SendData
        );
        assert_eq!(
            classify(to, "0xabcd", RecipientType::Contract),
            TxClassification::ContractCall
        );
        assert_eq!(
            classify(to, "0x", RecipientType::Contract),
            TxClassification::NativeTransfer
        );
    }

    #[test]
    fn classifies_json_requests() {
        let request: TransactionRequest = serde_json::from_str(&format!(
            r#"{{"params":{{"chainId":"0x1","to":"{}","data":"0xa9059cbb"}},"recipientType":"contract"}}"#,
            test_data::RECIPIENT
        ))
        .unwrap();
        assert_eq!(request.classify(), TxClassification::ContractCall);
    }
}

/// End-to-end signing
mod signing_tests {
    use super::*;

    #[tokio::test]
    async fn populate_then_sign_with_software_keystore() {
        let signer = WalletSigner::new(test_data::wallet());
        let mut request = test_data::dapp_request();
        request.from = Some(format!("{:?}", signer.address()));

        let populated =
            populate(&request, &test_data::london(), &test_data::fee_market_gas()).unwrap();
        let signed = sign(&populated, &ChainRegistry::new(), &signer)
            .unwrap()
            .await
            .unwrap();

        assert_eq!(signed.from(), signer.address());
        assert_eq!(signed.hardfork, Hardfork::London);
        assert_eq!(signed.data, populated);
        assert!(signed.raw_hex().starts_with("0x02"));
    }

    #[tokio::test]
    async fn accepts_unprefixed_hardware_style_signatures() {
        let wallet = test_data::wallet();
        let expected = wallet.address();
        // Answers like a device: no 0x prefix and v as 27/28.
        let device = move |tx: TypedTransaction| {
            let result = wallet
                .sign_transaction_sync(&tx)
                .map(|sig| {
                    let recovery_id = (sig.v - 35) % 2;
                    RawSignature::new(
                        &format!("{:x}", 27 + recovery_id),
                        &format!("{:x}", sig.r),
                        &format!("{:x}", sig.s),
                    )
                })
                .map_err(|e| Error::SignerFailure(e.to_string()));
            async move { result }
        };

        let legacy = london_to_legacy(
            &populate(
                &test_data::dapp_request(),
                &test_data::london(),
                &test_data::fee_market_gas(),
            )
            .unwrap(),
        );
        let signed = sign(&legacy, &ChainRegistry::new(), &device)
            .unwrap()
            .await
            .unwrap();

        assert_eq!(signed.from(), expected);
        assert_eq!(signed.hardfork, Hardfork::Berlin);
        assert!(signed.raw_signature.v == "0x1b" || signed.raw_signature.v == "0x1c");
        assert!(signed.signature.v == 37 || signed.signature.v == 38);
    }

    #[tokio::test]
    async fn signature_from_another_key_is_rejected() {
        let expected = test_data::wallet().address();
        let other = WalletSigner::new(LocalWallet::new(&mut rand::thread_rng()));

        let mut request = test_data::dapp_request();
        request.from = Some(format!("{expected:?}"));
        let populated =
            populate(&request, &test_data::london(), &test_data::fee_market_gas()).unwrap();

        let result = sign(&populated, &ChainRegistry::new(), &other)
            .unwrap()
            .await;
        assert!(matches!(result, Err(Error::SignatureMerge(_))));
    }

    #[tokio::test]
    async fn signer_rejection_is_surfaced_verbatim() {
        let rejecting = |_tx: TypedTransaction| async {
            Err::<RawSignature, _>(Error::SignerFailure("user rejected on device".to_string()))
        };
        let populated = populate(
            &test_data::dapp_request(),
            &test_data::london(),
            &test_data::fee_market_gas(),
        )
        .unwrap();

        let result = sign(&populated, &ChainRegistry::new(), &rejecting)
            .unwrap()
            .await;
        assert_eq!(
            result.unwrap_err(),
            Error::SignerFailure("user rejected on device".to_string())
        );
    }

    #[tokio::test]
    async fn malformed_signature_is_a_merge_error() {
        let broken = |_tx: TypedTransaction| async {
            Ok::<_, Error>(RawSignature::new("0x1b", "0x0", "0x1"))
        };
        let populated = populate(
            &test_data::dapp_request(),
            &test_data::london(),
            &test_data::fee_market_gas(),
        )
        .unwrap();

        let result = sign(&populated, &ChainRegistry::new(), &broken)
            .unwrap()
            .await;
        assert!(matches!(result, Err(Error::SignatureMerge(_))));
    }

    #[tokio::test]
    async fn callers_can_time_out_an_unresponsive_device() {
        let unresponsive = |_tx: TypedTransaction| {
            futures_util::future::pending::<frame_tx::prelude::Result<RawSignature>>()
        };
        let populated = populate(
            &test_data::dapp_request(),
            &test_data::london(),
            &test_data::fee_market_gas(),
        )
        .unwrap();

        let pending = sign(&populated, &ChainRegistry::new(), &unresponsive).unwrap();
        let outcome = tokio::time::timeout(Duration::from_millis(50), pending).await;
        assert!(outcome.is_err());

        // the same request can be retried after the abandoned attempt
        let signer = WalletSigner::new(test_data::wallet());
        let signed = sign(&populated, &ChainRegistry::new(), &signer)
            .unwrap()
            .await
            .unwrap();
        assert_eq!(signed.data, populated);
    }
}
