use frame_tx::prelude::Result;
use frame_tx::{
    classify_transaction, exceeds_max_fee, london_to_legacy, populate, sign, signer_compatibility,
    AppVersion, ChainRegistry, FeeMarketEstimate, Gas, GasPriceLevels, RecipientType,
    RulesetResolver, SignedTransaction, SignerSummary, SignerType, TransactionData,
    TransactionRequest, WalletSigner,
};
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let registry = ChainRegistry::from_env()?;
    // Key was randomly generated for testing and shouldn't be used with any real funds
    let signer = WalletSigner::from_private_key(
        "e908f86dbb4d55ac876378565aafeabc187f6690f046459397b17d9b9a19688e",
    )?;

    // A dapp asks for a plain ETH transfer without any fee fields
    let request = TransactionData::from_json(
        r#"{
            "chainId": "0x1",
            "nonce": "0x0",
            "to": "0x6635f83421bf059cd8111f180f0727128685bae4",
            "value": "0x2386f26fc10000",
            "data": "0x",
            "gas": "0x5208"
        }"#,
    )?;

    let classification = classify_transaction(&TransactionRequest::new(
        request.clone(),
        Some(RecipientType::External),
    ));
    println!("📝 Request classified as {classification:?}");

    // Snapshot as the gas tracker would hand it over: 30 gwei base fee, 1.5 gwei tip
    let gas = Gas::legacy(GasPriceLevels {
        slow: Some("0x6fc23ac00".to_string()),
        standard: Some("0x8bb2c9700".to_string()),
        fast: Some("0xba43b7400".to_string()),
        ..Default::default()
    })
    .with_fees(FeeMarketEstimate::new("0x6fc23ac00", "0x59682f00"));

    let ruleset = registry.resolve(request.chain_id()?, "london")?;
    let populated = populate(&request, &ruleset, &gas)?;
    println!("⛽ Populated: {}", populated.to_json()?);
    if exceeds_max_fee(&populated)? {
        println!("⚠️  Fee exceeds the chain's maximum");
    }

    for summary in [
        SignerSummary::new(SignerType::Ledger, AppVersion::new(1, 8, 0)),
        SignerSummary::new(SignerType::Trezor, AppVersion::new(1, 10, 4)).with_model("Trezor One"),
        SignerSummary::new(SignerType::Seed, AppVersion::default()),
    ] {
        let compatibility = signer_compatibility(&populated, &summary);
        let tx = if compatibility.compatible {
            populated.clone()
        } else {
            info!(
                "{} cannot sign {:?} transactions, downgrading",
                summary.signer_type, compatibility.tx
            );
            london_to_legacy(&populated)
        };
        println!(
            "\n🔐 {} v{}: compatible={} → type {}",
            summary.signer_type,
            summary.app_version,
            compatibility.compatible,
            tx.tx_type.as_deref().unwrap_or("0x0")
        );

        // Every summary signs with the same software key here; a real wallet
        // would route to the device matching the summary.
        let pending = sign(&tx, &registry, &signer)?;
        println!("  Sighash: {:?}", pending.sighash);
        let signed = pending.await?;
        print_signed(&signed);
    }

    Ok(())
}

fn print_signed(signed: &SignedTransaction) {
    println!("  Hardfork: {}", signed.hardfork);
    println!("  From: {:?}", signed.from());
    println!("  Hash: {:?}", signed.hash());
    println!(
        "  Signature: v={} r={} s={}",
        signed.raw_signature.v, signed.raw_signature.r, signed.raw_signature.s
    );
    println!("  Raw: {}", signed.raw_hex());
}
