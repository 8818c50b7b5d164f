use anyhow::Context;
use kogebog_core::import::RawImportRecord;
use kogebog_links::{LinkAdmin, LinkCatalog, LinksConfig};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kogebog_admin::command::{Command, USAGE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kogebog_admin=info,kogebog_links=info,kogebog_batch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    // --- Configuration ---
    let config = LinksConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        api_url = %config.api_url,
        delay_ms = config.executor.delay().as_millis() as u64,
        "Loaded link configuration"
    );

    let api = config.http_api().context("Failed to build link API client")?;

    // --- Cancellation ---
    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let output = match command {
        Command::Resolve { ingredients } => {
            let catalog = LinkCatalog::new();
            catalog.refresh(&api).await.context("Failed to load link catalog")?;
            let resolved = catalog.resolve_all(&ingredients).await;
            let rows: Vec<_> = ingredients
                .iter()
                .zip(resolved)
                .map(|(ingredient, mapping_id)| {
                    serde_json::json!({ "ingredient": ingredient, "mapping_id": mapping_id })
                })
                .collect();
            serde_json::to_value(rows)?
        }
        Command::PurchaseLink { country, ingredient } => {
            let catalog = LinkCatalog::new();
            catalog.refresh(&api).await.context("Failed to load link catalog")?;
            serde_json::to_value(catalog.purchase_link(&ingredient, &country).await)?
        }
        Command::DeleteMappings { ids } => {
            let admin = LinkAdmin::new(api, config.executor);
            serde_json::to_value(admin.bulk_delete_mappings(ids, &cancel).await.summary())?
        }
        Command::DeleteSuppliers { ids } => {
            let admin = LinkAdmin::new(api, config.executor);
            serde_json::to_value(admin.bulk_delete_suppliers(ids, &cancel).await.summary())?
        }
        Command::DeleteOptions { ids } => {
            let admin = LinkAdmin::new(api, config.executor);
            serde_json::to_value(admin.bulk_delete_options(ids, &cancel).await.summary())?
        }
        Command::SetOptionStatus { ids, status } => {
            let admin = LinkAdmin::new(api, config.executor);
            let result = admin.bulk_set_option_status(ids, status, &cancel).await;
            serde_json::to_value(result.summary())?
        }
        Command::Import { path } => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let records: Vec<RawImportRecord> = serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            let admin = LinkAdmin::new(api, config.executor);
            serde_json::to_value(admin.bulk_import(&records, &cancel).await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Stop the running batch after the in-flight item when Ctrl-C arrives.
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::warn!("Received SIGINT (Ctrl-C), cancelling remaining items");
            cancel.cancel();
        }
        Err(e) => tracing::warn!(error = %e, "Failed to install Ctrl-C handler"),
    }
}
