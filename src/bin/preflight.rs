use shipment_catalog::domain::ListRequest;
use shipment_catalog::infra::config::{self, CatalogConfig, StoreBackend};
use shipment_catalog::infra::logging;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Reads the same env vars as api_server:\n\
           CATALOG_STORE=memory|postgres|rest (default memory)\n\
           DATABASE_URL                       (postgres)\n\
           CATALOG_REST_URL, CATALOG_API_KEY  (rest)\n\
           CATALOG_SESSION_TOKEN, CATALOG_THEME, CATALOG_PAGE_SIZE, CATALOG_HTTP_ADDR\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = CatalogConfig::from_env()?;

    println!("> Preflight:");
    println!("  CATALOG_STORE={:?}", config.backend);
    match config.backend {
        StoreBackend::Memory => {}
        StoreBackend::Postgres => {
            // Only report whether it is set; the URL may carry a password.
            let _ = config::database_url()?;
            println!("  DATABASE_URL=<set>");
        }
        StoreBackend::Rest => println!("  CATALOG_REST_URL={}", config::rest_url()?),
    }
    println!("  CATALOG_PAGE_SIZE={}", config.page_size);
    println!("  CATALOG_HTTP_ADDR={}", config.http_addr);
    println!("  CATALOG_THEME={}", config.session.theme);
    let session = if config.session.is_authenticated() {
        "signed in"
    } else {
        "anonymous"
    };
    println!("  Session: {}", session);

    let store = config.open_store().await?;
    let page = store
        .list(&ListRequest::single_row())
        .await
        .map_err(|e| {
            anyhow::anyhow!("Store '{}' did not answer a listing: {}", store.backend(), e)
        })?;
    println!(
        "  Store '{}' reachable, {} shipments.",
        store.backend(),
        page.total_count
    );

    println!("> Preflight OK.");
    Ok(())
}
