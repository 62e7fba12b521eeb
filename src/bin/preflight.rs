use anyhow::Context;
use portfolio_api::infra::config::StoreBackend;
use portfolio_api::{AppConfig, DocumentStore, FileStore, PgDocumentStore};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--skip-store]\n\
         \n\
         Reads the same env vars as api_server (all optional):\n\
           DATABASE_URL, DATABASE_MAX_CONNECTIONS, STORE_BACKEND,\n\
           BIND_ADDR, PUBLIC_DIR, MAX_UPLOAD_BYTES\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let skip_store = args.iter().any(|a| a == "--skip-store");

    let config = AppConfig::from_env().context("Invalid configuration")?;

    println!("> Preflight:");
    println!("  STORE_BACKEND={:?}", config.store_backend);
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  PUBLIC_DIR={}", config.public_dir.display());
    println!("  MAX_UPLOAD_BYTES={}", config.max_upload_bytes);

    // Image directory must exist (or be creatable) and accept writes.
    let files = FileStore::open(config.images_dir())
        .await
        .with_context(|| format!("Cannot create {}", config.images_dir().display()))?;
    files
        .check_writable()
        .await
        .with_context(|| format!("{} is not writable", files.root().display()))?;
    println!("  Image directory: {} (writable)", files.root().display());

    if skip_store || config.store_backend == StoreBackend::Memory {
        println!("  Store: skipped");
    } else {
        let store = PgDocumentStore::connect(&config)
            .await
            .context("Cannot connect to Postgres (check DATABASE_URL)")?;
        store.ping().await.context("Postgres ping failed")?;
        println!("  Store: Postgres reachable, collection tables ready");
    }

    println!("> Preflight OK");
    Ok(())
}
