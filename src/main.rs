use chat_state::cli::{Cli, Command};
use chat_state::{load_page, FileStorage, HistoryRepository};
use clap::Parser;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Load .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialise tracing; stdout is reserved for the page data
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_state=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config();
    let storage = FileStorage::new(&config.data_dir);
    info!(
        "Using chat history '{}' in {}",
        config.storage_key,
        storage.dir().display()
    );

    match cli.action() {
        Command::Show => {
            let page = load_page(Some(&storage), &config.storage_key);
            println!("{}", serde_json::to_string_pretty(&page)?);
        }
        Command::Clear => {
            HistoryRepository::new(&storage, config.storage_key.as_str()).clear()?;
            info!("Cleared stored chat history");
        }
    }

    Ok(())
}
