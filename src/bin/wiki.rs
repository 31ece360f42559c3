// region:    --- Imports
use commerce_service::config::Config;
use commerce_service::logging;
use commerce_service::wiki::{self, EntryStore, WikiState};
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = Config::from_env();
    let entries = EntryStore::open(config.wiki_entries_dir.clone()).await?;

    let routes_all = wiki::routes(WikiState::new(entries));

    let listener = TcpListener::bind(config.wiki_http_addr).await?;
    info!(
        "{:<12} --> Wiki Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
