use boombox_stations::config::StationsConfig;
use boombox_stations::host::ConsoleHost;
use boombox_stations::observability::init_tracing;
use boombox_stations::playback::{FilePlayback, LoggingPlayback, PlaybackSink};
use boombox_stations::security::{load_grants_file, GrantTable};
use boombox_stations::stations::StationManager;
use boombox_stations::storage::LocalFsObjectStore;
use tokio::io::BufReader;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = StationsConfig::from_env()?;
    init_tracing(&config.logging);

    let grants = match &config.grants_file {
        Some(path) => load_grants_file(path)?,
        None => {
            warn!("No grants file configured; every player has no capabilities");
            GrantTable::new()
        }
    };
    info!(players = grants.len(), "Loaded player grants");

    let playback: Box<dyn PlaybackSink> = match &config.url_list_path {
        Some(path) => Box::new(FilePlayback::new(path)),
        None => Box::new(LoggingPlayback),
    };
    let store = LocalFsObjectStore::new(&config.storage.data_dir);
    info!("Station data directory: {:?}", store.base_path());

    let manager = StationManager::open(Box::new(store), playback, config.manager_options());
    let mut host = ConsoleHost::new(manager, grants);

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    tokio::select! {
        result = host.run(stdin, stdout) => result?,
        _ = tokio::signal::ctrl_c() => info!("Interrupted, shutting down"),
    }

    host.close()?;
    Ok(())
}
