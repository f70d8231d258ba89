//! CLI command implementations
//!
//! Boot sequence shared by `serve` and `list`:
//! 1. Configuration load
//! 2. Store connect (bounded by `connect_timeout_ms`; failure is fatal)
//! 3. Collection prepare
//! 4. Seed (when enabled)

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::catalog::{starter_books, BookRepository, BookResponse};
use crate::http_server::{CatalogState, HttpServer};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, Severity};
use crate::store;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config, force } => init(&config, force),
        Command::Serve { config, port } => serve(&config, port),
        Command::List { config } => list(&config),
    }
}

/// Write a default configuration file
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn init(config_path: &Path, force: bool) -> CliResult<()> {
    if config_path.exists() && !force {
        return Err(CliError::already_initialized(config_path.display()));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::config_error(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }

    let content = serde_json::to_string_pretty(&Config::default())?;
    fs::write(config_path, content)
        .map_err(|e| CliError::config_error(format!("Failed to write config: {}", e)))?;

    write_response(json!({
        "initialized": true,
        "config": config_path.display().to_string()
    }))?;

    Ok(())
}

/// Serve HTTP until Ctrl-C
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let rt = runtime()?;
    rt.block_on(async {
        let state = boot(&config).await?;
        let server = HttpServer::with_config(config.server.clone(), Arc::clone(&state));

        let result = server
            .start(shutdown_signal())
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)));

        shutdown(&state);
        result
    })
}

/// Print the catalog as one JSON line
pub fn list(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    // Keep stdout for the listing
    Logger::set_min_severity(config.severity()?.max(Severity::Error));

    let rt = runtime()?;
    let books = rt.block_on(async {
        let state = boot(&config).await?;
        let books = state
            .run(|repo| repo.list_all())
            .await
            .map_err(|e| CliError::boot_failed(e.to_string()));
        shutdown(&state);
        books
    })?;

    let books: Vec<BookResponse> = books.iter().map(BookResponse::from).collect();
    write_response(json!({ "count": books.len(), "books": books }))
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    log_event(Event::BootStart);

    let config = Config::load_or_default(config_path)?;
    Logger::set_min_severity(config.severity()?);

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", &config_path.display().to_string()),
            ("database_uri", &config.database_uri),
            ("database", &config.database_name),
            ("collection", &config.collection_name),
        ],
    );
    Ok(config)
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Connect, prepare the collection, and seed
pub async fn boot(config: &Config) -> CliResult<Arc<CatalogState>> {
    let database = match store::connect_with_timeout(
        &config.database_uri,
        &config.database_name,
        config.connect_timeout(),
    )
    .await
    {
        Ok(db) => db,
        Err(e) => {
            let reason = e.to_string();
            log_event_with_fields(
                Event::StoreUnavailable,
                &[("database_uri", &config.database_uri), ("reason", &reason)],
            );
            return Err(CliError::store_unavailable(reason));
        }
    };
    log_event_with_fields(
        Event::StoreConnected,
        &[("database_uri", &config.database_uri), ("database", database.name())],
    );

    let db = Arc::clone(&database);
    let collection = config.collection_name.clone();
    let seed = config.seed_data;
    let repository = tokio::task::spawn_blocking(move || {
        let repository = BookRepository::open(db.as_ref(), &collection)?;
        if seed {
            repository.seed(&starter_books())?;
        }
        Ok::<_, crate::catalog::CatalogError>(repository)
    })
    .await
    .map_err(|e| CliError::boot_failed(format!("boot task failed: {}", e)))?
    .map_err(|e| CliError::boot_failed(e.to_string()))?;

    Ok(Arc::new(CatalogState::new(database, repository)))
}

fn shutdown(state: &CatalogState) {
    log_event(Event::ShutdownStart);
    if let Err(e) = state.database.close() {
        Logger::warn("STORE_CLOSE_FAILED", &[("reason", &e.to_string())]);
    }
    log_event(Event::ShutdownComplete);
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        Logger::error("SIGNAL_HANDLER_FAILED", &[("reason", &e.to_string())]);
    }
}

#[cfg(test)]
mod tests {
    use super::super::errors::CliErrorCode;
    use super::*;
    use tempfile::TempDir;

    fn file_config(temp_dir: &TempDir) -> Config {
        Config {
            database_uri: format!("file://{}", temp_dir.path().join("store").display()),
            ..Config::default()
        }
    }

    #[test]
    fn test_init_writes_default_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("conf").join("bookstore.json");

        init(&config_path, false).unwrap();

        assert_eq!(Config::load(&config_path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_reinit() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("bookstore.json");

        init(&config_path, false).unwrap();

        let result = init(&config_path, false);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().code(),
            &CliErrorCode::AlreadyInitialized
        );

        // --force overwrites
        fs::write(&config_path, "{}garbage").unwrap();
        init(&config_path, true).unwrap();
        assert!(Config::load(&config_path).is_ok());
    }

    #[tokio::test]
    async fn test_boot_seeds_once() {
        let temp_dir = TempDir::new().unwrap();
        let config = file_config(&temp_dir);

        let state = boot(&config).await.unwrap();
        assert_eq!(state.run(|r| r.list_all()).await.unwrap().len(), 3);
        state.database.close().unwrap();

        let state = boot(&config).await.unwrap();
        assert_eq!(state.run(|r| r.list_all()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_boot_without_seed() {
        let config = Config {
            seed_data: false,
            ..Config::default()
        };

        let state = boot(&config).await.unwrap();
        assert!(state.run(|r| r.list_all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_boot_unreachable_store_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();

        let config = Config {
            database_uri: format!("file://{}", blocker.display()),
            ..Config::default()
        };

        let err = boot(&config).await.unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::StoreUnavailable);
    }
}
