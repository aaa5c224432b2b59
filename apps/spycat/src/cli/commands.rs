//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::CliError;
use crate::api::{self, AppState, StatusResponse};
use crate::breeds::BreedCatalog;
use crate::config::{BackendKind, Config, StorageConfig};
use spycat_core::{AgencyError, BreedValidator, Engine, StorageBackend};

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &Config) -> Result<(), CliError> {
    let backend = open_backend(&config.storage)?;
    let catalog = BreedCatalog::from_config(&config.breeds)?;
    let enforcement = config.rules.enforcement;

    println!("Spycat Agency Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:     {}", config.server.addr());
    println!("  Backend:     {}", backend.name());
    if backend.is_persistent() {
        println!("  Database:    {:?}", config.storage.path);
    }
    println!("  Enforcement: {}", enforcement);
    println!("  Breeds:      {}", catalog.describe());
    println!();
    println!("Endpoints:");
    println!("  GET/POST        /cats          - List / create cats");
    println!("  GET/PUT         /cats/{{id}}     - Get cat / update salary");
    println!("  GET/POST        /missions      - List / create missions");
    println!("  GET/PUT/DELETE  /missions/{{id}} - Get / update / delete mission");
    println!("  PUT             /complete/{{id}} - Complete a mission");
    println!("  PUT             /assigncat     - Assign a cat to a mission");
    println!("  GET             /targets       - List targets");
    println!("  PUT/DELETE      /targets/{{id}}  - Update / delete target");
    println!("  POST  /addtarget/{{id}}  PUT  /updatenotes/{{id}}");
    println!("  GET   /health  /status  /hello");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = AppState::new(Engine::new(backend, enforcement), catalog);
    api::run_server(state, &config.server).await?;
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show entity counts.
pub fn cmd_status(config: &Config, json_mode: bool) -> Result<(), CliError> {
    let backend = open_backend(&config.storage)?;
    let engine = Engine::new(backend, config.rules.enforcement);
    let status = StatusResponse::new(
        engine.store().name(),
        engine.enforcement().as_str(),
        engine.counts()?,
    );

    if json_mode {
        let output = serde_json::json!({
            "database": config.storage.path.to_string_lossy(),
            "status": status,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Spycat Agency Status");
    println!("====================");
    println!("Database:    {:?}", config.storage.path);
    println!("Backend:     {}", status.backend);
    println!("Enforcement: {}", status.enforcement);
    println!();
    println!("Cats:              {}", status.cats);
    println!(
        "Missions:          {} ({} incomplete)",
        status.missions, status.incomplete_missions
    );
    println!(
        "Targets:           {} ({} complete)",
        status.targets, status.complete_targets
    );

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Initialize a new database.
pub fn cmd_init(config: &Config, force: bool) -> Result<(), CliError> {
    let path = &config.storage.path;

    if config.storage.backend == BackendKind::Memory {
        println!("Memory backend selected: nothing to initialize");
        return Ok(());
    }

    if path.exists() {
        if !force {
            return Err(CliError::AlreadyExists(path.clone()));
        }
        std::fs::remove_file(path)?;
        tracing::info!(path = %path.display(), "Removed existing database");
    }

    let backend = StorageBackend::redb(path)?;
    drop(backend);
    println!("Initialized new redb database at {:?}", path);
    Ok(())
}

// =============================================================================
// BREEDS COMMAND
// =============================================================================

/// List the recognized breeds, or check a single name.
///
/// Unlike the server, this surfaces lookup failures instead of treating
/// them as an empty list.
pub async fn cmd_breeds(
    config: &Config,
    json_mode: bool,
    check: Option<&str>,
) -> Result<(), CliError> {
    let catalog = BreedCatalog::from_config(&config.breeds)?;
    let list = catalog.try_resolve().await?;

    match check {
        Some(name) => {
            let recognized = list.is_recognized_breed(name);
            if json_mode {
                let output = serde_json::json!({ "breed": name, "recognized": recognized });
                println!("{}", output);
            } else if recognized {
                println!("'{}' is a recognized breed", name);
            } else {
                println!("'{}' is NOT a recognized breed", name);
            }
        }
        None => {
            if json_mode {
                let names: Vec<&str> = list.names().collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&names).unwrap_or_default()
                );
            } else {
                println!("Recognized breeds ({}, {}):", list.len(), catalog.describe());
                for name in list.names() {
                    println!("  {}", name);
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open the storage backend described by `[storage]`.
pub fn open_backend(storage: &StorageConfig) -> Result<StorageBackend, AgencyError> {
    match storage.backend {
        BackendKind::Redb => StorageBackend::redb(&storage.path),
        BackendKind::Memory => Ok(StorageBackend::memory()),
    }
}
