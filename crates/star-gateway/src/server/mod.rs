//! Gateway setup
//!
//! Wires stores, collaborators, and the dispatcher together and runs the
//! event loop until the input ends or a shutdown signal arrives.

mod state;

pub use state::GatewayState;

use std::sync::Arc;

use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};

use star_common::{AppConfig, AppError, AppResult};
use star_core::{ReactionStore, SettingsRepository, SnowflakeGenerator};
use star_db::{
    create_pool, run_migrations, MemoryReactionStore, MemorySettingsRepository, PgReactionStore,
    PgSettingsRepository, PoolConfig,
};
use star_service::{ServiceContextBuilder, StarboardManager};

use crate::backend::{AllowAllCapability, LogEntryPoster};
use crate::dispatch::EventDispatcher;
use crate::source::pump_lines;

type Stores = (Arc<dyn ReactionStore>, Arc<dyn SettingsRepository>);

/// Open the configured stores, falling back to memory without a database URL
async fn open_stores(config: &AppConfig) -> AppResult<Stores> {
    let Some(pool_config) = PoolConfig::from_app(&config.database) else {
        warn!("DATABASE_URL not set, starboard state is kept in memory only");
        return Ok((
            Arc::new(MemoryReactionStore::new()),
            Arc::new(MemorySettingsRepository::new()),
        ));
    };

    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&pool_config).await.map_err(AppError::database)?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Migration(e.to_string()))?;
        info!("Migrations applied");
    }

    Ok((
        Arc::new(PgReactionStore::new(pool.clone())),
        Arc::new(PgSettingsRepository::new(pool)),
    ))
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: AppConfig) -> AppResult<GatewayState> {
    let (reaction_store, settings_repo) = open_stores(&config).await?;

    let poster = LogEntryPoster::new(SnowflakeGenerator::new(config.snowflake.worker_id));
    let service_context = ServiceContextBuilder::new()
        .reaction_store(reaction_store)
        .settings_repo(settings_repo)
        .capability(Arc::new(AllowAllCapability))
        .poster(Arc::new(poster))
        .build()?;

    let manager = Arc::new(StarboardManager::new(
        service_context,
        config.starboard.default_threshold,
    ));
    manager.load_all().await?;

    let event_dispatcher = Arc::new(EventDispatcher::new(
        Arc::clone(&manager),
        config.starboard.star_emoji.clone(),
    ));

    Ok(GatewayState::new(manager, event_dispatcher, config))
}

/// Run the gateway, reading newline-delimited JSON events from stdin
pub async fn run(config: AppConfig) -> AppResult<()> {
    let buffer = config.starboard.event_buffer.max(1);
    let state = create_gateway_state(config).await?;

    let (sender, receiver) = mpsc::channel(buffer);
    let dispatch = Arc::clone(state.event_dispatcher()).start(receiver);

    info!(buffer, "Reading events from stdin");
    tokio::select! {
        result = pump_lines(BufReader::new(tokio::io::stdin()), sender) => {
            let forwarded = result?;
            info!(forwarded, "Event source exhausted");
        }
        () = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    // The sender is gone; let the dispatcher drain what is queued
    dispatch.await.map_err(AppError::internal)?;
    info!(
        processed = state.event_dispatcher().processed(),
        guilds = state.manager().len(),
        "Gateway stopped"
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
