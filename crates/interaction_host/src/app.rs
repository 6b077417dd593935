//! Main application logic and lifecycle management.

use crate::cli::CliArgs;
use crate::config::AppConfig;
use crate::console::{ConsoleError, ConsoleReply, ConsoleRouter, HELP};
use crate::logging::display_banner;
use crate::signals::wait_for_shutdown_signal;
use crate::world::InMemoryWorld;
use interaction_system::{ActionPipeline, DispatchOutcome, DispatchServices, PendingWalk, StatsSnapshot};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

/// Owns the world, the action pipeline and the console player.
pub struct Application {
    config: AppConfig,
    world: Arc<InMemoryWorld>,
    pipeline: Arc<ActionPipeline>,
    router: ConsoleRouter,
}

impl Application {
    /// Loads configuration, applies CLI overrides, validates the result and
    /// assembles the application.
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        if let Some(log_level) = args.log_level {
            config.logging.level = log_level;
        }

        if args.json_logs {
            config.logging.json_format = true;
        }

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        } else {
            info!("✅ Configuration loaded and validated successfully");
        }

        display_banner();
        Self::from_config(config)
    }

    /// Builds the world and pipeline, loads the stock plugins and spawns the
    /// console player.
    pub fn from_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let world = Arc::new(InMemoryWorld::new(config.world.clone()));
        let services = DispatchServices::new(world.clone(), world.clone(), world.clone());
        let pipeline = Arc::new(ActionPipeline::new(services, config.dispatch.clone()));

        let actor = world.spawn_player();
        let router = ConsoleRouter::new(actor, world.clone(), pipeline.clone());
        router.reload()?;

        Ok(Self {
            config,
            world,
            pipeline,
            router,
        })
    }

    pub fn router(&self) -> &ConsoleRouter {
        &self.router
    }

    pub fn world(&self) -> &Arc<InMemoryWorld> {
        &self.world
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.pipeline.stats()
    }

    /// Reads console lines until EOF or a shutdown signal.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting interaction host");
        info!(
            "🗺️ World: spawn {} | {} ms/tile | max walk {} tiles",
            self.config.world.spawn, self.config.world.walk_tile_ms, self.config.world.max_walk_distance
        );
        info!("✅ Ready for input. Type 'help' for the console grammar.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut pending: Vec<PendingWalk> = Vec::new();
        let shutdown = wait_for_shutdown_signal();
        tokio::pin!(shutdown);

        let mut interrupted = false;
        loop {
            tokio::select! {
                result = &mut shutdown => {
                    if let Err(e) = result {
                        error!("❌ Signal handling failed: {}", e);
                    }
                    interrupted = true;
                    break;
                }
                line = lines.next_line() => match line? {
                    Some(line) => {
                        pending.retain(|walk| !walk.is_finished());
                        if let Some(walk) = self.handle_line(&line) {
                            pending.push(walk);
                        }
                    }
                    None => {
                        info!("📭 Console input closed");
                        break;
                    }
                },
            }
        }

        if !interrupted {
            for walk in pending {
                debug!("Walk-to finished: {:?}", walk.outcome().await);
            }
        }

        self.shutdown();
        Ok(())
    }

    /// Executes one console line and logs the result. Returns the walk still
    /// in flight, if any.
    pub fn handle_line(&self, line: &str) -> Option<PendingWalk> {
        match self.router.handle_line(line) {
            Ok(Some(ConsoleReply::Dispatched(outcome))) => match outcome {
                DispatchOutcome::Dispatched {
                    immediate,
                    pending_walk,
                } => {
                    debug!("Dispatched: {} immediate handler(s)", immediate);
                    if pending_walk.is_some() {
                        info!("🚶 Walking to target...");
                    }
                    pending_walk
                }
                DispatchOutcome::Dropped => {
                    info!("⏳ Busy, interaction ignored");
                    None
                }
                DispatchOutcome::Unhandled => None,
            },
            Ok(Some(ConsoleReply::Busy(busy))) => {
                info!("⏳ Busy: {}", if busy { "on" } else { "off" });
                None
            }
            Ok(Some(ConsoleReply::Reloaded(_))) => None,
            Ok(Some(ConsoleReply::Stats(stats))) => {
                log_statistics("📊 Dispatch statistics", &stats);
                None
            }
            Ok(Some(ConsoleReply::Help)) => {
                for line in HELP.lines() {
                    info!("{}", line);
                }
                None
            }
            Ok(None) => None,
            Err(ConsoleError::Rejected(rejection)) => {
                warn!("🚫 {}", rejection);
                None
            }
            Err(e) => {
                warn!("❓ {}", e);
                None
            }
        }
    }

    fn shutdown(self) {
        let actor = self.router.actor();
        self.pipeline.forget_actor(actor);
        self.world.remove_player(actor);

        log_statistics("📊 Final dispatch statistics", &self.pipeline.stats());
        match serde_json::to_string(&self.pipeline.stats()) {
            Ok(json) => debug!("Final statistics: {}", json),
            Err(e) => warn!("Unable to serialize statistics: {}", e),
        }
        info!("✅ Interaction host shut down cleanly");
    }
}

fn log_statistics(title: &str, stats: &StatsSnapshot) {
    info!("{}:", title);
    info!("  - Events received: {}", stats.events_received);
    info!("  - Dispatched: {}", stats.dispatched);
    info!("  - Unhandled: {}", stats.unhandled);
    info!("  - Dropped (busy): {}", stats.dropped_busy);
    info!(
        "  - Handlers invoked: {} immediate, {} after walking",
        stats.immediate_invoked, stats.walk_gated_invoked
    );
    info!(
        "  - Walks: {} requested, {} cancelled, {} failed",
        stats.walks_requested, stats.walks_cancelled, stats.walks_failed
    );
    if stats.handler_panics > 0 {
        warn!("  - Handler panics: {}", stats.handler_panics);
    }
}
