//! # Interaction Host
//!
//! Console host for the interaction dispatch pipeline. It wires an in-memory
//! world, the stock content plugins and one [`ActionPipeline`] together, then
//! turns typed console lines into interaction events.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! interaction-host
//!
//! # Specify custom configuration and verbose logs
//! interaction-host --config dev.toml --log-level debug
//!
//! # Scripted session
//! printf '::pos\npick-up item 995 3224 3218\n' | interaction-host
//! ```
//!
//! ## Configuration
//!
//! The host loads configuration from a TOML file (default: `interaction.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! The host stops reading input on SIGINT (Ctrl+C) or SIGTERM (Unix), or when
//! standard input closes, and logs final dispatch statistics.
//!
//! [`ActionPipeline`]: interaction_system::ActionPipeline

use tracing::error;

pub mod app;
pub mod cli;
pub mod config;
pub mod console;
pub mod logging;
pub mod signals;
pub mod world;


use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Runs the host: CLI parsing, configuration, logging, then the console loop.
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Load configuration to get logging settings
    let mut logging = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default()
        .logging;
    if let Some(level) = &args.log_level {
        logging.level = level.clone();
    }

    // Setup logging before anything else
    if let Err(e) = logging::setup_logging(&logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(args).await {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

pub use config::{GroundItemSettings, LoggingSettings, WorldSettings};
