//! Configuration management for the interaction host.
//!
//! Loads and validates the TOML configuration. A missing file is created with
//! default settings on first start.

use interaction_system::{DispatchSettings, ItemId, Position};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

fn default_walk_tile_ms() -> u64 {
    100
}

fn default_max_walk_distance() -> u32 {
    32
}

fn default_spawn() -> Position {
    Position::new(3222, 3218, 0)
}

fn default_starting_inventory() -> Vec<ItemId> {
    // Bucket of water, pot of flour, bucket of milk
    vec![1929, 1933, 1927]
}

fn default_ground_items() -> Vec<GroundItemSettings> {
    vec![
        GroundItemSettings {
            item_id: 995,
            position: Position::new(3224, 3218, 0),
        },
        GroundItemSettings {
            item_id: 1944,
            position: Position::new(3229, 3299, 0),
        },
    ]
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Dispatch pipeline switches
    #[serde(default)]
    pub dispatch: DispatchSettings,
    /// Simulated world settings
    #[serde(default)]
    pub world: WorldSettings,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// The in-memory world the console player acts in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSettings {
    /// Tile the console player starts on
    #[serde(default = "default_spawn")]
    pub spawn: Position,
    /// Simulated walking time per tile, in milliseconds
    #[serde(default = "default_walk_tile_ms")]
    pub walk_tile_ms: u64,
    /// Walks longer than this many tiles fail as unreachable
    #[serde(default = "default_max_walk_distance")]
    pub max_walk_distance: u32,
    /// Items placed in the player's inventory, from slot 0
    #[serde(default = "default_starting_inventory")]
    pub starting_inventory: Vec<ItemId>,
    /// Items lying on the ground at startup
    #[serde(default = "default_ground_items")]
    pub ground_items: Vec<GroundItemSettings>,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            spawn: default_spawn(),
            walk_tile_ms: default_walk_tile_ms(),
            max_walk_distance: default_max_walk_distance(),
            starting_inventory: default_starting_inventory(),
            ground_items: default_ground_items(),
        }
    }
}

/// A ground item spawned with the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundItemSettings {
    pub item_id: ItemId,
    pub position: Position,
}

impl AppConfig {
    /// Loads configuration from `path`, writing a default file when it does
    /// not exist yet.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        if self.world.max_walk_distance == 0 {
            return Err("world.max_walk_distance must be greater than 0".to_string());
        }

        if self.world.starting_inventory.len() > interaction_system::intake::INVENTORY_SIZE {
            return Err(format!(
                "world.starting_inventory holds at most {} items",
                interaction_system::intake::INVENTORY_SIZE
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert!(config.dispatch.report_unhandled);
        assert!(config.dispatch.isolate_handler_panics);
        assert_eq!(config.world.spawn, Position::new(3222, 3218, 0));
        assert_eq!(config.world.walk_tile_ms, 100);
        assert_eq!(config.world.max_walk_distance, 32);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.logging.level = "debug".to_string();
        config.world.max_walk_distance = 0;
        assert!(config.validate().is_err());

        config.world.max_walk_distance = 10;
        config.world.starting_inventory = vec![995; 29];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [dispatch]
            report_unhandled = false

            [world]
            walk_tile_ms = 0
            spawn = { x = 3200, y = 3200 }
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "info");
        assert!(!config.dispatch.report_unhandled);
        assert!(config.dispatch.isolate_handler_panics);
        assert_eq!(config.world.walk_tile_ms, 0);
        assert_eq!(config.world.spawn, Position::new(3200, 3200, 0));
        assert_eq!(config.world.max_walk_distance, 32);
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file_creates_it() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("interaction.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(path.exists());

        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded.world.ground_items, config.world.ground_items);
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            "[logging]\nlevel = \"warn\"\njson_format = true\n[world]\nmax_walk_distance = 5\n",
        )
        .unwrap();

        let config = AppConfig::load_from_file(file.path()).await.unwrap();
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.json_format);
        assert_eq!(config.world.max_walk_distance, 5);
    }

    #[tokio::test]
    async fn test_load_from_invalid_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[logging\nlevel = ").unwrap();
        assert!(AppConfig::load_from_file(file.path()).await.is_err());
    }
}
