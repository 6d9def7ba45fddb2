use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::nutrition::{create_nutrition_plan, NutritionPlan};
use crate::workout::{StrategyLevel, WorkoutFocus};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Where activities and goals are stored
    pub storage: StorageSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,

    /// Body metrics used for nutrition plans
    #[serde(default)]
    pub profile: UserProfile,

    /// Defaults for workout generation
    #[serde(default)]
    pub workout: WorkoutDefaults,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Storage location settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Data directory path
    pub data_dir: PathBuf,

    /// SQLite file name inside the data directory
    pub database_file: String,
}

/// Body metrics for BMR calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDefaults {
    pub default_level: StrategyLevel,
    pub default_duration_minutes: u32,
    pub default_focus: WorkoutFocus,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            storage: StorageSettings::default(),
            logging: LogConfig::default(),
            profile: UserProfile::default(),
            workout: WorkoutDefaults::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".fittrack"),
            database_file: "fittrack.db".to_string(),
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            weight_kg: 70.0,
            height_cm: 170.0,
            age_years: 30,
            gender: "MALE".to_string(),
        }
    }
}

impl Default for WorkoutDefaults {
    fn default() -> Self {
        WorkoutDefaults {
            default_level: StrategyLevel::Beginner,
            default_duration_minutes: 30,
            default_focus: WorkoutFocus::Mixed,
        }
    }
}

impl UserProfile {
    /// Nutrition plan for this profile
    pub fn nutrition_plan(&self, plan_type: &str) -> crate::Result<NutritionPlan> {
        Ok(create_nutrition_plan(
            plan_type,
            self.weight_kg,
            self.height_cm,
            self.age_years,
            &self.gender,
        )?)
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fittrack")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        Self::load_or_default_from(Self::default_config_path())
    }

    /// Load the given file, falling back to defaults if it is missing or unreadable
    pub fn load_or_default_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    eprintln!("Ignoring unreadable config {}: {:#}", path.display(), e);
                } else {
                    tracing::debug!(path = %path.display(), "Config file not found, using defaults");
                }
                Self::default()
            }
        }
    }

    /// Full path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.database_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(config.storage, deserialized.storage);
        assert_eq!(config.workout, deserialized.workout);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = AppConfig::default();
        original.profile.weight_kg = 82.5;
        original.workout.default_level = StrategyLevel::Advanced;
        original.logging.level = LogLevel::Debug;

        original.save_to_file(&config_path).unwrap();
        let loaded = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded.profile.weight_kg, 82.5);
        assert_eq!(loaded.workout.default_level, StrategyLevel::Advanced);
        assert_eq!(loaded.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let toml_str = r#"
            [metadata]
            version = "1.0"
            created_at = "2024-01-01T00:00:00Z"
            updated_at = "2024-01-01T00:00:00Z"

            [storage]
            data_dir = "/tmp/fittrack"
            database_file = "test.db"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.profile, UserProfile::default());
        assert_eq!(config.database_path(), PathBuf::from("/tmp/fittrack/test.db"));
    }

    #[test]
    fn test_unreadable_file_falls_back() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "not = [valid").unwrap();

        let config = AppConfig::load_or_default_from(&config_path);
        assert_eq!(config.workout, WorkoutDefaults::default());
    }

    #[test]
    fn test_profile_nutrition_plan() {
        let plan = UserProfile::default().nutrition_plan("MAINTENANCE").unwrap();
        assert!(plan.daily_calories() > 0.0);
    }
}
