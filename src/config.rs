use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use poise::serenity_prelude::UserId;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Sound configuration persisted as a JSON document
///
/// Holds the member → greeting clip mapping plus the default and exit
/// sounds. Loaded once at startup and re-saved after every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SoundConfig {
    #[serde(default)]
    pub user_sound_map: HashMap<UserId, PathBuf>,
    #[serde(default)]
    pub default_sound: Option<PathBuf>,
    #[serde(default)]
    pub exit_sound: Option<PathBuf>,
}

/// Errors raised by the config store
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Malformed(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to access config file: {}", e),
            ConfigError::Malformed(e) => write!(f, "config file is invalid: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Malformed(e)
    }
}

impl SoundConfig {
    /// Load the configuration document, creating an empty one if absent
    ///
    /// A malformed document is an error; callers treat it as fatal at
    /// startup rather than silently starting with an empty mapping.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!("{} not found. Creating empty config.", path.display());
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }

        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Atomically rewrite the configuration document
    ///
    /// Writes a sibling temp file and renames it over the target, so a
    /// crash mid-save never leaves a truncated document behind.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Resolve the greeting sound for a member: their mapped clip if any,
    /// otherwise the default sound
    pub fn join_sound_for(&self, user_id: UserId) -> Option<&Path> {
        self.user_sound_map
            .get(&user_id)
            .map(PathBuf::as_path)
            .or(self.default_sound.as_deref())
    }

    /// The exit sound, if one is configured
    pub fn exit_sound(&self) -> Option<&Path> {
        self.exit_sound.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapped_config() -> SoundConfig {
        let mut config = SoundConfig::default();
        config
            .user_sound_map
            .insert(UserId::new(42), PathBuf::from("./sounds/a.mp3"));
        config.default_sound = Some(PathBuf::from("./sounds/default.mp3"));
        config
    }

    #[test]
    fn test_load_missing_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = SoundConfig::load(&path).unwrap();

        assert!(config.user_sound_map.is_empty());
        assert!(config.default_sound.is_none());
        assert!(config.exit_sound.is_none());
        // The empty document must now exist on disk
        assert!(path.exists());
    }

    #[test]
    fn test_load_malformed_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            SoundConfig::load(&path),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = mapped_config();
        config.exit_sound = Some(PathBuf::from("./sounds/bye.mp3"));
        config.save(&path).unwrap();

        let loaded = SoundConfig::load(&path).unwrap();
        assert_eq!(
            loaded.user_sound_map.get(&UserId::new(42)),
            Some(&PathBuf::from("./sounds/a.mp3"))
        );
        assert_eq!(loaded.default_sound, Some(PathBuf::from("./sounds/default.mp3")));
        assert_eq!(loaded.exit_sound, Some(PathBuf::from("./sounds/bye.mp3")));
    }

    #[test]
    fn test_document_uses_string_snowflake_keys() {
        let raw = r#"{
            "user_sound_map": { "99": "./sounds/hello.mp3" },
            "default_sound": null,
            "exit_sound": "./sounds/bye.mp3"
        }"#;

        let config: SoundConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(
            config.user_sound_map.get(&UserId::new(99)),
            Some(&PathBuf::from("./sounds/hello.mp3"))
        );
        assert!(config.default_sound.is_none());
        assert_eq!(config.exit_sound, Some(PathBuf::from("./sounds/bye.mp3")));
    }

    #[test]
    fn test_save_replaces_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        mapped_config().save(&path).unwrap();
        let mut updated = mapped_config();
        updated.default_sound = None;
        updated.save(&path).unwrap();

        let loaded = SoundConfig::load(&path).unwrap();
        assert!(loaded.default_sound.is_none());
        // No stray temp file left behind
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_join_sound_prefers_mapping_over_default() {
        let config = mapped_config();
        assert_eq!(
            config.join_sound_for(UserId::new(42)),
            Some(Path::new("./sounds/a.mp3"))
        );
        assert_eq!(
            config.join_sound_for(UserId::new(7)),
            Some(Path::new("./sounds/default.mp3"))
        );
    }

    #[test]
    fn test_join_sound_unmapped_without_default_is_none() {
        let config = SoundConfig::default();
        assert_eq!(config.join_sound_for(UserId::new(7)), None);
    }
}
