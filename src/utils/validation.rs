use std::path::Path;

use poise::serenity_prelude::GuildId;

/// Validation error types
#[derive(Debug)]
pub enum ValidationError {
    NotInGuild,
    SoundFileMissing(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NotInGuild => write!(f, "This command must be used in a server"),
            ValidationError::SoundFileMissing(path) => {
                write!(f, "Sound file {} does not exist", path)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Extract guild ID from context, returning error if not in a guild
pub fn require_guild(guild_id: Option<GuildId>) -> Result<GuildId, ValidationError> {
    guild_id.ok_or(ValidationError::NotInGuild)
}

/// Validate that a candidate sound path points at an existing file
pub fn require_sound_file(path: &str) -> Result<(), ValidationError> {
    if Path::new(path).is_file() {
        Ok(())
    } else {
        Err(ValidationError::SoundFileMissing(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_require_guild() {
        assert!(require_guild(None).is_err());
        assert!(require_guild(Some(GuildId::new(123))).is_ok());
    }

    #[test]
    fn test_require_sound_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.mp3");
        fs::write(&file, b"mp3").unwrap();

        assert!(require_sound_file(file.to_str().unwrap()).is_ok());
        assert!(require_sound_file(dir.path().join("gone.mp3").to_str().unwrap()).is_err());
        // A directory is not a playable file
        assert!(require_sound_file(dir.path().to_str().unwrap()).is_err());
    }
}
