use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use poise::serenity_prelude::GuildId;
use songbird::Songbird;
use tokio::sync::{Mutex, RwLock};

use crate::config::SoundConfig;
use crate::tuna::TunaClient;

/// Bot state shared across all handlers
pub struct Data {
    /// Sound configuration; commands mutate it and re-save to disk
    pub sound_config: RwLock<SoundConfig>,
    /// On-disk location of the configuration document
    pub config_path: PathBuf,
    /// Voice connection manager
    pub songbird: Arc<Songbird>,
    /// Session for the Tuna search service
    pub tuna: TunaClient,
    /// Per-guild locks serializing teardown/connect/play sequences
    playback_locks: DashMap<GuildId, Arc<Mutex<()>>>,
}

impl Data {
    /// Create a new Data instance around a loaded configuration
    pub fn new(
        sound_config: SoundConfig,
        config_path: PathBuf,
        songbird: Arc<Songbird>,
        tuna: TunaClient,
    ) -> Self {
        Self {
            sound_config: RwLock::new(sound_config),
            config_path,
            songbird,
            tuna,
            playback_locks: DashMap::new(),
        }
    }

    /// The exclusive section for one guild's voice connection
    ///
    /// Overlapping voice events for the same guild must not interleave
    /// their check-then-connect sequences; holding this lock for the whole
    /// teardown/connect/play span keeps the one-connection-per-guild
    /// invariant.
    pub fn guild_playback_lock(&self, guild_id: GuildId) -> Arc<Mutex<()>> {
        self.playback_locks.entry(guild_id).or_default().clone()
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
