use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use poise::serenity_prelude::{async_trait, ChannelId, GuildId};
use songbird::error::JoinError;
use songbird::input::File;
use songbird::{
    Call, Event, EventContext, EventHandler as VoiceEventHandler, Songbird, TrackEvent,
};
use tokio::sync::{Mutex, Notify};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::constants::{MAX_BACKOFF_SECS, SETTLE_DELAY};

/// One failed connection attempt, classified by whether retrying can help
pub enum ConnectFailure<E> {
    Transient(E),
    Fatal(E),
}

/// Attempt a connection with capped exponential backoff
///
/// `retry_attempts` is the total attempt budget; a budget of 0 still gets
/// one attempt. The k-th retry (0-indexed) waits `min(2^k, 32)` seconds.
/// Transient failures are retried, fatal ones end the sequence at once.
/// Returns `None` when no attempt produced a connection.
pub async fn connect_with_backoff<T, E, F, Fut>(
    mut attempt_connect: F,
    retry_attempts: u32,
) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ConnectFailure<E>>>,
    E: std::fmt::Display,
{
    for attempt in 0..retry_attempts.max(1) {
        match attempt_connect().await {
            Ok(connection) => return Some(connection),
            Err(ConnectFailure::Transient(e)) => {
                error!("Voice connection closed: {}", e);
                let backoff_secs = 2u64.saturating_pow(attempt).min(MAX_BACKOFF_SECS);
                info!("Retrying in {} seconds...", backoff_secs);
                sleep(Duration::from_secs(backoff_secs)).await;
            }
            Err(ConnectFailure::Fatal(e)) => {
                error!("Unrecoverable error while connecting: {}", e);
                break;
            }
        }
    }

    error!("Failed to connect after multiple attempts.");
    None
}

/// Join a voice channel, retrying transient driver failures
pub async fn join_with_backoff(
    manager: &Songbird,
    guild_id: GuildId,
    channel_id: ChannelId,
    retry_attempts: u32,
) -> Option<Arc<Mutex<Call>>> {
    connect_with_backoff(
        || async move {
            manager
                .join(guild_id, channel_id)
                .await
                .map_err(classify_join_error)
        },
        retry_attempts,
    )
    .await
}

/// Sort a join failure into the retryable and the hopeless
///
/// Driver-level connection drops and handshake timeouts are worth another
/// attempt; gateway-level failures (request dropped, shard sender gone,
/// no call) will not improve on retry.
fn classify_join_error(error: JoinError) -> ConnectFailure<JoinError> {
    match error {
        JoinError::TimedOut | JoinError::Driver(_) => ConnectFailure::Transient(error),
        _ => ConnectFailure::Fatal(error),
    }
}

/// Play a clip over a live call, wait for it to finish, then disconnect
///
/// An unset or missing file skips playback with a warning; the connection
/// is released on every path, and a failed release is logged rather than
/// propagated.
pub async fn play_sound_then_leave(
    manager: &Songbird,
    guild_id: GuildId,
    call: Arc<Mutex<Call>>,
    sound_path: Option<&Path>,
) {
    let Some(path) = playable(sound_path) else {
        warn!(
            "Sound file {} not found or not set. Skipping.",
            sound_path.map_or_else(|| "<unset>".to_string(), |p| p.display().to_string()),
        );
        disconnect(manager, guild_id).await;
        return;
    };

    let finished = Arc::new(Notify::new());
    let watching = {
        let mut handler = call.lock().await;
        let track = handler.play_input(File::new(path.to_path_buf()).into());
        // End fires on normal completion, Error when the driver gives up
        [TrackEvent::End, TrackEvent::Error].iter().try_for_each(|event| {
            track.add_event(
                Event::Track(*event),
                PlaybackFinished {
                    notify: finished.clone(),
                },
            )
        })
    };

    match watching {
        Ok(()) => finished.notified().await,
        Err(e) => error!("Failed to observe playback of {}: {}", path.display(), e),
    }

    disconnect(manager, guild_id).await;
}

/// A candidate sound is playable only when it is set and the file exists
fn playable(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| p.exists())
}

/// Release a guild's voice connection, logging a failed disconnect
pub async fn disconnect(manager: &Songbird, guild_id: GuildId) {
    if let Err(e) = manager.remove(guild_id).await {
        error!("Failed to disconnect: {}", e);
    }
}

/// Tear down any existing connection in the guild and let the transport
/// settle before a new join is attempted
pub async fn teardown_existing(manager: &Songbird, guild_id: GuildId) {
    if manager.get(guild_id).is_some() {
        disconnect(manager, guild_id).await;
        sleep(SETTLE_DELAY).await;
    }
}

/// Wakes the sequencer when its track stops playing
struct PlaybackFinished {
    notify: Arc<Notify>,
}

#[async_trait]
impl VoiceEventHandler for PlaybackFinished {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        self.notify.notify_one();
        None
    }
}
