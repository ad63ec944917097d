use poise::serenity_prelude::{self as serenity, ChannelId, GuildId, UserId, VoiceState};
use std::path::PathBuf;
use tracing::info;

use crate::constants::DEFAULT_RETRY_ATTEMPTS;
use crate::models::Data;

use super::playback::{join_with_backoff, play_sound_then_leave, teardown_existing};

/// What a voice-state update means for the greeter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceTransition {
    /// The member appeared in a channel they were not in before
    Joined(ChannelId),
    /// The member left voice entirely
    Left(ChannelId),
}

/// Handle voice state updates (member joins/moves/leaves voice channels)
pub async fn handle_voice_state_update(
    ctx: &serenity::Context,
    old_state: Option<VoiceState>,
    new_state: VoiceState,
    data: &Data,
) {
    let Some(guild_id) = new_state.guild_id else {
        return;
    };

    // The bot never reacts to its own presence, nor to other bots
    if is_bot_state(ctx, &new_state) {
        return;
    }

    let before = old_state.and_then(|s| s.channel_id);
    let Some(transition) = classify_transition(before, new_state.channel_id) else {
        return;
    };

    // One teardown/connect/play sequence per guild at a time
    let lock = data.guild_playback_lock(guild_id);
    let _guard = lock.lock().await;

    match transition {
        VoiceTransition::Joined(channel_id) => {
            handle_member_joined(guild_id, channel_id, new_state.user_id, data).await;
        }
        VoiceTransition::Left(channel_id) => {
            handle_member_left(guild_id, channel_id, data).await;
        }
    }
}

/// Classify a before/after channel pair
///
/// Same-channel updates (mute, deafen, stream toggles) are not
/// transitions; a channel move counts as a join of the new channel.
pub fn classify_transition(
    before: Option<ChannelId>,
    after: Option<ChannelId>,
) -> Option<VoiceTransition> {
    match (before, after) {
        (before, Some(after)) if before != Some(after) => Some(VoiceTransition::Joined(after)),
        (Some(before), None) => Some(VoiceTransition::Left(before)),
        _ => None,
    }
}

fn is_bot_state(ctx: &serenity::Context, state: &VoiceState) -> bool {
    state.user_id == ctx.cache.current_user().id
        || state.member.as_ref().is_some_and(|m| m.user.bot)
}

/// Greet a member who joined or moved into a voice channel
async fn handle_member_joined(
    guild_id: GuildId,
    channel_id: ChannelId,
    user_id: UserId,
    data: &Data,
) {
    teardown_existing(&data.songbird, guild_id).await;

    let sound_path: Option<PathBuf> = {
        let config = data.sound_config.read().await;
        config.join_sound_for(user_id).map(PathBuf::from)
    };

    // No mapped sound and no default: stay out of the channel entirely
    let Some(path) = sound_path else {
        return;
    };

    info!(
        "Greeting user {} in channel {} of guild {}",
        user_id, channel_id, guild_id
    );

    if let Some(call) =
        join_with_backoff(&data.songbird, guild_id, channel_id, DEFAULT_RETRY_ATTEMPTS).await
    {
        play_sound_then_leave(&data.songbird, guild_id, call, Some(&path)).await;
    }
}

/// Play the exit sound into the channel a member just vacated
async fn handle_member_left(guild_id: GuildId, channel_id: ChannelId, data: &Data) {
    teardown_existing(&data.songbird, guild_id).await;

    let exit_sound: Option<PathBuf> = {
        let config = data.sound_config.read().await;
        config.exit_sound().map(PathBuf::from)
    };

    let Some(path) = exit_sound else {
        return;
    };

    info!(
        "Playing exit sound in channel {} of guild {}",
        channel_id, guild_id
    );

    if let Some(call) =
        join_with_backoff(&data.songbird, guild_id, channel_id, DEFAULT_RETRY_ATTEMPTS).await
    {
        play_sound_then_leave(&data.songbird, guild_id, call, Some(&path)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_join_is_a_join() {
        assert_eq!(
            classify_transition(None, Some(ChannelId::new(10))),
            Some(VoiceTransition::Joined(ChannelId::new(10)))
        );
    }

    #[test]
    fn test_channel_move_is_a_join_of_the_new_channel() {
        assert_eq!(
            classify_transition(Some(ChannelId::new(10)), Some(ChannelId::new(11))),
            Some(VoiceTransition::Joined(ChannelId::new(11)))
        );
    }

    #[test]
    fn test_leaving_voice_is_a_leave_of_the_old_channel() {
        assert_eq!(
            classify_transition(Some(ChannelId::new(10)), None),
            Some(VoiceTransition::Left(ChannelId::new(10)))
        );
    }

    #[test]
    fn test_same_channel_update_is_no_transition() {
        // Mute/deafen toggles arrive as updates within one channel
        assert_eq!(
            classify_transition(Some(ChannelId::new(10)), Some(ChannelId::new(10))),
            None
        );
    }

    #[test]
    fn test_no_channels_at_all_is_no_transition() {
        assert_eq!(classify_transition(None, None), None);
    }
}
