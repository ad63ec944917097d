use std::path::Path;

use poise::serenity_prelude::ChannelId;
use tracing::{error, info};

use crate::constants::{
    DEFAULT_RETRY_ATTEMPTS, MAX_SEARCH_RESULTS, SOUNDS_DIR, TUNA_LOGIN_URL,
};
use crate::handlers::{join_with_backoff, play_sound_then_leave, teardown_existing};
use crate::models::{Context, Error};
use crate::utils::messages::{
    build_import_success, build_search_listing, format_error, format_success, format_warning,
};
use crate::utils::validation::require_guild;

/// Log into Tuna for authenticated searches
#[poise::command(slash_command, required_permissions = "ADMINISTRATOR")]
pub async fn tunalogin(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(format!(
        "Please log into Tuna here: {}\nAfter logging in, provide the authorization code with `/tunacode <code>`.",
        TUNA_LOGIN_URL
    ))
    .await?;
    Ok(())
}

/// Submit a Tuna authorization code
#[poise::command(slash_command, required_permissions = "ADMINISTRATOR")]
pub async fn tunacode(
    ctx: Context<'_>,
    #[description = "The authorization code from Tuna"] code: String,
) -> Result<(), Error> {
    match ctx.data().tuna.authenticate(&code).await {
        Ok(()) => {
            ctx.say(format_success(
                "Logged into Tuna! You can now use enhanced search with `/importsound`.",
            ))
            .await?;
        }
        Err(e) => {
            error!("Tuna authentication failed: {}", e);
            ctx.say(format_error(
                "Failed to authenticate with Tuna. Check the code and try again.",
            ))
            .await?;
        }
    }
    Ok(())
}

/// Search Tuna for sound clips, preview, and import one
#[poise::command(slash_command, required_permissions = "ADMINISTRATOR")]
pub async fn importsound(
    ctx: Context<'_>,
    #[description = "The search term for Tuna sounds"] search_query: String,
    #[description = "Number of a listed result to import"] choice: Option<u32>,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;

    // Searching and downloading can outlast the interaction deadline
    ctx.defer().await?;

    let urls = match ctx.data().tuna.search(&search_query).await {
        Ok(urls) => urls,
        Err(e) => {
            error!("Tuna search failed: {}", e);
            ctx.say(format_error("Failed to connect to Tuna. Try again later."))
                .await?;
            return Ok(());
        }
    };

    if urls.is_empty() {
        ctx.say(format_warning(&format!(
            "No MP3s found for '{}'.",
            search_query
        )))
        .await?;
        return Ok(());
    }

    let listed = &urls[..urls.len().min(MAX_SEARCH_RESULTS)];

    let Some(choice) = choice else {
        ctx.say(build_search_listing(&search_query, listed)).await?;
        return Ok(());
    };

    let Some(url) = (choice as usize)
        .checked_sub(1)
        .and_then(|i| listed.get(i))
    else {
        ctx.say(format_error(&format!(
            "Choice {} is out of range; pick between 1 and {}.",
            choice,
            listed.len()
        )))
        .await?;
        return Ok(());
    };

    let sound_name = format!("{}_{}.mp3", search_query.replace(' ', "_"), choice);
    let dest = Path::new(SOUNDS_DIR).join(&sound_name);

    if let Err(e) = ctx.data().tuna.download(url, &dest).await {
        error!("Failed to download {}: {}", url, e);
        ctx.say(format_error("Failed to download sound for preview."))
            .await?;
        return Ok(());
    }

    info!("Imported Tuna sound {} to {}", url, dest.display());

    // Preview in the invoker's channel when they are in voice
    if let Some(channel_id) = invoker_voice_channel(&ctx) {
        let data = ctx.data();
        let lock = data.guild_playback_lock(guild_id);
        let _guard = lock.lock().await;

        teardown_existing(&data.songbird, guild_id).await;
        if let Some(call) =
            join_with_backoff(&data.songbird, guild_id, channel_id, DEFAULT_RETRY_ATTEMPTS).await
        {
            play_sound_then_leave(&data.songbird, guild_id, call, Some(&dest)).await;
        }
    }

    ctx.say(build_import_success(&sound_name, &dest.display().to_string()))
        .await?;

    Ok(())
}

/// The voice channel the command invoker currently sits in, if any
fn invoker_voice_channel(ctx: &Context<'_>) -> Option<ChannelId> {
    ctx.guild().and_then(|guild| {
        guild
            .voice_states
            .get(&ctx.author().id)
            .and_then(|vs| vs.channel_id)
    })
}
