use std::path::PathBuf;

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::models::{Context, Error};
use crate::utils::messages::{build_sound_assigned, build_sound_not_found, format_error, format_success};
use crate::utils::validation::{require_guild, require_sound_file};

/// Assign a greeting sound to a member
#[poise::command(slash_command, required_permissions = "ADMINISTRATOR")]
pub async fn adduser(
    ctx: Context<'_>,
    #[description = "The member to greet with this sound"] member: serenity::User,
    #[description = "Path to the sound file, e.g. ./sounds/example.mp3"] sound_path: String,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;

    if member.bot {
        ctx.say(format_error("Bots cannot be assigned greeting sounds."))
            .await?;
        return Ok(());
    }

    if require_sound_file(&sound_path).is_err() {
        ctx.say(build_sound_not_found(&sound_path)).await?;
        return Ok(());
    }

    let saved = {
        let mut config = ctx.data().sound_config.write().await;
        config
            .user_sound_map
            .insert(member.id, PathBuf::from(&sound_path));
        config.save(&ctx.data().config_path)
    };

    if let Err(e) = saved {
        error!("Failed to save sound config: {}", e);
        ctx.say(format_error("Could not save the configuration. Try again."))
            .await?;
        return Ok(());
    }

    ctx.say(build_sound_assigned(&member.name, &sound_path))
        .await?;

    info!(
        "Mapped user {} to sound {} in guild {}",
        member.id, sound_path, guild_id
    );

    Ok(())
}

/// Remove a member's greeting sound
#[poise::command(slash_command, required_permissions = "ADMINISTRATOR")]
pub async fn removeuser(
    ctx: Context<'_>,
    #[description = "The member whose greeting sound should be removed"] member: serenity::User,
) -> Result<(), Error> {
    let guild_id = require_guild(ctx.guild_id())?;

    let removed = {
        let mut config = ctx.data().sound_config.write().await;
        match config.user_sound_map.remove(&member.id) {
            Some(_) => Some(config.save(&ctx.data().config_path)),
            None => None,
        }
    };

    match removed {
        None => {
            ctx.say(format_error(&format!(
                "{} has no greeting sound assigned.",
                member.name
            )))
            .await?;
        }
        Some(Err(e)) => {
            error!("Failed to save sound config: {}", e);
            ctx.say(format_error("Could not save the configuration. Try again."))
                .await?;
        }
        Some(Ok(())) => {
            ctx.say(format_success(&format!(
                "Removed the greeting sound for {}.",
                member.name
            )))
            .await?;
            info!("Unmapped user {} in guild {}", member.id, guild_id);
        }
    }

    Ok(())
}
