mod commands;
mod config;
mod constants;
mod handlers;
mod models;
mod tuna;
mod utils;

use std::path::PathBuf;

use poise::serenity_prelude as serenity;
use tracing::{error, info};

use crate::{
    commands::{adduser, importsound, removeuser, tunacode, tunalogin},
    config::SoundConfig,
    constants::{DEFAULT_CONFIG_PATH, LOG_DIRECTIVE},
    handlers::handle_voice_state_update,
    models::Data,
    tuna::TunaClient,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    initialize_logging();

    // Load configuration from environment
    let env = match load_environment() {
        Ok(env) => env,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Load the sound configuration document; a malformed one is fatal
    let sound_config = match SoundConfig::load(&env.config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // Create and start the bot
    if let Err(e) = start_bot(env, sound_config).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}

/// Configuration loaded from environment variables
struct Environment {
    discord_token: String,
    tuna_token: Option<String>,
    config_path: PathBuf,
    dev_guild_id: Option<u64>,
}

/// Initialize the logging system
fn initialize_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("valid log directive")),
        )
        .init();
}

/// Load configuration from environment variables
fn load_environment() -> Result<Environment, Box<dyn std::error::Error>> {
    let discord_token = std::env::var("DISCORD_TOKEN")
        .map_err(|_| "DISCORD_TOKEN environment variable not set. Set it with: export DISCORD_TOKEN=your_bot_token")?;

    // Optional: pre-authenticated Tuna session
    let tuna_token = std::env::var("TUNA_TOKEN").ok();

    let config_path = std::env::var("GREET_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    // Optional: development guild ID for faster command registration
    let dev_guild_id = std::env::var("DEV_GUILD_ID")
        .ok()
        .and_then(|id| id.parse::<u64>().ok());

    if dev_guild_id.is_some() {
        info!("Development mode: Commands will be registered to guild only");
    }

    Ok(Environment {
        discord_token,
        tuna_token,
        config_path,
        dev_guild_id,
    })
}

/// Create and start the Discord bot
async fn start_bot(env: Environment, sound_config: SoundConfig) -> Result<(), models::Error> {
    // One songbird manager shared by the client and the handlers
    let manager = songbird::Songbird::serenity();
    let data = Data::new(
        sound_config,
        env.config_path,
        manager.clone(),
        TunaClient::new(env.tuna_token),
    );
    let dev_guild_id = env.dev_guild_id;

    // Create framework
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                adduser(),
                removeuser(),
                tunalogin(),
                tunacode(),
                importsound(),
            ],
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    if let poise::serenity_prelude::FullEvent::VoiceStateUpdate { old, new } = event
                    {
                        handle_voice_state_update(ctx, old.clone(), new.clone(), data).await;
                    }
                    Ok(())
                })
            },
            on_error: |error| {
                Box::pin(async move {
                    if let Err(e) = poise::builtins::on_error(error).await {
                        error!("Error while handling command error: {}", e);
                    }
                })
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                // Register commands based on dev_guild_id
                if let Some(guild_id) = dev_guild_id {
                    let guild = serenity::GuildId::new(guild_id);
                    info!("Registering commands in development guild: {}", guild_id);
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, guild)
                        .await?;
                    info!(
                        "Commands registered in guild {} (instant updates)",
                        guild_id
                    );
                } else {
                    info!("Registering commands globally (may take up to 1 hour)");
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Commands registered globally");
                }

                info!("Logged in as {}", ready.user.name);
                info!("Invite me with: {}", invite_url(ready.user.id));

                Ok(data)
            })
        })
        .build();

    // Create client with required intents
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let mut client = serenity::ClientBuilder::new(env.discord_token, intents)
        .voice_manager_arc(manager)
        .framework(framework)
        .await?;

    // Start the bot
    info!("Starting bot...");
    client.start().await?;

    Ok(())
}

/// OAuth invite link carrying the permissions the greeter needs
fn invite_url(bot_id: serenity::UserId) -> String {
    let permissions = serenity::Permissions::CONNECT
        | serenity::Permissions::SPEAK
        | serenity::Permissions::VIEW_CHANNEL
        | serenity::Permissions::SEND_MESSAGES;
    format!(
        "https://discord.com/api/oauth2/authorize?client_id={}&permissions={}&scope=bot%20applications.commands",
        bot_id,
        permissions.bits()
    )
}
