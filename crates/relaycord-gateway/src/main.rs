//! relaycord entry point
//!
//! Run with:
//! ```bash
//! cargo run -p relaycord-gateway
//! ```
//!
//! Configuration is loaded from environment variables. Without
//! `GATEWAY_TOKEN` the client logs in with the credentials file.

use anyhow::Context as _;
use relaycord_common::{try_init_tracing_with_config, ClientConfig, Credentials, TracingConfig};
use relaycord_gateway::{Client, EventCallbacks};
use relaycord_http::RestClient;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "relaycord stopped with an error");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("Failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        api = %config.api.base_url,
        reconnect = config.reconnect.enabled,
        "Configuration loaded"
    );

    let rest = RestClient::new(config.api.base_url.clone())?;
    let token = match &config.gateway.token {
        Some(token) => token.clone(),
        None => {
            let credentials = Credentials::from_file(&config.credentials_file)
                .with_context(|| {
                    format!(
                        "No GATEWAY_TOKEN set and credentials could not be read from {}",
                        config.credentials_file.display()
                    )
                })?;
            rest.login(&credentials).await.context("Login failed")?
        }
    };
    let rest = rest.with_token(token.clone());

    let client = Client::builder(token)
        .settings(&config)
        .http(rest)
        .callbacks(logging_callbacks())
        .build();

    let stopper = client.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
            stopper.stop();
        }
    });

    client.run().await?;
    info!("relaycord stopped");
    Ok(())
}

/// Log the events an operator usually wants to see
fn logging_callbacks() -> EventCallbacks {
    EventCallbacks::new()
        .on_ready(|_, ready| async move {
            info!(
                user = %ready.user.tag(),
                guilds = ready.guilds.len(),
                private_channels = ready.private_channels.len(),
                "Ready"
            );
        })
        .on_message_create(|ctx, message| async move {
            let guild = ctx
                .cache()
                .guild_for_channel(message.channel_id)
                .map(|g| g.name)
                .unwrap_or_default();
            info!(
                guild = %guild,
                channel_id = %message.channel_id,
                author = %message.author.tag(),
                content = %message.content,
                "Message"
            );
        })
        .on_guild_create(|_, guild| async move {
            info!(guild_id = %guild.id, name = %guild.name, "Guild available");
        })
        .on_guild_delete(|_, guild| async move {
            info!(guild_id = %guild.id, unavailable = guild.unavailable, "Guild gone");
        })
        .on_member_add(|_, member| async move {
            info!(user = %member.user.tag(), guild_id = ?member.guild_id, "Member joined");
        })
        .on_member_remove(|_, member| async move {
            info!(user_id = %member.user_id(), guild_id = ?member.guild_id, "Member left");
        })
}
