//! covidbot command-line entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::info;

use covidbot::chart::SvgRenderer;
use covidbot::config::{self, Config};
use covidbot::gateway::{
    BotContext, BotIdentity, GatewayError, InboundEvent, MessageHandler, Messenger,
};
use covidbot::intent::AliasTable;
use covidbot::logging;
use covidbot::stats::covid19api::Covid19ApiClient;
use covidbot::stats::{OfflineProvider, StatsProvider};
use covidbot::telegram;

/// COVID-19 statistics chat bot.
#[derive(Debug, Parser)]
#[command(name = "covidbot", version, about)]
struct Cli {
    /// Path to config.toml (default: ~/.covidbot/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the Telegram bot.
    Start,
    /// Answer one message on stdout.
    Ask {
        /// Message text.
        text: String,
        /// Skip every provider call.
        #[arg(long)]
        offline: bool,
        /// Write a requested chart to this file.
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
    /// Print the extracted intent of a message as JSON.
    Intent {
        /// Message text.
        text: String,
        /// Use static aliases only.
        #[arg(long)]
        offline: bool,
    },
    /// Print the alias table.
    Aliases {
        /// Use static aliases only.
        #[arg(long)]
        offline: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::config_dir()?.join("config.toml"),
    };

    match cli.command {
        Command::Start => {
            let _guard = logging::init_production(&config::config_dir()?.join("logs"))?;
            let config = config::load_config(&config_path)?;
            cmd_start(config).await
        }
        Command::Ask {
            text,
            offline,
            chart_out,
        } => {
            logging::init_cli();
            let config = config::load_config(&config_path)?;
            cmd_ask(&config, &text, offline, chart_out).await
        }
        Command::Intent { text, offline } => {
            logging::init_cli();
            let config = config::load_config(&config_path)?;
            let handler = build_handler(&config, offline, BotIdentity::new("@covidbot")).await?;
            let record = handler.extract(&text);
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Command::Aliases { offline } => {
            logging::init_cli();
            let config = config::load_config(&config_path)?;
            let provider = build_provider(&config, offline)?;
            let table = AliasTable::load(provider.as_ref()).await;
            let mut entries: Vec<(&str, &str)> = table.iter().collect();
            entries.sort_unstable();
            for (alias, id) in entries {
                println!("{alias} -> {id}");
            }
            Ok(())
        }
    }
}

async fn cmd_start(config: Config) -> anyhow::Result<()> {
    let token = config::telegram_token(&config.channels.telegram)?;
    let bot = teloxide::Bot::new(token);
    let mention = telegram::bot_mention(&bot).await?;
    info!(mention = %mention, "telegram identity resolved");

    let handler = build_handler(&config, false, BotIdentity::new(&mention)).await?;
    telegram::run_telegram(
        bot,
        Arc::new(handler),
        config.channels.telegram.allowed_chats.clone(),
    )
    .await
}

async fn cmd_ask(
    config: &Config,
    text: &str,
    offline: bool,
    chart_out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let handler = build_handler(config, offline, BotIdentity::new("@covidbot")).await?;
    let event = InboundEvent {
        text: text.to_owned(),
        channel_id: "cli".to_owned(),
        sender_id: "cli".to_owned(),
        sender_name: "there".to_owned(),
        is_bot_message: false,
        is_direct: true,
    };
    handler.handle(&event, &StdoutMessenger { chart_out }).await;
    Ok(())
}

fn build_provider(config: &Config, offline: bool) -> anyhow::Result<Arc<dyn StatsProvider>> {
    if offline {
        return Ok(Arc::new(OfflineProvider));
    }
    let client = Covid19ApiClient::new(&config.stats.base_url, config.stats.timeout())
        .context("failed to build stats client")?;
    Ok(Arc::new(client))
}

async fn build_handler(
    config: &Config,
    offline: bool,
    identity: BotIdentity,
) -> anyhow::Result<MessageHandler> {
    let stats = build_provider(config, offline)?;
    let aliases = Arc::new(AliasTable::load(stats.as_ref()).await);

    Ok(MessageHandler::new(BotContext {
        aliases,
        stats,
        renderer: Arc::new(SvgRenderer::new(config.plot.width, config.plot.height)),
        identity,
        pause: if offline {
            std::time::Duration::ZERO
        } else {
            config.replies.pause()
        },
        log_scale: config.plot.log_scale,
    }))
}

/// Prints replies to stdout; charts go to `chart_out` when given.
struct StdoutMessenger {
    chart_out: Option<PathBuf>,
}

#[async_trait]
impl Messenger for StdoutMessenger {
    async fn post_message(&self, _channel_id: &str, text: &str) -> Result<(), GatewayError> {
        println!("{text}\n");
        Ok(())
    }

    async fn upload_file(
        &self,
        _channel_id: &str,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<(), GatewayError> {
        match &self.chart_out {
            Some(path) => {
                tokio::fs::write(path, &bytes)
                    .await
                    .map_err(|e| GatewayError::Upload(format!("{}: {e}", path.display())))?;
                println!("[chart written to {}]\n", path.display());
            }
            None => println!("[chart {filename}: {} bytes, use --chart-out to save]\n", bytes.len()),
        }
        Ok(())
    }
}
