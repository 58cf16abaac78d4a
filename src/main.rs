use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod bot;
use bot::Bot;

mod config;
use config::BotConfig;

mod slack;
use slack::{Deliver, ReplyOnly, SlackWebhook};

mod webhooks;
use webhooks::GitHubSecret;

#[cfg(test)]
mod test_utils;

#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Configuration file for the bot
    #[arg(short, long, env = "REVIEW_BOT_CONFIG")]
    config: PathBuf,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();
    let config = BotConfig::load(&opts.config)?;

    let bot = Bot::new(&config).context("failed to create review bot")?;
    let delivery: Box<dyn Deliver> = match config.slack_webhook_url.clone() {
        Some(url) => {
            info!("posting notifications to Slack");
            Box::new(SlackWebhook::new(url))
        }
        None => Box::new(ReplyOnly),
    };

    let rocket = webhooks::rocket(bot, GitHubSecret(config.github_secret.clone()), delivery);
    rocket
        .launch()
        .await
        .map(|_| ())
        .map_err(|err| anyhow::anyhow!(err))
}
