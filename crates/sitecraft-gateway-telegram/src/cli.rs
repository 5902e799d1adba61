use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sitecraft::Config;
use sitecraft::config::DeliveryMode;

#[derive(Debug, Parser)]
#[command(
    name = "sitecraft-telegram",
    version,
    about = "Telegram bot that turns descriptions into websites"
)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "sitecraft.yaml")]
    pub config: PathBuf,

    /// Override how updates are received
    #[arg(long, value_enum)]
    pub delivery: Option<DeliveryArg>,

    /// Override the webhook listen port
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeliveryArg {
    Polling,
    Webhook,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings.
    pub fn apply(&self, config: &mut Config) {
        if let Some(delivery) = self.delivery {
            config.telegram.delivery = match delivery {
                DeliveryArg::Polling => DeliveryMode::Polling,
                DeliveryArg::Webhook => DeliveryMode::Webhook,
            };
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
