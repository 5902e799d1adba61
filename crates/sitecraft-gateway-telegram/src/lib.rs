//! Telegram gateway for Sitecraft.
//!
//! `/start` and `/help` are answered with static texts; every other text
//! message is relayed to the website generator and the result comes back
//! as an HTML document.

pub mod bot;
pub mod chat;
pub mod cli;
pub mod commands;
pub mod health;

#[cfg(test)]
mod test_support;

pub use bot::run;
pub use chat::TelegramChat;
pub use commands::Command;
