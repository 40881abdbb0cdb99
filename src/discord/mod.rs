mod alert_sender;
mod bot;
pub mod commands;
pub mod embeds;

pub use alert_sender::DiscordAlertSender;
pub use bot::{Data, create_framework};
