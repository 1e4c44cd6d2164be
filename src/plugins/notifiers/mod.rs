pub mod discord;
pub mod pushover;

pub use discord::{DiscordConfig, DiscordNotifier};
pub use pushover::{PushoverConfig, PushoverNotifier};
