//! Telegram bot that asks five quick questions (platform, budget, genre,
//! playtime and vibe) and recommends three games from the RAWG catalog.

pub mod config;
pub mod messages;
pub mod quiz;
pub mod rawg;
