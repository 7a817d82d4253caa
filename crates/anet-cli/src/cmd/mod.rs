pub mod email;
pub mod log;
pub mod org;
pub mod search;
pub mod settings;
pub mod subscriptions;

use anet_core::settings::Settings;
use anyhow::Context;
use std::path::Path;

pub(crate) fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    Settings::load_or_default(path).context("failed to load settings")
}

/// Build a multi-thread runtime for commands that talk to the server.
pub(crate) fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("failed to start async runtime")
}
