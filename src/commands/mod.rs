//! Handlers behind the `sumo` binary. Each one calls the API and renders the
//! result as pretty-printed JSON.

use anyhow::{Context, Result};
use serde::Serialize;

mod basho;
mod history;
mod kimarite;
mod rikishi;

pub use basho::{banzuke, basho, torikumi};
pub use history::{HistoryKind, history};
pub use kimarite::{kimarite, kimarite_matches};
pub use rikishi::{rikishi, stats};

fn render<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to render response as JSON")
}
