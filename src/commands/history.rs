use anyhow::{Context, Result};
use log::debug;

use super::render;
use crate::sumo::{HistoryQuery, SortOrder, SumoApi};

/// Which per-basho history to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryKind {
    Shikona,
    Measurements,
    Ranks,
}

impl HistoryKind {
    fn describe(&self) -> &'static str {
        match self {
            HistoryKind::Shikona => "shikona history",
            HistoryKind::Measurements => "measurements",
            HistoryKind::Ranks => "rank history",
        }
    }
}

/// Lists one kind of history filtered by rikishi and/or basho.
#[tracing::instrument(skip(api))]
pub async fn history<A: SumoApi + ?Sized>(
    api: &A,
    kind: HistoryKind,
    rikishi_id: Option<u32>,
    basho_id: Option<String>,
    order: SortOrder,
) -> Result<String> {
    let query = HistoryQuery {
        basho_id,
        rikishi_id,
        sort_order: order,
    };
    debug!("Fetching {} with {:?}...", kind.describe(), query);

    let context = || format!("Failed to fetch {}", kind.describe());
    match kind {
        HistoryKind::Shikona => render(&api.get_shikonas(query).await.with_context(context)?),
        HistoryKind::Measurements => {
            render(&api.get_measurements(query).await.with_context(context)?)
        }
        HistoryKind::Ranks => render(&api.get_ranks(query).await.with_context(context)?),
    }
}
