//! Typed endpoints of the sumo statistics API.

pub mod client;
mod de;
pub mod params;
pub mod types;
mod wire;

pub use client::{SumoApi, SumoClient};
#[cfg(test)]
pub use client::MockSumoApi;
pub use params::{
    BashoId, Division, HistoryQuery, KimariteMatchesQuery, KimariteQuery, KimariteSortField,
    Pagination, RikishiQuery, Side, SortOrder,
};
pub use types::*;
