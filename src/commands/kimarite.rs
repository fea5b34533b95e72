use anyhow::{Context, Result};
use log::debug;

use super::render;
use crate::sumo::{KimariteMatchesQuery, KimariteQuery, SumoApi};

/// Usage statistics across all kimarite.
#[tracing::instrument(skip(api))]
pub async fn kimarite<A: SumoApi + ?Sized>(api: &A, query: KimariteQuery) -> Result<String> {
    debug!("Fetching kimarite statistics...");
    let stats = api
        .get_kimarite(query)
        .await
        .context("Failed to fetch kimarite statistics")?;
    render(&stats)
}

/// Bouts decided by one kimarite.
#[tracing::instrument(skip(api))]
pub async fn kimarite_matches<A: SumoApi + ?Sized>(
    api: &A,
    name: &str,
    query: KimariteMatchesQuery,
) -> Result<String> {
    debug!("Fetching bouts won by {}...", name);
    let matches = api
        .get_kimarite_matches(name, query)
        .await
        .with_context(|| format!("Failed to fetch bouts won by {}", name))?;
    render(&matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::sumo::{
        KimariteMatches, KimariteSortField, KimariteStats, KimariteUsage, MockSumoApi, SortOrder,
    };

    #[tokio::test]
    async fn test_kimarite_passes_query() {
        let mut api = MockSumoApi::new();
        api.expect_get_kimarite()
            .withf(|q| q.sort_field == Some(KimariteSortField::Count))
            .times(1)
            .returning(|_| {
                Ok(KimariteStats {
                    limit: Some(1),
                    skip: 0,
                    sort_field: Some("count".to_string()),
                    sort_order: Some("desc".to_string()),
                    records: vec![KimariteUsage {
                        kimarite: "yorikiri".to_string(),
                        count: 120,
                        last_usage: None,
                    }],
                })
            });

        let query = KimariteQuery {
            sort_field: Some(KimariteSortField::Count),
            sort_order: Some(SortOrder::Desc),
            ..KimariteQuery::default()
        };
        let output = kimarite(&api, query).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["records"][0]["kimarite"], "yorikiri");
    }

    #[tokio::test]
    async fn test_kimarite_matches() {
        let mut api = MockSumoApi::new();
        api.expect_get_kimarite_matches()
            .withf(|name, _| name.to_string() == "oshidashi")
            .times(1)
            .returning(|_, _| {
                Ok(KimariteMatches {
                    limit: None,
                    skip: 0,
                    total: 1,
                    records: vec![fixtures::bout("202401", 1, 1, 2, 1)],
                })
            });

        let output = kimarite_matches(&api, "oshidashi", KimariteMatchesQuery::default())
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["records"][0]["basho_id"], "202401");
    }
}
