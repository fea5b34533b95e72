use anyhow::{Context, Result};
use log::debug;

use super::render;
use crate::sumo::SumoApi;

/// Profile of one rikishi.
#[tracing::instrument(skip(api))]
pub async fn rikishi<A: SumoApi + ?Sized>(api: &A, rikishi_id: u32) -> Result<String> {
    debug!("Fetching rikishi {}...", rikishi_id);
    let rikishi = api
        .get_rikishi(rikishi_id)
        .await
        .with_context(|| format!("Failed to fetch rikishi {}", rikishi_id))?;
    render(&rikishi)
}

/// Career statistics of one rikishi.
#[tracing::instrument(skip(api))]
pub async fn stats<A: SumoApi + ?Sized>(api: &A, rikishi_id: u32) -> Result<String> {
    debug!("Fetching stats for rikishi {}...", rikishi_id);
    let stats = api
        .get_rikishi_stats(rikishi_id)
        .await
        .with_context(|| format!("Failed to fetch stats for rikishi {}", rikishi_id))?;
    render(&stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::Error;
    use crate::sumo::MockSumoApi;
    use crate::sumo::RikishiStats;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_rikishi_renders_snake_case_json() {
        let mut api = MockSumoApi::new();
        api.expect_get_rikishi()
            .with(eq(1511))
            .times(1)
            .returning(|id| Ok(fixtures::rikishi(id, "Terunofuji Haruo")));

        let output = rikishi(&api, 1511).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["id"], 1511);
        assert_eq!(value["shikona_en"], "Terunofuji Haruo");
        assert!(output.contains('\n'), "output should be pretty-printed");
    }

    #[tokio::test]
    async fn test_rikishi_error_has_context() {
        let mut api = MockSumoApi::new();
        api.expect_get_rikishi()
            .returning(|_| Err(Error::validation("Rikishi ID must be positive")));

        let err = rikishi(&api, 0).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch rikishi 0");
        assert!(
            err.root_cause()
                .to_string()
                .contains("Rikishi ID must be positive")
        );
    }

    #[tokio::test]
    async fn test_stats() {
        let mut api = MockSumoApi::new();
        api.expect_get_rikishi_stats()
            .with(eq(1511))
            .times(1)
            .returning(|_| {
                Ok(serde_json::from_value::<RikishiStats>(serde_json::json!({
                    "basho": 60, "totalMatches": 700, "totalWins": 450,
                    "totalLosses": 220, "totalAbsences": 30, "yusho": 10
                }))
                .unwrap())
            });

        let output = stats(&api, 1511).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total_wins"], 450);
        assert_eq!(value["sansho"]["gino_sho"], 0);
    }
}
