use anyhow::{Context, Result};
use log::debug;

use super::render;
use crate::sumo::SumoApi;

#[tracing::instrument(skip(api))]
pub async fn basho<A: SumoApi + ?Sized>(api: &A, basho_id: &str) -> Result<String> {
    debug!("Fetching basho {}...", basho_id);
    let basho = api
        .get_basho(basho_id)
        .await
        .with_context(|| format!("Failed to fetch basho {}", basho_id))?;
    render(&basho)
}

#[tracing::instrument(skip(api))]
pub async fn banzuke<A: SumoApi + ?Sized>(
    api: &A,
    basho_id: &str,
    division: &str,
) -> Result<String> {
    debug!("Fetching {} banzuke for basho {}...", division, basho_id);
    let banzuke = api
        .get_banzuke(basho_id, division)
        .await
        .with_context(|| format!("Failed to fetch {} banzuke for basho {}", division, basho_id))?;
    render(&banzuke)
}

#[tracing::instrument(skip(api))]
pub async fn torikumi<A: SumoApi + ?Sized>(
    api: &A,
    basho_id: &str,
    division: &str,
    day: u32,
) -> Result<String> {
    debug!(
        "Fetching {} torikumi for basho {} day {}...",
        division, basho_id, day
    );
    let torikumi = api
        .get_torikumi(basho_id, division, day)
        .await
        .with_context(|| {
            format!(
                "Failed to fetch {} torikumi for basho {} day {}",
                division, basho_id, day
            )
        })?;
    render(&torikumi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use crate::error::Error;
    use crate::sumo::{Banzuke, Division, MockSumoApi, Torikumi};

    #[tokio::test]
    async fn test_banzuke() {
        let mut api = MockSumoApi::new();
        api.expect_get_banzuke()
            .withf(|basho, division| basho.to_string() == "202305" && division.to_string() == "Makuuchi")
            .times(1)
            .returning(|_, _| {
                Ok(Banzuke {
                    basho_id: "202305".to_string(),
                    division: Division::Makuuchi,
                    rikishi: vec![],
                })
            });

        let output = banzuke(&api, "202305", "Makuuchi").await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["basho_id"], "202305");
        assert_eq!(value["division"], "Makuuchi");
    }

    #[tokio::test]
    async fn test_torikumi() {
        let mut api = MockSumoApi::new();
        api.expect_get_torikumi()
            .withf(|_, _, day| *day == 3)
            .times(1)
            .returning(|_, _, day| {
                Ok(Torikumi {
                    basho_id: "202305".to_string(),
                    division: Division::Juryo,
                    day,
                    location: None,
                    start_date: None,
                    end_date: None,
                    yusho: vec![],
                    special_prizes: vec![],
                    matches: vec![fixtures::bout("202305", day, 1, 2, 2)],
                })
            });

        let output = torikumi(&api, "202305", "Juryo", 3).await.unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["day"], 3);
        assert_eq!(value["matches"][0]["winner_id"], 2);
    }

    #[tokio::test]
    async fn test_basho_error_has_context() {
        let mut api = MockSumoApi::new();
        api.expect_get_basho()
            .returning(|_| Err(Error::validation("Cannot fetch future basho 999901")));

        let err = basho(&api, "999901").await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch basho 999901");
        assert!(format!("{:#}", err).contains("Cannot fetch future basho"));
    }
}
