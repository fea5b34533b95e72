use async_trait::async_trait;
use log::debug;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::params::{
    BashoId, Division, HistoryQuery, KimariteMatchesQuery, KimariteQuery, RikishiQuery,
    past_basho, validate_day, validate_rikishi_id,
};
use super::types::{
    Banzuke, Basho, KimariteMatches, KimariteStats, Measurement, OpponentMatches, RankRecord,
    Rikishi, RikishiList, RikishiMatches, RikishiStats, ShikonaRecord, Torikumi,
};
use super::wire::{RawBanzuke, RawTorikumi, sort_by_basho};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, Param};

/// Typed access to the sumo statistics API.
///
/// Every method validates its arguments before touching the network, so a
/// malformed basho ID or division never costs a request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SumoApi: Send + Sync {
    async fn get_rikishi(&self, rikishi_id: u32) -> Result<Rikishi>;
    async fn get_rikishi_stats(&self, rikishi_id: u32) -> Result<RikishiStats>;
    async fn get_rikishis(&self, query: RikishiQuery) -> Result<RikishiList>;
    async fn get_rikishi_matches(
        &self,
        rikishi_id: u32,
        basho_id: Option<String>,
    ) -> Result<RikishiMatches>;
    async fn get_rikishi_opponent_matches(
        &self,
        rikishi_id: u32,
        opponent_id: u32,
        basho_id: Option<String>,
    ) -> Result<OpponentMatches>;
    async fn get_basho(&self, basho_id: &str) -> Result<Basho>;
    async fn get_banzuke(&self, basho_id: &str, division: &str) -> Result<Banzuke>;
    async fn get_torikumi(&self, basho_id: &str, division: &str, day: u32) -> Result<Torikumi>;
    async fn get_kimarite(&self, query: KimariteQuery) -> Result<KimariteStats>;
    async fn get_kimarite_matches(
        &self,
        kimarite: &str,
        query: KimariteMatchesQuery,
    ) -> Result<KimariteMatches>;
    async fn get_measurements(&self, query: HistoryQuery) -> Result<Vec<Measurement>>;
    async fn get_ranks(&self, query: HistoryQuery) -> Result<Vec<RankRecord>>;
    async fn get_shikonas(&self, query: HistoryQuery) -> Result<Vec<ShikonaRecord>>;
}

/// Client bound to one API host.
///
/// Owns a pooled HTTP transport that lives until the client (and every clone
/// of it) is dropped or closed.
#[derive(Clone, Debug)]
pub struct SumoClient {
    http: HttpClient,
    config: ClientConfig,
}

impl SumoClient {
    #[tracing::instrument(skip(config))]
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = config.build_transport()?;
        let http = HttpClient::new(transport, config.normalized_base_url(), config.retry_policy())?;
        debug!("Created sumo API client for {}", http.base_url());
        Ok(Self { http, config })
    }

    /// Releases the connection pool. Clones keep their share alive.
    pub fn close(self) {
        debug!("Closing sumo API client for {}", self.http.base_url());
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        self.http.base_url()
    }

    pub async fn get(&self, path: &str, params: &[Param]) -> Result<Value> {
        self.http.get(path, params).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.http.post(path, body).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        self.http.put(path, body).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.http.delete(path).await
    }

    async fn fetch<T: DeserializeOwned>(&self, template: &str, params: &[Param]) -> Result<T> {
        self.http
            .request_json(Method::GET, template, params, None)
            .await
    }

    async fn fetch_history<T>(&self, path: &str, query: &HistoryQuery) -> Result<Vec<T>>
    where
        T: DeserializeOwned + super::types::BashoScoped,
    {
        let params = query.to_params()?;
        let mut records: Vec<T> = self.fetch(path, &params).await?;
        sort_by_basho(&mut records, query.sort_order);
        Ok(records)
    }
}

fn optional_basho(basho_id: Option<&str>) -> Result<Option<BashoId>> {
    basho_id
        .filter(|s| !s.is_empty())
        .map(str::parse::<BashoId>)
        .transpose()
}

#[async_trait]
impl SumoApi for SumoClient {
    #[tracing::instrument(skip(self))]
    async fn get_rikishi(&self, rikishi_id: u32) -> Result<Rikishi> {
        let id = validate_rikishi_id(rikishi_id)?;
        self.fetch("/rikishi/{rikishiId}", &[("rikishiId", id.to_string())])
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_rikishi_stats(&self, rikishi_id: u32) -> Result<RikishiStats> {
        let id = validate_rikishi_id(rikishi_id)?;
        self.fetch("/rikishi/{rikishiId}/stats", &[("rikishiId", id.to_string())])
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_rikishis(&self, query: RikishiQuery) -> Result<RikishiList> {
        let params = query.to_params()?;
        self.fetch("/rikishis", &params).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_rikishi_matches(
        &self,
        rikishi_id: u32,
        basho_id: Option<String>,
    ) -> Result<RikishiMatches> {
        let id = validate_rikishi_id(rikishi_id)?;
        let basho = optional_basho(basho_id.as_deref())?;

        let mut params = vec![("rikishiId", id.to_string())];
        if let Some(basho) = basho {
            params.push(("bashoId", basho.to_string()));
        }
        self.fetch("/rikishi/{rikishiId}/matches", &params).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_rikishi_opponent_matches(
        &self,
        rikishi_id: u32,
        opponent_id: u32,
        basho_id: Option<String>,
    ) -> Result<OpponentMatches> {
        let id = validate_rikishi_id(rikishi_id)?;
        if opponent_id == 0 {
            return Err(Error::validation("Opponent ID must be positive"));
        }
        let basho = optional_basho(basho_id.as_deref())?;

        let mut params = vec![
            ("rikishiId", id.to_string()),
            ("opponentId", opponent_id.to_string()),
        ];
        if let Some(basho) = basho {
            params.push(("bashoId", basho.to_string()));
        }
        self.fetch("/rikishi/{rikishiId}/matches/{opponentId}", &params)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_basho(&self, basho_id: &str) -> Result<Basho> {
        let basho = past_basho(basho_id)?;
        self.fetch("/basho/{bashoId}", &[("bashoId", basho.to_string())])
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_banzuke(&self, basho_id: &str, division: &str) -> Result<Banzuke> {
        let basho = past_basho(basho_id)?;
        let division = division.parse::<Division>()?;

        let raw: RawBanzuke = self
            .fetch(
                "/basho/{bashoId}/banzuke/{division}",
                &[
                    ("bashoId", basho.to_string()),
                    ("division", division.to_string()),
                ],
            )
            .await?;
        Ok(raw.normalize(basho, division))
    }

    #[tracing::instrument(skip(self))]
    async fn get_torikumi(&self, basho_id: &str, division: &str, day: u32) -> Result<Torikumi> {
        let basho = past_basho(basho_id)?;
        let division = division.parse::<Division>()?;
        let day = validate_day(day)?;

        let raw: RawTorikumi = self
            .fetch(
                "/basho/{bashoId}/torikumi/{division}/{day}",
                &[
                    ("bashoId", basho.to_string()),
                    ("division", division.to_string()),
                    ("day", day.to_string()),
                ],
            )
            .await?;
        raw.normalize(basho, division, day)
    }

    #[tracing::instrument(skip(self))]
    async fn get_kimarite(&self, query: KimariteQuery) -> Result<KimariteStats> {
        let params = query.to_params()?;
        self.fetch("/kimarite", &params).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_kimarite_matches(
        &self,
        kimarite: &str,
        query: KimariteMatchesQuery,
    ) -> Result<KimariteMatches> {
        let kimarite = kimarite.trim();
        if kimarite.is_empty() {
            return Err(Error::validation("Kimarite cannot be empty"));
        }
        let mut params = vec![("kimarite", kimarite.to_string())];
        params.extend(query.to_params()?);
        self.fetch("/kimarite/{kimarite}", &params).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_measurements(&self, query: HistoryQuery) -> Result<Vec<Measurement>> {
        self.fetch_history("/measurements", &query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_ranks(&self, query: HistoryQuery) -> Result<Vec<RankRecord>> {
        self.fetch_history("/ranks", &query).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_shikonas(&self, query: HistoryQuery) -> Result<Vec<ShikonaRecord>> {
        self.fetch_history("/shikonas", &query).await
    }
}
