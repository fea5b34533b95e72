//! Typed, validated request parameters.
//!
//! Everything here fails with [`Error::Validation`] so that malformed input
//! is rejected before a request is sent.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::http::Param;

/// Largest page size the API accepts.
pub const MAX_LIMIT: u32 = 1000;

/// Default page size for rikishi listings.
pub const DEFAULT_RIKISHI_LIMIT: u32 = 10;

pub const FIRST_DAY: u32 = 1;
pub const LAST_DAY: u32 = 15;

/// Tournament identifier in `YYYYMM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BashoId {
    year: u16,
    month: u8,
}

impl BashoId {
    pub fn new(year: u16, month: u8) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::validation(format!(
                "Basho month must be between 01 and 12, got {:02}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// Rejects a basho that starts in a calendar month after the current one.
    pub fn ensure_not_future(&self) -> Result<()> {
        self.ensure_not_future_at(Local::now().date_naive())
    }

    pub fn ensure_not_future_at(&self, today: NaiveDate) -> Result<()> {
        let current = (today.year(), today.month());
        if (self.year as i32, self.month as u32) > current {
            return Err(Error::validation(format!(
                "Cannot fetch future basho {}",
                self
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for BashoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for BashoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::validation(format!(
                "Basho ID must be in YYYYMM format, got '{}'",
                s
            )));
        }
        let digits = |range: std::ops::Range<usize>| {
            s[range]
                .bytes()
                .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'))
        };
        BashoId::new(digits(0..4), digits(4..6) as u8)
    }
}

/// Parses a basho ID and additionally rejects future tournaments.
pub fn past_basho(s: &str) -> Result<BashoId> {
    let basho = s.parse::<BashoId>()?;
    basho.ensure_not_future()?;
    Ok(basho)
}

/// The six divisions of professional sumo, top to bottom.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Division {
    Makuuchi,
    Juryo,
    Makushita,
    Sandanme,
    Jonidan,
    Jonokuchi,
}

impl Division {
    pub const ALL: [Division; 6] = [
        Division::Makuuchi,
        Division::Juryo,
        Division::Makushita,
        Division::Sandanme,
        Division::Jonidan,
        Division::Jonokuchi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Division::Makuuchi => "Makuuchi",
            Division::Juryo => "Juryo",
            Division::Makushita => "Makushita",
            Division::Sandanme => "Sandanme",
            Division::Jonidan => "Jonidan",
            Division::Jonokuchi => "Jonokuchi",
        }
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Division {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Division::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| {
                Error::validation(format!(
                    "Invalid division '{}'. Expected one of: {}",
                    s,
                    Division::ALL.map(|d| d.as_str()).join(", ")
                ))
            })
    }
}

/// Side of the banzuke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    East,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(Error::validation(
                "Sort order must be either 'asc' or 'desc'",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KimariteSortField {
    #[serde(rename = "count")]
    Count,
    #[serde(rename = "kimarite")]
    Kimarite,
    #[serde(rename = "lastUsage")]
    LastUsage,
}

impl KimariteSortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            KimariteSortField::Count => "count",
            KimariteSortField::Kimarite => "kimarite",
            KimariteSortField::LastUsage => "lastUsage",
        }
    }
}

impl FromStr for KimariteSortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(KimariteSortField::Count),
            "kimarite" => Ok(KimariteSortField::Kimarite),
            "lastUsage" => Ok(KimariteSortField::LastUsage),
            _ => Err(Error::validation(
                "Invalid sort field. Must be one of: count, kimarite, lastUsage",
            )),
        }
    }
}

pub fn validate_day(day: u32) -> Result<u32> {
    if !(FIRST_DAY..=LAST_DAY).contains(&day) {
        return Err(Error::validation(format!(
            "Day must be between {} and {}, got {}",
            FIRST_DAY, LAST_DAY, day
        )));
    }
    Ok(day)
}

pub fn validate_rikishi_id(id: u32) -> Result<u32> {
    if id == 0 {
        return Err(Error::validation("Rikishi ID must be positive"));
    }
    Ok(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub skip: u32,
}

impl Pagination {
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return Err(Error::validation("Limit must be a positive integer"));
            }
            if limit > MAX_LIMIT {
                return Err(Error::validation(format!(
                    "Limit cannot exceed {}",
                    MAX_LIMIT
                )));
            }
        }
        Ok(())
    }

    fn push_params(&self, params: &mut Vec<Param>) {
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params.push(("skip", self.skip.to_string()));
    }
}

/// Filters for the rikishi listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RikishiQuery {
    pub shikona_en: Option<String>,
    pub heya: Option<String>,
    pub sumodb_id: Option<u32>,
    pub nsk_id: Option<u32>,
    pub intai: Option<bool>,
    pub measurements: bool,
    pub ranks: bool,
    pub shikonas: bool,
    pub limit: u32,
    pub skip: u32,
}

impl Default for RikishiQuery {
    fn default() -> Self {
        Self {
            shikona_en: None,
            heya: None,
            sumodb_id: None,
            nsk_id: None,
            intai: None,
            measurements: true,
            ranks: true,
            shikonas: true,
            limit: DEFAULT_RIKISHI_LIMIT,
            skip: 0,
        }
    }
}

impl RikishiQuery {
    pub fn to_params(&self) -> Result<Vec<Param>> {
        let page = Pagination {
            limit: Some(self.limit),
            skip: self.skip,
        };
        page.validate()?;

        let mut params = Vec::new();
        page.push_params(&mut params);
        params.push(("measurements", self.measurements.to_string()));
        params.push(("ranks", self.ranks.to_string()));
        params.push(("shikonas", self.shikonas.to_string()));

        if let Some(name) = self.shikona_en.as_deref().filter(|s| !s.is_empty()) {
            params.push(("shikonaEn", name.to_string()));
        }
        if let Some(heya) = self.heya.as_deref().filter(|s| !s.is_empty()) {
            params.push(("heya", heya.to_string()));
        }
        if let Some(id) = self.sumodb_id {
            params.push(("sumodbId", id.to_string()));
        }
        if let Some(id) = self.nsk_id {
            params.push(("nskId", id.to_string()));
        }
        if let Some(intai) = self.intai {
            params.push(("intai", intai.to_string()));
        }
        Ok(params)
    }
}

/// Options for the kimarite usage statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KimariteQuery {
    pub sort_field: Option<KimariteSortField>,
    pub sort_order: Option<SortOrder>,
    pub page: Pagination,
}

impl Default for KimariteQuery {
    fn default() -> Self {
        Self {
            sort_field: None,
            sort_order: Some(SortOrder::Asc),
            page: Pagination::default(),
        }
    }
}

impl KimariteQuery {
    pub fn to_params(&self) -> Result<Vec<Param>> {
        self.page.validate()?;

        let mut params = Vec::new();
        if let Some(field) = self.sort_field {
            params.push(("sortField", field.as_str().to_string()));
        }
        if let Some(order) = self.sort_order {
            params.push(("sortOrder", order.as_str().to_string()));
        }
        self.page.push_params(&mut params);
        Ok(params)
    }
}

/// Options for listing the bouts won with one kimarite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KimariteMatchesQuery {
    pub sort_order: Option<SortOrder>,
    pub page: Pagination,
}

impl Default for KimariteMatchesQuery {
    fn default() -> Self {
        Self {
            sort_order: Some(SortOrder::Asc),
            page: Pagination::default(),
        }
    }
}

impl KimariteMatchesQuery {
    pub fn to_params(&self) -> Result<Vec<Param>> {
        self.page.validate()?;

        let mut params = Vec::new();
        if let Some(order) = self.sort_order {
            params.push(("sortOrder", order.as_str().to_string()));
        }
        self.page.push_params(&mut params);
        Ok(params)
    }
}

/// Selects rank, shikona or measurement history by basho and/or rikishi.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryQuery {
    pub basho_id: Option<String>,
    pub rikishi_id: Option<u32>,
    /// Client-side ordering by basho ID.
    pub sort_order: SortOrder,
}

impl HistoryQuery {
    pub fn for_rikishi(rikishi_id: u32) -> Self {
        Self {
            rikishi_id: Some(rikishi_id),
            ..Self::default()
        }
    }

    pub fn for_basho(basho_id: impl Into<String>) -> Self {
        Self {
            basho_id: Some(basho_id.into()),
            ..Self::default()
        }
    }

    pub fn sorted(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn to_params(&self) -> Result<Vec<Param>> {
        let basho_id = self.basho_id.as_deref().filter(|s| !s.is_empty());
        if basho_id.is_none() && self.rikishi_id.is_none() {
            return Err(Error::validation(
                "Either basho_id or rikishi_id must be provided",
            ));
        }

        let mut params = Vec::new();
        if let Some(basho) = basho_id {
            params.push(("bashoId", basho.parse::<BashoId>()?.to_string()));
        }
        if let Some(id) = self.rikishi_id {
            params.push(("rikishiId", validate_rikishi_id(id)?.to_string()));
        }
        Ok(params)
    }
}
