//! Raw payload shapes that need reshaping before they become public records.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::de;
use super::params::{BashoId, Division, Side, SortOrder};
use super::types::{
    Banzuke, BanzukeBout, BanzukeEntry, BashoScoped, Bout, BoutResult, PrizeWinner, Torikumi,
};
use crate::error::{Error, Result};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBanzuke {
    #[serde(default, deserialize_with = "de::null_as_default")]
    east: Vec<RawBanzukeEntry>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    west: Vec<RawBanzukeEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawBanzukeEntry {
    #[serde(rename = "rikishiID", alias = "rikishiId", deserialize_with = "de::id")]
    rikishi_id: u32,
    shikona_en: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    shikona_jp: Option<String>,
    #[serde(default)]
    rank_value: Option<u32>,
    rank: String,
    #[serde(default)]
    wins: u32,
    #[serde(default)]
    losses: u32,
    #[serde(default)]
    absences: u32,
    #[serde(default, deserialize_with = "de::null_as_default")]
    record: Vec<RawBanzukeBout>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawBanzukeBout {
    #[serde(default)]
    day: Option<u32>,
    result: BoutResult,
    #[serde(
        default,
        rename = "opponentID",
        alias = "opponentId",
        deserialize_with = "de::opt_id"
    )]
    opponent_id: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_text")]
    opponent_shikona_en: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    opponent_shikona_jp: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    kimarite: Option<String>,
}

impl RawBanzuke {
    /// Merges east and west into one list, tagging each entry with its side
    /// and each day of its record with the basho and day number.
    pub(crate) fn normalize(self, basho: BashoId, division: Division) -> Banzuke {
        let basho_id = basho.to_string();
        let east = self.east.into_iter().map(|e| (Side::East, e));
        let west = self.west.into_iter().map(|e| (Side::West, e));

        let rikishi = east
            .chain(west)
            .map(|(side, entry)| entry.normalize(side, &basho_id))
            .collect();

        Banzuke {
            basho_id,
            division,
            rikishi,
        }
    }
}

impl RawBanzukeEntry {
    fn normalize(self, side: Side, basho_id: &str) -> BanzukeEntry {
        let bouts = self
            .record
            .into_iter()
            .enumerate()
            .map(|(index, bout)| BanzukeBout {
                basho_id: basho_id.to_string(),
                day: bout.day.unwrap_or(index as u32 + 1),
                result: bout.result,
                opponent_id: bout.opponent_id,
                opponent_shikona_en: bout.opponent_shikona_en,
                opponent_shikona_jp: bout.opponent_shikona_jp,
                kimarite: bout.kimarite,
            })
            .collect();

        BanzukeEntry {
            side,
            rikishi_id: self.rikishi_id,
            shikona_en: self.shikona_en,
            shikona_jp: self.shikona_jp,
            rank_value: self.rank_value,
            rank: self.rank,
            wins: self.wins,
            losses: self.losses,
            absences: self.absences,
            bouts,
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawTorikumi {
    #[serde(default)]
    basho_id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    location: Option<String>,
    #[serde(default)]
    start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    yusho: Vec<PrizeWinner>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    special_prizes: Vec<PrizeWinner>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    torikumi: Vec<Value>,
}

impl RawTorikumi {
    /// Builds the day's schedule. Bouts missing the basho, division or day
    /// inherit them from the request.
    pub(crate) fn normalize(self, basho: BashoId, division: Division, day: u32) -> Result<Torikumi> {
        let basho_id = self
            .basho_id
            .filter(|s| !s.is_empty())
            .or(self.date.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| basho.to_string());

        let matches = self
            .torikumi
            .into_iter()
            .map(|mut bout| {
                if let Value::Object(fields) = &mut bout {
                    fields
                        .entry("bashoId")
                        .or_insert_with(|| Value::from(basho_id.clone()));
                    fields
                        .entry("division")
                        .or_insert_with(|| Value::from(division.as_str()));
                    fields.entry("day").or_insert_with(|| Value::from(day));
                }
                serde_json::from_value::<Bout>(bout).map_err(Error::from_json)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Torikumi {
            basho_id,
            division,
            day,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            yusho: self.yusho,
            special_prizes: self.special_prizes,
            matches,
        })
    }
}

/// Orders history records by basho ID. Basho IDs are fixed-width, so the
/// string order is the chronological order.
pub(crate) fn sort_by_basho<T: BashoScoped>(records: &mut [T], order: SortOrder) {
    match order {
        SortOrder::Asc => records.sort_by(|a, b| a.basho_id().cmp(b.basho_id())),
        SortOrder::Desc => records.sort_by(|a, b| b.basho_id().cmp(a.basho_id())),
    }
}
