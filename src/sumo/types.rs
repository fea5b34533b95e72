//! Records returned by the typed endpoints.
//!
//! Field names follow Rust conventions. Deserialization reads the API's
//! camelCase names; serialization writes the snake_case names below.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::de;
use super::params::{Division, Side};

/// Anything that belongs to a single basho, used for client-side ordering.
pub trait BashoScoped {
    fn basho_id(&self) -> &str;
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Rikishi {
    pub id: u32,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub sumodb_id: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub nsk_id: Option<u32>,
    pub shikona_en: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub shikona_jp: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub current_rank: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub heya: Option<String>,
    #[serde(default)]
    pub birth_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub shusshin: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub debut: Option<String>,
    /// Retirement date, for rikishi no longer active.
    #[serde(default)]
    pub intai: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rank_history: Option<Vec<RankRecord>>,
    #[serde(default)]
    pub shikona_history: Option<Vec<ShikonaRecord>>,
    #[serde(default)]
    pub measurement_history: Option<Vec<Measurement>>,
}

impl Rikishi {
    pub fn is_retired(&self) -> bool {
        self.intai.is_some()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RikishiList {
    pub limit: u32,
    pub skip: u32,
    pub total: u32,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub records: Vec<Rikishi>,
}

/// Per-division counters, keyed by [`Division`].
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all(deserialize = "PascalCase"))]
pub struct DivisionStats {
    #[serde(default)]
    pub makuuchi: u32,
    #[serde(default)]
    pub juryo: u32,
    #[serde(default)]
    pub makushita: u32,
    #[serde(default)]
    pub sandanme: u32,
    #[serde(default)]
    pub jonidan: u32,
    #[serde(default)]
    pub jonokuchi: u32,
}

impl DivisionStats {
    pub fn get(&self, division: Division) -> u32 {
        match division {
            Division::Makuuchi => self.makuuchi,
            Division::Juryo => self.juryo,
            Division::Makushita => self.makushita,
            Division::Sandanme => self.sandanme,
            Division::Jonidan => self.jonidan,
            Division::Jonokuchi => self.jonokuchi,
        }
    }

    pub fn total(&self) -> u32 {
        Division::ALL.iter().map(|d| self.get(*d)).sum()
    }
}

/// Special prize counts.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sansho {
    #[serde(default, rename(deserialize = "Gino-sho"))]
    pub gino_sho: u32,
    #[serde(default, rename(deserialize = "Kanto-sho"))]
    pub kanto_sho: u32,
    #[serde(default, rename(deserialize = "Shukun-sho"))]
    pub shukun_sho: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct RikishiStats {
    pub basho: u32,
    pub total_matches: u32,
    pub total_wins: u32,
    pub total_losses: u32,
    pub total_absences: u32,
    pub yusho: u32,
    #[serde(default)]
    pub absence_by_division: DivisionStats,
    #[serde(default)]
    pub basho_by_division: DivisionStats,
    #[serde(default)]
    pub loss_by_division: DivisionStats,
    #[serde(default)]
    pub total_by_division: DivisionStats,
    #[serde(default)]
    pub wins_by_division: DivisionStats,
    #[serde(default)]
    pub yusho_by_division: DivisionStats,
    #[serde(default)]
    pub sansho: Sansho,
}

/// A yusho or special prize winner.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct PrizeWinner {
    /// Division name for a yusho, prize name for a sansho.
    #[serde(rename(deserialize = "type"))]
    pub kind: String,
    #[serde(deserialize_with = "de::id")]
    pub rikishi_id: u32,
    pub shikona_en: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub shikona_jp: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Basho {
    #[serde(rename(deserialize = "date"))]
    pub basho_id: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub location: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub yusho: Vec<PrizeWinner>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub special_prizes: Vec<PrizeWinner>,
}

impl Basho {
    /// Yusho winner of one division, if recorded.
    pub fn yusho_winner(&self, division: Division) -> Option<&PrizeWinner> {
        self.yusho.iter().find(|w| w.kind == division.as_str())
    }
}

impl BashoScoped for Basho {
    fn basho_id(&self) -> &str {
        &self.basho_id
    }
}

/// Outcome of one day on a rikishi's banzuke record.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoutResult {
    #[serde(rename = "win")]
    Win,
    #[serde(rename = "loss")]
    Loss,
    #[serde(rename = "absent")]
    Absent,
    #[serde(rename = "fusen win")]
    FusenWin,
    #[serde(rename = "fusen loss")]
    FusenLoss,
}

impl BoutResult {
    pub fn is_win(&self) -> bool {
        matches!(self, BoutResult::Win | BoutResult::FusenWin)
    }
}

/// One day of a banzuke record, with the basho and day filled in.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BanzukeBout {
    pub basho_id: String,
    pub day: u32,
    pub result: BoutResult,
    pub opponent_id: Option<u32>,
    pub opponent_shikona_en: Option<String>,
    pub opponent_shikona_jp: Option<String>,
    pub kimarite: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BanzukeEntry {
    pub side: Side,
    pub rikishi_id: u32,
    pub shikona_en: String,
    pub shikona_jp: Option<String>,
    pub rank_value: Option<u32>,
    pub rank: String,
    pub wins: u32,
    pub losses: u32,
    pub absences: u32,
    pub bouts: Vec<BanzukeBout>,
}

/// Ranked roster of one division, east and west merged in listing order.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Banzuke {
    pub basho_id: String,
    pub division: Division,
    pub rikishi: Vec<BanzukeEntry>,
}

impl Banzuke {
    pub fn side(&self, side: Side) -> impl Iterator<Item = &BanzukeEntry> {
        self.rikishi.iter().filter(move |r| r.side == side)
    }

    pub fn find(&self, rikishi_id: u32) -> Option<&BanzukeEntry> {
        self.rikishi.iter().find(|r| r.rikishi_id == rikishi_id)
    }
}

/// A single bout. Every match-shaped payload maps to this record.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Bout {
    #[serde(default, deserialize_with = "de::opt_text")]
    pub id: Option<String>,
    pub basho_id: String,
    #[serde(default)]
    pub division: Option<Division>,
    pub day: u32,
    #[serde(default)]
    pub match_no: Option<u32>,
    #[serde(deserialize_with = "de::id")]
    pub east_id: u32,
    pub east_shikona: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub east_rank: Option<String>,
    #[serde(deserialize_with = "de::id")]
    pub west_id: u32,
    pub west_shikona: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub west_rank: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub kimarite: Option<String>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub winner_id: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub winner_en: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub winner_jp: Option<String>,
}

impl Bout {
    pub fn involves(&self, rikishi_id: u32) -> bool {
        self.east_id == rikishi_id || self.west_id == rikishi_id
    }

    /// The other side of the bout, if `rikishi_id` fought in it.
    pub fn opponent_of(&self, rikishi_id: u32) -> Option<u32> {
        if self.east_id == rikishi_id {
            Some(self.west_id)
        } else if self.west_id == rikishi_id {
            Some(self.east_id)
        } else {
            None
        }
    }

    pub fn loser_id(&self) -> Option<u32> {
        self.winner_id.and_then(|w| self.opponent_of(w))
    }
}

impl BashoScoped for Bout {
    fn basho_id(&self) -> &str {
        &self.basho_id
    }
}

/// Schedule and results of one division on one day.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Torikumi {
    pub basho_id: String,
    pub division: Division,
    pub day: u32,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub yusho: Vec<PrizeWinner>,
    pub special_prizes: Vec<PrizeWinner>,
    pub matches: Vec<Bout>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RikishiMatches {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub skip: u32,
    pub total: u32,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub records: Vec<Bout>,
}

/// Head-to-head record between two rikishi.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct OpponentMatches {
    pub total: u32,
    pub rikishi_wins: u32,
    pub opponent_wins: u32,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub kimarite_wins: BTreeMap<String, u32>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub kimarite_losses: BTreeMap<String, u32>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub matches: Vec<Bout>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct KimariteUsage {
    pub kimarite: String,
    pub count: u32,
    /// Most recent use, as `YYYYMM-D`.
    #[serde(default)]
    pub last_usage: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct KimariteStats {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_order: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub records: Vec<KimariteUsage>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct KimariteMatches {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub skip: u32,
    pub total: u32,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub records: Vec<Bout>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Measurement {
    pub id: String,
    pub basho_id: String,
    #[serde(deserialize_with = "de::id")]
    pub rikishi_id: u32,
    pub height: f64,
    pub weight: f64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct RankRecord {
    pub id: String,
    pub basho_id: String,
    #[serde(deserialize_with = "de::id")]
    pub rikishi_id: u32,
    #[serde(default)]
    pub rank_value: Option<u32>,
    pub rank: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct ShikonaRecord {
    pub id: String,
    pub basho_id: String,
    #[serde(deserialize_with = "de::id")]
    pub rikishi_id: u32,
    pub shikona_en: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub shikona_jp: Option<String>,
}

impl BashoScoped for Measurement {
    fn basho_id(&self) -> &str {
        &self.basho_id
    }
}

impl BashoScoped for RankRecord {
    fn basho_id(&self) -> &str {
        &self.basho_id
    }
}

impl BashoScoped for ShikonaRecord {
    fn basho_id(&self) -> &str {
        &self.basho_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_rikishi_renames_fields() {
        let rikishi: Rikishi = serde_json::from_str(
            r#"{
                "id": 1511,
                "sumodbId": 11927,
                "nskId": 3321,
                "shikonaEn": "Terunofuji Haruo",
                "shikonaJp": "照ノ富士　春雄",
                "currentRank": "Yokozuna 1 East",
                "heya": "Isegahama",
                "birthDate": "1991-11-29T00:00:00Z",
                "shusshin": "Mongolia, Ulaanbaatar",
                "height": 192,
                "weight": 176.5,
                "debut": "201101",
                "updatedAt": "2024-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();

        assert_eq!(rikishi.id, 1511);
        assert_eq!(rikishi.sumodb_id, Some(11927));
        assert_eq!(rikishi.shikona_en, "Terunofuji Haruo");
        assert_eq!(rikishi.current_rank.as_deref(), Some("Yokozuna 1 East"));
        assert_eq!(
            rikishi.birth_date,
            Some(Utc.with_ymd_and_hms(1991, 11, 29, 0, 0, 0).unwrap())
        );
        assert_eq!(rikishi.height, Some(192.0));
        assert_eq!(rikishi.weight, Some(176.5));
        assert!(!rikishi.is_retired());
        assert!(rikishi.rank_history.is_none());
    }

    #[test]
    fn test_rikishi_serializes_snake_case() {
        let rikishi: Rikishi =
            serde_json::from_str(r#"{"id": 1, "shikonaEn": "Hakuho Sho"}"#).unwrap();
        let value = serde_json::to_value(&rikishi).unwrap();
        assert_eq!(value["shikona_en"], "Hakuho Sho");
        assert!(value.get("shikonaEn").is_none());
    }

    #[test]
    fn test_rikishi_missing_shikona_is_decode_error() {
        assert!(serde_json::from_str::<Rikishi>(r#"{"id": 1}"#).is_err());
    }

    #[test]
    fn test_stats_division_lookup_and_sansho() {
        let stats: RikishiStats = serde_json::from_str(
            r#"{
                "basho": 10,
                "totalMatches": 80,
                "totalWins": 39,
                "totalLosses": 41,
                "totalAbsences": 1,
                "yusho": 1,
                "winsByDivision": {"Makuuchi": 15, "Juryo": 10, "Makushita": 7,
                                   "Sandanme": 0, "Jonidan": 5, "Jonokuchi": 2},
                "absenceByDivision": {"Makuuchi": 1},
                "sansho": {"Gino-sho": 1, "Kanto-sho": 2, "Shukun-sho": 1}
            }"#,
        )
        .unwrap();

        assert_eq!(stats.wins_by_division.get(Division::Makuuchi), 15);
        assert_eq!(stats.wins_by_division.get(Division::Jonokuchi), 2);
        assert_eq!(stats.wins_by_division.total(), 39);
        assert_eq!(stats.absence_by_division.get(Division::Juryo), 0);
        assert_eq!(stats.sansho.kanto_sho, 2);
        assert_eq!(stats.yusho_by_division, DivisionStats::default());
    }

    #[test]
    fn test_basho_date_becomes_basho_id() {
        let basho: Basho = serde_json::from_str(
            r#"{
                "date": "202305",
                "location": "Tokyo, Ryogoku Kokugikan",
                "startDate": "2023-05-14T00:00:00Z",
                "endDate": "2023-05-28T00:00:00Z",
                "yusho": [
                    {"type": "Makuuchi", "rikishiId": 45,
                     "shikonaEn": "Terunofuji Haruo", "shikonaJp": "照ノ富士　春雄"}
                ],
                "specialPrizes": [
                    {"type": "Shukun-sho", "rikishiId": "38", "shikonaEn": "Meisei Chikara"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(basho.basho_id, "202305");
        assert_eq!(
            basho.yusho_winner(Division::Makuuchi).map(|w| w.rikishi_id),
            Some(45)
        );
        assert!(basho.yusho_winner(Division::Juryo).is_none());
        assert_eq!(basho.special_prizes[0].rikishi_id, 38);
        assert_eq!(basho.special_prizes[0].kind, "Shukun-sho");
        assert_eq!(basho.special_prizes[0].shikona_jp, None);
    }

    #[test]
    fn test_bout_accepts_string_ids() {
        let bout: Bout = serde_json::from_str(
            r#"{
                "kimarite": "yorikiri",
                "bashoId": "202401",
                "day": 1,
                "matchNo": 1,
                "eastId": "1",
                "eastShikona": "Test East",
                "eastRank": "M1",
                "westId": "2",
                "westShikona": "Test West",
                "westRank": "M2",
                "winnerId": "1",
                "winnerEn": "Test East",
                "winnerJp": "テスト東"
            }"#,
        )
        .unwrap();

        assert_eq!(bout.east_id, 1);
        assert_eq!(bout.west_id, 2);
        assert_eq!(bout.winner_id, Some(1));
        assert_eq!(bout.loser_id(), Some(2));
        assert_eq!(bout.opponent_of(2), Some(1));
        assert_eq!(bout.opponent_of(3), None);
        assert!(bout.involves(1));
        assert_eq!(bout.division, None);
    }

    #[test]
    fn test_bout_unknown_division_is_rejected() {
        let result = serde_json::from_str::<Bout>(
            r#"{"bashoId": "202401", "division": "Maezumo", "day": 1,
                "eastId": 1, "eastShikona": "A", "westId": 2, "westShikona": "B"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_bout_result_names() {
        let results: Vec<BoutResult> =
            serde_json::from_str(r#"["win", "loss", "absent", "fusen win", "fusen loss"]"#)
                .unwrap();
        assert_eq!(
            results,
            vec![
                BoutResult::Win,
                BoutResult::Loss,
                BoutResult::Absent,
                BoutResult::FusenWin,
                BoutResult::FusenLoss
            ]
        );
        assert!(BoutResult::FusenWin.is_win());
        assert!(!BoutResult::Absent.is_win());
    }

    #[test]
    fn test_opponent_matches_maps() {
        let matches: OpponentMatches = serde_json::from_str(
            r#"{
                "matches": [],
                "kimariteLosses": {"abisetaoshi": 1, "hatakikomi": 2},
                "kimariteWins": {"oshidashi": 4},
                "opponentWins": 8,
                "rikishiWins": 5,
                "total": 13
            }"#,
        )
        .unwrap();

        assert_eq!(matches.total, 13);
        assert_eq!(matches.kimarite_losses.get("hatakikomi"), Some(&2));
        assert_eq!(matches.kimarite_wins.len(), 1);
    }
}
