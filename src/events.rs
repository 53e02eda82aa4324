use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveTime;
use serde::{Deserialize, Deserializer};

pub const SHOT_TYPE: &str = "Shot";
pub const GOAL_OUTCOME: &str = "Goal";

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "team",
    "player",
    "type",
    "shot_outcome",
    "shot_statsbomb_xg",
    "possession_team",
    "duration",
    "timestamp",
];

/// Cell values read as "no value", the same set common dataframe readers use.
pub const NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TIMESTAMP_FORMAT: &str = "%H:%M:%S%.f";

pub fn is_null_marker(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || NULL_MARKERS.contains(&raw)
}

/// Expected-goals cell as read from the event log.
///
/// The loader never decides what a bad cell means; each aggregator picks its
/// own policy (team totals reject `Unparseable`, player contribution skips it).
#[derive(Debug, Clone, PartialEq)]
pub enum XgValue {
    Present(f64),
    Missing,
    Unparseable(String),
}

impl XgValue {
    pub fn from_cell(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !is_null_marker(s)) else {
            return XgValue::Missing;
        };
        match raw.parse::<f64>() {
            Ok(v) if v.is_nan() => XgValue::Missing,
            Ok(v) if v.is_finite() => XgValue::Present(v),
            _ => XgValue::Unparseable(raw.to_string()),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            XgValue::Present(v) => Some(*v),
            XgValue::Missing | XgValue::Unparseable(_) => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, XgValue::Present(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// 0-based data row; the tie-break for every ordering over events.
    pub index: usize,
    pub team: Option<String>,
    pub player: Option<String>,
    pub kind: Option<String>,
    pub shot_outcome: Option<String>,
    pub xg: XgValue,
    pub possession_team: Option<String>,
    pub duration: Option<f64>,
    pub timestamp: NaiveTime,
}

impl Event {
    pub fn is_shot(&self) -> bool {
        self.kind.as_deref() == Some(SHOT_TYPE)
    }

    pub fn is_goal(&self) -> bool {
        self.shot_outcome.as_deref() == Some(GOAL_OUTCOME)
    }

    /// xG this event adds to its team's running total.
    ///
    /// Non-shot rows and shots without a value add 0. A shot whose cell could
    /// not be read as a number is an error.
    pub fn team_xg(&self) -> Result<f64> {
        if !self.is_shot() {
            return Ok(0.0);
        }
        match &self.xg {
            XgValue::Present(v) => Ok(*v),
            XgValue::Missing => Ok(0.0),
            XgValue::Unparseable(raw) => Err(anyhow!(
                "event row {}: shot_statsbomb_xg `{raw}` is not numeric",
                self.index + 1
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    #[serde(deserialize_with = "nullable_text")]
    team: Option<String>,
    #[serde(deserialize_with = "nullable_text")]
    player: Option<String>,
    #[serde(rename = "type", deserialize_with = "nullable_text")]
    kind: Option<String>,
    #[serde(deserialize_with = "nullable_text")]
    shot_outcome: Option<String>,
    #[serde(deserialize_with = "nullable_text")]
    shot_statsbomb_xg: Option<String>,
    #[serde(deserialize_with = "nullable_text")]
    possession_team: Option<String>,
    #[serde(deserialize_with = "nullable_seconds")]
    duration: Option<f64>,
    timestamp: String,
}

fn nullable_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !is_null_marker(s)))
}

/// Null markers and non-finite values become `None`; any other non-number is an error.
fn nullable_seconds<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = nullable_text(deserializer)? else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| serde::de::Error::custom(format!("duration `{raw}` is not numeric")))?;
    Ok(value.is_finite().then_some(value))
}

impl EventRecord {
    fn into_event(self, index: usize) -> Result<Event> {
        let timestamp = parse_timestamp(&self.timestamp)
            .with_context(|| format!("event row {}", index + 1))?;
        Ok(Event {
            index,
            team: self.team,
            player: self.player,
            kind: self.kind,
            shot_outcome: self.shot_outcome,
            xg: XgValue::from_cell(self.shot_statsbomb_xg.as_deref()),
            possession_team: self.possession_team,
            duration: self.duration,
            timestamp,
        })
    }
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid timestamp `{raw}` (expected HH:MM:SS.ffffff)"))
}

/// Read-only event log, in ingestion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTable {
    events: Vec<Event>,
}

impl EventTable {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn shots(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| e.is_shot())
    }

    pub fn teams(&self) -> BTreeSet<&str> {
        self.events.iter().filter_map(|e| e.team.as_deref()).collect()
    }

    /// Events ordered by timestamp; equal timestamps keep ingestion order.
    pub fn chronological(&self) -> Vec<&Event> {
        let mut ordered: Vec<&Event> = self.events.iter().collect();
        ordered.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.index.cmp(&b.index))
        });
        ordered
    }
}

pub fn load_events(path: &Path) -> Result<EventTable> {
    let file = File::open(path)
        .with_context(|| format!("failed to open event log: {}", path.display()))?;
    parse_events_reader(file).with_context(|| format!("load events from {}", path.display()))
}

pub fn parse_events_csv(raw: &str) -> Result<EventTable> {
    parse_events_reader(raw.as_bytes())
}

pub fn parse_events_reader<R: Read>(reader: R) -> Result<EventTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().context("read header row")?.clone();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        bail!("missing required column(s): {}", missing.join(", "));
    }

    let mut events = Vec::new();
    for (index, record) in reader.deserialize::<EventRecord>().enumerate() {
        let record = record.with_context(|| format!("parse event row {}", index + 1))?;
        events.push(record.into_event(index)?);
    }
    Ok(EventTable::new(events))
}
