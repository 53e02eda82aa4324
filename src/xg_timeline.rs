use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{NaiveTime, Timelike};

use crate::events::EventTable;

pub const BUCKET_SECS: u32 = 60;

/// Running team xG right after one event, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativePoint {
    pub event_index: usize,
    pub team: String,
    pub minute: u32,
    pub cumulative_xg: f64,
}

/// Cumulative xG per team resampled onto one-minute buckets.
///
/// `minutes` is contiguous from the earliest to the latest event bucket. Each
/// team vector is aligned with it; `None` marks buckets before the team's
/// first event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CumulativeXgSeries {
    pub minutes: Vec<u32>,
    pub teams: BTreeMap<String, Vec<Option<f64>>>,
}

impl CumulativeXgSeries {
    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty() || self.teams.is_empty()
    }

    pub fn value_at(&self, team: &str, minute: u32) -> Option<f64> {
        let pos = self.minutes.iter().position(|m| *m == minute)?;
        self.teams.get(team)?.get(pos).copied().flatten()
    }

    pub fn final_value(&self, team: &str) -> Option<f64> {
        self.teams.get(team)?.iter().rev().find_map(|v| *v)
    }

    /// Defined (minute, xG) pairs for one team, ready for a line chart.
    pub fn chart_points(&self, team: &str) -> Vec<(f64, f64)> {
        let Some(values) = self.teams.get(team) else {
            return Vec::new();
        };
        self.minutes
            .iter()
            .zip(values)
            .filter_map(|(m, v)| v.map(|v| (*m as f64, v)))
            .collect()
    }

    pub fn max_value(&self) -> f64 {
        self.teams
            .values()
            .flatten()
            .filter_map(|v| *v)
            .fold(0.0, f64::max)
    }
}

pub fn minute_bucket(timestamp: NaiveTime) -> u32 {
    timestamp.num_seconds_from_midnight() / BUCKET_SECS
}

pub fn cumulative_xg_points(table: &EventTable) -> Result<Vec<CumulativePoint>> {
    let mut running: BTreeMap<&str, f64> = BTreeMap::new();
    let mut points = Vec::new();
    for event in table.chronological() {
        let Some(team) = event.team.as_deref() else { continue };
        let total = running.entry(team).or_insert(0.0);
        *total += event.team_xg()?;
        points.push(CumulativePoint {
            event_index: event.index,
            team: team.to_string(),
            minute: minute_bucket(event.timestamp),
            cumulative_xg: *total,
        });
    }
    Ok(points)
}

pub fn compute_cumulative_xg(table: &EventTable) -> Result<CumulativeXgSeries> {
    let points = cumulative_xg_points(table)?;
    let (Some(first), Some(last)) = (
        points.iter().map(|p| p.minute).min(),
        points.iter().map(|p| p.minute).max(),
    ) else {
        return Ok(CumulativeXgSeries::default());
    };

    let mut bucket_max: BTreeMap<String, BTreeMap<u32, f64>> = BTreeMap::new();
    for point in &points {
        let slot = bucket_max
            .entry(point.team.clone())
            .or_default()
            .entry(point.minute)
            .or_insert(point.cumulative_xg);
        *slot = slot.max(point.cumulative_xg);
    }

    let minutes: Vec<u32> = (first..=last).collect();
    let teams = bucket_max
        .into_iter()
        .map(|(team, by_minute)| {
            let filled = forward_fill(&minutes, &by_minute);
            (team, filled)
        })
        .collect();

    Ok(CumulativeXgSeries { minutes, teams })
}

fn forward_fill(minutes: &[u32], by_minute: &BTreeMap<u32, f64>) -> Vec<Option<f64>> {
    minutes
        .iter()
        .scan(None, |last: &mut Option<f64>, minute| {
            if let Some(v) = by_minute.get(minute) {
                *last = Some(*v);
            }
            Some(*last)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_fill_leaves_leading_gap_undefined() {
        let minutes = vec![0, 1, 2, 3, 4];
        let by_minute = BTreeMap::from([(1, 0.2), (3, 0.5)]);
        assert_eq!(
            forward_fill(&minutes, &by_minute),
            vec![None, Some(0.2), Some(0.2), Some(0.5), Some(0.5)]
        );
    }

    #[test]
    fn bucket_counts_whole_minutes_past_the_hour() {
        let t = NaiveTime::from_hms_opt(1, 32, 59).unwrap();
        assert_eq!(minute_bucket(t), 92);
    }
}
