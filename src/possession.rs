use std::collections::BTreeMap;

use crate::events::EventTable;

#[derive(Debug, Clone, PartialEq)]
pub struct PossessionShare {
    /// Percent of total possession time, rounded to 2 decimals.
    pub shares: BTreeMap<String, f64>,
    pub total_secs: f64,
}

impl PossessionShare {
    pub fn share_for(&self, team: &str) -> Option<f64> {
        self.shares.get(team).copied()
    }

    pub fn total_pct(&self) -> f64 {
        self.shares.values().sum()
    }
}

pub fn possession_secs_by_team(table: &EventTable) -> BTreeMap<String, f64> {
    let mut out: BTreeMap<String, f64> = BTreeMap::new();
    for event in table.iter() {
        let Some(team) = event.possession_team.as_deref() else { continue };
        let secs = event.duration.filter(|d| d.is_finite()).unwrap_or(0.0);
        *out.entry(team.to_string()).or_insert(0.0) += secs;
    }
    out
}

/// Possession share per team, or `None` when there is no possession time to
/// normalise against.
pub fn compute_possession_share(table: &EventTable) -> Option<PossessionShare> {
    let secs = possession_secs_by_team(table);
    let total_secs: f64 = secs.values().sum();
    if !total_secs.is_finite() || total_secs <= 0.0 {
        return None;
    }
    let shares = secs
        .into_iter()
        .map(|(team, s)| (team, round2(s / total_secs * 100.0)))
        .collect();
    Some(PossessionShare { shares, total_secs })
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
