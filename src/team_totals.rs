use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;

use crate::events::{Event, EventTable};

/// Per-team goal, shot and xG mappings.
///
/// A team with no qualifying events is absent from the goal/shot mapping
/// rather than present with 0, so callers must handle missing keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamTotals {
    pub goals: BTreeMap<String, usize>,
    pub shots: BTreeMap<String, usize>,
    pub xg: BTreeMap<String, f64>,
}

impl TeamTotals {
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty() && self.shots.is_empty() && self.xg.is_empty()
    }

    /// Union of team names across all three mappings.
    pub fn teams(&self) -> BTreeSet<&str> {
        self.goals
            .keys()
            .chain(self.shots.keys())
            .chain(self.xg.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn goals_for(&self, team: &str) -> Option<usize> {
        self.goals.get(team).copied()
    }

    pub fn shots_for(&self, team: &str) -> Option<usize> {
        self.shots.get(team).copied()
    }

    pub fn xg_for(&self, team: &str) -> Option<f64> {
        self.xg.get(team).copied()
    }
}

pub fn goals_by_team(table: &EventTable) -> BTreeMap<String, usize> {
    count_by_team(table, |e| e.is_goal())
}

pub fn shots_by_team(table: &EventTable) -> BTreeMap<String, usize> {
    count_by_team(table, |e| e.is_shot())
}

/// Sum of shot xG per team. Every team owning at least one event is listed.
pub fn xg_by_team(table: &EventTable) -> Result<BTreeMap<String, f64>> {
    let mut out: BTreeMap<String, f64> = BTreeMap::new();
    for event in table.iter() {
        let Some(team) = event.team.as_deref() else { continue };
        let xg = event.team_xg()?;
        *out.entry(team.to_string()).or_insert(0.0) += xg;
    }
    Ok(out)
}

pub fn compute_team_totals(table: &EventTable) -> Result<TeamTotals> {
    Ok(TeamTotals {
        goals: goals_by_team(table),
        shots: shots_by_team(table),
        xg: xg_by_team(table)?,
    })
}

fn count_by_team(
    table: &EventTable,
    qualifies: impl Fn(&Event) -> bool,
) -> BTreeMap<String, usize> {
    let mut out: BTreeMap<String, usize> = BTreeMap::new();
    for event in table.iter().filter(|&e| qualifies(e)) {
        let Some(team) = event.team.as_deref() else { continue };
        *out.entry(team.to_string()).or_insert(0) += 1;
    }
    out
}
