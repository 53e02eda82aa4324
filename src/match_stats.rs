use std::path::Path;

use anyhow::{Context, Result};

use crate::events::{self, EventTable};
use crate::player_xg::{self, PlayerXg};
use crate::possession::{self, PossessionShare};
use crate::team_totals::{self, TeamTotals};
use crate::xg_timeline::{self, CumulativeXgSeries};

/// Every aggregate derived from one event log.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchStats {
    pub events: usize,
    pub shots: usize,
    pub totals: TeamTotals,
    pub possession: Option<PossessionShare>,
    pub timeline: CumulativeXgSeries,
    pub players: Vec<PlayerXg>,
}

impl MatchStats {
    pub fn compute(table: &EventTable) -> Result<Self> {
        let totals = team_totals::compute_team_totals(table).context("team totals")?;
        let possession = possession::compute_possession_share(table);
        let timeline = xg_timeline::compute_cumulative_xg(table).context("cumulative xG")?;
        let players = player_xg::compute_player_xg(table);
        Ok(Self {
            events: table.len(),
            shots: table.shots().count(),
            totals,
            possession,
            timeline,
            players,
        })
    }

    /// All teams seen by any aggregate, sorted.
    pub fn teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = self
            .totals
            .teams()
            .into_iter()
            .map(str::to_string)
            .collect();
        let extra = self
            .possession
            .iter()
            .flat_map(|p| p.shares.keys())
            .chain(self.timeline.teams.keys());
        for team in extra {
            if !teams.contains(team) {
                teams.push(team.clone());
            }
        }
        teams.sort();
        teams
    }

    pub fn shots_missing_xg(&self) -> usize {
        self.players.iter().map(|p| p.missing_xg).sum()
    }
}

pub fn load_match_stats(path: &Path) -> Result<MatchStats> {
    let table = events::load_events(path)?;
    MatchStats::compute(&table)
}
