use std::collections::HashMap;

use crate::events::{EventTable, XgValue};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerXg {
    pub player: String,
    /// Team of the player's first shot.
    pub team: Option<String>,
    pub total_xg: f64,
    pub shots: usize,
    /// Shots whose xG cell was empty or not numeric. They add 0 to `total_xg`.
    pub missing_xg: usize,
}

impl PlayerXg {
    pub fn has_missing_xg(&self) -> bool {
        self.missing_xg > 0
    }

    /// True when none of the player's shots carried a usable xG value, so a 0
    /// total means "unknown" rather than "no threat".
    pub fn xg_unknown(&self) -> bool {
        self.shots > 0 && self.missing_xg == self.shots
    }
}

/// Total shot xG per player, highest first. Equal totals keep the order in
/// which players first appear in the event log.
pub fn compute_player_xg(table: &EventTable) -> Vec<PlayerXg> {
    let mut rows: Vec<PlayerXg> = Vec::new();
    let mut slot_by_player: HashMap<&str, usize> = HashMap::new();

    for event in table.shots() {
        let Some(player) = event.player.as_deref() else { continue };
        let slot = *slot_by_player.entry(player).or_insert_with(|| {
            rows.push(PlayerXg {
                player: player.to_string(),
                team: event.team.clone(),
                total_xg: 0.0,
                shots: 0,
                missing_xg: 0,
            });
            rows.len() - 1
        });
        let row = &mut rows[slot];
        row.shots += 1;
        match &event.xg {
            XgValue::Present(v) => row.total_xg += v,
            XgValue::Missing | XgValue::Unparseable(_) => row.missing_xg += 1,
        }
    }

    rows.sort_by(|a, b| b.total_xg.total_cmp(&a.total_xg));
    rows
}
