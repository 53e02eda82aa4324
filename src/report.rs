use crate::match_stats::MatchStats;
use crate::player_xg::PlayerXg;
use crate::possession::PossessionShare;
use crate::team_totals::TeamTotals;
use crate::xg_timeline::CumulativeXgSeries;

pub const NOT_AVAILABLE: &str = "n/a";

pub fn not_available(metric: &str) -> String {
    format!("{metric} data not available")
}

pub fn format_count(value: Option<usize>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_xg(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}%"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// One line per team: goals, shots and xG, with `n/a` for absent entries.
pub fn team_totals_lines(totals: &TeamTotals) -> Vec<String> {
    let teams = totals.teams();
    if teams.is_empty() {
        return vec![not_available("Team")];
    }
    let width = teams.iter().map(|t| t.chars().count()).max().unwrap_or(4).max(4);
    let mut lines = vec![format!(
        "{:<width$}  {:>5}  {:>5}  {:>6}",
        "Team", "Goals", "Shots", "xG"
    )];
    for team in teams {
        lines.push(format!(
            "{:<width$}  {:>5}  {:>5}  {:>6}",
            team,
            format_count(totals.goals_for(team)),
            format_count(totals.shots_for(team)),
            format_xg(totals.xg_for(team)),
        ));
    }
    lines
}

pub fn possession_lines(possession: Option<&PossessionShare>) -> Vec<String> {
    let Some(possession) = possession else {
        return vec![not_available("Possession")];
    };
    let width = possession
        .shares
        .keys()
        .map(|t| t.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    possession
        .shares
        .iter()
        .map(|(team, pct)| format!("{team:<width$}  {:>7}", format_pct(Some(*pct))))
        .collect()
}

pub fn timeline_lines(timeline: &CumulativeXgSeries) -> Vec<String> {
    if timeline.is_empty() {
        return vec![not_available("Cumulative xG")];
    }
    let teams: Vec<&String> = timeline.teams.keys().collect();
    let width = teams.iter().map(|t| t.chars().count()).max().unwrap_or(4).max(6);
    let mut header = format!("{:>4}", "Min");
    for team in &teams {
        header.push_str(&format!("  {team:>width$}"));
    }
    let mut lines = vec![header];
    for (pos, minute) in timeline.minutes.iter().enumerate() {
        let mut line = format!("{minute:>4}");
        for team in &teams {
            let value = timeline.teams[*team].get(pos).copied().flatten();
            let cell = value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string());
            line.push_str(&format!("  {cell:>width$}"));
        }
        lines.push(line);
    }
    lines
}

pub fn player_label(row: &PlayerXg) -> String {
    match row.team.as_deref() {
        Some(team) => format!("{} ({team})", row.player),
        None => row.player.clone(),
    }
}

pub fn player_lines(players: &[PlayerXg]) -> Vec<String> {
    if players.is_empty() {
        return vec![not_available("Player xG")];
    }
    let labels: Vec<String> = players.iter().map(player_label).collect();
    let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(6).max(6);
    players
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(rank, (row, label))| {
            let note = if row.xg_unknown() {
                "  (xG unknown)".to_string()
            } else if row.has_missing_xg() {
                format!("  ({} of {} shots without xG)", row.missing_xg, row.shots)
            } else {
                String::new()
            };
            format!(
                "{:>3}. {label:<width$}  {:>5.2}  {} shots{note}",
                rank + 1,
                row.total_xg,
                row.shots
            )
        })
        .collect()
}

/// Full plain-text rendering of every aggregate.
pub fn render_text(stats: &MatchStats) -> String {
    let mut out = Vec::new();
    out.push(format!("Events: {}  Shots: {}", stats.events, stats.shots));
    out.push(String::new());
    out.push("== Team Summary ==".to_string());
    out.extend(team_totals_lines(&stats.totals));
    out.push(String::new());
    out.push("== Possession Share ==".to_string());
    out.extend(possession_lines(stats.possession.as_ref()));
    out.push(String::new());
    out.push("== Cumulative xG ==".to_string());
    out.extend(timeline_lines(&stats.timeline));
    out.push(String::new());
    out.push("== Player xG Contribution ==".to_string());
    out.extend(player_lines(&stats.players));
    out.join("\n")
}
