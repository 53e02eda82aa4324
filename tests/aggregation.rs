use std::collections::BTreeMap;
use std::path::PathBuf;

use xg_terminal::events::{EventTable, load_events, parse_events_csv};
use xg_terminal::match_stats::MatchStats;
use xg_terminal::player_xg::compute_player_xg;
use xg_terminal::possession::compute_possession_share;
use xg_terminal::team_totals::{compute_team_totals, goals_by_team, xg_by_team};
use xg_terminal::xg_timeline::{compute_cumulative_xg, cumulative_xg_points};

fn load_fixture(name: &str) -> EventTable {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    load_events(&path).expect("fixture should load")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn team_totals_for_two_team_match() {
    let table = load_fixture("two_teams.csv");
    let totals = compute_team_totals(&table).expect("totals should compute");

    assert_eq!(
        totals.goals,
        BTreeMap::from([("A".to_string(), 2), ("B".to_string(), 1)])
    );
    assert_eq!(
        totals.shots,
        BTreeMap::from([("A".to_string(), 5), ("B".to_string(), 3)])
    );
    assert_close(totals.xg_for("A").unwrap(), 0.4);
    assert_close(totals.xg_for("B").unwrap(), 0.2);

    let goal_events = table.iter().filter(|e| e.is_goal()).count();
    assert_eq!(totals.goals.values().sum::<usize>(), goal_events);
}

#[test]
fn team_without_goals_is_absent_not_zero() {
    let table = load_fixture("unsorted.csv");
    let goals = goals_by_team(&table);
    assert_eq!(goals.get("Home"), Some(&1));
    assert!(!goals.contains_key("Away"));
}

#[test]
fn unparseable_xg_on_a_shot_fails_team_xg() {
    let raw = "team,player,type,shot_outcome,shot_statsbomb_xg,possession_team,duration,timestamp\n\
               A,A1,Shot,Saved,oops,A,1.0,00:00:01.000\n";
    let table = parse_events_csv(raw).expect("loader keeps raw xG");
    assert!(xg_by_team(&table).is_err());
    assert!(compute_cumulative_xg(&table).is_err());

    let players = compute_player_xg(&table);
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].missing_xg, 1);
    assert!(players[0].xg_unknown());
}

#[test]
fn xg_on_non_shot_rows_is_ignored() {
    let raw = "team,player,type,shot_outcome,shot_statsbomb_xg,possession_team,duration,timestamp\n\
               A,A1,Pass,,0.9,A,1.0,00:00:01.000\n\
               A,A1,Shot,Saved,0.2,A,1.0,00:00:02.000\n";
    let table = parse_events_csv(raw).expect("rows should parse");
    let xg = xg_by_team(&table).expect("xG should sum");
    assert_close(xg["A"], 0.2);
}

#[test]
fn possession_share_splits_sixty_forty() {
    let table = load_fixture("two_teams.csv");
    let share = compute_possession_share(&table).expect("possession is defined");
    assert_eq!(share.share_for("A"), Some(60.0));
    assert_eq!(share.share_for("B"), Some(40.0));
    assert_close(share.total_secs, 1000.0);
}

#[test]
fn possession_percentages_sum_to_hundred() {
    let table = load_fixture("unsorted.csv");
    let share = compute_possession_share(&table).expect("possession is defined");
    assert_eq!(share.share_for("Home"), Some(61.62));
    assert_eq!(share.share_for("Away"), Some(38.38));
    let tolerance = 0.01 * share.shares.len() as f64;
    assert!((share.total_pct() - 100.0).abs() <= tolerance);
}

#[test]
fn nan_duration_row_does_not_blank_possession() {
    let raw = "team,player,type,shot_outcome,shot_statsbomb_xg,possession_team,duration,timestamp\n\
               A,A1,Pass,,,A,NaN,00:00:01.000\n\
               A,A1,Pass,,,A,600,00:00:02.000\n\
               B,B1,Pass,,,B,400,00:00:03.000\n";
    let table = parse_events_csv(raw).expect("rows should parse");
    assert_eq!(table.events()[0].duration, None);
    let share = compute_possession_share(&table).expect("possession is defined");
    assert_eq!(share.share_for("A"), Some(60.0));
    assert_eq!(share.share_for("B"), Some(40.0));
}

#[test]
fn na_xg_on_a_shot_counts_as_missing() {
    let raw = "team,player,type,shot_outcome,shot_statsbomb_xg,possession_team,duration,timestamp\n\
               A,A1,Shot,Saved,NA,A,1.0,00:00:01.000\n\
               A,A1,Shot,Goal,0.35,A,1.0,00:00:02.000\n";
    let table = parse_events_csv(raw).expect("rows should parse");
    let stats = MatchStats::compute(&table).expect("NA xG is not an error");
    assert_close(stats.totals.xg_for("A").unwrap(), 0.35);
    assert_eq!(stats.players[0].missing_xg, 1);
    assert_eq!(stats.players[0].shots, 2);
}

#[test]
fn zero_possession_time_is_undefined() {
    let raw = "team,player,type,shot_outcome,shot_statsbomb_xg,possession_team,duration,timestamp\n\
               A,A1,Pass,,,A,0,00:00:01.000\n\
               B,B1,Pass,,,B,,00:00:02.000\n";
    let table = parse_events_csv(raw).expect("rows should parse");
    assert!(compute_possession_share(&table).is_none());
}

#[test]
fn cumulative_xg_is_bucketed_and_forward_filled() {
    let table = load_fixture("two_teams.csv");
    let series = compute_cumulative_xg(&table).expect("timeline should compute");

    assert_eq!(series.minutes, (0..=7).collect::<Vec<u32>>());

    let a = &series.teams["A"];
    let expected_a = [0.0, 0.1, 0.1, 0.1, 0.1, 0.4, 0.4, 0.4];
    for (value, expected) in a.iter().zip(expected_a) {
        assert_close(value.expect("A defined from minute 0"), expected);
    }

    let b = &series.teams["B"];
    assert_eq!(b[0], None);
    assert_eq!(b[1], None);
    assert_close(b[2].unwrap(), 0.0);
    assert_close(b[3].unwrap(), 0.2);
    assert_close(b[7].unwrap(), 0.2);

    assert_close(series.final_value("A").unwrap(), 0.4);
    assert_eq!(series.value_at("B", 1), None);
}

#[test]
fn cumulative_xg_never_decreases() {
    for name in ["two_teams.csv", "unsorted.csv"] {
        let table = load_fixture(name);
        let series = compute_cumulative_xg(&table).expect("timeline should compute");
        for values in series.teams.values() {
            let defined: Vec<f64> = values.iter().filter_map(|v| *v).collect();
            assert!(defined.windows(2).all(|w| w[0] <= w[1]), "{name}: {defined:?}");
        }
    }
}

#[test]
fn cumulative_points_follow_timestamp_then_row_order() {
    let table = load_fixture("unsorted.csv");
    let points = cumulative_xg_points(&table).expect("points should compute");
    let order: Vec<usize> = points.iter().map(|p| p.event_index).collect();
    assert_eq!(order, vec![1, 3, 5, 0, 2, 4]);
    // Two Home shots share 00:02:30; the first-listed one is summed first.
    assert_close(points[3].cumulative_xg, 0.57);
    assert_close(points[4].cumulative_xg, 0.62);

    let series = compute_cumulative_xg(&table).expect("timeline should compute");
    assert_close(series.value_at("Home", 2).unwrap(), 0.62);
    assert_close(series.value_at("Away", 3).unwrap(), 0.0);
    assert_close(series.value_at("Away", 4).unwrap(), 0.3);
}

#[test]
fn player_contribution_sorted_with_stable_ties() {
    let table = load_fixture("two_teams.csv");
    let players = compute_player_xg(&table);
    let names: Vec<&str> = players.iter().map(|p| p.player.as_str()).collect();
    assert_eq!(names, vec!["A2", "B1", "A1", "B2", "A3"]);
    assert!(players.windows(2).all(|w| w[0].total_xg >= w[1].total_xg));

    let a1 = players.iter().find(|p| p.player == "A1").unwrap();
    assert_eq!(a1.shots, 2);
    assert_eq!(a1.missing_xg, 1);
    assert_close(a1.total_xg, 0.1);

    let b2 = players.iter().find(|p| p.player == "B2").unwrap();
    assert!(b2.xg_unknown());
    assert_eq!(b2.team.as_deref(), Some("B"));
}

#[test]
fn empty_table_gives_empty_aggregates() {
    let table = load_fixture("header_only.csv");
    let stats = MatchStats::compute(&table).expect("empty input is not an error");
    assert_eq!(stats.events, 0);
    assert!(stats.totals.is_empty());
    assert!(stats.possession.is_none());
    assert!(stats.timeline.is_empty());
    assert!(stats.players.is_empty());
    assert!(stats.teams().is_empty());
}

#[test]
fn recomputing_is_deterministic() {
    let table = load_fixture("unsorted.csv");
    let first = MatchStats::compute(&table).expect("stats should compute");
    let second = MatchStats::compute(&table).expect("stats should compute");
    assert_eq!(first, second);
    assert_eq!(first.teams(), vec!["Away".to_string(), "Home".to_string()]);
}
