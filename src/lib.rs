pub mod config;
pub mod events;
pub mod match_stats;
pub mod player_xg;
pub mod possession;
pub mod report;
pub mod state;
pub mod team_totals;
pub mod xg_timeline;
