use std::collections::VecDeque;

use crate::match_stats::MatchStats;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Summary,
    Progression,
    Players,
}

impl Screen {
    pub fn next(self) -> Self {
        match self {
            Screen::Summary => Screen::Progression,
            Screen::Progression => Screen::Players,
            Screen::Players => Screen::Summary,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Screen::Summary => "SUMMARY",
            Screen::Progression => "XG PROGRESSION",
            Screen::Players => "PLAYERS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub help_overlay: bool,
    pub source: String,
    pub stats: MatchStats,
    pub player_scroll: usize,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new(source: impl Into<String>, stats: MatchStats) -> Self {
        let mut state = Self {
            screen: Screen::Summary,
            help_overlay: false,
            source: source.into(),
            stats,
            player_scroll: 0,
            logs: VecDeque::new(),
        };
        state.log_load_summary();
        state
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn cycle_screen(&mut self) {
        self.screen = self.screen.next();
    }

    pub fn scroll_players_down(&mut self) {
        let max = self.stats.players.len().saturating_sub(1);
        self.player_scroll = (self.player_scroll + 1).min(max);
    }

    pub fn scroll_players_up(&mut self) {
        self.player_scroll = self.player_scroll.saturating_sub(1);
    }

    fn log_load_summary(&mut self) {
        let msg = format!(
            "[INFO] Loaded {} events ({} shots) from {}",
            self.stats.events, self.stats.shots, self.source
        );
        self.push_log(msg);
        if self.stats.events == 0 {
            self.push_log("[WARN] Event log is empty");
        }
        if self.stats.possession.is_none() {
            self.push_log("[WARN] No possession time recorded; share undefined");
        }
        let missing = self.stats.shots_missing_xg();
        if missing > 0 {
            self.push_log(format!("[WARN] {missing} shots without a usable xG value"));
        }
    }
}
