use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_EVENTS_CSV: &str = "randomdata123.csv";
const DEFAULT_REDRAW_MS: u64 = 250;
const MIN_REDRAW_MS: u64 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub events_path: PathBuf,
    /// Upper bound between screen redraws while idle.
    pub redraw_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            events_path: PathBuf::from(DEFAULT_EVENTS_CSV),
            redraw_interval: Duration::from_millis(DEFAULT_REDRAW_MS),
        }
    }
}

impl AppConfig {
    /// Reads `.env.local` / `.env`, then `MATCH_EVENTS_CSV` and `UI_REDRAW_MS`.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let events_path = env::var("MATCH_EVENTS_CSV")
            .ok()
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_EVENTS_CSV));
        let redraw_ms = env::var("UI_REDRAW_MS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REDRAW_MS)
            .max(MIN_REDRAW_MS);

        Self {
            events_path,
            redraw_interval: Duration::from_millis(redraw_ms),
        }
    }

    /// Command-line path wins over the environment.
    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(path) = parse_events_arg(args) {
            self.events_path = path;
        }
        self
    }
}

/// Accepts `--events=<path>`, `--events <path>` or a bare positional path.
pub fn parse_events_arg(args: &[String]) -> Option<PathBuf> {
    for (idx, arg) in args.iter().enumerate() {
        if let Some(path) = arg.strip_prefix("--events=") {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Some(PathBuf::from(trimmed));
            }
        }
        if arg == "--events" {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(PathBuf::from(next));
            }
        }
    }
    args.iter()
        .enumerate()
        .find(|(idx, arg)| {
            !arg.starts_with("--") && (*idx == 0 || args[*idx - 1] != "--events")
        })
        .map(|(_, arg)| PathBuf::from(arg))
}
