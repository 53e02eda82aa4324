use anyhow::{Context, Result};

use xg_terminal::config::AppConfig;
use xg_terminal::events;
use xg_terminal::match_stats::MatchStats;
use xg_terminal::report;

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = AppConfig::from_env().with_args(&args);

    let table = events::load_events(&config.events_path)?;
    let stats = MatchStats::compute(&table)
        .with_context(|| format!("aggregate {}", config.events_path.display()))?;

    println!("Match statistics: {}", config.events_path.display());
    println!("{}", report::render_text(&stats));

    if stats.possession.is_none() {
        eprintln!("[WARN] No possession time recorded; share undefined");
    }
    let missing = stats.shots_missing_xg();
    if missing > 0 {
        eprintln!("[WARN] {missing} shots without a usable xG value");
    }

    Ok(())
}
