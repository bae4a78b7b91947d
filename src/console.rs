//! Colorful console output for search metrics.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::ranker::Ranking;

/// ASCII art banner for server startup.
pub fn print_banner() {
    let banner = r#"
  ____            _    _
 |  _ \ __ _ _ __| | _(_)_ __   __ _
 | |_) / _` | '__| |/ / | '_ \ / _` |
 |  __/ (_| | |  |   <| | | | | (_| |
 |_|   \__,_|_|  |_|\_\_|_| |_|\__, |
                               |___/
"#;
    println!("{}", banner.cyan().bold());
    println!(
        "  {} {}\n",
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black(),
        "Parking Search".bright_cyan()
    );
}

/// Prints the loaded dataset size.
pub fn print_dataset(locations: usize, listings: usize) {
    println!(
        "{} {} {} Dataset: locations ({}), listings ({})",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Loader]".bright_cyan(),
        locations.to_formatted_string(&Locale::en).bright_yellow(),
        listings.to_formatted_string(&Locale::en).bright_yellow()
    );
}

/// Prints a one-line summary of a finished ranking.
pub fn print_search_summary(search_id: &str, vehicles: u64, ranking: &Ranking) {
    let stats = &ranking.statistics;
    let nodes_per_sec = if stats.time_total.as_secs_f64() > 0.0 {
        (stats.nodes_explored as f64 / stats.time_total.as_secs_f64()) as u64
    } else {
        0
    };

    let incomplete = if ranking.incomplete.is_empty() {
        "0".white().to_string()
    } else {
        ranking.incomplete.len().to_string().bright_red().bold().to_string()
    };

    println!(
        "{} {} {} Search {} ended: vehicles ({}), locations ({} feasible / {}), aborted ({}), nodes ({}), time spent ({}), speed ({}/sec)",
        timestamp().bright_black(),
        "INFO".bright_green(),
        "[Search]".bright_cyan(),
        search_id.white().bold(),
        vehicles.to_formatted_string(&Locale::en).bright_yellow(),
        ranking.entries.len().to_formatted_string(&Locale::en).bright_green(),
        ranking.locations_searched.to_formatted_string(&Locale::en).white(),
        incomplete,
        stats.nodes_explored.to_formatted_string(&Locale::en).white(),
        format_duration(stats.time_total).yellow(),
        nodes_per_sec.to_formatted_string(&Locale::en).bright_magenta().bold()
    );
}

/// Formats a duration nicely.
fn format_duration(d: Duration) -> String {
    let total_ms = d.as_millis();
    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        let mins = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// Returns a timestamp string.
fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs();
            let millis = d.subsec_millis();
            format!("{}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "0.000".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m 5s");
    }
}
