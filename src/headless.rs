//! Headless mode: one refresh, plain-text panels on stdout.
//!
//! Used for scripting and smoke checks where no terminal UI is wanted.

use crate::dashboard::Dashboard;
use crate::error::{CapwatchError, Result};
use crate::tui::widgets::ResultTableView;

/// Width budget for plain-text tables.
const OUTPUT_WIDTH: usize = 100;

/// Refreshes the dashboard once and prints every panel.
///
/// Fails only when no panel loaded at all; individual panel failures are
/// printed in place, matching the TUI's isolation behavior.
pub async fn run(dashboard: &Dashboard) -> Result<()> {
    let data = dashboard.refresh().await;

    for panel in &data.panels {
        println!("## {}", panel.title);
        match &panel.result {
            Ok(table) => println!("{}", ResultTableView::new(table).render_plain(OUTPUT_WIDTH)),
            Err(msg) => println!("error: {msg}"),
        }
        println!();
    }

    match &data.series {
        Ok(series) if series.is_empty() => println!("Defect trend: no data"),
        Ok(series) => {
            let total: i64 = series.points().iter().map(|p| p.count).sum();
            let peak = series.points().iter().map(|p| p.count).max().unwrap_or(0);
            println!(
                "Defect trend: {} minute(s), {} defect(s) total, peak {}/min",
                series.len(),
                total,
                peak
            );
        }
        Err(msg) => println!("Defect trend: error: {msg}"),
    }

    if data.all_failed() {
        return Err(CapwatchError::service("all dashboard panels failed"));
    }
    Ok(())
}
