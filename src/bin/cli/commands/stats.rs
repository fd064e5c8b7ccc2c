use anyhow::Result;

use lexis_lib::tracking::priority::{format_age, priority_breakdown, PriorityBreakdown};
use lexis_lib::tracking::{Clock, LoadStatus, WordKey};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(app: &App, limit: usize, format: &OutputFormat, use_color: bool) -> Result<()> {
    let now = app.clock.now();
    let mut rows: Vec<(&WordKey, usize, usize, PriorityBreakdown)> = app
        .store
        .iter()
        .map(|(key, record)| {
            (
                key,
                record.times_used(),
                record.times_not_understood(),
                priority_breakdown(Some(record), now),
            )
        })
        .collect();

    // Most urgent first
    rows.sort_by(|a, b| b.3.priority.cmp(&a.3.priority));
    rows.truncate(limit);

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = rows
                .iter()
                .map(|(key, used, missed, breakdown)| {
                    serde_json::json!({
                        "word": key.word,
                        "translation": key.translation,
                        "timesUsed": used,
                        "timesNotUnderstood": missed,
                        "breakdown": breakdown,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if app.load_report.status == LoadStatus::Missing {
                println!("No tracking file yet at {}", app.store.path().display());
                return Ok(());
            }
            if rows.is_empty() {
                println!("No words tracked.");
                return Ok(());
            }

            let max_len = rows
                .iter()
                .map(|(key, ..)| key.to_string().chars().count())
                .max()
                .unwrap_or(4)
                .max(4);

            println!(
                "{}",
                paint(
                    &format!(
                        "{:<width$} {:>8} {:>4} {:>6} {:>8}",
                        "Word",
                        "Priority",
                        "Used",
                        "Missed",
                        "Last",
                        width = max_len
                    ),
                    Color::BOLD,
                    use_color
                )
            );
            println!("{}", "\u{2500}".repeat(max_len + 30));

            for (key, used, missed, breakdown) in &rows {
                let missed_cell = format!("{:>6}", missed);
                let missed_cell = if *missed > 0 {
                    paint(&missed_cell, Color::RED, use_color)
                } else {
                    missed_cell
                };
                println!(
                    "{:<width$} {:>8} {:>4} {} {:>8}",
                    key.to_string(),
                    breakdown.priority,
                    used,
                    missed_cell,
                    format_age(breakdown.days_since_last_use),
                    width = max_len
                );
            }

            println!("\n{} of {} words shown", rows.len(), app.store.len());
        }
    }

    Ok(())
}
