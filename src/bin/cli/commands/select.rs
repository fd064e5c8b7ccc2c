use std::path::Path;

use anyhow::Result;

use lexis_lib::tracking::Clock;

use crate::app::App;
use crate::render::terminal::{format_pair, paint, render_urgency_bars, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    vocab_path: &Path,
    count: Option<usize>,
    seed: Option<u64>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let (candidates, _) = app.load_vocabulary(vocab_path)?;
    let count = app.session_size(count);
    let selection = app.config.sampler().select(
        &app.store,
        &candidates,
        count,
        app.clock.now(),
        &mut App::rng(seed),
    );

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "candidates": candidates.len(),
                "tracked": app.store.len(),
                "selected": selection.selected().collect::<Vec<_>>(),
                "ranked": &selection.ranked,
                "bars": &selection.bars,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if selection.is_empty() {
                println!("No vocabulary words available for selection.");
                return Ok(());
            }

            println!(
                "{}",
                paint(
                    &format!(
                        "Urgency of {} sampled words (top {} marked)",
                        selection.ranked.len(),
                        selection.selected_count
                    ),
                    Color::BOLD,
                    use_color
                )
            );
            for line in render_urgency_bars(
                &selection.ranked,
                &selection.bars,
                app.config.bar_width,
                use_color,
            ) {
                println!("{}", line);
            }

            println!();
            for (i, pair) in selection.selected().enumerate() {
                println!("{:2}. {}", i + 1, format_pair(pair));
            }
        }
    }

    Ok(())
}
