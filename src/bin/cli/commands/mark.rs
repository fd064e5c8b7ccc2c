use anyhow::Result;

use lexis_lib::tracking::priority::calculate_priority;
use lexis_lib::tracking::{Clock, Recorder, WordKey};

use crate::app::App;
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    word: &str,
    translation: &str,
    missed: bool,
    format: &OutputFormat,
) -> Result<()> {
    {
        let mut recorder = Recorder::new(&mut app.store, &app.clock);
        if missed {
            recorder.mark_not_understood(word, translation);
        } else {
            recorder.mark_used(word, translation);
        }
    }
    app.save()?;

    let key = WordKey::new(word, translation);
    let record = app.store.get(&key);
    let priority = calculate_priority(record, app.clock.now());
    let events = record.map(|r| r.times_used()).unwrap_or(0);

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "word": word,
                "translation": translation,
                "missed": missed,
                "events": events,
                "priority": priority,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            let what = if missed { "not understood" } else { "used" };
            println!("Marked {} as {} ({} events, priority {})", key, what, events, priority);
        }
    }

    Ok(())
}
