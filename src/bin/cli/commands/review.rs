use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

use lexis_lib::session::{ReviewSession, RoundSummary};
use lexis_lib::tracking::VocabularyPair;
use rand::rngs::StdRng;

use crate::app::App;
use crate::render::terminal::{format_pair, paint, Color};
use crate::OutputFormat;

/// What the learner typed at the feedback prompt
#[derive(Debug, PartialEq, Eq)]
enum Feedback {
    /// 1-based positions of words that were not understood
    Difficult(Vec<usize>),
    Quit,
}

/// Parse "2 5, 7" style input against a list of `max` words
fn parse_feedback(input: &str, max: usize) -> std::result::Result<Feedback, String> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Ok(Feedback::Quit);
    }

    let mut picked = Vec::new();
    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let n: usize = token
            .parse()
            .map_err(|_| format!("'{}' is not a number", token))?;
        if n == 0 || n > max {
            return Err(format!("{} is out of range (1-{})", n, max));
        }
        if !picked.contains(&n) {
            picked.push(n);
        }
    }
    Ok(Feedback::Difficult(picked))
}

fn prompt(input: &mut dyn BufRead, console: &mut dyn Write, message: &str) -> Result<Option<String>> {
    write!(console, "{}", message)?;
    console.flush()?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

pub fn run(
    app: &mut App,
    vocab_path: &Path,
    count: Option<usize>,
    seed: Option<u64>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let (candidates, _) = app.load_vocabulary(vocab_path)?;
    if candidates.is_empty() {
        bail!("No vocabulary words in {:?}", vocab_path);
    }

    let count = app.session_size(count);
    let mut rng = App::rng(seed);
    let mut input = io::stdin().lock();

    match format {
        OutputFormat::Plain => {
            run_rounds(app, &candidates, count, &mut rng, &mut input, &mut io::stdout(), use_color)?;
        }
        OutputFormat::Json => {
            // Interaction goes to stderr so stdout carries only the summaries
            let summaries =
                run_rounds(app, &candidates, count, &mut rng, &mut input, &mut io::stderr(), use_color)?;
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
    }

    Ok(())
}

/// Run review rounds until the learner stops, returning one summary per
/// saved round
fn run_rounds(
    app: &mut App,
    candidates: &[VocabularyPair],
    count: usize,
    rng: &mut StdRng,
    input: &mut dyn BufRead,
    console: &mut dyn Write,
    use_color: bool,
) -> Result<Vec<RoundSummary>> {
    let sampler = app.config.sampler();
    let mut summaries: Vec<RoundSummary> = Vec::new();

    loop {
        let mut session =
            ReviewSession::begin(&mut app.store, &sampler, candidates, count, &app.clock, rng);

        writeln!(
            console,
            "{}",
            paint("Selected vocabulary for this round:", Color::BOLD, use_color)
        )?;
        let words: Vec<_> = session.words().cloned().collect();
        for (i, pair) in words.iter().enumerate() {
            writeln!(console, "{:2}. {}", i + 1, format_pair(pair))?;
        }

        let feedback = loop {
            let Some(line) = prompt(
                input,
                console,
                "\nNumbers of words you did not understand (blank = all known, q = quit without saving): ",
            )?
            else {
                break Feedback::Quit;
            };
            match parse_feedback(&line, words.len()) {
                Ok(feedback) => break feedback,
                Err(e) => writeln!(console, "{}", paint(&e, Color::RED, use_color))?,
            }
        };

        let picked = match feedback {
            Feedback::Quit => {
                session.abandon();
                writeln!(console, "Review cancelled, nothing saved.")?;
                break;
            }
            Feedback::Difficult(picked) => picked,
        };

        for n in picked {
            session.toggle_difficult(&words[n - 1].key());
        }

        let summary = session.check_in();
        writeln!(
            console,
            "\nWords to repeat: {}\nWords known: {}",
            summary.to_repeat, summary.known
        )?;
        for key in &summary.difficult {
            writeln!(console, "  {} {}", paint("\u{2022}", Color::RED, use_color), key)?;
        }

        session.finish().context("Failed to save review results")?;
        writeln!(console, "{}", paint("Review saved.", Color::GREEN, use_color))?;
        summaries.push(summary);

        match prompt(input, console, "\nStart a new round? [y/N] ")? {
            Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
            _ => break,
        }
    }

    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feedback() {
        assert_eq!(parse_feedback("", 5), Ok(Feedback::Difficult(vec![])));
        assert_eq!(parse_feedback("  \n", 5), Ok(Feedback::Difficult(vec![])));
        assert_eq!(parse_feedback("2 5,1", 5), Ok(Feedback::Difficult(vec![2, 5, 1])));
        assert_eq!(parse_feedback("3 3", 5), Ok(Feedback::Difficult(vec![3])));
        assert_eq!(parse_feedback("Q\n", 5), Ok(Feedback::Quit));
        assert!(parse_feedback("0", 5).is_err());
        assert!(parse_feedback("6", 5).is_err());
        assert!(parse_feedback("two", 5).is_err());
    }

    fn test_app() -> (App, tempfile::TempDir) {
        let temp = tempfile::TempDir::new().unwrap();
        let app = App::new(Some(temp.path().to_path_buf())).unwrap();
        (app, temp)
    }

    fn candidates() -> Vec<VocabularyPair> {
        vec![("chat", "cat").into(), ("chien", "dog").into()]
    }

    #[test]
    fn test_rounds_write_only_to_console() {
        let (mut app, _temp) = test_app();
        let mut input = io::Cursor::new("1\ny\n\nn\n");
        let mut console = Vec::new();

        let summaries = run_rounds(
            &mut app,
            &candidates(),
            2,
            &mut App::rng(Some(3)),
            &mut input,
            &mut console,
            false,
        )
        .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].to_repeat, 1);
        assert_eq!(summaries[1].to_repeat, 0);

        let console = String::from_utf8(console).unwrap();
        assert_eq!(console.matches("Selected vocabulary for this round:").count(), 2);
        assert_eq!(console.matches("Review saved.").count(), 2);
        assert!(app.store.path().exists());
    }

    #[test]
    fn test_quit_saves_nothing() {
        let (mut app, _temp) = test_app();
        let mut input = io::Cursor::new("q\n");
        let mut console = Vec::new();

        let summaries = run_rounds(
            &mut app,
            &candidates(),
            2,
            &mut App::rng(Some(3)),
            &mut input,
            &mut console,
            false,
        )
        .unwrap();

        assert!(summaries.is_empty());
        assert!(!app.store.path().exists());
        assert!(String::from_utf8(console).unwrap().contains("nothing saved"));
    }
}
