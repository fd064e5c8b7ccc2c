use lexis_lib::tracking::{ScoredPair, UrgencyBar, VocabularyPair};

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

/// Wrap `text` in a color code when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// "source → target [pronunciation]"
pub fn format_pair(pair: &VocabularyPair) -> String {
    if pair.has_pronunciation() {
        format!("{} \u{2192} {} [{}]", pair.source, pair.target, pair.pronunciation)
    } else {
        format!("{} \u{2192} {}", pair.source, pair.target)
    }
}

/// Urgency chart: one bar per sampled word, selected words starred
pub fn render_urgency_bars(
    ranked: &[ScoredPair],
    bars: &[UrgencyBar],
    width: usize,
    use_color: bool,
) -> Vec<String> {
    let label_width = ranked
        .iter()
        .map(|s| s.pair.source.chars().count())
        .max()
        .unwrap_or(0)
        .min(24);

    ranked
        .iter()
        .zip(bars)
        .map(|(scored, bar)| {
            let filled = "\u{2588}".repeat(bar.length);
            let padded = format!("{:<width$}", filled, width = width);
            let mark = if bar.selected { "*" } else { " " };
            let label: String = scored.pair.source.chars().take(label_width).collect();

            let painted = if bar.selected {
                paint(&padded, Color::YELLOW, use_color)
            } else {
                paint(&padded, Color::DIM, use_color)
            };
            format!(
                "{} {} {:>3}  {:<lw$}",
                painted,
                mark,
                scored.priority,
                label,
                lw = label_width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_pair() {
        assert_eq!(format_pair(&VocabularyPair::new("chat", "cat")), "chat \u{2192} cat");
        let with = VocabularyPair::new("hola", "hello").with_pronunciation("OH-lah");
        assert_eq!(format_pair(&with), "hola \u{2192} hello [OH-lah]");
    }

    #[test]
    fn test_bars_plain() {
        let ranked = vec![
            ScoredPair { pair: VocabularyPair::new("a", "x"), priority: 100 },
            ScoredPair { pair: VocabularyPair::new("b", "y"), priority: 50 },
        ];
        let bars = vec![
            UrgencyBar { length: 4, selected: true },
            UrgencyBar { length: 2, selected: false },
        ];
        let lines = render_urgency_bars(&ranked, &bars, 4, false);
        assert_eq!(lines[0], "\u{2588}\u{2588}\u{2588}\u{2588} * 100  a");
        assert_eq!(lines[1], "\u{2588}\u{2588}      50  b");
    }
}
