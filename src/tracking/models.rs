//! Data models for vocabulary tracking

use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format used when writing occurrence timestamps
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Separator between word and translation in a persisted key
const KEY_SEPARATOR: char = '|';
const KEY_ESCAPE: char = '\\';

/// A vocabulary entry supplied by the caller for a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VocabularyPair {
    pub source: String,
    pub target: String,
    /// Empty when the entry carries no pronunciation
    #[serde(default)]
    pub pronunciation: String,
}

impl VocabularyPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            pronunciation: String::new(),
        }
    }

    pub fn with_pronunciation(mut self, pronunciation: impl Into<String>) -> Self {
        self.pronunciation = pronunciation.into();
        self
    }

    /// Key under which this pair's history is tracked
    pub fn key(&self) -> WordKey {
        WordKey::new(self.source.clone(), self.target.clone())
    }

    pub fn has_pronunciation(&self) -> bool {
        !self.pronunciation.is_empty()
    }
}

impl<S: Into<String>, T: Into<String>> From<(S, T)> for VocabularyPair {
    fn from((source, target): (S, T)) -> Self {
        Self::new(source, target)
    }
}

impl<S: Into<String>, T: Into<String>, P: Into<String>> From<(S, T, P)> for VocabularyPair {
    fn from((source, target, pronunciation): (S, T, P)) -> Self {
        Self::new(source, target).with_pronunciation(pronunciation)
    }
}

/// Identity of a tracked word: the `(word, translation)` pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WordKey {
    pub word: String,
    pub translation: String,
}

impl WordKey {
    pub fn new(word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            translation: translation.into(),
        }
    }

    /// Encode as the `word|translation` string used in the tracking file.
    ///
    /// Separators and backslashes inside either field are escaped, so two
    /// distinct keys never encode to the same string.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.word.len() + self.translation.len() + 1);
        escape_into(&self.word, &mut out);
        out.push(KEY_SEPARATOR);
        escape_into(&self.translation, &mut out);
        out
    }

    /// Decode a persisted key string.
    ///
    /// Splits on the first unescaped separator. A key without one yields an
    /// empty translation.
    pub fn decode(encoded: &str) -> Self {
        let mut word = String::new();
        let mut translation = String::new();
        let mut in_translation = false;
        let mut chars = encoded.chars();

        while let Some(c) = chars.next() {
            let target = if in_translation { &mut translation } else { &mut word };
            match c {
                KEY_ESCAPE => match chars.next() {
                    Some(next) => target.push(next),
                    None => target.push(KEY_ESCAPE),
                },
                KEY_SEPARATOR if !in_translation => in_translation = true,
                _ => target.push(c),
            }
        }

        Self { word, translation }
    }
}

fn escape_into(field: &str, out: &mut String) {
    for c in field.chars() {
        if c == KEY_SEPARATOR || c == KEY_ESCAPE {
            out.push(KEY_ESCAPE);
        }
        out.push(c);
    }
}

impl fmt::Display for WordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \u{2192} {}", self.word, self.translation)
    }
}

/// A single review event for a word
///
/// Read leniently: any JSON value becomes an occurrence. A `date` that is
/// missing or not a string is kept as-is and reads as unreadable; `repeat`
/// counts when it is truthy (non-zero, non-empty, `true`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Occurrence {
    /// ISO-8601 timestamp, kept verbatim so unreadable dates survive a save
    pub date: Value,
    /// True when the word was not understood on this occasion
    pub repeat: bool,
}

impl Occurrence {
    pub fn new(at: NaiveDateTime, repeat: bool) -> Self {
        Self {
            date: Value::String(at.format(DATE_FORMAT).to_string()),
            repeat,
        }
    }

    /// Parsed timestamp, or `None` if the stored date is unreadable
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        self.date.as_str().and_then(parse_timestamp)
    }
}

impl From<Value> for Occurrence {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(mut fields) => Self {
                date: fields.remove("date").unwrap_or(Value::Null),
                repeat: fields.get("repeat").map_or(false, is_truthy),
            },
            _ => Self {
                date: Value::Null,
                repeat: false,
            },
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Parse the timestamp forms accepted in a tracking file.
///
/// Accepts local ISO-8601 date-times, RFC 3339 with an offset (converted to
/// local time) and bare dates (midnight).
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Usage history of one word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
}

impl WordRecord {
    pub fn new(key: &WordKey) -> Self {
        Self {
            word: key.word.clone(),
            translation: key.translation.clone(),
            occurrences: Vec::new(),
        }
    }

    pub fn key(&self) -> WordKey {
        WordKey::new(self.word.clone(), self.translation.clone())
    }

    /// Number of recorded events of either kind
    pub fn times_used(&self) -> usize {
        self.occurrences.len()
    }

    pub fn times_not_understood(&self) -> usize {
        self.occurrences.iter().filter(|o| o.repeat).count()
    }

    /// Timestamp of the most recent event, if readable
    pub fn last_seen(&self) -> Option<NaiveDateTime> {
        self.occurrences.last().and_then(Occurrence::timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_pair_from_tuples() {
        let short: VocabularyPair = ("chat", "cat").into();
        assert_eq!(short.pronunciation, "");
        assert!(!short.has_pronunciation());

        let long: VocabularyPair = ("hola", "hello", "OH-lah").into();
        assert_eq!(long.pronunciation, "OH-lah");
        assert_eq!(long.key(), WordKey::new("hola", "hello"));
    }

    #[test]
    fn test_key_plain_encoding() {
        let key = WordKey::new("bonjour", "hello");
        assert_eq!(key.encode(), "bonjour|hello");
        assert_eq!(WordKey::decode("bonjour|hello"), key);
    }

    #[test]
    fn test_key_separator_no_collision() {
        let a = WordKey::new("a|b", "c");
        let b = WordKey::new("a", "b|c");
        assert_ne!(a.encode(), b.encode());
        assert_eq!(WordKey::decode(&a.encode()), a);
        assert_eq!(WordKey::decode(&b.encode()), b);

        let slash = WordKey::new("back\\", "slash");
        assert_eq!(WordKey::decode(&slash.encode()), slash);
    }

    #[test]
    fn test_key_decode_without_separator() {
        let key = WordKey::decode("lonely");
        assert_eq!(key.word, "lonely");
        assert_eq!(key.translation, "");
    }

    #[test]
    fn test_occurrence_date_round_trip() {
        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_micro_opt(14, 30, 5, 123456)
            .unwrap();
        let occ = Occurrence::new(at, true);
        assert_eq!(occ.date, "2024-06-01T14:30:05.123456");
        assert_eq!(occ.timestamp(), Some(at));
    }

    #[test]
    fn test_parse_timestamp_forms() {
        let midnight = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-06-01"), Some(midnight));
        assert_eq!(parse_timestamp("2024-06-01T00:00:00"), Some(midnight));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_offset_timestamp_converted_to_local_time() {
        let expected = Utc
            .with_ymd_and_hms(2024, 6, 1, 10, 0, 0)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parse_timestamp("2024-06-01T10:00:00+00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T10:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-01T12:00:00+02:00"), Some(expected));
    }

    #[test]
    fn test_lenient_occurrence_shapes() {
        let parse = |json: &str| serde_json::from_str::<Occurrence>(json).unwrap();

        let null_date = parse(r#"{ "date": null, "repeat": true }"#);
        assert_eq!(null_date.date, Value::Null);
        assert!(null_date.repeat);
        assert_eq!(null_date.timestamp(), None);

        let numeric_date = parse(r#"{ "date": 20240601, "repeat": false }"#);
        assert_eq!(numeric_date.date, serde_json::json!(20240601));
        assert_eq!(numeric_date.timestamp(), None);

        let missing_date = parse(r#"{ "repeat": 1 }"#);
        assert_eq!(missing_date.date, Value::Null);
        assert!(missing_date.repeat);

        assert!(!parse(r#"{ "date": "2024-06-01", "repeat": 0 }"#).repeat);
        assert!(parse(r#"{ "date": "2024-06-01", "repeat": "yes" }"#).repeat);
        assert!(!parse(r#"{ "date": "2024-06-01", "repeat": "" }"#).repeat);
        assert!(!parse(r#"{ "date": "2024-06-01" }"#).repeat);

        let bare = parse("7");
        assert_eq!(bare.date, Value::Null);
        assert!(!bare.repeat);
    }

    #[test]
    fn test_unreadable_date_survives_serialization() {
        let occ = serde_json::from_str::<Occurrence>(r#"{ "date": 42, "repeat": true }"#).unwrap();
        let written = serde_json::to_value(&occ).unwrap();
        assert_eq!(written, serde_json::json!({ "date": 42, "repeat": true }));
    }

    #[test]
    fn test_record_counts() {
        let key = WordKey::new("chat", "cat");
        let mut record = WordRecord::new(&key);
        assert_eq!(record.times_used(), 0);
        assert_eq!(record.last_seen(), None);

        let at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        record.occurrences.push(Occurrence::new(at, false));
        record.occurrences.push(Occurrence::new(at, true));

        assert_eq!(record.times_used(), 2);
        assert_eq!(record.times_not_understood(), 1);
        assert_eq!(record.last_seen(), Some(at));
        assert_eq!(record.key(), key);
    }
}
