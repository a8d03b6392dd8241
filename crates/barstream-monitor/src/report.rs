//! Plain-text rendering of an indicator snapshot.

use std::fmt::Write;

use barstream_core::types::{Reading, Snapshot};
use chrono::{DateTime, Utc};

/// Format Unix milliseconds as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

fn status(reading: &Reading) -> &'static str {
    if reading.is_stale() {
        "stale"
    } else if reading.is_fresh() {
        "fresh"
    } else {
        "warming"
    }
}

/// Render one line per indicator, ordered by name.
pub fn render_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let at = snapshot
        .timestamp
        .map(format_timestamp)
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "Snapshot #{} at {}", snapshot.sequence, at);

    let width = snapshot.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, reading) in snapshot.iter() {
        let updated = reading
            .updated_at
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {:<width$}  {:<4}  {:<7}  {:<40}  {}",
            name,
            reading.feed.to_string(),
            status(reading),
            reading.value.to_string(),
            updated,
            width = width
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use barstream_core::types::{Feed, IndicatorValue};

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(86_400_000 + 61_000), "1970-01-02 00:01:01");
    }

    #[test]
    fn test_render_snapshot() {
        let mut snapshot = Snapshot::new();
        snapshot.set("rsi", Reading::pending(Feed::Bar, true));
        snapshot.set(
            "vwap",
            Reading {
                value: IndicatorValue::scalar(101.5),
                updated_at: Some(60_000),
                enabled: false,
                feed: Feed::Tick,
            },
        );
        snapshot.advance(60_000);

        let text = render_snapshot(&snapshot);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Snapshot #1 at 1970-01-01 00:01:00"));
        assert!(lines[1].contains("rsi") && lines[1].contains("warming"));
        assert!(lines[2].contains("vwap") && lines[2].contains("stale"));
    }
}
