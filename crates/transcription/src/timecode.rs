use serde::Deserialize;

/// Parses an `H:MM:SS.mmm` timecode to milliseconds.
///
/// Hours may be any width; a comma decimal separator is accepted as well
/// as a dot.
pub fn parse_timecode(s: &str) -> Option<u64> {
    let s = s.trim().replace(',', ".");
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours: u64 = parts[0].parse().ok()?;
    let minutes: u64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some(hours * 3_600_000 + minutes * 60_000 + (seconds * 1000.0).round() as u64)
}

/// Formats milliseconds as `HH:MM:SS.mmm`.
pub fn format_timecode(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// A point in time as submitted by edit clients: either a bare number of
/// seconds, a stringified number of seconds, or a full timecode.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimeSpec {
    Seconds(f64),
    Text(String),
}

impl TimeSpec {
    /// Resolves to milliseconds, or `None` if unparseable.
    pub fn to_ms(&self) -> Option<u64> {
        match self {
            TimeSpec::Seconds(secs) => {
                if !secs.is_finite() || *secs < 0.0 {
                    return None;
                }
                Some((secs * 1000.0).round() as u64)
            }
            TimeSpec::Text(s) => {
                if s.contains(':') {
                    parse_timecode(s)
                } else {
                    let secs: f64 = s.trim().parse().ok()?;
                    TimeSpec::Seconds(secs).to_ms()
                }
            }
        }
    }
}
