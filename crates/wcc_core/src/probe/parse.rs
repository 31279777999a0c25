//! Interpretation of `ffprobe -of json` output.

use serde_json::Value;

use crate::errors::{ProbeError, ProbeResult};
use crate::models::AudioMetadata;

/// Stream fields requested from the prober.
pub const STREAM_ENTRIES: &str =
    "stream=channels,sample_rate,duration,bits_per_sample,bits_per_raw_sample";

/// Parse the JSON document written by the prober.
pub fn parse_probe_output(stdout: &[u8]) -> ProbeResult<AudioMetadata> {
    let json: Value =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::Parse(e.to_string()))?;
    parse_probe_json(&json)
}

/// Pick the first stream that carries a channel count.
pub fn parse_probe_json(json: &Value) -> ProbeResult<AudioMetadata> {
    let streams = json
        .get("streams")
        .and_then(|s| s.as_array())
        .ok_or_else(|| ProbeError::Parse("missing \"streams\" array".to_string()))?;

    let (stream, channels) = streams
        .iter()
        .find_map(|stream| {
            positive_u32(stream.get("channels")).map(|channels| (stream, channels))
        })
        .ok_or(ProbeError::NoAudioStream)?;

    Ok(AudioMetadata {
        channels,
        duration_seconds: parse_duration(stream.get("duration")),
        sample_rate_hz: positive_u32(stream.get("sample_rate")),
        bit_depth: positive_u32(stream.get("bits_per_raw_sample"))
            .or_else(|| positive_u32(stream.get("bits_per_sample"))),
    })
}

/// A positive integer given either as a JSON number or a numeric string.
fn positive_u32(value: Option<&Value>) -> Option<u32> {
    let n = match value? {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n > 0)
}

/// Seconds from a decimal string; absent or unusable values are unknown.
fn parse_duration(value: Option<&Value>) -> Option<f64> {
    let secs = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (secs.is_finite() && secs > 0.0).then_some(secs)
}

/// Format seconds as `m:ss` (minutes are not wrapped into hours).
pub fn format_duration(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let mins = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", mins, secs)
}
