//! Human-readable run summary around the rendered results.

use std::time::Duration;

use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::core::{ExecutionInfo, InputRef};

use super::format::{DEFAULT_PRECISION, format_float};

/// `YYYY-MM-DD HH:MM:SS UTC`
pub fn date_desc(date: &OffsetDateTime) -> String {
    let utc = date.to_offset(UtcOffset::UTC);
    utc.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
    ))
    .unwrap_or_else(|_| utc.to_string())
}

/// Elapsed time in seconds, with `precision` decimals.
pub fn time_desc(time: Duration, precision: Option<usize>) -> String {
    format!(
        "{} s",
        format_float(time.as_secs_f64(), precision.unwrap_or(DEFAULT_PRECISION))
    )
}

/// Space-separated `collector_key` list.
pub fn input_desc(inputs: &[InputRef]) -> String {
    inputs
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn seed_desc(seed: Option<u64>) -> String {
    match seed {
        Some(seed) => seed.to_string(),
        None => "unseeded".to_string(),
    }
}

/// Full report: run metadata followed by the rendered results.
pub fn render_summary(info: &ExecutionInfo, results_text: &str, precision: Option<usize>) -> String {
    format!(
        "\nDate: {}\nProcessor: {}\nInput: {}, Time: {}\nPRNGs: {}\n{}",
        date_desc(&info.date),
        info.processor,
        input_desc(&info.input),
        time_desc(info.time, precision),
        seed_desc(info.prngs_seed),
        results_text
    )
}
