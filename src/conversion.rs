//! Sexagesimal parsing and formatting primitives.
//!
//! Values are handled in their *natural unit* (degrees for declinations, hours for right
//! ascensions); the caller decides which one it is. Accepted inputs:
//!
//! * `±D:M:S.s`, `±D M S.s` (colon or whitespace separated, mixed allowed)
//! * `±D:M.m` (decimal minutes when no seconds field follows)
//! * `±D.d` (plain decimal)
//!
//! A leading sign applies to the whole value, so `-00:30:00` is `-0.5`.
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::Degree;
use crate::obsplan_errors::ObsPlanError;

static SEXAGESIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        ^\s*
        ([+-])?\s*                       # optional sign
        (\d+(?:\.\d*)?|\.\d+)            # leading field
        (?:
            [:\s]+
            (\d+(?:\.\d*)?)              # minutes
            (?:
                [:\s]+
                (\d+(?:\.\d*)?)          # seconds
            )?
        )?
        \s*$
        "#,
    )
    .expect("static sexagesimal pattern is valid")
});

fn field_value(raw: &str) -> Result<f64, ObsPlanError> {
    raw.parse::<f64>()
        .map_err(|_| ObsPlanError::Parse(format!("malformed numeric field '{raw}'")))
}

fn check_field(field: &'static str, value: f64) -> Result<f64, ObsPlanError> {
    if (0.0..60.0).contains(&value) {
        Ok(value)
    } else {
        Err(ObsPlanError::InvalidAngleField { field, value })
    }
}

/// Parse a sexagesimal (or decimal) string into its natural unit.
///
/// Arguments
/// ---------
/// * `text`: the angle, e.g. `"-0:13:04.5"`, `"15 22 33.3"` or `"12.5"`.
///
/// Return
/// ------
/// * The value in the unit of the leading field (degrees or hours).
///
/// Errors
/// ------
/// * [`ObsPlanError::Parse`] when the text does not look like an angle, or when the leading
///   field is fractional although minutes follow (or the minutes are fractional although
///   seconds follow).
/// * [`ObsPlanError::InvalidAngleField`] when minutes or seconds fall outside `[0, 60)`.
pub fn parse_sexagesimal(text: &str) -> Result<f64, ObsPlanError> {
    let caps = SEXAGESIMAL_REGEX
        .captures(text)
        .ok_or_else(|| ObsPlanError::Parse(format!("'{text}' is not a sexagesimal angle")))?;

    let sign = match caps.get(1).map(|m| m.as_str()) {
        Some("-") => -1.0,
        _ => 1.0,
    };

    let lead_raw = caps.get(2).map_or("", |m| m.as_str());
    let minutes_raw = caps.get(3).map(|m| m.as_str());
    let seconds_raw = caps.get(4).map(|m| m.as_str());

    if minutes_raw.is_some() && lead_raw.contains('.') {
        return Err(ObsPlanError::Parse(format!(
            "fractional leading field '{lead_raw}' followed by minutes"
        )));
    }
    if let (Some(m), Some(_)) = (minutes_raw, seconds_raw) {
        if m.contains('.') {
            return Err(ObsPlanError::Parse(format!(
                "fractional minutes '{m}' followed by seconds"
            )));
        }
    }

    let lead = field_value(lead_raw)?;
    let minutes = minutes_raw
        .map(field_value)
        .transpose()?
        .map(|m| check_field("minutes", m))
        .transpose()?
        .unwrap_or(0.0);
    let seconds = seconds_raw
        .map(field_value)
        .transpose()?
        .map(|s| check_field("seconds", s))
        .transpose()?
        .unwrap_or(0.0);

    Ok(sign * (lead + minutes / 60.0 + seconds / 3600.0))
}

/// Split a value into `(negative, whole, minutes, seconds)` rounded at `ndp` decimals of seconds.
///
/// The rounding is carried into the higher fields, so the seconds never print as `60`.
pub fn split_sexagesimal(value: f64, ndp: usize) -> (bool, u64, u64, f64) {
    let negative = value.is_sign_negative() && value != 0.0;
    let scale = 10f64.powi(ndp as i32);
    let ticks = (value.abs() * 3600.0 * scale).round() as u64;
    let ticks_per_minute = (60.0 * scale) as u64;
    let ticks_per_whole = 60 * ticks_per_minute;

    let whole = ticks / ticks_per_whole;
    let minutes = (ticks % ticks_per_whole) / ticks_per_minute;
    let seconds = (ticks % ticks_per_minute) as f64 / scale;
    (negative, whole, minutes, seconds)
}

/// Format a value (degrees or hours) as a sexagesimal string.
///
/// Arguments
/// ---------
/// * `value`: amount in its natural unit.
/// * `ndp`: number of decimal places on the seconds field.
/// * `delimiter`: separator between the fields (`":"` or `" "` typically).
///
/// Return
/// ------
/// * e.g. `format_sexagesimal(-0.3932666, 2, ":") == "-00:23:35.76"`.
pub fn format_sexagesimal(value: f64, ndp: usize, delimiter: &str) -> String {
    let (negative, whole, minutes, seconds) = split_sexagesimal(value, ndp);
    let sign = if negative { "-" } else { "" };
    let width = if ndp == 0 { 2 } else { ndp + 3 };
    format!("{sign}{whole:02}{delimiter}{minutes:02}{delimiter}{seconds:0width$.ndp$}")
}

/// Parse a right ascension string (`HH MM SS.SS`) to degrees.
pub fn parse_ra_to_deg(ra: &str) -> Result<Degree, ObsPlanError> {
    let (h, m, s) = ra
        .split_whitespace()
        .collect_tuple()
        .ok_or_else(|| ObsPlanError::Parse(format!("'{ra}' is not 'HH MM SS.SS'")))?;
    Ok(parse_sexagesimal(&format!("{h}:{m}:{s}"))? * 15.0)
}

/// Parse a declination string (`±DD MM SS.SS`) to degrees.
pub fn parse_dec_to_deg(dec: &str) -> Result<Degree, ObsPlanError> {
    let (d, m, s) = dec
        .split_whitespace()
        .collect_tuple()
        .ok_or_else(|| ObsPlanError::Parse(format!("'{dec}' is not '±DD MM SS.SS'")))?;
    parse_sexagesimal(&format!("{d}:{m}:{s}"))
}
