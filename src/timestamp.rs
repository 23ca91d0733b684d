//! ISO-8601 timestamp normalization for values coming back from the validation backend.
//!
//! The backend may emit anywhere from zero to nine fractional-second digits and either a
//! `Z` suffix or a numeric offset. Everything is rewritten to exactly six fractional
//! digits with an explicit offset before parsing.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::warn;

const MICROSECOND_DIGITS: usize = 6;

#[derive(Error, Debug)]
pub enum TimestampError {
    #[error("invalid timestamp {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Rewrite a wire timestamp into a form with an explicit offset and, when a fractional
/// part is present, exactly six fractional digits.
pub fn normalize_timestamp(input: &str) -> String {
    let with_offset = match input.strip_suffix('Z') {
        Some(base) => format!("{}+00:00", base),
        None => input.to_string(),
    };

    match split_fraction(&with_offset) {
        Some((base, fraction, offset)) => {
            let mut micros: String = fraction.chars().take(MICROSECOND_DIGITS).collect();
            while micros.len() < MICROSECOND_DIGITS {
                micros.push('0');
            }
            format!("{}.{}{}", base, micros, offset)
        }
        None => with_offset,
    }
}

/// Split `<date-time>.<digits><sign><offset>` into its three parts.
fn split_fraction(value: &str) -> Option<(&str, &str, &str)> {
    let dot = value.rfind('.')?;
    let (base, rest) = (&value[..dot], &value[dot + 1..]);
    if base.is_empty() {
        return None;
    }

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let (fraction, offset) = rest.split_at(digits);
    if fraction.is_empty() || offset.len() < 2 {
        return None;
    }
    if !(offset.starts_with('+') || offset.starts_with('-')) {
        return None;
    }

    Some((base, fraction, offset))
}

/// Normalize and parse a wire timestamp into a microsecond-precision, offset-aware value.
pub fn parse_iso_timestamp(input: &str) -> Result<DateTime<FixedOffset>, TimestampError> {
    let normalized = normalize_timestamp(input);
    DateTime::parse_from_rfc3339(&normalized).map_err(|source| TimestampError::Parse {
        input: input.to_string(),
        source,
    })
}

/// Strict serde adapter: an unparsable timestamp fails the whole decode.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_iso_timestamp(&raw).map_err(serde::de::Error::custom)
}

/// Lenient serde adapter. Missing, null and empty values become `None`, and so does a
/// value that cannot be parsed (after logging it).
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw.filter(|value| !value.is_empty()) else {
        return Ok(None);
    };

    match parse_iso_timestamp(&raw) {
        Ok(timestamp) => Ok(Some(timestamp)),
        Err(e) => {
            warn!(value = %raw, error = %e, "ignoring malformed timestamp");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    fn reference(input: &str) -> DateTime<FixedOffset> {
        let parsed = DateTime::parse_from_rfc3339(input).unwrap();
        let micros = parsed.nanosecond() / 1_000 * 1_000;
        parsed.with_nanosecond(micros).unwrap()
    }

    #[test]
    fn test_normalize_nanoseconds_with_zulu() {
        assert_eq!(
            normalize_timestamp("2024-01-15T10:30:00.123456789Z"),
            "2024-01-15T10:30:00.123456+00:00"
        );
    }

    #[test]
    fn test_normalize_pads_short_fraction() {
        assert_eq!(
            normalize_timestamp("2024-01-15T10:30:00.5+02:00"),
            "2024-01-15T10:30:00.500000+02:00"
        );
    }

    #[test]
    fn test_normalize_negative_offset() {
        assert_eq!(
            normalize_timestamp("2024-01-15T10:30:00.1234567-05:30"),
            "2024-01-15T10:30:00.123456-05:30"
        );
    }

    #[test]
    fn test_normalize_without_fraction_is_untouched() {
        assert_eq!(
            normalize_timestamp("2024-01-15T10:30:00+02:00"),
            "2024-01-15T10:30:00+02:00"
        );
        assert_eq!(
            normalize_timestamp("2024-01-15T10:30:00Z"),
            "2024-01-15T10:30:00+00:00"
        );
    }

    #[test]
    fn test_normalize_fraction_without_offset_is_untouched() {
        assert_eq!(
            normalize_timestamp("2024-01-15T10:30:00.1234567"),
            "2024-01-15T10:30:00.1234567"
        );
    }

    #[test]
    fn test_parse_nanoseconds_example() {
        let parsed = parse_iso_timestamp("2024-01-15T10:30:00.123456789Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-01-15T10:30:00.123456+00:00").unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_parse_single_digit_example() {
        let parsed = parse_iso_timestamp("2024-01-15T10:30:00.5+02:00").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-01-15T10:30:00.500000+02:00").unwrap();
        assert_eq!(parsed, expected);
        assert_eq!(parsed.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn test_parse_matches_reference_for_every_precision() {
        let digits = "987654321";
        for precision in 1..=digits.len() {
            for suffix in ["Z", "+00:00", "+05:45", "-08:00"] {
                let input = format!("2023-06-30T23:59:59.{}{}", &digits[..precision], suffix);
                let parsed = parse_iso_timestamp(&input).unwrap();
                assert_eq!(parsed, reference(&input), "input {}", input);
            }
        }
    }

    #[test]
    fn test_parse_is_idempotent_on_microsecond_input() {
        let input = "2024-03-01T08:00:00.654321+01:00";
        let once = parse_iso_timestamp(input).unwrap();
        let twice = parse_iso_timestamp(&once.to_rfc3339()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(normalize_timestamp(input), input);
    }

    #[test]
    fn test_parse_plain_timestamp() {
        let parsed = parse_iso_timestamp("2024-01-15T10:30:00+00:00").unwrap();
        assert_eq!(parsed.with_timezone(&Utc).timestamp(), 1_705_314_600);
    }

    #[test]
    fn test_parse_rejects_naive_and_garbage() {
        assert!(parse_iso_timestamp("2024-01-15T10:30:00").is_err());
        assert!(parse_iso_timestamp("yesterday").is_err());
        assert!(parse_iso_timestamp("").is_err());

        let err = parse_iso_timestamp("2024-13-45T10:30:00Z").unwrap_err();
        assert!(err.to_string().contains("2024-13-45T10:30:00Z"));
    }

    #[derive(Debug, Deserialize)]
    struct Strict {
        #[serde(deserialize_with = "deserialize_timestamp")]
        at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Deserialize)]
    struct Lenient {
        #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
        at: Option<DateTime<FixedOffset>>,
    }

    #[test]
    fn test_strict_adapter_rejects_malformed() {
        let ok: Strict = serde_json::from_str(r#"{"at": "2024-01-15T10:30:00.1Z"}"#).unwrap();
        assert_eq!(ok.at.nanosecond(), 100_000_000);

        let err = serde_json::from_str::<Strict>(r#"{"at": "not a date"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_lenient_adapter_degrades_to_none() {
        let missing: Lenient = serde_json::from_str("{}").unwrap();
        assert!(missing.at.is_none());

        let null: Lenient = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert!(null.at.is_none());

        let empty: Lenient = serde_json::from_str(r#"{"at": ""}"#).unwrap();
        assert!(empty.at.is_none());

        let malformed: Lenient = serde_json::from_str(r#"{"at": "31/12/2023"}"#).unwrap();
        assert!(malformed.at.is_none());

        let present: Lenient =
            serde_json::from_str(r#"{"at": "2024-01-15T10:30:00.12Z"}"#).unwrap();
        assert_eq!(present.at.unwrap().nanosecond(), 120_000_000);
    }
}
