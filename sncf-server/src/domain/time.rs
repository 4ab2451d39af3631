//! Date and time handling for journey searches.
//!
//! The upstream API works in naive local time (Europe/Paris in practice)
//! and exchanges instants in the compact `YYYYMMDDThhmmss` form. Users, on
//! the other hand, type dates however they like. [`DateTimeResolver`]
//! turns free-form input into a [`ResolvedTimestamp`], which always encodes
//! to exactly what the upstream expects.
//!
//! No timezone conversion happens anywhere: a value is the wall-clock time
//! the user (or the upstream) supplied.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use tracing::debug;

/// Upstream wire format, e.g. `20251128T080000`.
const API_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Human-facing format used when rendering results.
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Years below this are treated as a failed match (e.g. `%Y` swallowing "25").
const MIN_YEAR: i32 = 1000;

/// Error returned when an upstream timestamp is not in `YYYYMMDDThhmmss` form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid upstream timestamp: {0:?}")]
pub struct InvalidTimestamp(String);

/// Error returned when user input matches none of the accepted encodings.
///
/// Carries the input verbatim so it can be echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "could not parse date '{input}'. Supported formats:\n  \
     - ISO: '2025-11-28' or '2025-11-28 08:00'\n  \
     - European: '28/11/2025' or '28/11/2025 08:00'\n  \
     - Written: 'November 28, 2025 8:00am' or '28 November 2025'"
)]
pub struct UnparseableDateTime {
    pub input: String,
}

/// A canonical, unambiguous point in time at second precision.
///
/// # Examples
///
/// ```
/// use sncf_server::domain::ResolvedTimestamp;
///
/// let ts = ResolvedTimestamp::parse_api("20251128T080000").unwrap();
/// assert_eq!(ts.to_api_string(), "20251128T080000");
/// assert_eq!(ts.to_string(), "2025-11-28 08:00");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedTimestamp(NaiveDateTime);

impl ResolvedTimestamp {
    /// Wrap a naive datetime, dropping any sub-second component.
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime.with_nanosecond(0).unwrap_or(datetime))
    }

    /// Parse the upstream `YYYYMMDDThhmmss` form.
    pub fn parse_api(s: &str) -> Result<Self, InvalidTimestamp> {
        NaiveDateTime::parse_from_str(s, API_FORMAT)
            .map(Self::new)
            .map_err(|_| InvalidTimestamp(s.to_string()))
    }

    /// Encode in the exact form the upstream API requires.
    pub fn to_api_string(&self) -> String {
        self.0.format(API_FORMAT).to_string()
    }

    /// Returns the underlying naive datetime.
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Whole minutes from `self` to `later` (negative if `later` is earlier).
    pub fn minutes_until(&self, later: Self) -> i64 {
        later.0.signed_duration_since(self.0).num_minutes()
    }
}

impl fmt::Debug for ResolvedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResolvedTimestamp({})", self.to_api_string())
    }
}

impl fmt::Display for ResolvedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

/// What a pattern yields once it matches.
#[derive(Debug, Clone, Copy)]
enum Shape {
    DateTime,
    /// Date only; resolves to midnight.
    Date,
    /// Time only; resolves on the reference date.
    Time,
}

/// Which family of encodings matched, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Iso,
    European,
    Written,
    TimeOnly,
}

/// Encoding families in the order they are tried.
///
/// Whitespace in a pattern matches any run of whitespace (including none),
/// and commas are stripped from the input beforehand, so "8:00am",
/// "8:00 am" and "November 28, 2025" all go through the same patterns.
const ENCODINGS: &[(Encoding, &[(&str, Shape)])] = &[
    (
        Encoding::Iso,
        &[
            ("%Y-%m-%d %H:%M:%S", Shape::DateTime),
            ("%Y-%m-%dT%H:%M:%S", Shape::DateTime),
            ("%Y-%m-%d %H:%M", Shape::DateTime),
            ("%Y-%m-%dT%H:%M", Shape::DateTime),
            ("%Y%m%dT%H%M%S", Shape::DateTime),
            ("%Y-%m-%d", Shape::Date),
        ],
    ),
    // Day-first only. Month-first is never attempted, so 03/04/2025 is
    // always the 3rd of April.
    (
        Encoding::European,
        &[
            ("%d/%m/%Y %H:%M:%S", Shape::DateTime),
            ("%d/%m/%Y %I:%M %p", Shape::DateTime),
            ("%d/%m/%Y %H:%M", Shape::DateTime),
            ("%d/%m/%Y %Hh%M", Shape::DateTime),
            ("%d/%m/%Y", Shape::Date),
            ("%d/%m/%y %H:%M", Shape::DateTime),
            ("%d/%m/%y", Shape::Date),
        ],
    ),
    (
        Encoding::Written,
        &[
            ("%B %d %Y %I:%M %p", Shape::DateTime),
            ("%B %d %Y %H:%M", Shape::DateTime),
            ("%B %d %Y", Shape::Date),
            ("%d %B %Y %I:%M %p", Shape::DateTime),
            ("%d %B %Y %H:%M", Shape::DateTime),
            ("%d %B %Y", Shape::Date),
        ],
    ),
    (
        Encoding::TimeOnly,
        &[
            ("%I:%M %p", Shape::Time),
            ("%H:%M", Shape::Time),
            ("%Hh%M", Shape::Time),
        ],
    ),
];

/// Resolves free-form date/time strings into [`ResolvedTimestamp`]s.
///
/// Holds the reference instant used for absent input ("now") and for
/// time-only input (today at that time).
///
/// # Examples
///
/// ```
/// use sncf_server::domain::DateTimeResolver;
/// use chrono::NaiveDate;
///
/// let now = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
/// let resolver = DateTimeResolver::at(now);
///
/// for input in ["2025-11-28 08:00", "28/11/2025 08:00", "November 28, 2025 8:00am"] {
///     let ts = resolver.resolve(Some(input)).unwrap();
///     assert_eq!(ts.to_api_string(), "20251128T080000");
/// }
///
/// // Day-first, always
/// let ts = resolver.resolve(Some("03/04/2025")).unwrap();
/// assert_eq!(ts.to_api_string(), "20250403T000000");
///
/// assert!(resolver.resolve(Some("next tuesday-ish")).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DateTimeResolver {
    reference: NaiveDateTime,
}

impl DateTimeResolver {
    /// A resolver whose "now" is the host's current local time.
    pub fn now() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// A resolver with a fixed reference instant.
    pub fn at(reference: NaiveDateTime) -> Self {
        let reference = reference
            .with_second(0)
            .and_then(|dt| dt.with_nanosecond(0))
            .unwrap_or(reference);
        Self { reference }
    }

    /// The reference instant, truncated to the minute.
    pub fn reference(&self) -> ResolvedTimestamp {
        ResolvedTimestamp::new(self.reference)
    }

    /// Resolve user input.
    ///
    /// `None` or blank input resolves to the reference instant. Anything
    /// else must match one of the accepted encodings; there is no fallback
    /// to "now" for input that fails to parse.
    pub fn resolve(&self, input: Option<&str>) -> Result<ResolvedTimestamp, UnparseableDateTime> {
        let Some(raw) = input.filter(|s| !s.trim().is_empty()) else {
            return Ok(self.reference());
        };

        let normalized = normalize(raw);

        for (encoding, patterns) in ENCODINGS {
            for (format, shape) in *patterns {
                if let Some(datetime) = self.try_pattern(&normalized, format, *shape) {
                    debug!(input = raw, ?encoding, format, "resolved datetime");
                    return Ok(ResolvedTimestamp::new(datetime));
                }
            }
        }

        Err(UnparseableDateTime {
            input: raw.to_string(),
        })
    }

    fn try_pattern(&self, input: &str, format: &str, shape: Shape) -> Option<NaiveDateTime> {
        let datetime = match shape {
            Shape::DateTime => NaiveDateTime::parse_from_str(input, format).ok()?,
            Shape::Date => NaiveDate::parse_from_str(input, format)
                .ok()?
                .and_time(NaiveTime::MIN),
            Shape::Time => self
                .reference
                .date()
                .and_time(NaiveTime::parse_from_str(input, format).ok()?),
        };

        (datetime.year() >= MIN_YEAR).then_some(datetime)
    }
}

/// Trim, drop commas, and collapse whitespace runs to single spaces.
fn normalize(input: &str) -> String {
    input
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn reference() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// Minute-precision instants in a plausible booking range.
    fn instant() -> impl Strategy<Value = NaiveDateTime> {
        (2000i32..2100, 1u32..=12, 1u32..=28, 0u32..24, 0u32..60).prop_map(|(y, m, d, h, min)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap()
        })
    }

    proptest! {
        /// Every accepted encoding of the same instant resolves identically.
        #[test]
        fn encodings_agree(dt in instant()) {
            let resolver = DateTimeResolver::at(reference());
            let expected = dt.format(API_FORMAT).to_string();

            let iso = dt.format("%Y-%m-%d %H:%M").to_string();
            let european = dt.format("%d/%m/%Y %H:%M").to_string();
            let written = format!(
                "{} {}, {} {}:{}{}",
                dt.format("%B"),
                dt.day(),
                dt.year(),
                dt.hour12().1,
                dt.format("%M"),
                if dt.hour12().0 { "pm" } else { "am" },
            );

            for input in [iso, european, written] {
                let ts = resolver.resolve(Some(&input)).unwrap();
                prop_assert_eq!(ts.to_api_string(), expected.clone(), "input {}", input);
            }
        }

        /// Displayed timestamps re-parse to the same minute.
        #[test]
        fn display_reparses(dt in instant()) {
            let resolver = DateTimeResolver::at(reference());
            let ts = ResolvedTimestamp::new(dt);
            let reparsed = resolver.resolve(Some(&ts.to_string())).unwrap();
            prop_assert_eq!(reparsed, ts);
        }

        /// The canonical form is a fixed point of parse/encode.
        #[test]
        fn api_form_roundtrips(dt in instant()) {
            let ts = ResolvedTimestamp::new(dt);
            prop_assert_eq!(ResolvedTimestamp::parse_api(&ts.to_api_string()).unwrap(), ts);
        }
    }
}
