//! Parsing and formatting for `dc:date` values.
//!
//! OPF dates come in two shapes: full timestamps, and partial dates like
//! `2019` or `2019-05` that older tools wrote. Both parse into a
//! [`DateTime<Utc>`], with missing components clamped to the start of
//! the period.

use chrono::{DateTime, SecondsFormat, TimeZone as _, Utc};
use winnow::{
    ModalResult, Parser as _,
    combinator::{opt, preceded},
    error::{ContextError, StrContext, StrContextValue},
    token::take_while,
};

/// One of the lifecycle events a `dc:date` can describe through its
/// `opf:event` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateEvent {
    Creation,
    Publication,
    Modification,
}

impl DateEvent {
    /// Each event the `opf:event` attribute is expected to carry.
    pub const ALL: &'static [DateEvent] = &[
        DateEvent::Creation,
        DateEvent::Publication,
        DateEvent::Modification,
    ];

    /// The value stored in the `opf:event` attribute.
    ///
    /// ```
    /// use opf_metadata::opf::date::DateEvent;
    ///
    /// assert_eq!(DateEvent::Publication.code(), "publication");
    /// ```
    pub const fn code(&self) -> &'static str {
        match self {
            DateEvent::Creation => "creation",
            DateEvent::Publication => "publication",
            DateEvent::Modification => "modification",
        }
    }

    /// Finds the event for an `opf:event` attribute value.
    pub fn from_code(code: &str) -> Option<DateEvent> {
        match code {
            "creation" => Some(DateEvent::Creation),
            "publication" => Some(DateEvent::Publication),
            "modification" => Some(DateEvent::Modification),
            _ => None,
        }
    }
}

/// Parses a `dc:date` value.
///
/// Full RFC 3339 timestamps are taken as-is. Partial dates clamp to
/// midnight UTC on the first of any missing component.
pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    let (year, month, day) = parse_partial_date
        .parse(raw)
        .inspect_err(|e| log::debug!("A `dc:date` didn't parse as a date. err: {e}"))
        .ok()?;

    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

/// Formats a date the way `dc:date` stores it, with millisecond
/// precision and a `Z` suffix.
pub(crate) fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a partial date, like `2019`, `2019-05`, or `2019-05-30`.
///
/// A month or day that isn't given comes back as `1`.
fn parse_partial_date(input: &mut &str) -> ModalResult<(i32, u32, u32), ContextError> {
    let year: i32 = take_while(4usize, |c: char| c.is_ascii_digit())
        .parse_to()
        .context(StrContext::Expected(StrContextValue::Description(
            "four-digit year",
        )))
        .parse_next(input)?;

    let month: Option<u32> = opt(preceded('-', two_digits)).parse_next(input)?;

    // a day can only follow a month
    let day: Option<u32> = match month {
        Some(_) => opt(preceded('-', two_digits)).parse_next(input)?,
        None => None,
    };

    Ok((year, month.unwrap_or(1), day.unwrap_or(1)))
}

/// Parses one two-digit date component.
fn two_digits(input: &mut &str) -> ModalResult<u32, ContextError> {
    take_while(2usize, |c: char| c.is_ascii_digit())
        .parse_to()
        .context(StrContext::Expected(StrContextValue::Description(
            "two-digit date component",
        )))
        .parse_next(input)
}
