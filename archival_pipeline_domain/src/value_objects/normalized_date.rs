// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Date normalization rules from §4.7.
//!
//! GraphEnricher harvests raw date strings from several independent
//! sources (`dcterms:created`/`dcterms:modified` metadata, filesystem
//! `st_mtime`) in a handful of different formats and must fold them all
//! down to a single canonical `YYYY-MM-DD` form, shared by IRI across every
//! record that falls on the same calendar day (§3 invariant 7, §8
//! invariant 9).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Provenance tag attached to a derived Date entity, recording which
/// source the enricher harvested the raw value from (§4.7 Group A).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateProvenance {
    /// `"Derived from embedded metadata"` — `dcterms:created`/`modified`.
    EmbeddedMetadata,
    /// `"Derived from file system metadata"` — filesystem `st_mtime`.
    FileSystemMetadata,
}

impl DateProvenance {
    pub fn tag(self) -> &'static str {
        match self {
            DateProvenance::EmbeddedMetadata => "Derived from embedded metadata",
            DateProvenance::FileSystemMetadata => "Derived from file system metadata",
        }
    }
}

/// A successfully normalized date: the canonical `YYYY-MM-DD` value plus a
/// human-readable `expressedDate` rendered with fixed English month names
/// (SPEC_FULL §9 "the spec fixes English month names for reproducibility",
/// resolving the source's locale-dependent month-name bug).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDate {
    value: NaiveDate,
}

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September", "October", "November",
    "December",
];

static ISO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})([T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})?)?$").unwrap());
static SLASH_DMY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").unwrap());
static DASH_DMY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})-(\d{2})-(\d{4})$").unwrap());
static SLASH_YMD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})/(\d{2})/(\d{2})$").unwrap());
static DOT_DMY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})$").unwrap());
static YEAR_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").unwrap());
static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?([eE][+-]?\d+)?$").unwrap());

impl NormalizedDate {
    /// Parses `raw` against every accepted format in §4.7's normalization
    /// rules, in the order given there. Returns `None` (the caller logs a
    /// warning and skips the value) for anything unrecognized.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(caps) = ISO_RE.captures(raw) {
            let (y, m, d) = (caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?);
            return NaiveDate::from_ymd_opt(y, m, d).map(|value| Self { value });
        }
        if let Some(caps) = SLASH_DMY_RE.captures(raw) {
            return Self::from_dmy(&caps[3], &caps[2], &caps[1]);
        }
        if let Some(caps) = DASH_DMY_RE.captures(raw) {
            return Self::from_dmy(&caps[3], &caps[2], &caps[1]);
        }
        if let Some(caps) = DOT_DMY_RE.captures(raw) {
            return Self::from_dmy(&caps[3], &caps[2], &caps[1]);
        }
        if let Some(caps) = SLASH_YMD_RE.captures(raw) {
            return Self::from_dmy(&caps[1], &caps[2], &caps[3]);
        }
        if let Some(caps) = YEAR_ONLY_RE.captures(raw) {
            let y: i32 = caps[1].parse().ok()?;
            return NaiveDate::from_ymd_opt(y, 1, 1).map(|value| Self { value });
        }
        if NUMERIC_RE.is_match(raw) {
            return Self::from_unix_timestamp(raw);
        }
        None
    }

    fn from_dmy(y: &str, m: &str, d: &str) -> Option<Self> {
        let (y, m, d) = (y.parse().ok()?, m.parse().ok()?, d.parse().ok()?);
        NaiveDate::from_ymd_opt(y, m, d).map(|value| Self { value })
    }

    /// Accepts integer, fractional, or scientific-notation Unix timestamps
    /// (§4.7: "numeric Unix timestamp (integer, fractional, scientific)").
    fn from_unix_timestamp(raw: &str) -> Option<Self> {
        let seconds: f64 = raw.parse().ok()?;
        if !seconds.is_finite() {
            return None;
        }
        let millis = (seconds * 1000.0).round() as i64;
        let dt: DateTime<Utc> = Utc.timestamp_millis_opt(millis).single()?;
        Some(Self { value: dt.date_naive() })
    }

    /// Canonical `YYYY-MM-DD` output form (§4.7 "Output format").
    pub fn iso(&self) -> String {
        self.value.format("%Y-%m-%d").to_string()
    }

    /// The date's ID fragment for `date_YYYYMMDD` IRIs (§6.6).
    pub fn id_fragment(&self) -> String {
        self.value.format("%Y%m%d").to_string()
    }

    /// `expressedDate`: a human-readable rendering in fixed English month
    /// names, e.g. "12 July 2025", independent of host locale.
    pub fn expressed_date(&self) -> String {
        use chrono::Datelike;
        format!("{} {} {}", self.value.day(), MONTH_NAMES[self.value.month0() as usize], self.value.year())
    }

    pub fn naive_date(&self) -> NaiveDate {
        self.value
    }
}

/// Parses a filesystem mtime (seconds since epoch, as reported by
/// `std::fs::Metadata`) into a [`NormalizedDate`], used by the
/// `st_mtime`-sourced enrichment passes (§4.7).
pub fn normalize_mtime(seconds_since_epoch: i64) -> Option<NormalizedDate> {
    let dt = DateTime::<Utc>::from_timestamp(seconds_since_epoch, 0)?;
    Some(NormalizedDate { value: dt.date_naive() })
}

/// Parses an already-built [`NaiveDateTime`], used when a source hands
/// back a parsed timestamp rather than a raw string.
pub fn normalize_naive_datetime(dt: NaiveDateTime) -> NormalizedDate {
    NormalizedDate { value: dt.date() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_date_round_trips() {
        assert_eq!(NormalizedDate::parse("2025-01-15").unwrap().iso(), "2025-01-15");
    }

    #[test]
    fn dd_mm_yyyy_slash() {
        assert_eq!(NormalizedDate::parse("15/01/2025").unwrap().iso(), "2025-01-15");
    }

    #[test]
    fn unix_timestamp_integer() {
        assert_eq!(NormalizedDate::parse("1752333691").unwrap().iso(), "2025-07-12");
    }

    #[test]
    fn iso_with_time_and_zulu_offset() {
        assert_eq!(NormalizedDate::parse("2025-07-12T10:30:00Z").unwrap().iso(), "2025-07-12");
    }

    #[test]
    fn gibberish_yields_none() {
        assert!(NormalizedDate::parse("gibberish").is_none());
    }

    #[test]
    fn dd_mm_yyyy_dash_and_dot_variants() {
        assert_eq!(NormalizedDate::parse("15-01-2025").unwrap().iso(), "2025-01-15");
        assert_eq!(NormalizedDate::parse("15.01.2025").unwrap().iso(), "2025-01-15");
    }

    #[test]
    fn yyyy_slash_mm_slash_dd() {
        assert_eq!(NormalizedDate::parse("2025/07/12").unwrap().iso(), "2025-07-12");
    }

    #[test]
    fn year_only_defaults_to_january_first() {
        assert_eq!(NormalizedDate::parse("2025").unwrap().iso(), "2025-01-01");
    }

    #[test]
    fn scientific_notation_timestamp() {
        let a = NormalizedDate::parse("1.752333691e9").unwrap();
        assert_eq!(a.iso(), "2025-07-12");
    }

    #[test]
    fn expressed_date_uses_fixed_english_month_names() {
        let d = NormalizedDate::parse("2025-07-12").unwrap();
        assert_eq!(d.expressed_date(), "12 July 2025");
    }

    #[test]
    fn two_dates_same_day_share_id_fragment() {
        let a = NormalizedDate::parse("2025-07-12T01:00:00Z").unwrap();
        let b = NormalizedDate::parse("1752321600").unwrap();
        assert_eq!(a.id_fragment(), b.id_fragment());
    }

    #[test]
    fn out_of_range_date_parts_are_rejected() {
        assert!(NormalizedDate::parse("2025-13-40").is_none());
    }
}
