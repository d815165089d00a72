//! Document metadata from file names
//!
//! Staged files are named `{ID}_{YYYYMMDD}_{HHMMSS}.{ext}`, e.g.
//! `5630310004451_20260211_030533.xlsx`. Anything else falls back to the
//! first embedded `YYYYMMDD` date, then to today's date.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[A-Za-z0-9]{1,5}$").expect("valid extension regex"));

/// Which strategy produced the metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaSource {
    /// `{ID}_{YYYYMMDD}_...` matched
    Pattern,
    /// Only a bare `YYYYMMDD` was found
    EmbeddedDate,
    /// Nothing matched; date is today
    Today,
}

/// Identifier and date recovered from a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameMeta {
    /// Empty unless the full pattern matched
    pub identifier: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub source: MetaSource,
    /// Set whenever a fallback was taken
    pub warning: Option<String>,
}

/// Extract metadata, never failing
pub fn extract_filename_meta(filename: &str, today: NaiveDate) -> FilenameMeta {
    let stem = EXTENSION.replace(filename, "");

    let mut parts = stem.split('_');
    if let (Some(id), Some(date_part)) = (parts.next(), parts.next()) {
        if !id.is_empty() {
            if let Some(date) = parse_compact_date(date_part) {
                log::debug!("Filename '{}': id={}, date={}", filename, id, date);
                return FilenameMeta {
                    identifier: id.to_string(),
                    date: date.format("%Y-%m-%d").to_string(),
                    source: MetaSource::Pattern,
                    warning: None,
                };
            }
        }
    }

    if let Some(date) = find_embedded_date(&stem) {
        let date = date.format("%Y-%m-%d").to_string();
        return FilenameMeta {
            identifier: String::new(),
            warning: Some(format!(
                "Could not extract identifier from filename '{}', using embedded date {}",
                filename, date
            )),
            date,
            source: MetaSource::EmbeddedDate,
        };
    }

    let date = today.format("%Y-%m-%d").to_string();
    FilenameMeta {
        identifier: String::new(),
        warning: Some(format!(
            "Could not extract date from filename '{}', using today: {}",
            filename, date
        )),
        date,
        source: MetaSource::Today,
    }
}

/// Exactly eight ASCII digits forming a real calendar date
fn parse_compact_date(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// First 8-digit window anywhere in `s` that is a valid date
fn find_embedded_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() < 8 {
        return None;
    }
    (0..=bytes.len() - 8)
        .filter(|&i| bytes[i..i + 8].iter().all(u8::is_ascii_digit))
        .find_map(|i| parse_compact_date(&s[i..i + 8]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_full_pattern() {
        let meta = extract_filename_meta("5630310004451_20260211_030533.xlsx", today());
        assert_eq!(meta.identifier, "5630310004451");
        assert_eq!(meta.date, "2026-02-11");
        assert_eq!(meta.source, MetaSource::Pattern);
        assert!(meta.warning.is_none());
    }

    #[test]
    fn test_missing_extension() {
        let meta = extract_filename_meta("PO991_20250101_101010", today());
        assert_eq!(meta.identifier, "PO991");
        assert_eq!(meta.date, "2025-01-01");
    }

    #[test]
    fn test_extra_underscore_groups_ignored() {
        let meta = extract_filename_meta("PO991_20250101_101010_copy_2.xlsx", today());
        assert_eq!(meta.identifier, "PO991");
        assert_eq!(meta.date, "2025-01-01");
    }

    #[test]
    fn test_non_numeric_date_segment_falls_through() {
        let meta = extract_filename_meta("PO_ZHPL_20260105_000000.xlsx", today());
        assert_eq!(meta.identifier, "");
        assert_eq!(meta.date, "2026-01-05");
        assert_eq!(meta.source, MetaSource::EmbeddedDate);
        assert!(meta.warning.is_some());
    }

    #[test]
    fn test_embedded_date_skips_invalid_windows() {
        // "99999999" is not a date; the scan keeps sliding
        let meta = extract_filename_meta("report-99999999-20260301.xls", today());
        assert_eq!(meta.date, "2026-03-01");
    }

    #[test]
    fn test_no_date_uses_today() {
        let meta = extract_filename_meta("weekly report.xlsx", today());
        assert_eq!(meta.identifier, "");
        assert_eq!(meta.date, "2026-10-19");
        assert_eq!(meta.source, MetaSource::Today);
        assert!(meta.warning.unwrap().contains("using today"));
    }

    #[test]
    fn test_invalid_calendar_date_is_not_a_match() {
        let meta = extract_filename_meta("PO1_20261345_000000.xlsx", today());
        assert_eq!(meta.source, MetaSource::Today);
    }
}
