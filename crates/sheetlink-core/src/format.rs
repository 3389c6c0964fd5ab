//! Date, time and datetime patterns carried by a workbook handle

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::value::CellValue;

/// Default date pattern (`day/month/year`)
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Default time pattern (`hour:minute:second`)
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Default datetime pattern (`day/month/year hour:minute:second`)
pub const DEFAULT_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// The three temporal classifications a raw string can be probed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Date,
    Time,
    DateTime,
}

impl TemporalKind {
    /// All kinds, in the order inference probes them
    pub const ALL: [TemporalKind; 3] = [
        TemporalKind::DateTime,
        TemporalKind::Date,
        TemporalKind::Time,
    ];
}

/// strftime-style patterns used to recognise and render temporal cells.
///
/// Every probe reads the current pattern, so changing a field affects all
/// later classifications and conversions on the owning handle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formats {
    /// Pattern for date cells
    pub date: String,
    /// Pattern for time-of-day cells
    pub time: String,
    /// Pattern for datetime cells
    pub datetime: String,
}

impl Default for Formats {
    fn default() -> Self {
        Self {
            date: DEFAULT_DATE_FORMAT.to_string(),
            time: DEFAULT_TIME_FORMAT.to_string(),
            datetime: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl Formats {
    /// Current pattern for a kind
    pub fn pattern(&self, kind: TemporalKind) -> &str {
        match kind {
            TemporalKind::Date => &self.date,
            TemporalKind::Time => &self.time,
            TemporalKind::DateTime => &self.datetime,
        }
    }

    /// Replace the pattern for a kind
    pub fn set_pattern(&mut self, kind: TemporalKind, pattern: impl Into<String>) {
        let slot = match kind {
            TemporalKind::Date => &mut self.date,
            TemporalKind::Time => &mut self.time,
            TemporalKind::DateTime => &mut self.datetime,
        };
        *slot = pattern.into();
    }

    /// Parse `raw` as `kind`, requiring the whole string to match.
    ///
    /// Times convert to seconds since midnight.
    pub fn parse(&self, kind: TemporalKind, raw: &str) -> Option<CellValue> {
        match kind {
            TemporalKind::Date => self.parse_date(raw).map(CellValue::Date),
            TemporalKind::DateTime => self.parse_datetime(raw).map(CellValue::DateTime),
            TemporalKind::Time => self.parse_time(raw).map(CellValue::Time),
        }
    }

    /// Whether `raw` fully matches `kind`'s pattern
    pub fn matches(&self, kind: TemporalKind, raw: &str) -> bool {
        self.parse(kind, raw).is_some()
    }

    /// Whether `raw` is a date under the current date pattern
    pub fn is_date(&self, raw: &str) -> bool {
        self.matches(TemporalKind::Date, raw)
    }

    /// Whether `raw` is a time under the current time pattern
    pub fn is_time(&self, raw: &str) -> bool {
        self.matches(TemporalKind::Time, raw)
    }

    /// Whether `raw` is a datetime under the current datetime pattern
    pub fn is_datetime(&self, raw: &str) -> bool {
        self.matches(TemporalKind::DateTime, raw)
    }

    /// Parse a date under the current date pattern
    pub fn parse_date(&self, raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, &self.date).ok()
    }

    /// Parse a datetime under the current datetime pattern
    pub fn parse_datetime(&self, raw: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, &self.datetime).ok()
    }

    /// Parse a time of day under the current time pattern, as seconds since midnight
    pub fn parse_time(&self, raw: &str) -> Option<u32> {
        NaiveTime::parse_from_str(raw, &self.time)
            .ok()
            .map(|t| t.num_seconds_from_midnight())
    }

    /// Render a value as the raw string a remote store receives.
    ///
    /// Temporal values use the current patterns so the result classifies back
    /// to the same kind. A pattern chrono cannot render falls back to the
    /// value's plain display form.
    pub fn to_raw(&self, value: &CellValue) -> String {
        let rendered = match value {
            CellValue::String(s) => return s.clone(),
            CellValue::Float(n) => return n.to_string(),
            CellValue::Date(d) => render(d.format(&self.date)),
            CellValue::DateTime(dt) => render(dt.format(&self.datetime)),
            CellValue::Time(secs) => NaiveTime::from_num_seconds_from_midnight_opt(*secs, 0)
                .and_then(|t| render(t.format(&self.time))),
        };
        rendered.unwrap_or_else(|| value.to_string())
    }
}

fn render(item: impl std::fmt::Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{item}").ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let formats = Formats::default();
        assert!(formats.is_date("31/12/2020"));
        assert!(formats.is_time("23:59:59"));
        assert!(formats.is_datetime("31/12/2020 23:59:59"));
    }

    #[test]
    fn test_probes_require_full_match() {
        let formats = Formats::default();
        assert!(!formats.is_date("31/12/2020 10:00:00"));
        assert!(!formats.is_date("31/12/2020x"));
        assert!(!formats.is_time("10:00"));
        assert!(!formats.is_datetime("31/12/2020"));
        assert!(!formats.is_date("32/12/2020"));
        assert!(!formats.is_date(""));
    }

    #[test]
    fn test_parse_time_seconds() {
        let formats = Formats::default();
        assert_eq!(formats.parse_time("00:00:00"), Some(0));
        assert_eq!(formats.parse_time("01:02:03"), Some(3723));
        assert_eq!(formats.parse_time("25:00:00"), None);
    }

    #[test]
    fn test_set_pattern() {
        let mut formats = Formats::default();
        formats.set_pattern(TemporalKind::Date, "%Y-%m-%d");
        assert_eq!(formats.pattern(TemporalKind::Date), "%Y-%m-%d");
        assert!(formats.is_date("2020-12-31"));
        assert!(!formats.is_date("31/12/2020"));
    }

    #[test]
    fn test_to_raw_uses_patterns() {
        let formats = Formats::default();
        let d = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        assert_eq!(formats.to_raw(&CellValue::Date(d)), "31/12/2020");
        assert_eq!(formats.to_raw(&CellValue::Time(3723)), "01:02:03");
        assert_eq!(formats.to_raw(&CellValue::Float(42.0)), "42");
        assert_eq!(formats.to_raw(&CellValue::string("=A1")), "=A1");
    }
}
