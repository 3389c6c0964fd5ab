//! Typed cell values and type tags

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

/// A typed cell value produced by inference
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// Plain text
    String(String),

    /// Numeric value
    Float(f64),

    /// Calendar date
    Date(NaiveDate),

    /// Date with time of day
    DateTime(NaiveDateTime),

    /// Time of day as seconds since midnight
    Time(u32),
}

impl CellValue {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        CellValue::String(s.into())
    }

    /// Whether this value counts as cell content.
    ///
    /// Dates, numbers and times always do (including `0.0` and midnight);
    /// strings only when non-empty.
    pub fn has_content(&self) -> bool {
        match self {
            CellValue::String(s) => !s.is_empty(),
            CellValue::Float(_)
            | CellValue::Date(_)
            | CellValue::DateTime(_)
            | CellValue::Time(_) => true,
        }
    }

    /// Try to get the value as a number
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get the value as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a date
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get the value as a datetime
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Seconds since midnight, for time values
    pub fn as_seconds(&self) -> Option<u32> {
        match self {
            CellValue::Time(s) => Some(*s),
            _ => None,
        }
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::String(_) => "string",
            CellValue::Float(_) => "float",
            CellValue::Date(_) => "date",
            CellValue::DateTime(_) => "datetime",
            CellValue::Time(_) => "time",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Float(n) => write!(f, "{n}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::DateTime(dt) => write!(f, "{dt}"),
            CellValue::Time(secs) => write!(
                f,
                "{:02}:{:02}:{:02}",
                secs / 3600,
                secs % 3600 / 60,
                secs % 60
            ),
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Float(n as f64)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Float(n as f64)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::string(s)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

/// Classification of a cell's contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    String,
    Float,
    Date,
    Time,
    DateTime,
    Formula,
}

impl CellType {
    /// Lowercase tag name
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::String => "string",
            CellType::Float => "float",
            CellType::Date => "date",
            CellType::Time => "time",
            CellType::DateTime => "datetime",
            CellType::Formula => "formula",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_conversions() {
        assert_eq!(CellValue::from(42), CellValue::Float(42.0));
        assert_eq!(CellValue::from(3.5), CellValue::Float(3.5));
        assert_eq!(CellValue::from("hello").as_str(), Some("hello"));
        assert_eq!(CellValue::from("hello").as_float(), None);
    }

    #[test]
    fn test_has_content() {
        assert!(!CellValue::string("").has_content());
        assert!(CellValue::string(" ").has_content());
        assert!(CellValue::Float(0.0).has_content());
        assert!(CellValue::Time(0).has_content());
        let d = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert!(CellValue::Date(d).has_content());
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Float(42.0).to_string(), "42");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
        assert_eq!(CellValue::Time(3725).to_string(), "01:02:05");
        assert_eq!(CellType::DateTime.to_string(), "datetime");
    }
}
