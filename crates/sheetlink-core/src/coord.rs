//! Coordinate normalization
//!
//! Callers may address a cell with numbers or with spreadsheet column letters,
//! in either axis position. Everything is folded into a 1-based [`CellCoord`].

use std::fmt;

use crate::error::{Error, Result};

/// One half of a caller-supplied coordinate: a number or a letter sequence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    /// A 1-based index (values below 1 are rejected during normalization)
    Index(i64),
    /// Column letters, case-insensitive (`"A"`, `"aa"`, ...)
    Letters(String),
}

impl From<u32> for Axis {
    fn from(n: u32) -> Self {
        Axis::Index(n as i64)
    }
}

impl From<i32> for Axis {
    fn from(n: i32) -> Self {
        Axis::Index(n as i64)
    }
}

impl From<i64> for Axis {
    fn from(n: i64) -> Self {
        Axis::Index(n)
    }
}

impl From<usize> for Axis {
    fn from(n: usize) -> Self {
        Axis::Index(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Axis {
    fn from(s: &str) -> Self {
        Axis::Letters(s.to_string())
    }
}

impl From<String> for Axis {
    fn from(s: String) -> Self {
        Axis::Letters(s)
    }
}

impl From<char> for Axis {
    fn from(c: char) -> Self {
        Axis::Letters(c.to_string())
    }
}

/// A canonical cell coordinate, both components 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based, A=1)
    pub col: u32,
}

impl CellCoord {
    /// Create a coordinate from already-canonical numbers
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Format as A1-style string
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", column_to_letters(self.col), self.row)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// Normalize a (row, col) pair into a [`CellCoord`].
///
/// A letter row paired with a numeric column is read as (column, row), so
/// `("A", 1)` addresses the same cell as `(1, "A")`.
///
/// # Examples
/// ```
/// use sheetlink_core::{normalize, CellCoord};
///
/// assert_eq!(normalize(1, "A").unwrap(), CellCoord::new(1, 1));
/// assert_eq!(normalize("aa", 3).unwrap(), CellCoord::new(3, 27));
/// assert!(normalize(0, 1).is_err());
/// ```
pub fn normalize(row: impl Into<Axis>, col: impl Into<Axis>) -> Result<CellCoord> {
    let (row, col) = match (row.into(), col.into()) {
        (Axis::Index(r), col) => (r, col),
        (Axis::Letters(letters), Axis::Index(n)) => (n, Axis::Letters(letters)),
        (Axis::Letters(r), Axis::Letters(c)) => {
            return Err(Error::invalid_coordinate(format!(
                "row must be a number, got '{r}' with column '{c}'"
            )))
        }
    };

    let row = positive(row, "row")?;
    let col = match col {
        Axis::Index(n) => positive(n, "column")?,
        Axis::Letters(letters) => letters_to_column(&letters)?,
    };

    Ok(CellCoord { row, col })
}

fn positive(n: i64, what: &str) -> Result<u32> {
    if n < 1 {
        return Err(Error::invalid_coordinate(format!(
            "{what} must be >= 1, got {n}"
        )));
    }
    u32::try_from(n).map_err(|_| Error::invalid_coordinate(format!("{what} {n} is too large")))
}

/// Convert a 1-based column number to letters (1 = A, 26 = Z, 27 = AA, etc.)
pub fn column_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Convert column letters to a 1-based column number (A = 1, Z = 26, AA = 27, etc.)
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::invalid_coordinate("empty column letters"));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::invalid_coordinate(format!(
                "invalid column letter '{c}' in '{letters}'"
            )));
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| Error::invalid_coordinate(format!("column '{letters}' is too large")))?;
    }

    Ok(col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_to_letters() {
        assert_eq!(column_to_letters(1), "A");
        assert_eq!(column_to_letters(2), "B");
        assert_eq!(column_to_letters(26), "Z");
        assert_eq!(column_to_letters(27), "AA");
        assert_eq!(column_to_letters(28), "AB");
        assert_eq!(column_to_letters(702), "ZZ");
        assert_eq!(column_to_letters(703), "AAA");
        assert_eq!(column_to_letters(16384), "XFD");
    }

    #[test]
    fn test_letters_to_column() {
        assert_eq!(letters_to_column("A").unwrap(), 1);
        assert_eq!(letters_to_column("Z").unwrap(), 26);
        assert_eq!(letters_to_column("AA").unwrap(), 27);
        assert_eq!(letters_to_column("ZZ").unwrap(), 702);
        assert_eq!(letters_to_column("XFD").unwrap(), 16384);

        // Case insensitive
        assert_eq!(letters_to_column("a").unwrap(), 1);
        assert_eq!(letters_to_column("aA").unwrap(), 27);
    }

    #[test]
    fn test_letters_to_column_errors() {
        assert!(letters_to_column("").is_err());
        assert!(letters_to_column("A1").is_err());
        assert!(letters_to_column("Ä").is_err());
        assert!(letters_to_column("ZZZZZZZZZZ").is_err()); // overflows u32
    }

    #[test]
    fn test_normalize_equivalent_forms() {
        let expected = CellCoord::new(1, 1);
        assert_eq!(normalize(1, 1).unwrap(), expected);
        assert_eq!(normalize(1, "A").unwrap(), expected);
        assert_eq!(normalize("A", 1).unwrap(), expected);
        assert_eq!(normalize("a", 1).unwrap(), expected);
        assert_eq!(normalize(1, 'a').unwrap(), expected);
    }

    #[test]
    fn test_normalize_errors() {
        assert!(normalize(0, 1).is_err());
        assert!(normalize(1, 0).is_err());
        assert!(normalize(-3, "A").is_err());
        assert!(normalize("A", "B").is_err());
        assert!(normalize(1, "").is_err());
        assert!(normalize(1, "A-").is_err());
        assert!(normalize(i64::MAX, 1).is_err());
    }

    #[test]
    fn test_cell_coord_display() {
        assert_eq!(CellCoord::new(1, 1).to_string(), "A1");
        assert_eq!(CellCoord::new(100, 3).to_string(), "C100");
        assert_eq!(CellCoord::new(7, 28).to_string(), "AB7");
    }
}
