//! Per-sheet cell cache.

use ahash::AHashMap;
use sheetlink_core::{CellCoord, CellType, CellValue, Inferred};

/// One materialized cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedCell {
    /// Typed value; `None` for blank cells and formulas without a result.
    pub value: Option<CellValue>,
    pub cell_type: CellType,
    /// The display string the entry was inferred from.
    pub raw: Option<String>,
}

/// Cached contents of one sheet.
///
/// `loaded` is set once the whole sheet has been pulled and is never cleared.
#[derive(Debug, Default)]
pub struct SheetCache {
    loaded: bool,
    cells: AHashMap<CellCoord, CachedCell>,
    formulas: AHashMap<CellCoord, String>,
}

impl SheetCache {
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    /// Store an inference result for `coord`, replacing whatever was there.
    ///
    /// Blank values are dropped while the type tag is kept. Formula text is
    /// recorded for formula cells and cleared for everything else.
    pub(crate) fn store(&mut self, coord: CellCoord, raw: Option<String>, inferred: Inferred) {
        let value = inferred.value.filter(CellValue::has_content);
        if inferred.cell_type == CellType::Formula {
            match raw.as_deref() {
                Some(text) => {
                    self.formulas.insert(coord, text.to_string());
                }
                None => {
                    self.formulas.remove(&coord);
                }
            }
        } else {
            self.formulas.remove(&coord);
        }
        self.cells.insert(
            coord,
            CachedCell {
                value,
                cell_type: inferred.cell_type,
                raw,
            },
        );
    }

    pub fn get(&self, coord: CellCoord) -> Option<&CachedCell> {
        self.cells.get(&coord)
    }

    /// Type tag, with recorded formulas taking precedence.
    pub fn cell_type(&self, coord: CellCoord) -> Option<CellType> {
        if !self.formulas.is_empty() && self.formulas.contains_key(&coord) {
            return Some(CellType::Formula);
        }
        self.cells.get(&coord).map(|cell| cell.cell_type)
    }

    pub fn formula(&self, coord: CellCoord) -> Option<&str> {
        self.formulas.get(&coord).map(String::as_str)
    }

    /// All formulas, ordered by row then column.
    pub fn formulas(&self) -> Vec<(CellCoord, String)> {
        let mut all: Vec<_> = self
            .formulas
            .iter()
            .map(|(coord, text)| (*coord, text.clone()))
            .collect();
        all.sort_by_key(|(coord, _)| *coord);
        all
    }

    /// Whether the cell at `coord` holds no content.
    pub fn is_empty(&self, coord: CellCoord) -> bool {
        match self.cells.get(&coord) {
            Some(cell) => {
                cell.cell_type != CellType::Time
                    && !cell.value.as_ref().is_some_and(CellValue::has_content)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetlink_core::{infer, Formats};

    fn put(cache: &mut SheetCache, row: u32, col: u32, display: &str, numeric: Option<&str>) {
        let inferred = infer(Some(display), numeric, &Formats::default());
        cache.store(CellCoord::new(row, col), Some(display.to_string()), inferred);
    }

    #[test]
    fn test_blank_values_keep_type() {
        let mut cache = SheetCache::default();
        put(&mut cache, 1, 1, "", None);
        let cell = cache.get(CellCoord::new(1, 1)).unwrap();
        assert_eq!(cell.value, None);
        assert_eq!(cell.cell_type, CellType::String);
        assert!(cache.is_empty(CellCoord::new(1, 1)));
    }

    #[test]
    fn test_overwriting_formula_clears_text() {
        let mut cache = SheetCache::default();
        put(&mut cache, 2, 2, "=A1", Some("3"));
        assert_eq!(cache.cell_type(CellCoord::new(2, 2)), Some(CellType::Formula));
        assert_eq!(cache.formula(CellCoord::new(2, 2)), Some("=A1"));

        put(&mut cache, 2, 2, "7", None);
        assert_eq!(cache.cell_type(CellCoord::new(2, 2)), Some(CellType::Float));
        assert_eq!(cache.formula(CellCoord::new(2, 2)), None);
    }

    #[test]
    fn test_empty_semantics() {
        let mut cache = SheetCache::default();
        put(&mut cache, 1, 1, "0", None);
        put(&mut cache, 1, 2, "00:00:00", None);
        put(&mut cache, 1, 3, "01/01/2000", None);
        put(&mut cache, 1, 4, "=B1", None);
        assert!(!cache.is_empty(CellCoord::new(1, 1)));
        assert!(!cache.is_empty(CellCoord::new(1, 2)));
        assert!(!cache.is_empty(CellCoord::new(1, 3)));
        assert!(cache.is_empty(CellCoord::new(1, 4)));
        assert!(cache.is_empty(CellCoord::new(9, 9)));
    }

    #[test]
    fn test_formulas_sorted() {
        let mut cache = SheetCache::default();
        put(&mut cache, 3, 1, "=1", None);
        put(&mut cache, 1, 2, "=2", None);
        put(&mut cache, 1, 1, "=3", None);
        let coords: Vec<_> = cache.formulas().into_iter().map(|(c, _)| c).collect();
        assert_eq!(
            coords,
            vec![CellCoord::new(1, 1), CellCoord::new(1, 2), CellCoord::new(3, 1)]
        );
    }
}
