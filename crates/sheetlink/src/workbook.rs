//! Workbook handle: cached, typed cell access over a remote store.

use ahash::AHashMap;
use sheetlink_core::{
    infer, normalize, Axis, CellCoord, CellType, CellValue, Formats, TemporalKind,
};

use crate::cache::SheetCache;
use crate::error::{Error, Result};
use crate::session::{Session, SessionConfig};
use crate::store::{RemoteStore, StoreResult};

/// The smallest rectangle holding every non-empty cell of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetBounds {
    pub first_row: u32,
    pub last_row: u32,
    pub first_col: u32,
    pub last_col: u32,
}

impl SheetBounds {
    fn single(coord: CellCoord) -> Self {
        Self {
            first_row: coord.row,
            last_row: coord.row,
            first_col: coord.col,
            last_col: coord.col,
        }
    }

    fn include(&mut self, coord: CellCoord) {
        self.first_row = self.first_row.min(coord.row);
        self.last_row = self.last_row.max(coord.row);
        self.first_col = self.first_col.min(coord.col);
        self.last_col = self.last_col.max(coord.col);
    }
}

/// A handle to one remote workbook.
///
/// Each sheet is pulled from the store in full the first time any of its
/// cells is read, and served from the local cache afterwards. Writes go
/// straight to the store and are mirrored into the cache of sheets that are
/// already loaded.
///
/// Every `sheet` parameter takes `None` for the default sheet.
///
/// # Example
///
/// ```rust
/// use sheetlink::{CellType, CellValue, MemorySheet, MemoryStore, Workbook};
///
/// # fn example() -> sheetlink::Result<()> {
/// let store = MemoryStore::new().with_sheet(
///     MemorySheet::new("Sheet1")
///         .with_value(1, 1, "31/12/2020")
///         .with_computed(1, 2, "=A1+1", "32"),
/// );
/// let mut wb = Workbook::new(store);
///
/// assert_eq!(wb.celltype(1, "A", None)?, Some(CellType::Date));
/// assert_eq!(wb.formula(1, "B", None)?.as_deref(), Some("=A1+1"));
/// assert_eq!(wb.cell(1, 2, None)?, Some(CellValue::Float(32.0)));
///
/// wb.set(3, "A", "hello", Some("Sheet1"))?;
/// assert_eq!(wb.last_row(None)?, Some(3));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
#[derive(Debug)]
pub struct Workbook<S> {
    store: S,
    formats: Formats,
    sheet_names: Option<Vec<String>>,
    default_sheet: Option<String>,
    sheets: AHashMap<u32, SheetCache>,
    bounds: AHashMap<u32, Option<SheetBounds>>,
}

impl<S: RemoteStore> Workbook<Session<S>> {
    /// Open a workbook through a credentialed session.
    ///
    /// Without an access token the handle is still returned; operations that
    /// need the store then fail with [`crate::StoreError::NoSession`].
    pub fn connect<F>(config: SessionConfig, connect: F) -> Result<Self>
    where
        F: FnOnce(&str, &str) -> StoreResult<S>,
    {
        Ok(Self::new(Session::establish(config, connect)?))
    }
}

impl<S: RemoteStore> Workbook<S> {
    pub fn new(store: S) -> Self {
        Self::with_formats(store, Formats::default())
    }

    pub fn with_formats(store: S, formats: Formats) -> Self {
        Self {
            store,
            formats,
            sheet_names: None,
            default_sheet: None,
            sheets: AHashMap::new(),
            bounds: AHashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Direct access to the store. Writes made here bypass the cache.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Date, time and datetime patterns in effect.
    pub fn formats(&self) -> &Formats {
        &self.formats
    }

    /// Patterns can be changed at any time; later reads use the new ones.
    pub fn formats_mut(&mut self) -> &mut Formats {
        &mut self.formats
    }

    // ========================================================================
    // Sheets
    // ========================================================================

    /// Sheet names in document order, fetched once per handle.
    pub fn sheets(&mut self) -> Result<&[String]> {
        if self.sheet_names.is_none() {
            let names = self.store.list_sheets()?;
            tracing::debug!(count = names.len(), "fetched sheet list");
            self.sheet_names = Some(names);
        }
        Ok(self.sheet_names.as_deref().unwrap_or_default())
    }

    /// 1-based index of a sheet, or [`Error::UnknownSheet`].
    pub fn validate_sheet(&mut self, name: &str) -> Result<u32> {
        self.sheets()?
            .iter()
            .position(|s| s == name)
            .map(|i| i as u32 + 1)
            .ok_or_else(|| Error::UnknownSheet(name.to_string()))
    }

    /// The sheet used when a `sheet` parameter is `None`; the first sheet
    /// unless changed with [`Workbook::set_default_sheet`].
    pub fn default_sheet(&mut self) -> Result<String> {
        if let Some(name) = &self.default_sheet {
            return Ok(name.clone());
        }
        self.sheets()?.first().cloned().ok_or(Error::NoSheets)
    }

    pub fn set_default_sheet(&mut self, name: &str) -> Result<()> {
        self.validate_sheet(name)?;
        self.default_sheet = Some(name.to_string());
        Ok(())
    }

    fn resolve(&mut self, sheet: Option<&str>) -> Result<(String, u32)> {
        let name = match sheet {
            Some(name) => name.to_string(),
            None => self.default_sheet()?,
        };
        let index = self.validate_sheet(&name)?;
        Ok((name, index))
    }

    // ========================================================================
    // Materialization
    // ========================================================================

    /// Whether a sheet has already been pulled into the cache.
    pub fn is_loaded(&mut self, sheet: Option<&str>) -> Result<bool> {
        let (_, index) = self.resolve(sheet)?;
        Ok(self.sheets.get(&index).is_some_and(SheetCache::is_loaded))
    }

    /// Pull every cell of a sheet into the cache, unless already done.
    pub fn ensure_loaded(&mut self, sheet: Option<&str>) -> Result<()> {
        let (name, index) = self.resolve(sheet)?;
        self.load(index, &name)
    }

    fn load(&mut self, index: u32, name: &str) -> Result<()> {
        if self.sheets.get(&index).is_some_and(SheetCache::is_loaded) {
            return Ok(());
        }

        let (rows, cols) = self.store.sheet_extent(index)?;
        let cache = self.sheets.entry(index).or_default();
        for row in 1..=rows {
            for col in 1..=cols {
                let display = self.store.read_display_string(index, row, col)?;
                let numeric = self.store.read_numeric_value(index, row, col)?;
                let inferred = infer(display.as_deref(), numeric.as_deref(), &self.formats);
                cache.store(CellCoord::new(row, col), display, inferred);
            }
        }
        cache.mark_loaded();

        tracing::debug!(
            sheet = %name,
            rows,
            cols,
            formulas = cache.formulas().len(),
            "materialized sheet"
        );
        Ok(())
    }

    /// Resolve, normalize and load; the cache for the sheet is then present.
    fn prepare(
        &mut self,
        row: Axis,
        col: Axis,
        sheet: Option<&str>,
    ) -> Result<(String, u32, CellCoord)> {
        let coord = normalize(row, col)?;
        let (name, index) = self.resolve(sheet)?;
        self.load(index, &name)?;
        Ok((name, index, coord))
    }

    // ========================================================================
    // Cell reads
    // ========================================================================

    /// Typed value of a cell, `None` when blank.
    ///
    /// Date and datetime cells are re-parsed with the current patterns, so a
    /// pattern change after loading applies here; a cached string that no
    /// longer matches fails with [`sheetlink_core::Error::FormatMismatch`].
    pub fn cell(
        &mut self,
        row: impl Into<Axis>,
        col: impl Into<Axis>,
        sheet: Option<&str>,
    ) -> Result<Option<CellValue>> {
        let (name, index, coord) = self.prepare(row.into(), col.into(), sheet)?;
        self.typed_value(name, index, coord)
    }

    /// Cached value of a loaded cell, re-parsing dates with the current patterns.
    fn typed_value(
        &self,
        name: String,
        index: u32,
        coord: CellCoord,
    ) -> Result<Option<CellValue>> {
        let Some(cell) = self.sheets.get(&index).and_then(|cache| cache.get(coord)) else {
            return Ok(None);
        };

        let kind = match cell.cell_type {
            CellType::Date => TemporalKind::Date,
            CellType::DateTime => TemporalKind::DateTime,
            _ => return Ok(cell.value.clone()),
        };
        let Some(raw) = cell.raw.as_deref() else {
            return Ok(cell.value.clone());
        };

        match self.formats.parse(kind, raw) {
            Some(value) => Ok(Some(value)),
            None => Err(sheetlink_core::Error::FormatMismatch {
                sheet: name,
                coord,
                raw: raw.to_string(),
                pattern: self.formats.pattern(kind).to_string(),
            }
            .into()),
        }
    }

    /// Type tag of a cell; recorded formulas always report [`CellType::Formula`].
    pub fn celltype(
        &mut self,
        row: impl Into<Axis>,
        col: impl Into<Axis>,
        sheet: Option<&str>,
    ) -> Result<Option<CellType>> {
        let (_, index, coord) = self.prepare(row.into(), col.into(), sheet)?;
        Ok(self
            .sheets
            .get(&index)
            .and_then(|cache| cache.cell_type(coord)))
    }

    /// Formula text of a cell, if it holds one.
    pub fn formula(
        &mut self,
        row: impl Into<Axis>,
        col: impl Into<Axis>,
        sheet: Option<&str>,
    ) -> Result<Option<String>> {
        let (_, index, coord) = self.prepare(row.into(), col.into(), sheet)?;
        Ok(self
            .sheets
            .get(&index)
            .and_then(|cache| cache.formula(coord))
            .map(str::to_string))
    }

    pub fn has_formula(
        &mut self,
        row: impl Into<Axis>,
        col: impl Into<Axis>,
        sheet: Option<&str>,
    ) -> Result<bool> {
        Ok(self.formula(row, col, sheet)?.is_some())
    }

    /// Whether a cell holds no content. Numbers, dates and times are never
    /// empty, whatever their value.
    ///
    /// A date cell that no longer matches the current pattern fails with
    /// [`sheetlink_core::Error::FormatMismatch`], as [`Workbook::cell`] does.
    pub fn is_empty(
        &mut self,
        row: impl Into<Axis>,
        col: impl Into<Axis>,
        sheet: Option<&str>,
    ) -> Result<bool> {
        let (name, index, coord) = self.prepare(row.into(), col.into(), sheet)?;
        self.typed_value(name, index, coord)?;
        Ok(self
            .sheets
            .get(&index)
            .map_or(true, |cache| cache.is_empty(coord)))
    }

    /// Every formula on a sheet, ordered by row then column.
    pub fn formulas(&mut self, sheet: Option<&str>) -> Result<Vec<(CellCoord, String)>> {
        let (name, index) = self.resolve(sheet)?;
        self.load(index, &name)?;
        Ok(self
            .sheets
            .get(&index)
            .map(SheetCache::formulas)
            .unwrap_or_default())
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    /// Bounding box of the sheet's non-empty cells, `None` for a sheet with
    /// no content.
    ///
    /// Scans the store directly, independent of the cell cache, and is
    /// computed once per sheet.
    pub fn bounds(&mut self, sheet: Option<&str>) -> Result<Option<SheetBounds>> {
        let (name, index) = self.resolve(sheet)?;
        if let Some(bounds) = self.bounds.get(&index) {
            return Ok(*bounds);
        }

        let (rows, cols) = self.store.sheet_extent(index)?;
        let mut bounds: Option<SheetBounds> = None;
        for row in 1..=rows {
            for col in 1..=cols {
                let occupied = match self.store.read_display_string(index, row, col)? {
                    Some(display) => !display.is_empty(),
                    // No display string: a formula cell, occupied if it has a result
                    None => self
                        .store
                        .read_numeric_value(index, row, col)?
                        .is_some_and(|numeric| !numeric.is_empty()),
                };
                if !occupied {
                    continue;
                }
                let coord = CellCoord::new(row, col);
                match bounds.as_mut() {
                    Some(b) => b.include(coord),
                    None => bounds = Some(SheetBounds::single(coord)),
                }
            }
        }

        tracing::debug!(sheet = %name, ?bounds, "computed sheet bounds");
        self.bounds.insert(index, bounds);
        Ok(bounds)
    }

    pub fn first_row(&mut self, sheet: Option<&str>) -> Result<Option<u32>> {
        Ok(self.bounds(sheet)?.map(|b| b.first_row))
    }

    pub fn last_row(&mut self, sheet: Option<&str>) -> Result<Option<u32>> {
        Ok(self.bounds(sheet)?.map(|b| b.last_row))
    }

    pub fn first_column(&mut self, sheet: Option<&str>) -> Result<Option<u32>> {
        Ok(self.bounds(sheet)?.map(|b| b.first_col))
    }

    pub fn last_column(&mut self, sheet: Option<&str>) -> Result<Option<u32>> {
        Ok(self.bounds(sheet)?.map(|b| b.last_col))
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Write a value to the store and persist it.
    ///
    /// The value is sent in its string form (temporal values rendered with
    /// the current patterns, formulas verbatim). If the sheet is loaded, its
    /// cached entry is re-inferred from that string; otherwise the cache is
    /// left alone and the next load picks the write up.
    ///
    /// The cache is updated as soon as the store accepts the write, so a
    /// failed persist still leaves both serving the new value.
    pub fn set(
        &mut self,
        row: impl Into<Axis>,
        col: impl Into<Axis>,
        value: impl Into<CellValue>,
        sheet: Option<&str>,
    ) -> Result<()> {
        let (name, index) = self.resolve(sheet)?;
        let coord = normalize(row, col)?;
        let raw = self.formats.to_raw(&value.into());

        self.store.write_cell(index, coord.row, coord.col, &raw)?;
        tracing::trace!(sheet = %name, cell = %coord, value = %raw, "wrote cell");

        // The store holds the new value from here on, whether or not it persists
        if let Some(cache) = self.sheets.get_mut(&index).filter(|c| c.is_loaded()) {
            let inferred = infer(Some(&raw), None, &self.formats);
            cache.store(coord, Some(raw), inferred);
        }

        self.store.persist(index)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemorySheet, MemoryStore};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn workbook() -> Workbook<MemoryStore> {
        Workbook::new(
            MemoryStore::new()
                .with_sheet(
                    MemorySheet::new("Sheet1")
                        .with_value(1, 1, "31/12/2020")
                        .with_computed(1, 2, "=A1+1", "32")
                        .with_value(2, 1, "hello")
                        .with_value(2, 2, "3.5")
                        .with_value(3, 3, "12:00:00"),
                )
                .with_sheet(MemorySheet::new("Other").with_value(2, 2, "x")),
        )
    }

    #[test]
    fn test_sheets_fetched_once() {
        let mut wb = workbook();
        assert_eq!(wb.sheets().unwrap(), ["Sheet1", "Other"]);
        assert_eq!(wb.validate_sheet("Other").unwrap(), 2);
        assert_eq!(wb.default_sheet().unwrap(), "Sheet1");
        assert_eq!(wb.store().counts().list_sheets, 1);
    }

    #[test]
    fn test_unknown_sheet() {
        let mut wb = workbook();
        assert!(matches!(
            wb.cell(1, 1, Some("Missing")),
            Err(Error::UnknownSheet(name)) if name == "Missing"
        ));
        assert!(matches!(
            wb.set_default_sheet("Missing"),
            Err(Error::UnknownSheet(_))
        ));
    }

    #[test]
    fn test_default_sheet_override() {
        let mut wb = workbook();
        wb.set_default_sheet("Other").unwrap();
        assert_eq!(wb.cell(2, "B", None).unwrap(), Some(CellValue::string("x")));
    }

    #[test]
    fn test_typed_reads() {
        let mut wb = workbook();
        assert_eq!(
            wb.cell(1, "A", None).unwrap(),
            Some(CellValue::Date(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()))
        );
        assert_eq!(wb.cell(2, 2, None).unwrap(), Some(CellValue::Float(3.5)));
        assert_eq!(wb.cell(3, "c", None).unwrap(), Some(CellValue::Time(43200)));
        assert_eq!(wb.celltype(3, 3, None).unwrap(), Some(CellType::Time));
        assert_eq!(wb.cell(3, 1, None).unwrap(), None);
        assert_eq!(wb.cell(50, 50, None).unwrap(), None);
        assert_eq!(wb.celltype(50, 50, None).unwrap(), None);
    }

    #[test]
    fn test_invalid_coordinate() {
        let mut wb = workbook();
        assert!(matches!(
            wb.cell(0, 1, None),
            Err(Error::Core(sheetlink_core::Error::InvalidCoordinate(_)))
        ));
        assert!(matches!(
            wb.set("A", "B", 1, None),
            Err(Error::Core(sheetlink_core::Error::InvalidCoordinate(_)))
        ));
        assert_eq!(wb.store().counts().writes, 0);
    }

    #[test]
    fn test_bounds() {
        let mut wb = workbook();
        assert_eq!(
            wb.bounds(None).unwrap(),
            Some(SheetBounds {
                first_row: 1,
                last_row: 3,
                first_col: 1,
                last_col: 3,
            })
        );
        assert_eq!(wb.first_row(Some("Other")).unwrap(), Some(2));
        assert_eq!(wb.last_column(Some("Other")).unwrap(), Some(2));
        // Bounds do not materialize the cell cache
        assert!(!wb.is_loaded(None).unwrap());
    }

    #[test]
    fn test_remote_failure_propagates() {
        let mut wb = workbook();
        wb.sheets().unwrap();
        wb.store_mut().set_failing(true);
        assert!(matches!(
            wb.cell(1, 1, None),
            Err(Error::Store(crate::store::StoreError::Remote(_)))
        ));
        assert!(!wb.is_loaded(None).unwrap());

        wb.store_mut().set_failing(false);
        assert_eq!(wb.cell(2, 1, None).unwrap(), Some(CellValue::string("hello")));
    }
    #[test]
    fn test_failed_persist_keeps_cache_in_step() {
        let mut wb = workbook();
        wb.ensure_loaded(None).unwrap();
        wb.store_mut().set_failing_persist(true);

        assert!(matches!(
            wb.set(2, 1, "changed", None),
            Err(Error::Store(crate::store::StoreError::Remote(_)))
        ));
        assert_eq!(wb.store().sheet("Sheet1").unwrap().display(2, 1), Some("changed"));
        assert_eq!(wb.cell(2, 1, None).unwrap(), Some(CellValue::string("changed")));
    }

    #[test]
    fn test_bounds_count_formula_results_without_display() {
        let mut wb = Workbook::new(
            MemoryStore::new().with_sheet(
                MemorySheet::new("S")
                    .with_value(1, 1, "a")
                    .with_raw(3, 3, None, Some("5"))
                    .with_raw(4, 4, None, None),
            ),
        );
        assert_eq!(
            wb.bounds(None).unwrap(),
            Some(SheetBounds {
                first_row: 1,
                last_row: 3,
                first_col: 1,
                last_col: 3,
            })
        );
        assert!(!wb.is_empty(3, 3, None).unwrap());
        assert!(wb.is_empty(4, 4, None).unwrap());
    }

    #[test]
    fn test_is_empty_rechecks_date_pattern() {
        let mut wb = workbook();
        assert!(!wb.is_empty(1, 1, None).unwrap());

        wb.formats_mut().set_pattern(TemporalKind::Date, "%m/%d/%Y");
        assert!(matches!(
            wb.is_empty(1, 1, None),
            Err(Error::Core(sheetlink_core::Error::FormatMismatch { .. }))
        ));
        assert!(wb.is_empty(3, 1, None).unwrap());
    }
}
