//! In-memory remote store with call accounting.

use std::collections::HashMap;

use super::{numeric_companion, RemoteStore, StoreError, StoreResult};

/// Number of calls made against a [`MemoryStore`], per trait method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub list_sheets: usize,
    pub sheet_extent: usize,
    pub display_reads: usize,
    pub numeric_reads: usize,
    pub writes: usize,
    pub persists: usize,
}

impl CallCounts {
    /// Cell-level reads of either kind.
    pub fn cell_reads(&self) -> usize {
        self.display_reads + self.numeric_reads
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryCell {
    display: Option<String>,
    numeric: Option<String>,
}

/// One sheet of a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemorySheet {
    name: String,
    rows: u32,
    cols: u32,
    cells: HashMap<(u32, u32), MemoryCell>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: 0,
            cols: 0,
            cells: HashMap::new(),
        }
    }

    /// Set a cell the way a user would type it; the numeric companion is derived.
    pub fn with_value(mut self, row: u32, col: u32, display: &str) -> Self {
        self.put(row, col, Some(display.to_string()), numeric_companion(display));
        self
    }

    /// Set a cell together with the result the remote service computed for it.
    pub fn with_computed(mut self, row: u32, col: u32, display: &str, numeric: &str) -> Self {
        self.put(
            row,
            col,
            Some(display.to_string()),
            Some(numeric.to_string()),
        );
        self
    }

    /// Set both raw parts of a cell explicitly.
    pub fn with_raw(
        mut self,
        row: u32,
        col: u32,
        display: Option<&str>,
        numeric: Option<&str>,
    ) -> Self {
        self.put(
            row,
            col,
            display.map(str::to_string),
            numeric.map(str::to_string),
        );
        self
    }

    /// Widen the reported extent beyond the cells that were set.
    pub fn with_extent(mut self, rows: u32, cols: u32) -> Self {
        self.rows = self.rows.max(rows);
        self.cols = self.cols.max(cols);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(rows, cols)` currently reported by this sheet.
    pub fn extent(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// The stored display string; blank cells read as `""`.
    pub fn display(&self, row: u32, col: u32) -> Option<&str> {
        match self.cells.get(&(row, col)) {
            Some(cell) => cell.display.as_deref(),
            None => Some(""),
        }
    }

    pub fn numeric(&self, row: u32, col: u32) -> Option<&str> {
        self.cells
            .get(&(row, col))
            .and_then(|cell| cell.numeric.as_deref())
    }

    fn put(&mut self, row: u32, col: u32, display: Option<String>, numeric: Option<String>) {
        self.rows = self.rows.max(row);
        self.cols = self.cols.max(col);
        self.cells.insert((row, col), MemoryCell { display, numeric });
    }
}

/// A [`RemoteStore`] held entirely in memory.
///
/// Every trait call is counted, and calls can be made to fail on demand, so
/// tests can observe exactly how a workbook handle uses its store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    sheets: Vec<MemorySheet>,
    counts: CallCounts,
    failing: bool,
    failing_persist: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet.
    pub fn with_sheet(mut self, sheet: MemorySheet) -> Self {
        self.sheets.push(sheet);
        self
    }

    pub fn counts(&self) -> CallCounts {
        self.counts
    }

    pub fn reset_counts(&mut self) {
        self.counts = CallCounts::default();
    }

    /// Make every subsequent call fail with [`StoreError::Remote`].
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Make only [`RemoteStore::persist`] fail; writes are still accepted.
    pub fn set_failing_persist(&mut self, failing: bool) {
        self.failing_persist = failing;
    }

    /// Look up a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    fn check(&self) -> StoreResult<()> {
        if self.failing {
            return Err(StoreError::Remote("injected failure".into()));
        }
        Ok(())
    }

    fn sheet_at(&self, sheet: u32) -> StoreResult<&MemorySheet> {
        self.check()?;
        sheet
            .checked_sub(1)
            .and_then(|i| self.sheets.get(i as usize))
            .ok_or(StoreError::SheetIndex(sheet, self.sheets.len()))
    }

    fn sheet_at_mut(&mut self, sheet: u32) -> StoreResult<&mut MemorySheet> {
        self.check()?;
        let count = self.sheets.len();
        sheet
            .checked_sub(1)
            .and_then(|i| self.sheets.get_mut(i as usize))
            .ok_or(StoreError::SheetIndex(sheet, count))
    }
}

impl RemoteStore for MemoryStore {
    fn list_sheets(&mut self) -> StoreResult<Vec<String>> {
        self.counts.list_sheets += 1;
        self.check()?;
        Ok(self.sheets.iter().map(|s| s.name.clone()).collect())
    }

    fn sheet_extent(&mut self, sheet: u32) -> StoreResult<(u32, u32)> {
        self.counts.sheet_extent += 1;
        Ok(self.sheet_at(sheet)?.extent())
    }

    fn read_display_string(
        &mut self,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> StoreResult<Option<String>> {
        self.counts.display_reads += 1;
        Ok(self.sheet_at(sheet)?.display(row, col).map(str::to_string))
    }

    fn read_numeric_value(
        &mut self,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> StoreResult<Option<String>> {
        self.counts.numeric_reads += 1;
        Ok(self.sheet_at(sheet)?.numeric(row, col).map(str::to_string))
    }

    fn write_cell(&mut self, sheet: u32, row: u32, col: u32, value: &str) -> StoreResult<()> {
        self.counts.writes += 1;
        self.sheet_at_mut(sheet)?.put(
            row,
            col,
            Some(value.to_string()),
            numeric_companion(value),
        );
        Ok(())
    }

    fn persist(&mut self, sheet: u32) -> StoreResult<()> {
        self.counts.persists += 1;
        self.sheet_at(sheet)?;
        if self.failing_persist {
            return Err(StoreError::Remote("persist rejected".into()));
        }
        Ok(())
    }
}
