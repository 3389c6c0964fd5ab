//! A directory of CSV files served as a remote store.
//!
//! Each `<name>.csv` file in the directory is one sheet, ordered by file
//! name. Files are read once on open; writes are staged in memory and
//! written back to the sheet's file by [`RemoteStore::persist`].

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::{numeric_companion, RemoteStore, StoreError, StoreResult};

/// Options for a [`CsvStore`]
#[derive(Debug, Clone)]
pub struct CsvStoreOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Quote character (default: double quote)
    pub quote: u8,
    /// File extension that marks a sheet (default: "csv")
    pub extension: String,
}

impl Default for CsvStoreOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            extension: "csv".to_string(),
        }
    }
}

#[derive(Debug)]
struct CsvSheet {
    name: String,
    path: PathBuf,
    rows: Vec<Vec<String>>,
}

impl CsvSheet {
    fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn get(&self, row: u32, col: u32) -> &str {
        let (Some(r), Some(c)) = (row.checked_sub(1), col.checked_sub(1)) else {
            return "";
        };
        self.rows
            .get(r as usize)
            .and_then(|cells| cells.get(c as usize))
            .map(String::as_str)
            .unwrap_or("")
    }

    fn set(&mut self, row: u32, col: u32, value: &str) {
        let r = row.saturating_sub(1) as usize;
        let c = col.saturating_sub(1) as usize;
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        let cells = &mut self.rows[r];
        if cells.len() <= c {
            cells.resize(c + 1, String::new());
        }
        cells[c] = value.to_string();
    }
}

/// A [`RemoteStore`] backed by one CSV file per sheet.
#[derive(Debug)]
pub struct CsvStore {
    sheets: Vec<CsvSheet>,
    dirty: BTreeSet<u32>,
    options: CsvStoreOptions,
}

impl CsvStore {
    /// Open every sheet file in `dir` with default options.
    pub fn open<P: AsRef<Path>>(dir: P) -> StoreResult<Self> {
        Self::open_with(dir, CsvStoreOptions::default())
    }

    /// Open every sheet file in `dir`.
    pub fn open_with<P: AsRef<Path>>(dir: P, options: CsvStoreOptions) -> StoreResult<Self> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();
            let is_sheet = path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(options.extension.as_str()));
            if is_sheet {
                paths.push(path);
            }
        }
        paths.sort();

        let mut sheets = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            let rows = read_rows(&path, &options)?;
            tracing::debug!(sheet = %name, rows = rows.len(), "loaded csv sheet");
            sheets.push(CsvSheet { name, path, rows });
        }

        Ok(Self {
            sheets,
            dirty: BTreeSet::new(),
            options,
        })
    }

    /// Whether a sheet has writes not yet persisted.
    pub fn is_dirty(&self, sheet: u32) -> bool {
        self.dirty.contains(&sheet)
    }

    fn sheet(&self, sheet: u32) -> StoreResult<&CsvSheet> {
        sheet
            .checked_sub(1)
            .and_then(|i| self.sheets.get(i as usize))
            .ok_or(StoreError::SheetIndex(sheet, self.sheets.len()))
    }

    fn sheet_mut(&mut self, sheet: u32) -> StoreResult<&mut CsvSheet> {
        let count = self.sheets.len();
        sheet
            .checked_sub(1)
            .and_then(|i| self.sheets.get_mut(i as usize))
            .ok_or(StoreError::SheetIndex(sheet, count))
    }
}

fn read_rows(path: &Path, options: &CsvStoreOptions) -> StoreResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

impl RemoteStore for CsvStore {
    fn list_sheets(&mut self) -> StoreResult<Vec<String>> {
        Ok(self.sheets.iter().map(|s| s.name.clone()).collect())
    }

    fn sheet_extent(&mut self, sheet: u32) -> StoreResult<(u32, u32)> {
        let sheet = self.sheet(sheet)?;
        Ok((sheet.rows.len() as u32, sheet.width() as u32))
    }

    fn read_display_string(
        &mut self,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> StoreResult<Option<String>> {
        Ok(Some(self.sheet(sheet)?.get(row, col).to_string()))
    }

    fn read_numeric_value(
        &mut self,
        sheet: u32,
        row: u32,
        col: u32,
    ) -> StoreResult<Option<String>> {
        Ok(numeric_companion(self.sheet(sheet)?.get(row, col)))
    }

    fn write_cell(&mut self, sheet: u32, row: u32, col: u32, value: &str) -> StoreResult<()> {
        self.sheet_mut(sheet)?.set(row, col, value);
        self.dirty.insert(sheet);
        Ok(())
    }

    fn persist(&mut self, sheet: u32) -> StoreResult<()> {
        if !self.dirty.contains(&sheet) {
            return Ok(());
        }
        let target = self.sheet(sheet)?;
        let width = target.width();

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .from_path(&target.path)?;
        for row in &target.rows {
            let padded = row
                .iter()
                .map(String::as_str)
                .chain(std::iter::repeat("").take(width - row.len()));
            writer.write_record(padded)?;
        }
        writer.flush()?;

        tracing::debug!(sheet = %target.name, "persisted csv sheet");
        self.dirty.remove(&sheet);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dir_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_open_orders_sheets_by_file_name() {
        let dir = dir_with(&[
            ("b.csv", "1\n"),
            ("a.csv", "x,y\n"),
            ("notes.txt", "ignored"),
        ]);
        let mut store = CsvStore::open(dir.path()).unwrap();
        assert_eq!(store.list_sheets().unwrap(), vec!["a", "b"]);
        assert_eq!(store.sheet_extent(1).unwrap(), (1, 2));
    }

    #[test]
    fn test_ragged_rows_read_blank() {
        let dir = dir_with(&[("s.csv", "a,b,c\nd\n")]);
        let mut store = CsvStore::open(dir.path()).unwrap();
        assert_eq!(store.sheet_extent(1).unwrap(), (2, 3));
        assert_eq!(
            store.read_display_string(1, 2, 3).unwrap().as_deref(),
            Some("")
        );
        assert_eq!(store.read_numeric_value(1, 2, 1).unwrap(), None);
    }

    #[test]
    fn test_persist_rewrites_file() {
        let dir = dir_with(&[("s.csv", "a\n")]);
        let mut store = CsvStore::open(dir.path()).unwrap();
        store.write_cell(1, 2, 2, "42").unwrap();
        assert!(store.is_dirty(1));
        store.persist(1).unwrap();
        assert!(!store.is_dirty(1));

        let written = fs::read_to_string(dir.path().join("s.csv")).unwrap();
        assert_eq!(written.replace("\r\n", "\n"), "a,\n,42\n");
    }
}
