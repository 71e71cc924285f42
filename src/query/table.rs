//! Tabular in-memory representation of one query's output.

use crate::service::ResultRow;

/// An immutable table built from the service's row format.
///
/// The first wire row is the header; the rest are data. Every data row is
/// normalized to exactly the header's width, and cells without a value
/// become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Builds a table from wire rows.
    ///
    /// An empty input produces an empty table (no columns, no rows).
    pub fn from_wire_rows(wire_rows: Vec<ResultRow>) -> Self {
        let mut iter = wire_rows.into_iter();

        let columns: Vec<String> = match iter.next() {
            Some(header) => header
                .cells
                .into_iter()
                .map(|cell| cell.value.unwrap_or_default())
                .collect(),
            None => return Self::default(),
        };

        let width = columns.len();
        let rows = iter
            .map(|row| {
                let mut cells: Vec<String> = row
                    .cells
                    .into_iter()
                    .map(|cell| cell.value.unwrap_or_default())
                    .collect();
                cells.resize(width, String::new());
                cells
            })
            .collect();

        Self { columns, rows }
    }

    /// Builds a table directly from column names and string rows.
    ///
    /// Rows are normalized to the column count like `from_wire_rows`.
    pub fn with_data(
        columns: impl IntoIterator<Item = impl Into<String>>,
        rows: Vec<Vec<String>>,
    ) -> Self {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows (header excluded), in order.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at (row, column), if present.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}
