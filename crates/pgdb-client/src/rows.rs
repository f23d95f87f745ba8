//! Materialized query results.
//!
//! [`Rows`] converts a [`RawResult`] into a flat, randomly-indexable table
//! in a single allocation, without copying any cell bytes. The layout is one
//! contiguous slice of `&str`: the first `C` slots hold the column names,
//! followed by the cell values in row-major order, so row `j` begins at
//! offset `C + j * C`.
//!
//! Every `&str` in the view aliases memory owned by the originating raw
//! result. The view therefore carries the raw result's lifetime: the
//! compiler rejects any attempt to release the raw result while a view is
//! live, and the only reachable teardown order is view first, handle second.

use crate::backend::RawResult;

/// A borrowed, random-access view over a raw query result.
///
/// Produced by [`Rows::materialize`]. An empty result set is represented as
/// "no view" ([`None`]), never as a zero-length `Rows`, so callers can
/// distinguish "query succeeded, no rows" from an error without inspecting
/// the structure.
///
/// A view cannot outlive the raw result it aliases:
///
/// ```compile_fail
/// use pgdb_client::backend::RawResult;
/// use pgdb_client::Rows;
///
/// struct Raw;
/// impl RawResult for Raw {
///     fn row_count(&self) -> usize { 1 }
///     fn column_count(&self) -> usize { 1 }
///     fn column_name(&self, _: usize) -> &str { "a" }
///     fn value(&self, _: usize, _: usize) -> &str { "1" }
/// }
///
/// let raw = Raw;
/// let rows = Rows::materialize(&raw);
/// drop(raw); // error: `raw` is still borrowed by the view
/// let _ = rows;
/// ```
#[derive(Debug)]
pub struct Rows<'a> {
    row_count: usize,
    column_count: usize,
    /// Column names in `0..C`, then cell values row-major. One allocation
    /// for the whole table.
    cells: Box<[&'a str]>,
}

impl<'a> Rows<'a> {
    /// Materialize `raw` into a flat table view.
    ///
    /// Returns [`None`] when the result holds no rows. Performs exactly one
    /// allocation, sized for `C` name slots plus `R * C` value slots; cell
    /// bytes stay in the raw result's buffer.
    #[must_use]
    pub fn materialize<R: RawResult>(raw: &'a R) -> Option<Self> {
        let row_count = raw.row_count();
        if row_count == 0 {
            return None;
        }
        let column_count = raw.column_count();
        if column_count == 0 {
            return None;
        }

        let mut cells = Vec::with_capacity(column_count + row_count * column_count);
        for i in 0..column_count {
            cells.push(raw.column_name(i));
        }
        for j in 0..row_count {
            for i in 0..column_count {
                cells.push(raw.value(j, i));
            }
        }

        Some(Self {
            row_count,
            column_count,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Number of rows in the view. Always at least 1.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns in the view. Always at least 1.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// The column names, in result order.
    #[must_use]
    pub fn column_names(&self) -> &[&'a str] {
        &self.cells[..self.column_count]
    }

    /// The cells of row `index`, or [`None`] if the index is out of range.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[&'a str]> {
        if index >= self.row_count {
            return None;
        }
        let start = self.column_count + index * self.column_count;
        Some(&self.cells[start..start + self.column_count])
    }

    /// The cell at (`row`, `column`), or [`None`] if either index is out of
    /// range.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> Option<&'a str> {
        if column >= self.column_count {
            return None;
        }
        self.row(row).map(|cells| cells[column])
    }

    /// Iterate over the rows as cell slices.
    pub fn iter(&self) -> impl Iterator<Item = &[&'a str]> {
        self.cells[self.column_count..].chunks_exact(self.column_count)
    }
}
