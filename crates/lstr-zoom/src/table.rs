//! Projected report rows with a trailing column-sum row.

/// Label written into [`ReportRow::LABEL_COLUMN`] of the totals row.
pub const TOTALS_LABEL: &str = "totals";

/// A record reduced to a fixed projection of columns.
pub trait ReportRow {
    /// Column names in output order.
    const COLUMNS: &'static [&'static str];
    /// Numeric columns summed into the totals row.
    const SUM_COLUMNS: &'static [&'static str];
    /// Text column that carries [`TOTALS_LABEL`] in the totals row.
    const LABEL_COLUMN: &'static str;

    /// Rendered value of `column`; empty for unknown columns.
    fn text(&self, column: &str) -> String;

    /// Value of a numeric column, `None` for text columns.
    fn count(&self, column: &str) -> Option<u64>;
}

/// Column-wise sums over [`ReportRow::SUM_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    sums: Vec<(&'static str, u64)>,
}

impl Totals {
    #[must_use]
    pub fn over<R: ReportRow>(rows: &[R]) -> Self {
        let sums = R::SUM_COLUMNS
            .iter()
            .map(|&column| {
                let sum = rows.iter().filter_map(|row| row.count(column)).sum();
                (column, sum)
            })
            .collect();
        Self { sums }
    }

    /// Sum of `column`, or 0 if it is not a summed column.
    #[must_use]
    pub fn get(&self, column: &str) -> u64 {
        self.sums
            .iter()
            .find(|(name, _)| *name == column)
            .map_or(0, |(_, sum)| *sum)
    }
}

/// Retained rows plus their totals.
#[derive(Debug, Clone)]
pub struct ReportTable<R> {
    pub rows: Vec<R>,
    pub totals: Totals,
}

impl<R: ReportRow> ReportTable<R> {
    #[must_use]
    pub fn new(rows: Vec<R>) -> Self {
        let totals = Totals::over(&rows);
        Self { rows, totals }
    }

    /// The synthetic trailing row in [`ReportRow::COLUMNS`] order: the label
    /// column says `totals`, summed columns hold their sums, anything else is
    /// empty.
    #[must_use]
    pub fn totals_row(&self) -> Vec<String> {
        R::COLUMNS
            .iter()
            .map(|&column| {
                if column == R::LABEL_COLUMN {
                    TOTALS_LABEL.to_string()
                } else if R::SUM_COLUMNS.contains(&column) {
                    self.totals.get(column).to_string()
                } else {
                    String::new()
                }
            })
            .collect()
    }
}
