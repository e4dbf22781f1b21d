use crate::columns::{ColumnDef, Person, find_column};
use crate::visibility::{ColumnVisibility, is_visible};

pub const COLUMN_WIDTH_MARGIN: usize = 2;

/// Every column in the current order, hidden ones included.
pub fn all_columns<'a>(registry: &'a [ColumnDef], order: &[String]) -> Vec<&'a ColumnDef> {
    order
        .iter()
        .filter_map(|id| find_column(registry, id))
        .collect()
}

/// Only the visible columns, in the current order.
pub fn visible_columns<'a>(
    registry: &'a [ColumnDef],
    order: &[String],
    visibility: &ColumnVisibility,
) -> Vec<&'a ColumnDef> {
    all_columns(registry, order)
        .into_iter()
        .filter(|c| is_visible(visibility, c.id))
        .collect()
}

/// Header labels and cell text for the data table.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TableGrid {
    pub headers: Vec<String>,
    pub widths: Vec<usize>,
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn build(columns: &[&ColumnDef], records: &[Person]) -> Self {
        let headers: Vec<String> = columns.iter().map(|c| c.label.to_string()).collect();
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| columns.iter().map(|c| c.value(record)).collect())
            .collect();
        let widths = headers
            .iter()
            .enumerate()
            .map(|(cidx, header)| {
                let widest_cell = rows.iter().map(|r| r[cidx].len()).max().unwrap_or(0);
                std::cmp::max(header.len(), widest_cell) + COLUMN_WIDTH_MARGIN
            })
            .collect();
        Self {
            headers,
            widths,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}
