//! Table shape reconstruction
//!
//! The column count comes from the header cells alone. Data cells are read
//! as one flat stream and poured into rows of that width, so a body row with
//! a missing cell shifts everything after it. When the stream does not divide
//! evenly the last row is padded with empty cells.

use crate::docx::model::Table;
use crate::markup::Element;
use tracing::{debug, warn};

/// Header and body rows read from a `table` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape {
    pub header: Vec<String>,
    pub body: Vec<Vec<String>>,
}

impl TableShape {
    /// Read the shape of `table`. `None` when there are no header cells.
    pub fn read(table: &Element) -> Option<TableShape> {
        let header: Vec<String> = table
            .find("thead")
            .map(|thead| thead.find_all("th"))
            .unwrap_or_default()
            .into_iter()
            .map(cell_text)
            .collect();
        if header.is_empty() {
            return None;
        }
        let data: Vec<String> = table.find_all("td").into_iter().map(cell_text).collect();
        Some(Self::from_cells(header, data))
    }

    pub fn from_cells(header: Vec<String>, data: Vec<String>) -> TableShape {
        let columns = header.len();
        let remainder = data.len() % columns;
        if remainder != 0 {
            warn!(
                columns,
                cells = data.len(),
                padding = columns - remainder,
                "table body does not fill its last row, padding with empty cells"
            );
        }
        let body = data
            .chunks(columns)
            .map(|chunk| {
                let mut row = chunk.to_vec();
                row.resize(columns, String::new());
                row
            })
            .collect();
        TableShape { header, body }
    }

    pub fn columns(&self) -> usize {
        self.header.len()
    }

    /// Header row plus body rows.
    pub fn rows(&self) -> usize {
        self.body.len() + 1
    }

    pub fn into_table(self, style: &str) -> Table {
        debug!(rows = self.rows(), columns = self.columns(), "table");
        let mut rows = Vec::with_capacity(self.rows());
        rows.push(self.header);
        rows.extend(self.body);
        Table {
            style: style.to_string(),
            rows,
            header_row: true,
            font: None,
        }
    }
}

fn cell_text(cell: &Element) -> String {
    cell.text_content().trim().to_string()
}
