//! Truth tables: all columns but the last are inputs, the last is the output

use crate::error::{TaskError, TaskResult};

/// One row viewed as inputs + expected output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruthRow<'a> {
    pub inputs: &'a [bool],
    pub expected: bool,
}

/// Rectangular table of boolean rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    rows: Vec<Vec<bool>>,
}

impl TruthTable {
    /// Build a table; every row must have the same length and at least one
    /// input column besides the output.
    pub fn new(rows: Vec<Vec<bool>>) -> TaskResult<Self> {
        let Some(first) = rows.first() else {
            return Err(TaskError::EmptyTruthTable);
        };
        let width = first.len();
        if width < 2 {
            return Err(TaskError::RaggedTruthTable {
                row: 0,
                expected: 2,
                found: width,
            });
        }
        if let Some((row, bad)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(TaskError::RaggedTruthTable {
                row,
                expected: width,
                found: bad.len(),
            });
        }
        Ok(Self { rows })
    }

    /// Parse a `1,0,1` style row
    pub fn parse_row(line: &str) -> TaskResult<Vec<bool>> {
        line.split(',')
            .map(|field| match field.trim() {
                "0" => Ok(false),
                "1" => Ok(true),
                other => Err(TaskError::BadField {
                    what: "truth table cell",
                    value: other.to_string(),
                }),
            })
            .collect()
    }

    pub fn num_inputs(&self) -> usize {
        self.rows[0].len() - 1
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = TruthRow<'_>> {
        // Every row has at least two columns by construction
        self.rows.iter().map(|row| {
            let last = row.len() - 1;
            TruthRow {
                inputs: &row[..last],
                expected: row[last],
            }
        })
    }
}
