//! Columnar view over a batch of raw records.
//!
//! Records arrive row-oriented (one JSON object per customer). The encoder and
//! aligner work per column, so the batch is pivoted once into a [`Frame`] and
//! turned back into a dense row-major matrix at the end.

use crate::error::InferenceError;
use ndarray::Array2;
use serde_json::{Map, Value};

/// One customer as received at the boundary: field name to mixed-type value.
pub type RawRecord = Map<String, Value>;

/// A single cell of the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Missing,
            Value::Bool(b) => Cell::Number(if *b { 1.0 } else { 0.0 }),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
            Value::String(s) => Cell::Text(s.clone()),
            other => Cell::Text(other.to_string()),
        }
    }

    /// Text form used for categorical lookups. Integral numbers drop the
    /// fractional part so `1` and `1.0` name the same category.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Missing => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.fract() == 0.0 && n.is_finite() => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

/// Ordered set of equally long columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    columns: Vec<Column>,
    rows: usize,
}

impl Frame {
    /// Pivots records into columns. Column order is first appearance across the
    /// batch; a field absent from some record is `Missing` in that row.
    pub fn from_records(records: &[RawRecord]) -> Self {
        let mut frame = Frame {
            columns: Vec::new(),
            rows: records.len(),
        };

        for (row, record) in records.iter().enumerate() {
            for (name, value) in record {
                let idx = match frame.position(name) {
                    Some(idx) => idx,
                    None => {
                        frame.columns.push(Column {
                            name: name.clone(),
                            values: vec![Cell::Missing; records.len()],
                        });
                        frame.columns.len() - 1
                    }
                };
                frame.columns[idx].values[row] = Cell::from_json(value);
            }
        }

        frame
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Appends a column filled with `fill` for every row.
    pub fn push_constant(&mut self, name: impl Into<String>, fill: Cell) {
        self.columns.push(Column {
            name: name.into(),
            values: vec![fill; self.rows],
        });
    }

    /// Keeps only `names`, in that order. Every name must already exist.
    pub(crate) fn select(mut self, names: &[String]) -> Self {
        let mut selected = Vec::with_capacity(names.len());
        for name in names {
            if let Some(idx) = self.position(name) {
                selected.push(self.columns.swap_remove(idx));
            }
        }
        Frame {
            columns: selected,
            rows: self.rows,
        }
    }

    /// Dense row-major `[rows, columns]` matrix for the model.
    ///
    /// Missing cells become NaN. Text left in a column at this point was never
    /// encoded and cannot be fed to the model, so it is rejected.
    pub fn to_matrix(&self) -> Result<Array2<f32>, InferenceError> {
        let width = self.columns.len();
        let mut data = Vec::with_capacity(self.rows * width);

        for row in 0..self.rows {
            for column in &self.columns {
                let value = match &column.values[row] {
                    Cell::Number(n) => *n as f32,
                    Cell::Missing => f32::NAN,
                    Cell::Text(text) => {
                        return Err(InferenceError::PreprocessingError(format!(
                            "column '{}' holds non-numeric value '{}'",
                            column.name, text
                        )))
                    }
                };
                data.push(value);
            }
        }

        Ok(Array2::from_shape_vec((self.rows, width), data)?)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_from_records_preserves_field_order() {
        let frame = Frame::from_records(&[record(json!({"age": 30, "job": "admin", "balance": 1.5}))]);
        assert_eq!(frame.column_names(), vec!["age", "job", "balance"]);
        assert_eq!(frame.rows(), 1);
    }

    #[test]
    fn test_ragged_records_fill_missing() {
        let frame = Frame::from_records(&[
            record(json!({"age": 30})),
            record(json!({"age": 41, "job": "technician"})),
        ]);

        let job = frame.column("job").unwrap();
        assert_eq!(job.values, vec![Cell::Missing, Cell::Text("technician".into())]);
    }

    #[test]
    fn test_cell_from_json_kinds() {
        assert_eq!(Cell::from_json(&json!(null)), Cell::Missing);
        assert_eq!(Cell::from_json(&json!(3)), Cell::Number(3.0));
        assert_eq!(Cell::from_json(&json!(true)), Cell::Number(1.0));
        assert_eq!(Cell::from_json(&json!("x")), Cell::Text("x".into()));
    }

    #[test]
    fn test_as_text_integral_numbers() {
        assert_eq!(Cell::Number(1.0).as_text().as_deref(), Some("1"));
        assert_eq!(Cell::Number(1.5).as_text().as_deref(), Some("1.5"));
        assert_eq!(Cell::Missing.as_text(), None);
    }

    #[test]
    fn test_select_reorders_and_drops() {
        let frame = Frame::from_records(&[record(json!({"a": 1, "b": 2, "c": 3}))]);
        let selected = frame.select(&["c".to_string(), "a".to_string()]);
        assert_eq!(selected.column_names(), vec!["c", "a"]);
    }

    #[test]
    fn test_to_matrix_row_major() {
        let frame = Frame::from_records(&[
            record(json!({"a": 1, "b": 2})),
            record(json!({"a": 3, "b": null})),
        ]);
        let matrix = frame.to_matrix().unwrap();

        assert_eq!(matrix.shape(), &[2, 2]);
        assert_eq!(matrix[[0, 0]], 1.0);
        assert_eq!(matrix[[0, 1]], 2.0);
        assert_eq!(matrix[[1, 0]], 3.0);
        assert!(matrix[[1, 1]].is_nan());
    }

    #[test]
    fn test_to_matrix_rejects_text() {
        let frame = Frame::from_records(&[record(json!({"note": "hello"}))]);
        match frame.to_matrix() {
            Err(InferenceError::PreprocessingError(msg)) => assert!(msg.contains("note")),
            other => panic!("Expected PreprocessingError, got {other:?}"),
        }
    }
}
