//! Reconciles a batch's columns with the model's trained feature schema.

use super::frame::{Cell, Frame};
use crate::model::schema::TrainedSchema;

/// Zero-fills every schema feature the batch lacks, then selects the schema's
/// columns in schema order. Batch columns outside the schema are dropped.
///
/// Neither case is an error: a batch that drifted from the training schema
/// still gets predictions, which may be silently wrong if the drift is
/// semantic. With an empty schema the frame is returned untouched.
pub fn align(mut frame: Frame, schema: &TrainedSchema) -> Frame {
    if schema.is_empty() {
        return frame;
    }

    let mut zero_filled = Vec::new();
    for name in schema.features() {
        if !frame.contains(name) {
            frame.push_constant(name.clone(), Cell::Number(0.0));
            zero_filled.push(name.as_str());
        }
    }

    {
        let dropped: Vec<&str> = frame
            .column_names()
            .into_iter()
            .filter(|name| !schema.contains(name))
            .collect();

        if !zero_filled.is_empty() || !dropped.is_empty() {
            tracing::debug!(?zero_filled, ?dropped, "aligned batch to trained schema");
        }
    }

    frame.select(schema.features())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::frame::RawRecord;
    use serde_json::{json, Value};

    fn frame(rows: Vec<Value>) -> Frame {
        let records: Vec<RawRecord> = rows
            .into_iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect();
        Frame::from_records(&records)
    }

    fn schema(names: &[&str]) -> TrainedSchema {
        TrainedSchema::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_reorders_to_schema() {
        let aligned = align(
            frame(vec![json!({"b": 2, "a": 1, "c": 3})]),
            &schema(&["a", "b", "c"]),
        );
        assert_eq!(aligned.column_names(), vec!["a", "b", "c"]);
        let matrix = aligned.to_matrix().unwrap();
        assert_eq!(matrix.row(0).to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_zero_fills_missing_feature_in_every_row() {
        // Intentional trade-off: an absent feature is silently treated as 0
        // rather than rejected, even if upstream simply forgot to send it.
        let aligned = align(
            frame(vec![json!({"age": 30}), json!({"age": 45})]),
            &schema(&["id", "age"]),
        );
        let matrix = aligned.to_matrix().unwrap();
        assert_eq!(matrix.column(0).to_vec(), vec![0.0, 0.0]);
        assert_eq!(matrix.column(1).to_vec(), vec![30.0, 45.0]);
    }

    #[test]
    fn test_drops_columns_outside_schema() {
        // Intentional trade-off: unexpected columns vanish without complaint,
        // including any that are misspellings of real features.
        let aligned = align(
            frame(vec![json!({"age": 30, "agee": 99, "note": "free text"})]),
            &schema(&["age"]),
        );
        assert_eq!(aligned.column_names(), vec!["age"]);
        assert!(aligned.to_matrix().is_ok());
    }

    #[test]
    fn test_empty_schema_is_pass_through() {
        let input = frame(vec![
            json!({"z": 1, "a": "text", "m": null}),
            json!({"z": 2}),
        ]);
        let aligned = align(input.clone(), &TrainedSchema::default());
        assert_eq!(aligned, input);
    }

    #[test]
    fn test_column_set_equals_schema() {
        let names = ["id", "age", "job", "balance"];
        let aligned = align(
            frame(vec![json!({"job": 1, "extra": 5, "age": 20})]),
            &schema(&names),
        );
        assert_eq!(aligned.column_names(), names.to_vec());
        assert_eq!(aligned.rows(), 1);
    }
}
