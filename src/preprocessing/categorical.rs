//! Label encoding for the bank dataset's categorical columns, plus the
//! `pdays` sentinel rewrite.

use super::frame::{Cell, Frame};
use std::collections::HashMap;

/// Columns the model was trained on as label-encoded categories.
pub const CATEGORICAL_COLUMNS: [&str; 9] = [
    "job",
    "marital",
    "education",
    "default",
    "housing",
    "loan",
    "contact",
    "month",
    "poutcome",
];

/// Text substituted for null categorical values.
pub const UNKNOWN_CATEGORY: &str = "unknown";

pub const PDAYS_COLUMN: &str = "pdays";
/// `pdays == -1` means the customer was never contacted before.
pub const PDAYS_NEVER_CONTACTED: f64 = -1.0;
pub const PDAYS_SENTINEL: f64 = 99999.0;

/// Maps category text to integer codes.
///
/// Columns with a frozen vocabulary use the training-time codes, so the same
/// category always gets the same code. Columns without one are fitted on the
/// incoming batch alone (codes in first-seen order), which only agrees with
/// training when the batch happens to list categories in the same order.
#[derive(Debug, Clone, Default)]
pub struct CategoricalEncoder {
    vocabularies: HashMap<String, HashMap<String, usize>>,
}

impl CategoricalEncoder {
    /// Builds frozen lookup tables from `column -> ordered categories`.
    /// Code `i` is the position of the category in its list.
    pub fn new(vocabularies: &HashMap<String, Vec<String>>) -> Self {
        let vocabularies = vocabularies
            .iter()
            .map(|(column, categories)| {
                let lookup = categories
                    .iter()
                    .enumerate()
                    .map(|(code, category)| (category.clone(), code))
                    .collect();
                (column.clone(), lookup)
            })
            .collect();
        Self { vocabularies }
    }

    /// Categorical columns that have no frozen vocabulary and will be re-fitted per batch.
    pub fn batch_fitted_columns(&self) -> Vec<&'static str> {
        CATEGORICAL_COLUMNS
            .iter()
            .copied()
            .filter(|c| !self.vocabularies.contains_key(*c))
            .collect()
    }

    /// Encodes every categorical column present in `frame` and applies the
    /// `pdays` rewrite. Absent columns are skipped.
    pub fn encode(&self, mut frame: Frame) -> Frame {
        for name in CATEGORICAL_COLUMNS {
            let Some(column) = frame.column_mut(name) else {
                continue;
            };
            let texts: Vec<String> = column
                .values
                .iter()
                .map(|cell| cell.as_text().unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()))
                .collect();

            column.values = match self.vocabularies.get(name) {
                Some(lookup) => encode_frozen(&texts, lookup),
                None => encode_batch_fitted(&texts),
            };
        }

        if let Some(pdays) = frame.column_mut(PDAYS_COLUMN) {
            for cell in pdays.values.iter_mut() {
                if *cell == Cell::Number(PDAYS_NEVER_CONTACTED) {
                    *cell = Cell::Number(PDAYS_SENTINEL);
                }
            }
        }

        frame
    }
}

fn encode_frozen(texts: &[String], lookup: &HashMap<String, usize>) -> Vec<Cell> {
    let unknown = lookup.get(UNKNOWN_CATEGORY).copied();
    texts
        .iter()
        .map(|text| match lookup.get(text).copied().or(unknown) {
            Some(code) => Cell::Number(code as f64),
            None => {
                tracing::debug!(category = %text, "unseen category, encoding as missing");
                Cell::Missing
            }
        })
        .collect()
}

fn encode_batch_fitted(texts: &[String]) -> Vec<Cell> {
    let mut codes: HashMap<&str, usize> = HashMap::new();
    texts
        .iter()
        .map(|text| {
            let next = codes.len();
            let code = *codes.entry(text.as_str()).or_insert(next);
            Cell::Number(code as f64)
        })
        .collect()
}
