//! Regression inputs: the dataset every experiment configuration works on.
//!
//! `RegressionInputs` is a plain value: `Clone` produces a fully independent
//! structural copy. Generators hand a fresh copy to each configuration they
//! build, so in-place edits (feature selection restricting the x columns,
//! re-splitting rows) never leak between configurations.

use crate::error::{AmlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Split holding the rows used to train regressors.
pub const TRAINING_SPLIT: &str = "training";
/// Split holding the rows used to score hyperparameter candidates.
pub const HP_SELECTION_SPLIT: &str = "hp_selection";
/// Split holding the rows used for the final validation.
pub const VALIDATION_SPLIT: &str = "validation";

/// Feature columns, target column and row splits of a regression problem.
///
/// Deserialization goes through [`RegressionInputs::new`], so a decoded
/// value satisfies the same invariants as a constructed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegressionInputsRecord")]
pub struct RegressionInputs {
    columns: BTreeMap<String, Vec<f64>>,
    x_columns: Vec<String>,
    y_column: String,
    splits: BTreeMap<String, Vec<usize>>,
    row_count: usize,
}

/// Serialized form of [`RegressionInputs`]; `row_count` is derived.
#[derive(Deserialize)]
struct RegressionInputsRecord {
    columns: BTreeMap<String, Vec<f64>>,
    x_columns: Vec<String>,
    y_column: String,
    #[serde(default)]
    splits: BTreeMap<String, Vec<usize>>,
}

impl TryFrom<RegressionInputsRecord> for RegressionInputs {
    type Error = AmlError;

    fn try_from(record: RegressionInputsRecord) -> Result<Self> {
        let mut inputs = Self::new(record.columns, record.x_columns, record.y_column)?;
        for (name, rows) in record.splits {
            inputs.set_split(name, rows)?;
        }
        Ok(inputs)
    }
}

impl RegressionInputs {
    /// Build regression inputs; every row starts in the training split.
    pub fn new(
        columns: BTreeMap<String, Vec<f64>>,
        x_columns: Vec<String>,
        y_column: impl Into<String>,
    ) -> Result<Self> {
        let y_column = y_column.into();
        let target = columns
            .get(&y_column)
            .ok_or_else(|| AmlError::dataset(format!("target column '{y_column}' not found")))?;
        let row_count = target.len();
        if row_count == 0 {
            return Err(AmlError::dataset("dataset has no rows"));
        }
        if let Some((name, values)) = columns.iter().find(|(_, v)| v.len() != row_count) {
            return Err(AmlError::dataset(format!(
                "column '{name}' has {} rows, expected {row_count}",
                values.len()
            )));
        }
        if x_columns.is_empty() {
            return Err(AmlError::dataset("no feature columns"));
        }
        for (i, x) in x_columns.iter().enumerate() {
            if x_columns[..i].contains(x) {
                return Err(AmlError::dataset(format!(
                    "feature column '{x}' listed twice"
                )));
            }
            if !columns.contains_key(x) {
                return Err(AmlError::dataset(format!("feature column '{x}' not found")));
            }
            if x == &y_column {
                return Err(AmlError::dataset(format!(
                    "column '{x}' cannot be both feature and target"
                )));
            }
        }

        let mut splits = BTreeMap::new();
        splits.insert(TRAINING_SPLIT.to_string(), (0..row_count).collect());

        Ok(Self {
            columns,
            x_columns,
            y_column,
            splits,
            row_count,
        })
    }

    /// Load a numeric CSV file. When `x_columns` is `None` every column other
    /// than the target is a feature.
    pub fn from_csv(
        path: &Path,
        y_column: &str,
        x_columns: Option<Vec<String>>,
    ) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content, y_column, x_columns)
    }

    pub fn from_csv_str(
        content: &str,
        y_column: &str,
        x_columns: Option<Vec<String>>,
    ) -> Result<Self> {
        let mut lines = content.lines();

        let header: Vec<String> = lines
            .next()
            .ok_or_else(|| AmlError::dataset("Empty CSV file"))?
            .split(',')
            .map(|s| s.trim().trim_matches('"').to_string())
            .collect();
        for (i, name) in header.iter().enumerate() {
            if header[..i].contains(name) {
                return Err(AmlError::dataset(format!("duplicate column '{name}'")));
            }
        }

        let mut values: Vec<Vec<f64>> = vec![Vec::new(); header.len()];
        for (line_no, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').collect();
            if fields.len() != header.len() {
                return Err(AmlError::dataset(format!(
                    "line {} has {} fields, expected {}",
                    line_no + 2,
                    fields.len(),
                    header.len()
                )));
            }
            for (column, field) in values.iter_mut().zip(fields) {
                let field = field.trim().trim_matches('"');
                let value = field.parse::<f64>().map_err(|_| {
                    AmlError::dataset(format!(
                        "line {}: '{field}' is not a number",
                        line_no + 2
                    ))
                })?;
                column.push(value);
            }
        }

        let x_columns = x_columns.unwrap_or_else(|| {
            header
                .iter()
                .filter(|name| name.as_str() != y_column)
                .cloned()
                .collect()
        });
        let columns = header.into_iter().zip(values).collect();
        Self::new(columns, x_columns, y_column)
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn x_columns(&self) -> &[String] {
        &self.x_columns
    }

    pub fn y_column(&self) -> &str {
        &self.y_column
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Restrict the feature columns to `keep`, preserving their current order.
    pub fn select_features(&mut self, keep: &[String]) -> Result<()> {
        if let Some(unknown) = keep.iter().find(|k| !self.x_columns.contains(k)) {
            return Err(AmlError::dataset(format!(
                "'{unknown}' is not a feature column"
            )));
        }
        if keep.is_empty() {
            return Err(AmlError::dataset("cannot select an empty feature set"));
        }
        self.x_columns.retain(|x| keep.contains(x));
        Ok(())
    }

    pub fn set_split(&mut self, name: impl Into<String>, rows: Vec<usize>) -> Result<()> {
        if let Some(row) = rows.iter().find(|&&r| r >= self.row_count) {
            return Err(AmlError::dataset(format!(
                "row {row} out of range (dataset has {} rows)",
                self.row_count
            )));
        }
        self.splits.insert(name.into(), rows);
        Ok(())
    }

    pub fn split(&self, name: &str) -> Option<&[usize]> {
        self.splits.get(name).map(Vec::as_slice)
    }

    /// Feature matrix (row-major, current x columns) and target vector for
    /// the given rows.
    pub fn xy_data(&self, rows: &[usize]) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
        let y = self
            .columns
            .get(&self.y_column)
            .ok_or_else(|| AmlError::dataset(format!("target '{}' missing", self.y_column)))?;
        let features: Vec<&Vec<f64>> = self
            .x_columns
            .iter()
            .map(|x| {
                self.columns
                    .get(x)
                    .ok_or_else(|| AmlError::dataset(format!("feature '{x}' missing")))
            })
            .collect::<Result<_>>()?;

        let mut xdata = Vec::with_capacity(rows.len());
        let mut ydata = Vec::with_capacity(rows.len());
        for &row in rows {
            if row >= self.row_count {
                return Err(AmlError::dataset(format!("row {row} out of range")));
            }
            xdata.push(features.iter().map(|column| column[row]).collect());
            ydata.push(y[row]);
        }
        Ok((xdata, ydata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CSV: &str = "x1,x2,x3,y\n1,2,3,10\n4,5,6,20\n\n7,8,9,30\n";

    fn inputs() -> RegressionInputs {
        RegressionInputs::from_csv_str(CSV, "y", None).unwrap()
    }

    #[test]
    fn test_from_csv_str() {
        let inputs = inputs();
        assert_eq!(inputs.row_count(), 3);
        assert_eq!(inputs.x_columns(), ["x1", "x2", "x3"]);
        assert_eq!(inputs.y_column(), "y");
        assert_eq!(inputs.column("x2"), Some(&[2.0, 5.0, 8.0][..]));
        assert_eq!(inputs.split(TRAINING_SPLIT), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn test_explicit_x_columns() {
        let inputs =
            RegressionInputs::from_csv_str(CSV, "y", Some(vec!["x3".into(), "x1".into()]))
                .unwrap();
        assert_eq!(inputs.x_columns(), ["x3", "x1"]);
    }

    #[test]
    fn test_rejects_bad_csv() {
        assert!(RegressionInputs::from_csv_str("", "y", None).is_err());
        assert!(RegressionInputs::from_csv_str("x,y\n", "y", None).is_err());
        assert!(RegressionInputs::from_csv_str("x,y\n1,a\n", "y", None).is_err());
        assert!(RegressionInputs::from_csv_str("x,y\n1,2,3\n", "y", None).is_err());
        assert!(RegressionInputs::from_csv_str("x,y\n1,2\n", "z", None).is_err());
    }

    #[test]
    fn test_rejects_duplicate_header() {
        let err = RegressionInputs::from_csv_str("a,a,y\n1,2,3\n4,5,6\n", "y", None).unwrap_err();
        assert!(matches!(err, AmlError::Dataset(_)));
    }

    #[test]
    fn test_rejects_duplicate_x_columns() {
        let err = RegressionInputs::from_csv_str(CSV, "y", Some(vec!["x1".into(), "x1".into()]))
            .unwrap_err();
        assert!(matches!(err, AmlError::Dataset(_)));
    }

    #[test]
    fn test_deserialize_validates() {
        let empty = r#"{"columns":{},"x_columns":[],"y_column":"y","splits":{},"row_count":0}"#;
        assert!(serde_json::from_str::<RegressionInputs>(empty).is_err());

        let out_of_range = r#"{"columns":{"a":[1.0],"y":[2.0]},"x_columns":["a"],
            "y_column":"y","splits":{"training":[0,3]}}"#;
        assert!(serde_json::from_str::<RegressionInputs>(out_of_range).is_err());

        let mut original = inputs();
        original.set_split(VALIDATION_SPLIT, vec![2]).unwrap();
        let json = serde_json::to_string(&original).unwrap();
        let decoded: RegressionInputs = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_new_validates_lengths() {
        let mut columns = BTreeMap::new();
        columns.insert("x".to_string(), vec![1.0, 2.0]);
        columns.insert("y".to_string(), vec![1.0]);
        let err = RegressionInputs::new(columns, vec!["x".into()], "y").unwrap_err();
        assert!(matches!(err, AmlError::Dataset(_)));
    }

    #[test]
    fn test_target_cannot_be_feature() {
        let mut columns = BTreeMap::new();
        columns.insert("y".to_string(), vec![1.0]);
        assert!(RegressionInputs::new(columns, vec!["y".into()], "y").is_err());
    }

    #[test]
    fn test_select_features_keeps_order() {
        let mut inputs = inputs();
        inputs
            .select_features(&["x3".to_string(), "x1".to_string()])
            .unwrap();
        assert_eq!(inputs.x_columns(), ["x1", "x3"]);
        assert!(inputs.select_features(&["y".to_string()]).is_err());
        assert!(inputs.select_features(&[]).is_err());
    }

    #[test]
    fn test_clone_is_independent() {
        let original = inputs();
        let mut copy = original.clone();
        copy.select_features(&["x2".to_string()]).unwrap();
        copy.set_split(VALIDATION_SPLIT, vec![2]).unwrap();
        assert_eq!(original.x_columns(), ["x1", "x2", "x3"]);
        assert!(original.split(VALIDATION_SPLIT).is_none());
    }

    #[test]
    fn test_xy_data() {
        let mut inputs = inputs();
        inputs.select_features(&["x1".to_string(), "x3".to_string()]).unwrap();
        let (x, y) = inputs.xy_data(&[2, 0]).unwrap();
        assert_eq!(x, vec![vec![7.0, 9.0], vec![1.0, 3.0]]);
        assert_eq!(y, vec![30.0, 10.0]);
        assert!(inputs.xy_data(&[3]).is_err());
    }

    #[test]
    fn test_set_split_bounds() {
        let mut inputs = inputs();
        assert!(inputs.set_split(HP_SELECTION_SPLIT, vec![0, 5]).is_err());
        inputs.set_split(HP_SELECTION_SPLIT, vec![1]).unwrap();
        assert_eq!(inputs.split(HP_SELECTION_SPLIT), Some(&[1][..]));
    }
}
