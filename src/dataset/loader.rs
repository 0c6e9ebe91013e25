use std::fs;
use std::path::Path;

use crate::error::{NetError, NetResult};

/// Parses the whitespace-separated dataset text format.
///
/// Format, one example per line:
/// - the first `n_features` fields are real-valued inputs
/// - the next field is an integer class id in `[0, n_classes)`
/// - blank lines are skipped
///
/// The class id is one-hot encoded into a target vector of length
/// `n_classes`. Returns `(inputs, targets)` of equal length.
pub fn parse_dataset(
    text: &str,
    n_features: usize,
    n_classes: usize,
) -> NetResult<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    let mut inputs: Vec<Vec<f64>> = Vec::new();
    let mut targets: Vec<Vec<f64>> = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < n_features + 1 {
            return Err(NetError::MalformedFile(format!(
                "line {}: expected {} feature fields and a class id, got {} fields",
                line_idx + 1,
                n_features,
                fields.len()
            )));
        }

        let mut features = Vec::with_capacity(n_features);
        for field in &fields[..n_features] {
            let value: f64 = field.parse().map_err(|_| {
                NetError::MalformedFile(format!(
                    "line {}: '{}' is not a valid number",
                    line_idx + 1,
                    field
                ))
            })?;
            features.push(value);
        }

        let class_id: usize = fields[n_features].parse().map_err(|_| {
            NetError::MalformedFile(format!(
                "line {}: class id '{}' is not a non-negative integer",
                line_idx + 1,
                fields[n_features]
            ))
        })?;

        if class_id >= n_classes {
            return Err(NetError::MalformedFile(format!(
                "line {}: class id {} >= class count {}",
                line_idx + 1,
                class_id,
                n_classes
            )));
        }

        let mut one_hot = vec![0.0; n_classes];
        one_hot[class_id] = 1.0;

        inputs.push(features);
        targets.push(one_hot);
    }

    if inputs.is_empty() {
        return Err(NetError::MalformedFile(
            "dataset contains no examples".into(),
        ));
    }

    Ok((inputs, targets))
}

/// Reads and parses a dataset file. The iris driver uses `(4, 3)`.
pub fn load_dataset<P: AsRef<Path>>(
    path: P,
    n_features: usize,
    n_classes: usize,
) -> NetResult<(Vec<Vec<f64>>, Vec<Vec<f64>>)> {
    let text = fs::read_to_string(path)?;
    parse_dataset(&text, n_features, n_classes)
}
