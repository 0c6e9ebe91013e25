use serde::{Deserialize, Serialize};

/// Optional annotations attached to a `TopologySpec`.
/// All fields are Option<> so old spec files (without metadata) deserialize
/// cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub description: Option<String>,
    /// Human-readable names of the input features, in column order.
    pub feature_names: Option<Vec<String>>,
    /// Human-readable class labels for the output layer
    /// (e.g. ["setosa", "versicolor", "virginica"]).
    pub class_labels: Option<Vec<String>>,
}
