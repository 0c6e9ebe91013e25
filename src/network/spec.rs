use serde::{Deserialize, Serialize};

use crate::error::{NetError, NetResult};
use crate::network::metadata::ModelMetadata;

/// A serializable description of a network topology plus the training
/// hyperparameters to pair with it.
///
/// `TopologySpec` is stored as JSON independently of trained weights, so a
/// driver can keep its architecture configuration next to the dataset and
/// rebuild a fresh network from it at any time. The widths list follows
/// the model-file convention: `widths[0]` is the input dimension, the
/// remaining entries are layer widths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologySpec {
    /// Human-readable name used as the model file stem.
    pub name: String,
    /// `[d0, d1, ..., dk]` - input dimension followed by layer widths.
    pub widths: Vec<usize>,
    /// Learning rate for the online SGD loop.
    pub learning_rate: f64,
    /// Total single-example training epochs.
    pub epochs: usize,
    /// Optional metadata (description, feature names, class labels).
    #[serde(default)]
    pub metadata: Option<ModelMetadata>,
}

impl TopologySpec {
    /// Checks the widths list describes a buildable network.
    pub fn validate(&self) -> NetResult<()> {
        if self.widths.len() < 2 {
            return Err(NetError::InvalidTopology(
                "a topology spec needs an input dimension and at least one layer".into(),
            ));
        }

        if self.widths.contains(&0) {
            return Err(NetError::InvalidTopology(
                "layer widths must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> NetResult<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| NetError::MalformedFile(e.to_string()))
    }

    /// Deserializes a `TopologySpec` from a JSON file and validates it.
    pub fn load_json(path: &str) -> NetResult<TopologySpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let spec: TopologySpec = serde_json::from_reader(reader)
            .map_err(|e| NetError::MalformedFile(e.to_string()))?;

        spec.validate()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iris_spec() -> TopologySpec {
        TopologySpec {
            name: "iris".into(),
            widths: vec![4, 2, 3],
            learning_rate: 0.3,
            epochs: 10_000,
            metadata: None,
        }
    }

    #[test]
    fn json_round_trip() {
        let spec = iris_spec();
        let json = serde_json::to_string(&spec).unwrap();
        let back: TopologySpec = serde_json::from_str(&json).unwrap();

        assert_eq!(back.widths, spec.widths);
        assert_eq!(back.learning_rate, spec.learning_rate);
        assert_eq!(back.epochs, spec.epochs);
    }

    #[test]
    fn old_specs_without_metadata_still_parse() {
        let json = r#"{"name":"iris","widths":[4,2,3],"learning_rate":0.3,"epochs":10000}"#;
        let spec: TopologySpec = serde_json::from_str(json).unwrap();
        assert!(spec.metadata.is_none());
    }

    #[test]
    fn degenerate_widths_are_rejected() {
        let mut spec = iris_spec();
        spec.widths = vec![4];
        assert!(spec.validate().is_err());

        spec.widths = vec![4, 0, 3];
        assert!(spec.validate().is_err());
    }
}
