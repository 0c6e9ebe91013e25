use serde::{Deserialize, Serialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the
/// training loop sends one `EpochStats` value every `report_every` epochs
/// and for the final epoch. Receivers (e.g. the driver binary) use this
/// to print progress without the engine touching the console itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Index of the example sampled in this epoch.
    pub sample_index: usize,
    /// Root-sum-of-squared error between the network output and the
    /// sampled example's target vector.
    pub train_error: f64,
}
