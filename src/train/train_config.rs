use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::train::epoch_stats::EpochStats;

/// Default single-example epoch budget for `train_network`.
pub const DEFAULT_EPOCHS: usize = 10_000;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`          - total training steps; each step samples one example
/// - `learning_rate`   - step size applied to every gradient
/// - `error_tolerance` - optional early stop: the loop ends once a sampled
///                       example's training error drops below this value.
///                       `None` (the default) runs the full epoch budget.
/// - `report_every`    - emit an `EpochStats` every N epochs (and on the
///                       final epoch) when a progress channel is set
/// - `progress_tx`     - optional channel sender; if the receiver is
///                       dropped the loop terminates early (clean shutdown)
/// - `stop_flag`       - optional atomic flag; when set to `true` from
///                       another thread the loop terminates after the
///                       current epoch
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub error_tolerance: Option<f64>,
    pub report_every: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no early stop, no progress
    /// channel and no stop flag.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            error_tolerance: None,
            report_every: 1000,
            progress_tx: None,
            stop_flag: None,
        }
    }
}
