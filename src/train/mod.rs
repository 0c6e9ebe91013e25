pub mod epoch_stats;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::EpochStats;
pub use train_config::{TrainConfig, DEFAULT_EPOCHS};
pub use trainer::{test_network, train_loop, train_network};
