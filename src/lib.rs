pub mod dataset;
pub mod error;
pub mod layers;
pub mod math;
pub mod network;
pub mod neuron;
pub mod train;

// Convenience re-exports
pub use dataset::loader::{load_dataset, parse_dataset};
pub use error::{NetError, NetResult};
pub use layers::layer::{Layer, LayerRole};
pub use network::network::Network;
pub use network::spec::TopologySpec;
pub use neuron::neuron::Neuron;
pub use train::train_config::{TrainConfig, DEFAULT_EPOCHS};
pub use train::trainer::{test_network, train_loop, train_network};
pub use train::EpochStats;
