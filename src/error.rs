use std::fmt;
use std::io;

/// All failure conditions surfaced by the engine.
///
/// Every variant is raised synchronously at the point of violation; nothing
/// is retried internally.
#[derive(Debug)]
pub enum NetError {
    /// An input/weight or predicted/target length disagreement.
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },
    /// A topology that cannot form a network (too few layers, zero width).
    InvalidTopology(String),
    /// An output-layer operation invoked on a hidden layer.
    RoleViolation,
    /// A layer or neuron index outside the valid range.
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    /// A weight update requested before any gradient was computed.
    UpdateBeforeGradient,
    /// A training or evaluation call with no examples.
    EmptyDataset,
    /// A model or dataset file that failed to parse or failed validation.
    MalformedFile(String),
    Io(io::Error),
}

pub type NetResult<T> = Result<T, NetError>;

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {expected}, got {actual}")
            }
            NetError::InvalidTopology(msg) => write!(f, "invalid topology: {msg}"),
            NetError::RoleViolation => {
                write!(f, "output-layer backward pass called on a hidden layer")
            }
            NetError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range (len {len})")
            }
            NetError::UpdateBeforeGradient => {
                write!(f, "weight update requested before any gradient computation")
            }
            NetError::EmptyDataset => write!(f, "dataset contains no examples"),
            NetError::MalformedFile(msg) => write!(f, "malformed file: {msg}"),
            NetError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for NetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for NetError {
    fn from(err: io::Error) -> NetError {
        NetError::Io(err)
    }
}
