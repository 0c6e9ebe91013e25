pub mod functions;

pub use functions::{argmax, output_error, sigmoid, sigmoid_derivative};
