use rand::Rng;

use crate::error::{NetError, NetResult};
use crate::neuron::Neuron;

/// Position of a layer within the network.
///
/// Exactly the last layer of a `Network` is `Output`; the invariant is
/// enforced by `Network` construction/append, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    Hidden,
    Output,
}

/// An ordered row of neurons sharing one input dimension.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<Neuron>,
    role: LayerRole,
    last_output: Vec<f64>,
    last_sigmas: Vec<f64>,
}

impl Layer {
    /// Creates a hidden layer of `width` randomly initialized neurons,
    /// each with `input_size` weights.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        input_size: usize,
        rng: &mut R,
    ) -> NetResult<Layer> {
        if width == 0 {
            return Err(NetError::InvalidTopology(
                "a layer needs at least one neuron".into(),
            ));
        }

        let mut neurons = Vec::with_capacity(width);
        for _ in 0..width {
            neurons.push(Neuron::random(input_size, rng)?);
        }

        Ok(Layer {
            neurons,
            role: LayerRole::Hidden,
            last_output: Vec::new(),
            last_sigmas: Vec::new(),
        })
    }

    /// Wraps explicit neurons, e.g. parsed from a model file. All neurons
    /// must share the same input size.
    pub fn from_neurons(neurons: Vec<Neuron>) -> NetResult<Layer> {
        if neurons.is_empty() {
            return Err(NetError::InvalidTopology(
                "a layer needs at least one neuron".into(),
            ));
        }

        let input_size = neurons[0].input_size();
        for neuron in &neurons {
            if neuron.input_size() != input_size {
                return Err(NetError::DimensionMismatch {
                    expected: input_size,
                    actual: neuron.input_size(),
                });
            }
        }

        Ok(Layer {
            neurons,
            role: LayerRole::Hidden,
            last_output: Vec::new(),
            last_sigmas: Vec::new(),
        })
    }

    pub fn role(&self) -> LayerRole {
        self.role
    }

    pub(crate) fn set_role(&mut self, role: LayerRole) {
        self.role = role;
    }

    /// Number of neurons in the layer.
    pub fn width(&self) -> usize {
        self.neurons.len()
    }

    /// Input dimension shared by every neuron in the layer.
    pub fn input_size(&self) -> usize {
        self.neurons[0].input_size()
    }

    /// Sigma of every neuron, cached by the most recent backward call.
    pub fn last_sigmas(&self) -> &[f64] {
        &self.last_sigmas
    }

    /// Output vector cached by the most recent forward pass.
    pub fn last_output(&self) -> &[f64] {
        &self.last_output
    }

    /// Activates every neuron on the same input, in order.
    pub fn forward(&mut self, input: &[f64]) -> NetResult<Vec<f64>> {
        let mut output = Vec::with_capacity(self.neurons.len());

        for neuron in &mut self.neurons {
            output.push(neuron.activate(input)?);
        }

        self.last_output = output.clone();
        Ok(output)
    }

    /// Backward pass for the output layer: each neuron's error is taken
    /// against its own component of the target vector.
    pub fn backward_output(
        &mut self,
        predicted: &[f64],
        target: &[f64],
        rate: f64,
    ) -> NetResult<()> {
        if self.role != LayerRole::Output {
            return Err(NetError::RoleViolation);
        }

        if predicted.len() != self.neurons.len() {
            return Err(NetError::DimensionMismatch {
                expected: self.neurons.len(),
                actual: predicted.len(),
            });
        }

        if target.len() != self.neurons.len() {
            return Err(NetError::DimensionMismatch {
                expected: self.neurons.len(),
                actual: target.len(),
            });
        }

        for (neuron, &expected) in self.neurons.iter_mut().zip(target.iter()) {
            neuron.output_gradient(expected, rate);
        }

        self.cache_sigmas();
        Ok(())
    }

    /// Backward pass for a hidden layer. `next_weights` is the next
    /// layer's full weight matrix (row j = next-layer neuron j); the
    /// outgoing weights of neuron i are column i of that matrix.
    pub fn backward_hidden(
        &mut self,
        next_weights: &[Vec<f64>],
        next_sigmas: &[f64],
        rate: f64,
    ) -> NetResult<()> {
        for row in next_weights {
            if row.len() != self.neurons.len() {
                return Err(NetError::DimensionMismatch {
                    expected: self.neurons.len(),
                    actual: row.len(),
                });
            }
        }

        for (i, neuron) in self.neurons.iter_mut().enumerate() {
            let outgoing: Vec<f64> = next_weights.iter().map(|row| row[i]).collect();
            neuron.hidden_gradient(&outgoing, next_sigmas, rate)?;
        }

        self.cache_sigmas();
        Ok(())
    }

    /// Applies every neuron's pending deltas.
    pub fn update_weights(&mut self) -> NetResult<()> {
        for neuron in &mut self.neurons {
            neuron.apply_update()?;
        }

        Ok(())
    }

    /// Row i = neuron i's weight vector.
    pub fn weights_matrix(&self) -> Vec<Vec<f64>> {
        self.neurons
            .iter()
            .map(|neuron| neuron.weights().to_vec())
            .collect()
    }

    /// Parses a block of newline-separated neuron records.
    pub fn parse_block(block: &str) -> NetResult<Layer> {
        let mut neurons = Vec::new();

        for record in block.lines() {
            let record = record.trim();
            if record.is_empty() {
                continue;
            }
            neurons.push(Neuron::parse_record(record)?);
        }

        Layer::from_neurons(neurons)
    }

    /// Inverse of `parse_block`: one neuron record per line.
    pub fn format_block(&self) -> String {
        self.neurons
            .iter()
            .map(Neuron::format_record)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cache_sigmas(&mut self) {
        self.last_sigmas = self.neurons.iter().map(Neuron::sigma).collect();
    }
}
