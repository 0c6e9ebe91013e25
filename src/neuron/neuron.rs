use rand::Rng;

use crate::error::{NetError, NetResult};
use crate::math::functions::{sigmoid, sigmoid_derivative};

/// A single sigmoid neuron: one weight per incoming connection plus a bias.
///
/// The neuron caches the input and output of its most recent activation;
/// both are needed by the backward pass. Gradient computation writes the
/// local error signal (`sigma`) and a pending per-weight delta, which a
/// later `apply_update` folds into the weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    weights: Vec<f64>,
    bias: f64,
    last_input: Vec<f64>,
    last_output: f64,
    sigma: f64,
    deltas: Vec<f64>,
}

/// Fresh weights and biases are drawn uniformly from this range.
const INIT_RANGE: std::ops::Range<f64> = -0.5..0.5;

impl Neuron {
    /// Creates a neuron with `input_size` randomly initialized weights and
    /// a random bias, all uniform in [-0.5, 0.5).
    pub fn random<R: Rng + ?Sized>(input_size: usize, rng: &mut R) -> NetResult<Neuron> {
        if input_size == 0 {
            return Err(NetError::InvalidTopology(
                "a neuron needs at least one input connection".into(),
            ));
        }

        let weights = (0..input_size)
            .map(|_| rng.gen_range(INIT_RANGE))
            .collect();
        let bias = rng.gen_range(INIT_RANGE);

        Ok(Neuron::from_parts(weights, bias))
    }

    /// Wraps explicit weights and bias, e.g. parsed from a model file.
    pub fn from_parts(weights: Vec<f64>, bias: f64) -> Neuron {
        Neuron {
            weights,
            bias,
            last_input: Vec::new(),
            last_output: 0.0,
            sigma: 0.0,
            deltas: Vec::new(),
        }
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    /// Output of the most recent `activate` call.
    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    /// Local error signal of the most recent gradient computation.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Computes `sigmoid(bias + Σ input[i] * weights[i])`, caching the
    /// input and the activation for the backward pass.
    pub fn activate(&mut self, input: &[f64]) -> NetResult<f64> {
        if input.len() != self.weights.len() {
            return Err(NetError::DimensionMismatch {
                expected: self.weights.len(),
                actual: input.len(),
            });
        }

        let sum: f64 = self
            .weights
            .iter()
            .zip(input.iter())
            .map(|(w, x)| w * x)
            .sum();

        self.last_input = input.to_vec();
        self.last_output = sigmoid(sum + self.bias);

        Ok(self.last_output)
    }

    /// Gradient step for an output-layer neuron: the error is taken
    /// directly against the expected value.
    ///
    /// Only meaningful after an `activate` call on the same input.
    pub fn output_gradient(&mut self, target: f64, rate: f64) {
        let error = target - self.last_output;
        self.sigma = error * sigmoid_derivative(self.last_output);
        self.store_deltas(rate);
    }

    /// Gradient step for a hidden-layer neuron: the error is the weighted
    /// sum of the downstream layer's sigmas, one term per outgoing weight.
    pub fn hidden_gradient(
        &mut self,
        outgoing_weights: &[f64],
        downstream_sigmas: &[f64],
        rate: f64,
    ) -> NetResult<()> {
        if outgoing_weights.len() != downstream_sigmas.len() {
            return Err(NetError::DimensionMismatch {
                expected: outgoing_weights.len(),
                actual: downstream_sigmas.len(),
            });
        }

        let weighted_error: f64 = outgoing_weights
            .iter()
            .zip(downstream_sigmas.iter())
            .map(|(w, s)| w * s)
            .sum();

        self.sigma = weighted_error * sigmoid_derivative(self.last_output);
        self.store_deltas(rate);

        Ok(())
    }

    /// Folds the pending deltas into the weights. The bias is left alone:
    /// it was already overwritten with `rate * sigma` during the gradient
    /// step (see DESIGN.md on the inherited bias-update asymmetry).
    pub fn apply_update(&mut self) -> NetResult<()> {
        if self.deltas.is_empty() {
            return Err(NetError::UpdateBeforeGradient);
        }

        for (weight, delta) in self.weights.iter_mut().zip(self.deltas.iter()) {
            *weight += delta;
        }

        Ok(())
    }

    fn store_deltas(&mut self, rate: f64) {
        self.deltas = self
            .last_input
            .iter()
            .map(|x| rate * self.sigma * x)
            .collect();

        self.bias = rate * self.sigma;
    }

    /// Parses a `w0 w1 ... wn-1 bias` record, the last field being the bias.
    pub fn parse_record(record: &str) -> NetResult<Neuron> {
        let fields: Vec<&str> = record.split_whitespace().collect();

        if fields.len() < 2 {
            return Err(NetError::MalformedFile(format!(
                "neuron record needs at least one weight and a bias: '{record}'"
            )));
        }

        let mut values = Vec::with_capacity(fields.len());
        for field in &fields {
            let value: f64 = field.parse().map_err(|_| {
                NetError::MalformedFile(format!("'{field}' is not a valid number"))
            })?;
            values.push(value);
        }

        let bias = values.pop().unwrap_or(0.0);

        Ok(Neuron::from_parts(values, bias))
    }

    /// Inverse of `parse_record`. `f64` Display output round-trips exactly.
    pub fn format_record(&self) -> String {
        let mut record = String::new();

        for weight in &self.weights {
            record.push_str(&weight.to_string());
            record.push(' ');
        }
        record.push_str(&self.bias.to_string());

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn activation_stays_in_open_unit_interval() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut neuron = Neuron::random(3, &mut rng).unwrap();

        // Stay below sigmoid's f64 saturation point (|sum| < ~36).
        for input in [[0.0, 0.0, 0.0], [20.0, -20.0, 10.0], [-15.0, 5.0, 15.0]] {
            let out = neuron.activate(&input).unwrap();
            assert!(out > 0.0 && out < 1.0);
        }
    }

    #[test]
    fn unit_weights_zero_bias_zero_input_gives_half() {
        let mut neuron = Neuron::from_parts(vec![1.0, 1.0], 0.0);
        let out = neuron.activate(&[0.0, 0.0]).unwrap();
        assert_eq!(out, 0.5);
    }

    #[test]
    fn activation_rejects_wrong_input_width() {
        let mut neuron = Neuron::from_parts(vec![1.0, 1.0], 0.0);
        let err = neuron.activate(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            NetError::DimensionMismatch { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn output_gradient_overwrites_bias_with_scaled_sigma() {
        let mut neuron = Neuron::from_parts(vec![1.0, 1.0], 0.0);
        neuron.activate(&[0.0, 0.0]).unwrap();
        neuron.output_gradient(1.0, 0.3);

        // output = 0.5, error = 0.5, sigma = 0.5 * 0.25 = 0.125
        assert!((neuron.sigma() - 0.125).abs() < 1e-12);
        assert!((neuron.bias() - 0.3 * 0.125).abs() < 1e-12);
    }

    #[test]
    fn hidden_gradient_rejects_length_mismatch() {
        let mut neuron = Neuron::from_parts(vec![0.5, 0.5], 0.0);
        neuron.activate(&[1.0, 1.0]).unwrap();
        let err = neuron
            .hidden_gradient(&[0.1, 0.2], &[0.3], 0.3)
            .unwrap_err();
        assert!(matches!(err, NetError::DimensionMismatch { .. }));
    }

    #[test]
    fn update_before_gradient_fails() {
        let mut neuron = Neuron::from_parts(vec![1.0], 0.0);
        assert!(matches!(
            neuron.apply_update(),
            Err(NetError::UpdateBeforeGradient)
        ));
    }

    #[test]
    fn update_accumulates_deltas_into_weights() {
        let mut neuron = Neuron::from_parts(vec![1.0, -1.0], 0.0);
        neuron.activate(&[2.0, 3.0]).unwrap();
        neuron.output_gradient(1.0, 0.5);

        let sigma = neuron.sigma();
        neuron.apply_update().unwrap();

        assert!((neuron.weights()[0] - (1.0 + 0.5 * sigma * 2.0)).abs() < 1e-12);
        assert!((neuron.weights()[1] - (-1.0 + 0.5 * sigma * 3.0)).abs() < 1e-12);
    }

    #[test]
    fn record_round_trip_is_exact() {
        let neuron = Neuron::from_parts(vec![0.1, -2.5e-7, 42.0], -0.333333333333333);
        let parsed = Neuron::parse_record(&neuron.format_record()).unwrap();
        assert_eq!(parsed.weights(), neuron.weights());
        assert_eq!(parsed.bias(), neuron.bias());
    }

    #[test]
    fn record_with_single_field_is_rejected() {
        assert!(matches!(
            Neuron::parse_record("0.5"),
            Err(NetError::MalformedFile(_))
        ));
    }
}
