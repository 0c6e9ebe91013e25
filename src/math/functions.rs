/// The logistic sigmoid `1 / (1 + e^-x)`.
///
/// Maps any finite real to the open interval (0, 1).
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Derivative of the sigmoid expressed in terms of its *output*:
/// `σ'(x) = σ(x) * (1 - σ(x))`.
///
/// Lies in [0, 0.25], maximized at `output = 0.5`.
pub fn sigmoid_derivative(output: f64) -> f64 {
    output * (1.0 - output)
}

/// Index of the maximum element, scanning left to right with strict `>`.
/// The first occurrence of the maximum wins ties; an all-equal vector
/// yields 0. Empty input yields 0 as well (callers guarantee non-empty).
pub fn argmax(values: &[f64]) -> usize {
    let mut best_index = 0;
    let mut best = f64::NEG_INFINITY;

    for (i, &value) in values.iter().enumerate() {
        if value > best {
            best = value;
            best_index = i;
        }
    }

    best_index
}

/// Root of the sum of squared per-component errors between a network
/// output and its target vector.
pub fn output_error(output: &[f64], target: &[f64]) -> f64 {
    output
        .iter()
        .zip(target.iter())
        .map(|(o, t)| (t - o) * (t - o))
        .sum::<f64>()
        .sqrt()
}
