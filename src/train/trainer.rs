use std::sync::atomic::Ordering;

use rand::Rng;

use crate::error::{NetError, NetResult};
use crate::math::functions::output_error;
use crate::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::{TrainConfig, DEFAULT_EPOCHS};

/// Trains `network` by online stochastic gradient descent with the
/// default epoch budget. Each epoch samples one example uniformly at
/// random (with replacement), runs a forward pass, backpropagates the
/// error and updates every layer's weights.
///
/// Returns the training error of the last completed epoch.
pub fn train_network<R: Rng + ?Sized>(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    rate: f64,
    rng: &mut R,
) -> NetResult<f64> {
    train_loop(network, inputs, targets, rng, &TrainConfig::new(DEFAULT_EPOCHS, rate))
}

/// The configurable training loop behind `train_network`.
///
/// All of an epoch's gradients are computed against pre-update weights:
/// each hidden layer reads the *next* layer's weight matrix and sigmas
/// before any `update_weights` call is issued, and updates only run once
/// the whole backward pass has finished.
///
/// # Early termination
/// The loop ends before the full budget if:
/// - `config.error_tolerance` is set and a sampled example's error drops
///   below it, **or**
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop<R: Rng + ?Sized>(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    rng: &mut R,
    config: &TrainConfig,
) -> NetResult<f64> {
    check_dataset(inputs, targets)?;

    let mut last_error = 0.0;

    for epoch in 1..=config.epochs {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                break;
            }
        }

        let sample_index = rng.gen_range(0..inputs.len());
        let input = &inputs[sample_index];
        let target = &targets[sample_index];

        network.classify(input)?;

        let error = output_error(network.last_output(), target);
        last_error = error;

        if let Some(ref tx) = config.progress_tx {
            let report = config.report_every > 0
                && (epoch % config.report_every == 0 || epoch == config.epochs);
            if report {
                let stats = EpochStats {
                    epoch,
                    total_epochs: config.epochs,
                    sample_index,
                    train_error: error,
                };
                // A dropped receiver means nobody is listening anymore.
                if tx.send(stats).is_err() {
                    break;
                }
            }
        }

        if let Some(tolerance) = config.error_tolerance {
            if error < tolerance {
                break;
            }
        }

        backward_pass(network, target, config.learning_rate)?;
    }

    Ok(last_error)
}

/// Classifies every example and compares the predicted class against the
/// target's one-hot index (the first component equal to 1.0). Returns
/// accuracy as `correct / total` in [0, 1].
pub fn test_network(
    network: &mut Network,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
) -> NetResult<f64> {
    check_dataset(inputs, targets)?;

    let mut correct = 0usize;

    for (input, target) in inputs.iter().zip(targets.iter()) {
        let predicted = network.classify(input)?;
        if predicted == one_hot_index(target) {
            correct += 1;
        }
    }

    Ok(correct as f64 / inputs.len() as f64)
}

fn check_dataset(inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> NetResult<()> {
    if inputs.len() != targets.len() {
        return Err(NetError::DimensionMismatch {
            expected: inputs.len(),
            actual: targets.len(),
        });
    }

    if inputs.is_empty() {
        return Err(NetError::EmptyDataset);
    }

    Ok(())
}

/// One full backward pass plus weight update, in the documented order:
/// output-layer gradients first, then each hidden layer against its
/// successor's pre-update weights, then all updates.
fn backward_pass(network: &mut Network, target: &[f64], rate: f64) -> NetResult<()> {
    let predicted = network.last_output().to_vec();
    let layers = network.layers_mut();
    let last = layers.len() - 1;

    layers[last].backward_output(&predicted, target, rate)?;

    for i in (0..last).rev() {
        let next_weights = layers[i + 1].weights_matrix();
        let next_sigmas = layers[i + 1].last_sigmas().to_vec();
        layers[i].backward_hidden(&next_weights, &next_sigmas, rate)?;
    }

    for layer in layers.iter_mut() {
        layer.update_weights()?;
    }

    Ok(())
}

/// Index of the first component equal to 1.0; 0 for a target without one.
fn one_hot_index(target: &[f64]) -> usize {
    target.iter().position(|&t| t == 1.0).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn xor_dataset() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let inputs = vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ];
        let targets = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
        ];
        (inputs, targets)
    }

    #[test]
    fn mismatched_dataset_lengths_fail() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut network = Network::random(&[2, 2, 2], &mut rng).unwrap();

        let err = train_network(
            &mut network,
            &[vec![0.0, 0.0]],
            &[],
            0.3,
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, NetError::DimensionMismatch { .. }));
    }

    #[test]
    fn empty_dataset_fails() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut network = Network::random(&[2, 2, 2], &mut rng).unwrap();

        assert!(matches!(
            train_network(&mut network, &[], &[], 0.3, &mut rng),
            Err(NetError::EmptyDataset)
        ));
        assert!(matches!(
            test_network(&mut network, &[], &[]),
            Err(NetError::EmptyDataset)
        ));
    }

    #[test]
    fn accuracy_is_a_fraction_of_correct_answers() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut network = Network::random(&[2, 3, 2], &mut rng).unwrap();
        let (inputs, targets) = xor_dataset();

        let accuracy = test_network(&mut network, &inputs, &targets).unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
        // 4 examples, so accuracy must be a multiple of 0.25.
        assert!((accuracy * 4.0).fract().abs() < 1e-12);
    }

    #[test]
    fn training_reduces_error_on_a_separable_problem() {
        // Two clusters split by x0: class 0 low, class 1 high.
        let inputs = vec![
            vec![0.0, 0.1],
            vec![0.1, 0.0],
            vec![0.2, 0.2],
            vec![0.8, 0.9],
            vec![0.9, 0.8],
            vec![1.0, 1.0],
        ];
        let targets = vec![
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
            vec![0.0, 1.0],
        ];

        let mut rng = StdRng::seed_from_u64(11);
        let mut network = Network::random(&[2, 3, 2], &mut rng).unwrap();

        let config = TrainConfig::new(50_000, 0.5);
        train_loop(&mut network, &inputs, &targets, &mut rng, &config).unwrap();

        let accuracy = test_network(&mut network, &inputs, &targets).unwrap();
        assert_eq!(accuracy, 1.0);
    }

    #[test]
    fn error_tolerance_stops_early() {
        let (inputs, targets) = xor_dataset();
        let mut rng = StdRng::seed_from_u64(2);
        let mut network = Network::random(&[2, 2, 2], &mut rng).unwrap();

        let mut config = TrainConfig::new(1_000_000, 0.3);
        // Any sigmoid output vector is within sqrt(2) of a one-hot target.
        config.error_tolerance = Some(2.0);

        let error = train_loop(&mut network, &inputs, &targets, &mut rng, &config).unwrap();
        assert!(error < 2.0);
    }

    #[test]
    fn stop_flag_halts_training() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let (inputs, targets) = xor_dataset();
        let mut rng = StdRng::seed_from_u64(3);
        let mut network = Network::random(&[2, 2, 2], &mut rng).unwrap();
        let before = network.weights_of(0).unwrap();

        let flag = Arc::new(AtomicBool::new(true));
        let mut config = TrainConfig::new(1_000_000, 0.3);
        config.stop_flag = Some(Arc::clone(&flag));
        flag.store(true, Ordering::Relaxed);

        train_loop(&mut network, &inputs, &targets, &mut rng, &config).unwrap();
        // The flag was set before the first epoch, so nothing moved.
        assert_eq!(network.weights_of(0).unwrap(), before);
    }

    #[test]
    fn progress_channel_receives_stats() {
        use std::sync::mpsc;

        let (inputs, targets) = xor_dataset();
        let mut rng = StdRng::seed_from_u64(4);
        let mut network = Network::random(&[2, 2, 2], &mut rng).unwrap();

        let (tx, rx) = mpsc::channel();
        let mut config = TrainConfig::new(100, 0.3);
        config.report_every = 10;
        config.progress_tx = Some(tx);

        train_loop(&mut network, &inputs, &targets, &mut rng, &config).unwrap();

        let stats: Vec<EpochStats> = rx.try_iter().collect();
        assert_eq!(stats.len(), 10);
        assert_eq!(stats[0].epoch, 10);
        assert_eq!(stats.last().unwrap().epoch, 100);
        for s in &stats {
            assert_eq!(s.total_epochs, 100);
            assert!(s.sample_index < inputs.len());
            assert!(s.train_error >= 0.0);
        }
    }
}
