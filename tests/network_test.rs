use rand::rngs::StdRng;
use rand::SeedableRng;

use axon_nn::{
    parse_dataset, test_network, train_loop, NetError, Network, TrainConfig,
};

fn linearly_separable_dataset() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    // Two 2-feature classes split cleanly along both coordinates.
    let text = "\
0.05 0.10 0
0.10 0.05 0
0.15 0.20 0
0.20 0.10 0
0.05 0.25 0
0.80 0.85 1
0.90 0.75 1
0.85 0.95 1
0.75 0.80 1
0.95 0.90 1
";
    parse_dataset(text, 2, 2).expect("synthetic dataset parses")
}

#[test]
fn training_converges_on_a_linearly_separable_dataset() {
    let (inputs, targets) = linearly_separable_dataset();

    let mut rng = StdRng::seed_from_u64(17);
    let mut network = Network::random(&[2, 3, 2], &mut rng).unwrap();

    let config = TrainConfig::new(60_000, 0.5);
    train_loop(&mut network, &inputs, &targets, &mut rng, &config).unwrap();

    let accuracy = test_network(&mut network, &inputs, &targets).unwrap();
    assert_eq!(accuracy, 1.0, "expected full accuracy on separable data");
}

#[test]
fn saved_model_classifies_identically_after_reload() {
    let (inputs, targets) = linearly_separable_dataset();

    let mut rng = StdRng::seed_from_u64(23);
    let mut network = Network::random(&[2, 4, 2], &mut rng).unwrap();

    let config = TrainConfig::new(5_000, 0.3);
    train_loop(&mut network, &inputs, &targets, &mut rng, &config).unwrap();

    let dir = std::env::temp_dir().join("axon_nn_roundtrip_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("model.txt");

    network.save(&path).unwrap();
    let mut restored = Network::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    for input in &inputs {
        assert_eq!(
            network.classify(input).unwrap(),
            restored.classify(input).unwrap()
        );
        for (a, b) in network.last_output().iter().zip(restored.last_output()) {
            assert!((a - b).abs() <= 1e-9);
        }
    }

    let accuracy = test_network(&mut restored, &inputs, &targets).unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn tampered_model_file_is_rejected_without_a_network() {
    let mut rng = StdRng::seed_from_u64(29);
    let network = Network::random(&[2, 3, 2], &mut rng).unwrap();

    // Declare 4 neurons in the hidden layer while the block holds 3.
    let text = network.to_text().replacen("2 3 2", "2 4 2", 1);

    match Network::from_text(&text) {
        Err(NetError::MalformedFile(_)) => {}
        other => panic!("expected MalformedFile, got {other:?}"),
    }
}

#[test]
fn training_a_loaded_network_continues_from_saved_weights() {
    let (inputs, targets) = linearly_separable_dataset();

    let mut rng = StdRng::seed_from_u64(31);
    let mut network = Network::random(&[2, 3, 2], &mut rng).unwrap();

    let config = TrainConfig::new(60_000, 0.5);
    train_loop(&mut network, &inputs, &targets, &mut rng, &config).unwrap();

    let mut reloaded = Network::from_text(&network.to_text()).unwrap();

    // A reloaded, already-converged network should still score perfectly
    // after a few more online steps.
    let more = TrainConfig::new(100, 0.5);
    train_loop(&mut reloaded, &inputs, &targets, &mut rng, &more).unwrap();

    let accuracy = test_network(&mut reloaded, &inputs, &targets).unwrap();
    assert_eq!(accuracy, 1.0);
}
