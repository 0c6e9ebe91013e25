use rand::rngs::StdRng;
use rand::SeedableRng;

use axon_nn::{test_network, train_loop, Network, TrainConfig};

fn main() {
    let inputs = vec![
        vec![0.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
        vec![1.0, 1.0],
    ];
    // Class 0 = "inputs agree", class 1 = "inputs differ".
    let targets = vec![
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![0.0, 1.0],
        vec![1.0, 0.0],
    ];

    let mut rng = StdRng::seed_from_u64(1);
    let mut network = Network::random(&[2, 3, 2], &mut rng).expect("valid topology");

    let config = TrainConfig::new(100_000, 0.5);
    let last_error =
        train_loop(&mut network, &inputs, &targets, &mut rng, &config).expect("training failed");
    println!("last training error: {last_error:.6}");

    for input in &inputs {
        let class = network.classify(input).expect("classification failed");
        println!(
            "{:?} -> class {} (outputs {:?})",
            input,
            class,
            network
                .last_output()
                .iter()
                .map(|v| (v * 1000.0).round() / 1000.0)
                .collect::<Vec<_>>()
        );
    }

    let accuracy = test_network(&mut network, &inputs, &targets).expect("evaluation failed");
    println!("accuracy: {accuracy:.2}");
}
