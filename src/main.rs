use std::process;
use std::sync::mpsc;
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;

use axon_nn::{
    load_dataset, test_network, train_loop, EpochStats, NetResult, Network, TopologySpec,
    TrainConfig, DEFAULT_EPOCHS,
};

/// Fixed-topology driver: loads a dataset, trains a fresh network and
/// reports test accuracy on the same examples.
///
/// Usage:
///   axon-nn [DATASET] [OPTIONS]
///
/// Options:
///   --spec PATH    build the network from a TopologySpec JSON file
///   --save PATH    write the trained model to a text file
///   --seed N       seed the weight initializer and example sampler
fn main() {
    if let Err(err) = run() {
        eprintln!("axon-nn: {err}");
        process::exit(1);
    }
}

fn run() -> NetResult<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut dataset_path = String::from("data/iris.txt");
    let mut spec_path: Option<String> = None;
    let mut save_path: Option<String> = None;
    let mut seed: Option<u64> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--spec" => spec_path = iter.next().cloned(),
            "--save" => save_path = iter.next().cloned(),
            "--seed" => seed = iter.next().and_then(|s| s.parse().ok()),
            _ => dataset_path = arg.clone(),
        }
    }

    let spec = match spec_path {
        Some(path) => TopologySpec::load_json(&path)?,
        None => TopologySpec {
            name: "iris".into(),
            widths: vec![4, 2, 3],
            learning_rate: 0.3,
            epochs: DEFAULT_EPOCHS,
            metadata: None,
        },
    };

    let n_features = spec.widths[0];
    let n_classes = spec.widths[spec.widths.len() - 1];

    println!("loading dataset from {dataset_path} ...");
    let (inputs, targets) = load_dataset(&dataset_path, n_features, n_classes)?;
    println!(
        "{} examples, {} features, {} classes",
        inputs.len(),
        n_features,
        n_classes
    );

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut network = Network::random(&spec.widths, &mut rng)?;
    println!(
        "training '{}' {:?} for {} epochs at rate {}",
        spec.name, spec.widths, spec.epochs, spec.learning_rate
    );

    // Progress is printed off-thread so the training loop never touches
    // the console itself.
    let (tx, rx) = mpsc::channel::<EpochStats>();
    let printer = thread::spawn(move || {
        for stats in rx {
            println!(
                "epoch {}/{}: error = {:.6}",
                stats.epoch, stats.total_epochs, stats.train_error
            );
        }
    });

    let mut config = TrainConfig::new(spec.epochs, spec.learning_rate);
    config.progress_tx = Some(tx);

    train_loop(&mut network, &inputs, &targets, &mut rng, &config)?;
    drop(config); // closes the progress channel

    if printer.join().is_err() {
        eprintln!("axon-nn: progress printer thread panicked");
    }

    let accuracy = test_network(&mut network, &inputs, &targets)?;
    println!("accuracy: {accuracy:.4}");

    if let Some(path) = save_path {
        network.save(&path)?;
        println!("model written to {path}");
    }

    Ok(())
}
