use std::fs;
use std::path::Path;

use rand::Rng;

use crate::error::{NetError, NetResult};
use crate::layers::{Layer, LayerRole};
use crate::math::functions::argmax;

/// An ordered stack of sigmoid layers forming a feed-forward classifier.
///
/// The first width handed to `random` is the input dimension; it is not a
/// layer object, only the weight count of the first real layer. Exactly
/// the last layer carries `LayerRole::Output` at all times; `push_layer`
/// re-assigns roles so the invariant survives appends.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    last_output: Vec<f64>,
}

impl Network {
    /// Builds a fresh network from `[d0, d1, ..., dk]`, where `d0` is the
    /// input dimension and each following entry a layer width. Weights
    /// and biases are drawn uniformly from [-0.5, 0.5) using `rng`.
    pub fn random<R: Rng + ?Sized>(widths: &[usize], rng: &mut R) -> NetResult<Network> {
        if widths.len() < 2 {
            return Err(NetError::InvalidTopology(
                "a network needs an input dimension and at least one layer".into(),
            ));
        }

        let mut layers = Vec::with_capacity(widths.len() - 1);
        for pair in widths.windows(2) {
            layers.push(Layer::random(pair[1], pair[0], rng)?);
        }

        Network::from_layers(layers)
    }

    /// Wraps pre-built layers, e.g. parsed from a model file. Adjacent
    /// layers must chain: each layer's input size equals the previous
    /// layer's width. Roles are (re-)assigned here.
    pub fn from_layers(layers: Vec<Layer>) -> NetResult<Network> {
        if layers.is_empty() {
            return Err(NetError::InvalidTopology(
                "a network needs at least one layer".into(),
            ));
        }

        for pair in layers.windows(2) {
            if pair[1].input_size() != pair[0].width() {
                return Err(NetError::DimensionMismatch {
                    expected: pair[0].width(),
                    actual: pair[1].input_size(),
                });
            }
        }

        let mut network = Network {
            layers,
            last_output: Vec::new(),
        };
        network.assign_roles();

        Ok(network)
    }

    /// Appends a layer, demoting the current output layer to hidden.
    pub fn push_layer(&mut self, layer: Layer) -> NetResult<()> {
        if let Some(last) = self.layers.last() {
            if layer.input_size() != last.width() {
                return Err(NetError::DimensionMismatch {
                    expected: last.width(),
                    actual: layer.input_size(),
                });
            }
        }

        self.layers.push(layer);
        self.assign_roles();

        Ok(())
    }

    /// Appends a randomly initialized layer of `width` neurons wired to
    /// the current output layer.
    pub fn push_random_layer<R: Rng + ?Sized>(
        &mut self,
        width: usize,
        rng: &mut R,
    ) -> NetResult<()> {
        let input_size = self.layers.last().map(Layer::width).ok_or_else(|| {
            NetError::InvalidTopology("cannot infer input size for the first layer".into())
        })?;

        let layer = Layer::random(width, input_size, rng)?;
        self.push_layer(layer)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Input dimension of the network (`d0`).
    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    /// Width of the output layer.
    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].width()
    }

    /// Output vector of the most recent classification.
    pub fn last_output(&self) -> &[f64] {
        &self.last_output
    }

    /// Weight matrix of the layer at `index`.
    pub fn weights_of(&self, index: usize) -> NetResult<Vec<Vec<f64>>> {
        match self.layers.get(index) {
            Some(layer) => Ok(layer.weights_matrix()),
            None => Err(NetError::IndexOutOfRange {
                index,
                len: self.layers.len(),
            }),
        }
    }

    /// Runs a forward pass through every layer and returns the index of
    /// the strongest output. Ties go to the first index scanned.
    pub fn classify(&mut self, input: &[f64]) -> NetResult<usize> {
        if input.len() != self.input_size() {
            return Err(NetError::DimensionMismatch {
                expected: self.input_size(),
                actual: input.len(),
            });
        }

        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.forward(&current)?;
        }

        self.last_output = current;
        Ok(argmax(&self.last_output))
    }

    /// Encodes the network in the plain-text model format: a declared
    /// layer count (including the virtual input layer), a widths line,
    /// then one `#`-delimited block of neuron records per layer.
    pub fn to_text(&self) -> String {
        let mut text = String::new();

        text.push_str(&(self.layers.len() + 1).to_string());
        text.push('\n');

        text.push_str(&self.input_size().to_string());
        for layer in &self.layers {
            text.push(' ');
            text.push_str(&layer.width().to_string());
        }

        for layer in &self.layers {
            text.push_str("\n#\n");
            text.push_str(&layer.format_block());
        }

        text
    }

    /// Exact inverse of `to_text`. Validation completes before any
    /// `Network` is constructed, so a malformed document never yields a
    /// partially built network.
    pub fn from_text(text: &str) -> NetResult<Network> {
        let mut lines = text.lines();

        let declared_layers: usize = lines
            .next()
            .ok_or_else(|| NetError::MalformedFile("model file is empty".into()))?
            .trim()
            .parse()
            .map_err(|_| NetError::MalformedFile("layer count is not an integer".into()))?;

        let widths_line = lines.next().ok_or_else(|| {
            NetError::MalformedFile("model file is missing the layer widths line".into())
        })?;

        let mut widths = Vec::new();
        for field in widths_line.split_whitespace() {
            let width: usize = field.parse().map_err(|_| {
                NetError::MalformedFile(format!("layer width '{field}' is not an integer"))
            })?;
            widths.push(width);
        }

        if widths.len() != declared_layers {
            return Err(NetError::MalformedFile(format!(
                "declared {} layers but the widths line lists {}",
                declared_layers,
                widths.len()
            )));
        }

        let mut layers = Vec::new();
        let mut block = String::new();

        for line in lines {
            if line.trim() == "#" {
                flush_block(&mut block, &mut layers)?;
            } else {
                block.push_str(line);
                block.push('\n');
            }
        }
        flush_block(&mut block, &mut layers)?;

        if layers.len() + 1 != declared_layers {
            return Err(NetError::MalformedFile(format!(
                "declared {} layers but parsed {} weight blocks",
                declared_layers,
                layers.len()
            )));
        }

        for (i, layer) in layers.iter().enumerate() {
            if layer.width() != widths[i + 1] {
                return Err(NetError::MalformedFile(format!(
                    "layer {} declares width {} but contains {} neurons",
                    i + 1,
                    widths[i + 1],
                    layer.width()
                )));
            }
            if layer.input_size() != widths[i] {
                return Err(NetError::MalformedFile(format!(
                    "layer {} expects {} inputs but its neurons carry {} weights",
                    i + 1,
                    widths[i],
                    layer.input_size()
                )));
            }
        }

        Network::from_layers(layers)
    }

    /// Writes the text encoding to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> NetResult<()> {
        fs::write(path, self.to_text())?;
        Ok(())
    }

    /// Reads a network back from a file written by `save`.
    pub fn load<P: AsRef<Path>>(path: P) -> NetResult<Network> {
        let text = fs::read_to_string(path)?;
        Network::from_text(&text)
    }

    fn assign_roles(&mut self) {
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter_mut().enumerate() {
            let role = if i == last {
                LayerRole::Output
            } else {
                LayerRole::Hidden
            };
            layer.set_role(role);
        }
    }
}

/// Parses one accumulated `#`-delimited block into a layer. Blank blocks
/// (e.g. before the first delimiter) are skipped.
fn flush_block(block: &mut String, layers: &mut Vec<Layer>) -> NetResult<()> {
    if block.trim().is_empty() {
        block.clear();
        return Ok(());
    }

    layers.push(Layer::parse_block(block)?);
    block.clear();
    Ok(())
}
