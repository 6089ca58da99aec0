use serde::{Deserialize, Serialize};

/// One dense layer. `weights` is row-major: `outputs` rows of `inputs`
/// columns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Layer {
    pub inputs: usize,
    pub outputs: usize,
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
}

impl Layer {
    /// Zero-initialised layer of the given shape.
    #[must_use]
    pub fn zeroed(inputs: usize, outputs: usize) -> Self {
        Self {
            inputs,
            outputs,
            weights: vec![0.0; inputs * outputs],
            biases: vec![0.0; outputs],
        }
    }

    /// True when the stored vectors agree with the declared shape.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.weights.len() == self.inputs * self.outputs && self.biases.len() == self.outputs
    }

    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}

/// Per-agent feed-forward network, owned by exactly one agent.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Controller {
    pub layers: Vec<Layer>,
}

impl Controller {
    /// Layer widths from input to output, e.g. `[16, 20, 4]`.
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = Vec::with_capacity(self.layers.len() + 1);
        if let Some(first) = self.layers.first() {
            shape.push(first.inputs);
        }
        shape.extend(self.layers.iter().map(|l| l.outputs));
        shape
    }

    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.layers.iter().map(Layer::gene_count).sum()
    }

    /// All weights and biases, layer by layer.
    pub fn genes(&self) -> impl Iterator<Item = f32> + '_ {
        self.layers
            .iter()
            .flat_map(|l| l.weights.iter().chain(l.biases.iter()).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_and_gene_count() {
        let controller = Controller {
            layers: vec![Layer::zeroed(3, 5), Layer::zeroed(5, 2)],
        };
        assert_eq!(controller.shape(), vec![3, 5, 2]);
        assert_eq!(controller.gene_count(), 3 * 5 + 5 + 5 * 2 + 2);
        assert_eq!(controller.genes().count(), controller.gene_count());
    }

    #[test]
    fn test_serde_roundtrip() {
        let controller = Controller {
            layers: vec![Layer::zeroed(2, 2)],
        };
        let json = serde_json::to_string(&controller).unwrap();
        let back: Controller = serde_json::from_str(&json).unwrap();
        assert_eq!(back, controller);
    }
}
