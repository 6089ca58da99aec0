use super::{ACTION_COUNT, SENSOR_COUNT};
use crate::error::{Result, SimError};
use evolarium_data::Controller;

pub fn validate_shape(controller: &Controller) -> Result<()> {
    let Some(first) = controller.layers.first() else {
        return Err(SimError::shape_mismatch(0, SENSOR_COUNT, 0));
    };
    if first.inputs != SENSOR_COUNT {
        return Err(SimError::shape_mismatch(0, SENSOR_COUNT, first.inputs));
    }

    let mut width = SENSOR_COUNT;
    for (i, layer) in controller.layers.iter().enumerate() {
        if layer.inputs != width {
            return Err(SimError::shape_mismatch(i, width, layer.inputs));
        }
        if layer.weights.len() != layer.inputs * layer.outputs {
            return Err(SimError::shape_mismatch(
                i,
                layer.inputs * layer.outputs,
                layer.weights.len(),
            ));
        }
        if layer.biases.len() != layer.outputs {
            return Err(SimError::shape_mismatch(i, layer.outputs, layer.biases.len()));
        }
        width = layer.outputs;
    }

    if width != ACTION_COUNT {
        let last = controller.layers.len() - 1;
        return Err(SimError::shape_mismatch(last, ACTION_COUNT, width));
    }
    Ok(())
}

/// Runs the network with tanh activations on every layer.
///
/// Non-finite inputs are read as zero so a single bad sensor cannot poison
/// the whole output.
pub fn forward(controller: &Controller, inputs: &[f32]) -> Result<[f32; ACTION_COUNT]> {
    validate_shape(controller)?;
    if inputs.len() != SENSOR_COUNT {
        return Err(SimError::InputSize {
            expected: SENSOR_COUNT,
            found: inputs.len(),
        });
    }

    let mut current: Vec<f32> = inputs
        .iter()
        .map(|&v| if v.is_finite() { v } else { 0.0 })
        .collect();
    let mut next = Vec::new();

    for layer in &controller.layers {
        next.clear();
        for (row, bias) in layer.weights.chunks_exact(layer.inputs).zip(&layer.biases) {
            let sum: f32 = row.iter().zip(&current).map(|(w, x)| w * x).sum::<f32>() + bias;
            next.push(sum.tanh());
        }
        std::mem::swap(&mut current, &mut next);
    }

    let mut outputs = [0.0; ACTION_COUNT];
    outputs.copy_from_slice(&current);
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evolarium_data::Layer;

    fn identity_like() -> Controller {
        let mut layer = Layer::zeroed(SENSOR_COUNT, ACTION_COUNT);
        for o in 0..ACTION_COUNT {
            layer.weights[o * SENSOR_COUNT + o] = 1.0;
        }
        Controller {
            layers: vec![layer],
        }
    }

    #[test]
    fn test_forward_applies_tanh() {
        let controller = identity_like();
        let mut inputs = [0.0; SENSOR_COUNT];
        inputs[0] = 0.5;
        inputs[3] = -2.0;
        let out = forward(&controller, &inputs).unwrap();
        assert!((out[0] - 0.5f32.tanh()).abs() < 1e-6);
        assert!((out[3] - (-2.0f32).tanh()).abs() < 1e-6);
        assert_eq!(out[1], 0.0);
    }

    #[test]
    fn test_forward_rejects_wrong_input_len() {
        let err = forward(&identity_like(), &[0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            SimError::InputSize {
                expected: SENSOR_COUNT,
                found: 3
            }
        );
    }

    #[test]
    fn test_broken_chain_is_fatal() {
        let controller = Controller {
            layers: vec![
                Layer::zeroed(SENSOR_COUNT, 10),
                Layer::zeroed(9, ACTION_COUNT),
            ],
        };
        assert_eq!(
            validate_shape(&controller).unwrap_err(),
            SimError::shape_mismatch(1, 10, 9)
        );
    }

    #[test]
    fn test_truncated_weights_are_fatal() {
        let mut controller = identity_like();
        controller.layers[0].weights.pop();
        assert!(matches!(
            validate_shape(&controller),
            Err(SimError::ShapeMismatch { layer: 0, .. })
        ));
    }

    #[test]
    fn test_nan_input_is_ignored() {
        let controller = identity_like();
        let mut inputs = [0.0; SENSOR_COUNT];
        inputs[0] = f32::NAN;
        let out = forward(&controller, &inputs).unwrap();
        assert_eq!(out[0], 0.0);
    }
}
