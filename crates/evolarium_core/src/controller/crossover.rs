use super::forward::validate_shape;
use crate::error::{Result, SimError};
use evolarium_data::Controller;
use rand::Rng;

/// Uniform crossover: every gene is taken from either parent with equal
/// probability. Parents must share the exact same topology.
pub fn uniform<R: Rng>(a: &Controller, b: &Controller, rng: &mut R) -> Result<Controller> {
    validate_shape(a).map_err(|e| e.with_context("crossover parent A"))?;
    validate_shape(b).map_err(|e| e.with_context("crossover parent B"))?;
    let (left, right) = (a.shape(), b.shape());
    if left != right {
        return Err(SimError::IncompatibleParents { left, right });
    }

    let mut child = a.clone();
    for (child_layer, other) in child.layers.iter_mut().zip(&b.layers) {
        for (gene, &theirs) in child_layer.weights.iter_mut().zip(&other.weights) {
            if rng.gen_bool(0.5) {
                *gene = theirs;
            }
        }
        for (gene, &theirs) in child_layer.biases.iter_mut().zip(&other.biases) {
            if rng.gen_bool(0.5) {
                *gene = theirs;
            }
        }
    }
    Ok(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;
    use crate::controller::ControllerLogic;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_child_genes_come_from_parents() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = ControllerConfig::default();
        let a = Controller::new_random_with_rng(&config, &mut rng);
        let b = Controller::new_random_with_rng(&config, &mut rng);
        let child = uniform(&a, &b, &mut rng).unwrap();

        let mut from_a = 0;
        let mut from_b = 0;
        for ((c, x), y) in child.genes().zip(a.genes()).zip(b.genes()) {
            assert!(c == x || c == y);
            if c == x {
                from_a += 1;
            }
            if c == y {
                from_b += 1;
            }
        }
        assert!(from_a > 0 && from_b > 0);
    }

    #[test]
    fn test_mismatched_topologies_are_fatal() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let a = Controller::new_random_with_rng(&ControllerConfig::default(), &mut rng);
        let b = Controller::new_random_with_rng(
            &ControllerConfig {
                hidden_layers: vec![8],
                ..ControllerConfig::default()
            },
            &mut rng,
        );
        let err = uniform(&a, &b, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::IncompatibleParents { .. }));
    }

    #[test]
    fn test_self_crossover_is_clone() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let a = Controller::new_random_with_rng(&ControllerConfig::default(), &mut rng);
        assert_eq!(uniform(&a, &a, &mut rng).unwrap(), a);
    }
}
