use super::WEIGHT_LIMIT;
use evolarium_data::Controller;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Per-gene Gaussian mutation.
///
/// A rate of zero (or a degenerate sigma) leaves the controller untouched and
/// draws nothing from `rng`.
pub fn mutate<R: Rng>(controller: &mut Controller, rate: f64, sigma: f64, rng: &mut R) -> usize {
    let rate = if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        0.0
    };
    if rate == 0.0 || sigma == 0.0 {
        return 0;
    }
    let Ok(noise) = Normal::new(0.0f32, sigma as f32) else {
        return 0;
    };

    let mut changed = 0;
    for layer in &mut controller.layers {
        for gene in layer.weights.iter_mut().chain(layer.biases.iter_mut()) {
            if rng.gen_bool(rate) {
                *gene = (*gene + noise.sample(rng)).clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
                changed += 1;
            }
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ControllerConfig;
    use crate::controller::ControllerLogic;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_zero_rate_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let original = Controller::new_random_with_rng(&ControllerConfig::default(), &mut rng);
        let mut copy = original.clone();
        assert_eq!(mutate(&mut copy, 0.0, 0.1, &mut rng), 0);
        assert_eq!(copy, original);
    }

    #[test]
    fn test_full_rate_touches_every_gene() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut controller = Controller::new_random_with_rng(&ControllerConfig::default(), &mut rng);
        let genes = controller.gene_count();
        assert_eq!(mutate(&mut controller, 1.0, 0.1, &mut rng), genes);
    }

    #[test]
    fn test_mutation_respects_weight_limit() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut controller = Controller::new_random_with_rng(&ControllerConfig::default(), &mut rng);
        for _ in 0..20 {
            mutate(&mut controller, 1.0, 10.0, &mut rng);
        }
        assert!(controller
            .genes()
            .all(|g| (-WEIGHT_LIMIT..=WEIGHT_LIMIT).contains(&g)));
    }

    #[test]
    fn test_negative_sigma_is_noop() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let original = Controller::new_random_with_rng(&ControllerConfig::default(), &mut rng);
        let mut copy = original.clone();
        assert_eq!(mutate(&mut copy, 0.5, -1.0, &mut rng), 0);
        assert_eq!(copy, original);
    }
}
