//! Controller output plus the behaviour overlay.
//!
//! The raw controller output is only the starting point. Agents that have
//! already proven themselves (running fitness above a tier) get nudged
//! toward food, doors or puzzle objects; weaker agents get periodic heading
//! jitter instead. A little noise and an occasional random heading keep the
//! population from settling into circles.

use super::perception::Perception;
use crate::config::{AppConfig, BehaviorConfig};
use crate::controller::ControllerLogic;
use crate::error::Result;
use crate::world::{PuzzleTarget, World};
use evolarium_data::{angle_delta, normalize_angle, Agent, DoorKind, Vec2};
use rand::Rng;
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Decision {
    pub forward: f32,
    pub turn_left: f32,
    pub turn_right: f32,
    pub eat: f32,
}

impl Decision {
    #[must_use]
    pub fn from_outputs(outputs: [f32; 4]) -> Self {
        Self {
            forward: outputs[0],
            turn_left: outputs[1],
            turn_right: outputs[2],
            eat: outputs[3],
        }
        .clamped()
    }

    #[must_use]
    pub fn clamped(self) -> Self {
        let unit = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            forward: unit(self.forward),
            turn_left: unit(self.turn_left),
            turn_right: unit(self.turn_right),
            eat: unit(self.eat),
        }
    }
}

/// Outcome of steering toward a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Steer {
    Aligned,
    Turning,
}

/// Pushes the turn outputs toward `target`. When already facing it within
/// `align_tolerance`, raises forward to at least `forward_floor` instead.
fn steer_toward(
    agent: &Agent,
    target: Vec2,
    decision: &mut Decision,
    strength: f32,
    forward_floor: f32,
    align_tolerance: f64,
) -> Steer {
    let diff = angle_delta(agent.heading, agent.position.angle_to(target));
    if diff.abs() < align_tolerance {
        decision.forward = decision.forward.max(forward_floor);
        return Steer::Aligned;
    }
    // Positive angles turn clockwise on screen, i.e. right
    let (toward, away) = if diff > 0.0 {
        (&mut decision.turn_right, &mut decision.turn_left)
    } else {
        (&mut decision.turn_left, &mut decision.turn_right)
    };
    *toward = (*toward + strength).min(1.0);
    *away = (*away - strength).max(0.0);
    Steer::Turning
}

fn nearest_closed_door(agent: &Agent, world: &World) -> Option<Vec2> {
    [DoorKind::Wood, DoorKind::Iron]
        .into_iter()
        .filter(|&kind| world.key_collected(kind.required_key()) && !world.door_open(kind))
        .filter_map(|kind| world.door(kind).map(|d| d.rect.center()))
        .min_by(|a, b| {
            a.distance_sq(agent.position)
                .total_cmp(&b.distance_sq(agent.position))
        })
}

fn apply_overlay(
    agent: &Agent,
    perception: &Perception,
    world: &World,
    generation: u32,
    b: &BehaviorConfig,
    decision: &mut Decision,
) {
    if agent.fitness > b.food_tier {
        let scarce = perception.get(Perception::FOOD_RATIO) < b.scarce_food_ratio
            && perception.get(Perception::TOOL) > 0.5;
        let tree = if scarce {
            world.nearest_cuttable_tree(agent.position)
        } else {
            None
        };
        if let Some((tree, _)) = tree {
            steer_toward(agent, tree, decision, b.steer_strength - 0.1, 0.7, b.align_tolerance);
        } else if let Some((food, _)) = world.nearest_food(agent.position) {
            let steer = steer_toward(agent, food, decision, b.steer_strength, 0.8, b.align_tolerance);
            if steer == Steer::Aligned {
                decision.eat = 0.9;
            }
        }
    }
    if agent.fitness > b.door_tier {
        if let Some(door) = nearest_closed_door(agent, world) {
            steer_toward(agent, door, decision, b.steer_strength, 0.8, b.align_tolerance);
        }
    }
    if agent.fitness > b.puzzle_tier {
        let goal = world
            .active_puzzle_target(generation)
            .filter(|(t, _)| {
                matches!(
                    t,
                    PuzzleTarget::RedKey | PuzzleTarget::GoldKey | PuzzleTarget::Chest
                )
            })
            .map(|(_, p)| p);
        if let Some(goal) = goal {
            steer_toward(
                agent,
                goal,
                decision,
                b.puzzle_steer_strength,
                0.9,
                b.align_tolerance,
            );
        }
    }
}

/// Turns a perception into the four action intensities, each in `[0, 1]`.
///
/// May rotate the agent's heading directly (exploration jitter, random
/// heading) and advances its exploration timer.
pub fn decide<R: Rng>(
    agent: &mut Agent,
    perception: &Perception,
    world: &World,
    generation: u32,
    config: &AppConfig,
    rng: &mut R,
) -> Result<Decision> {
    let b = &config.behavior;
    let outputs = agent
        .controller
        .forward(perception.as_slice())
        .map_err(|e| e.with_context("controller forward pass"))?;
    let mut decision = Decision::from_outputs(outputs);

    if rng.gen_bool(b.nudge_probability.clamp(0.0, 1.0)) {
        apply_overlay(agent, perception, world, generation, b, &mut decision);
    }

    if agent.fitness <= b.food_tier {
        agent.exploration_timer += 1;
        if agent.exploration_timer > b.exploration_interval {
            let jitter = b.exploration_jitter.abs();
            agent.heading = normalize_angle(agent.heading + rng.gen_range(-jitter..=jitter));
            agent.exploration_timer = 0;
        }
    }

    let noise = b.exploration_noise.abs();
    for value in [
        &mut decision.forward,
        &mut decision.turn_left,
        &mut decision.turn_right,
        &mut decision.eat,
    ] {
        *value += rng.gen_range(-noise..=noise);
    }

    if rng.gen_bool(b.random_heading_chance.clamp(0.0, 1.0)) {
        agent.heading = rng.gen_range(0.0..TAU);
        decision.forward += b.random_heading_boost;
    }

    Ok(decision.clamped())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{create_agent_with_rng, perceive};
    use evolarium_data::{AgentOrigin, Controller};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn quiet_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.behavior.exploration_noise = 0.0;
        config.behavior.random_heading_chance = 0.0;
        config.behavior.nudge_probability = 1.0;
        config
    }

    fn agent(config: &AppConfig, rng: &mut ChaCha8Rng) -> Agent {
        let controller = Controller::new_random_with_rng(&config.controller, rng);
        let mut agent = create_agent_with_rng(
            config,
            controller,
            AgentOrigin::Random,
            Vec2::new(600.0, 400.0),
            rng,
        );
        agent.heading = 0.0;
        agent
    }

    #[test]
    fn test_outputs_are_unit_interval() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let world = World::generate(&config, &mut rng);
        let mut a = agent(&config, &mut rng);
        for _ in 0..200 {
            let p = perceive(&a, &world, &[], 1, &config.agent);
            let d = decide(&mut a, &p, &world, 1, &config, &mut rng).unwrap();
            for v in [d.forward, d.turn_left, d.turn_right, d.eat] {
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_fit_agent_steers_toward_food() {
        let config = quiet_config();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut world = World::empty(&config);
        world.place_food(Vec2::new(600.0, 500.0));
        let mut a = agent(&config, &mut rng);
        a.fitness = 40.0;
        // Zero the controller so only the overlay acts
        for layer in &mut a.controller.layers {
            layer.weights.iter_mut().for_each(|w| *w = 0.0);
            layer.biases.iter_mut().for_each(|b| *b = 0.0);
        }
        let p = perceive(&a, &world, &[], 1, &config.agent);
        let d = decide(&mut a, &p, &world, 1, &config, &mut rng).unwrap();
        assert!((d.turn_right - 0.5).abs() < 1e-6);
        assert_eq!(d.turn_left, 0.0);

        a.heading = std::f64::consts::FRAC_PI_2;
        let d = decide(&mut a, &p, &world, 1, &config, &mut rng).unwrap();
        assert!((d.forward - 0.8).abs() < 1e-6);
        assert!((d.eat - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_weak_agent_explores() {
        let config = quiet_config();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let world = World::empty(&config);
        let mut a = agent(&config, &mut rng);
        a.exploration_timer = config.behavior.exploration_interval;
        let p = perceive(&a, &world, &[], 1, &config.agent);
        decide(&mut a, &p, &world, 1, &config, &mut rng).unwrap();
        assert_eq!(a.exploration_timer, 0);
        let moved = angle_delta(0.0, a.heading).abs();
        assert!(moved <= config.behavior.exploration_jitter + 1e-9);
    }

    #[test]
    fn test_bad_controller_is_an_error() {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let world = World::empty(&config);
        let mut a = agent(&config, &mut rng);
        a.controller.layers[0].weights.pop();
        let p = perceive(&a, &world, &[], 1, &config.agent);
        assert!(decide(&mut a, &p, &world, 1, &config, &mut rng).is_err());
    }
}
