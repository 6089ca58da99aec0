use super::decision::Decision;
use super::novelty_cell;
use crate::config::AppConfig;
use crate::fitness;
use crate::world::{StructureHitOutcome, World};
use evolarium_data::{normalize_angle, Agent, DoorKind, KeyKind, ObstacleKind, SimEvent, Vec2};
use rand::Rng;

/// Read-only inputs shared by every agent acting in the same tick.
pub struct ActContext<'a> {
    pub config: &'a AppConfig,
    pub tick: u64,
    pub generation: u32,
    pub tick_budget: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActOutcome {
    pub events: Vec<SimEvent>,
    /// Set when this agent opened the chest.
    pub run_ended: bool,
}

fn kill(agent: &mut Agent, tick: u64, out: &mut ActOutcome) {
    agent.alive = false;
    agent.energy = agent.energy.max(0.0);
    agent.death_tick = Some(tick);
    out.events.push(SimEvent::AgentDied {
        tick,
        agent: agent.id,
        age: agent.stats.age,
    });
}

fn refresh_fitness(agent: &mut Agent, ctx: &ActContext) {
    agent.fitness = fitness::score(&agent.stats, &ctx.config.fitness, ctx.tick_budget);
}

fn strike_ready(agent: &Agent, ctx: &ActContext) -> bool {
    agent
        .last_strike_tick
        .map_or(true, |last| ctx.tick.saturating_sub(last) >= ctx.config.agent.strike_cooldown)
}

/// Resolves the turn signal into a heading change.
///
/// Only the stronger of the two turn outputs counts. A turn that continues
/// a full window of same-direction turns is damped hard; any other sharp
/// turn is damped lightly and jittered.
fn resolve_turn<R: Rng>(agent: &mut Agent, decision: &Decision, config: &AppConfig, rng: &mut R) {
    let a = &config.agent;
    let signal = if decision.turn_right >= decision.turn_left {
        f64::from(decision.turn_right)
    } else {
        -f64::from(decision.turn_left)
    };
    let mut turn = signal * a.turn_rate;

    let turns = &agent.windows.turns;
    let circling = turn != 0.0
        && turns.is_full()
        && turns
            .iter()
            .all(|t| *t != 0.0 && t.signum() == turn.signum());
    if circling {
        turn *= a.circling_damping;
    } else if turn.abs() > a.sharp_turn {
        let noise = a.turn_noise.abs();
        turn = turn * a.sharp_turn_damping + rng.gen_range(-noise..=noise);
    }

    agent.heading = normalize_angle(agent.heading + turn);
    agent.windows.turns.push(turn);
}

fn update_movement_quality(agent: &mut Agent, turn_rate: f64) {
    let w = &agent.windows;
    let positions: Vec<Vec2> = w.positions.iter().copied().collect();
    let path: f64 = positions.windows(2).map(|p| p[0].distance(p[1])).sum();
    let straightness = match (positions.first(), positions.last()) {
        (Some(first), Some(last)) if path > 0.0 => (first.distance(*last) / path).clamp(0.0, 1.0),
        _ => 0.0,
    };

    let turn_smoothness = if w.turns.is_empty() || turn_rate <= 0.0 {
        0.0
    } else {
        let mean = w.turns.iter().map(|t| t.abs()).sum::<f64>() / w.turns.len() as f64;
        (1.0 - mean / turn_rate).clamp(0.0, 1.0)
    };

    let novelty = if w.cells.is_empty() {
        0.0
    } else {
        let mut cells: Vec<u32> = w.cells.iter().copied().collect();
        cells.sort_unstable();
        cells.dedup();
        cells.len() as f64 / w.cells.len() as f64
    };

    agent.stats.movement.straightness = straightness;
    agent.stats.movement.turn_smoothness = turn_smoothness;
    agent.stats.movement.novelty = novelty;
}

fn try_move(agent: &mut Agent, forward: f64, world: &World, config: &AppConfig) {
    let step = agent.speed * forward;
    let candidate = {
        let dir = Vec2::from_angle(agent.heading);
        agent.position.offset(dir.x * step, dir.y * step)
    };
    if world.collides_blocking(candidate, agent.radius) {
        agent.stats.obstacle_encounters += 1;
        return;
    }

    agent.stats.distance_traveled += agent.position.distance(candidate);
    agent.stats.total_moves += 1;
    agent.position = candidate;

    let a = &config.agent;
    agent.windows.positions.push(candidate);
    agent.windows.headings.push(agent.heading);
    agent
        .windows
        .cells
        .push(novelty_cell(candidate, a.novelty_cell_size, world.width));
    update_movement_quality(agent, a.turn_rate);

    if world
        .nearest_blocking_distance(candidate, a.avoidance_radius)
        .is_some()
    {
        agent.stats.obstacles_avoided += 1;
    }
    agent.energy -= a.move_cost * forward;
}

fn apply_zone(agent: &mut Agent, world: &World) {
    match world.zone_effect(agent.position, agent.radius) {
        Some(effect) => {
            agent.energy -= effect.energy_loss;
            agent.stats.environment_penalty += effect.energy_loss;
            agent.speed = (agent.base_speed * effect.speed_factor).max(effect.min_speed);
        }
        None => agent.speed = agent.base_speed,
    }
}

fn interact_with_structures<R: Rng>(
    agent: &mut Agent,
    world: &mut World,
    ctx: &ActContext,
    rng: &mut R,
    out: &mut ActOutcome,
) {
    if !world.tool_held() || !strike_ready(agent, ctx) {
        return;
    }
    let rules = &ctx.config.structures;
    match world.try_strike_structure(agent.position, ctx.tick, rng) {
        StructureHitOutcome::None => {}
        StructureHitOutcome::Damaged { obstacle, kind, .. } => {
            agent.last_strike_tick = Some(ctx.tick);
            out.events.push(SimEvent::StructureDamaged {
                tick: ctx.tick,
                agent: agent.id,
                obstacle,
                kind,
            });
        }
        StructureHitOutcome::Destroyed { obstacle, kind, .. } => {
            agent.last_strike_tick = Some(ctx.tick);
            agent.stats.structures_destroyed += 1;
            agent.stats.add_reward(if kind == ObstacleKind::Tree {
                rules.tree_reward
            } else {
                rules.hut_reward
            });
            out.events.push(SimEvent::StructureDestroyed {
                tick: ctx.tick,
                agent: agent.id,
                obstacle,
                kind,
            });
        }
    }
}

fn interact_with_puzzle(agent: &mut Agent, world: &mut World, ctx: &ActContext, out: &mut ActOutcome) {
    let p = &ctx.config.puzzle;
    let (tick, id) = (ctx.tick, agent.id);

    if let Some(key) = world.try_pickup_key(agent.position, ctx.generation) {
        agent.stats.keys_collected += 1;
        agent.stats.add_reward(match key {
            KeyKind::Red => p.red_key_reward,
            KeyKind::Gold => p.gold_key_reward,
        });
        out.events.push(SimEvent::KeyCollected {
            tick,
            agent: id,
            key,
        });
    }

    for door in [DoorKind::Wood, DoorKind::Iron] {
        if !strike_ready(agent, ctx) || !world.try_strike_door(agent.position, door, tick) {
            continue;
        }
        agent.last_strike_tick = Some(tick);
        out.events.push(SimEvent::DoorStruck {
            tick,
            agent: id,
            door,
        });
        if world.door_open(door) {
            agent.stats.doors_opened += 1;
            agent.stats.add_reward(match door {
                DoorKind::Wood => p.wood_door_reward,
                DoorKind::Iron => p.iron_door_reward,
            });
            out.events.push(SimEvent::DoorOpened {
                tick,
                agent: id,
                door,
            });
        }
    }

    if world.try_open_chest(agent.position) {
        agent.stats.chest_opened = true;
        agent.stats.add_reward(p.chest_reward);
        out.events.push(SimEvent::ChestOpened {
            generation: ctx.generation,
            tick,
            agent: id,
        });
        out.run_ended = true;
    }
}

/// Applies one tick of `decision` to `agent`, mutating the world through
/// its interaction methods.
pub fn act<R: Rng>(
    agent: &mut Agent,
    decision: &Decision,
    world: &mut World,
    ctx: &ActContext,
    rng: &mut R,
) -> ActOutcome {
    let mut out = ActOutcome::default();
    if !agent.alive {
        return out;
    }
    if agent.energy <= 0.0 {
        kill(agent, ctx.tick, &mut out);
        return out;
    }

    let a = &ctx.config.agent;
    agent.stats.age += 1;
    agent.energy -= a.living_cost;

    resolve_turn(agent, decision, ctx.config, rng);

    if decision.forward > a.forward_threshold {
        let moves_before = agent.stats.total_moves;
        try_move(agent, f64::from(decision.forward), world, ctx.config);
        if agent.stats.total_moves != moves_before && agent.stats.total_moves % 50 == 0 {
            refresh_fitness(agent, ctx);
        }
    }

    apply_zone(agent, world);

    if decision.eat > a.eat_threshold {
        agent.stats.food_attempts += 1;
        if world.try_eat(agent.position) {
            agent.energy = (agent.energy + a.food_energy).min(agent.max_energy);
            agent.stats.food_eaten += 1;
            agent.stats.food_found += 1;
            out.events.push(SimEvent::FoodEaten {
                tick: ctx.tick,
                agent: agent.id,
            });
            refresh_fitness(agent, ctx);
        }
    }

    if world.try_consume_potion(agent.position) {
        agent.energy = agent.max_energy;
        out.events.push(SimEvent::PotionConsumed {
            tick: ctx.tick,
            agent: agent.id,
        });
    }

    if world.try_pickup_tool(agent.position) {
        out.events.push(SimEvent::ToolPickedUp {
            tick: ctx.tick,
            agent: agent.id,
        });
    }

    let rewards_before = agent.stats.puzzle_rewards;
    interact_with_structures(agent, world, ctx, rng, &mut out);
    interact_with_puzzle(agent, world, ctx, &mut out);
    if agent.stats.puzzle_rewards > rewards_before {
        refresh_fitness(agent, ctx);
    }

    if agent.energy <= 0.0 {
        kill(agent, ctx.tick, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::create_agent_with_rng;
    use crate::controller::ControllerLogic;
    use evolarium_data::{AgentOrigin, Controller, Rect};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(position: Vec2) -> (AppConfig, Agent, ChaCha8Rng) {
        let config = AppConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let controller = Controller::new_random_with_rng(&config.controller, &mut rng);
        let mut agent =
            create_agent_with_rng(&config, controller, AgentOrigin::Random, position, &mut rng);
        agent.heading = 0.0;
        (config, agent, rng)
    }

    fn ctx(config: &AppConfig, tick: u64) -> ActContext<'_> {
        ActContext {
            config,
            tick,
            generation: 1,
            tick_budget: 1500,
        }
    }

    const FORWARD: Decision = Decision {
        forward: 1.0,
        turn_left: 0.0,
        turn_right: 0.0,
        eat: 0.0,
    };

    #[test]
    fn test_dead_agent_is_noop() {
        let (config, mut agent, mut rng) = setup(Vec2::new(300.0, 300.0));
        let mut world = World::empty(&config);
        agent.alive = false;
        let before = agent.clone();
        let out = act(&mut agent, &FORWARD, &mut world, &ctx(&config, 0), &mut rng);
        assert_eq!(agent, before);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_exhausted_agent_dies_without_moving() {
        let (config, mut agent, mut rng) = setup(Vec2::new(300.0, 300.0));
        let mut world = World::empty(&config);
        agent.energy = 0.0;
        let out = act(&mut agent, &FORWARD, &mut world, &ctx(&config, 5), &mut rng);
        assert!(!agent.alive);
        assert_eq!(agent.position, Vec2::new(300.0, 300.0));
        assert_eq!(agent.death_tick, Some(5));
        assert!(matches!(out.events[0], SimEvent::AgentDied { .. }));
    }

    #[test]
    fn test_forward_move_costs_energy() {
        let (config, mut agent, mut rng) = setup(Vec2::new(300.0, 300.0));
        let mut world = World::empty(&config);
        act(&mut agent, &FORWARD, &mut world, &ctx(&config, 0), &mut rng);
        assert!((agent.position.x - 303.0).abs() < 1e-9);
        assert_eq!(agent.stats.age, 1);
        assert_eq!(agent.stats.total_moves, 1);
        let expected = 100.0 - config.agent.living_cost - config.agent.move_cost;
        assert!((agent.energy - expected).abs() < 1e-9);
    }

    #[test]
    fn test_blocked_move_counts_encounter() {
        let (config, mut agent, mut rng) = setup(Vec2::new(300.0, 300.0));
        let mut world = World::empty(&config);
        world.place_obstacle(ObstacleKind::Wall, Rect::new(310.0, 280.0, 20.0, 40.0));
        act(&mut agent, &FORWARD, &mut world, &ctx(&config, 0), &mut rng);
        assert_eq!(agent.position, Vec2::new(300.0, 300.0));
        assert_eq!(agent.stats.obstacle_encounters, 1);
        assert_eq!(agent.stats.distance_traveled, 0.0);
    }

    #[test]
    fn test_circling_is_damped() {
        let (config, mut agent, mut rng) = setup(Vec2::new(300.0, 300.0));
        let mut world = World::empty(&config);
        let spin = Decision {
            forward: 0.0,
            turn_left: 0.0,
            turn_right: 1.0,
            eat: 0.0,
        };
        for tick in 0..config.agent.turn_window as u64 {
            act(&mut agent, &spin, &mut world, &ctx(&config, tick), &mut rng);
        }
        let before = agent.heading;
        act(&mut agent, &spin, &mut world, &ctx(&config, 100), &mut rng);
        let turned = evolarium_data::angle_delta(before, agent.heading);
        assert!((turned - 0.12 * 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_water_drains_and_slows() {
        let (config, mut agent, mut rng) = setup(Vec2::new(300.0, 300.0));
        let mut world = World::empty(&config);
        world.place_obstacle(ObstacleKind::Water, Rect::new(290.0, 290.0, 20.0, 20.0));
        let idle = Decision::default();
        act(&mut agent, &idle, &mut world, &ctx(&config, 0), &mut rng);
        assert!((agent.stats.environment_penalty - 2.0).abs() < 1e-9);
        assert!((agent.speed - 2.1).abs() < 1e-9);
    }

    #[test]
    fn test_eating_restores_energy() {
        let (config, mut agent, mut rng) = setup(Vec2::new(300.0, 300.0));
        let mut world = World::empty(&config);
        world.place_food(Vec2::new(320.0, 300.0));
        agent.energy = 50.0;
        let eat = Decision {
            eat: 1.0,
            ..Decision::default()
        };
        let out = act(&mut agent, &eat, &mut world, &ctx(&config, 0), &mut rng);
        assert_eq!(agent.stats.food_eaten, 1);
        assert!((agent.energy - (50.0 - 0.05 + 30.0)).abs() < 1e-9);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::FoodEaten { .. })));
        assert!(agent.fitness > 0.0);
    }

    #[test]
    fn test_chest_ends_run() {
        let (config, mut agent, mut rng) = setup(Vec2::new(300.0, 300.0));
        let mut world = World::empty(&config);
        world.install_fortresses(&mut rng);
        let chest = world.chest().unwrap().rect.center();
        agent.position = chest.offset(-20.0, 0.0);
        let out = act(&mut agent, &Decision::default(), &mut world, &ctx(&config, 0), &mut rng);
        assert!(out.run_ended);
        assert!(agent.stats.chest_opened);
        assert_eq!(agent.stats.puzzle_rewards, config.puzzle.chest_reward);
    }
}
