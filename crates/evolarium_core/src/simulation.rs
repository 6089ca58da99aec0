//! Tick-driven simulation driver.
//!
//! A [`Simulation`] owns the world, the population and the run RNG. Each
//! [`Simulation::step`] advances one tick; [`Simulation::run_generation`]
//! steps until the generation ends, then scores, summarizes and evolves.

use crate::agent::{act, decide, perceive, ActContext};
use crate::config::AppConfig;
use crate::error::{Result, SimError};
use crate::evolution::GeneticAlgorithm;
use crate::fitness;
use crate::metrics::Metrics;
use crate::snapshot::WorldSnapshot;
use crate::stats;
use crate::world::World;
use evolarium_data::{Agent, GenerationSummary, SimEvent};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Everyone is dead or the tick budget is spent.
    GenerationOver,
    /// The chest was opened. No further generations run.
    RunEnded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    pub summary: GenerationSummary,
    pub run_ended: bool,
}

pub struct Simulation {
    config: AppConfig,
    rng: ChaCha8Rng,
    world: World,
    agents: Vec<Agent>,
    ga: GeneticAlgorithm,
    generation: u32,
    tick: u64,
    tick_budget: u64,
    events: Vec<SimEvent>,
    metrics: Metrics,
    run_ended: bool,
    history: Vec<GenerationSummary>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("generation", &self.generation)
            .field("tick", &self.tick)
            .field("tick_budget", &self.tick_budget)
            .field("agents", &self.agents.len())
            .field("run_ended", &self.run_ended)
            .finish_non_exhaustive()
    }
}

fn seeded_rng(config: &AppConfig) -> ChaCha8Rng {
    match config.world.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

impl Simulation {
    /// Validates `config`, generates a world and a random first population.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfig`] when validation fails.
    pub fn new(config: AppConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SimError::invalid_config(e.to_string()))?;
        let mut rng = seeded_rng(&config);
        let world = World::generate(&config, &mut rng);
        Ok(Self::assemble(config, world, rng))
    }

    /// Like [`Simulation::new`] but runs in a prepared world.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfig`] when validation fails.
    pub fn with_world(config: AppConfig, world: World) -> Result<Self> {
        config
            .validate()
            .map_err(|e| SimError::invalid_config(e.to_string()))?;
        let rng = seeded_rng(&config);
        Ok(Self::assemble(config, world, rng))
    }

    fn assemble(config: AppConfig, world: World, mut rng: ChaCha8Rng) -> Self {
        let ga = GeneticAlgorithm::new(&config);
        let agents = ga.random_population(&world, &mut rng);
        let tick_budget = config.time.tick_budget(1);

        tracing::info!(
            fingerprint = %config.fingerprint(),
            seed = ?config.world.seed,
            population = agents.len(),
            obstacles = world.obstacles().len(),
            "Simulation created"
        );

        let mut sim = Self {
            config,
            rng,
            world,
            agents,
            ga,
            generation: 1,
            tick: 0,
            tick_budget,
            events: Vec::new(),
            metrics: Metrics::new(),
            run_ended: false,
            history: Vec::new(),
        };
        sim.emit(SimEvent::GenerationStarted {
            generation: 1,
            population: sim.agents.len(),
            tick_budget,
        });
        sim
    }

    fn emit(&mut self, event: SimEvent) {
        self.metrics.record_event(&event);
        self.events.push(event);
    }

    /// Advances the simulation by one tick.
    ///
    /// Agents act in population order and each one perceives the others as
    /// already moved this tick. An opened chest stops the tick at once.
    ///
    /// # Errors
    ///
    /// Controller shape errors from the decision pass, with the agent id as
    /// context.
    pub fn step(&mut self) -> Result<TickOutcome> {
        if self.run_ended {
            return Ok(TickOutcome::RunEnded);
        }
        let started = Instant::now();
        self.world.update_passive_state();

        let ctx = ActContext {
            config: &self.config,
            tick: self.tick,
            generation: self.generation,
            tick_budget: self.tick_budget,
        };
        let mut chest_opened = false;
        let mut emitted = Vec::new();
        for i in 0..self.agents.len() {
            if !self.agents[i].alive {
                continue;
            }
            let perception = perceive(
                &self.agents[i],
                &self.world,
                &self.agents,
                self.generation,
                &self.config.agent,
            );
            let agent = &mut self.agents[i];
            let decision = decide(
                agent,
                &perception,
                &self.world,
                self.generation,
                &self.config,
                &mut self.rng,
            )
            .map_err(|e| e.with_context(format!("agent {}", agent.id)))?;
            let outcome = act(agent, &decision, &mut self.world, &ctx, &mut self.rng);
            emitted.extend(outcome.events);
            if outcome.run_ended {
                chest_opened = true;
                break;
            }
        }
        for event in emitted {
            self.emit(event);
        }

        self.tick += 1;
        let alive = self.alive_count();
        self.metrics
            .record_tick(started.elapsed(), alive, self.world.remaining_food());

        if chest_opened {
            self.run_ended = true;
            tracing::info!(
                generation = self.generation,
                tick = self.tick,
                "Chest opened, run complete"
            );
            return Ok(TickOutcome::RunEnded);
        }
        if alive == 0 || self.tick >= self.tick_budget {
            return Ok(TickOutcome::GenerationOver);
        }
        Ok(TickOutcome::Continue)
    }

    /// Runs the current generation to completion and, unless the run ended,
    /// replaces the population with the next one.
    ///
    /// # Errors
    ///
    /// Propagates tick and evolution errors.
    pub fn run_generation(&mut self) -> Result<GenerationReport> {
        while self.step()? == TickOutcome::Continue {}

        let scores =
            fitness::score_population(&self.agents, &self.config.fitness, self.tick_budget);
        for (agent, score) in self.agents.iter_mut().zip(&scores) {
            agent.fitness = *score;
        }
        let mut summary =
            stats::summarize(self.generation, self.tick, &self.agents, &scores, &self.world);
        summary.mutation_rate = self.ga.mutation_rate();

        self.emit(SimEvent::GenerationEnded {
            generation: self.generation,
            ticks: self.tick,
            alive: summary.alive,
            max_fitness: summary.max_fitness,
        });

        if self.run_ended {
            tracing::info!(
                generation = self.generation,
                max_fitness = summary.max_fitness,
                "Final generation"
            );
            self.history.push(summary.clone());
            return Ok(GenerationReport {
                summary,
                run_ended: true,
            });
        }

        self.world.reset_for_new_generation(&mut self.rng);
        let evolved = self
            .ga
            .evolve(&self.agents, &scores, &self.world, self.generation, &mut self.rng)
            .map_err(|e| e.with_context(format!("evolving generation {}", self.generation)))?;
        summary.mutation_rate = evolved.mutation_rate;
        summary.immigrants = evolved.immigrants;
        summary.random_restart = evolved.random_restart;
        if evolved.random_restart {
            self.emit(SimEvent::RandomRestart {
                generation: self.generation,
            });
        }
        if evolved.immigrants > 0 {
            self.emit(SimEvent::ImmigrantsInjected {
                generation: self.generation,
                count: evolved.immigrants,
            });
        }

        tracing::info!(
            generation = summary.generation,
            ticks = summary.ticks,
            avg_fitness = summary.avg_fitness,
            max_fitness = summary.max_fitness,
            alive = summary.alive,
            diversity = summary.diversity,
            "Generation complete"
        );

        self.agents = evolved.agents;
        self.generation += 1;
        self.tick = 0;
        self.tick_budget = self.config.time.tick_budget(self.generation);
        self.emit(SimEvent::GenerationStarted {
            generation: self.generation,
            population: self.agents.len(),
            tick_budget: self.tick_budget,
        });

        self.history.push(summary.clone());
        Ok(GenerationReport {
            summary,
            run_ended: false,
        })
    }

    /// Runs up to `max_generations` generations, stopping early when the
    /// chest is opened. Returns the summaries produced by this call.
    ///
    /// # Errors
    ///
    /// Propagates the first generation error.
    pub fn run(&mut self, max_generations: u32) -> Result<Vec<GenerationSummary>> {
        let mut summaries = Vec::new();
        for _ in 0..max_generations {
            if self.run_ended {
                break;
            }
            let report = self.run_generation()?;
            summaries.push(report.summary);
            if report.run_ended {
                break;
            }
        }
        Ok(summaries)
    }

    /// Takes all events buffered since the last call.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.world, &self.agents, self.generation, self.tick)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn tick_budget(&self) -> u64 {
        self.tick_budget
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Summaries of every completed generation.
    #[must_use]
    pub fn history(&self) -> &[GenerationSummary] {
        &self.history
    }

    #[must_use]
    pub fn is_run_ended(&self) -> bool {
        self.run_ended
    }
}
