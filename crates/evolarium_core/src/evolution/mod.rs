//! Genetic algorithm: ranking, selection, crossover, adaptive mutation and
//! immigration.
//!
//! The GA reads the finished population and produces a new one. It only
//! borrows the world to find spawn positions.

pub mod selection;

pub use selection::{rank, select_parent, Ranked};

use crate::agent::create_agent_with_rng;
use crate::config::{AppConfig, SelectionMethod};
use crate::controller::ControllerLogic;
use crate::error::{Result, SimError};
use crate::world::World;
use evolarium_data::{Agent, AgentOrigin, Controller};
use rand::Rng;

/// Next population plus what happened while producing it.
#[derive(Debug, Clone)]
pub struct Evolved {
    pub agents: Vec<Agent>,
    pub mutation_rate: f64,
    pub immigrants: usize,
    pub random_restart: bool,
}

/// Coefficient of variation (population std / mean). Zero for a zero mean.
#[must_use]
pub fn coefficient_of_variation(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let n = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / n;
    if mean.abs() < f64::EPSILON {
        return 0.0;
    }
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

#[derive(Debug, Clone)]
pub struct GeneticAlgorithm {
    config: AppConfig,
    mutation_rate: f64,
}

impl GeneticAlgorithm {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
            mutation_rate: config.evolution.mutation_rate,
        }
    }

    /// Rate used for the most recent generation.
    #[must_use]
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Boosts the base rate when scores have converged.
    pub fn adapt_mutation_rate(&mut self, scores: &[f64]) -> f64 {
        let e = &self.config.evolution;
        let a = &e.adaptive;
        self.mutation_rate = if a.enabled && coefficient_of_variation(scores) < a.cv_threshold {
            (e.mutation_rate * a.factor).min(a.ceiling)
        } else {
            e.mutation_rate
        };
        self.mutation_rate
    }

    fn place<R: Rng>(
        &self,
        genomes: Vec<(Controller, AgentOrigin)>,
        world: &World,
        rng: &mut R,
    ) -> Vec<Agent> {
        genomes
            .into_iter()
            .map(|(controller, origin)| {
                let position = world.spawn_position(rng).position;
                create_agent_with_rng(&self.config, controller, origin, position, rng)
            })
            .collect()
    }

    /// A fully random population placed in `world`.
    pub fn random_population<R: Rng>(&self, world: &World, rng: &mut R) -> Vec<Agent> {
        let genomes = (0..self.config.evolution.population_size)
            .map(|_| {
                (
                    Controller::new_random_with_rng(&self.config.controller, rng),
                    AgentOrigin::Random,
                )
            })
            .collect();
        self.place(genomes, world, rng)
    }

    /// Breeds one child. Also returns its lineage rank: the ranking
    /// position of the first parent, whose genes the child starts from.
    fn breed<R: Rng>(
        &self,
        agents: &[Agent],
        ranked: &[Ranked],
        rank_of: &[usize],
        rng: &mut R,
    ) -> Result<(Controller, usize)> {
        let e = &self.config.evolution;
        let (Some(a), Some(b)) = (
            select_parent(ranked, &e.selection, rng),
            select_parent(ranked, &e.selection, rng),
        ) else {
            let random = Controller::new_random_with_rng(&self.config.controller, rng);
            return Ok((random, usize::MAX));
        };
        let lineage = rank_of[a];
        let mut child = if rng.gen_bool(e.crossover_rate.clamp(0.0, 1.0)) {
            agents[a]
                .controller
                .crossover_with_rng(&agents[b].controller, rng)
                .map_err(|err| err.with_context(format!("crossover of agents {a} and {b}")))?
        } else {
            agents[a].controller.clone()
        };
        child.mutate_with_rng(self.mutation_rate, e.mutation_sigma, rng);
        Ok((child, lineage))
    }

    /// Produces the next population from `agents` and their `scores`.
    ///
    /// # Errors
    ///
    /// [`SimError::PopulationMismatch`] when the slices differ in length, or
    /// any controller shape error raised by crossover.
    pub fn evolve<R: Rng>(
        &mut self,
        agents: &[Agent],
        scores: &[f64],
        world: &World,
        generation: u32,
        rng: &mut R,
    ) -> Result<Evolved> {
        if agents.len() != scores.len() {
            return Err(SimError::PopulationMismatch {
                agents: agents.len(),
                scores: scores.len(),
            });
        }

        let total: f64 = scores.iter().filter(|s| s.is_finite()).sum();
        if agents.is_empty() || total <= 0.0 {
            tracing::warn!(
                generation = generation,
                population = agents.len(),
                "Zero total fitness, restarting with a random population"
            );
            return Ok(Evolved {
                agents: self.random_population(world, rng),
                mutation_rate: self.mutation_rate,
                immigrants: 0,
                random_restart: true,
            });
        }

        let rate = self.adapt_mutation_rate(scores);
        let ranked = rank(scores);
        let size = self.config.evolution.population_size;
        let elites = match self.config.evolution.selection {
            SelectionMethod::ElitismTournament { elite_count, .. } => {
                elite_count.min(size).min(ranked.len())
            }
            _ => 0,
        };

        let mut genomes: Vec<(Controller, AgentOrigin)> = Vec::with_capacity(size);
        for r in ranked.iter().take(elites) {
            genomes.push((agents[r.index].controller.clone(), AgentOrigin::Elite));
        }
        let mut rank_of = vec![0; agents.len()];
        for (position, r) in ranked.iter().enumerate() {
            rank_of[r.index] = position;
        }
        let mut offspring = Vec::with_capacity(size - elites);
        for _ in elites..size {
            offspring.push(self.breed(agents, &ranked, &rank_of, rng)?);
        }
        // Best lineage first, so the trailing slots descend from the
        // lowest-ranked parents.
        offspring.sort_by_key(|&(_, lineage)| lineage);
        genomes.extend(
            offspring
                .into_iter()
                .map(|(controller, _)| (controller, AgentOrigin::Offspring)),
        );

        let immigration = &self.config.evolution.immigration;
        let mut immigrants = 0;
        if immigration.interval > 0 && generation % immigration.interval == 0 {
            let start = size.saturating_sub(immigration.count).max(elites);
            for slot in &mut genomes[start..] {
                *slot = (
                    Controller::new_random_with_rng(&self.config.controller, rng),
                    AgentOrigin::Immigrant,
                );
            }
            immigrants = size - start;
            if immigrants > 0 {
                tracing::info!(generation = generation, count = immigrants, "Immigrants injected");
            }
        }

        tracing::debug!(
            generation = generation,
            best = ranked.first().map_or(0.0, |r| r.score),
            mutation_rate = rate,
            elites = elites,
            "Population evolved"
        );

        Ok(Evolved {
            agents: self.place(genomes, world, rng),
            mutation_rate: rate,
            immigrants,
            random_restart: false,
        })
    }
}
