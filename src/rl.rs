use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::agent::Agent;
use crate::config::TrainingConfig;
use crate::environment::{Cell, GridWorld};
use crate::error::Result;
use crate::observer::TrainingObserver;
use crate::policy::{EpsilonGreedy, ExplorationStrategy, Greedy, TieBreak};
use crate::q_table::QTable;

/// How an episode ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// The agent reached the goal
    Terminated,
    /// The step cap ran out first
    Truncated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeStats {
    pub episode: usize,
    pub start: Cell,
    pub steps: usize,
    pub reward: f64,
    /// Largest absolute temporal difference seen during the episode
    pub delta: f64,
    pub outcome: EpisodeOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSummary {
    pub episodes: usize,
    pub terminated: usize,
    pub truncated: usize,
    pub total_steps: usize,
}

impl TrainingSummary {
    fn record(&mut self, stats: &EpisodeStats) {
        self.episodes += 1;
        self.total_steps += stats.steps;
        match stats.outcome {
            EpisodeOutcome::Terminated => self.terminated += 1,
            EpisodeOutcome::Truncated => self.truncated += 1,
        }
    }

    pub fn mean_steps(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.episodes as f64
        }
    }
}

/// Owns everything a run needs: configuration, seeded generator, grid and
/// the value table, which persists across episodes.
pub struct Trainer {
    config: TrainingConfig,
    rng: StdRng,
    grid: GridWorld,
    q_table: QTable,
    policy: EpsilonGreedy,
    episodes_run: usize,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let grid = match config.goal {
            Some(goal) => GridWorld::new(
                config.grid_size,
                Cell(goal),
                config.goal_reward,
                config.step_reward,
            )?,
            None => GridWorld::with_random_goal(
                config.grid_size,
                config.goal_reward,
                config.step_reward,
                &mut rng,
            )?,
        };
        let q_table = QTable::new(&grid);
        let policy = EpsilonGreedy::new(config.epsilon, config.tie_break);
        info!(
            size = grid.size(),
            goal = grid.goal().index(),
            "Grid setup"
        );

        Ok(Self {
            config,
            rng,
            grid,
            q_table,
            policy,
            episodes_run: 0,
        })
    }

    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn episodes_run(&self) -> usize {
        self.episodes_run
    }

    /// Runs `episodes` episodes back to back.
    pub fn train(
        &mut self,
        episodes: usize,
        observer: &mut dyn TrainingObserver,
    ) -> TrainingSummary {
        info!(
            episodes,
            alpha = self.config.alpha,
            gamma = self.config.gamma,
            epsilon = self.config.epsilon,
            "Training started"
        );
        let mut summary = TrainingSummary::default();
        for _ in 0..episodes {
            let stats = self.run_episode(observer);
            summary.record(&stats);
        }
        info!(
            episodes = summary.episodes,
            truncated = summary.truncated,
            mean_steps = summary.mean_steps(),
            "Training finished"
        );
        summary
    }

    /// One episode from a random non-goal cell.
    pub fn run_episode(&mut self, observer: &mut dyn TrainingObserver) -> EpisodeStats {
        let start = self.grid.random_non_goal_cell(&mut self.rng);
        self.run_episode_from(start, observer)
    }

    /// One episode from `start`.
    pub fn run_episode_from(
        &mut self,
        start: Cell,
        observer: &mut dyn TrainingObserver,
    ) -> EpisodeStats {
        let episode = self.episodes_run;
        self.episodes_run += 1;

        let mut agent = Agent::at(start);
        observer.on_episode_start(episode, &self.grid, agent.cell);

        // Run a full episode, ie until the agent reaches the goal
        let mut outcome = EpisodeOutcome::Terminated;
        let mut delta: f64 = 0.0;
        while !agent.at_goal(&self.grid) {
            if self.config.max_steps.is_some_and(|cap| agent.steps >= cap) {
                outcome = EpisodeOutcome::Truncated;
                break;
            }
            let s = agent.cell;
            let a = self.policy.choose_action(s, &self.q_table, &mut self.rng);
            let r = agent.r#move(&self.grid, a);
            let s_p = agent.cell;
            let t_d = self
                .q_table
                .update(s, a, s_p, r, self.config.alpha, self.config.gamma);
            delta = delta.max(t_d.abs());
            observer.on_step(&self.grid, s_p);
        }

        let stats = EpisodeStats {
            episode,
            start,
            steps: agent.steps,
            reward: agent.reward,
            delta,
            outcome,
        };
        match outcome {
            EpisodeOutcome::Terminated => debug!(
                episode,
                start = start.index(),
                steps = stats.steps,
                delta = stats.delta,
                "Episode finished"
            ),
            EpisodeOutcome::Truncated => warn!(
                episode,
                start = start.index(),
                steps = stats.steps,
                "Episode truncated before reaching the goal"
            ),
        }
        observer.on_episode_end(&stats);
        stats
    }

    /// Follows the learned policy from `start` without exploring or
    /// learning. Stops at the goal or after `N*N` moves, whichever is first.
    ///
    /// `None` while nothing has been learned yet.
    pub fn greedy_path(&mut self, start: Cell) -> Option<Vec<Cell>> {
        if self.q_table.is_zero() {
            return None;
        }
        let policy = Greedy::new(TieBreak::First);
        let mut agent = Agent::at(start);
        let mut path = vec![start];
        while !agent.at_goal(&self.grid) && agent.steps < self.grid.cell_count() {
            let a = policy.choose_action(agent.cell, &self.q_table, &mut self.rng);
            agent.r#move(&self.grid, a);
            path.push(agent.cell);
        }
        Some(path)
    }
}
