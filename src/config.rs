use crate::environment::checked_cell_count;
use crate::error::{Error, Result};
use crate::policy::TieBreak;

pub const DEFAULT_GRID_SIZE: usize = 3;
pub const DEFAULT_GOAL_REWARD: f64 = 10.0;
pub const DEFAULT_STEP_REWARD: f64 = 0.0;
pub const DEFAULT_ALPHA: f64 = 0.1;
pub const DEFAULT_GAMMA: f64 = 0.9;
pub const DEFAULT_EPSILON: f64 = 0.1;
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// Every tunable of a training run.
///
/// Defaults reproduce the classic setup: a 3x3 grid, +10 at the goal, nothing
/// elsewhere, `alpha = 0.1`, `gamma = 0.9`, `epsilon = 0.1`.
///
/// ```
/// use gridworld_q::{TieBreak, TrainingConfig};
///
/// let config = TrainingConfig::default()
///     .with_grid_size(5)
///     .with_seed(42)
///     .with_tie_break(TieBreak::First);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Side length `N` of the square grid
    pub grid_size: usize,
    /// Pinned goal cell; drawn uniformly at random when `None`
    pub goal: Option<usize>,
    /// Reward for entering the goal cell
    pub goal_reward: f64,
    /// Reward for entering any other cell
    pub step_reward: f64,
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Exploration probability ε
    pub epsilon: f64,
    /// How ties between equally valued actions are broken
    pub tie_break: TieBreak,
    /// Per-episode step cap; `None` lets an episode run until the goal
    pub max_steps: Option<usize>,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            goal: None,
            goal_reward: DEFAULT_GOAL_REWARD,
            step_reward: DEFAULT_STEP_REWARD,
            alpha: DEFAULT_ALPHA,
            gamma: DEFAULT_GAMMA,
            epsilon: DEFAULT_EPSILON,
            tie_break: TieBreak::default(),
            max_steps: Some(DEFAULT_MAX_STEPS),
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    pub fn with_goal(mut self, goal: usize) -> Self {
        self.goal = Some(goal);
        self
    }

    pub fn with_rewards(mut self, goal_reward: f64, step_reward: f64) -> Self {
        self.goal_reward = goal_reward;
        self.step_reward = step_reward;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every parameter against the domain the learning rule needs.
    pub fn validate(&self) -> Result<()> {
        let cell_count = checked_cell_count(self.grid_size)?;
        if let Some(goal) = self.goal {
            if goal >= cell_count {
                return Err(Error::config(format!(
                    "goal cell {} is outside a {}x{} grid",
                    goal, self.grid_size, self.grid_size
                )));
            }
        }
        if !self.goal_reward.is_finite() || !self.step_reward.is_finite() {
            return Err(Error::config("rewards must be finite"));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::config(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if !(0.0..1.0).contains(&self.gamma) {
            return Err(Error::config(format!(
                "gamma must be in [0, 1), got {}",
                self.gamma
            )));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::config(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if self.max_steps == Some(0) {
            return Err(Error::config("max steps must be positive"));
        }
        Ok(())
    }
}
