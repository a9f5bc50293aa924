use crate::environment::{Cell, GridWorld};
use crate::rl::EpisodeStats;

/// Hooks into the training loop. The console renderer is one listener.
pub trait TrainingObserver {
    /// Called once the agent has been placed for a new episode.
    fn on_episode_start(&mut self, _episode: usize, _grid: &GridWorld, _start: Cell) {}

    /// Called after every move.
    fn on_step(&mut self, _grid: &GridWorld, _cell: Cell) {}

    fn on_episode_end(&mut self, _stats: &EpisodeStats) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl TrainingObserver for NullObserver {}
