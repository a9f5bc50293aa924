use crate::environment::{Action, Cell, GridWorld};

/// Where the agent stands during one episode, plus what it collected so far.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub cell: Cell,
    pub reward: f64,
    pub steps: usize,
}

impl Agent {
    pub fn at(cell: Cell) -> Self {
        Self {
            cell,
            reward: 0.0,
            steps: 0,
        }
    }

    /// Takes one step; returns the reward of the cell entered.
    pub fn r#move(&mut self, grid: &GridWorld, action: Action) -> f64 {
        let next = grid.step(self.cell, action);
        let reward = grid.reward(next);
        self.reward += reward;
        self.steps += 1;
        self.cell = next;
        reward
    }

    pub fn at_goal(&self, grid: &GridWorld) -> bool {
        grid.is_goal(self.cell)
    }
}
