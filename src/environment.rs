use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::error::{Error, Result};

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Up, Action::Down, Action::Left, Action::Right];
    pub const COUNT: usize = 4;

    pub fn into_vector(self) -> (isize, isize) {
        match self {
            Action::Up    => (-1, 0),
            Action::Down  => ( 1, 0),
            Action::Left  => ( 0,-1),
            Action::Right => ( 0, 1),
        }
    }

    /// Column of this action in the value table.
    pub fn index(self) -> usize {
        match self {
            Action::Up => 0,
            Action::Down => 1,
            Action::Left => 2,
            Action::Right => 3,
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Action::Up => '^',
            Action::Down => 'v',
            Action::Left => '<',
            Action::Right => '>',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "UP",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
            Action::Right => "RIGHT",
        };
        f.write_str(name)
    }
}

/// A grid cell, identified by its row-major index.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell(pub usize);

impl Cell {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

/// The actions that keep the agent on the grid from one cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ActionSet(u8);

impl ActionSet {
    fn insert(&mut self, action: Action) {
        self.0 |= 1 << action.index();
    }

    pub fn contains(&self, action: Action) -> bool {
        self.0 & (1 << action.index()) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Legal actions in `Action::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    pub fn to_vec(&self) -> Vec<Action> {
        self.iter().collect()
    }
}

/// Largest grid the value table is allowed to cover (1024 x 1024).
pub const MAX_CELLS: usize = 1 << 20;

/// Cell count of an `size x size` grid, if such a grid can be trained on:
/// at least one cell besides the goal, at most `MAX_CELLS` cells.
pub fn checked_cell_count(size: usize) -> Result<usize> {
    if size < 2 {
        return Err(Error::config(format!(
            "grid size must be at least 2, got {}",
            size
        )));
    }
    match size.checked_mul(size) {
        Some(cells) if cells <= MAX_CELLS => Ok(cells),
        _ => Err(Error::config(format!(
            "grid size {} is too large, at most {} cells are supported",
            size, MAX_CELLS
        ))),
    }
}

/// Square grid with a single goal cell and deterministic moves.
#[derive(Debug, Clone)]
pub struct GridWorld {
    size: usize,
    goal: Cell,
    goal_reward: f64,
    step_reward: f64,
    action_sets: Vec<ActionSet>,
}

impl GridWorld {
    pub fn new(size: usize, goal: Cell, goal_reward: f64, step_reward: f64) -> Result<Self> {
        if goal.index() >= checked_cell_count(size)? {
            return Err(Error::config(format!(
                "goal cell {} is outside a {}x{} grid",
                goal, size, size
            )));
        }
        Ok(Self {
            size,
            goal,
            goal_reward,
            step_reward,
            action_sets: Self::setup_action_sets(size),
        })
    }

    /// Places the goal on a uniformly random cell.
    pub fn with_random_goal<R: Rng + ?Sized>(
        size: usize,
        goal_reward: f64,
        step_reward: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let goal = Cell(rng.gen_range(0..checked_cell_count(size)?));
        Self::new(size, goal, goal_reward, step_reward)
    }

    /// Computes the legal moves of every cell from its row and column.
    pub fn setup_action_sets(size: usize) -> Vec<ActionSet> {
        let mut sets = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let mut set = ActionSet::default();
                if row > 0 {
                    set.insert(Action::Up);
                }
                if row + 1 < size {
                    set.insert(Action::Down);
                }
                if col > 0 {
                    set.insert(Action::Left);
                }
                if col + 1 < size {
                    set.insert(Action::Right);
                }
                sets.push(set);
            }
        }
        sets
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn action_sets(&self) -> &[ActionSet] {
        &self.action_sets
    }

    pub fn legal_actions(&self, cell: Cell) -> ActionSet {
        self.action_sets[cell.index()]
    }

    pub fn is_goal(&self, cell: Cell) -> bool {
        cell == self.goal
    }

    pub fn reward(&self, cell: Cell) -> f64 {
        if self.is_goal(cell) {
            self.goal_reward
        } else {
            self.step_reward
        }
    }

    pub fn position(&self, cell: Cell) -> Pos {
        Pos {
            row: cell.index() / self.size,
            col: cell.index() % self.size,
        }
    }

    pub fn cell_at(&self, pos: Pos) -> Cell {
        Cell(pos.row * self.size + pos.col)
    }

    /// Moves one cell in the direction of `action`.
    ///
    /// `action` must be one of `legal_actions(cell)`.
    pub fn step(&self, cell: Cell, action: Action) -> Cell {
        debug_assert!(
            self.legal_actions(cell).contains(action),
            "illegal action {} from cell {}",
            action,
            cell
        );
        let pos = self.position(cell);
        let (d_row, d_col) = action.into_vector();
        self.cell_at(Pos {
            row: pos.row.wrapping_add_signed(d_row),
            col: pos.col.wrapping_add_signed(d_col),
        })
    }

    /// Uniform over every cell but the goal.
    pub fn random_non_goal_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        // Draw from the N*N - 1 other cells and skip over the goal. There are
        // at least three of them, `new` rejects grids smaller than 2x2.
        let draw = rng.gen_range(0..self.cell_count() - 1);
        if draw >= self.goal.index() {
            Cell(draw + 1)
        } else {
            Cell(draw)
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        (0..self.cell_count()).map(Cell)
    }
}
