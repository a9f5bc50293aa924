use ndarray::Array2;
use ordered_float::OrderedFloat;

use crate::environment::{Action, ActionSet, Cell, GridWorld};

/// Dense `N*N x 4` value arena.
///
/// Rows are cells, columns are `Action::index()`. Slots of moves that leave
/// the grid exist in the arena but are never read or written.
#[derive(Debug, Clone)]
pub struct QTable {
    values: Array2<f64>,
    action_sets: Vec<ActionSet>,
}

impl QTable {
    pub fn new(grid: &GridWorld) -> Self {
        Self {
            values: Array2::<f64>::zeros((grid.cell_count(), Action::COUNT)),
            action_sets: grid.action_sets().to_vec(),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.values.nrows()
    }

    pub fn legal_actions(&self, cell: Cell) -> ActionSet {
        self.action_sets[cell.index()]
    }

    pub fn value(&self, cell: Cell, action: Action) -> f64 {
        debug_assert!(self.legal_actions(cell).contains(action));
        self.values[[cell.index(), action.index()]]
    }

    /// Legal actions of `cell` with their current values.
    pub fn row(&self, cell: Cell) -> impl Iterator<Item = (Action, f64)> + '_ {
        self.legal_actions(cell)
            .to_vec()
            .into_iter()
            .map(move |a| (a, self.values[[cell.index(), a.index()]]))
    }

    /// Maximum value over the legal actions of `cell`.
    pub fn max_value(&self, cell: Cell) -> f64 {
        self.row(cell)
            .map(|(_, v)| OrderedFloat(v))
            .max()
            .map(OrderedFloat::into_inner)
            .unwrap_or(0.0)
    }

    /// Every legal action of `cell` whose value equals the maximum, in
    /// `Action::ALL` order.
    pub fn best_actions(&self, cell: Cell) -> Vec<Action> {
        let best = self.max_value(cell);
        self.row(cell)
            .filter(|(_, v)| *v == best)
            .map(|(a, _)| a)
            .collect()
    }

    /// Q-learning update:
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The max runs over the legal actions of `next` only. Returns the
    /// temporal difference.
    pub fn update(
        &mut self,
        cell: Cell,
        action: Action,
        next: Cell,
        reward: f64,
        alpha: f64,
        gamma: f64,
    ) -> f64 {
        let current_q = self.value(cell, action);
        let t_d = reward + gamma * self.max_value(next) - current_q;
        self.values[[cell.index(), action.index()]] = current_q + alpha * t_d;
        t_d
    }

    /// Largest absolute value over all legal pairs.
    pub fn max_abs_value(&self) -> f64 {
        (0..self.cell_count())
            .flat_map(move |i| self.row(Cell(i)).map(|(_, v)| OrderedFloat(v.abs())))
            .max()
            .map(OrderedFloat::into_inner)
            .unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.max_abs_value() == 0.0
    }
}
