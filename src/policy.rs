use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::environment::{Action, Cell};
use crate::q_table::QTable;

/// Rule for picking among legal actions that share the maximum value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum)]
pub enum TieBreak {
    /// Uniform among all maximizers
    #[default]
    Random,
    /// First maximizer in `Action::ALL` order
    First,
}

pub trait ExplorationStrategy {
    /// Picks one of the legal actions of `cell`.
    fn choose_action(&self, cell: Cell, q_table: &QTable, rng: &mut dyn RngCore) -> Action;
}

/// Best known action of `cell`, ties resolved by `tie_break`.
pub fn greedy_action(
    cell: Cell,
    q_table: &QTable,
    tie_break: TieBreak,
    rng: &mut dyn RngCore,
) -> Action {
    let best = q_table.best_actions(cell);
    let picked = match tie_break {
        TieBreak::Random => best.choose(rng),
        TieBreak::First => best.first(),
    };
    // Every cell of a grid with N >= 2 has at least two legal moves.
    *picked.unwrap_or(&Action::Up)
}

pub struct EpsilonGreedy {
    epsilon: f64,
    tie_break: TieBreak,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64, tie_break: TieBreak) -> Self {
        EpsilonGreedy { epsilon, tie_break }
    }
}

impl ExplorationStrategy for EpsilonGreedy {
    fn choose_action(&self, cell: Cell, q_table: &QTable, rng: &mut dyn RngCore) -> Action {
        if rng.gen::<f64>() < self.epsilon {
            let legal = q_table.legal_actions(cell).to_vec();
            if let Some(action) = legal.choose(rng) {
                return *action;
            }
        }
        greedy_action(cell, q_table, self.tie_break, rng)
    }
}

/// Pure exploitation, used to read the learned policy back out.
pub struct Greedy {
    tie_break: TieBreak,
}

impl Greedy {
    pub fn new(tie_break: TieBreak) -> Self {
        Greedy { tie_break }
    }
}

impl ExplorationStrategy for Greedy {
    fn choose_action(&self, cell: Cell, q_table: &QTable, rng: &mut dyn RngCore) -> Action {
        greedy_action(cell, q_table, self.tie_break, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::GridWorld;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (GridWorld, QTable, StdRng) {
        let grid = GridWorld::new(3, Cell(4), 10.0, 0.0).unwrap();
        let q_table = QTable::new(&grid);
        (grid, q_table, StdRng::seed_from_u64(11))
    }

    #[test]
    fn random_tie_break_spreads_over_maximizers() {
        let (_, q_table, mut rng) = setup();
        let policy = EpsilonGreedy::new(0.0, TieBreak::Random);
        let mut counts = [0usize; 4];
        for _ in 0..4_000 {
            counts[policy.choose_action(Cell(4), &q_table, &mut rng).index()] += 1;
        }
        for count in counts {
            assert!(count > 800, "uneven tie-break counts: {:?}", counts);
        }
    }

    #[test]
    fn first_tie_break_is_deterministic() {
        let (_, q_table, mut rng) = setup();
        let policy = EpsilonGreedy::new(0.0, TieBreak::First);
        for _ in 0..100 {
            assert_eq!(policy.choose_action(Cell(4), &q_table, &mut rng), Action::Up);
            assert_eq!(policy.choose_action(Cell(0), &q_table, &mut rng), Action::Down);
        }
    }

    #[test]
    fn exploits_a_clear_winner() {
        let (_, mut q_table, mut rng) = setup();
        q_table.update(Cell(1), Action::Down, Cell(4), 10.0, 0.1, 0.9);
        let policy = Greedy::new(TieBreak::Random);
        for _ in 0..100 {
            assert_eq!(policy.choose_action(Cell(1), &q_table, &mut rng), Action::Down);
        }
    }

    #[test]
    fn full_exploration_stays_legal() {
        let (grid, q_table, mut rng) = setup();
        let policy = EpsilonGreedy::new(1.0, TieBreak::First);
        for cell in grid.cells() {
            let legal = grid.legal_actions(cell);
            for _ in 0..200 {
                assert!(legal.contains(policy.choose_action(cell, &q_table, &mut rng)));
            }
        }
    }

    #[test]
    fn exploration_spreads_over_legal_actions() {
        let (_, mut q_table, mut rng) = setup();
        // Up is the clear winner from cell 8, yet full exploration ignores it.
        q_table.update(Cell(8), Action::Up, Cell(5), 1.0, 1.0, 0.0);
        let policy = EpsilonGreedy::new(1.0, TieBreak::First);
        let mut counts = [0usize; 4];
        for _ in 0..2_000 {
            counts[policy.choose_action(Cell(8), &q_table, &mut rng).index()] += 1;
        }
        assert_eq!(counts[Action::Down.index()], 0);
        assert_eq!(counts[Action::Right.index()], 0);
        for action in [Action::Up, Action::Left] {
            let count = counts[action.index()];
            assert!(count > 850 && count < 1_150, "uneven exploration: {:?}", counts);
        }
    }
}
