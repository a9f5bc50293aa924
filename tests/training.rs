//! End-to-end behaviour of the training loop.

use gridworld_q::{
    Action, Cell, EpisodeOutcome, GridWorld, NullObserver, QTableReport, Trainer,
    TrainingConfig, TrainingObserver,
};

fn classic(seed: u64) -> TrainingConfig {
    TrainingConfig::default()
        .with_grid_size(3)
        .with_goal(4)
        .with_rewards(10.0, 0.0)
        .with_alpha(0.1)
        .with_gamma(0.9)
        .with_epsilon(0.1)
        .with_seed(seed)
}

#[test]
fn learns_to_step_down_into_the_goal() {
    for seed in [1, 2, 3, 42, 1234] {
        let mut trainer = Trainer::new(classic(seed)).unwrap();
        trainer.train(500, &mut NullObserver);

        let q = trainer.q_table();
        let down = q.value(Cell(1), Action::Down);
        for (action, value) in q.row(Cell(1)) {
            if action != Action::Down {
                assert!(
                    down > value,
                    "seed {seed}: Q(1, DOWN) = {down} not above Q(1, {action}) = {value}"
                );
            }
        }
    }
}

#[test]
fn zero_episodes_leave_the_table_untouched() {
    let mut trainer = Trainer::new(TrainingConfig::default().with_seed(8)).unwrap();
    let summary = trainer.train(0, &mut NullObserver);
    assert_eq!(summary.episodes, 0);
    assert_eq!(summary.mean_steps(), 0.0);
    assert!(trainer.q_table().is_zero());

    let report = QTableReport::new(trainer.grid(), trainer.q_table());
    assert!(report.goal.index() < 9);
    assert!(report
        .cells
        .iter()
        .all(|c| c.values.iter().all(|(_, v)| *v == 0.0)));
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut trainer = Trainer::new(TrainingConfig::default().with_seed(seed)).unwrap();
        let summary = trainer.train(50, &mut NullObserver);
        (summary, QTableReport::new(trainer.grid(), trainer.q_table()))
    };
    assert_eq!(run(77), run(77));
}

#[test]
fn every_episode_terminates_without_a_step_cap() {
    for size in 2..=5 {
        let config = TrainingConfig::default()
            .with_grid_size(size)
            .with_max_steps(None)
            .with_seed(size as u64);
        let mut trainer = Trainer::new(config).unwrap();
        let summary = trainer.train(50, &mut NullObserver);
        assert_eq!(summary.terminated, 50, "size {size}");
        assert_eq!(summary.truncated, 0);
    }
}

#[test]
fn action_sets_are_rebuilt_identically() {
    let first = GridWorld::setup_action_sets(3);
    let second = GridWorld::setup_action_sets(3);
    assert_eq!(first, second);

    for corner in [0, 2, 6, 8] {
        assert_eq!(first[corner].len(), 2);
    }
    for edge in [1, 3, 5, 7] {
        assert_eq!(first[edge].len(), 3);
    }
    assert_eq!(first[4].len(), 4);
}

#[test]
fn invalid_configuration_is_rejected_up_front() {
    assert!(Trainer::new(TrainingConfig::default().with_grid_size(1)).is_err());
    assert!(Trainer::new(TrainingConfig::default().with_gamma(1.0)).is_err());
    assert!(Trainer::new(TrainingConfig::default().with_goal(100)).is_err());
}

#[derive(Default)]
struct Recorder {
    starts: Vec<Cell>,
    steps: usize,
    outcomes: Vec<EpisodeOutcome>,
}

impl TrainingObserver for Recorder {
    fn on_episode_start(&mut self, _episode: usize, _grid: &GridWorld, start: Cell) {
        self.starts.push(start);
    }

    fn on_step(&mut self, _grid: &GridWorld, _cell: Cell) {
        self.steps += 1;
    }

    fn on_episode_end(&mut self, stats: &gridworld_q::EpisodeStats) {
        self.outcomes.push(stats.outcome);
    }
}

#[test]
fn observer_sees_every_episode_and_step() {
    let mut trainer = Trainer::new(classic(5)).unwrap();
    let mut recorder = Recorder::default();
    let summary = trainer.train(30, &mut recorder);

    assert_eq!(recorder.starts.len(), 30);
    assert!(recorder.starts.iter().all(|c| *c != Cell(4)));
    assert_eq!(recorder.steps, summary.total_steps);
    assert_eq!(recorder.outcomes.len(), 30);
}

#[test]
fn step_cost_keeps_the_goal_move_on_top() {
    let config = classic(9).with_rewards(100.0, -1.0);
    let mut trainer = Trainer::new(config).unwrap();
    trainer.train(500, &mut NullObserver);

    let q = trainer.q_table();
    assert_eq!(q.best_actions(Cell(1)), vec![Action::Down]);
    assert_eq!(q.best_actions(Cell(3)), vec![Action::Right]);
}
