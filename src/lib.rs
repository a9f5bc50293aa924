//! Tabular Q-learning on a square grid.
//!
//! An agent starts on a random cell and learns, episode after episode, the
//! shortest way to a single goal cell. The pieces, leaves first:
//!
//! - [`GridWorld`]: geometry, legal moves, rewards
//! - [`QTable`]: one value per legal (cell, action) pair
//! - [`EpsilonGreedy`]: action selection over legal moves only
//! - [`Trainer`]: the episodic loop applying the Bellman update
//!
//! ```
//! use gridworld_q::{NullObserver, QTableReport, Trainer, TrainingConfig};
//!
//! let config = TrainingConfig::default().with_goal(4).with_seed(1);
//! let mut trainer = Trainer::new(config)?;
//! trainer.train(200, &mut NullObserver);
//! let report = QTableReport::new(trainer.grid(), trainer.q_table());
//! assert_eq!(report.goal.index(), 4);
//! # Ok::<(), gridworld_q::Error>(())
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod observer;
pub mod policy;
pub mod q_table;
pub mod render;
pub mod report;
pub mod rl;

pub use agent::Agent;
pub use config::TrainingConfig;
pub use environment::{Action, ActionSet, Cell, GridWorld, Pos};
pub use error::{Error, Result};
pub use observer::{NullObserver, TrainingObserver};
pub use policy::{EpsilonGreedy, ExplorationStrategy, Greedy, TieBreak};
pub use q_table::QTable;
pub use render::ConsoleRenderer;
pub use report::QTableReport;
pub use rl::{EpisodeOutcome, EpisodeStats, Trainer, TrainingSummary};
