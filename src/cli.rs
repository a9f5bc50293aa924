use std::num::IntErrorKind;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

use crate::config::{self, TrainingConfig};
use crate::error::{Error, Result};
use crate::policy::TieBreak;

pub const PROGRAM: &str = "gridworld-q";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-cell action values, policy map and summary
    Table,
    /// One CSV line per legal (cell, action) pair
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = PROGRAM)]
#[command(version, about = "Train a tabular Q-learning agent on a square grid", long_about = None)]
pub struct Cli {
    /// Number of training episodes
    #[arg(value_name = "NUM_OF_ITERATIONS", allow_negative_numbers = true)]
    pub episodes: String,

    /// Side length of the square grid
    #[arg(long, env = "GRIDWORLD_SIZE", default_value_t = config::DEFAULT_GRID_SIZE)]
    pub size: usize,

    /// Learning rate
    #[arg(long, env = "GRIDWORLD_ALPHA", default_value_t = config::DEFAULT_ALPHA)]
    pub alpha: f64,

    /// Discount factor
    #[arg(long, env = "GRIDWORLD_GAMMA", default_value_t = config::DEFAULT_GAMMA)]
    pub gamma: f64,

    /// Exploration probability
    #[arg(long, env = "GRIDWORLD_EPSILON", default_value_t = config::DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Reward for reaching the goal
    #[arg(long, env = "GRIDWORLD_GOAL_REWARD", default_value_t = config::DEFAULT_GOAL_REWARD)]
    pub goal_reward: f64,

    /// Reward for every other move
    #[arg(long, env = "GRIDWORLD_STEP_REWARD", default_value_t = config::DEFAULT_STEP_REWARD, allow_negative_numbers = true)]
    pub step_reward: f64,

    /// Step cap per episode (0 disables it)
    #[arg(long, env = "GRIDWORLD_MAX_STEPS", default_value_t = config::DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// Random seed for reproducibility
    #[arg(long, env = "GRIDWORLD_SEED")]
    pub seed: Option<u64>,

    /// Pin the goal to this cell instead of drawing it
    #[arg(long, env = "GRIDWORLD_GOAL")]
    pub goal: Option<usize>,

    /// How ties between equally valued actions are broken
    #[arg(long, value_enum, env = "GRIDWORLD_TIE_BREAK", default_value_t = TieBreak::Random)]
    pub tie_break: TieBreak,

    /// Draw the grid after every move
    #[arg(long)]
    pub render: bool,

    /// Pause between frames when rendering, in milliseconds
    #[arg(long, env = "GRIDWORLD_DELAY_MS", default_value_t = 1)]
    pub delay_ms: u64,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            grid_size: self.size,
            goal: self.goal,
            goal_reward: self.goal_reward,
            step_reward: self.step_reward,
            alpha: self.alpha,
            gamma: self.gamma,
            epsilon: self.epsilon,
            tie_break: self.tie_break,
            max_steps: (self.max_steps > 0).then_some(self.max_steps),
            seed: self.seed,
        }
    }
}

/// Reads the episode count; anything that is not a plain integer is a parse
/// error, integers that do not fit (including negatives) are range errors.
pub fn parse_episodes(raw: &str) -> Result<usize> {
    let value = raw.trim();
    match value.parse::<u32>() {
        Ok(episodes) => Ok(episodes as usize),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Err(Error::Range {
                value: raw.to_string(),
            }),
            IntErrorKind::InvalidDigit if is_negative_integer(value) => Err(Error::Range {
                value: raw.to_string(),
            }),
            _ => Err(Error::Parse {
                value: raw.to_string(),
            }),
        },
    }
}

fn is_negative_integer(value: &str) -> bool {
    value
        .strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Maps clap's argument-count failures to the usage error.
///
/// `args` are the command-line arguments after the program name. A single
/// dash-prefixed argument that clap does not know stands where the episode
/// count goes, so it is reported as a malformed count.
pub fn argument_error(err: &clap::Error, args: &[String]) -> Option<Error> {
    if let (ErrorKind::UnknownArgument, [only]) = (err.kind(), args) {
        if only.starts_with('-') {
            return Some(Error::Parse {
                value: only.clone(),
            });
        }
    }
    match err.kind() {
        ErrorKind::MissingRequiredArgument
        | ErrorKind::UnknownArgument
        | ErrorKind::TooManyValues
        | ErrorKind::WrongNumberOfValues => Some(Error::Usage {
            program: PROGRAM.to_string(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_counts() {
        assert_eq!(parse_episodes("0").unwrap(), 0);
        assert_eq!(parse_episodes("500").unwrap(), 500);
        assert_eq!(parse_episodes(" 12 ").unwrap(), 12);
    }

    #[test]
    fn non_numeric_is_parse_error() {
        assert!(matches!(parse_episodes("ten"), Err(Error::Parse { .. })));
        assert!(matches!(parse_episodes("1.5"), Err(Error::Parse { .. })));
        assert!(matches!(parse_episodes(""), Err(Error::Parse { .. })));
        assert!(matches!(parse_episodes("-"), Err(Error::Parse { .. })));
    }

    #[test]
    fn overflow_and_negative_are_range_errors() {
        assert!(matches!(
            parse_episodes("99999999999999999999"),
            Err(Error::Range { .. })
        ));
        assert!(matches!(parse_episodes("-3"), Err(Error::Range { .. })));
    }

    fn classify(args: &[&str]) -> Option<Error> {
        let argv = std::iter::once(PROGRAM).chain(args.iter().copied());
        let err = Cli::try_parse_from(argv).unwrap_err();
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        argument_error(&err, &args)
    }

    #[test]
    fn missing_and_extra_arguments_are_usage_errors() {
        assert!(matches!(classify(&[]), Some(Error::Usage { .. })));
        assert!(matches!(classify(&["10", "20"]), Some(Error::Usage { .. })));
        assert!(matches!(classify(&["10", "-x"]), Some(Error::Usage { .. })));
    }

    #[test]
    fn lone_dash_argument_is_a_malformed_count() {
        match classify(&["-x"]) {
            Some(Error::Parse { value }) => assert_eq!(value, "-x"),
            other => panic!("expected a parse error, got {:?}", other),
        }
        assert!(matches!(classify(&["--ten"]), Some(Error::Parse { .. })));
    }

    #[test]
    fn negative_count_reaches_the_range_check() {
        let cli = Cli::try_parse_from([PROGRAM, "-5"]).unwrap();
        assert!(matches!(parse_episodes(&cli.episodes), Err(Error::Range { .. })));
    }

    #[test]
    fn flags_build_the_training_config() {
        let cli = Cli::try_parse_from([
            PROGRAM,
            "50",
            "--size",
            "4",
            "--seed",
            "9",
            "--max-steps",
            "0",
            "--tie-break",
            "first",
        ])
        .unwrap();
        let config = cli.training_config();
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.max_steps, None);
        assert_eq!(config.tie_break, TieBreak::First);
        assert!(config.validate().is_ok());
    }
}
