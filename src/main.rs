use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridworld_q::cli::{self, Cli, OutputFormat};
use gridworld_q::{
    Cell, ConsoleRenderer, Error, NullObserver, QTableReport, Trainer, TrainingObserver,
};

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args_os()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let cli = match Cli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(err) => {
            let args = argv.get(1..).unwrap_or_default();
            return report_argument_error(err, args);
        }
    };

    // Logs go to stderr so the report on stdout stays clean
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gridworld_q={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn report_argument_error(err: clap::Error, args: &[String]) -> ExitCode {
    if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
        let _ = err.print();
        return ExitCode::SUCCESS;
    }
    match cli::argument_error(&err, args) {
        Some(usage @ Error::Usage { .. }) => eprintln!("{usage}"),
        Some(other) => eprintln!("Error: {other}"),
        None => {
            let _ = err.print();
        }
    }
    ExitCode::FAILURE
}

fn run(cli: Cli) -> Result<()> {
    let episodes = cli::parse_episodes(&cli.episodes)?;
    let mut trainer = Trainer::new(cli.training_config())?;

    let mut renderer;
    let mut null = NullObserver;
    let observer: &mut dyn TrainingObserver = if cli.render {
        renderer = ConsoleRenderer::stdout(Duration::from_millis(cli.delay_ms));
        &mut renderer
    } else {
        &mut null
    };
    let summary = trainer.train(episodes, observer);

    let report = QTableReport::new(trainer.grid(), trainer.q_table());
    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Csv => report.write_csv(stdout.lock())?,
        OutputFormat::Table => {
            let mut out = stdout.lock();
            report.write_table(&mut out)?;
            writeln!(out)?;
            write!(out, "{}", report.policy_map())?;
            let start = if report.goal.index() == 0 {
                Cell(trainer.grid().cell_count() - 1)
            } else {
                Cell(0)
            };
            // Nothing learned, nothing to follow: the table ends at the goal.
            if let Some(path) = trainer.greedy_path(start) {
                let path: Vec<String> = path.iter().map(ToString::to_string).collect();
                writeln!(out, "Greedy path: {}", path.join(" -> "))?;
            }
            writeln!(
                out,
                "\nEpisodes: {} (truncated: {}), mean steps: {:.2}",
                summary.episodes,
                summary.truncated,
                summary.mean_steps()
            )?;
        }
    }
    Ok(())
}
