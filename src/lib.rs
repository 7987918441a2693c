pub mod cli;
pub mod engine;
pub mod models;
pub mod settings;
pub mod source;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use engine::{dispatch, CommandOutcome, QuizCommand, QuizController, QuizEvent};
use settings::RunnerConfig;
use storage::{FileSnapshotStore, SnapshotStore};

pub fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("quiz-runner starting up...");

    let config = RunnerConfig::from_env();
    let definition = source::load_definition(&config.quiz_path)?;
    let store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(&config.data_dir)?);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async move {
        let controller = QuizController::new(definition, store, &config);
        run_session(controller).await
    })
}

async fn run_session(controller: QuizController) -> Result<()> {
    let listener = spawn_event_listener(&controller);

    println!("{}\n", cli::HELP);
    let view = controller.view().await;
    if let Some(summary) = view.summary {
        println!("{}", cli::render_summary(&summary));
    }
    println!("{}", cli::render_view(&view));

    controller.start_ticker().await;

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read from stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<QuizCommand>() {
            Ok(command) => command,
            Err(err) => {
                println!("{err}\n\n{}", cli::HELP);
                continue;
            }
        };

        match dispatch(&controller, command).await {
            CommandOutcome::View(view) => println!("{}", cli::render_view(&view)),
            CommandOutcome::Finished { summary, view } => {
                println!("{}\n", cli::render_summary(&summary));
                println!("{}", cli::render_view(&view));
            }
            CommandOutcome::Review(Some(items)) => println!("{}", cli::render_review(&items)),
            CommandOutcome::Review(None) => println!("Review is available once the quiz is finished."),
            CommandOutcome::Help => println!("{}", cli::HELP),
            CommandOutcome::Quit => break,
        }
    }

    controller.stop_ticker().await;
    listener.abort();
    info!("Progress saved; see you next time");
    Ok(())
}

/// Prints out-of-band updates the user did not trigger, i.e. running out of
/// time.
fn spawn_event_listener(controller: &QuizController) -> tokio::task::JoinHandle<()> {
    let mut events = controller.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(QuizEvent::Finished {
                    summary,
                    timed_out: true,
                    ..
                }) => {
                    println!("\nTime's up!\n{}", cli::render_summary(&summary));
                    println!("Type 'review' to see the answers or 'restart' to try again.");
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event listener skipped {skipped} events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
