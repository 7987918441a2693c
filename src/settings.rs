use std::{env, path::PathBuf, time::Duration};

use log::warn;

const DEFAULT_QUIZ_PATH: &str = "quiz.json";
const DEFAULT_DATA_DIR: &str = ".quiz-runner";
const DEFAULT_TICK_MS: u64 = 1000;

/// Runtime configuration, resolved from CLI arguments, then environment
/// variables, then defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub quiz_path: PathBuf,
    pub data_dir: PathBuf,
    pub tick_interval: Duration,
    /// Logs every tick at info level instead of debug.
    pub debug: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            quiz_path: PathBuf::from(DEFAULT_QUIZ_PATH),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            tick_interval: Duration::from_millis(DEFAULT_TICK_MS),
            debug: false,
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self::resolve(env::args().skip(1), |key| env::var(key).ok())
    }

    /// `args` excludes the program name; `lookup` reads one variable.
    pub fn resolve<I, F>(args: I, lookup: F) -> Self
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let quiz_path = args
            .into_iter()
            .next()
            .or_else(|| lookup("QUIZ_RUNNER_QUIZ"))
            .map(PathBuf::from)
            .unwrap_or(defaults.quiz_path);

        let data_dir = lookup("QUIZ_RUNNER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let tick_interval = match lookup("QUIZ_RUNNER_TICK_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    warn!("Ignoring invalid QUIZ_RUNNER_TICK_MS '{raw}'; using {DEFAULT_TICK_MS}ms");
                    defaults.tick_interval
                }
            },
            None => defaults.tick_interval,
        };

        let debug = lookup("QUIZ_RUNNER_DEBUG")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            quiz_path,
            data_dir,
            tick_interval,
            debug,
        }
    }
}
