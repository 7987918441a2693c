pub mod commands;
pub mod controller;
pub mod state;

pub use commands::{dispatch, CommandOutcome, QuizCommand, ReviewItem};
pub use controller::{QuizController, QuizEvent};
pub use state::{QuizEngine, QuizStatus};
