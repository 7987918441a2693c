pub mod question;
pub mod session;
pub mod view;

pub use question::{Question, QuestionId, QuizDefinition};
pub use session::{Snapshot, Summary};
pub use view::{OptionReview, QuestionView, QuizView};
